//! Text intake: everything between the redacted text (or positioned tokens)
//! and the lines the lab strategies read.

pub mod column_detect;
pub mod line_reconstruct;
pub mod sanitize;
pub mod table_detect;
pub mod types;

pub use column_detect::split_gutters;
pub use line_reconstruct::{reconstruct_lines, reconstruct_pages};
pub use sanitize::{flatten_line, sanitize_report_text};
pub use table_detect::{count_tabular_lines, is_tabular_line};
pub use types::*;
