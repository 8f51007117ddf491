//! Lab-report extraction engine.
//!
//! Redacted report text (and optionally positioned tokens) goes in, a
//! [`ReportResult`](crate::models::ReportResult) comes out. Five independent
//! strategies each propose candidate items; `merge` resolves overlaps and
//! `report` orders and renders the survivors.

pub mod classify;
pub mod engine;
pub mod error;
pub mod merge;
pub mod number;
pub mod profile;
pub mod reference;
pub mod report;
pub mod strategies;
pub mod synonyms;
pub mod units;

pub use classify::classify;
pub use engine::{extract, LabEngine};
pub use error::LabError;
pub use merge::{merge, MergeOutcome};
pub use number::parse_number;
pub use profile::detect_profile;
pub use reference::parse_reference_interval;
pub use report::assemble;
pub use synonyms::{fold_text, normalize_label, SynonymDictionary, SynonymEntry};
