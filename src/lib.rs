pub mod config;
pub mod models;
pub mod pipeline;

pub use models::ReportResult;
pub use pipeline::extraction::{PositionedToken, TokenPage};
pub use pipeline::labs::{extract, LabEngine, LabError};

use tracing_subscriber::EnvFilter;

/// Install the stderr subscriber. `RUST_LOG` wins over the default filter.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .with_writer(std::io::stderr)
        .init();
}
