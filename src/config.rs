use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::pipeline::labs::LabError;

/// Application-level constants
pub const APP_NAME: &str = "Sharelab";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Log filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "sharelab=info,sharelab_lib=info"
}

/// Tunables for one extraction engine.
///
/// All thresholds are geometric or textual heuristics; defaults match the
/// layouts produced by common PDF text extractors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Vertical band (PDF units) within which tokens share a row.
    pub row_tolerance: f64,
    /// Horizontal gap (PDF units) between tokens that becomes a column break.
    pub column_gap: f64,
    /// Plain-text mode: run of spaces treated as a column break.
    pub gutter_min_spaces: usize,
    /// Lines scanned after a value line for a reference phrase.
    pub reference_lookahead: usize,
    /// Max characters between `RESULTADO` and `INTERVALO DE REFERÊNCIA`.
    pub header_window: usize,
    /// Colon lines with more numerals than this are evolution tables.
    pub max_colon_numerals: usize,
    /// Run the blood-gas extractor only when a gas panel is detected.
    pub blood_gas_requires_hint: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            row_tolerance: 2.0,
            column_gap: 40.0,
            gutter_min_spaces: 3,
            reference_lookahead: 4,
            header_window: 80,
            max_colon_numerals: 2,
            blood_gas_requires_hint: true,
        }
    }
}

impl EngineConfig {
    /// Load a JSON config file. Missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self, LabError> {
        let json = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&json)?;
        config.validate()?;
        tracing::debug!(path = %path.display(), "Loaded engine config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), LabError> {
        if !self.row_tolerance.is_finite() || self.row_tolerance < 0.0 {
            return Err(LabError::Config(format!(
                "row_tolerance must be a non-negative number, got {}",
                self.row_tolerance
            )));
        }
        if !self.column_gap.is_finite() || self.column_gap <= 0.0 {
            return Err(LabError::Config(format!(
                "column_gap must be positive, got {}",
                self.column_gap
            )));
        }
        if self.gutter_min_spaces < 2 {
            return Err(LabError::Config(
                "gutter_min_spaces must be at least 2".into(),
            ));
        }
        if self.reference_lookahead == 0 {
            return Err(LabError::Config(
                "reference_lookahead must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn app_name_is_sharelab() {
        assert_eq!(APP_NAME, "Sharelab");
    }

    #[test]
    fn defaults_are_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.row_tolerance, 2.0);
        assert_eq!(config.column_gap, 40.0);
        assert_eq!(config.reference_lookahead, 4);
        assert_eq!(config.max_colon_numerals, 2);
    }

    #[test]
    fn load_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"column_gap": 25.5, "blood_gas_requires_hint": false}}"#).unwrap();

        let config = EngineConfig::load(file.path()).unwrap();
        assert_eq!(config.column_gap, 25.5);
        assert!(!config.blood_gas_requires_hint);
        assert_eq!(config.row_tolerance, 2.0);
        assert_eq!(config.header_window, 80);
    }

    #[test]
    fn load_rejects_invalid_values() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"reference_lookahead": 0}}"#).unwrap();
        assert!(matches!(
            EngineConfig::load(file.path()),
            Err(LabError::Config(_))
        ));
    }

    #[test]
    fn load_rejects_malformed_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{not json").unwrap();
        assert!(matches!(EngineConfig::load(file.path()), Err(LabError::Json(_))));
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.json");
        assert!(matches!(EngineConfig::load(&missing), Err(LabError::Io(_))));
    }

    #[test]
    fn negative_tolerance_rejected() {
        let config = EngineConfig {
            row_tolerance: -1.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
