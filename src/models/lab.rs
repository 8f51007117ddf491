use serde::{Deserialize, Serialize};

use super::enums::{Flag, ParameterCode, Qualifier, StrategyKind};
use crate::pipeline::labs::classify::classify;

/// A parsed measurement, possibly bounded by an inequality ("<0,012").
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NumericValue {
    pub magnitude: f64,
    pub qualifier: Qualifier,
}

impl NumericValue {
    pub fn exact(magnitude: f64) -> Self {
        Self {
            magnitude,
            qualifier: Qualifier::None,
        }
    }

    pub fn scaled(self, factor: f64) -> Self {
        Self {
            magnitude: self.magnitude * factor,
            qualifier: self.qualifier,
        }
    }

    /// Render with a decimal comma, the way patients read their reports.
    pub fn to_decimal_comma(&self) -> String {
        self.to_string().replace('.', ",")
    }
}

impl std::fmt::Display for NumericValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.qualifier.glyph(), format_magnitude(self.magnitude))
    }
}

/// Shortest round-trip rendering. Below a million, values are snapped to
/// nine decimals first so products of unit scaling (`1.1 × 1000`) print
/// without float noise, while small readings such as `0.00004` keep every
/// digit.
fn format_magnitude(magnitude: f64) -> String {
    let value = if magnitude.abs() < 1e6 {
        (magnitude * 1e9).round() / 1e9
    } else {
        magnitude
    };
    match format!("{value}").as_str() {
        "-0" => "0".to_string(),
        rendered => rendered.to_string(),
    }
}

/// Laboratory-declared normal interval, parsed from free text.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReferenceInterval {
    Range { low: f64, high: f64 },
    UpperBound { high: f64 },
    LowerBound { low: f64 },
    Unknown,
}

impl ReferenceInterval {
    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown)
    }

    /// Multiply every bound, for references written in a scaled unit
    /// (`150 a 450 mil/mm³`).
    pub fn scaled(self, factor: f64) -> Self {
        match self {
            Self::Range { low, high } => Self::Range {
                low: low * factor,
                high: high * factor,
            },
            Self::UpperBound { high } => Self::UpperBound {
                high: high * factor,
            },
            Self::LowerBound { low } => Self::LowerBound { low: low * factor },
            Self::Unknown => Self::Unknown,
        }
    }
}

/// Which strategy produced an item, and from which text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Provenance {
    pub strategy: StrategyKind,
    pub source: String,
}

impl Provenance {
    pub fn new(strategy: StrategyKind, source: impl Into<String>) -> Self {
        Self {
            strategy,
            source: source.into(),
        }
    }
}

impl std::fmt::Display for Provenance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.strategy, self.source)
    }
}

/// One analyte measurement found by one strategy.
///
/// Immutable once built: the flag is computed from the value and the
/// reference interval in [`ExtractedItem::new`] and never set on its own.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractedItem {
    code: ParameterCode,
    matched_label: String,
    value: NumericValue,
    unit: Option<String>,
    reference_text: Option<String>,
    reference_interval: ReferenceInterval,
    flag: Flag,
    provenance: Provenance,
}

impl ExtractedItem {
    pub fn new(
        code: ParameterCode,
        matched_label: impl Into<String>,
        value: NumericValue,
        unit: Option<String>,
        reference_text: Option<String>,
        reference_interval: ReferenceInterval,
        provenance: Provenance,
    ) -> Self {
        let flag = classify(Some(&value), &reference_interval);
        Self {
            code,
            matched_label: matched_label.into(),
            value,
            unit: unit.filter(|u| !u.trim().is_empty()),
            reference_text: reference_text.filter(|r| !r.trim().is_empty()),
            reference_interval,
            flag,
            provenance,
        }
    }

    pub fn code(&self) -> ParameterCode {
        self.code
    }

    pub fn matched_label(&self) -> &str {
        &self.matched_label
    }

    pub fn value(&self) -> &NumericValue {
        &self.value
    }

    pub fn unit(&self) -> Option<&str> {
        self.unit.as_deref()
    }

    pub fn reference_text(&self) -> Option<&str> {
        self.reference_text.as_deref()
    }

    pub fn reference_interval(&self) -> &ReferenceInterval {
        &self.reference_interval
    }

    pub fn flag(&self) -> Flag {
        self.flag
    }

    pub fn provenance(&self) -> &Provenance {
        &self.provenance
    }
}
