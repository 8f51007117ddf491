use serde::{Deserialize, Serialize};

use super::enums::StrategyKind;
use super::lab::ExtractedItem;

/// Terminal output of one extraction run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReportResult {
    /// Display-ordered, one item per analyte code.
    pub items: Vec<ExtractedItem>,
    /// Single line, `CODE value unit [FLAG]` joined by `; `.
    pub professional_summary: String,
    /// One line per item, patient-facing label and flag word.
    pub patient_summary: Vec<String>,
    pub diagnostics: Diagnostics,
}

impl ReportResult {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Serialize the structured record handed to the transport layer.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Diagnostics {
    pub profile_hints: ProfileHints,
    pub counts: ExtractionCounts,
}

/// What the report looks like, detected from its text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileHints {
    /// Laboratory brand named in the report, when recognizable.
    pub laboratory: Option<String>,
    /// DASA-style layout ("Série vermelha", "Intervalo de referência").
    pub dasa_layout: bool,
    /// `RESULTADO` / `INTERVALO DE REFERÊNCIA` column headers present.
    pub result_blocks: bool,
    /// Arterial or venous blood-gas panel present.
    pub blood_gas: bool,
    /// Lines that look like table rows.
    pub tabular_lines: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionCounts {
    /// Non-empty text lines seen by the line-based strategies.
    pub lines: usize,
    /// Column-aware lines (reconstructed or gutter-split).
    pub layout_lines: usize,
    /// Candidates per strategy, in merge priority order.
    pub candidates: Vec<StrategyCount>,
    /// Candidates dropped as `(code, unit)` duplicates.
    pub duplicates_dropped: usize,
    /// Percentage items dropped in favour of an absolute count.
    pub percent_dropped: usize,
    /// Items left after merge.
    pub merged: usize,
    /// Items in the final report (one per code).
    pub reported: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategyCount {
    pub strategy: StrategyKind,
    pub candidates: usize,
}
