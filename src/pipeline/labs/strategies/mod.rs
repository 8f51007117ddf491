//! Extraction strategies.
//!
//! Each strategy is one matching policy over the same immutable input. They
//! share no state and may run in any order; `merge` decides precedence.

pub mod blood_gas;
pub mod colon_line;
pub mod generic;
pub mod tab_columns;
pub mod two_column;

use std::sync::LazyLock;

use regex::Regex;

use super::number::parse_number;
use super::reference::parse_reference_interval;
use super::synonyms::{fold_text, SynonymDictionary};
use super::units::{is_absolute_count, is_count_per_ml, scale_in_text, unit_token};
use crate::config::EngineConfig;
use crate::models::{
    ExtractedItem, NumericValue, ParameterCode, ProfileHints, Provenance, ReferenceInterval,
    StrategyKind,
};
use crate::pipeline::extraction::ReconstructedLine;

pub use blood_gas::BloodGasStrategy;
pub use colon_line::ColonLineStrategy;
pub use generic::GenericStrategy;
pub use tab_columns::TabColumnsStrategy;
pub use two_column::TwoColumnBlockStrategy;

/// Everything a strategy may read.
#[derive(Debug, Clone, Copy)]
pub struct StrategyInput<'a> {
    /// Sanitized text lines, columns flattened to single spaces.
    pub lines: &'a [String],
    /// Column-aware lines (reconstructed from tokens, or gutter-split).
    pub layout_lines: &'a [ReconstructedLine],
    pub profile: &'a ProfileHints,
    pub config: &'a EngineConfig,
}

/// One independent heuristic for locating analyte measurements.
pub trait ExtractionStrategy: Send + Sync {
    fn kind(&self) -> StrategyKind;

    /// Candidates in document order. Deterministic for a given input.
    fn extract(
        &self,
        input: &StrategyInput<'_>,
        dictionary: &SynonymDictionary,
    ) -> Vec<ExtractedItem>;
}

/// All strategies, in merge priority order.
pub fn default_strategies() -> Vec<Box<dyn ExtractionStrategy>> {
    vec![
        Box::new(TwoColumnBlockStrategy),
        Box::new(BloodGasStrategy),
        Box::new(TabColumnsStrategy),
        Box::new(ColonLineStrategy),
        Box::new(GenericStrategy),
    ]
}

// ═══════════════════════════════════════════
// Shared helpers
// ═══════════════════════════════════════════

/// A value with an inequality glyph allowed in front: `<0,012`, `> 90`.
pub(crate) const VALUE_PATTERN: &str = r"[<>]\s?[-+−]?\d+(?:[.,]\d+)*|[-+−]?\d+(?:[.,]\d+)*";

static LEADING_VALUE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"^\s*(?:{VALUE_PATTERN})")).expect("valid regex")
});

static NUMERAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+(?:[.,]\d+)*").expect("valid regex"));

/// A value read from the head of some text, with its unit.
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement<'a> {
    /// Already scaled to `unit` (`216 mil/mm³` reads as `216000 /mm³`).
    pub value: NumericValue,
    pub unit: Option<String>,
    /// Text after the value and unit.
    pub rest: &'a str,
}

/// Read `value [unit]` at the start of `text`. A numeral that does not
/// parse drops the whole read.
pub fn read_measurement(text: &str) -> Option<Measurement<'_>> {
    let m = LEADING_VALUE_RE.find(text)?;
    let after = &text[m.end()..];
    let value = parse_number(m.as_str())?;

    Some(match unit_token(after) {
        Some(unit) => Measurement {
            value: value.scaled(unit.scale),
            unit: Some(unit.canonical),
            rest: &after[unit.consumed..],
        },
        None => Measurement {
            value,
            unit: None,
            rest: after,
        },
    })
}

/// The first `value unit` pair in `text` whose unit is an absolute cell
/// count (`/µL`, `/mm³`). Returns it with its byte offset.
pub fn find_absolute_count(text: &str) -> Option<(usize, Measurement<'_>)> {
    NUMERAL_RE.find_iter(text).find_map(|m| {
        let measurement = read_measurement(&text[m.start()..])?;
        is_absolute_count(measurement.unit.as_deref()).then_some((m.start(), measurement))
    })
}

/// Reference text for an absolute count that follows a percentage on the
/// same line: `40 a 70 % 1.800 a 7.700 /mm³` keeps what follows the last `%`.
pub fn absolute_reference(rest: &str) -> &str {
    rest.rfind('%').map_or(rest, |i| &rest[i + 1..])
}

pub fn count_numerals(text: &str) -> usize {
    NUMERAL_RE.find_iter(text).count()
}

pub fn starts_with_numeral(text: &str) -> bool {
    LEADING_VALUE_RE.is_match(text)
}

/// `Sódio 140 mmol/L` in one piece: the label, and the value text when a
/// later word starts with a numeral. Numerals inside an open bracket belong
/// to the label (`TFG (CKD-EPI 2021)`).
pub fn split_label_value(text: &str) -> (&str, Option<&str>) {
    let mut offset = 0;
    for (n, word) in text.split(' ').enumerate() {
        let head = &text[..offset];
        let open = head.matches('(').count() > head.matches(')').count();
        if n > 0 && !open && starts_with_numeral(word) {
            return (head.trim_end(), Some(&text[offset..]));
        }
        offset += word.len() + 1;
    }
    (text, None)
}

/// Tidy reference text: surrounding whitespace, brackets and separators.
pub fn clean_reference(text: &str) -> Option<String> {
    let cleaned = text
        .trim()
        .trim_matches(|c: char| c.is_whitespace() || matches!(c, '(' | ')' | '[' | ']' | ';' | ','))
        .trim();
    (!cleaned.is_empty()).then(|| cleaned.to_string())
}

/// Urinalysis sediment reported under a blood-count name.
pub fn is_urine_context(code: ParameterCode, label: &str, unit: Option<&str>) -> bool {
    code.is_hematology_cell() && (fold_text(label).contains("urina") || is_count_per_ml(unit))
}

/// Build an item, parsing the reference text when present.
pub fn build_item(
    kind: StrategyKind,
    code: ParameterCode,
    label: &str,
    value: NumericValue,
    unit: Option<String>,
    reference_text: Option<String>,
    source: &str,
) -> ExtractedItem {
    let interval = reference_text
        .as_deref()
        .map(|text| parse_reference_interval(text).scaled(scale_in_text(text)))
        .unwrap_or(ReferenceInterval::Unknown);
    ExtractedItem::new(
        code,
        label.trim(),
        value,
        unit,
        reference_text,
        interval,
        Provenance::new(kind, source.trim()),
    )
}

/// For a differential count read as a percentage, the absolute count that
/// follows it in `rest`, as a second item.
pub fn absolute_companion(
    kind: StrategyKind,
    code: ParameterCode,
    label: &str,
    rest: &str,
    source: &str,
) -> Option<ExtractedItem> {
    let (_, count) = find_absolute_count(rest)?;
    let reference = clean_reference(absolute_reference(count.rest));
    Some(build_item(kind, code, label, count.value, count.unit, reference, source))
}
