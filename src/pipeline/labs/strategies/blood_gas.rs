//! Arterial/venous blood-gas panels.
//!
//! Gas reports use compact notation (`pH`, `pCO2`, `HCO3-`, `BE`, `SatO2`),
//! often several parameters to a line, which the generic grabber cannot
//! split. Each code has its own label pattern; a line is cut into segments
//! at label matches and each segment yields at most one value. Units are
//! rarely delimited, so a missing unit is inferred from the segment text.

use std::sync::LazyLock;

use regex::Regex;

use super::{build_item, clean_reference, ExtractionStrategy, StrategyInput, VALUE_PATTERN};
use crate::models::{ExtractedItem, NumericValue, ParameterCode, StrategyKind};
use crate::pipeline::labs::number::parse_number;
use crate::pipeline::labs::synonyms::{fold_text, SynonymDictionary};
use crate::pipeline::labs::units::match_unit;

static GAS_LABELS: LazyLock<Vec<(ParameterCode, Regex)>> = LazyLock::new(|| {
    [
        (ParameterCode::GasoPh, r"(?i)\bph\b"),
        (ParameterCode::GasoPco2, r"(?i)\bp\s?co\s?2\b"),
        (ParameterCode::GasoPo2, r"(?i)\bp\s?o\s?2\b"),
        (ParameterCode::GasoHco3, r"(?i)\bhco\s?3\b|\bbicarbonato\b"),
        (
            ParameterCode::GasoBe,
            r"(?i)\bexcesso\s+de\s+bases?\b|\bbase\s+excess\b|\bbe(?:b|ecf)?\b",
        ),
        (
            ParameterCode::GasoSat,
            r"(?i)\bsatura[cç][aã]o\s+(?:de\s+)?(?:o\s?2|oxig[eê]nio)\b|\bsat\.?\s?o\s?2\b|\bs[pa]?o\s?2\b",
        ),
    ]
    .into_iter()
    .map(|(code, pattern)| (code, Regex::new(pattern).expect("valid regex")))
    .collect()
});

static VALUE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(VALUE_PATTERN).expect("valid regex"));

/// `(substring of the lower-cased segment, unit)`, first hit wins.
const CONTEXT_UNITS: &[(&str, &str)] = &[
    ("mmhg", "mmHg"),
    ("mmol/l", "mmol/L"),
    ("meq/l", "mEq/L"),
    ("%", "%"),
];

/// A label hit: code and byte span in the line.
#[derive(Debug, Clone, Copy)]
struct LabelHit {
    code: ParameterCode,
    start: usize,
    end: usize,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BloodGasStrategy;

impl ExtractionStrategy for BloodGasStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::BloodGas
    }

    fn extract(
        &self,
        input: &StrategyInput<'_>,
        _dictionary: &SynonymDictionary,
    ) -> Vec<ExtractedItem> {
        if input.config.blood_gas_requires_hint && !input.profile.blood_gas {
            return Vec::new();
        }

        let lines = input.lines;
        let mut items = Vec::new();

        for (i, line) in lines.iter().enumerate() {
            if fold_text(line).contains("urin") {
                continue;
            }
            let hits = label_hits(line);

            for (k, hit) in hits.iter().enumerate() {
                let segment_end = hits.get(k + 1).map_or(line.len(), |next| next.start);
                let segment = &line[hit.end..segment_end];
                let label = &line[hit.start..hit.end];

                let is_last = k + 1 == hits.len();
                let (segment, source) = if !VALUE_RE.is_match(segment) && is_last {
                    let Some(next) = lines.get(i + 1) else {
                        continue;
                    };
                    // The next line's own labels are not values (`pCO2` holds a 2).
                    let own_label = label_hits(next).first().map_or(next.len(), |h| h.start);
                    let source = format!("{} | {}", line.trim(), next.trim());
                    (&next[..own_label], source)
                } else {
                    (segment, line.trim().to_string())
                };

                let Some(reading) = read_gas_value(hit.code, segment) else {
                    tracing::trace!(line = %line, code = %hit.code, "No gas value in segment");
                    continue;
                };
                items.push(build_item(
                    self.kind(),
                    hit.code,
                    label,
                    reading.value,
                    reading.unit,
                    clean_reference(reading.rest),
                    &source,
                ));
            }
        }

        items
    }
}

/// Label matches sorted by position. Overlapping matches keep the earlier
/// one; consecutive hits for the same code (`Excesso de base (BE)`) count
/// once.
fn label_hits(line: &str) -> Vec<LabelHit> {
    let mut all: Vec<LabelHit> = GAS_LABELS
        .iter()
        .flat_map(|(code, re)| {
            re.find_iter(line).map(|m| LabelHit {
                code: *code,
                start: m.start(),
                end: m.end(),
            })
        })
        .collect();
    all.sort_by_key(|h| (h.start, std::cmp::Reverse(h.end)));

    let mut hits: Vec<LabelHit> = Vec::with_capacity(all.len());
    for hit in all {
        match hits.last() {
            Some(prev) if hit.start < prev.end => {}
            Some(prev) if prev.code == hit.code => {}
            _ => hits.push(hit),
        }
    }
    hits
}

struct GasReading<'a> {
    value: NumericValue,
    unit: Option<String>,
    rest: &'a str,
}

/// First value in the segment, with a known unit right after it or one
/// inferred from the segment. pH is unitless.
fn read_gas_value(code: ParameterCode, segment: &str) -> Option<GasReading<'_>> {
    let m = VALUE_RE.find(segment)?;
    let value = parse_number(m.as_str())?;
    let after = &segment[m.end()..];

    if code == ParameterCode::GasoPh {
        return Some(GasReading {
            value,
            unit: None,
            rest: after,
        });
    }

    if let Some(unit) = match_unit(after) {
        return Some(GasReading {
            value: value.scaled(unit.scale),
            unit: Some(unit.canonical),
            rest: &after[unit.consumed..],
        });
    }

    let lowered = segment.to_lowercase();
    let unit = CONTEXT_UNITS
        .iter()
        .find(|(needle, _)| lowered.contains(needle))
        .map(|(_, unit)| unit.to_string());
    Some(GasReading {
        value,
        unit,
        rest: after,
    })
}
