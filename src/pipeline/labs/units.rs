//! Unit recognition and canonical spelling.
//!
//! Reports spell the same unit many ways (`mg/dl`, `MG/DL`, `mg/dL`; `uL`,
//! `µL`, `μL`). Known spellings are matched longest-first at the start of
//! the text following a value and mapped to one canonical form. A few are
//! scaled: `mil/mm³` becomes `/mm³` with the value ×1000.

use std::sync::LazyLock;

/// A recognized unit at the head of some text.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitMatch {
    pub canonical: String,
    /// Multiply the value by this when re-expressing in `canonical`.
    pub scale: f64,
    /// Bytes of the input consumed, leading whitespace included.
    pub consumed: usize,
}

/// `(spelling, canonical, scale)`. Spellings are compared case-insensitively.
const KNOWN_UNITS: &[(&str, &str, f64)] = &[
    // Thousands per volume, re-expressed as plain counts
    ("mil/mm³", "/mm³", 1000.0),
    ("mil/mm3", "/mm³", 1000.0),
    ("mil/µl", "/µL", 1000.0),
    ("mil/ul", "/µL", 1000.0),
    ("milhões/µl", "10^6/µL", 1.0),
    ("milhões/ul", "10^6/µL", 1.0),
    ("milhões/mm³", "10^6/µL", 1.0),
    ("milhões/mm3", "10^6/µL", 1.0),
    ("milhoes/mm3", "10^6/µL", 1.0),
    ("x10^6/µl", "10^6/µL", 1.0),
    ("x10^6/ul", "10^6/µL", 1.0),
    ("10^6/µl", "10^6/µL", 1.0),
    ("10^6/ul", "10^6/µL", 1.0),
    ("10^6/mm³", "10^6/µL", 1.0),
    ("10^6/mm3", "10^6/µL", 1.0),
    ("x10^3/µl", "10^3/µL", 1.0),
    ("x10^3/ul", "10^3/µL", 1.0),
    ("10^3/µl", "10^3/µL", 1.0),
    ("10^3/ul", "10^3/µL", 1.0),
    ("10³/µl", "10^3/µL", 1.0),
    ("/µl", "/µL", 1.0),
    ("/ul", "/µL", 1.0),
    ("/mm³", "/mm³", 1.0),
    ("/mm3", "/mm³", 1.0),
    ("/ml", "/mL", 1.0),
    // Concentrations
    ("mg/dl", "mg/dL", 1.0),
    ("g/dl", "g/dL", 1.0),
    ("µg/dl", "µg/dL", 1.0),
    ("ug/dl", "µg/dL", 1.0),
    ("ng/dl", "ng/dL", 1.0),
    ("ng/ml", "ng/mL", 1.0),
    ("pg/ml", "pg/mL", 1.0),
    ("mg/l", "mg/L", 1.0),
    ("g/l", "g/L", 1.0),
    ("mmol/l", "mmol/L", 1.0),
    ("µmol/l", "µmol/L", 1.0),
    ("umol/l", "µmol/L", 1.0),
    ("meq/l", "mEq/L", 1.0),
    ("µui/ml", "µUI/mL", 1.0),
    ("uui/ml", "µUI/mL", 1.0),
    ("mui/l", "mUI/L", 1.0),
    ("ui/ml", "UI/mL", 1.0),
    ("ui/l", "UI/L", 1.0),
    ("u/l", "U/L", 1.0),
    // Renal function
    ("ml/min/1,73m²", "mL/min/1,73m²", 1.0),
    ("ml/min/1,73 m²", "mL/min/1,73m²", 1.0),
    ("ml/min/1.73m²", "mL/min/1,73m²", 1.0),
    ("ml/min/1,73m2", "mL/min/1,73m²", 1.0),
    ("ml/min/1.73m2", "mL/min/1,73m²", 1.0),
    ("ml/min", "mL/min", 1.0),
    // Gas, indices, time
    ("mmhg", "mmHg", 1.0),
    ("fl", "fL", 1.0),
    ("pg", "pg", 1.0),
    ("segundos", "s", 1.0),
    ("seg", "s", 1.0),
    ("%", "%", 1.0),
];

static SORTED_UNITS: LazyLock<Vec<(Vec<char>, &'static str, f64)>> = LazyLock::new(|| {
    let mut units: Vec<(Vec<char>, &'static str, f64)> = KNOWN_UNITS
        .iter()
        .map(|(spelling, canonical, scale)| (spelling.chars().collect(), *canonical, *scale))
        .collect();
    units.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
    units
});

/// Words that open a reference phrase and so are never units.
const REFERENCE_WORDS: &[&str] = &[
    "a", "de", "e", "ate", "até", "entre", "inferior", "superior", "menor", "maior", "up",
    "to", "from", "less", "lower", "greater", "higher", "below", "above", "ref", "vr",
    "valor", "valores", "referência", "referencia", "intervalo", "normal", "resultado",
];

/// Recognize a known unit at the start of `text` (after optional spaces).
pub fn match_unit(text: &str) -> Option<UnitMatch> {
    let trimmed = text.trim_start();
    let lead = text.len() - trimmed.len();
    let chars: Vec<char> = trimmed.chars().collect();

    SORTED_UNITS.iter().find_map(|(spelling, canonical, scale)| {
        if chars.len() < spelling.len() {
            return None;
        }
        let head = &chars[..spelling.len()];
        if !head.iter().zip(spelling).all(|(a, b)| unit_char_eq(*a, *b)) {
            return None;
        }
        let boundary = chars
            .get(spelling.len())
            .map_or(true, |c| !c.is_alphanumeric());
        if !boundary {
            return None;
        }
        let bytes: usize = head.iter().map(|c| c.len_utf8()).sum();
        Some(UnitMatch {
            canonical: canonical.to_string(),
            scale: *scale,
            consumed: lead + bytes,
        })
    })
}

fn unit_char_eq(text: char, spelling: char) -> bool {
    let fold = |c: char| match c {
        'μ' => 'µ',
        c => c.to_lowercase().next().unwrap_or(c),
    };
    fold(text) == fold(spelling)
}

/// The unit following a value: a known unit when recognized, otherwise the
/// first token if it looks like a unit (has a letter and is not a
/// reference keyword). Returns the unit, its scale, and the bytes
/// consumed.
pub fn unit_token(text: &str) -> Option<UnitMatch> {
    if let Some(known) = match_unit(text) {
        return Some(known);
    }

    let trimmed = text.trim_start();
    let lead = text.len() - trimmed.len();
    let token = trimmed.split_whitespace().next()?;
    let cleaned = token.trim_end_matches([',', ';', '.', ':']);

    if cleaned.chars().count() < 2
        || cleaned.starts_with(['(', '[', '<', '>', '≤', '≥', '-'])
        || cleaned.chars().next().is_some_and(|c| c.is_ascii_digit())
        || !cleaned.chars().any(char::is_alphabetic)
        || REFERENCE_WORDS.contains(&cleaned.to_lowercase().as_str())
    {
        return None;
    }

    Some(UnitMatch {
        canonical: canonical_spelling(cleaned),
        scale: 1.0,
        consumed: lead + token.len(),
    })
}

/// Light cleanup for units outside the known table.
pub fn canonical_spelling(unit: &str) -> String {
    unit.trim()
        .replace(['⁄', '\\'], "/")
        .replace("uL", "µL")
        .replace('μ', "µ")
        .replace("mm3", "mm³")
}

/// Scale of the first scaled unit spelled anywhere in `text`, or 1.
/// Reference text written as `150 a 450 mil/mm³` must be scaled like the
/// value it bounds.
pub fn scale_in_text(text: &str) -> f64 {
    let lowered = text.to_lowercase().replace('μ', "µ");
    KNOWN_UNITS
        .iter()
        .filter(|(_, _, scale)| *scale != 1.0)
        .find(|(spelling, _, _)| lowered.contains(spelling))
        .map_or(1.0, |(_, _, scale)| *scale)
}

pub fn is_percent(unit: Option<&str>) -> bool {
    unit.is_some_and(|u| u.trim() == "%")
}

/// Absolute cell counts: per µL or per mm³, with or without a power prefix.
pub fn is_absolute_count(unit: Option<&str>) -> bool {
    unit.is_some_and(|u| {
        let u = u.to_lowercase().replace('μ', "µ");
        ["/µl", "/ul", "/mm³", "/mm3"].iter().any(|s| u.ends_with(s))
    })
}

/// Counts per mL, the urinalysis sediment convention.
pub fn is_count_per_ml(unit: Option<&str>) -> bool {
    unit.is_some_and(|u| {
        let u = u.to_lowercase();
        u.starts_with('/') && u.ends_with("/ml")
    })
}
