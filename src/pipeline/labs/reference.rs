//! Reference-interval phrases → [`ReferenceInterval`].
//!
//! Shapes, tried in order (first match wins):
//! 1. ranges: `de X a Y`, `de X até Y`, `X a Y`, `X - Y`, `entre X e Y`,
//!    `from X to Y`;
//! 2. upper bounds: `até Y`, `inferior a Y`, `menor que Y`, `< Y`, `≤ Y`,
//!    `up to Y`, `lower/less than Y`, `below Y`;
//! 3. lower bounds: `superior a X`, `maior que X`, `> X`, `≥ X`,
//!    `greater/higher than X`, `above X`.
//!
//! A captured numeral that does not parse makes the whole interval
//! `Unknown`; so does text matching none of the shapes.

use std::sync::LazyLock;

use regex::Regex;

use super::number::parse_number;
use super::synonyms::fold_text;
use crate::models::ReferenceInterval;

/// Numeral as it appears in reference text: optional sign, digits with
/// `.`/`,` groups.
const NUM: &str = r"[-+]?\d+(?:[.,]\d+)*";

static RANGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?:\b(?:de|from|entre)\s+)?({NUM})(?:\s+(?:a|ate|to|e)\s+|\s*-\s*)({NUM})"
    ))
    .expect("valid regex")
});

static UPPER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?:\b(?:inferior|menor)(?:\s+ou\s+igual)?\s+(?:a|que)|\bate|\babaixo\s+de|\bup\s+to|\b(?:lower|less)\s+than|\bbelow|<=|<)\s*({NUM})"
    ))
    .expect("valid regex")
});

static LOWER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?:\b(?:superior|maior)(?:\s+ou\s+igual)?\s+(?:a|que)|\bacima\s+de|\b(?:greater|higher)\s+than|\babove|>=|>)\s*({NUM})"
    ))
    .expect("valid regex")
});

/// Parse a free-text reference phrase.
pub fn parse_reference_interval(text: &str) -> ReferenceInterval {
    let folded = fold_reference(text);
    if folded.is_empty() {
        return ReferenceInterval::Unknown;
    }

    if let Some(caps) = RANGE_RE.captures(&folded) {
        return match (numeral(&caps[1]), numeral(&caps[2])) {
            (Some(a), Some(b)) if a <= b => ReferenceInterval::Range { low: a, high: b },
            (Some(a), Some(b)) => ReferenceInterval::Range { low: b, high: a },
            _ => ReferenceInterval::Unknown,
        };
    }

    if let Some(caps) = UPPER_RE.captures(&folded) {
        return numeral(&caps[1])
            .map(|high| ReferenceInterval::UpperBound { high })
            .unwrap_or(ReferenceInterval::Unknown);
    }

    if let Some(caps) = LOWER_RE.captures(&folded) {
        return numeral(&caps[1])
            .map(|low| ReferenceInterval::LowerBound { low })
            .unwrap_or(ReferenceInterval::Unknown);
    }

    ReferenceInterval::Unknown
}

/// Lower-case, strip accents, unify dashes and inequality glyphs.
fn fold_reference(text: &str) -> String {
    fold_text(text)
        .replace(['\u{2013}', '\u{2014}', '\u{2012}'], "-")
        .replace('≤', "<=")
        .replace('≥', ">=")
}

fn numeral(text: &str) -> Option<f64> {
    parse_number(text).map(|v| v.magnitude)
}
