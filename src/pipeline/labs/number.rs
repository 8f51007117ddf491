//! Locale-aware numeral parsing (`4,7`, `1.234,56`, `7.000`, `<0,012`).

use std::sync::LazyLock;

use regex::Regex;

use crate::models::{NumericValue, Qualifier};

static PLAIN_NUMERAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-+]?(?:\d+\.?\d*|\.\d+)$").expect("valid regex"));

/// Parse a regional numeral into a value with its inequality qualifier.
///
/// Separators: with both `.` and `,` present, the later one is the decimal
/// mark and the other is grouping. A lone `,` (once) is decimal. A lone `.`
/// is decimal unless exactly three digits follow it and the integer part is
/// not zero (`7.000` is seven thousand, `0.012` and `7.4` are decimals).
/// Repeated marks of one kind are grouping (`1.234.567`, `1,234,567`).
/// Invalid input yields `None`.
pub fn parse_number(text: &str) -> Option<NumericValue> {
    let mut s: String = text
        .trim()
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| match c {
            '\u{2212}' | '\u{2013}' | '\u{2012}' | '\u{FE63}' | '\u{FF0D}' => '-',
            c => c,
        })
        .collect();

    let qualifier = if let Some(rest) = s.strip_prefix('<') {
        s = rest.to_string();
        Qualifier::LessThan
    } else if let Some(rest) = s.strip_prefix('>') {
        s = rest.to_string();
        Qualifier::GreaterThan
    } else {
        Qualifier::None
    };

    let normalized = normalize_separators(&s);
    if !PLAIN_NUMERAL.is_match(&normalized) {
        return None;
    }

    let magnitude: f64 = normalized.parse().ok()?;
    magnitude.is_finite().then_some(NumericValue {
        magnitude,
        qualifier,
    })
}

/// Rewrite to a plain `1234.56` numeral.
fn normalize_separators(s: &str) -> String {
    let last_dot = s.rfind('.');
    let last_comma = s.rfind(',');

    match (last_dot, last_comma) {
        (Some(dot), Some(comma)) => {
            let (decimal, grouping) = if dot > comma { ('.', ',') } else { (',', '.') };
            s.chars()
                .filter(|c| *c != grouping)
                .map(|c| if c == decimal { '.' } else { c })
                .collect()
        }
        (None, Some(_)) => {
            if s.matches(',').count() == 1 {
                s.replace(',', ".")
            } else {
                s.replace(',', "")
            }
        }
        (Some(dot), None) => {
            if s.matches('.').count() > 1 || is_thousands_group(s, dot) {
                s.replace('.', "")
            } else {
                s.to_string()
            }
        }
        (None, None) => s.to_string(),
    }
}

fn is_thousands_group(s: &str, dot: usize) -> bool {
    let integer = s[..dot].trim_start_matches(['-', '+']);
    let fraction = &s[dot + 1..];
    fraction.len() == 3
        && fraction.chars().all(|c| c.is_ascii_digit())
        && !integer.is_empty()
        && integer.chars().all(|c| c.is_ascii_digit())
        && !integer.trim_start_matches('0').is_empty()
}
