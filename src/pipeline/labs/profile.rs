//! Report profile: which laboratory, which layout conventions.
//!
//! Hints only steer strategies (the blood-gas extractor is gated on a gas
//! panel) and are reported in diagnostics. Nothing fails when no profile
//! is recognized.

use std::sync::LazyLock;

use regex::Regex;

use super::synonyms::fold_text;
use crate::models::ProfileHints;
use crate::pipeline::extraction::{count_tabular_lines, ReconstructedLine};

/// `(pattern on folded text, display name)`; Fleury first since the DASA
/// family includes generic words such as "exame".
static LABORATORIES: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        (r"\bgrupo\s+fleury\b|\bfleury\b|\ba\+\s*medicina\b", "Fleury"),
        (r"\bhermes\s+pardini\b", "Hermes Pardini"),
        (r"\balbert\s+einstein\b", "Albert Einstein"),
        (r"\bsabin\b", "Sabin"),
        (r"\brede\s+d\s?['\x{2019}]?\s?or\b", "Rede D'Or"),
        (r"\bsao\s+luiz\b", "São Luiz"),
        (r"\bdelboni\b", "Delboni"),
        (r"\blavoisier\b", "Lavoisier"),
        (r"\bsalomao(?:\s+zoppi)?\b", "Salomão Zoppi"),
        (r"\bbronstein\b", "Bronstein"),
        (r"\bdasa\b", "DASA"),
    ]
    .into_iter()
    .filter_map(|(pattern, name)| Regex::new(pattern).ok().map(|re| (re, name)))
    .collect()
});

static RESULT_HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*resultados?\b").expect("valid regex"));

static REFERENCE_HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)(?:^|\s)(?:intervalo|valores?)\s+de\s+referencia").expect("valid regex")
});

static BLOOD_GAS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bgasometria\b|\bsangue\s+(?:arterial|venoso)\b|\bgases\s+sanguineos\b")
        .expect("valid regex")
});

/// Inspect the sanitized text and the layout lines.
pub fn detect_profile(text: &str, layout_lines: &[ReconstructedLine]) -> ProfileHints {
    let folded_lines: Vec<String> = text.lines().map(fold_text).collect();
    let folded = folded_lines.join("\n");

    let laboratory = LABORATORIES
        .iter()
        .find(|(re, _)| re.is_match(&folded))
        .map(|(_, name)| name.to_string());

    let result_blocks =
        RESULT_HEADER_RE.is_match(&folded) && REFERENCE_HEADER_RE.is_match(&folded);

    let dasa_layout = laboratory.as_deref() == Some("DASA")
        || folded.contains("serie vermelha")
        || folded.contains("intervalo de referencia");

    let hints = ProfileHints {
        laboratory,
        dasa_layout,
        result_blocks,
        blood_gas: BLOOD_GAS_RE.is_match(&folded),
        tabular_lines: count_tabular_lines(layout_lines),
    };

    tracing::debug!(
        laboratory = hints.laboratory.as_deref().unwrap_or("unknown"),
        result_blocks = hints.result_blocks,
        blood_gas = hints.blood_gas,
        tabular_lines = hints.tabular_lines,
        "Detected report profile"
    );
    hints
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_laboratory_names() {
        let hints = detect_profile("FLEURY Medicina e Saúde\nHemograma", &[]);
        assert_eq!(hints.laboratory.as_deref(), Some("Fleury"));

        let hints = detect_profile("Hospital Rede D'Or São Luiz", &[]);
        assert_eq!(hints.laboratory.as_deref(), Some("Rede D'Or"));

        let hints = detect_profile("Laboratório Sabin", &[]);
        assert_eq!(hints.laboratory.as_deref(), Some("Sabin"));
    }

    #[test]
    fn no_laboratory_for_plain_text() {
        let hints = detect_profile("Potássio: 4,7 mmol/L", &[]);
        assert_eq!(hints.laboratory, None);
        assert!(!hints.result_blocks);
        assert!(!hints.blood_gas);
        assert!(!hints.dasa_layout);
    }

    #[test]
    fn result_blocks_need_both_headers() {
        let text = "SÓDIO\nRESULTADO\nINTERVALO DE REFERÊNCIA\n140 mmol/L";
        let hints = detect_profile(text, &[]);
        assert!(hints.result_blocks);
        assert!(hints.dasa_layout);

        let hints = detect_profile("RESULTADO\n140", &[]);
        assert!(!hints.result_blocks);
    }

    #[test]
    fn blood_gas_panel() {
        let hints = detect_profile("GASOMETRIA ARTERIAL\npH 7,40", &[]);
        assert!(hints.blood_gas);
        let hints = detect_profile("Material: sangue venoso", &[]);
        assert!(hints.blood_gas);
    }

    #[test]
    fn counts_tabular_layout_lines() {
        let lines = vec![
            ReconstructedLine::new(1, "Sódio\t140 mmol/L\t136 a 145"),
            ReconstructedLine::new(1, "Laudo"),
        ];
        assert_eq!(detect_profile("", &lines).tabular_lines, 1);
    }
}
