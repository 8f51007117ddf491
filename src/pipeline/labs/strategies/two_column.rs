//! `RESULTADO` / `INTERVALO DE REFERÊNCIA` blocks.
//!
//! Reports in this layout print the analyte name on its own line, the value
//! on the next, and the reference interval a few lines further down, since
//! the two columns are separate text runs. Inside a block, a name line that
//! canonicalizes is paired with the value line that follows it, then the
//! reference is searched in a short window below. Some reports keep name and
//! value on one line; that line stands alone.

use super::{
    build_item, clean_reference, read_measurement, split_label_value, starts_with_numeral,
    ExtractionStrategy, Measurement, StrategyInput,
};
use crate::models::{ExtractedItem, StrategyKind};
use crate::pipeline::labs::reference::parse_reference_interval;
use crate::pipeline::labs::synonyms::{fold_text, SynonymDictionary};

/// Lines that close a result block.
const BLOCK_END_MARKERS: &[&str] = &[
    "fontes",
    "assinado",
    "responsavel",
    "liberado",
    "conferido",
];

/// Lines that may sit between a name and its value.
const FILLER_MARKERS: &[&str] = &["material", "metodo", "amostra"];

/// Header rows scanned when looking for the reference header.
const HEADER_SPAN: usize = 4;

#[derive(Debug, Clone, Copy, Default)]
pub struct TwoColumnBlockStrategy;

impl ExtractionStrategy for TwoColumnBlockStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::TwoColumnBlock
    }

    fn extract(
        &self,
        input: &StrategyInput<'_>,
        dictionary: &SynonymDictionary,
    ) -> Vec<ExtractedItem> {
        let lines = input.lines;
        let folded: Vec<String> = lines.iter().map(|l| fold_text(l)).collect();
        let window = input.config.header_window;
        let lookahead = input.config.reference_lookahead;

        let mut items = Vec::new();
        let mut in_block = false;
        let mut i = 0;

        while i < lines.len() {
            if is_block_header(&folded, i, window) {
                in_block = true;
                i += 1;
                continue;
            }
            if !in_block {
                i += 1;
                continue;
            }
            if starts_with_marker(&folded[i], BLOCK_END_MARKERS) {
                in_block = false;
                i += 1;
                continue;
            }

            let name = lines[i].as_str();
            if starts_with_numeral(name) {
                i += 1;
                continue;
            }
            let (label, inline_value) = split_label_value(name);
            let label = label.trim_end_matches([':', '：']).trim();
            let Some(code) = dictionary.canonicalize(label) else {
                i += 1;
                continue;
            };

            // Name and value on one line: the next line is not a value line.
            if let Some(measurement) = inline_value.and_then(inline_measurement) {
                let reference = clean_reference(measurement.rest)
                    .filter(|r| parse_reference_interval(r).is_known())
                    .or_else(|| reference_below(lines, &folded, i + 1, lookahead, dictionary));
                items.push(build_item(
                    self.kind(),
                    code,
                    label,
                    measurement.value,
                    measurement.unit,
                    reference,
                    name,
                ));
                i += 1;
                continue;
            }

            let mut v = i + 1;
            while v < lines.len() && starts_with_marker(&folded[v], FILLER_MARKERS) {
                v += 1;
            }
            let Some(measurement) = lines.get(v).and_then(|l| read_measurement(l)) else {
                i += 1;
                continue;
            };

            let reference = clean_reference(measurement.rest)
                .filter(|r| parse_reference_interval(r).is_known())
                .or_else(|| reference_below(lines, &folded, v + 1, lookahead, dictionary));

            let source = format!("{} | {}", name.trim(), lines[v].trim());
            items.push(build_item(
                self.kind(),
                code,
                label,
                measurement.value,
                measurement.unit,
                reference,
                &source,
            ));
            i = v + 1;
        }

        items
    }
}

/// A value written after the name, as opposed to a name suffix such as
/// `2ª amostra`: it has a unit, stands alone, or is followed by a reference.
fn inline_measurement(text: &str) -> Option<Measurement<'_>> {
    let measurement = read_measurement(text)?;
    let plausible = measurement.unit.is_some()
        || clean_reference(measurement.rest)
            .map_or(true, |r| parse_reference_interval(&r).is_known());
    plausible.then_some(measurement)
}

/// First known reference interval in the `lookahead` lines from `start`,
/// stopping at the next analyte or at the end of the block.
fn reference_below(
    lines: &[String],
    folded: &[String],
    start: usize,
    lookahead: usize,
    dictionary: &SynonymDictionary,
) -> Option<String> {
    lines
        .iter()
        .enumerate()
        .skip(start)
        .take(lookahead)
        .take_while(|(j, line)| {
            dictionary.canonicalize(line).is_none()
                && !starts_with_marker(&folded[*j], BLOCK_END_MARKERS)
        })
        .find(|(_, line)| parse_reference_interval(line).is_known())
        .and_then(|(_, line)| clean_reference(line))
}

/// A line with `resultado` followed, within `window` characters, by
/// `intervalo de referencia` (same line or the next few).
fn is_block_header(folded: &[String], i: usize, window: usize) -> bool {
    let Some(pos) = folded[i].find("resultado") else {
        return false;
    };
    let joined = folded[i..(i + HEADER_SPAN).min(folded.len())].join(" ");
    let after = &joined[pos + "resultado".len()..];
    after
        .find("intervalo de referencia")
        .is_some_and(|gap| gap <= window)
}

fn starts_with_marker(folded_line: &str, markers: &[&str]) -> bool {
    markers.iter().any(|m| folded_line.starts_with(m))
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{run, run_text};
    use super::*;
    use crate::config::EngineConfig;
    use crate::models::{Flag, ParameterCode, ProfileHints, ReferenceInterval};

    #[test]
    fn name_value_reference_triplet() {
        let text = "RESULTADO INTERVALO DE REFERÊNCIA\nSódio\n140 mmol/L\n136 a 145";
        let items = run_text(&TwoColumnBlockStrategy, text);
        assert_eq!(items.len(), 1);
        let item = &items[0];
        assert_eq!(item.code(), ParameterCode::Sodio);
        assert_eq!(item.value().magnitude, 140.0);
        assert_eq!(item.unit(), Some("mmol/L"));
        assert_eq!(
            *item.reference_interval(),
            ReferenceInterval::Range { low: 136.0, high: 145.0 }
        );
        assert_eq!(item.flag(), Flag::Normal);
        assert_eq!(item.provenance().source, "Sódio | 140 mmol/L");
    }

    #[test]
    fn value_on_the_name_line_keeps_reference_below() {
        let text = "RESULTADO INTERVALO DE REFERÊNCIA\nSódio 140 mmol/L\n136 a 145 mmol/L";
        let items = run_text(&TwoColumnBlockStrategy, text);
        assert_eq!(items.len(), 1);
        let item = &items[0];
        assert_eq!(item.code(), ParameterCode::Sodio);
        assert_eq!(item.value().magnitude, 140.0);
        assert_eq!(item.unit(), Some("mmol/L"));
        assert_eq!(
            *item.reference_interval(),
            ReferenceInterval::Range { low: 136.0, high: 145.0 }
        );
        assert_eq!(item.flag(), Flag::Normal);
        assert_eq!(item.matched_label(), "Sódio");
        assert_eq!(item.provenance().source, "Sódio 140 mmol/L");
    }

    #[test]
    fn colon_name_line_with_value() {
        let text = "RESULTADO INTERVALO DE REFERÊNCIA\nHemoglobina: 11,2 g/dL\n12,0 a 16,0 g/dL";
        let items = run_text(&TwoColumnBlockStrategy, text);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].code(), ParameterCode::Hemoglobina);
        assert_eq!(items[0].value().magnitude, 11.2);
        assert_eq!(items[0].unit(), Some("g/dL"));
        assert_eq!(items[0].flag(), Flag::Low);
    }

    #[test]
    fn inline_lines_do_not_consume_the_next_analyte() {
        let text = "RESULTADO INTERVALO DE REFERÊNCIA\n\
                    Sódio 140 mmol/L\n\
                    Potássio 4,0 mmol/L\n\
                    3,5 a 5,1 mmol/L";
        let items = run_text(&TwoColumnBlockStrategy, text);
        let values: Vec<_> = items.iter().map(|i| (i.code(), i.value().magnitude)).collect();
        assert_eq!(
            values,
            vec![(ParameterCode::Sodio, 140.0), (ParameterCode::Potassio, 4.0)]
        );
        assert_eq!(*items[0].reference_interval(), ReferenceInterval::Unknown);
        assert_eq!(items[1].flag(), Flag::Normal);
    }

    #[test]
    fn name_suffix_is_not_a_value() {
        let text = "RESULTADO INTERVALO DE REFERÊNCIA\nSódio 2ª amostra\n140 mmol/L\n136 a 145";
        let items = run_text(&TwoColumnBlockStrategy, text);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].value().magnitude, 140.0);
        assert_eq!(items[0].flag(), Flag::Normal);
    }

    #[test]
    fn header_split_across_lines() {
        let text = "RESULTADO\nINTERVALO DE REFERÊNCIA\nPOTÁSSIO\n5,6 mmol/L\n3,5 a 5,1 mmol/L";
        let items = run_text(&TwoColumnBlockStrategy, text);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].code(), ParameterCode::Potassio);
        assert_eq!(items[0].flag(), Flag::High);
    }

    #[test]
    fn several_analytes_and_filler_lines() {
        let text = "RESULTADO INTERVALO DE REFERÊNCIA\n\
                    Ureia\n\
                    Material: soro\n\
                    32 mg/dL\n\
                    Até 50 mg/dL\n\
                    Creatinina\n\
                    0,9 mg/dL\n\
                    0,6 a 1,3 mg/dL";
        let items = run_text(&TwoColumnBlockStrategy, text);
        let codes: Vec<_> = items.iter().map(|i| i.code()).collect();
        assert_eq!(codes, vec![ParameterCode::Ureia, ParameterCode::Creatinina]);
        assert_eq!(
            *items[0].reference_interval(),
            ReferenceInterval::UpperBound { high: 50.0 }
        );
        assert_eq!(items[1].flag(), Flag::Normal);
    }

    #[test]
    fn reference_search_stops_at_next_analyte() {
        let text =
            "RESULTADO INTERVALO DE REFERÊNCIA\nSódio\n140 mmol/L\nPotássio\n4,0 mmol/L\n3,5 a 5,1";
        let items = run_text(&TwoColumnBlockStrategy, text);
        assert_eq!(items.len(), 2);
        assert_eq!(*items[0].reference_interval(), ReferenceInterval::Unknown);
        assert_eq!(items[0].flag(), Flag::Indeterminate);
        assert_eq!(items[1].flag(), Flag::Normal);
    }

    #[test]
    fn reference_outside_lookahead_is_ignored() {
        let config = EngineConfig {
            reference_lookahead: 1,
            ..Default::default()
        };
        let text = "RESULTADO INTERVALO DE REFERÊNCIA\nSódio\n140 mmol/L\nobs\n136 a 145";
        let items = run(&TwoColumnBlockStrategy, text, &[], &ProfileHints::default(), &config);
        assert_eq!(*items[0].reference_interval(), ReferenceInterval::Unknown);
    }

    #[test]
    fn nothing_outside_a_block() {
        let items = run_text(&TwoColumnBlockStrategy, "Sódio\n140 mmol/L\n136 a 145");
        assert!(items.is_empty());
    }

    #[test]
    fn block_end_marker_closes_block() {
        let text = "RESULTADO INTERVALO DE REFERÊNCIA\nLiberado por Dr. X\nSódio\n140 mmol/L";
        assert!(run_text(&TwoColumnBlockStrategy, text).is_empty());
    }

    #[test]
    fn header_window_limits_distance() {
        let config = EngineConfig {
            header_window: 5,
            ..Default::default()
        };
        let text = "RESULTADO de exames laboratoriais INTERVALO DE REFERÊNCIA\nSódio\n140 mmol/L";
        let items = run(&TwoColumnBlockStrategy, text, &[], &ProfileHints::default(), &config);
        assert!(items.is_empty());
    }
}
