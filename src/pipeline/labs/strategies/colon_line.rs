use std::sync::LazyLock;

use regex::Regex;

use super::{
    build_item, clean_reference, count_numerals, is_urine_context, read_measurement,
    ExtractionStrategy, StrategyInput,
};
use crate::models::{ExtractedItem, StrategyKind};
use crate::pipeline::labs::synonyms::SynonymDictionary;

static COLON_LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| {
        Regex::new(r"^(?P<label>[^:：]+)[:：]\s*(?P<rest>.+)$").expect("valid regex")
    });

/// `<label>: <value> [unit] [reference]` on a single line.
///
/// Lines whose remainder holds more than `max_colon_numerals` numerals are
/// evolution tables (one analyte, many dates) and are skipped.
#[derive(Debug, Clone, Copy, Default)]
pub struct ColonLineStrategy;

impl ExtractionStrategy for ColonLineStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::ColonLine
    }

    fn extract(
        &self,
        input: &StrategyInput<'_>,
        dictionary: &SynonymDictionary,
    ) -> Vec<ExtractedItem> {
        let max_numerals = input.config.max_colon_numerals;
        let mut items = Vec::new();

        for line in input.lines {
            let Some(caps) = COLON_LINE_RE.captures(line) else {
                continue;
            };
            let label = caps["label"].trim();
            let rest = caps["rest"].trim();

            if count_numerals(rest) > max_numerals {
                tracing::trace!(line = %line, "Skipped evolution-table line");
                continue;
            }
            let Some(code) = dictionary.canonicalize(label) else {
                continue;
            };
            let Some(measurement) = read_measurement(rest) else {
                continue;
            };
            if is_urine_context(code, label, measurement.unit.as_deref()) {
                continue;
            }

            items.push(build_item(
                self.kind(),
                code,
                label,
                measurement.value,
                measurement.unit,
                clean_reference(measurement.rest),
                line,
            ));
        }

        items
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{run, run_text};
    use super::*;
    use crate::config::EngineConfig;
    use crate::models::{Flag, ParameterCode, ProfileHints, Qualifier, ReferenceInterval};

    #[test]
    fn value_with_upper_bound() {
        let items = run_text(&ColonLineStrategy, "Ureia: 58 mg/dL (até 50)");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].code(), ParameterCode::Ureia);
        assert_eq!(items[0].unit(), Some("mg/dL"));
        assert_eq!(
            *items[0].reference_interval(),
            ReferenceInterval::UpperBound { high: 50.0 }
        );
        assert_eq!(items[0].flag(), Flag::High);
        assert_eq!(items[0].provenance().strategy, StrategyKind::ColonLine);
    }

    #[test]
    fn fullwidth_colon_and_qualifier() {
        let items = run_text(&ColonLineStrategy, "Troponina：<0,012 ng/mL");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].value().qualifier, Qualifier::LessThan);
        assert_eq!(items[0].flag(), Flag::Indeterminate);
    }

    #[test]
    fn evolution_tables_are_rejected() {
        let items = run_text(&ColonLineStrategy, "Creatinina: 1,2 1,4 1,1 1,3");
        assert!(items.is_empty());
        // a full range pushes the remainder past two numerals as well
        let items = run_text(&ColonLineStrategy, "Potássio: 4,7 mmol/L (de 3,5 a 5,1)");
        assert!(items.is_empty());
    }

    #[test]
    fn numeral_limit_is_configurable() {
        let config = EngineConfig {
            max_colon_numerals: 3,
            ..Default::default()
        };
        let items = run(
            &ColonLineStrategy,
            "Potássio: 4,7 mmol/L (de 3,5 a 5,1)",
            &[],
            &ProfileHints::default(),
            &config,
        );
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].flag(), Flag::Normal);
    }

    #[test]
    fn non_numeric_values_are_skipped() {
        let items = run_text(&ColonLineStrategy, "Glicose: não reagente\nMaterial: soro");
        assert!(items.is_empty());
    }

    #[test]
    fn urine_labels_are_guarded() {
        let items = run_text(&ColonLineStrategy, "Hemácias: 3 /mL");
        assert!(items.is_empty());
        let items = run_text(&ColonLineStrategy, "Hemácias: 4,5 milhões/µL");
        assert_eq!(items[0].code(), ParameterCode::Hemacias);
        assert_eq!(items[0].unit(), Some("10^6/µL"));
    }
}
