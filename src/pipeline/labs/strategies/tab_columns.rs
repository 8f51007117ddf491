use super::{
    build_item, clean_reference, is_urine_context, read_measurement, split_label_value,
    ExtractionStrategy, Measurement, StrategyInput,
};
use crate::models::{ExtractedItem, StrategyKind};
use crate::pipeline::labs::reference::parse_reference_interval;
use crate::pipeline::labs::synonyms::SynonymDictionary;
use crate::pipeline::labs::units::{is_absolute_count, is_percent, unit_token};

/// Column-aware lines: first cell is the label, later cells are scanned
/// left to right for the first value.
///
/// Works on reconstructed layout lines (token positions or plain-text
/// gutters), never on the flattened text.
#[derive(Debug, Clone, Copy, Default)]
pub struct TabColumnsStrategy;

impl ExtractionStrategy for TabColumnsStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::TabColumns
    }

    fn extract(
        &self,
        input: &StrategyInput<'_>,
        dictionary: &SynonymDictionary,
    ) -> Vec<ExtractedItem> {
        let mut items = Vec::new();

        for line in input.layout_lines.iter().filter(|l| l.has_columns()) {
            let columns = line.columns();
            let Some((first, later)) = columns.split_first() else {
                continue;
            };
            let (label, inline_value) = split_label_value(first);
            let label = label.trim_end_matches([':', '：']).trim();
            let Some(code) = dictionary.canonicalize(label) else {
                continue;
            };

            let cells: Vec<&str> = inline_value.into_iter().chain(later.iter().copied()).collect();
            let Some((at, measurement)) = first_measurement(&cells) else {
                continue;
            };
            if is_urine_context(code, label, measurement.unit.as_deref()) {
                continue;
            }

            let source = line.plain_text();
            let percent = is_percent(measurement.unit.as_deref());
            let reference = reference_after(&cells, at, false)
                .or_else(|| clean_reference(measurement.rest));

            items.push(build_item(
                self.kind(),
                code,
                label,
                measurement.value,
                measurement.unit,
                reference,
                &source,
            ));

            if code.is_differential() && percent {
                if let Some((count_at, count)) = absolute_cell(&cells, at + 1) {
                    items.push(build_item(
                        self.kind(),
                        code,
                        label,
                        count.value,
                        count.unit,
                        reference_after(&cells, count_at, true),
                        &source,
                    ));
                }
            }
        }

        items
    }
}

/// First cell that reads as a value. A value cell without a unit borrows
/// the next cell when that cell is a unit on its own.
fn first_measurement<'a>(cells: &[&'a str]) -> Option<(usize, Measurement<'a>)> {
    cells.iter().enumerate().find_map(|(i, &cell)| {
        let mut measurement = read_measurement(cell)?;
        if measurement.unit.is_none() {
            let next = cells.get(i + 1).copied().unwrap_or_default();
            if let Some(unit) = unit_token(next).filter(|u| u.consumed == next.len()) {
                measurement.value = measurement.value.scaled(unit.scale);
                measurement.unit = Some(unit.canonical);
                return Some((i + 1, measurement));
            }
        }
        Some((i, measurement))
    })
}

/// First absolute-count cell at or after `from`.
fn absolute_cell<'a>(cells: &[&'a str], from: usize) -> Option<(usize, Measurement<'a>)> {
    cells.iter().enumerate().skip(from).find_map(|(i, &cell)| {
        let measurement = read_measurement(cell)?;
        is_absolute_count(measurement.unit.as_deref()).then_some((i, measurement))
    })
}

/// First cell after `at` that parses as a reference interval. Absolute
/// counts skip percentage ranges.
fn reference_after(cells: &[&str], at: usize, skip_percent: bool) -> Option<String> {
    cells
        .iter()
        .skip(at + 1)
        .filter(|cell| !(skip_percent && cell.contains('%')))
        .find(|cell| parse_reference_interval(cell).is_known())
        .and_then(|cell| clean_reference(cell))
}

#[cfg(test)]
mod tests {
    use super::super::test_support::run;
    use super::*;
    use crate::config::EngineConfig;
    use crate::models::{Flag, ParameterCode, ProfileHints, ReferenceInterval};
    use crate::pipeline::extraction::ReconstructedLine;

    fn make_layout(rows: &[&str]) -> Vec<ReconstructedLine> {
        rows.iter().map(|r| ReconstructedLine::new(1, *r)).collect()
    }

    fn run_layout(rows: &[&str]) -> Vec<ExtractedItem> {
        run(
            &TabColumnsStrategy,
            "",
            &make_layout(rows),
            &ProfileHints::default(),
            &EngineConfig::default(),
        )
    }

    #[test]
    fn label_value_reference_columns() {
        let items = run_layout(&["Sódio\t140 mmol/L\t136 a 145"]);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].code(), ParameterCode::Sodio);
        assert_eq!(items[0].unit(), Some("mmol/L"));
        assert_eq!(
            *items[0].reference_interval(),
            ReferenceInterval::Range { low: 136.0, high: 145.0 }
        );
        assert_eq!(items[0].flag(), Flag::Normal);
        assert_eq!(items[0].provenance().strategy, StrategyKind::TabColumns);
        assert_eq!(items[0].provenance().source, "Sódio 140 mmol/L 136 a 145");
    }

    #[test]
    fn unit_in_its_own_column() {
        let items = run_layout(&["Hemoglobina:\t11,2\tg/dL\t12,0 a 16,0"]);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].matched_label(), "Hemoglobina");
        assert_eq!(items[0].unit(), Some("g/dL"));
        assert_eq!(items[0].flag(), Flag::Low);
    }

    #[test]
    fn value_glued_to_label_cell() {
        let items = run_layout(&["Creatinina 1,9 mg/dL\tAté 1,3 mg/dL"]);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].code(), ParameterCode::Creatinina);
        assert_eq!(items[0].value().magnitude, 1.9);
        assert_eq!(items[0].flag(), Flag::High);
    }

    #[test]
    fn label_with_digits_is_not_split() {
        let items = run_layout(&["T4 livre\t1,2 ng/dL\t0,9 a 1,8"]);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].code(), ParameterCode::T4l);
    }

    #[test]
    fn differential_row_yields_both_counts() {
        let items = run_layout(&[
            "Neutrófilos\t60,0 %\t4.200 /mm³\t40 a 70 %\t1.800 a 7.700 /mm³",
        ]);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].unit(), Some("%"));
        assert_eq!(
            *items[0].reference_interval(),
            ReferenceInterval::Range { low: 40.0, high: 70.0 }
        );
        assert_eq!(items[1].unit(), Some("/mm³"));
        assert_eq!(items[1].value().magnitude, 4200.0);
        assert_eq!(
            *items[1].reference_interval(),
            ReferenceInterval::Range { low: 1800.0, high: 7700.0 }
        );
    }

    #[test]
    fn single_column_lines_and_unknown_labels_are_ignored() {
        let items = run_layout(&["Sódio 140 mmol/L", "Página\t1\tde 3", "Observação\ttexto"]);
        assert!(items.is_empty());
    }

    #[test]
    fn urine_sediment_rows_are_dropped() {
        let items = run_layout(&["Leucócitos\t12.000 /mL\taté 10.000 /mL"]);
        assert!(items.is_empty());
    }
}
