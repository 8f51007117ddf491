use std::sync::LazyLock;

use regex::Regex;

use super::{
    absolute_companion, build_item, clean_reference, is_urine_context, read_measurement,
    ExtractionStrategy, StrategyInput, VALUE_PATTERN,
};
use crate::models::{ExtractedItem, StrategyKind};
use crate::pipeline::labs::synonyms::SynonymDictionary;
use crate::pipeline::labs::units::is_percent;

/// `<label>[:] <value>[ <unit>] <rest>` on one physical line.
static LABEL_VALUE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"^(?P<label>\p{{L}}[\p{{L}}\p{{N}} ()/.^'+\-]*?)\s*(?:[:：]\s*|\s+)(?P<value>(?:{VALUE_PATTERN}).*)$"
    ))
    .expect("valid regex")
});

/// Label/value grabber for any line. Last in merge priority.
#[derive(Debug, Clone, Copy, Default)]
pub struct GenericStrategy;

impl ExtractionStrategy for GenericStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Generic
    }

    fn extract(
        &self,
        input: &StrategyInput<'_>,
        dictionary: &SynonymDictionary,
    ) -> Vec<ExtractedItem> {
        let mut items = Vec::new();

        for line in input.lines {
            let Some(caps) = LABEL_VALUE_RE.captures(line) else {
                continue;
            };
            let label = &caps["label"];
            let Some(code) = dictionary.canonicalize(label) else {
                continue;
            };
            let Some(measurement) = read_measurement(&caps["value"]) else {
                tracing::trace!(line = %line, "Dropped line with malformed numeral");
                continue;
            };
            if is_urine_context(code, label, measurement.unit.as_deref()) {
                continue;
            }

            let companion = (code.is_differential() && is_percent(measurement.unit.as_deref()))
                .then(|| absolute_companion(self.kind(), code, label, measurement.rest, line))
                .flatten();

            items.push(build_item(
                self.kind(),
                code,
                label,
                measurement.value,
                measurement.unit,
                clean_reference(measurement.rest),
                line,
            ));
            items.extend(companion);
        }

        items
    }
}
