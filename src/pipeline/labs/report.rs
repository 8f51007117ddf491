//! Final ordering and rendering.
//!
//! Items are deduplicated by code (first in merge order wins), sorted by the
//! clinical display table, and rendered twice: a one-line professional
//! summary and a line per item for the patient.

use std::collections::HashSet;

use super::synonyms::SynonymDictionary;
use crate::models::{ExtractedItem, Flag, ParameterCode, ReportResult};

/// Clinical display order. Codes absent from the table follow, sorted by
/// code string.
const DISPLAY_ORDER: &[ParameterCode] = &[
    // Blood count
    ParameterCode::Hemoglobina,
    ParameterCode::Hematocrito,
    ParameterCode::Hemacias,
    ParameterCode::Vcm,
    ParameterCode::Hcm,
    ParameterCode::Chcm,
    ParameterCode::Rdw,
    ParameterCode::Leucocitos,
    ParameterCode::Neutrofilos,
    ParameterCode::Segmentados,
    ParameterCode::Linfocitos,
    ParameterCode::Monocitos,
    ParameterCode::Eosinofilos,
    ParameterCode::Basofilos,
    ParameterCode::Plaquetas,
    // Renal and electrolytes
    ParameterCode::Ureia,
    ParameterCode::Creatinina,
    ParameterCode::Tfg,
    ParameterCode::Sodio,
    ParameterCode::Potassio,
    ParameterCode::Magnesio,
    ParameterCode::CalcioIonico,
    ParameterCode::CalcioTotal,
    ParameterCode::Fosforo,
    // Blood gas
    ParameterCode::GasoPh,
    ParameterCode::GasoPo2,
    ParameterCode::GasoPco2,
    ParameterCode::GasoHco3,
    ParameterCode::GasoBe,
    ParameterCode::GasoSat,
    ParameterCode::Lactato,
    // Inflammation and cardiac
    ParameterCode::Pcr,
    ParameterCode::Troponina,
    ParameterCode::NtProbnp,
    ParameterCode::Cpk,
    ParameterCode::Ldh,
    // Liver
    ParameterCode::Tgo,
    ParameterCode::Tgp,
    ParameterCode::Ggt,
    ParameterCode::Fa,
    ParameterCode::BiliTotal,
    ParameterCode::BiliDireta,
    ParameterCode::BiliIndireta,
    // Coagulation
    ParameterCode::Tap,
    ParameterCode::Rni,
    ParameterCode::Ttpa,
    // Glycemia
    ParameterCode::Glicose,
    ParameterCode::Hba1c,
    ParameterCode::Gme,
];

fn display_rank(code: ParameterCode) -> usize {
    DISPLAY_ORDER
        .iter()
        .position(|c| *c == code)
        .unwrap_or(DISPLAY_ORDER.len())
}

/// Order, deduplicate and render merged items. Diagnostics are left at
/// their defaults for the caller to fill.
pub fn assemble(items: Vec<ExtractedItem>, dictionary: &SynonymDictionary) -> ReportResult {
    let mut seen = HashSet::new();
    let mut items: Vec<ExtractedItem> = items
        .into_iter()
        .filter(|item| seen.insert(item.code()))
        .collect();
    items.sort_by_key(|item| (display_rank(item.code()), item.code().as_str()));

    let professional_summary = items
        .iter()
        .map(professional_line)
        .collect::<Vec<_>>()
        .join("; ");
    let patient_summary = items
        .iter()
        .map(|item| patient_line(item, dictionary))
        .collect();

    ReportResult {
        items,
        professional_summary,
        patient_summary,
        diagnostics: Default::default(),
    }
}

/// `SODIO 140 mmol/L [NORMAL]`; no tag when the flag is indeterminate.
fn professional_line(item: &ExtractedItem) -> String {
    let mut line = format!("{} {}", item.code(), item.value());
    if let Some(unit) = item.unit() {
        line.push(' ');
        line.push_str(unit);
    }
    if item.flag() != Flag::Indeterminate {
        line.push_str(&format!(" [{}]", item.flag().tag()));
    }
    line
}

/// `Potássio: 4,7 mmol/L (normal)`.
fn patient_line(item: &ExtractedItem, dictionary: &SynonymDictionary) -> String {
    let label = dictionary.patient_label(item.code());
    let value = item.value().to_decimal_comma();
    match item.unit() {
        Some(unit) => format!("{label}: {value} {unit} ({})", item.flag().patient_word()),
        None => format!("{label}: {value} ({})", item.flag().patient_word()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NumericValue, Provenance, Qualifier, ReferenceInterval, StrategyKind};

    fn make_item(
        code: ParameterCode,
        value: NumericValue,
        unit: Option<&str>,
        reference: ReferenceInterval,
    ) -> ExtractedItem {
        ExtractedItem::new(
            code,
            code.as_str(),
            value,
            unit.map(str::to_string),
            None,
            reference,
            Provenance::new(StrategyKind::Generic, "line"),
        )
    }

    fn make_plain(code: ParameterCode, value: f64, unit: &str) -> ExtractedItem {
        make_item(
            code,
            NumericValue::exact(value),
            Some(unit),
            ReferenceInterval::Unknown,
        )
    }

    fn dict() -> &'static SynonymDictionary {
        SynonymDictionary::builtin()
    }

    #[test]
    fn sorted_by_display_table_then_code_string() {
        let items = vec![
            make_plain(ParameterCode::Tsh, 2.1, "µUI/mL"),
            make_plain(ParameterCode::Sodio, 140.0, "mmol/L"),
            make_plain(ParameterCode::Hdl, 50.0, "mg/dL"),
            make_plain(ParameterCode::Hemoglobina, 13.0, "g/dL"),
        ];
        let report = assemble(items, dict());
        let codes: Vec<_> = report.items.iter().map(|i| i.code()).collect();
        assert_eq!(
            codes,
            vec![
                ParameterCode::Hemoglobina,
                ParameterCode::Sodio,
                ParameterCode::Hdl,
                ParameterCode::Tsh,
            ]
        );
    }

    #[test]
    fn duplicate_codes_keep_first() {
        let items = vec![
            make_plain(ParameterCode::Glicose, 95.0, "mg/dL"),
            make_plain(ParameterCode::Glicose, 5.3, "mmol/L"),
        ];
        let report = assemble(items, dict());
        assert_eq!(report.items.len(), 1);
        assert_eq!(report.items[0].unit(), Some("mg/dL"));
    }

    #[test]
    fn professional_summary_line() {
        let items = vec![
            make_item(
                ParameterCode::Potassio,
                NumericValue::exact(4.7),
                Some("mmol/L"),
                ReferenceInterval::Range { low: 3.5, high: 5.1 },
            ),
            make_item(
                ParameterCode::Troponina,
                NumericValue {
                    magnitude: 0.012,
                    qualifier: Qualifier::LessThan,
                },
                Some("ng/mL"),
                ReferenceInterval::Unknown,
            ),
            make_item(
                ParameterCode::GasoPh,
                NumericValue::exact(7.31),
                None,
                ReferenceInterval::Range { low: 7.35, high: 7.45 },
            ),
        ];
        let report = assemble(items, dict());
        assert_eq!(
            report.professional_summary,
            "POTASSIO 4.7 mmol/L [NORMAL]; GASO_PH 7.31 [LOW]; TROPONINA <0.012 ng/mL"
        );
    }

    #[test]
    fn patient_summary_lines() {
        let items = vec![
            make_item(
                ParameterCode::Potassio,
                NumericValue::exact(4.7),
                Some("mmol/L"),
                ReferenceInterval::Range { low: 3.5, high: 5.1 },
            ),
            make_item(
                ParameterCode::Creatinina,
                NumericValue::exact(1.9),
                Some("mg/dL"),
                ReferenceInterval::UpperBound { high: 1.3 },
            ),
        ];
        let report = assemble(items, dict());
        assert_eq!(
            report.patient_summary,
            vec![
                "Creatinina: 1,9 mg/dL (alto)".to_string(),
                "Potássio: 4,7 mmol/L (normal)".to_string(),
            ]
        );
    }

    #[test]
    fn empty_input_gives_empty_report() {
        let report = assemble(Vec::new(), dict());
        assert!(report.is_empty());
        assert!(report.professional_summary.is_empty());
        assert!(report.patient_summary.is_empty());
    }
}
