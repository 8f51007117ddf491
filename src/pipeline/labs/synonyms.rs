//! Synonym dictionary: report labels → canonical analyte codes.
//!
//! Aliases are matched after normalization (lower case, diacritics removed,
//! whitespace collapsed, trailing colon dropped). A label matches an alias
//! when it equals it, or starts with it and the next character is not
//! alphanumeric. The first entry in declaration order wins, so entries
//! whose aliases extend another entry's aliases are declared first
//! (`hemoglobina glicada` before `hemoglobina`).

use std::sync::LazyLock;

use serde::Deserialize;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::models::ParameterCode;

/// One analyte: its code, the label patients see, and the report spellings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SynonymEntry {
    pub code: ParameterCode,
    pub label: String,
    pub aliases: Vec<String>,
}

impl SynonymEntry {
    pub fn new(code: ParameterCode, label: &str, aliases: &[&str]) -> Self {
        Self {
            code,
            label: label.to_string(),
            aliases: aliases.iter().map(|a| a.to_string()).collect(),
        }
    }
}

/// Immutable alias table, built once and shared by reference.
#[derive(Debug, Clone)]
pub struct SynonymDictionary {
    entries: Vec<SynonymEntry>,
    /// `(code, normalized alias)` in declaration order.
    normalized: Vec<(ParameterCode, String)>,
}

static BUILTIN: LazyLock<SynonymDictionary> =
    LazyLock::new(|| SynonymDictionary::from_entries(builtin_entries()));

impl SynonymDictionary {
    /// The process-wide built-in dictionary.
    pub fn builtin() -> &'static SynonymDictionary {
        &BUILTIN
    }

    pub fn from_entries(entries: Vec<SynonymEntry>) -> Self {
        let normalized = entries
            .iter()
            .flat_map(|entry| {
                entry
                    .aliases
                    .iter()
                    .map(|alias| (entry.code, normalize_label(alias)))
                    .filter(|(_, alias)| !alias.is_empty())
            })
            .collect();
        Self {
            entries,
            normalized,
        }
    }

    /// Map a report label to its analyte code. Unknown labels yield `None`.
    pub fn canonicalize(&self, label: &str) -> Option<ParameterCode> {
        let label = normalize_label(label);
        if label.is_empty() {
            return None;
        }
        self.normalized
            .iter()
            .find(|(_, alias)| alias_matches(&label, alias))
            .map(|(code, _)| *code)
    }

    /// Patient-facing label for a code; falls back to the code string.
    pub fn patient_label(&self, code: ParameterCode) -> &str {
        self.entries
            .iter()
            .find(|e| e.code == code)
            .map(|e| e.label.as_str())
            .unwrap_or_else(|| code.as_str())
    }

    pub fn entries(&self) -> &[SynonymEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn alias_matches(label: &str, alias: &str) -> bool {
    match label.strip_prefix(alias) {
        Some("") => true,
        Some(rest) => rest.chars().next().is_some_and(|c| !c.is_alphanumeric()),
        None => false,
    }
}

/// Lower-case, strip diacritics (NFD, combining marks dropped), collapse
/// whitespace, trim, and drop trailing colons.
pub fn normalize_label(label: &str) -> String {
    fold_text(label)
        .trim_end_matches([':', '：'])
        .trim_end()
        .to_string()
}

/// Lower-case, strip diacritics and collapse whitespace.
pub fn fold_text(text: &str) -> String {
    let folded: String = text
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase();
    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

// ═══════════════════════════════════════════════════════════════════════════
// Built-in table
// ═══════════════════════════════════════════════════════════════════════════

fn builtin_entries() -> Vec<SynonymEntry> {
    use ParameterCode::*;
    vec![
        // Urinalysis sediment before the blood counts of the same name
        SynonymEntry::new(
            EasLeucocitos,
            "Leucócitos na urina",
            &[
                "leucócitos: urina",
                "leucócitos (urina)",
                "leucócitos na urina",
                "leucócitos urina",
                "leucócitos /ml",
                "leucócitos - urina",
                "piócitos",
            ],
        ),
        SynonymEntry::new(
            EasHemacias,
            "Hemácias na urina",
            &[
                "hemácias: urina",
                "hemácias (urina)",
                "hemácias na urina",
                "hemácias urina",
                "hemácias /ml",
                "hemácias - urina",
            ],
        ),
        // Renal / electrolytes
        SynonymEntry::new(Ureia, "Ureia", &["ureia", "uréia", "ure"]),
        SynonymEntry::new(
            Tfg,
            "Taxa de filtração glomerular",
            &[
                "taxa de filtração glomerular",
                "filtração glomerular",
                "tfg",
                "egfr",
                "rfg",
            ],
        ),
        SynonymEntry::new(Creatinina, "Creatinina", &["creatinina", "cre"]),
        SynonymEntry::new(Sodio, "Sódio", &["sódio", "na"]),
        SynonymEntry::new(Potassio, "Potássio", &["potássio", "k"]),
        SynonymEntry::new(Magnesio, "Magnésio", &["magnésio"]),
        SynonymEntry::new(
            CalcioIonico,
            "Cálcio iônico",
            &["cálcio iônico", "cálcio ionizado", "cai", "ca++", "ca ionico"],
        ),
        SynonymEntry::new(CalcioTotal, "Cálcio", &["cálcio total", "cálcio", "ca"]),
        SynonymEntry::new(Fosforo, "Fósforo", &["fósforo", "fos"]),
        // Glycemia: glycated hemoglobin and estimated mean glucose first
        SynonymEntry::new(
            Hba1c,
            "Hemoglobina glicada",
            &["hemoglobina glicada", "hba1c", "a1c"],
        ),
        SynonymEntry::new(
            Gme,
            "Glicose média estimada",
            &["glicose média estimada", "gme", "eag"],
        ),
        SynonymEntry::new(Glicose, "Glicose", &["glicose", "glicemia", "glucose", "gli"]),
        // Liver / inflammation
        SynonymEntry::new(Pcr, "Proteína C reativa", &["proteína c reativa", "pcr"]),
        SynonymEntry::new(
            Tgo,
            "TGO",
            &[
                "tgo",
                "ast",
                "transaminase oxalacética",
                "aspartato aminotransferase",
                "aspartato amino transferase",
            ],
        ),
        SynonymEntry::new(
            Tgp,
            "TGP",
            &[
                "tgp",
                "alt",
                "transaminase pirúvica",
                "alanina aminotransferase",
                "alanina amino transferase",
            ],
        ),
        SynonymEntry::new(
            Ggt,
            "Gama GT",
            &[
                "gama gt",
                "gamma gt",
                "ggt",
                "gama-glutamil transferase",
                "gama glutamil transferase",
            ],
        ),
        SynonymEntry::new(Fa, "Fosfatase alcalina", &["fosfatase alcalina", "fal", "fa"]),
        SynonymEntry::new(
            BiliTotal,
            "Bilirrubina total",
            &["bilirrubina total", "bil total", "bt"],
        ),
        SynonymEntry::new(
            BiliDireta,
            "Bilirrubina direta",
            &["bilirrubina direta", "bil direta", "bd"],
        ),
        SynonymEntry::new(
            BiliIndireta,
            "Bilirrubina indireta",
            &["bilirrubina indireta", "bil indireta", "bi"],
        ),
        // Blood count: red-cell indices before hemoglobin
        SynonymEntry::new(
            Chcm,
            "CHCM",
            &["concentração de hemoglobina corpuscular média", "chcm", "mchc"],
        ),
        SynonymEntry::new(
            Hcm,
            "HCM",
            &["hemoglobina corpuscular média", "hcm", "mch"],
        ),
        SynonymEntry::new(Vcm, "VCM", &["volume corpuscular médio", "vcm", "mcv"]),
        SynonymEntry::new(
            Hemacias,
            "Hemácias",
            &["hemácias", "eritrócitos", "glóbulos vermelhos", "rbc"],
        ),
        SynonymEntry::new(Hemoglobina, "Hemoglobina", &["hemoglobina", "hb", "hgb"]),
        SynonymEntry::new(Hematocrito, "Hematócrito", &["hematócrito", "hct", "ht"]),
        SynonymEntry::new(Rdw, "RDW", &["rdw"]),
        SynonymEntry::new(
            Leucocitos,
            "Leucócitos",
            &["leucócitos totais", "leucócitos", "glóbulos brancos", "wbc"],
        ),
        SynonymEntry::new(
            Plaquetas,
            "Plaquetas",
            &["contagem de plaquetas", "plaquetas", "plt"],
        ),
        SynonymEntry::new(Neutrofilos, "Neutrófilos", &["neutrófilos"]),
        SynonymEntry::new(Segmentados, "Segmentados", &["segmentados"]),
        SynonymEntry::new(Linfocitos, "Linfócitos", &["linfócitos"]),
        SynonymEntry::new(Monocitos, "Monócitos", &["monócitos"]),
        SynonymEntry::new(Eosinofilos, "Eosinófilos", &["eosinófilos"]),
        SynonymEntry::new(Basofilos, "Basófilos", &["basófilos"]),
        // Coagulation
        SynonymEntry::new(
            Tap,
            "Tempo de protrombina",
            &["tempo de protrombina", "atividade de protrombina", "tap", "tp"],
        ),
        SynonymEntry::new(
            Rni,
            "RNI",
            &["rni", "inr", "razão normatizada internacional"],
        ),
        SynonymEntry::new(
            Ttpa,
            "TTPA",
            &["tempo de tromboplastina parcial ativado", "ttpa", "aptt"],
        ),
        // Cardiac / enzymes
        SynonymEntry::new(
            Troponina,
            "Troponina",
            &["troponina i de alta sensibilidade", "troponina", "hs-tni", "tni"],
        ),
        SynonymEntry::new(
            NtProbnp,
            "NT-proBNP",
            &["nt-probnp", "nt-pro bnp", "ntprobnp", "pro-bnp"],
        ),
        SynonymEntry::new(
            Cpk,
            "CPK",
            &["cpk", "ck", "creatinofosfoquinase", "creatinoquinase"],
        ),
        SynonymEntry::new(
            Ldh,
            "LDH",
            &["ldh", "desidrogenase láctica", "desidrogenase lática"],
        ),
        SynonymEntry::new(
            Lactato,
            "Lactato",
            &["lactato", "ácido lático", "ácido láctico"],
        ),
        // Lipids
        SynonymEntry::new(ColesterolTotal, "Colesterol total", &["colesterol total"]),
        SynonymEntry::new(Hdl, "HDL colesterol", &["hdl"]),
        SynonymEntry::new(Vldl, "VLDL colesterol", &["vldl"]),
        SynonymEntry::new(Ldl, "LDL colesterol", &["ldl"]),
        SynonymEntry::new(
            Triglicerides,
            "Triglicérides",
            &["triglicérides", "triglicerídeos", "tg"],
        ),
        // Thyroid
        SynonymEntry::new(
            Tsh,
            "TSH",
            &["tsh", "hormônio tireoestimulante"],
        ),
        SynonymEntry::new(T4l, "T4 livre", &["t4 livre", "t4l", "tiroxina livre"]),
        // Blood gas (pH itself is left to the blood-gas strategy)
        SynonymEntry::new(
            GasoPh,
            "pH sanguíneo",
            &["ph arterial", "ph venoso", "ph sanguíneo", "ph do sangue"],
        ),
        SynonymEntry::new(GasoPco2, "pCO2", &["pco2", "pco 2", "pressão parcial de co2"]),
        SynonymEntry::new(GasoPo2, "pO2", &["po2", "po 2", "pressão parcial de o2"]),
        SynonymEntry::new(GasoHco3, "Bicarbonato", &["hco3", "bicarbonato"]),
        SynonymEntry::new(
            GasoBe,
            "Excesso de base",
            &["excesso de bases", "excesso de base", "base excess"],
        ),
        SynonymEntry::new(
            GasoSat,
            "Saturação de O2",
            &[
                "saturação de o2",
                "saturação de oxigênio",
                "sat o2",
                "sato2",
                "so2",
            ],
        ),
    ]
}
