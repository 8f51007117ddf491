use crate::pipeline::labs::LabError;
use serde::{Deserialize, Serialize};

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $s)] $variant),+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[$(Self::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = LabError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(LabError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }
    };
}

// Canonical analyte codes. One code per clinically distinct analyte; the
// synonym dictionary maps any number of report labels onto each.
str_enum!(ParameterCode {
    // Renal / electrolytes
    Ureia => "UREIA",
    Creatinina => "CREATININA",
    Tfg => "TFG",
    Sodio => "SODIO",
    Potassio => "POTASSIO",
    Magnesio => "MAGNESIO",
    CalcioIonico => "CALCIO_IONICO",
    CalcioTotal => "CALCIO_TOTAL",
    Fosforo => "FOSFORO",
    // Glycemia
    Glicose => "GLICOSE",
    Hba1c => "HBA1C",
    Gme => "GME",
    // Liver / inflammation
    Pcr => "PCR",
    Tgo => "TGO",
    Tgp => "TGP",
    Ggt => "GGT",
    Fa => "FA",
    BiliTotal => "BILI_TOTAL",
    BiliDireta => "BILI_DIRETA",
    BiliIndireta => "BILI_INDIRETA",
    // Blood count
    Hemacias => "HEMACIAS",
    Hemoglobina => "HEMOGLOBINA",
    Hematocrito => "HEMATOCRITO",
    Vcm => "VCM",
    Hcm => "HCM",
    Chcm => "CHCM",
    Rdw => "RDW",
    Leucocitos => "LEUCOCITOS",
    Plaquetas => "PLAQUETAS",
    Neutrofilos => "NEUTROFILOS",
    Segmentados => "SEGMENTADOS",
    Linfocitos => "LINFOCITOS",
    Monocitos => "MONOCITOS",
    Eosinofilos => "EOSINOFILOS",
    Basofilos => "BASOFILOS",
    // Coagulation
    Tap => "TAP",
    Rni => "RNI",
    Ttpa => "TTPA",
    // Cardiac / enzymes
    Troponina => "TROPONINA",
    NtProbnp => "NT_PROBNP",
    Cpk => "CPK",
    Ldh => "LDH",
    Lactato => "LACTATO",
    // Lipids
    ColesterolTotal => "COLESTEROL_TOTAL",
    Hdl => "HDL",
    Ldl => "LDL",
    Vldl => "VLDL",
    Triglicerides => "TRIGLICERIDES",
    // Thyroid
    Tsh => "TSH",
    T4l => "T4L",
    // Urinalysis
    EasLeucocitos => "EAS_LEUCOCITOS",
    EasHemacias => "EAS_HEMACIAS",
    // Blood gas
    GasoPh => "GASO_PH",
    GasoPco2 => "GASO_PCO2",
    GasoPo2 => "GASO_PO2",
    GasoHco3 => "GASO_HCO3",
    GasoBe => "GASO_BE",
    GasoSat => "GASO_SAT",
});

impl ParameterCode {
    /// Differential-count analytes reported both as a percentage and as an
    /// absolute count. The absolute count wins when both are present.
    pub fn is_differential(&self) -> bool {
        matches!(
            self,
            Self::Leucocitos
                | Self::Neutrofilos
                | Self::Segmentados
                | Self::Linfocitos
                | Self::Monocitos
                | Self::Eosinofilos
                | Self::Basofilos
        )
    }

    /// Blood-count analytes that urinalysis sediment reports under the same
    /// names (per mL of urine rather than per µL of blood).
    pub fn is_hematology_cell(&self) -> bool {
        matches!(self, Self::Hemacias) || self.is_differential()
    }
}

str_enum!(Flag {
    Low => "low",
    High => "high",
    Normal => "normal",
    Indeterminate => "indeterminate",
});

impl Flag {
    /// Upper-case tag used in the professional one-liner.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::High => "HIGH",
            Self::Normal => "NORMAL",
            Self::Indeterminate => "INDETERMINATE",
        }
    }

    /// Portuguese word shown to patients.
    pub fn patient_word(&self) -> &'static str {
        match self {
            Self::Low => "baixo",
            Self::High => "alto",
            Self::Normal => "normal",
            Self::Indeterminate => "indeterminado",
        }
    }
}

str_enum!(Qualifier {
    None => "none",
    LessThan => "less_than",
    GreaterThan => "greater_than",
});

impl Qualifier {
    pub fn glyph(&self) -> &'static str {
        match self {
            Self::None => "",
            Self::LessThan => "<",
            Self::GreaterThan => ">",
        }
    }
}

// Declaration order is merge priority: specific layouts first, the generic
// label/value grabber last.
str_enum!(StrategyKind {
    TwoColumnBlock => "two_column_block",
    BloodGas => "blood_gas",
    TabColumns => "tab_columns",
    ColonLine => "colon_line",
    Generic => "generic",
});
