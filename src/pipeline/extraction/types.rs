use serde::{Deserialize, Serialize};

/// Separator written between columns of a reconstructed line.
pub const COLUMN_BREAK: char = '\t';

/// A positioned text run from the PDF text layer.
/// Coordinates use the PDF convention: origin bottom-left, y grows upwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionedToken {
    pub text: String,
    pub x: f64,
    pub y: f64,
}

impl PositionedToken {
    pub fn new(text: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            text: text.into(),
            x,
            y,
        }
    }
}

/// Tokens of a single page, in text-layer order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenPage {
    pub page_number: usize,
    pub tokens: Vec<PositionedToken>,
}

/// One visual line, columns separated by [`COLUMN_BREAK`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconstructedLine {
    pub page_number: usize,
    pub text: String,
}

impl ReconstructedLine {
    pub fn new(page_number: usize, text: impl Into<String>) -> Self {
        Self {
            page_number,
            text: text.into(),
        }
    }

    /// Non-empty, trimmed column cells, left to right.
    pub fn columns(&self) -> Vec<&str> {
        self.text
            .split(COLUMN_BREAK)
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .collect()
    }

    pub fn has_columns(&self) -> bool {
        self.columns().len() > 1
    }

    /// The line with column breaks flattened to single spaces.
    pub fn plain_text(&self) -> String {
        self.columns().join(" ")
    }
}
