use serde::Serialize;

use crate::token::Token;

/// Tokens sharing one horizontal text line, ordered left to right.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    tokens: Vec<Token>,
}

impl Row {
    #[must_use]
    pub fn new(mut tokens: Vec<Token>) -> Self {
        tokens.sort_by_key(|token| token.x);
        Self { tokens }
    }

    #[must_use]
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    #[must_use]
    pub fn into_tokens(self) -> Vec<Token> {
        self.tokens
    }
}

/// A run of at least two rows judged to share a column structure.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    rows: Vec<Row>,
}

impl Table {
    pub const MIN_ROWS: usize = 2;

    #[must_use]
    pub fn new(rows: Vec<Row>) -> Option<Self> {
        (rows.len() >= Self::MIN_ROWS).then_some(Self { rows })
    }

    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[must_use]
    pub fn max_width(&self) -> usize {
        self.rows.iter().map(Row::len).max().unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AtmRecord {
    #[serde(rename = "Site")]
    pub site: String,
    #[serde(rename = "Location")]
    pub location: String,
    #[serde(rename = "Sign Types")]
    pub sign_types: String,
    #[serde(rename = "Dimensions")]
    pub dimensions: String,
}

impl AtmRecord {
    pub const HEADERS: [&'static str; 4] = ["Site", "Location", "Sign Types", "Dimensions"];

    #[must_use]
    pub fn to_record(&self) -> [&str; 4] {
        [
            self.site.as_str(),
            self.location.as_str(),
            self.sign_types.as_str(),
            self.dimensions.as_str(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PanelRow {
    pub panel: String,
    pub station: String,
    pub offset: String,
    pub direction: String,
    pub sheet: String,
}

impl PanelRow {
    pub const HEADERS: [&'static str; 5] = ["Panel", "Station", "Offset", "Direction", "Sheet"];

    #[must_use]
    pub fn to_record(&self) -> [&str; 5] {
        [
            self.panel.as_str(),
            self.station.as_str(),
            self.offset.as_str(),
            self.direction.as_str(),
            self.sheet.as_str(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct BomLine {
    pub item: String,
    pub location: String,
    pub quantity: usize,
    pub description: String,
}

impl BomLine {
    #[must_use]
    pub fn new(
        item: impl Into<String>,
        location: impl Into<String>,
        quantity: usize,
        description: impl Into<String>,
    ) -> Self {
        Self {
            item: item.into(),
            location: location.into(),
            quantity,
            description: description.into(),
        }
    }
}
