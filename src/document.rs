use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ExtractError;
use crate::grid::{Grid, Record};
use crate::options::PageSelection;
use crate::token::Token;

pub const PAGE_ELEMENT: &str = "page";
pub const TABLE_ELEMENT: &str = "table";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x1: i64,
    pub y1: i64,
    pub x2: i64,
    pub y2: i64,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default = "unknown_element_type")]
    pub element_type: String,
}

fn unknown_element_type() -> String {
    "unknown".to_string()
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableCell {
    pub row: usize,
    pub col: usize,
    pub rowspan: usize,
    pub colspan: usize,
    pub text: String,
    pub bounding_box: Option<BoundingBox>,
}

impl TableCell {
    #[must_use]
    pub fn new(row: usize, col: usize, text: impl Into<String>) -> Self {
        Self {
            row,
            col,
            rowspan: 1,
            colspan: 1,
            text: text.into(),
            bounding_box: None,
        }
    }
}

/// Cell-addressed table attached to a document element.
///
/// In JSON the table travels as a list of header-keyed records, the same
/// shape [`DocumentTable::to_records`] produces.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "Vec<Record>", into = "Vec<Record>")]
pub struct DocumentTable {
    pub cells: Vec<TableCell>,
    pub rows: usize,
    pub cols: usize,
    pub position: Option<BoundingBox>,
}

impl DocumentTable {
    /// Column labels become row 0, body rows follow.
    #[must_use]
    pub fn from_grid(grid: &Grid) -> Self {
        let labels = grid.column_labels();
        let cells = std::iter::once(&labels)
            .chain(grid.rows())
            .enumerate()
            .flat_map(|(row, line)| {
                line.iter()
                    .enumerate()
                    .map(move |(col, text)| TableCell::new(row, col, text.clone()))
            })
            .collect();

        Self {
            cells,
            rows: grid.rows().len() + 1,
            cols: grid.col_count(),
            position: None,
        }
    }

    fn trimmed_grid(&self) -> Vec<Vec<String>> {
        let mut grid = vec![vec![String::new(); self.cols]; self.rows];
        for cell in &self.cells {
            if cell.row < self.rows && cell.col < self.cols {
                grid[cell.row][cell.col] = cell.text.trim().to_string();
            }
        }
        grid
    }

    #[must_use]
    pub fn to_markdown(&self) -> String {
        if self.cells.is_empty() || self.rows == 0 || self.cols == 0 {
            return String::new();
        }

        let grid = self.trimmed_grid();
        let mut lines = vec![format!("| {} |", grid[0].join(" | "))];
        lines.push(format!("| {} |", vec!["---"; self.cols].join(" | ")));
        lines.extend(grid[1..].iter().map(|row| format!("| {} |", row.join(" | "))));
        lines.join("\n")
    }

    /// Body rows keyed by row 0. A table with fewer than two rows has no body.
    #[must_use]
    pub fn to_records(&self) -> Vec<Record> {
        if self.cells.is_empty() || self.rows < 2 || self.cols == 0 {
            return Vec::new();
        }

        let grid = self.trimmed_grid();
        let headers = &grid[0];
        grid[1..]
            .iter()
            .map(|row| {
                headers
                    .iter()
                    .zip(row)
                    .map(|(header, cell)| (header.clone(), Value::from(cell.as_str())))
                    .collect()
            })
            .collect()
    }
}

impl From<Vec<Record>> for DocumentTable {
    fn from(records: Vec<Record>) -> Self {
        let Some(first) = records.first() else {
            return Self::default();
        };

        let headers = first.keys().cloned().collect::<Vec<_>>();
        let mut cells = headers
            .iter()
            .enumerate()
            .map(|(col, header)| TableCell::new(0, col, header.clone()))
            .collect::<Vec<_>>();
        for (index, record) in records.iter().enumerate() {
            for (col, header) in headers.iter().enumerate() {
                let text = record.get(header).map(cell_text).unwrap_or_default();
                cells.push(TableCell::new(index + 1, col, text));
            }
        }

        Self {
            cells,
            rows: records.len() + 1,
            cols: headers.len(),
            position: None,
        }
    }
}

/// Strings verbatim, `null` as empty, anything else as its JSON text.
fn cell_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

impl From<DocumentTable> for Vec<Record> {
    fn from(table: DocumentTable) -> Self {
        table.to_records()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    #[serde(rename = "type")]
    pub element_type: String,
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounding_box: Option<BoundingBox>,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub metadata: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<DocumentTable>,
}

#[derive(Debug, Clone, Deserialize)]
struct PositionEntry {
    text: String,
    x: i64,
    y: i64,
    width: i64,
    height: i64,
    #[serde(default)]
    confidence: f64,
}

impl Element {
    #[must_use]
    pub fn page(page_index: u32, text: impl Into<String>, tokens: &[Token]) -> Self {
        let positions = tokens
            .iter()
            .map(|token| {
                serde_json::json!({
                    "text": token.text,
                    "x": token.x,
                    "y": token.y,
                    "width": token.width,
                    "height": token.height,
                    "confidence": token.confidence,
                })
            })
            .collect::<Vec<_>>();

        let mut metadata = Map::new();
        metadata.insert("page_number".to_string(), Value::from(page_index));
        metadata.insert("text_positions".to_string(), Value::Array(positions));

        Self {
            element_type: PAGE_ELEMENT.to_string(),
            text: text.into(),
            bounding_box: None,
            confidence: 0.0,
            metadata,
            table: None,
        }
    }

    #[must_use]
    pub fn table(grid: &Grid) -> Self {
        Self {
            element_type: TABLE_ELEMENT.to_string(),
            text: String::new(),
            bounding_box: None,
            confidence: 0.0,
            metadata: Map::new(),
            table: Some(DocumentTable::from_grid(grid)),
        }
    }

    #[must_use]
    pub fn is_page(&self) -> bool {
        self.element_type == PAGE_ELEMENT
    }

    /// Zero-based page index recorded by the OCR layer.
    #[must_use]
    pub fn page_index(&self) -> Option<u32> {
        self.metadata
            .get("page_number")
            .and_then(Value::as_u64)
            .and_then(|value| u32::try_from(value).ok())
    }

    /// Tokens from `metadata.text_positions`. Entries that do not carry the
    /// full token shape are skipped.
    #[must_use]
    pub fn tokens(&self) -> Vec<Token> {
        let Some(Value::Array(entries)) = self.metadata.get("text_positions") else {
            return Vec::new();
        };

        entries
            .iter()
            .filter_map(|entry| serde_json::from_value::<PositionEntry>(entry.clone()).ok())
            .map(|entry| Token {
                text: entry.text,
                x: entry.x,
                y: entry.y,
                width: entry.width,
                height: entry.height,
                confidence: entry.confidence,
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub metadata: Map<String, Value>,
    #[serde(default)]
    pub elements: Vec<Element>,
}

/// One page of a document, numbered from 1.
#[derive(Debug, Clone, PartialEq)]
pub struct PageContent<'a> {
    pub page_number: u32,
    pub text: &'a str,
    pub tokens: Vec<Token>,
}

impl Document {
    pub fn from_json(json: &str) -> Result<Self, ExtractError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, ExtractError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Assembles per-page element lists in ascending page order, whatever
    /// order the pages finished in.
    #[must_use]
    pub fn from_pages(metadata: Map<String, Value>, mut pages: Vec<(u32, Vec<Element>)>) -> Self {
        pages.sort_by_key(|(page_index, _)| *page_index);
        Self {
            metadata,
            elements: pages.into_iter().flat_map(|(_, elements)| elements).collect(),
        }
    }

    /// A document of table elements, one per grid.
    #[must_use]
    pub fn from_tables(metadata: Map<String, Value>, grids: &[Grid]) -> Self {
        Self {
            metadata,
            elements: grids.iter().map(Element::table).collect(),
        }
    }

    /// Page elements in document order. Pages without a recorded index are
    /// numbered by their position among page elements.
    #[must_use]
    pub fn pages(&self) -> Vec<PageContent<'_>> {
        self.elements
            .iter()
            .filter(|element| element.is_page())
            .enumerate()
            .map(|(position, element)| {
                let page_index = element
                    .page_index()
                    .unwrap_or_else(|| u32::try_from(position).unwrap_or(u32::MAX));
                PageContent {
                    page_number: page_index.saturating_add(1),
                    text: &element.text,
                    tokens: element.tokens(),
                }
            })
            .collect()
    }

    #[must_use]
    pub fn tokens_for(&self, selection: &PageSelection) -> Vec<Token> {
        self.pages()
            .into_iter()
            .filter(|page| selection.contains(page.page_number))
            .flat_map(|page| page.tokens)
            .collect()
    }

    /// Page texts joined with `--- PAGE n ---` markers.
    #[must_use]
    pub fn full_text(&self) -> String {
        self.pages()
            .iter()
            .map(|page| format!("\n\n--- PAGE {} ---\n\n{}", page.page_number, page.text))
            .collect()
    }
}
