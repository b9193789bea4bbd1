use serde_json::{Map, Value};

use crate::model::Table;
use crate::options::HeaderMode;

/// Cell label to trimmed cell text for one body row, in column order.
pub type Record = Map<String, Value>;

/// Rectangular string grid built from a [`Table`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    headers: Option<Vec<String>>,
    rows: Vec<Vec<String>>,
    cols: usize,
}

pub(crate) fn normalize_rows(rows: Vec<Vec<String>>, width: usize) -> Vec<Vec<String>> {
    rows.into_iter()
        .map(|mut row| {
            row.resize(width, String::new());
            row
        })
        .collect()
}

impl Grid {
    #[must_use]
    pub fn from_table(table: &Table, mode: HeaderMode) -> Self {
        let cols = table.max_width();
        let cells = table
            .rows()
            .iter()
            .map(|row| {
                row.tokens()
                    .iter()
                    .map(|token| token.text.clone())
                    .collect::<Vec<_>>()
            })
            .collect::<Vec<_>>();

        Self::from_cells(normalize_rows(cells, cols), cols, mode)
    }

    fn from_cells(mut cells: Vec<Vec<String>>, cols: usize, mode: HeaderMode) -> Self {
        let headers = match mode {
            HeaderMode::FirstRow if cells.len() > 1 => Some(cells.remove(0)),
            _ => None,
        };

        Self {
            headers,
            rows: cells,
            cols,
        }
    }

    #[must_use]
    pub fn headers(&self) -> Option<&[String]> {
        self.headers.as_deref()
    }

    #[must_use]
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    #[must_use]
    pub fn col_count(&self) -> usize {
        self.cols
    }

    #[must_use]
    pub fn has_header_containing(&self, needle: &str) -> bool {
        self.headers
            .as_ref()
            .is_some_and(|headers| headers.iter().any(|label| label.contains(needle)))
    }

    /// Labels used as record keys: the header row verbatim, or `col_N`.
    #[must_use]
    pub fn column_labels(&self) -> Vec<String> {
        match &self.headers {
            Some(headers) => headers.clone(),
            None => (1..=self.cols).map(|index| format!("col_{index}")).collect(),
        }
    }

    /// Body rows as label-to-cell maps with trimmed cells. Repeated labels keep
    /// the rightmost cell at the position of their first column.
    #[must_use]
    pub fn to_records(&self) -> Vec<Record> {
        let labels = self.column_labels();
        self.rows
            .iter()
            .map(|row| {
                labels
                    .iter()
                    .zip(row)
                    .map(|(label, cell)| (label.clone(), Value::from(cell.trim())))
                    .collect()
            })
            .collect()
    }

    /// Pipe table with the header (or first body row) on top. Cells are not trimmed.
    #[must_use]
    pub fn to_markdown(&self) -> String {
        let mut lines = self.headers.iter().chain(&self.rows);
        let Some(first) = lines.next() else {
            return String::new();
        };

        let mut out = vec![markdown_line(first)];
        out.push(markdown_line(&vec!["---".to_string(); self.cols]));
        out.extend(lines.map(|row| markdown_line(row)));
        out.join("\n")
    }
}

fn markdown_line(cells: &[String]) -> String {
    format!("| {} |", cells.join(" | "))
}
