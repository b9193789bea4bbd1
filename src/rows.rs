use crate::model::Row;
use crate::token::Token;

pub const DEFAULT_ROW_THRESHOLD: i64 = 20;

/// Groups tokens into rows by vertical proximity.
///
/// Tokens are walked in ascending `y`. A token stays in the open row while its
/// `y` is less than `row_threshold` below the previously placed token, so a
/// row can grow taller than the threshold through a chain of small steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowClusterer {
    row_threshold: i64,
}

impl Default for RowClusterer {
    fn default() -> Self {
        Self::new(DEFAULT_ROW_THRESHOLD)
    }
}

impl RowClusterer {
    #[must_use]
    pub fn new(row_threshold: i64) -> Self {
        Self { row_threshold }
    }

    #[must_use]
    pub fn row_threshold(&self) -> i64 {
        self.row_threshold
    }

    pub fn cluster(&self, mut tokens: Vec<Token>) -> Vec<Row> {
        tokens.sort_by_key(|token| token.y);

        let mut rows = Vec::new();
        let mut current: Vec<Token> = Vec::new();
        let mut previous_y = None;

        let flush_current = |current: &mut Vec<Token>, rows: &mut Vec<Row>| {
            if !current.is_empty() {
                rows.push(Row::new(std::mem::take(current)));
            }
        };

        for token in tokens {
            let joins_open_row = previous_y.is_none_or(|previous: i64| {
                token.y.saturating_sub(previous) < self.row_threshold
            });
            if !joins_open_row {
                flush_current(&mut current, &mut rows);
            }
            previous_y = Some(token.y);
            current.push(token);
        }

        flush_current(&mut current, &mut rows);
        tracing::debug!(rows = rows.len(), "clustered tokens into rows");
        rows
    }
}
