use crate::model::{Row, Table};
use crate::options::ExtractOptions;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectorConfig {
    pub overlap_tolerance: f64,
    pub alignment_threshold: f64,
    /// Kept alongside the row threshold for column splitting; unused by detection.
    pub col_threshold: i64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            overlap_tolerance: 0.5,
            alignment_threshold: 0.5,
            col_threshold: 30,
        }
    }
}

impl From<&ExtractOptions> for DetectorConfig {
    fn from(options: &ExtractOptions) -> Self {
        Self {
            overlap_tolerance: options.overlap_tolerance,
            alignment_threshold: options.alignment_threshold,
            col_threshold: options.col_threshold,
        }
    }
}

/// Groups consecutive rows into tables.
///
/// Each row is compared only with the row directly above it. A layout whose
/// columns drift a little on every line keeps extending the same table, and
/// can swallow an unrelated table below it when every adjacent pair still
/// scores above the threshold. Consumers filter tables by header content
/// afterwards, so over-merged tables are tolerated.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TableDetector {
    config: DetectorConfig,
}

impl TableDetector {
    #[must_use]
    pub fn new(config: DetectorConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Fraction of `previous` tokens that overlap some token of `current`,
    /// relative to the wider of the two rows.
    #[must_use]
    pub fn alignment_score(&self, previous: &Row, current: &Row) -> f64 {
        if previous.is_empty() || current.is_empty() {
            return 0.0;
        }

        let aligned = previous
            .tokens()
            .iter()
            .filter(|upper| {
                current
                    .tokens()
                    .iter()
                    .any(|lower| upper.overlaps_horizontally(lower, self.config.overlap_tolerance))
            })
            .count();
        let total = previous.len().max(current.len());
        aligned as f64 / total as f64
    }

    pub fn detect(&self, rows: Vec<Row>) -> Vec<Table> {
        let mut tables = Vec::new();
        let mut current_rows: Vec<Row> = Vec::new();

        let flush_current = |rows: &mut Vec<Row>, tables: &mut Vec<Table>| {
            if let Some(table) = Table::new(std::mem::take(rows)) {
                tables.push(table);
            }
        };

        for row in rows {
            let extends_table = current_rows.last().is_some_and(|previous| {
                self.alignment_score(previous, &row) > self.config.alignment_threshold
            });
            if !extends_table {
                flush_current(&mut current_rows, &mut tables);
            }
            current_rows.push(row);
        }

        flush_current(&mut current_rows, &mut tables);
        tracing::debug!(tables = tables.len(), "grouped rows into tables");
        tables
    }
}

#[cfg(test)]
mod tests {
    use super::{DetectorConfig, TableDetector};
    use crate::model::Row;
    use crate::token::Token;

    fn row(y: i64, columns: &[(i64, i64)]) -> Row {
        Row::new(
            columns
                .iter()
                .map(|&(x, width)| Token::new(format!("{x}@{y}"), (x, y), (width, 12), 90.0))
                .collect(),
        )
    }

    #[test]
    fn aligned_rows_form_one_table() {
        let columns = [(0, 80), (200, 80), (400, 80)];
        let rows = vec![row(0, &columns), row(30, &columns), row(60, &columns)];
        let tables = TableDetector::default().detect(rows);
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].len(), 3);
    }

    #[test]
    fn single_row_never_becomes_a_table() {
        let tables = TableDetector::default().detect(vec![row(0, &[(0, 80), (200, 80)])]);
        assert!(tables.is_empty());
        assert!(TableDetector::default().detect(Vec::new()).is_empty());
    }

    #[test]
    fn misaligned_row_splits_tables_and_drops_singletons() {
        let left = [(0, 80), (200, 80)];
        let shifted = [(100, 40), (600, 40)];
        let rows = vec![
            row(0, &left),
            row(30, &left),
            row(60, &shifted),
            row(90, &left),
            row(120, &left),
        ];
        let tables = TableDetector::default().detect(rows);
        assert_eq!(tables.len(), 2);
        assert!(tables.iter().all(|table| table.len() >= 2));
    }

    #[test]
    fn score_is_relative_to_wider_row() {
        let detector = TableDetector::default();
        let two = row(0, &[(0, 80), (200, 80)]);
        let four = row(30, &[(0, 80), (200, 80), (400, 80), (600, 80)]);
        assert!((detector.alignment_score(&two, &four) - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn exactly_half_aligned_does_not_extend() {
        let two = [(0, 80), (200, 80)];
        let four = [(0, 80), (200, 80), (400, 80), (600, 80)];
        let tables = TableDetector::default().detect(vec![row(0, &two), row(30, &four)]);
        assert!(tables.is_empty());
    }

    #[test]
    fn drifting_columns_chain_into_one_table() {
        let rows = (0..6)
            .map(|step| row(step * 30, &[(step * 30, 80), (300 + step * 30, 80)]))
            .collect::<Vec<_>>();
        let tables = TableDetector::default().detect(rows);
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].len(), 6);
    }

    #[test]
    fn custom_threshold_is_respected() {
        let detector = TableDetector::new(DetectorConfig {
            alignment_threshold: 0.4,
            ..DetectorConfig::default()
        });
        let two = [(0, 80), (200, 80)];
        let four = [(0, 80), (200, 80), (400, 80), (600, 80)];
        let tables = detector.detect(vec![row(0, &two), row(30, &four)]);
        assert_eq!(tables.len(), 1);
    }
}
