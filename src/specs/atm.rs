use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::grid::Grid;
use crate::model::AtmRecord;
use crate::options::ExtractOptions;
use crate::rows::RowClusterer;
use crate::specs::span_until;
use crate::table_detect::{DetectorConfig, TableDetector};
use crate::token::Token;

pub const MAX_DIMENSIONS: usize = 5;

static SITE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"ATM\s+SITE\s+(\d+)").expect("hardcoded ATM site regex is valid")
});
static SECTION_END_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"ATM\s+SITE\s+\d+|---\s+PAGE")
        .expect("hardcoded ATM section end regex is valid")
});
static LOCATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""L"\s+([\d+]+)"#).expect("hardcoded station regex is valid")
});
static DIMENSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\d+'-\d+[\s\d/]*""#).expect("hardcoded dimension regex is valid")
});
static SIGN_TYPE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"ATM\s+TYPE\s+\d+(?:\s+SIGN)?").expect("hardcoded sign type regex is valid")
});

/// Where the ATM sign specifications came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AtmSpecs {
    /// A reconstructed table whose header mentions ATM.
    Table(Grid),
    /// Per-site records scanned out of the whole-document text.
    Records(Vec<AtmRecord>),
}

impl AtmSpecs {
    /// `(site, sign types)` per entry. Table rows read the `Site` and
    /// `Sign Types` columns and fall back to empty strings.
    #[must_use]
    pub fn site_sign_types(&self) -> Vec<(String, String)> {
        match self {
            Self::Table(grid) => grid
                .to_records()
                .into_iter()
                .map(|record| {
                    let field = |label: &str| {
                        record
                            .get(label)
                            .and_then(Value::as_str)
                            .unwrap_or_default()
                            .to_string()
                    };
                    (field("Site"), field("Sign Types"))
                })
                .collect(),
            Self::Records(records) => records
                .iter()
                .map(|record| (record.site.clone(), record.sign_types.clone()))
                .collect(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Table(grid) => grid.rows().len(),
            Self::Records(records) => records.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Runs row clustering, table detection and grid building over `tokens` and
/// returns the first grid with enough columns and an ATM header.
pub fn find_atm_table(tokens: Vec<Token>, options: &ExtractOptions) -> Option<Grid> {
    let rows = RowClusterer::new(options.row_threshold).cluster(tokens);
    let tables = TableDetector::new(DetectorConfig::from(options)).detect(rows);

    tables
        .iter()
        .map(|table| Grid::from_table(table, options.header_mode))
        .find(|grid| grid.col_count() >= options.atm_min_cols && grid.has_header_containing("ATM"))
}

/// Splits `text` into `ATM SITE <n>` blocks. A block runs up to the next site
/// heading or `--- PAGE` marker; a trailing block with neither is discarded.
pub(crate) fn atm_sections(text: &str) -> Vec<&str> {
    let mut sections = Vec::new();
    let mut cursor = 0;

    while let Some(head) = SITE_RE.find_at(text, cursor) {
        let Some(section) = span_until(text, head, &SECTION_END_RE) else {
            break;
        };
        cursor = head.start() + section.len();
        sections.push(section);
    }

    sections
}

fn record_from_section(section: &str) -> Option<AtmRecord> {
    let site = SITE_RE.captures(section)?.get(1)?.as_str();

    let dimensions = DIMENSION_RE
        .find_iter(section)
        .map(|found| found.as_str().trim())
        .filter(|dimension| !dimension.is_empty())
        .take(MAX_DIMENSIONS)
        .collect::<Vec<_>>();
    let sign_types = SIGN_TYPE_RE
        .find_iter(section)
        .map(|found| found.as_str().trim())
        .filter(|sign_type| !sign_type.is_empty())
        .collect::<Vec<_>>();

    if dimensions.is_empty() || sign_types.is_empty() {
        return None;
    }

    let location = LOCATION_RE
        .captures(section)
        .and_then(|captures| captures.get(1))
        .map_or_else(String::new, |found| found.as_str().to_string());

    Some(AtmRecord {
        site: format!("Site {site}"),
        location,
        sign_types: sign_types.join(", "),
        dimensions: dimensions.join(", "),
    })
}

/// Whole-text fallback. `None` when no block yields a record.
pub fn atm_records_from_text(text: &str) -> Option<Vec<AtmRecord>> {
    let records = atm_sections(text)
        .into_iter()
        .filter_map(record_from_section)
        .collect::<Vec<_>>();

    if records.is_empty() {
        None
    } else {
        Some(records)
    }
}
