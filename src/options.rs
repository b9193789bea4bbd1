use std::collections::BTreeSet;
use std::str::FromStr;

use crate::error::ExtractError;

/// Whether the first grid row becomes the column labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderMode {
    FirstRow,
    NoHeader,
}

/// Column layout of the written BOM CSV.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BomLayout {
    WithLocation,
    TextOnly,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSelection {
    pages: BTreeSet<u32>,
}

impl PageSelection {
    #[must_use]
    pub fn range(start: u32, end: u32) -> Self {
        Self {
            pages: (start.max(1)..=end).collect(),
        }
    }

    #[must_use]
    pub fn contains(&self, page: u32) -> bool {
        self.pages.contains(&page)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.pages.iter().copied()
    }
}

impl FromStr for PageSelection {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let mut pages = BTreeSet::new();
        for token in value.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            if let Some((start, end)) = token.split_once('-') {
                let start: u32 = start
                    .trim()
                    .parse()
                    .map_err(|_| format!("invalid page range start: '{start}'"))?;
                let end: u32 = end
                    .trim()
                    .parse()
                    .map_err(|_| format!("invalid page range end: '{end}'"))?;
                if start == 0 || end == 0 {
                    return Err("pages are 1-based".to_string());
                }
                if end < start {
                    return Err(format!(
                        "invalid range '{token}': end is smaller than start"
                    ));
                }
                pages.extend(start..=end);
            } else {
                let page: u32 = token
                    .parse()
                    .map_err(|_| format!("invalid page number: '{token}'"))?;
                if page == 0 {
                    return Err("pages are 1-based".to_string());
                }
                pages.insert(page);
            }
        }

        if pages.is_empty() {
            return Err("page selection cannot be empty".to_string());
        }

        Ok(Self { pages })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExtractOptions {
    /// Maximum y-gap between consecutive tokens of one row, in pixels.
    pub row_threshold: i64,
    /// Horizontal gap reserved for column splitting; no current stage reads it.
    pub col_threshold: i64,
    pub overlap_tolerance: f64,
    /// Rows continue a table only when their alignment score is strictly above this.
    pub alignment_threshold: f64,
    /// Pages whose position logs feed the structural ATM table search.
    pub atm_pages: PageSelection,
    pub atm_min_cols: usize,
    pub header_mode: HeaderMode,
    pub bom_layout: BomLayout,
}

impl ExtractOptions {
    pub fn validate(&self) -> Result<(), ExtractError> {
        if self.row_threshold <= 0 {
            return Err(ExtractError::InvalidOption(
                "row_threshold must be positive".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.overlap_tolerance) {
            return Err(ExtractError::InvalidOption(
                "overlap_tolerance must be within 0..=1".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.alignment_threshold) {
            return Err(ExtractError::InvalidOption(
                "alignment_threshold must be within 0..=1".to_string(),
            ));
        }
        if self.atm_min_cols == 0 {
            return Err(ExtractError::InvalidOption(
                "atm_min_cols must be at least 1".to_string(),
            ));
        }
        if self.atm_pages.is_empty() {
            return Err(ExtractError::InvalidPageSelection(
                "atm_pages cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            row_threshold: 20,
            col_threshold: 30,
            overlap_tolerance: 0.5,
            alignment_threshold: 0.5,
            atm_pages: PageSelection::range(1, 4),
            atm_min_cols: 3,
            header_mode: HeaderMode::FirstRow,
            bom_layout: BomLayout::WithLocation,
        }
    }
}
