pub mod bom;
mod csv_out;
pub mod document;
mod error;
pub mod grid;
mod model;
mod options;
pub mod position_log;
pub mod rows;
mod source;
pub mod specs;
pub mod table_detect;
pub mod token;
mod warning;

use std::fs;
use std::path::{Path, PathBuf};

use crate::csv_out::{
    atm_records_csv_string, bom_csv_string, grid_csv_string, panel_schedule_csv_string,
    write_bom_csv,
};
use crate::rows::RowClusterer;
use crate::specs::atm::{atm_records_from_text, find_atm_table};
use crate::specs::panel::panel_schedule_from_text;
use crate::table_detect::{DetectorConfig, TableDetector};
use crate::warning::WarningCode;

pub use bom::{BomSummary, summarize, text_bom};
pub use document::{Document, DocumentTable, Element};
pub use error::ExtractError;
pub use grid::{Grid, Record};
pub use model::{AtmRecord, BomLine, PanelRow, Row, Table};
pub use options::{BomLayout, ExtractOptions, HeaderMode, PageSelection};
pub use source::ExtractedData;
pub use specs::atm::AtmSpecs;
pub use token::Token;
pub use warning::{ExtractWarning, WarningCode as ExtractWarningCode};

#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionReport {
    pub summary: BomSummary,
    pub warnings: Vec<ExtractWarning>,
}

impl ExtractionReport {
    fn new(lines: &[BomLine], warnings: Vec<ExtractWarning>) -> Self {
        Self {
            summary: summarize(lines),
            warnings,
        }
    }

    #[must_use]
    pub fn line_count(&self) -> usize {
        self.summary.line_count
    }
}

/// Rows, tables and grids for one token source, in reading order.
pub fn reconstruct_tables(
    tokens: Vec<Token>,
    options: &ExtractOptions,
) -> Result<Vec<Grid>, ExtractError> {
    options.validate()?;

    let rows = RowClusterer::new(options.row_threshold).cluster(tokens);
    let tables = TableDetector::new(DetectorConfig::from(options)).detect(rows);
    let grids = tables
        .iter()
        .map(|table| Grid::from_table(table, options.header_mode))
        .collect::<Vec<_>>();

    tracing::debug!(grids = grids.len(), "reconstructed tables");
    Ok(grids)
}

/// Extraction over one extracted-data directory.
#[derive(Debug, Clone)]
pub struct PlanExtractor {
    data: ExtractedData,
    options: ExtractOptions,
}

impl PlanExtractor {
    pub fn new(
        data_dir: impl Into<PathBuf>,
        options: ExtractOptions,
    ) -> Result<Self, ExtractError> {
        options.validate()?;
        Ok(Self {
            data: ExtractedData::new(data_dir),
            options,
        })
    }

    #[must_use]
    pub fn data(&self) -> &ExtractedData {
        &self.data
    }

    #[must_use]
    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    fn read_full_text(
        &self,
        warnings: &mut Vec<ExtractWarning>,
    ) -> Result<Option<String>, ExtractError> {
        let text = self.data.read_full_text()?;
        if text.is_none() {
            warnings.push(
                ExtractWarning::new(WarningCode::FullTextMissing, "whole-document text is absent")
                    .with_path(&self.data.full_text_path())
                    .logged(),
            );
        }
        Ok(text)
    }

    fn atm_table(
        &self,
        tokens: Vec<Token>,
        warnings: &mut Vec<ExtractWarning>,
    ) -> Option<AtmSpecs> {
        if let Some(grid) = find_atm_table(tokens, &self.options) {
            tracing::info!(rows = grid.rows().len(), "ATM specifications read from table");
            return Some(AtmSpecs::Table(grid));
        }
        warnings.push(
            ExtractWarning::new(
                WarningCode::AtmTableNotFound,
                "no ATM table in the selected pages; scanning whole-document text",
            )
            .logged(),
        );
        None
    }

    fn atm_fallback(
        full_text: Option<&str>,
        warnings: &mut Vec<ExtractWarning>,
    ) -> Option<AtmSpecs> {
        if let Some(records) = full_text.and_then(atm_records_from_text) {
            tracing::info!(sites = records.len(), "ATM specifications read from text");
            return Some(AtmSpecs::Records(records));
        }
        warnings.push(
            ExtractWarning::new(WarningCode::AtmSpecsNotFound, "no ATM specifications found")
                .logged(),
        );
        None
    }

    fn panel_schedule_from(
        full_text: Option<&str>,
        warnings: &mut Vec<ExtractWarning>,
    ) -> Option<Vec<PanelRow>> {
        let schedule = full_text.and_then(panel_schedule_from_text);
        match &schedule {
            Some(rows) => tracing::debug!(rows = rows.len(), "panel schedule extracted"),
            None => warnings.push(
                ExtractWarning::new(WarningCode::PanelScheduleNotFound, "no panel schedule found")
                    .logged(),
            ),
        }
        schedule
    }

    /// The first qualifying table over the configured pages, otherwise
    /// per-site records from the whole-document text.
    pub fn extract_atm_specifications(
        &self,
        warnings: &mut Vec<ExtractWarning>,
    ) -> Result<Option<AtmSpecs>, ExtractError> {
        let tokens = self
            .data
            .read_position_tokens(&self.options.atm_pages, warnings)?;
        if let Some(specs) = self.atm_table(tokens, warnings) {
            return Ok(Some(specs));
        }

        let full_text = self.read_full_text(warnings)?;
        Ok(Self::atm_fallback(full_text.as_deref(), warnings))
    }

    pub fn extract_panel_schedule(
        &self,
        warnings: &mut Vec<ExtractWarning>,
    ) -> Result<Option<Vec<PanelRow>>, ExtractError> {
        let full_text = self.read_full_text(warnings)?;
        Ok(Self::panel_schedule_from(full_text.as_deref(), warnings))
    }

    /// ATM lines, the panel line, then equipment lines. An empty list means
    /// no recognized vocabulary and is not an error.
    pub fn generate_bom(
        &self,
        warnings: &mut Vec<ExtractWarning>,
    ) -> Result<Vec<BomLine>, ExtractError> {
        let tokens = self
            .data
            .read_position_tokens(&self.options.atm_pages, warnings)?;
        let full_text = self.read_full_text(warnings)?;

        let atm = match self.atm_table(tokens, warnings) {
            Some(specs) => Some(specs),
            None => Self::atm_fallback(full_text.as_deref(), warnings),
        };
        let panel = Self::panel_schedule_from(full_text.as_deref(), warnings);
        let lines = bom::generate_bom(atm.as_ref(), panel.as_deref(), full_text.as_deref());

        if lines.is_empty() {
            warnings.push(
                ExtractWarning::new(
                    WarningCode::NoBomItems,
                    "no bill of materials items recognized",
                )
                .with_path(self.data.root())
                .logged(),
            );
        }
        tracing::debug!(lines = lines.len(), "generated bill of materials");
        Ok(lines)
    }

    pub fn atm_specifications_csv_string(
        &self,
        warnings: &mut Vec<ExtractWarning>,
    ) -> Result<Option<String>, ExtractError> {
        match self.extract_atm_specifications(warnings)? {
            Some(AtmSpecs::Records(records)) => Ok(Some(atm_records_csv_string(&records)?)),
            Some(AtmSpecs::Table(grid)) => Ok(Some(grid_csv_string(&grid)?)),
            None => Ok(None),
        }
    }

    pub fn panel_schedule_csv_string(
        &self,
        warnings: &mut Vec<ExtractWarning>,
    ) -> Result<Option<String>, ExtractError> {
        self.extract_panel_schedule(warnings)?
            .map(|rows| panel_schedule_csv_string(&rows))
            .transpose()
    }
}

pub fn extract_bom_to_csv(
    data_dir: &Path,
    output_csv: &Path,
    options: &ExtractOptions,
) -> Result<ExtractionReport, ExtractError> {
    let extractor = PlanExtractor::new(data_dir, options.clone())?;
    let mut warnings = Vec::new();
    let lines = extractor.generate_bom(&mut warnings)?;
    write_bom_csv(output_csv, &lines, options.bom_layout)?;

    Ok(ExtractionReport::new(&lines, warnings))
}

pub fn extract_bom_to_csv_string(
    data_dir: &Path,
    options: &ExtractOptions,
) -> Result<(String, ExtractionReport), ExtractError> {
    let extractor = PlanExtractor::new(data_dir, options.clone())?;
    let mut warnings = Vec::new();
    let lines = extractor.generate_bom(&mut warnings)?;
    let csv = bom_csv_string(&lines, options.bom_layout)?;

    Ok((csv, ExtractionReport::new(&lines, warnings)))
}

/// Text-only BOM for a single text file, written with the
/// `Item,Quantity,Description` layout. A missing input yields an empty BOM.
pub fn extract_text_bom_to_csv(
    input_text: &Path,
    output_csv: &Path,
) -> Result<ExtractionReport, ExtractError> {
    let mut warnings = Vec::new();
    let text = match fs::read_to_string(input_text) {
        Ok(text) => text,
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
            warnings.push(
                ExtractWarning::new(WarningCode::FullTextMissing, "input text is absent")
                    .with_path(input_text)
                    .logged(),
            );
            String::new()
        }
        Err(error) => return Err(error.into()),
    };

    let lines = text_bom(&text);
    if lines.is_empty() {
        warnings.push(
            ExtractWarning::new(WarningCode::NoBomItems, "no bill of materials items recognized")
                .with_path(input_text)
                .logged(),
        );
    }
    write_bom_csv(output_csv, &lines, BomLayout::TextOnly)?;

    Ok(ExtractionReport::new(&lines, warnings))
}
