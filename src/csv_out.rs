use std::io::Write;
use std::path::Path;

use csv::{Writer, WriterBuilder};

use crate::error::ExtractError;
use crate::grid::Grid;
use crate::model::{AtmRecord, BomLine, PanelRow};
use crate::options::BomLayout;

pub const BOM_HEADERS: [&str; 4] = ["Item", "Location", "Quantity", "Description"];
pub const TEXT_BOM_HEADERS: [&str; 3] = ["Item", "Quantity", "Description"];

fn write_bom_rows<W: Write>(
    writer: &mut Writer<W>,
    lines: &[BomLine],
    layout: BomLayout,
) -> Result<(), ExtractError> {
    match layout {
        BomLayout::WithLocation => {
            writer.write_record(BOM_HEADERS)?;
            for line in lines {
                let quantity = line.quantity.to_string();
                writer.write_record([
                    line.item.as_str(),
                    line.location.as_str(),
                    quantity.as_str(),
                    line.description.as_str(),
                ])?;
            }
        }
        BomLayout::TextOnly => {
            writer.write_record(TEXT_BOM_HEADERS)?;
            for line in lines {
                let quantity = line.quantity.to_string();
                writer.write_record([
                    line.item.as_str(),
                    quantity.as_str(),
                    line.description.as_str(),
                ])?;
            }
        }
    }
    writer.flush()?;
    Ok(())
}

fn into_string(writer: Writer<Vec<u8>>) -> Result<String, ExtractError> {
    let bytes = writer
        .into_inner()
        .map_err(|error| ExtractError::Csv(error.into_error().into()))?;
    String::from_utf8(bytes)
        .map_err(|error| ExtractError::InvalidOption(format!("invalid utf-8 csv output: {error}")))
}

pub(crate) fn write_bom_csv(
    path: &Path,
    lines: &[BomLine],
    layout: BomLayout,
) -> Result<(), ExtractError> {
    let mut writer = WriterBuilder::new().from_path(path)?;
    write_bom_rows(&mut writer, lines, layout)
}

pub(crate) fn bom_csv_string(lines: &[BomLine], layout: BomLayout) -> Result<String, ExtractError> {
    let mut writer = WriterBuilder::new().from_writer(Vec::<u8>::new());
    write_bom_rows(&mut writer, lines, layout)?;
    into_string(writer)
}

pub(crate) fn atm_records_csv_string(records: &[AtmRecord]) -> Result<String, ExtractError> {
    let mut writer = WriterBuilder::new().from_writer(Vec::<u8>::new());
    writer.write_record(AtmRecord::HEADERS)?;
    for record in records {
        writer.write_record(record.to_record())?;
    }
    writer.flush()?;
    into_string(writer)
}

pub(crate) fn panel_schedule_csv_string(rows: &[PanelRow]) -> Result<String, ExtractError> {
    let mut writer = WriterBuilder::new().from_writer(Vec::<u8>::new());
    writer.write_record(PanelRow::HEADERS)?;
    for row in rows {
        writer.write_record(row.to_record())?;
    }
    writer.flush()?;
    into_string(writer)
}

/// Grid body under its column labels, cells trimmed.
pub(crate) fn grid_csv_string(grid: &Grid) -> Result<String, ExtractError> {
    let mut writer = WriterBuilder::new().from_writer(Vec::<u8>::new());
    writer.write_record(grid.column_labels())?;
    for row in grid.rows() {
        writer.write_record(row.iter().map(|cell| cell.trim()))?;
    }
    writer.flush()?;
    into_string(writer)
}
