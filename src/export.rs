//! CSV export of report tables

use std::io::Write;

use anyhow::Result;
use csv::WriterBuilder;
use serde::Serialize;

use crate::report::Report;

fn write_rows<W: Write, T: Serialize>(out: W, rows: &[T]) -> Result<()> {
    let mut writer = WriterBuilder::new().has_headers(true).from_writer(out);
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write the report's main table as CSV with a header row
pub fn write_csv<W: Write>(report: &Report, out: W) -> Result<()> {
    match report {
        Report::PassengerFlow(r) => write_rows(out, &r.rows),
        Report::DirectionLoad(r) => write_rows(out, &r.rows),
        Report::TripLoad(r) => write_rows(out, &r.rows),
        Report::Money(r) => write_rows(out, &r.rows),
    }
}
