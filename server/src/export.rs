//! CSV rendering of the export table.

use csv::{Terminator, WriterBuilder};
use larder_engine::{ExportRow, ExportTable};

/// Title of the deliveries section.
pub const DELIVERIES_TITLE: &str = "Deliveries";
/// Title of the consumption section.
pub const CONSUMPTION_TITLE: &str = "Consumption";
/// Column header shared by both sections.
pub const HEADER: [&str; 4] = ["item", "date", "major", "minor"];

/// Render both sections, deliveries first, separated by a blank line.
pub fn render_csv(table: &ExportTable) -> Result<Vec<u8>, csv::Error> {
    let mut out = render_section(DELIVERIES_TITLE, &table.deliveries)?;
    out.push(b'\n');
    out.extend(render_section(CONSUMPTION_TITLE, &table.consumption)?);
    Ok(out)
}

fn render_section(title: &str, rows: &[ExportRow]) -> Result<Vec<u8>, csv::Error> {
    let mut writer = WriterBuilder::new()
        .flexible(true)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record([title])?;
    writer.write_record(HEADER)?;
    for row in rows {
        let major = row.major.to_string();
        let minor = row.minor.to_string();
        writer.write_record([
            row.item.as_str(),
            row.date.as_str(),
            major.as_str(),
            minor.as_str(),
        ])?;
    }

    writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))
}
