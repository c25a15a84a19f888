// src/report/sheet.rs
use crate::config::ReportLabels;
use crate::report::models::ExtractionResult;

pub const SHEET_COLUMNS: usize = 4;

pub type SheetRow = [String; SHEET_COLUMNS];

/// Projects a result into spreadsheet rows: one row per breakdown entry, a
/// total row per sector and a closing grand total row.
pub fn to_rows(result: &ExtractionResult, labels: &ReportLabels) -> Vec<SheetRow> {
    let mut rows = Vec::new();

    rows.push(row(&labels.title, "", "", ""));
    rows.push(blank());
    rows.push(row("Sector Name", "Facility Name", &labels.quantity_a, &labels.quantity_b));

    for sector in &result.sectors {
        for (index, entry) in sector.breakdown.iter().enumerate() {
            // sector name only on its first line, like a merged cell
            let sector_cell = if index == 0 { sector.sector_name.as_str() } else { "" };
            rows.push(row(
                sector_cell,
                &entry.facility_name,
                &format_quantity(entry.quantity_a),
                &format_quantity(entry.quantity_b),
            ));
        }
        rows.push(row(
            &format!("{} Total", sector.sector_name),
            "",
            &format_quantity(sector.total_quantity_a),
            &format_quantity(sector.total_quantity_b),
        ));
        rows.push(blank());
    }

    rows.push(blank());
    rows.push(row(
        "GRAND TOTAL",
        "",
        &format_quantity(result.grand_totals.total_quantity_a),
        &format_quantity(result.grand_totals.total_quantity_b),
    ));

    rows
}

/// Writes the rows as CSV.
pub fn write_csv<W: std::io::Write>(rows: &[SheetRow], writer: W) -> Result<(), csv::Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for r in rows {
        csv_writer.write_record(r)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Whole numbers print without a fractional part.
fn format_quantity(value: f64) -> String {
    format!("{}", value)
}

fn row(a: &str, b: &str, c: &str, d: &str) -> SheetRow {
    [a.to_string(), b.to_string(), c.to_string(), d.to_string()]
}

fn blank() -> SheetRow {
    Default::default()
}
