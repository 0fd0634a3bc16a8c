use std::io::Cursor;

use ooxml_sml::WorkbookBuilder;

use super::*;

const DETAIL_COLUMNS: [&str; 5] = ["Type", "Expected", "Actual", "Affected IDs", "Delta"];

/// Writes the report as a workbook with `Summary` and `Details` sheets.
pub(crate) fn write_report_workbook(path: &Path, report: &ValidationReport) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_directory(parent)?;
    }

    let mut workbook = WorkbookBuilder::new();

    {
        let sheet = workbook.add_sheet("Summary");
        sheet.set_cell("A1", "Metric");
        sheet.set_cell("B1", "Value");
        for (offset, (metric, value)) in summary_rows(report).into_iter().enumerate() {
            let row = offset + 2;
            sheet.set_cell(&format!("A{}", row), metric);
            sheet.set_cell(&format!("B{}", row), value as f64);
        }
    }

    {
        let sheet = workbook.add_sheet("Details");
        for (column, header) in DETAIL_COLUMNS.iter().enumerate() {
            sheet.set_cell(&format!("{}1", column_letter(column)), *header);
        }
        for (offset, mismatch) in report.mismatches.iter().enumerate() {
            let row = offset + 2;
            sheet.set_cell(&format!("A{}", row), mismatch.kind.as_str());
            sheet.set_cell(&format!("B{}", row), mismatch.expected.clone());
            sheet.set_cell(&format!("C{}", row), mismatch.actual.clone());
            sheet.set_cell(&format!("D{}", row), mismatch.section_ids.join(", "));
            if let Some(delta) = mismatch.delta {
                sheet.set_cell(&format!("E{}", row), delta as f64);
            }
        }
    }

    let mut cursor = Cursor::new(Vec::new());
    workbook
        .write(&mut cursor)
        .map_err(|error| anyhow!("failed to build workbook {}: {}", path.display(), error))?;

    fs::write(path, cursor.into_inner())
        .with_context(|| format!("failed to write workbook: {}", path.display()))?;

    Ok(())
}

pub(crate) fn summary_rows(report: &ValidationReport) -> Vec<(&'static str, usize)> {
    let summary = &report.summary;
    vec![
        ("Total Sections in ToC", summary.toc_entry_count),
        ("Total Section Records", summary.section_record_count),
        ("Tables in List of Tables", summary.list_of_tables_count),
        ("Table References in Body", summary.body_table_count),
        ("Sections Without Text", summary.empty_text_section_count),
        ("Mismatches", report.mismatches.len()),
    ]
}

fn column_letter(index: usize) -> char {
    (b'A' + index as u8) as char
}
