use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::cli::StatusArgs;
use crate::commands::parse::{METADATA_FILE, REPORT_JSON_FILE};
use crate::model::{DocumentMetadata, ValidationReport};

pub fn run(args: StatusArgs) -> Result<()> {
    let metadata_path = args.output_dir.join(METADATA_FILE);
    let report_path = args.output_dir.join(REPORT_JSON_FILE);

    info!(output_dir = %args.output_dir.display(), "status requested");

    if metadata_path.exists() {
        let metadata = load_metadata(&metadata_path)?;
        info!(
            doc_title = %metadata.doc_title,
            total_pages = metadata.total_pages,
            generated_at = %metadata.generated_at,
            source_file = %metadata.source_file,
            source_sha256 = %metadata.source_sha256,
            page_offset = metadata.page_offset,
            toc_source = %metadata.toc_source,
            pdftotext = metadata.pdftotext_version.as_deref().unwrap_or(""),
            "loaded metadata record"
        );
    } else {
        warn!(path = %metadata_path.display(), "metadata record missing");
    }

    if report_path.exists() {
        let raw = fs::read(&report_path)
            .with_context(|| format!("failed to read {}", report_path.display()))?;
        let report: ValidationReport = serde_json::from_slice(&raw)
            .with_context(|| format!("failed to parse {}", report_path.display()))?;

        let summary = &report.summary;
        info!(
            generated_at = %report.generated_at,
            toc_entries = summary.toc_entry_count,
            section_records = summary.section_record_count,
            list_of_tables = summary.list_of_tables_count,
            body_tables = summary.body_table_count,
            empty_sections = summary.empty_text_section_count,
            mismatches = report.mismatches.len(),
            "loaded validation report"
        );
        for mismatch in &report.mismatches {
            info!(
                kind = mismatch.kind.as_str(),
                expected = %mismatch.expected,
                actual = %mismatch.actual,
                section_ids = %mismatch.section_ids.join(","),
                "mismatch"
            );
        }
    } else {
        warn!(path = %report_path.display(), "validation report missing");
    }

    Ok(())
}

fn load_metadata(path: &Path) -> Result<DocumentMetadata> {
    let raw =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let line = raw
        .lines()
        .find(|line| !line.trim().is_empty())
        .with_context(|| format!("metadata record is empty: {}", path.display()))?;

    serde_json::from_str(line).with_context(|| format!("failed to parse {}", path.display()))
}
