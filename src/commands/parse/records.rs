use super::*;

pub(crate) const TOC_RECORDS_FILE: &str = "usb_pd_toc.jsonl";
pub(crate) const SPEC_RECORDS_FILE: &str = "usb_pd_spec.jsonl";
pub(crate) const METADATA_FILE: &str = "usb_pd_metadata.jsonl";
pub(crate) const REPORT_WORKBOOK_FILE: &str = "validation_report.xlsx";
pub(crate) const REPORT_JSON_FILE: &str = "validation_report.json";

#[derive(Debug, Clone)]
pub(crate) struct OutputPaths {
    pub toc_records: PathBuf,
    pub spec_records: PathBuf,
    pub metadata: PathBuf,
    pub report_workbook: PathBuf,
    pub report_json: PathBuf,
}

impl OutputPaths {
    pub(crate) fn in_dir(output_dir: &Path) -> Self {
        Self {
            toc_records: output_dir.join(TOC_RECORDS_FILE),
            spec_records: output_dir.join(SPEC_RECORDS_FILE),
            metadata: output_dir.join(METADATA_FILE),
            report_workbook: output_dir.join(REPORT_WORKBOOK_FILE),
            report_json: output_dir.join(REPORT_JSON_FILE),
        }
    }
}

pub(crate) fn write_toc_records(path: &Path, toc: &TocHierarchy) -> Result<()> {
    write_jsonl(path, toc.entries())?;
    info!(path = %path.display(), entries = toc.len(), "wrote ToC records");
    Ok(())
}

pub(crate) fn write_spec_records(path: &Path, records: &[SectionRecord]) -> Result<()> {
    write_jsonl(path, records)?;
    info!(path = %path.display(), records = records.len(), "wrote spec records");
    Ok(())
}

pub(crate) fn write_metadata_record(path: &Path, metadata: &DocumentMetadata) -> Result<()> {
    write_jsonl(path, std::slice::from_ref(metadata))?;
    info!(path = %path.display(), "wrote metadata record");
    Ok(())
}
