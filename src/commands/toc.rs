use anyhow::Result;
use tracing::info;

use crate::cli::TocArgs;
use crate::commands::parse::{OutputPaths, PdfDocument, TextSource, prepare_toc, write_toc_records};

pub fn run(args: TocArgs) -> Result<()> {
    let document = PdfDocument::open(&args.pdf_path)?;
    let toc = prepare_toc(&document, args.toc_pages, args.page_offset, args.toc_source)?;

    let paths = OutputPaths::in_dir(&args.output_dir);
    write_toc_records(&paths.toc_records, &toc.hierarchy)?;

    let orphan_count = toc.hierarchy.orphans().count();
    info!(
        entries = toc.hierarchy.len(),
        orphans = orphan_count,
        toc_pages = %toc.toc_pages,
        page_offset = toc.page_offset,
        total_pages = document.page_count(),
        "ToC extraction completed"
    );

    Ok(())
}
