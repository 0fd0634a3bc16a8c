use super::*;

/// The ToC of one document together with how it was located.
#[derive(Debug)]
pub(crate) struct PreparedToc {
    pub hierarchy: TocHierarchy,
    pub toc_pages: PageRange,
    pub page_offset: i64,
    pub source: TocSource,
}

pub fn run(args: ParseArgs) -> Result<()> {
    let paths = OutputPaths::in_dir(&args.output_dir);

    info!(
        pdf = %args.pdf_path.display(),
        output_dir = %args.output_dir.display(),
        "starting parse"
    );

    let document = PdfDocument::open(&args.pdf_path)?;
    let toc = prepare_toc(&document, args.toc_pages, args.page_offset, args.toc_source)?;

    let table_parser = TableParser::new()?;
    let lot_pages = match args.lot_pages {
        Some(range) => Some(range),
        None => table_parser.guess_list_of_tables_pages(&document),
    };
    let lot_count = match lot_pages {
        Some(range) => table_parser.parse_list_of_tables(&document, range)?,
        None => {
            warn!("no list-of-tables pages found; table cross-check uses 0");
            0
        }
    };

    let options = ExtractOptions {
        doc_title: args.doc_title.clone(),
        page_offset: toc.page_offset,
        shared_page_policy: args.shared_page_policy,
    };
    let records = extract_section_content(&document, toc.hierarchy.entries(), &options);
    let body_table_count = table_parser.count_tables_in_body(&records);

    let report = generate_validation_report(&toc.hierarchy, &records, lot_count, body_table_count);

    let metadata = DocumentMetadata {
        doc_title: args.doc_title.clone(),
        total_pages: document.page_count(),
        generated_at: now_utc_string(),
        source_file: document.path().display().to_string(),
        source_sha256: sha256_file(document.path())?,
        page_offset: toc.page_offset,
        toc_source: toc.source.as_str().to_string(),
        pdftotext_version: command_version_optional("pdftotext", &["-v"]),
    };

    write_toc_records(&paths.toc_records, &toc.hierarchy)?;
    write_spec_records(&paths.spec_records, &records)?;
    write_metadata_record(&paths.metadata, &metadata)?;
    write_report_workbook(&paths.report_workbook, &report)?;
    write_json_pretty(&paths.report_json, &report)?;
    info!(path = %paths.report_workbook.display(), "wrote validation report");

    log_report(&report);
    info!(
        sections = records.len(),
        policy = args.shared_page_policy.as_str(),
        "parse completed"
    );

    Ok(())
}

/// Locates the ToC pages, settles the page offset and parses the hierarchy.
///
/// An empty ToC is fatal: nothing downstream can be anchored without it.
pub(crate) fn prepare_toc(
    document: &PdfDocument,
    toc_pages: Option<PageRange>,
    page_offset: Option<i64>,
    toc_source: TocSource,
) -> Result<PreparedToc> {
    let parser = TocParser::new()?;

    let toc_pages = match toc_pages {
        Some(range) => range,
        None => parser
            .guess_toc_pages(document)
            .context("document has no pages to search for a table of contents")?,
    };
    if !toc_pages.fits_within(document.page_count()) {
        bail!(
            "ToC page range {} is outside the document ({} pages)",
            toc_pages,
            document.page_count()
        );
    }

    let page_offset = match page_offset {
        Some(offset) => offset,
        None => {
            let detector = PageLabelDetector::new()?;
            let inferred = infer_page_offset(document, &detector, toc_pages.last);
            info!(page_offset = inferred, "inferred printed page offset");
            inferred
        }
    };

    let (hierarchy, source) = match toc_source {
        TocSource::Pages => (parser.parse_toc(document, toc_pages)?, TocSource::Pages),
        TocSource::Outline => {
            let outline = extract_outline_entries(document.path())?;
            (toc_from_outline(&outline, page_offset), TocSource::Outline)
        }
        TocSource::Auto => match extract_outline_entries(document.path()) {
            Ok(outline) if !outline.is_empty() => {
                (toc_from_outline(&outline, page_offset), TocSource::Outline)
            }
            Ok(_) => {
                info!("pdf has no outline; reading ToC pages");
                (parser.parse_toc(document, toc_pages)?, TocSource::Pages)
            }
            Err(error) => {
                warn!(error = %error, "outline unavailable; reading ToC pages");
                (parser.parse_toc(document, toc_pages)?, TocSource::Pages)
            }
        },
    };

    if hierarchy.is_empty() {
        bail!(
            "no ToC entries found in {} (pages {}, source {})",
            document.path().display(),
            toc_pages,
            source.as_str()
        );
    }

    let duplicates = hierarchy.duplicate_ids();
    if !duplicates.is_empty() {
        warn!(ids = %duplicates.join(","), "ToC contains repeated section ids");
    }

    info!(
        entries = hierarchy.len(),
        pages = %toc_pages,
        source = source.as_str(),
        "parsed table of contents"
    );

    Ok(PreparedToc {
        hierarchy,
        toc_pages,
        page_offset,
        source,
    })
}

fn log_report(report: &ValidationReport) {
    let summary = &report.summary;
    info!(
        toc_entries = summary.toc_entry_count,
        section_records = summary.section_record_count,
        list_of_tables = summary.list_of_tables_count,
        body_tables = summary.body_table_count,
        empty_sections = summary.empty_text_section_count,
        mismatches = report.mismatches.len(),
        "validation summary"
    );

    for kind in [
        MismatchKind::SectionCount,
        MismatchKind::SectionId,
        MismatchKind::TableCount,
        MismatchKind::PageOrder,
        MismatchKind::OrphanParent,
    ] {
        let count = report.mismatches_of(kind).count();
        if count > 0 {
            warn!(kind = kind.as_str(), count, "validation mismatches");
        }
    }
}
