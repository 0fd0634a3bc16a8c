use super::*;

/// Page-indexed access to a document's text layer.
///
/// Indices are zero-based physical pages. Lines come back in layout order.
pub(crate) trait TextSource {
    fn page_count(&self) -> usize;

    fn page_text(&self, index: usize) -> Option<&str>;

    fn page_lines(&self, index: usize) -> Vec<&str> {
        self.page_text(index)
            .map(|text| text.lines().collect())
            .unwrap_or_default()
    }

    /// Lines of every page in `indices`, skipping pages the source does not have.
    fn lines_in(&self, indices: Range<usize>) -> Vec<&str> {
        indices.flat_map(|index| self.page_lines(index)).collect()
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PageTexts {
    pages: Vec<String>,
}

impl PageTexts {
    pub(crate) fn new(pages: Vec<String>) -> Self {
        Self { pages }
    }
}

impl TextSource for PageTexts {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_text(&self, index: usize) -> Option<&str> {
        self.pages.get(index).map(String::as_str)
    }
}

/// A PDF whose text layer has been loaded once with `pdftotext`.
#[derive(Debug)]
pub(crate) struct PdfDocument {
    path: PathBuf,
    pages: PageTexts,
}

impl PdfDocument {
    pub(crate) fn open(path: &Path) -> Result<Self> {
        if !path.is_file() {
            bail!("PDF not found: {}", path.display());
        }

        let pages = extract_pages_with_pdftotext(path)?;
        if pages.is_empty() {
            bail!("pdftotext returned no pages for {}", path.display());
        }

        info!(path = %path.display(), pages = pages.len(), "loaded pdf text layer");

        Ok(Self {
            path: path.to_path_buf(),
            pages: PageTexts::new(pages),
        })
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }
}

impl TextSource for PdfDocument {
    fn page_count(&self) -> usize {
        self.pages.page_count()
    }

    fn page_text(&self, index: usize) -> Option<&str> {
        self.pages.page_text(index)
    }
}

/// Zero-based physical index of a printed page number, if it can exist.
pub(crate) fn physical_index(printed_page: u32, page_offset: i64) -> Option<usize> {
    let index = (i64::from(printed_page) - 1).checked_add(page_offset)?;
    usize::try_from(index).ok()
}

/// Printed number of the document's final page.
pub(crate) fn last_printed_page(page_count: usize, page_offset: i64) -> u32 {
    let last = i64::try_from(page_count)
        .unwrap_or(i64::MAX)
        .saturating_sub(page_offset);
    u32::try_from(last.max(0)).unwrap_or(u32::MAX)
}
