use super::*;

#[derive(Debug)]
pub(crate) struct TableParser {
    caption_line: Regex,
    table_reference: Regex,
    list_heading: Regex,
}

impl TableParser {
    pub(crate) fn new() -> Result<Self> {
        Ok(Self {
            caption_line: Regex::new(
                r"(?i)^\s*table\s+[A-Z]?\d+(?:[.\-‒–—―]\d+)*(?:[\s:]|$)",
            )
            .context("failed to compile list-of-tables caption regex")?,
            table_reference: Regex::new(r"(?i)\btable\s+[A-Z]?\d+(?:[.\-‒–—―]\d+)*")
                .context("failed to compile table reference regex")?,
            list_heading: Regex::new(r"(?i)\blist of tables\b")
                .context("failed to compile list-of-tables heading regex")?,
        })
    }

    /// Number of captions listed on the list-of-tables pages.
    ///
    /// A caption is counted at its `Table <id>` line, so wrapped captions whose
    /// page number sits on a later line still count once.
    pub(crate) fn parse_list_of_tables(
        &self,
        source: &impl TextSource,
        lot_page_range: PageRange,
    ) -> Result<usize> {
        if !lot_page_range.fits_within(source.page_count()) {
            bail!(
                "list-of-tables page range {} is outside the document ({} pages)",
                lot_page_range,
                source.page_count()
            );
        }

        let count = source
            .lines_in(lot_page_range.indices())
            .into_iter()
            .filter(|line| self.caption_line.is_match(line))
            .count();

        debug!(pages = %lot_page_range, tables = count, "parsed list of tables");
        Ok(count)
    }

    /// The first page mentioning "List of Tables" and the five pages after it.
    pub(crate) fn guess_list_of_tables_pages(&self, source: &impl TextSource) -> Option<PageRange> {
        let page_count = source.page_count();
        let hit = (0..page_count.min(50)).find(|index| {
            source
                .page_text(*index)
                .is_some_and(|text| self.list_heading.is_match(text))
        })?;

        Some(PageRange::new(hit + 1, (hit + 6).min(page_count)))
    }

    /// Occurrences of table references across all section bodies.
    ///
    /// Every mention counts, so a table cited twice is counted twice.
    pub(crate) fn count_tables_in_body(&self, records: &[SectionRecord]) -> usize {
        records
            .iter()
            .map(|record| self.table_reference.find_iter(&record.text).count())
            .sum()
    }
}
