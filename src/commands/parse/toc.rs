use super::*;

/// Flat, document-ordered ToC with an index from section id to entry.
///
/// The first entry carrying an id owns its slot in the index; later duplicates
/// stay in `entries` but are only reachable positionally.
#[derive(Debug, Clone, Default)]
pub(crate) struct TocHierarchy {
    entries: Vec<TocEntry>,
    by_id: HashMap<String, usize>,
}

impl TocHierarchy {
    pub(crate) fn from_entries(entries: Vec<TocEntry>) -> Self {
        let mut by_id = HashMap::new();
        for (index, entry) in entries.iter().enumerate() {
            if let Some(id) = &entry.section_id {
                by_id.entry(id.clone()).or_insert(index);
            }
        }

        Self { entries, by_id }
    }

    pub(crate) fn entries(&self) -> &[TocEntry] {
        &self.entries
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn get(&self, section_id: &str) -> Option<&TocEntry> {
        self.by_id
            .get(section_id)
            .and_then(|index| self.entries.get(*index))
    }

    pub(crate) fn parent_of(&self, entry: &TocEntry) -> Option<&TocEntry> {
        entry.parent_id.as_deref().and_then(|id| self.get(id))
    }

    /// Nested entries whose parent never appeared earlier in the ToC.
    pub(crate) fn orphans(&self) -> impl Iterator<Item = &TocEntry> {
        self.entries
            .iter()
            .filter(|entry| entry.level > 1 && self.parent_of(entry).is_none())
    }

    /// Ids that appear on more than one entry, in first-seen order.
    pub(crate) fn duplicate_ids(&self) -> Vec<&str> {
        let mut duplicates = Vec::new();
        for (index, entry) in self.entries.iter().enumerate() {
            let Some(id) = entry.section_id.as_deref() else {
                continue;
            };
            if self.by_id.get(id) != Some(&index) && !duplicates.contains(&id) {
                duplicates.push(id);
            }
        }
        duplicates
    }
}

pub(crate) fn derive_level(section_id: Option<&str>) -> u32 {
    section_id.map_or(1, |id| id.split('.').count() as u32)
}

pub(crate) fn parent_prefix(section_id: &str) -> Option<&str> {
    section_id.rsplit_once('.').map(|(prefix, _)| prefix)
}

/// Assigns level and parent links while entries arrive in ToC order.
#[derive(Debug, Default)]
struct TocBuilder {
    entries: Vec<TocEntry>,
    seen_ids: HashSet<String>,
}

impl TocBuilder {
    fn push(&mut self, section_id: Option<String>, title: String, page: u32) {
        let level = derive_level(section_id.as_deref());
        let parent_id = section_id
            .as_deref()
            .and_then(parent_prefix)
            .filter(|prefix| self.seen_ids.contains(*prefix))
            .map(ToOwned::to_owned);

        if let Some(id) = &section_id {
            self.seen_ids.insert(id.clone());
        }

        self.entries.push(TocEntry {
            section_id,
            title,
            page,
            level,
            parent_id,
        });
    }

    fn has_numbered_entries(&self) -> bool {
        !self.seen_ids.is_empty()
    }

    fn finish(self) -> TocHierarchy {
        TocHierarchy::from_entries(self.entries)
    }
}

/// Continuation lines joined onto a numbered title before it is given up.
const MAX_WRAPPED_LINES: usize = 3;

#[derive(Debug)]
pub(crate) struct TocParser {
    numbered_line: Regex,
    numbered_head: Regex,
    unnumbered_line: Regex,
    caption_line: Regex,
    contents_heading: Regex,
}

impl TocParser {
    pub(crate) fn new() -> Result<Self> {
        Ok(Self {
            numbered_line: Regex::new(
                r"^\s*(\d+(?:\.\d+)*|[A-Z](?:\.\d+)+)\.?\s+(\S.*?)(?:\s*(?:\.\s*){2,}|\s*…+\s*|\s+)(\d{1,4})\s*$",
            )
            .context("failed to compile numbered ToC line regex")?,
            numbered_head: Regex::new(r"^\s*(?:\d+(?:\.\d+)*|[A-Z](?:\.\d+)+)\.?\s+[A-Za-z]")
                .context("failed to compile numbered ToC head regex")?,
            unnumbered_line: Regex::new(r"^\s*([A-Za-z].*?)\s*(?:\.\s*){3,}(\d{1,4})\s*$")
                .context("failed to compile unnumbered ToC line regex")?,
            caption_line: Regex::new(r"(?i)^\s*(?:table|figure)\s")
                .context("failed to compile caption prefix regex")?,
            contents_heading: Regex::new(r"(?i)\b(?:table of contents|contents)\b")
                .context("failed to compile contents heading regex")?,
        })
    }

    /// Splits a ToC line into `(section_id, title, page)`.
    pub(crate) fn parse_line(&self, line: &str) -> Option<(Option<String>, String, u32)> {
        let (section_id, raw_title, raw_page) =
            if let Some(captures) = self.numbered_line.captures(line) {
                (
                    Some(captures.get(1)?.as_str().to_string()),
                    captures.get(2)?.as_str(),
                    captures.get(3)?.as_str(),
                )
            } else {
                if self.caption_line.is_match(line) {
                    return None;
                }
                let captures = self.unnumbered_line.captures(line)?;
                (None, captures.get(1)?.as_str(), captures.get(2)?.as_str())
            };

        let title = clean_title(raw_title);
        let page = raw_page.parse::<u32>().ok().filter(|page| *page > 0)?;
        if title.is_empty() {
            return None;
        }

        Some((section_id, title, page))
    }

    pub(crate) fn parse_toc(
        &self,
        source: &impl TextSource,
        toc_page_range: PageRange,
    ) -> Result<TocHierarchy> {
        if !toc_page_range.fits_within(source.page_count()) {
            bail!(
                "ToC page range {} is outside the document ({} pages)",
                toc_page_range,
                source.page_count()
            );
        }

        let mut builder = TocBuilder::default();
        // Numbered title still waiting for its page number, and how many lines it spans.
        let mut pending: Option<(String, usize)> = None;
        let mut skipped = 0usize;
        for line in source.lines_in(toc_page_range.indices()) {
            if line.trim().is_empty() {
                continue;
            }

            if let Some((head, wrapped)) = pending.take() {
                if !self.numbered_head.is_match(line) {
                    let joined = format!("{} {}", head.trim_end(), line.trim());
                    match self.parse_line(&joined) {
                        Some((Some(section_id), title, page)) => {
                            builder.push(Some(section_id), title, page)
                        }
                        _ if wrapped < MAX_WRAPPED_LINES => pending = Some((joined, wrapped + 1)),
                        _ => skipped += 1,
                    }
                    continue;
                }
                skipped += 1;
            }

            match self.parse_line(line) {
                Some((Some(section_id), title, page)) => {
                    builder.push(Some(section_id), title, page)
                }
                // Unnumbered entries only belong to the front matter.
                Some((None, title, page)) if !builder.has_numbered_entries() => {
                    builder.push(None, title, page)
                }
                None if self.numbered_head.is_match(line) => pending = Some((line.to_string(), 1)),
                _ => skipped += 1,
            }
        }
        if pending.is_some() {
            skipped += 1;
        }

        let hierarchy = builder.finish();
        debug!(
            pages = %toc_page_range,
            entries = hierarchy.len(),
            skipped_lines = skipped,
            "parsed ToC pages"
        );

        Ok(hierarchy)
    }

    /// Page range around the first "Contents" heading in the front matter.
    pub(crate) fn guess_toc_pages(&self, source: &impl TextSource) -> Option<PageRange> {
        let page_count = source.page_count();
        if page_count == 0 {
            return None;
        }

        let first_hit = (0..page_count.min(40)).find(|index| {
            source
                .page_text(*index)
                .is_some_and(|text| self.contents_heading.is_match(text))
        });

        let (start, end) = match first_hit {
            Some(hit) => (hit.saturating_sub(1), (hit + 8).min(page_count - 1)),
            None => (0, page_count.min(10) - 1),
        };

        Some(PageRange::new(start + 1, end + 1))
    }
}

/// Builds the hierarchy from PDF bookmarks, mapping physical to printed pages.
pub(crate) fn toc_from_outline(outline: &[OutlineEntry], page_offset: i64) -> TocHierarchy {
    let mut builder = TocBuilder::default();

    for item in outline {
        let printed = i64::try_from(item.page_pdf)
            .unwrap_or(i64::MAX)
            .saturating_sub(page_offset);
        let Some(page) = u32::try_from(printed).ok().filter(|page| *page > 0) else {
            continue;
        };

        let (section_id, title) = split_outline_label(&item.label);
        if title.is_empty() {
            continue;
        }
        builder.push(section_id, title, page);
    }

    builder.finish()
}

fn split_outline_label(label: &str) -> (Option<String>, String) {
    let label = label.trim();
    if let Some((head, rest)) = label.split_once(char::is_whitespace) {
        let head = head.trim_end_matches('.');
        if is_section_id(head) {
            return (Some(head.to_string()), rest.trim().to_string());
        }
    }

    (None, label.to_string())
}

/// `6.4.1` style ids, or appendix ids such as `A.1` with a leading capital.
fn is_section_id(candidate: &str) -> bool {
    let is_number = |part: &str| !part.is_empty() && part.chars().all(|ch| ch.is_ascii_digit());
    let mut parts = candidate.split('.');
    let Some(first) = parts.next() else {
        return false;
    };
    let rest = parts.collect::<Vec<&str>>();

    if is_number(first) {
        rest.iter().copied().all(is_number)
    } else {
        first.len() == 1
            && first.chars().all(|ch| ch.is_ascii_uppercase())
            && !rest.is_empty()
            && rest.iter().copied().all(is_number)
    }
}

fn clean_title(raw_title: &str) -> String {
    raw_title
        .trim_end_matches(|ch: char| ch == '.' || ch == '…' || ch.is_whitespace())
        .split_whitespace()
        .collect::<Vec<&str>>()
        .join(" ")
}
