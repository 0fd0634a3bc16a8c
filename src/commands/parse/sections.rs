use super::*;

/// Inclusive printed-page span of one section's body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SectionSpan {
    pub start_page: u32,
    pub end_page: u32,
    /// The next entry starts on the same page.
    pub shares_start_page: bool,
}

#[derive(Debug, Clone)]
pub(crate) struct ExtractOptions {
    pub doc_title: String,
    pub page_offset: i64,
    pub shared_page_policy: SharedPagePolicy,
}

/// Each entry runs up to the page before its successor; the last runs to the
/// end of the document. Spans never end before they start.
pub(crate) fn resolve_section_spans(entries: &[TocEntry], last_page: u32) -> Vec<SectionSpan> {
    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let start_page = entry.page;
            match entries.get(index + 1) {
                Some(next) => SectionSpan {
                    start_page,
                    end_page: next.page.saturating_sub(1).max(start_page),
                    shares_start_page: next.page == start_page,
                },
                None => SectionSpan {
                    start_page,
                    end_page: last_page.max(start_page),
                    shares_start_page: false,
                },
            }
        })
        .collect()
}

pub(crate) fn extract_section_content(
    source: &impl TextSource,
    entries: &[TocEntry],
    options: &ExtractOptions,
) -> Vec<SectionRecord> {
    if entries.is_empty() {
        return Vec::new();
    }

    let last_page = last_printed_page(source.page_count(), options.page_offset);
    let spans = resolve_section_spans(entries, last_page);

    entries
        .iter()
        .zip(&spans)
        .enumerate()
        .map(|(index, (entry, span))| {
            let text = if span.shares_start_page {
                text_before_next_heading(source, entry, &entries[index + 1], options.page_offset)
            } else {
                let follows_shared_start = index > 0 && spans[index - 1].shares_start_page;
                let from_heading = follows_shared_start
                    && options.shared_page_policy == SharedPagePolicy::SplitAtHeadings;
                span_text(source, entry, span, options.page_offset, from_heading)
            };

            SectionRecord {
                doc_title: options.doc_title.clone(),
                section_id: entry.section_id.clone(),
                title: entry.title.clone(),
                page: entry.page,
                page_end: span.end_page,
                level: entry.level,
                parent_id: entry.parent_id.clone(),
                full_path: entry.full_path(),
                tags: Vec::new(),
                text,
            }
        })
        .collect()
}

/// Lines between an entry's own heading and the next entry's heading on the
/// shared start page. Empty when the next heading cannot be found.
fn text_before_next_heading(
    source: &impl TextSource,
    entry: &TocEntry,
    next: &TocEntry,
    page_offset: i64,
) -> String {
    let Some(index) = physical_index(entry.page, page_offset) else {
        return String::new();
    };
    let lines = source.page_lines(index);

    let start = find_heading_line(&lines, entry, 0).map_or(0, |line| line + 1);
    let Some(end) = find_heading_line(&lines, next, start) else {
        return String::new();
    };

    lines[start..end].join("\n").trim().to_string()
}

fn span_text(
    source: &impl TextSource,
    entry: &TocEntry,
    span: &SectionSpan,
    page_offset: i64,
    from_heading: bool,
) -> String {
    let mut pages = Vec::<String>::new();

    for page in span.start_page..=span.end_page {
        let Some(text) = physical_index(page, page_offset).and_then(|index| source.page_text(index))
        else {
            continue;
        };

        if from_heading && page == span.start_page {
            let lines = text.lines().collect::<Vec<&str>>();
            let start = find_heading_line(&lines, entry, 0).unwrap_or(0);
            pages.push(lines[start..].join("\n"));
        } else {
            pages.push(text.to_string());
        }
    }

    pages.join("\n").trim().to_string()
}

pub(crate) fn find_heading_line(lines: &[&str], entry: &TocEntry, from: usize) -> Option<usize> {
    let full_key = normalize_heading(&entry.full_path());
    let title_key = normalize_heading(&entry.title);

    lines
        .iter()
        .enumerate()
        .skip(from)
        .find(|(_, line)| heading_matches(line, entry, &full_key, &title_key))
        .map(|(index, _)| index)
}

fn heading_matches(line: &str, entry: &TocEntry, full_key: &str, title_key: &str) -> bool {
    let normalized = normalize_heading(line);
    if normalized.is_empty() {
        return false;
    }
    if normalized.starts_with(full_key) {
        return true;
    }

    match entry.section_id.as_deref() {
        // Wrapped headings: the line holds the id and the first part of the title.
        Some(id) => normalized
            .strip_prefix(id)
            .and_then(|rest| rest.strip_prefix(' '))
            .is_some_and(|rest| !rest.is_empty() && title_key.starts_with(rest)),
        None => normalized == title_key,
    }
}

fn normalize_heading(input: &str) -> String {
    input
        .split_whitespace()
        .collect::<Vec<&str>>()
        .join(" ")
        .to_lowercase()
}
