use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One row of the document's table of contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TocEntry {
    pub section_id: Option<String>,
    pub title: String,
    pub page: u32,
    pub level: u32,
    pub parent_id: Option<String>,
}

impl TocEntry {
    pub fn full_path(&self) -> String {
        match &self.section_id {
            Some(id) => format!("{} {}", id, self.title),
            None => self.title.clone(),
        }
    }

    pub fn id_label(&self) -> &str {
        self.section_id.as_deref().unwrap_or("-")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionRecord {
    pub doc_title: String,
    pub section_id: Option<String>,
    pub title: String,
    pub page: u32,
    pub page_end: u32,
    pub level: u32,
    pub parent_id: Option<String>,
    pub full_path: String,
    pub tags: Vec<String>,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub doc_title: String,
    pub total_pages: usize,
    pub generated_at: String,
    pub source_file: String,
    pub source_sha256: String,
    pub page_offset: i64,
    pub toc_source: String,
    pub pdftotext_version: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MismatchKind {
    SectionCount,
    SectionId,
    TableCount,
    PageOrder,
    OrphanParent,
}

impl MismatchKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SectionCount => "section_count",
            Self::SectionId => "section_id",
            Self::TableCount => "table_count",
            Self::PageOrder => "page_order",
            Self::OrphanParent => "orphan_parent",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mismatch {
    pub kind: MismatchKind,
    pub expected: String,
    pub actual: String,
    pub section_ids: Vec<String>,
    pub delta: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationSummary {
    pub toc_entry_count: usize,
    pub section_record_count: usize,
    pub list_of_tables_count: usize,
    pub body_table_count: usize,
    pub empty_text_section_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    pub generated_at: String,
    pub summary: ValidationSummary,
    pub mismatches: Vec<Mismatch>,
}

impl ValidationReport {
    pub fn mismatches_of(&self, kind: MismatchKind) -> impl Iterator<Item = &Mismatch> {
        self.mismatches
            .iter()
            .filter(move |mismatch| mismatch.kind == kind)
    }
}

/// Inclusive, 1-indexed range of physical PDF pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRange {
    pub first: usize,
    pub last: usize,
}

impl PageRange {
    pub fn new(first: usize, last: usize) -> Self {
        Self { first, last }
    }

    /// Zero-based page indices covered by the range.
    pub fn indices(self) -> std::ops::Range<usize> {
        self.first.saturating_sub(1)..self.last
    }

    pub fn fits_within(self, page_count: usize) -> bool {
        self.first >= 1 && self.first <= self.last && self.last <= page_count
    }
}

impl fmt::Display for PageRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.first == self.last {
            write!(f, "{}", self.first)
        } else {
            write!(f, "{}-{}", self.first, self.last)
        }
    }
}

impl FromStr for PageRange {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let parse_page = |value: &str| {
            value
                .trim()
                .parse::<usize>()
                .map_err(|_| format!("invalid page number '{}' in range '{}'", value.trim(), raw))
        };

        let (first, last) = match raw.split_once('-') {
            Some((first, last)) => (parse_page(first)?, parse_page(last)?),
            None => {
                let page = parse_page(raw)?;
                (page, page)
            }
        };

        if first == 0 || last < first {
            return Err(format!("page range '{}' must be 1-indexed and ascending", raw));
        }

        Ok(Self { first, last })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_range_parses_spans_and_single_pages() {
        assert_eq!("13-18".parse::<PageRange>(), Ok(PageRange::new(13, 18)));
        assert_eq!(" 7 ".parse::<PageRange>(), Ok(PageRange::new(7, 7)));
        assert!("0-3".parse::<PageRange>().is_err());
        assert!("9-3".parse::<PageRange>().is_err());
        assert!("a-3".parse::<PageRange>().is_err());
    }

    #[test]
    fn page_range_indices_are_zero_based() {
        let range = PageRange::new(3, 5);
        assert_eq!(range.indices().collect::<Vec<_>>(), vec![2, 3, 4]);
        assert!(range.fits_within(5));
        assert!(!range.fits_within(4));
        assert_eq!(range.to_string(), "3-5");
    }

    #[test]
    fn full_path_falls_back_to_title_without_id() {
        let entry = TocEntry {
            section_id: None,
            title: "Foreword".to_string(),
            page: 2,
            level: 1,
            parent_id: None,
        };
        assert_eq!(entry.full_path(), "Foreword");
        assert_eq!(entry.id_label(), "-");
    }
}
