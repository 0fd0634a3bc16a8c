use super::*;

pub(crate) fn extract_pages_with_pdftotext(pdf_path: &Path) -> Result<Vec<String>> {
    let output = Command::new("pdftotext")
        .arg("-enc")
        .arg("UTF-8")
        .arg(pdf_path)
        .arg("-")
        .output()
        .with_context(|| format!("failed to execute pdftotext for {}", pdf_path.display()))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!(
            "pdftotext returned non-zero exit status for {}: {}",
            pdf_path.display(),
            stderr.trim()
        );
    }

    let raw = String::from_utf8_lossy(&output.stdout);
    let mut pages: Vec<String> = raw
        .split('\u{000C}')
        .map(|chunk| chunk.replace('\u{0000}', ""))
        .collect();

    // pdftotext terminates every page with a form feed.
    if pages.last().is_some_and(|page| page.trim().is_empty()) {
        pages.pop();
    }

    Ok(pages)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct OutlineEntry {
    pub label: String,
    pub page_pdf: usize,
}

/// Reads the PDF bookmark tree in document order.
pub(crate) fn extract_outline_entries(pdf_path: &Path) -> Result<Vec<OutlineEntry>> {
    let output = Command::new("pdftohtml")
        .arg("-xml")
        .arg("-f")
        .arg("1")
        .arg("-l")
        .arg("1")
        .arg(pdf_path)
        .arg("-stdout")
        .output()
        .with_context(|| format!("failed to execute pdftohtml for {}", pdf_path.display()))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!(
            "pdftohtml returned non-zero exit status for {}: {}",
            pdf_path.display(),
            stderr.trim()
        );
    }

    let xml = String::from_utf8_lossy(&output.stdout);
    parse_outline_xml(&xml)
}

pub(crate) fn parse_outline_xml(xml: &str) -> Result<Vec<OutlineEntry>> {
    let item_regex = Regex::new(r#"<item page="(\d+)">(.*?)</item>"#)
        .context("failed to compile outline item regex")?;

    let mut entries = Vec::new();
    for captures in item_regex.captures_iter(xml) {
        let Some(page_pdf) = captures
            .get(1)
            .and_then(|value| value.as_str().parse::<usize>().ok())
        else {
            continue;
        };

        let label = normalize_outline_label(captures.get(2).map_or("", |value| value.as_str()));
        if label.is_empty() {
            continue;
        }

        entries.push(OutlineEntry { label, page_pdf });
    }

    Ok(entries)
}

fn normalize_outline_label(raw_label: &str) -> String {
    raw_label
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace('\u{00a0}', " ")
        .split_whitespace()
        .collect::<Vec<&str>>()
        .join(" ")
}

pub(crate) fn command_version_optional(program: &str, args: &[&str]) -> Option<String> {
    let output = Command::new(program).args(args).output().ok()?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    let source = if stdout.trim().is_empty() {
        stderr.trim()
    } else {
        stdout.trim()
    };

    source
        .lines()
        .next()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| line.to_string())
}

/// Finds the page number printed in a page's header or footer.
#[derive(Debug)]
pub(crate) struct PageLabelDetector {
    page_word: Regex,
    number: Regex,
    roman: Regex,
}

impl PageLabelDetector {
    pub(crate) fn new() -> Result<Self> {
        Ok(Self {
            page_word: Regex::new(r"(?i)^page\s+([0-9ivxlcdm]+)(?:\s+of\s+\d+)?$")
                .context("failed to compile page label regex")?,
            number: Regex::new(r"^([0-9]{1,4})$").context("failed to compile page number regex")?,
            roman: Regex::new(r"(?i)^([ivxlcdm]{1,8})$")
                .context("failed to compile roman page label regex")?,
        })
    }

    pub(crate) fn detect(&self, page_text: &str) -> Option<String> {
        let lines = page_text.lines().collect::<Vec<&str>>();

        for line in lines.iter().rev().take(5).chain(lines.iter().take(2)) {
            let normalized = line
                .chars()
                .filter(|character| {
                    character.is_ascii_alphanumeric() || character.is_ascii_whitespace()
                })
                .collect::<String>();
            let normalized = normalized.split_whitespace().collect::<Vec<&str>>().join(" ");
            if normalized.is_empty() {
                continue;
            }

            for regex in [&self.page_word, &self.number, &self.roman] {
                if let Some(value) = regex.captures(&normalized).and_then(|captures| captures.get(1))
                {
                    return Some(value.as_str().to_ascii_lowercase());
                }
            }
        }

        None
    }
}

/// Most common `physical - printed` difference over pages with numeric labels.
///
/// Ties go to the smallest offset; a document without numeric labels gets 0.
pub(crate) fn infer_page_offset(
    source: &impl TextSource,
    detector: &PageLabelDetector,
    from_index: usize,
) -> i64 {
    let mut counts = HashMap::<i64, usize>::new();

    for index in from_index..source.page_count() {
        let Some(text) = source.page_text(index) else {
            continue;
        };
        let Some(printed) = detector
            .detect(text)
            .and_then(|label| label.parse::<i64>().ok())
        else {
            continue;
        };

        *counts.entry(index as i64 + 1 - printed).or_insert(0) += 1;
    }

    counts
        .into_iter()
        .max_by(|(left_offset, left_count), (right_offset, right_count)| {
            left_count
                .cmp(right_count)
                .then(right_offset.cmp(left_offset))
        })
        .map(|(offset, _)| offset)
        .unwrap_or(0)
}
