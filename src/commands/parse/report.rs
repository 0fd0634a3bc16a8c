use super::*;

pub(crate) fn generate_validation_report(
    toc: &TocHierarchy,
    section_records: &[SectionRecord],
    lot_count: usize,
    body_table_count: usize,
) -> ValidationReport {
    let toc_entries = toc.entries();
    let mut mismatches = Vec::new();

    if toc_entries.len() != section_records.len() {
        mismatches.push(Mismatch {
            kind: MismatchKind::SectionCount,
            expected: toc_entries.len().to_string(),
            actual: section_records.len().to_string(),
            section_ids: Vec::new(),
            delta: Some(section_records.len() as i64 - toc_entries.len() as i64),
        });
    }

    for (entry, record) in toc_entries.iter().zip(section_records) {
        if entry.section_id != record.section_id {
            let record_id = record.section_id.as_deref().unwrap_or("-");
            mismatches.push(Mismatch {
                kind: MismatchKind::SectionId,
                expected: entry.id_label().to_string(),
                actual: record_id.to_string(),
                section_ids: vec![entry.id_label().to_string(), record_id.to_string()],
                delta: None,
            });
        }
    }

    if lot_count != body_table_count {
        mismatches.push(Mismatch {
            kind: MismatchKind::TableCount,
            expected: lot_count.to_string(),
            actual: body_table_count.to_string(),
            section_ids: Vec::new(),
            delta: Some(body_table_count as i64 - lot_count as i64),
        });
    }

    for pair in toc_entries.windows(2) {
        let (previous, current) = (&pair[0], &pair[1]);
        if current.page < previous.page {
            mismatches.push(Mismatch {
                kind: MismatchKind::PageOrder,
                expected: format!(">= {}", previous.page),
                actual: current.page.to_string(),
                section_ids: vec![
                    previous.id_label().to_string(),
                    current.id_label().to_string(),
                ],
                delta: Some(i64::from(current.page) - i64::from(previous.page)),
            });
        }
    }

    for orphan in toc.orphans() {
        let id = orphan.id_label();
        let expected_parent = orphan
            .section_id
            .as_deref()
            .and_then(parent_prefix)
            .unwrap_or("-");
        mismatches.push(Mismatch {
            kind: MismatchKind::OrphanParent,
            expected: expected_parent.to_string(),
            actual: "missing".to_string(),
            section_ids: vec![id.to_string()],
            delta: None,
        });
    }

    let empty_text_section_count = section_records
        .iter()
        .filter(|record| record.text.trim().is_empty())
        .count();

    ValidationReport {
        generated_at: now_utc_string(),
        summary: ValidationSummary {
            toc_entry_count: toc_entries.len(),
            section_record_count: section_records.len(),
            list_of_tables_count: lot_count,
            body_table_count,
            empty_text_section_count,
        },
        mismatches,
    }
}
