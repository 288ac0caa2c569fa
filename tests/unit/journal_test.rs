//! Tests for journal records and history markup

use tallybox::dom::{Document, NodeId};
use tallybox::journal::{LogRecord, demo_records, render_history_form, render_history_page};
use tallybox::page::Page;
use tallybox::selector::Selector;
use tallybox::widget::SelectionCounter;

fn find_all(doc: &Document, selector: &str) -> Vec<NodeId> {
    Selector::parse(selector).unwrap().find_all(doc, doc.root())
}

// =============================================================================
// DEMO RECORDS
// =============================================================================

#[test]
fn demo_records_are_deterministic_and_numbered_from_one() {
    let records = demo_records(5);
    assert_eq!(records.len(), 5);
    assert_eq!(records, demo_records(5));

    let ids: Vec<_> = records.iter().map(|r| r.id).collect();
    assert_eq!(ids, [1, 2, 3, 4, 5]);

    assert_eq!(records[0].project_name, "Система учета сотрудников");
    assert_eq!(records[1].section_name, "Назначение системы");
    assert_eq!(records[2].mode, "rag_full");
    assert_eq!(records[3].mode, "baseline", "fields cycle past the third record");
    assert!(records.iter().all(|r| !r.checked));
}

#[test]
fn demo_records_can_be_empty() {
    assert!(demo_records(0).is_empty());
}

#[test]
fn log_record_serde_defaults_checked_to_false() {
    let record: LogRecord = serde_json::from_str(
        r#"{"id": 7, "project_name": "П", "section_name": "С", "mode": "baseline"}"#,
    )
    .unwrap();
    assert_eq!(record.id, 7);
    assert!(!record.checked);
}

// =============================================================================
// MARKUP
// =============================================================================

#[test]
fn rendered_form_carries_the_markup_contract() {
    let html = render_history_form(&demo_records(3));
    let doc = Document::parse(&html).unwrap();

    assert_eq!(find_all(&doc, ".history-form").len(), 1);
    assert_eq!(find_all(&doc, "input[type=checkbox][name=log_ids]").len(), 3);
    assert_eq!(find_all(&doc, "#select_all_logs").len(), 1);
    // the counter node is the widget's to create, never the server's
    assert!(find_all(&doc, ".selected-count").is_empty());
}

#[test]
fn rendered_rows_carry_record_ids_as_values() {
    let html = render_history_form(&demo_records(2));
    let doc = Document::parse(&html).unwrap();
    let values: Vec<_> = find_all(&doc, "input[name=log_ids]")
        .into_iter()
        .map(|n| doc.attr(n, "value").map(str::to_string))
        .collect();
    assert_eq!(values, [Some("1".to_string()), Some("2".to_string())]);
}

#[test]
fn checked_records_render_pre_selected() {
    let mut records = demo_records(2);
    records[1].checked = true;

    let html = render_history_form(&records);
    let doc = Document::parse(&html).unwrap();
    let boxes = find_all(&doc, "input[name=log_ids]");
    assert!(!doc.checked(boxes[0]));
    assert!(doc.checked(boxes[1]));
}

#[test]
fn record_fields_are_escaped_in_the_markup() {
    let records = vec![LogRecord {
        id: 1,
        project_name: "ООО \"Ромашка\" <и партнеры>".to_string(),
        section_name: "Требования & приложения".to_string(),
        mode: "baseline".to_string(),
        checked: false,
    }];

    let html = render_history_form(&records);
    assert!(html.contains("&quot;Ромашка&quot;"));
    assert!(html.contains("&lt;и партнеры&gt;"));
    assert!(html.contains("Требования &amp; приложения"));

    // and the text survives a parse round trip
    let doc = Document::parse(&html).unwrap();
    let row = find_all(&doc, ".history-row")[0];
    assert!(doc.text_content(row).contains("ООО \"Ромашка\" <и партнеры>"));
}

#[test]
fn full_page_hosts_an_installable_widget() {
    let html = render_history_page(&demo_records(4));
    assert!(html.contains("<!DOCTYPE html>"));
    assert!(html.contains("История генераций"));

    let mut page = Page::from_html(&html).unwrap();
    let counter = SelectionCounter::install(&mut page).expect("history page has the form");
    assert_eq!(counter.checkbox_count(), 4);
    assert!(counter.select_all().is_some());
}
