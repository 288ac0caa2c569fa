//! History journal records and page markup
//!
//! The history page of the ТЗ builder lists past generation runs; each row is
//! a checkbox named `log_ids` carrying the record id, and a select-all row
//! sits above them. These builders produce that markup for demos, fixtures,
//! and scenario pages. The counter node is never rendered here; creating it
//! is the widget's job.

use serde::{Deserialize, Serialize};

/// One generation run from the journal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    /// Record id; becomes the checkbox value.
    pub id: u64,
    /// Project the section was generated for.
    pub project_name: String,
    /// ТЗ section name.
    pub section_name: String,
    /// Generation mode (`baseline`, `rag_gost`, `rag_full`).
    pub mode: String,
    /// Render the row pre-selected.
    #[serde(default)]
    pub checked: bool,
}

const DEMO_PROJECTS: &[&str] = &[
    "Система учета сотрудников",
    "Система поддержки ВКР",
    "Подсистема электронного документооборота кафедры",
];

const DEMO_SECTIONS: &[&str] = &[
    "Основания для разработки",
    "Назначение системы",
    "Требования к системе",
];

const DEMO_MODES: &[&str] = &["baseline", "rag_gost", "rag_full"];

/// Deterministic sample records for demos and tests.
#[must_use]
pub fn demo_records(count: usize) -> Vec<LogRecord> {
    (1..=count)
        .map(|i| LogRecord {
            id: i as u64,
            project_name: DEMO_PROJECTS[(i - 1) % DEMO_PROJECTS.len()].to_string(),
            section_name: DEMO_SECTIONS[(i - 1) % DEMO_SECTIONS.len()].to_string(),
            mode: DEMO_MODES[(i - 1) % DEMO_MODES.len()].to_string(),
            checked: false,
        })
        .collect()
}

/// Render the history form fragment: the select-all row, one labelled
/// checkbox per record, and the submit button.
#[must_use]
pub fn render_history_form(records: &[LogRecord]) -> String {
    let rows: String = records.iter().map(render_row).collect();
    format!(
        r#"<form class="history-form" method="post" action="/history/build">
  <label><input type="checkbox" id="select_all_logs"> Выбрать все</label>
{rows}  <button type="submit">Собрать документ</button>
</form>
"#
    )
}

/// Render the full history page around the form.
#[must_use]
pub fn render_history_page(records: &[LogRecord]) -> String {
    let form = render_history_form(records);
    format!(
        r#"<!DOCTYPE html>
<html lang="ru">
<head>
<meta charset="utf-8">
<title>История генераций</title>
</head>
<body>
<h1>История генераций</h1>
{form}</body>
</html>
"#
    )
}

fn render_row(record: &LogRecord) -> String {
    let checked = if record.checked { " checked" } else { "" };
    format!(
        r#"  <label class="history-row"><input type="checkbox" name="log_ids" value="{id}"{checked}> {project}: {section} ({mode})</label>
"#,
        id = record.id,
        project = esc(&record.project_name),
        section = esc(&record.section_name),
        mode = esc(&record.mode),
    )
}

fn esc(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
