//! Inspect a page for the history form

use std::fs;
use std::path::Path;

use anyhow::Context;

use tallybox::output::{InspectReport, OutputMode};
use tallybox::page::Page;
use tallybox::widget::SelectionCounter;

/// Report the selection state of a page's history form.
///
/// A page without a history form is a valid no-op, not an error; the command
/// still exits 0 and says so in the report.
pub fn inspect(path: &Path, mode: OutputMode) -> anyhow::Result<()> {
    let html = fs::read_to_string(path)
        .with_context(|| format!("cannot read page file: {}", path.display()))?;
    let mut page = Page::from_html(&html)
        .with_context(|| format!("cannot parse page: {}", path.display()))?;

    let report = match SelectionCounter::install(&mut page) {
        Some(counter) => InspectReport {
            form_found: true,
            checkboxes: counter.checkbox_count(),
            selected: counter.selected_count(page.doc()),
            select_all: counter.select_all().is_some(),
            counter_text: Some(counter.counter_text(page.doc())),
        },
        None => InspectReport {
            form_found: false,
            checkboxes: 0,
            selected: 0,
            select_all: false,
            counter_text: None,
        },
    };

    report.render(mode);
    Ok(())
}
