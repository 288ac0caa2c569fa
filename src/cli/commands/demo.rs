//! Print demo history-page markup

use tallybox::journal;
use tallybox::output::{DemoReport, OutputMode};

/// Render sample journal markup for trying the counter out.
pub fn demo(records: usize, full_page: bool, mode: OutputMode) -> anyhow::Result<()> {
    let rows = journal::demo_records(records);
    let html = if full_page {
        journal::render_history_page(&rows)
    } else {
        journal::render_history_form(&rows)
    };

    let report = DemoReport { records, html };
    report.render(mode);
    Ok(())
}
