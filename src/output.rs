//! Output formatting for human and JSON modes
//!
//! This module provides structured output that can be rendered either as
//! human-readable text or machine-parseable JSON.

use colored::Colorize;
use serde::Serialize;

/// Output mode for the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON output (machine-readable)
    Json,
}

/// Result of inspecting a page
#[derive(Debug, Serialize)]
pub struct InspectReport {
    /// Whether a history form was found
    pub form_found: bool,
    /// Checkboxes in the snapshot
    pub checkboxes: usize,
    /// Checkboxes currently selected
    pub selected: usize,
    /// Whether a select-all control is present
    pub select_all: bool,
    /// Current counter text, when a form was bound
    pub counter_text: Option<String>,
}

/// Outcome of one scenario step
#[derive(Debug, Serialize)]
pub struct StepReport {
    /// Step number, 1-based
    pub step: usize,
    /// What the step did
    pub description: String,
    /// Whether the step succeeded
    pub passed: bool,
    /// Failure detail, when it did not
    pub detail: Option<String>,
}

/// Result of replaying a scenario
#[derive(Debug, Serialize)]
pub struct RunReport {
    /// Whether every step passed
    pub passed: bool,
    /// Whether the page had a history form
    pub form_found: bool,
    /// Per-step outcomes
    pub steps: Vec<StepReport>,
    /// Checkboxes in the snapshot
    pub checkboxes: usize,
    /// Checkboxes selected after the last step
    pub selected: usize,
    /// Final counter text
    pub counter_text: Option<String>,
}

/// Rendered demo markup
#[derive(Debug, Serialize)]
pub struct DemoReport {
    /// Number of records rendered
    pub records: usize,
    /// The markup
    pub html: String,
}

impl InspectReport {
    /// Render the report based on output mode
    pub fn render(&self, mode: OutputMode) {
        match mode {
            OutputMode::Human => self.render_human(),
            OutputMode::Json => self.render_json(),
        }
    }

    fn render_human(&self) {
        if !self.form_found {
            println!("History form: {}", "not found".yellow());
            println!("Nothing to bind on this page.");
            return;
        }
        println!("History form: {}", "found".green());
        println!("Checkboxes:   {} ({} selected)", self.checkboxes, self.selected);
        println!(
            "Select all:   {}",
            if self.select_all { "present" } else { "absent" }
        );
        if let Some(text) = &self.counter_text {
            println!("Counter:      {text}");
        }
    }

    fn render_json(&self) {
        println!("{}", serde_json::to_string_pretty(self).unwrap_or_default());
    }
}

impl RunReport {
    /// Render the report based on output mode
    pub fn render(&self, mode: OutputMode) {
        match mode {
            OutputMode::Human => self.render_human(),
            OutputMode::Json => self.render_json(),
        }
    }

    fn render_human(&self) {
        if !self.form_found {
            println!("History form: {}", "not found".yellow());
        }
        println!("Replaying {} step(s)...\n", self.steps.len());
        for step in &self.steps {
            let mark = if step.passed {
                "  ok".green()
            } else {
                "FAIL".red()
            };
            println!("  {}  {}. {}", mark, step.step, step.description);
            if let Some(detail) = &step.detail {
                println!("          {detail}");
            }
        }
        println!();
        if let Some(text) = &self.counter_text {
            println!("Counter:  {text}");
        }
        println!("Selected: {}/{}", self.selected, self.checkboxes);
        let passed_steps = self.steps.iter().filter(|s| s.passed).count();
        if self.passed {
            println!("{} ({}/{} steps)", "PASSED".green(), passed_steps, self.steps.len());
        } else {
            println!("{} ({}/{} steps)", "FAILED".red(), passed_steps, self.steps.len());
        }
    }

    fn render_json(&self) {
        println!("{}", serde_json::to_string_pretty(self).unwrap_or_default());
    }
}

impl DemoReport {
    /// Render the report based on output mode
    pub fn render(&self, mode: OutputMode) {
        match mode {
            OutputMode::Human => print!("{}", self.html),
            OutputMode::Json => {
                println!("{}", serde_json::to_string_pretty(self).unwrap_or_default());
            },
        }
    }
}
