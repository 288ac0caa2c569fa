//! Scenario files: declarative gesture replay
//!
//! A scenario names a page source and an ordered list of steps. Steps either
//! drive a user gesture at a selector or assert the counter text, so a whole
//! history-page session replays from one TOML file:
//!
//! ```toml
//! [page]
//! records = 3
//!
//! [[steps]]
//! action = "check"
//! target = "input[value=2]"
//!
//! [[steps]]
//! action = "expect_count"
//! text = "Выбрана 1 запись для включения в ТЗ."
//! ```
//!
//! Malformed scenarios fail with [`ScenarioError`]; gestures whose selector
//! matches nothing and expectations that do not hold are recorded as failed
//! steps in the report instead.

use std::fs;
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::dom::ParseError;
use crate::journal;
use crate::output::{RunReport, StepReport};
use crate::page::Page;
use crate::widget::SelectionCounter;

/// Errors from loading or replaying a scenario
#[derive(Debug, Error)]
pub enum ScenarioError {
    /// A scenario or page file could not be read
    #[error("cannot read {path}: {source}")]
    Io {
        /// The file that failed
        path: String,
        /// The underlying error
        #[source]
        source: std::io::Error,
    },

    /// The scenario is not valid TOML
    #[error("invalid scenario: {0}")]
    Toml(#[from] toml::de::Error),

    /// No page source was given
    #[error("page source missing: set one of `html`, `file`, `records`")]
    MissingPageSource,

    /// More than one page source was given
    #[error("conflicting page sources: set only one of `html`, `file`, `records`")]
    ConflictingPageSources,

    /// The page markup failed to parse
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// A step is missing a field its action requires
    #[error("step {step}: `{action}` requires a `{field}` field")]
    MissingField {
        /// Step number, 1-based
        step: usize,
        /// The step's action
        action: String,
        /// The missing field
        field: String,
    },
}

/// A replayable interaction scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    /// Page the steps run against.
    pub page: PageSource,
    /// Steps applied in order.
    #[serde(default)]
    pub steps: Vec<Step>,
}

/// Where the page markup comes from. Exactly one field must be set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageSource {
    /// Inline markup.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    /// Markup file, resolved against the scenario's directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    /// Render a demo journal page with this many records.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub records: Option<usize>,
}

/// One scenario step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Step {
    /// What to do.
    pub action: Action,
    /// Selector the gesture targets.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    /// Expected counter text, for `expect_count`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Step actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Check a checkbox; nothing fires when it is already checked.
    Check,
    /// Uncheck a checkbox; nothing fires when it is already clear.
    Uncheck,
    /// Flip a checkbox to its opposite state.
    Toggle,
    /// Click an element, with checkbox activation semantics.
    Click,
    /// Assert the counter text.
    ExpectCount,
}

impl Action {
    /// Stable lowercase name, as written in scenario files.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Check => "check",
            Self::Uncheck => "uncheck",
            Self::Toggle => "toggle",
            Self::Click => "click",
            Self::ExpectCount => "expect_count",
        }
    }
}

impl PageSource {
    /// Produce the page markup this source names.
    pub fn resolve(&self, base_dir: &Path) -> Result<String, ScenarioError> {
        let set = usize::from(self.html.is_some())
            + usize::from(self.file.is_some())
            + usize::from(self.records.is_some());
        if set == 0 {
            return Err(ScenarioError::MissingPageSource);
        }
        if set > 1 {
            return Err(ScenarioError::ConflictingPageSources);
        }

        if let Some(html) = &self.html {
            return Ok(html.clone());
        }
        if let Some(file) = &self.file {
            let path = base_dir.join(file);
            return fs::read_to_string(&path).map_err(|source| ScenarioError::Io {
                path: path.display().to_string(),
                source,
            });
        }
        let records = journal::demo_records(self.records.unwrap_or_default());
        Ok(journal::render_history_page(&records))
    }
}

impl Scenario {
    /// Parse a scenario from TOML text.
    pub fn from_toml(text: &str) -> Result<Self, ScenarioError> {
        Ok(toml::from_str(text)?)
    }

    /// Load a scenario file.
    pub fn load(path: &Path) -> Result<Self, ScenarioError> {
        let text = fs::read_to_string(path).map_err(|source| ScenarioError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&text)
    }

    /// Replay the scenario. `base_dir` anchors relative page file paths.
    ///
    /// The page is parsed, the counter installed, and the steps applied in
    /// order. The report carries every step's outcome and the final
    /// selection state.
    pub fn run(&self, base_dir: &Path) -> Result<RunReport, ScenarioError> {
        let html = self.page.resolve(base_dir)?;
        let mut page = Page::from_html(&html)?;
        let counter = SelectionCounter::install(&mut page);

        let mut steps = Vec::with_capacity(self.steps.len());
        for (index, step) in self.steps.iter().enumerate() {
            steps.push(apply_step(&mut page, counter.as_ref(), index + 1, step)?);
        }

        let passed = steps.iter().all(|s| s.passed);
        debug!("scenario finished: {} step(s), passed={passed}", steps.len());
        Ok(RunReport {
            passed,
            form_found: counter.is_some(),
            steps,
            checkboxes: counter.as_ref().map_or(0, SelectionCounter::checkbox_count),
            selected: counter
                .as_ref()
                .map_or(0, |c| c.selected_count(page.doc())),
            counter_text: counter.as_ref().map(|c| c.counter_text(page.doc())),
        })
    }
}

fn apply_step(
    page: &mut Page,
    counter: Option<&SelectionCounter>,
    number: usize,
    step: &Step,
) -> Result<StepReport, ScenarioError> {
    match step.action {
        Action::Check | Action::Uncheck => {
            let target = required_target(number, step)?;
            let description = format!("{} {target}", step.action.as_str());
            let on = step.action == Action::Check;
            match page.set_checked_on(target, on) {
                Ok(_) => Ok(passed_step(number, description)),
                Err(err) => Ok(failed_step(number, description, err.to_string())),
            }
        }
        Action::Toggle => {
            let target = required_target(number, step)?;
            let description = format!("toggle {target}");
            match page.find(target) {
                Ok(node) => {
                    let next = !page.doc().checked(node);
                    page.set_checked(node, next);
                    Ok(passed_step(number, description))
                }
                Err(err) => Ok(failed_step(number, description, err.to_string())),
            }
        }
        Action::Click => {
            let target = required_target(number, step)?;
            let description = format!("click {target}");
            match page.click_on(target) {
                Ok(_) => Ok(passed_step(number, description)),
                Err(err) => Ok(failed_step(number, description, err.to_string())),
            }
        }
        Action::ExpectCount => {
            let expected = step.text.as_deref().ok_or_else(|| ScenarioError::MissingField {
                step: number,
                action: step.action.as_str().to_string(),
                field: "text".to_string(),
            })?;
            let description = format!("expect_count \"{expected}\"");
            let Some(handle) = counter else {
                return Ok(failed_step(
                    number,
                    description,
                    "no history form on the page".to_string(),
                ));
            };
            let actual = handle.counter_text(page.doc());
            if actual == expected {
                Ok(passed_step(number, description))
            } else {
                Ok(failed_step(
                    number,
                    description,
                    format!("expected \"{expected}\", got \"{actual}\""),
                ))
            }
        }
    }
}

fn required_target(number: usize, step: &Step) -> Result<&str, ScenarioError> {
    step.target.as_deref().ok_or_else(|| ScenarioError::MissingField {
        step: number,
        action: step.action.as_str().to_string(),
        field: "target".to_string(),
    })
}

fn passed_step(number: usize, description: String) -> StepReport {
    StepReport {
        step: number,
        description,
        passed: true,
        detail: None,
    }
}

fn failed_step(number: usize, description: String, detail: String) -> StepReport {
    StepReport {
        step: number,
        description,
        passed: false,
        detail: Some(detail),
    }
}
