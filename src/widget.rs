//! Selection counter for history forms
//!
//! Binds to the first form carrying the `history-form` class, takes a fixed
//! snapshot of its `log_ids` checkboxes, and keeps a status line with the
//! number of selected journal entries current. An optional `select_all_logs`
//! checkbox sets the whole snapshot at once. Pages without a history form are
//! left untouched.
//!
//! The snapshot is taken once at install time. Checkboxes added to the form
//! afterwards are not counted; that matches the page script this replaces.
//!
//! # Examples
//!
//! ```
//! use tallybox::page::Page;
//! use tallybox::widget::SelectionCounter;
//!
//! let html = r#"
//! <form class="history-form">
//!   <input type="checkbox" name="log_ids" value="1">
//!   <input type="checkbox" name="log_ids" value="2">
//! </form>"#;
//! let mut page = Page::from_html(html).unwrap();
//! let counter = SelectionCounter::install(&mut page).unwrap();
//! assert_eq!(counter.counter_text(page.doc()), "Ни одной записи не выбрано.");
//!
//! page.click_on("input[value=1]").unwrap();
//! assert_eq!(
//!     counter.counter_text(page.doc()),
//!     "Выбрана 1 запись для включения в ТЗ."
//! );
//! ```

use log::{debug, warn};

use crate::dom::{Document, NodeId};
use crate::page::{EventType, Page};
use crate::selector::Selector;

/// Class naming the form the counter binds to.
pub const FORM_CLASS: &str = "history-form";

/// Name shared by the selectable checkbox controls.
pub const CHECKBOX_NAME: &str = "log_ids";

/// Id of the optional select-all control.
pub const SELECT_ALL_ID: &str = "select_all_logs";

/// Class of the counter display node.
pub const COUNTER_CLASS: &str = "selected-count";

/// Inline style given to a counter node the widget creates itself.
const COUNTER_STYLE: &str = "margin-top: 8px; font-size: 13px; color: #aaa;";

/// Status line for a number of selected entries.
///
/// The wording is fixed, including the simplified plural for counts of two
/// and above.
#[must_use]
pub fn status_line(count: usize) -> String {
    match count {
        0 => "Ни одной записи не выбрано.".to_string(),
        1 => "Выбрана 1 запись для включения в ТЗ.".to_string(),
        n => format!("Выбрано {n} записей для включения в ТЗ."),
    }
}

/// Handle to an installed selection counter.
///
/// The handle only reads state; all updates run through the listeners wired
/// at install time.
#[derive(Debug, Clone)]
pub struct SelectionCounter {
    form: NodeId,
    boxes: Vec<NodeId>,
    select_all: Option<NodeId>,
    counter: NodeId,
}

impl SelectionCounter {
    /// Bind the counter to the first history form of the page.
    ///
    /// Locates the form, snapshots its `log_ids` checkboxes in document
    /// order, finds or creates the counter node as the form's last child,
    /// writes the initial status line, and wires the change listeners.
    ///
    /// Returns `None` when the page has no history form; such pages are left
    /// without listeners or mutations.
    pub fn install(page: &mut Page) -> Option<Self> {
        let forms = marker(&format!(".{FORM_CLASS}")).find_all(page.doc(), page.doc().root());
        let Some(&form) = forms.first() else {
            debug!("no history form on this page; counter not installed");
            return None;
        };
        if forms.len() > 1 {
            warn!(
                "{} history forms on one page; binding the first only",
                forms.len()
            );
        }

        let boxes =
            marker(&format!("input[type=checkbox][name={CHECKBOX_NAME}]")).find_all(page.doc(), form);
        let select_all =
            marker(&format!("#{SELECT_ALL_ID}")).find_first(page.doc(), page.doc().root());

        let counter = marker(&format!(".{COUNTER_CLASS}"))
            .find_first(page.doc(), form)
            .unwrap_or_else(|| {
                let doc = page.doc_mut();
                let node = doc.create_element("div");
                doc.set_attr(node, "class", COUNTER_CLASS);
                doc.set_attr(node, "style", COUNTER_STYLE);
                doc.append_child(form, node);
                node
            });

        recompute(page.doc_mut(), &boxes, counter);

        for &checkbox in &boxes {
            let snapshot = boxes.clone();
            page.add_listener(checkbox, EventType::Change, move |doc, _| {
                recompute(doc, &snapshot, counter);
            });
        }
        if let Some(toggle) = select_all {
            let snapshot = boxes.clone();
            page.add_listener(toggle, EventType::Change, move |doc, _| {
                let on = doc.checked(toggle);
                for &checkbox in &snapshot {
                    doc.set_checked(checkbox, on);
                }
                recompute(doc, &snapshot, counter);
            });
        }

        debug!(
            "selection counter installed: {} checkbox(es), select-all {}",
            boxes.len(),
            if select_all.is_some() { "present" } else { "absent" }
        );

        Some(Self {
            form,
            boxes,
            select_all,
            counter,
        })
    }

    /// The bound form node.
    #[must_use]
    pub const fn form(&self) -> NodeId {
        self.form
    }

    /// The snapshot of selectable checkboxes, in document order.
    #[must_use]
    pub fn checkboxes(&self) -> &[NodeId] {
        &self.boxes
    }

    /// Number of checkboxes in the snapshot.
    #[must_use]
    pub fn checkbox_count(&self) -> usize {
        self.boxes.len()
    }

    /// The select-all control, when the page has one.
    #[must_use]
    pub const fn select_all(&self) -> Option<NodeId> {
        self.select_all
    }

    /// The counter display node.
    #[must_use]
    pub const fn counter(&self) -> NodeId {
        self.counter
    }

    /// How many snapshot checkboxes are currently checked.
    #[must_use]
    pub fn selected_count(&self, doc: &Document) -> usize {
        self.boxes.iter().filter(|&&b| doc.checked(b)).count()
    }

    /// Current text of the counter node.
    #[must_use]
    pub fn counter_text(&self, doc: &Document) -> String {
        doc.text_content(self.counter)
    }
}

/// Count the checked snapshot boxes and overwrite the counter text. Shared by
/// the initial render and every listener.
fn recompute(doc: &mut Document, boxes: &[NodeId], counter: NodeId) {
    let count = boxes.iter().filter(|&&b| doc.checked(b)).count();
    doc.set_text_content(counter, &status_line(count));
}

fn marker(selector: &str) -> Selector {
    Selector::parse(selector).expect("marker selectors are well formed")
}
