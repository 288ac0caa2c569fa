//! Page harness: a parsed document plus event plumbing
//!
//! The harness is the single event source. User gestures ([`Page::click`],
//! [`Page::set_checked`]) dispatch events to listeners registered per node;
//! direct [`Document`] mutation stays silent, the same way a page script's
//! programmatic writes never fire change events. Handlers run synchronously,
//! one event at a time, to completion.

use std::collections::HashMap;
use std::fmt;

use log::debug;
use thiserror::Error;

use crate::dom::{Document, NodeId, ParseError};
use crate::selector::{Selector, SelectorError};

/// Event categories the harness delivers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    /// Pointer activation of an element.
    Click,
    /// Committed value change of a form control.
    Change,
}

/// A delivered event.
#[derive(Debug, Clone, Copy)]
pub struct Event {
    /// What happened.
    pub event_type: EventType,
    /// The node it happened to.
    pub target: NodeId,
}

/// Listener callback. Runs synchronously with mutable document access.
pub type Handler = Box<dyn FnMut(&mut Document, &Event)>;

/// Errors from selector-addressed gestures
#[derive(Debug, Error)]
pub enum PageError {
    /// Markup failed to parse
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// The selector string failed to parse
    #[error(transparent)]
    Selector(#[from] SelectorError),

    /// The selector matched nothing
    #[error("no element matches selector '{0}'")]
    NoSuchTarget(String),
}

/// A document with per-node listeners, delivering one event at a time.
pub struct Page {
    doc: Document,
    listeners: HashMap<NodeId, HashMap<EventType, Vec<Handler>>>,
}

impl fmt::Debug for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Page")
            .field("nodes", &self.doc.len())
            .field("listeners", &self.listener_count())
            .finish()
    }
}

impl Page {
    /// Wrap an already parsed document.
    #[must_use]
    pub fn new(doc: Document) -> Self {
        Self {
            doc,
            listeners: HashMap::new(),
        }
    }

    /// Parse markup and wrap the result.
    pub fn from_html(html: &str) -> Result<Self, ParseError> {
        Ok(Self::new(Document::parse(html)?))
    }

    /// The underlying document.
    #[must_use]
    pub const fn doc(&self) -> &Document {
        &self.doc
    }

    /// Mutable access to the underlying document. Mutations made this way
    /// dispatch nothing.
    pub fn doc_mut(&mut self) -> &mut Document {
        &mut self.doc
    }

    /// Register a listener for an event type on a node. Listeners on the same
    /// node and type run in registration order.
    pub fn add_listener<F>(&mut self, target: NodeId, event_type: EventType, handler: F)
    where
        F: FnMut(&mut Document, &Event) + 'static,
    {
        self.listeners
            .entry(target)
            .or_default()
            .entry(event_type)
            .or_default()
            .push(Box::new(handler));
    }

    /// Total number of registered listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners
            .values()
            .flat_map(HashMap::values)
            .map(Vec::len)
            .sum()
    }

    /// Resolve a selector to the first matching node of the document.
    pub fn find(&self, selector: &str) -> Result<NodeId, PageError> {
        let parsed = Selector::parse(selector)?;
        parsed
            .find_first(&self.doc, self.doc.root())
            .ok_or_else(|| PageError::NoSuchTarget(selector.to_string()))
    }

    /// User gesture: set a control's checked state. Dispatches a change event
    /// only when the state actually flips.
    pub fn set_checked(&mut self, target: NodeId, on: bool) {
        if self.doc.checked(target) == on {
            return;
        }
        self.doc.set_checked(target, on);
        self.dispatch(Event {
            event_type: EventType::Change,
            target,
        });
    }

    /// User gesture: click an element. Checkboxes toggle before the click
    /// event and see a change event after it, matching control activation.
    pub fn click(&mut self, target: NodeId) {
        let checkbox = self.doc.is_checkbox(target);
        if checkbox {
            let next = !self.doc.checked(target);
            self.doc.set_checked(target, next);
        }
        self.dispatch(Event {
            event_type: EventType::Click,
            target,
        });
        if checkbox {
            self.dispatch(Event {
                event_type: EventType::Change,
                target,
            });
        }
    }

    /// Selector-addressed [`set_checked`](Self::set_checked).
    pub fn set_checked_on(&mut self, selector: &str, on: bool) -> Result<NodeId, PageError> {
        let target = self.find(selector)?;
        self.set_checked(target, on);
        Ok(target)
    }

    /// Selector-addressed [`click`](Self::click).
    pub fn click_on(&mut self, selector: &str) -> Result<NodeId, PageError> {
        let target = self.find(selector)?;
        self.click(target);
        Ok(target)
    }

    /// Run the target's handlers for the event, in registration order. The
    /// handler list is taken out for the duration so handlers get exclusive
    /// access to the document.
    fn dispatch(&mut self, event: Event) {
        let taken = self
            .listeners
            .get_mut(&event.target)
            .and_then(|by_type| by_type.remove(&event.event_type));
        let Some(mut handlers) = taken else {
            return;
        };
        debug!(
            "dispatch {:?} to {} listener(s)",
            event.event_type,
            handlers.len()
        );
        for handler in &mut handlers {
            handler(&mut self.doc, &event);
        }
        self.listeners
            .entry(event.target)
            .or_default()
            .insert(event.event_type, handlers);
    }
}
