//! Compound CSS selectors
//!
//! Parses the single-compound subset the page markup contract needs: a tag
//! name, `#id`, `.class`, and `[attr]` / `[attr=value]` tests, in any
//! combination. Combinators, selector lists, and pseudo-classes are out of
//! scope and rejected at parse time.
//!
//! # Examples
//!
//! ```
//! use tallybox::dom::Document;
//! use tallybox::selector::Selector;
//!
//! let doc = Document::parse(
//!     r#"<form class="history-form"><input type="checkbox" name="log_ids"></form>"#,
//! )
//! .unwrap();
//! let boxes = Selector::parse("input[name=log_ids]")
//!     .unwrap()
//!     .find_all(&doc, doc.root());
//! assert_eq!(boxes.len(), 1);
//! ```

use thiserror::Error;

use crate::dom::{Document, NodeId};

/// Errors from selector parsing
#[derive(Debug, Error)]
pub enum SelectorError {
    /// The selector string was empty
    #[error("empty selector")]
    Empty,

    /// The selector uses syntax outside the supported compound subset
    #[error("unsupported selector syntax at '{0}'")]
    Unsupported(String),

    /// An attribute test was not closed with `]`
    #[error("unterminated attribute selector in '{0}'")]
    UnterminatedAttribute(String),
}

/// A parsed compound selector.
#[derive(Debug, Clone, Default)]
pub struct Selector {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<AttrTest>,
}

#[derive(Debug, Clone)]
struct AttrTest {
    name: String,
    value: Option<String>,
}

impl Selector {
    /// Parse a compound selector.
    pub fn parse(input: &str) -> Result<Self, SelectorError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(SelectorError::Empty);
        }

        let mut selector = Self::default();
        let bytes = input.as_bytes();
        let mut i = 0;

        if bytes[0] == b'*' {
            i = 1;
        } else if bytes[0].is_ascii_alphanumeric() {
            let (token, next) = ident(input, 0);
            selector.tag = Some(token.to_ascii_lowercase());
            i = next;
        }

        while i < bytes.len() {
            match bytes[i] {
                b'#' => {
                    let (token, next) = ident(input, i + 1);
                    if token.is_empty() {
                        return Err(SelectorError::Unsupported(input[i..].to_string()));
                    }
                    selector.id = Some(token);
                    i = next;
                }
                b'.' => {
                    let (token, next) = ident(input, i + 1);
                    if token.is_empty() {
                        return Err(SelectorError::Unsupported(input[i..].to_string()));
                    }
                    selector.classes.push(token);
                    i = next;
                }
                b'[' => {
                    let close = input[i..]
                        .find(']')
                        .ok_or_else(|| SelectorError::UnterminatedAttribute(input.to_string()))?
                        + i;
                    let body = &input[i + 1..close];
                    let (name, value) = body
                        .split_once('=')
                        .map_or((body, None), |(n, v)| (n, Some(v)));
                    let name = name.trim().to_ascii_lowercase();
                    if name.is_empty() {
                        return Err(SelectorError::Unsupported(input[i..].to_string()));
                    }
                    let value =
                        value.map(|v| v.trim().trim_matches('"').trim_matches('\'').to_string());
                    selector.attrs.push(AttrTest { name, value });
                    i = close + 1;
                }
                _ => return Err(SelectorError::Unsupported(input[i..].to_string())),
            }
        }

        Ok(selector)
    }

    /// Whether the node matches this selector.
    #[must_use]
    pub fn matches(&self, doc: &Document, node: NodeId) -> bool {
        if !doc.is_element(node) {
            return false;
        }
        if let Some(tag) = &self.tag {
            if doc.tag_name(node) != Some(tag.as_str()) {
                return false;
            }
        }
        if let Some(id) = &self.id {
            if doc.attr(node, "id") != Some(id.as_str()) {
                return false;
            }
        }
        if !self.classes.iter().all(|c| doc.has_class(node, c)) {
            return false;
        }
        self.attrs
            .iter()
            .all(|test| match (&test.value, doc.attr(node, &test.name)) {
                (None, actual) => actual.is_some(),
                (Some(expected), Some(actual)) => expected == actual,
                (Some(_), None) => false,
            })
    }

    /// First matching node under `scope`, in document order.
    #[must_use]
    pub fn find_first(&self, doc: &Document, scope: NodeId) -> Option<NodeId> {
        doc.descendants(scope)
            .into_iter()
            .find(|&node| self.matches(doc, node))
    }

    /// Every matching node under `scope`, in document order.
    #[must_use]
    pub fn find_all(&self, doc: &Document, scope: NodeId) -> Vec<NodeId> {
        doc.descendants(scope)
            .into_iter()
            .filter(|&node| self.matches(doc, node))
            .collect()
    }
}

fn ident(input: &str, from: usize) -> (String, usize) {
    let bytes = input.as_bytes();
    let mut i = from;
    while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'-' || bytes[i] == b'_')
    {
        i += 1;
    }
    (input[from..i].to_string(), i)
}
