//! In-memory document tree for history pages
//!
//! Nodes live in an arena owned by [`Document`] and are addressed by [`NodeId`].
//! The tree carries exactly what the selection counter needs: element lookup,
//! text extraction, checkbox state, and appending created nodes. Mutating the
//! document directly never fires events; the page harness is the event source.

mod parser;

pub use parser::ParseError;

/// Handle to a node in a [`Document`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    kind: NodeKind,
}

#[derive(Debug, Clone)]
enum NodeKind {
    Document,
    Element(ElementData),
    Text(String),
}

#[derive(Debug, Clone)]
struct ElementData {
    tag: String,
    attrs: Vec<(String, String)>,
    checked: bool,
}

impl ElementData {
    fn is_checkbox(&self) -> bool {
        self.tag == "input"
            && self
                .attrs
                .iter()
                .any(|(n, v)| n == "type" && v.eq_ignore_ascii_case("checkbox"))
    }
}

/// An HTML document held as a node arena.
///
/// Nodes are never freed; detached nodes simply drop out of the tree walks.
/// A `NodeId` is only meaningful for the document that produced it.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
    root: NodeId,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create an empty document containing only the root node.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                parent: None,
                children: Vec::new(),
                kind: NodeKind::Document,
            }],
            root: NodeId(0),
        }
    }

    /// Parse a page or fragment into a document.
    pub fn parse(html: &str) -> Result<Self, ParseError> {
        parser::parse(html)
    }

    /// Root node of the tree.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        self.root
    }

    /// Number of nodes in the arena, the root included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the document holds nothing besides the root.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    fn element(&self, id: NodeId) -> Option<&ElementData> {
        match &self.node(id).kind {
            NodeKind::Element(el) => Some(el),
            _ => None,
        }
    }

    fn element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        match &mut self.node_mut(id).kind {
            NodeKind::Element(el) => Some(el),
            _ => None,
        }
    }

    /// Parent of a node. `None` for the root and for detached nodes.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    /// Children of a node, in document order.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    /// Every node under `scope` in document order, `scope` itself excluded.
    #[must_use]
    pub fn descendants(&self, scope: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(scope).iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.children(id).iter().rev());
        }
        out
    }

    /// Whether `id` sits somewhere under `ancestor`.
    #[must_use]
    pub fn is_descendant_of(&self, id: NodeId, ancestor: NodeId) -> bool {
        let mut cur = self.parent(id);
        while let Some(parent) = cur {
            if parent == ancestor {
                return true;
            }
            cur = self.parent(parent);
        }
        false
    }

    /// Whether the node is an element.
    #[must_use]
    pub fn is_element(&self, id: NodeId) -> bool {
        self.element(id).is_some()
    }

    /// Whether the node is a text node.
    #[must_use]
    pub fn is_text(&self, id: NodeId) -> bool {
        matches!(self.node(id).kind, NodeKind::Text(_))
    }

    /// Lowercase tag name of an element node.
    #[must_use]
    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(|el| el.tag.as_str())
    }

    /// Attribute value. `None` when the node is not an element or the
    /// attribute is absent; boolean attributes carry an empty value.
    #[must_use]
    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id)?
            .attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Whether the `class` attribute contains `class_name` as a whole word.
    #[must_use]
    pub fn has_class(&self, id: NodeId, class_name: &str) -> bool {
        self.attr(id, "class")
            .is_some_and(|v| v.split_ascii_whitespace().any(|c| c == class_name))
    }

    /// Whether the node is an `<input type="checkbox">`.
    #[must_use]
    pub fn is_checkbox(&self, id: NodeId) -> bool {
        self.element(id).is_some_and(ElementData::is_checkbox)
    }

    /// Live checked state. `false` for anything that is not a checked element.
    #[must_use]
    pub fn checked(&self, id: NodeId) -> bool {
        self.element(id).is_some_and(|el| el.checked)
    }

    /// Set the live checked state of an element. Fires nothing.
    pub fn set_checked(&mut self, id: NodeId, on: bool) {
        if let Some(el) = self.element_mut(id) {
            el.checked = on;
        }
    }

    /// Set or replace an attribute on an element.
    pub fn set_attr(&mut self, id: NodeId, name: &str, value: &str) {
        if let Some(el) = self.element_mut(id) {
            if let Some(slot) = el.attrs.iter_mut().find(|(n, _)| n == name) {
                slot.1 = value.to_string();
            } else {
                el.attrs.push((name.to_string(), value.to_string()));
            }
        }
    }

    /// Concatenated text of the node and everything under it.
    #[must_use]
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        if let NodeKind::Text(text) = &self.node(id).kind {
            out.push_str(text);
            return;
        }
        for &child in self.children(id) {
            self.collect_text(child, out);
        }
    }

    /// Replace the node's children with a single text node.
    pub fn set_text_content(&mut self, id: NodeId, text: &str) {
        let old = std::mem::take(&mut self.node_mut(id).children);
        for child in old {
            self.node_mut(child).parent = None;
        }
        let text_node = self.push_node(NodeKind::Text(text.to_string()), None);
        self.node_mut(text_node).parent = Some(id);
        self.node_mut(id).children.push(text_node);
    }

    /// Create a detached element.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push_node(
            NodeKind::Element(ElementData {
                tag: tag.to_ascii_lowercase(),
                attrs: Vec::new(),
                checked: false,
            }),
            None,
        )
    }

    /// Create a detached text node.
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.push_node(NodeKind::Text(text.to_string()), None)
    }

    /// Append `child` as the last child of `parent`, detaching it from any
    /// previous parent first.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if let Some(old) = self.node(child).parent {
            self.node_mut(old).children.retain(|&c| c != child);
        }
        self.node_mut(child).parent = Some(parent);
        self.node_mut(parent).children.push(child);
    }

    fn push_node(&mut self, kind: NodeKind, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            parent,
            children: Vec::new(),
            kind,
        });
        id
    }

    fn push_element(&mut self, tag: String, attrs: Vec<(String, String)>, checked: bool) -> NodeId {
        self.push_node(NodeKind::Element(ElementData { tag, attrs, checked }), None)
    }

    fn push_text(&mut self, text: String) -> NodeId {
        self.push_node(NodeKind::Text(text), None)
    }

    /// Serialize the tree back to markup.
    ///
    /// Checkbox `checked` state is reflected as the boolean attribute, so a
    /// round trip preserves selections made after parsing.
    #[must_use]
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        for &child in self.children(self.root) {
            self.write_node(child, &mut out, false);
        }
        out
    }

    fn write_node(&self, id: NodeId, out: &mut String, raw_text: bool) {
        match &self.node(id).kind {
            NodeKind::Document => {}
            NodeKind::Text(text) => {
                if raw_text {
                    out.push_str(text);
                } else {
                    out.push_str(&escape_text(text));
                }
            }
            NodeKind::Element(el) => {
                let checkbox = el.is_checkbox();
                out.push('<');
                out.push_str(&el.tag);
                for (name, value) in &el.attrs {
                    if checkbox && name == "checked" {
                        continue;
                    }
                    out.push(' ');
                    out.push_str(name);
                    if !value.is_empty() {
                        out.push_str("=\"");
                        out.push_str(&escape_attr(value));
                        out.push('"');
                    }
                }
                if checkbox && el.checked {
                    out.push_str(" checked");
                }
                out.push('>');
                if is_void(&el.tag) {
                    return;
                }
                let raw = matches!(el.tag.as_str(), "script" | "style");
                for &child in self.children(id) {
                    self.write_node(child, out, raw);
                }
                out.push_str("</");
                out.push_str(&el.tag);
                out.push('>');
            }
        }
    }
}

fn is_void(tag: &str) -> bool {
    matches!(
        tag,
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "link"
            | "meta"
            | "param"
            | "source"
            | "track"
            | "wbr"
    )
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

fn escape_attr(value: &str) -> String {
    escape_text(value).replace('"', "&quot;")
}
