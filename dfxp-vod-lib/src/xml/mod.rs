//! XML document module
//!
//! This module handles:
//! - Process-wide parser lifecycle (`init` / `cleanup`)
//! - A read-only, index-based document tree that the DFXP traversals walk
//!   with explicit stacks instead of recursion
//! - Building that tree from raw bytes (see `builder`)

pub mod builder;

use std::sync::atomic::{AtomicBool, Ordering};

pub use builder::parse_document;

static INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Initialize the XML parser.
///
/// This should be called exactly once at process startup, before any
/// document is parsed. Calling it again is harmless.
pub fn init() {
    if !INITIALIZED.swap(true, Ordering::SeqCst) {
        tracing::info!("DFXP XML parser initialized");
    }
}

/// Tear down the XML parser at process shutdown.
pub fn cleanup() {
    if INITIALIZED.swap(false, Ordering::SeqCst) {
        tracing::info!("DFXP XML parser cleaned up");
    }
}

pub fn is_initialized() -> bool {
    INITIALIZED.load(Ordering::SeqCst)
}

/// Handle of a node inside a `Document`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// Element with its local name and attributes keyed by local name
    Element {
        name: String,
        attributes: Vec<(String, String)>,
    },
    Text(String),
    CData(String),
}

#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    parent: Option<NodeId>,
    first_child: Option<NodeId>,
    last_child: Option<NodeId>,
    prev_sibling: Option<NodeId>,
    next_sibling: Option<NodeId>,
}

/// Parsed XML document. Nodes live in one arena and link to each other by index.
#[derive(Debug, Clone, Default)]
pub struct Document {
    nodes: Vec<Node>,
    root: Option<NodeId>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// The root element, if the document has one
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).first_child
    }

    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).last_child
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).next_sibling
    }

    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).prev_sibling
    }

    pub fn has_children(&self, id: NodeId) -> bool {
        self.node(id).first_child.is_some()
    }

    /// Local name of an element node
    pub fn element_name(&self, id: NodeId) -> Option<&str> {
        match &self.node(id).kind {
            NodeKind::Element { name, .. } => Some(name),
            _ => None,
        }
    }

    pub fn is_element(&self, id: NodeId, name: &str) -> bool {
        self.element_name(id) == Some(name)
    }

    /// Attribute value by local name.
    ///
    /// Empty values count as absent.
    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        match &self.node(id).kind {
            NodeKind::Element { attributes, .. } => attributes
                .iter()
                .find(|(key, value)| key == name && !value.is_empty())
                .map(|(_, value)| value.as_str()),
            _ => None,
        }
    }

    pub fn has_attribute_value(&self, id: NodeId, name: &str, value: &str) -> bool {
        self.attribute(id, name) == Some(value)
    }

    /// Content of a text or CDATA node
    pub fn text(&self, id: NodeId) -> Option<&str> {
        match &self.node(id).kind {
            NodeKind::Text(text) | NodeKind::CData(text) => Some(text),
            NodeKind::Element { .. } => None,
        }
    }

    /// Append an element under `parent`, or make it the root when `parent` is `None`.
    pub(crate) fn append_element(
        &mut self,
        parent: Option<NodeId>,
        name: String,
        attributes: Vec<(String, String)>,
    ) -> NodeId {
        let id = self.push(parent, NodeKind::Element { name, attributes });
        if parent.is_none() && self.root.is_none() {
            self.root = Some(id);
        }
        id
    }

    /// Append character data under `parent`. Adjacent text is merged into one node.
    pub(crate) fn append_text(&mut self, parent: NodeId, text: &str) {
        if text.is_empty() {
            return;
        }
        if let Some(last) = self.last_child(parent) {
            if let NodeKind::Text(existing) = &mut self.nodes[last.0].kind {
                existing.push_str(text);
                return;
            }
        }
        self.push(Some(parent), NodeKind::Text(text.to_string()));
    }

    pub(crate) fn append_cdata(&mut self, parent: NodeId, text: String) {
        if !text.is_empty() {
            self.push(Some(parent), NodeKind::CData(text));
        }
    }

    fn push(&mut self, parent: Option<NodeId>, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        let prev_sibling = parent.and_then(|p| self.nodes[p.0].last_child);
        self.nodes.push(Node {
            kind,
            parent,
            first_child: None,
            last_child: None,
            prev_sibling,
            next_sibling: None,
        });
        if let Some(prev) = prev_sibling {
            self.nodes[prev.0].next_sibling = Some(id);
        }
        if let Some(p) = parent {
            let parent_node = &mut self.nodes[p.0];
            if parent_node.first_child.is_none() {
                parent_node.first_child = Some(id);
            }
            parent_node.last_child = Some(id);
        }
        id
    }
}
