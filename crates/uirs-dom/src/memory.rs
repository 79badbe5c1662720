//! In-memory document
//!
//! [`MemoryDom`] is an arena-backed presentation tree implementing [`Dom`]. It is
//! what the demo runner and the test suites mount applications on. Besides the
//! adapter primitives it offers inspection helpers (text content, attributes,
//! serialization), event dispatch, and a log of every mutation applied to it.
//!
//! Nodes are never freed: a handle stays valid after its node is detached, the
//! same way a script can keep a reference to a removed DOM node.
//!
//! Fragment containers stay in the tree once appended and are transparent in
//! serialization and text content.

use std::cell::RefCell;
use std::collections::HashMap;

use tracing::trace;
use uirs_core::prelude::*;
use uirs_core::{Callback, NodeId};

use crate::adapter::Dom;
use crate::serialize;

// ============================================================================
// Node storage
// ============================================================================

#[derive(Debug)]
pub(crate) enum NodeKind {
    Document,
    Element {
        tag_name: String,
        attributes: Vec<(String, String)>,
        listeners: Vec<(String, Callback)>,
    },
    Text(String),
    Fragment,
}

#[derive(Debug)]
pub(crate) struct NodeData {
    pub(crate) kind: NodeKind,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
}

impl NodeData {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            parent: None,
            children: Vec::new(),
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct Arena {
    nodes: HashMap<NodeId, NodeData>,
    next_id: u64,
    created: usize,
    mutations: Vec<Mutation>,
}

impl Arena {
    fn insert(&mut self, kind: NodeKind) -> NodeId {
        self.next_id += 1;
        let id = NodeId::from_raw(self.next_id);
        self.nodes.insert(id, NodeData::new(kind));
        id
    }

    pub(crate) fn get(&self, node: NodeId) -> Result<&NodeData> {
        self.nodes.get(&node).ok_or(Error::node_not_found(node))
    }

    fn get_mut(&mut self, node: NodeId) -> Result<&mut NodeData> {
        self.nodes
            .get_mut(&node)
            .ok_or(Error::node_not_found(node))
    }

    fn is_ancestor_or_self(&self, ancestor: NodeId, node: NodeId) -> Result<bool> {
        let mut cursor = Some(node);
        while let Some(current) = cursor {
            if current == ancestor {
                return Ok(true);
            }
            cursor = self.get(current)?.parent;
        }
        Ok(false)
    }

    fn ensure_container(&self, node: NodeId) -> Result<()> {
        match self.get(node)?.kind {
            NodeKind::Text(_) => Err(Error::invalid_node_kind(node, "container")),
            _ => Ok(()),
        }
    }

    fn detach(&mut self, child: NodeId) -> Result<()> {
        if let Some(parent) = self.get(child)?.parent {
            self.get_mut(parent)?.children.retain(|c| *c != child);
            self.get_mut(child)?.parent = None;
        }
        Ok(())
    }

    fn element_mut(
        &mut self,
        node: NodeId,
    ) -> Result<(&mut Vec<(String, String)>, &mut Vec<(String, Callback)>)> {
        match &mut self.get_mut(node)?.kind {
            NodeKind::Element {
                attributes,
                listeners,
                ..
            } => Ok((attributes, listeners)),
            _ => Err(Error::invalid_node_kind(node, "element")),
        }
    }
}

// ============================================================================
// Mutation log
// ============================================================================

/// One change applied to the document through the adapter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    AppendChild { parent: NodeId, child: NodeId },
    RemoveChild { parent: NodeId, child: NodeId },
    ReplaceChild {
        parent: NodeId,
        new_child: NodeId,
        old_child: NodeId,
    },
    SetAttribute {
        node: NodeId,
        name: String,
        value: String,
    },
    RemoveAttribute { node: NodeId, name: String },
    AddListener { node: NodeId, event: String },
    RemoveListener { node: NodeId, event: String },
    SetText { node: NodeId, data: String },
}

// ============================================================================
// MemoryDom
// ============================================================================

/// Arena-backed presentation tree
#[derive(Debug)]
pub struct MemoryDom {
    inner: RefCell<Arena>,
    document: NodeId,
}

impl Default for MemoryDom {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDom {
    /// An empty document.
    pub fn new() -> Self {
        let mut arena = Arena::default();
        let document = arena.insert(NodeKind::Document);
        Self {
            inner: RefCell::new(arena),
            document,
        }
    }

    /// A document containing a single `<div id="{root_id}">` container, returned
    /// alongside its handle.
    pub fn with_container(root_id: &str) -> Result<(Self, NodeId)> {
        let dom = Self::new();
        let container = dom.create_element("div")?;
        dom.set_attribute(container, "id", root_id)?;
        dom.append_child(dom.document, container)?;
        dom.take_mutations();
        Ok((dom, container))
    }

    /// Root of the document; everything attached descends from it.
    pub fn document(&self) -> NodeId {
        self.document
    }

    // ─────────────────────────────────────────────────────────
    // Inspection
    // ─────────────────────────────────────────────────────────

    pub fn parent(&self, node: NodeId) -> Result<Option<NodeId>> {
        Ok(self.inner.borrow().get(node)?.parent)
    }

    pub fn children(&self, node: NodeId) -> Result<Vec<NodeId>> {
        Ok(self.inner.borrow().get(node)?.children.clone())
    }

    /// Tag name for element nodes, `None` for anything else.
    pub fn tag_name(&self, node: NodeId) -> Result<Option<String>> {
        Ok(match &self.inner.borrow().get(node)?.kind {
            NodeKind::Element { tag_name, .. } => Some(tag_name.clone()),
            _ => None,
        })
    }

    pub fn attribute(&self, node: NodeId, name: &str) -> Result<Option<String>> {
        Ok(match &self.inner.borrow().get(node)?.kind {
            NodeKind::Element { attributes, .. } => attributes
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.clone()),
            _ => None,
        })
    }

    pub fn listener_count(&self, node: NodeId, event: &str) -> Result<usize> {
        Ok(match &self.inner.borrow().get(node)?.kind {
            NodeKind::Element { listeners, .. } => {
                listeners.iter().filter(|(e, _)| e == event).count()
            }
            _ => 0,
        })
    }

    /// Concatenated text of `node` and all its descendants.
    pub fn text_content(&self, node: NodeId) -> Result<String> {
        let arena = self.inner.borrow();
        let mut out = String::new();
        collect_text(&arena, node, &mut out)?;
        Ok(out)
    }

    /// Whether `node` is reachable from the document root.
    pub fn is_attached(&self, node: NodeId) -> Result<bool> {
        self.inner.borrow().is_ancestor_or_self(self.document, node)
    }

    /// First attached element with the given tag name, in document order.
    pub fn find_by_tag(&self, tag: &str) -> Result<Option<NodeId>> {
        let arena = self.inner.borrow();
        find_first(&arena, self.document, &|data| {
            matches!(&data.kind, NodeKind::Element { tag_name, .. } if tag_name == tag)
        })
    }

    /// Serialize `node` and its subtree as markup.
    pub fn to_html(&self, node: NodeId) -> Result<String> {
        let arena = self.inner.borrow();
        serialize::to_html(&arena, node)
    }

    /// Serialize only the children of `node`.
    pub fn inner_html(&self, node: NodeId) -> Result<String> {
        let arena = self.inner.borrow();
        let mut out = String::new();
        for child in &arena.get(node)?.children {
            out.push_str(&serialize::to_html(&arena, *child)?);
        }
        Ok(out)
    }

    /// Total number of nodes ever created, the document included.
    pub fn created_count(&self) -> usize {
        self.inner.borrow().created
    }

    /// Drain the mutation log.
    pub fn take_mutations(&self) -> Vec<Mutation> {
        std::mem::take(&mut self.inner.borrow_mut().mutations)
    }

    // ─────────────────────────────────────────────────────────
    // Events
    // ─────────────────────────────────────────────────────────

    /// Fire `event` at `target`, invoking its listeners and then those of each
    /// ancestor. Each listener receives the node it is registered on. Returns how
    /// many listeners ran.
    pub fn dispatch_event(&self, target: NodeId, event: &str) -> Result<usize> {
        // listeners are cloned out so handlers can mutate the document
        let pending: Vec<(NodeId, Callback)> = {
            let arena = self.inner.borrow();
            let mut pending = Vec::new();
            let mut cursor = Some(target);
            while let Some(node) = cursor {
                let data = arena.get(node)?;
                if let NodeKind::Element { listeners, .. } = &data.kind {
                    pending.extend(
                        listeners
                            .iter()
                            .filter(|(e, _)| e == event)
                            .map(|(_, cb)| (node, cb.clone())),
                    );
                }
                cursor = data.parent;
            }
            pending
        };

        trace!(
            "Dispatching '{}' at {} to {} listener(s)",
            event,
            target,
            pending.len()
        );
        for (node, callback) in &pending {
            callback.call(*node);
        }
        Ok(pending.len())
    }

    /// Shorthand for dispatching `click`.
    pub fn click(&self, target: NodeId) -> Result<usize> {
        self.dispatch_event(target, "click")
    }

    fn create(&self, kind: NodeKind) -> NodeId {
        let mut arena = self.inner.borrow_mut();
        arena.created += 1;
        arena.insert(kind)
    }
}

fn collect_text(arena: &Arena, node: NodeId, out: &mut String) -> Result<()> {
    let data = arena.get(node)?;
    if let NodeKind::Text(text) = &data.kind {
        out.push_str(text);
    }
    for child in &data.children {
        collect_text(arena, *child, out)?;
    }
    Ok(())
}

fn find_first(
    arena: &Arena,
    node: NodeId,
    pred: &dyn Fn(&NodeData) -> bool,
) -> Result<Option<NodeId>> {
    let data = arena.get(node)?;
    if pred(data) {
        return Ok(Some(node));
    }
    for child in &data.children {
        if let Some(found) = find_first(arena, *child, pred)? {
            return Ok(Some(found));
        }
    }
    Ok(None)
}

impl Dom for MemoryDom {
    fn create_element(&self, tag_name: &str) -> Result<NodeId> {
        let node = self.create(NodeKind::Element {
            tag_name: tag_name.to_string(),
            attributes: Vec::new(),
            listeners: Vec::new(),
        });
        trace!("create_element <{}> -> {}", tag_name, node);
        Ok(node)
    }

    fn create_text_node(&self, data: &str) -> Result<NodeId> {
        let node = self.create(NodeKind::Text(data.to_string()));
        trace!("create_text_node {:?} -> {}", data, node);
        Ok(node)
    }

    fn create_fragment(&self) -> Result<NodeId> {
        let node = self.create(NodeKind::Fragment);
        trace!("create_fragment -> {}", node);
        Ok(node)
    }

    fn contains(&self, parent: NodeId, node: NodeId) -> Result<bool> {
        let arena = self.inner.borrow();
        arena.get(parent)?;
        arena.is_ancestor_or_self(parent, node)
    }

    fn append_child(&self, parent: NodeId, child: NodeId) -> Result<NodeId> {
        let mut arena = self.inner.borrow_mut();
        arena.ensure_container(parent)?;
        if arena.is_ancestor_or_self(child, parent)? {
            return Err(Error::hierarchy_request(parent, child));
        }
        arena.detach(child)?;
        arena.get_mut(parent)?.children.push(child);
        arena.get_mut(child)?.parent = Some(parent);
        arena.mutations.push(Mutation::AppendChild { parent, child });
        trace!("append_child {} <- {}", parent, child);
        Ok(child)
    }

    fn remove_child(&self, parent: NodeId, child: NodeId) -> Result<Option<NodeId>> {
        let mut arena = self.inner.borrow_mut();
        arena.get(parent)?;
        if arena.get(child)?.parent != Some(parent) {
            return Ok(None);
        }
        arena.detach(child)?;
        arena.mutations.push(Mutation::RemoveChild { parent, child });
        trace!("remove_child {} -/- {}", parent, child);
        Ok(Some(child))
    }

    fn replace_child(
        &self,
        parent: NodeId,
        new_child: NodeId,
        old_child: NodeId,
    ) -> Result<Option<NodeId>> {
        let mut arena = self.inner.borrow_mut();
        arena.get(parent)?;
        if arena.get(old_child)?.parent != Some(parent) {
            return Ok(None);
        }
        if new_child == old_child {
            return Ok(Some(old_child));
        }
        if arena.is_ancestor_or_self(new_child, parent)? {
            return Err(Error::hierarchy_request(parent, new_child));
        }
        arena.detach(new_child)?;
        let siblings = &mut arena.get_mut(parent)?.children;
        // position is looked up after detaching new_child, which may have been a sibling
        let Some(index) = siblings.iter().position(|c| *c == old_child) else {
            return Ok(None);
        };
        siblings[index] = new_child;
        arena.get_mut(new_child)?.parent = Some(parent);
        arena.get_mut(old_child)?.parent = None;
        arena.mutations.push(Mutation::ReplaceChild {
            parent,
            new_child,
            old_child,
        });
        trace!("replace_child {}: {} -> {}", parent, old_child, new_child);
        Ok(Some(old_child))
    }

    fn set_attribute(&self, node: NodeId, name: &str, value: &str) -> Result<()> {
        let mut arena = self.inner.borrow_mut();
        let (attributes, _) = arena.element_mut(node)?;
        match attributes.iter_mut().find(|(k, _)| k == name) {
            Some(entry) => entry.1 = value.to_string(),
            None => attributes.push((name.to_string(), value.to_string())),
        }
        arena.mutations.push(Mutation::SetAttribute {
            node,
            name: name.to_string(),
            value: value.to_string(),
        });
        trace!("set_attribute {} {}={:?}", node, name, value);
        Ok(())
    }

    fn remove_attribute(&self, node: NodeId, name: &str) -> Result<()> {
        let mut arena = self.inner.borrow_mut();
        let (attributes, _) = arena.element_mut(node)?;
        attributes.retain(|(k, _)| k != name);
        arena.mutations.push(Mutation::RemoveAttribute {
            node,
            name: name.to_string(),
        });
        trace!("remove_attribute {} {}", node, name);
        Ok(())
    }

    fn add_event_listener(&self, node: NodeId, event: &str, listener: Callback) -> Result<()> {
        let mut arena = self.inner.borrow_mut();
        let (_, listeners) = arena.element_mut(node)?;
        // registering the same listener twice for an event is a no-op
        if listeners
            .iter()
            .any(|(e, cb)| e == event && cb.ptr_eq(&listener))
        {
            return Ok(());
        }
        listeners.push((event.to_string(), listener));
        arena.mutations.push(Mutation::AddListener {
            node,
            event: event.to_string(),
        });
        trace!("add_event_listener {} '{}'", node, event);
        Ok(())
    }

    fn remove_event_listener(&self, node: NodeId, event: &str, listener: &Callback) -> Result<()> {
        let mut arena = self.inner.borrow_mut();
        let (_, listeners) = arena.element_mut(node)?;
        let before = listeners.len();
        listeners.retain(|(e, cb)| !(e == event && cb.ptr_eq(listener)));
        if listeners.len() != before {
            arena.mutations.push(Mutation::RemoveListener {
                node,
                event: event.to_string(),
            });
            trace!("remove_event_listener {} '{}'", node, event);
        }
        Ok(())
    }

    fn set_text(&self, node: NodeId, data: &str) -> Result<()> {
        let mut arena = self.inner.borrow_mut();
        match &mut arena.get_mut(node)?.kind {
            NodeKind::Text(text) => *text = data.to_string(),
            _ => return Err(Error::invalid_node_kind(node, "text")),
        }
        arena.mutations.push(Mutation::SetText {
            node,
            data: data.to_string(),
        });
        trace!("set_text {} {:?}", node, data);
        Ok(())
    }

    fn get_element_by_id(&self, id: &str) -> Result<Option<NodeId>> {
        let arena = self.inner.borrow();
        find_first(&arena, self.document, &|data| match &data.kind {
            NodeKind::Element { attributes, .. } => {
                attributes.iter().any(|(k, v)| k == "id" && v == id)
            }
            _ => false,
        })
    }
}
