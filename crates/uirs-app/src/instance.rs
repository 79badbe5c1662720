//! Instance tree
//!
//! One [`Instance`] exists per element in the currently mounted tree. Instances
//! own their children by value and borrow presentation-node handles from the
//! adapter. A node handle never changes during an in-place update; it changes
//! only when the instance is created or replaced.

use std::cell::RefCell;
use std::rc::Rc;

use uirs_core::{Element, ElementKind, NodeId, Props};

/// Properties of a mounted root, shared with any pending insertion callback so
/// that it reads the props current at the time it fires.
pub type SharedProps = Rc<RefCell<Option<Props>>>;

/// Live counterpart of an [`Element`]
#[derive(Debug)]
pub enum Instance {
    Root(RootInstance),
    Text(TextInstance),
    Fragment(FragmentInstance),
}

#[derive(Debug)]
pub struct RootInstance {
    pub(crate) tag_name: String,
    pub(crate) props: SharedProps,
    pub(crate) dom_node: NodeId,
    pub(crate) child_insts: Vec<Instance>,
}

#[derive(Debug)]
pub struct TextInstance {
    pub(crate) value: String,
    pub(crate) dom_node: NodeId,
}

#[derive(Debug)]
pub struct FragmentInstance {
    pub(crate) dom_node: NodeId,
    pub(crate) child_insts: Vec<Instance>,
}

impl Instance {
    /// Handle of the presentation node this instance owns.
    pub fn dom_node(&self) -> NodeId {
        match self {
            Instance::Root(root) => root.dom_node,
            Instance::Text(text) => text.dom_node,
            Instance::Fragment(fragment) => fragment.dom_node,
        }
    }

    pub fn kind(&self) -> ElementKind {
        match self {
            Instance::Root(_) => ElementKind::Root,
            Instance::Text(_) => ElementKind::Text,
            Instance::Fragment(_) => ElementKind::Fragment,
        }
    }

    /// Child instances in element order; empty for text.
    pub fn child_insts(&self) -> &[Instance] {
        match self {
            Instance::Root(root) => &root.child_insts,
            Instance::Fragment(fragment) => &fragment.child_insts,
            Instance::Text(_) => &[],
        }
    }

    pub fn tag_name(&self) -> Option<&str> {
        match self {
            Instance::Root(root) => Some(&root.tag_name),
            _ => None,
        }
    }

    /// Current text for text instances.
    pub fn text(&self) -> Option<&str> {
        match self {
            Instance::Text(text) => Some(&text.value),
            _ => None,
        }
    }

    /// Whether `elem` can be patched into this instance in place: same variant,
    /// and the same tag name for roots.
    pub fn matches(&self, elem: &Element) -> bool {
        match (self, elem) {
            (Instance::Root(inst), Element::Root(root)) => inst.tag_name == root.tag_name(),
            (inst, elem) => inst.kind() == elem.kind(),
        }
    }
}

impl RootInstance {
    /// Snapshot of the current props.
    pub fn props(&self) -> Option<Props> {
        self.props.borrow().clone()
    }
}
