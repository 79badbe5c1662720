//! Presentation adapter trait
//!
//! Thin, side-effecting primitives over a live presentation tree. Implementations
//! carry no policy and no recovery: failures of the underlying layer propagate to
//! the caller. The only partial operations are [`Dom::remove_child`] and
//! [`Dom::replace_child`], which report `None` instead of failing when the target
//! is not currently a child of the given parent.
//!
//! All methods take `&self`. Event handlers run while the tree is live and may
//! call back into the adapter, so implementations use interior mutability and
//! must not hold a borrow across listener invocation.

use uirs_core::{Callback, NodeId, Result};

pub trait Dom {
    /// Create a detached element node for `tag_name`.
    fn create_element(&self, tag_name: &str) -> Result<NodeId>;

    /// Create a detached text node holding `data`.
    fn create_text_node(&self, data: &str) -> Result<NodeId>;

    /// Create a detached, empty container node for a fragment.
    fn create_fragment(&self) -> Result<NodeId>;

    /// Whether `node` is `parent` or one of its descendants.
    fn contains(&self, parent: NodeId, node: NodeId) -> Result<bool>;

    /// Append `child` as the last child of `parent`, detaching it from any previous
    /// parent first. Returns the appended child.
    fn append_child(&self, parent: NodeId, child: NodeId) -> Result<NodeId>;

    /// Detach `child` from `parent`; `None` when it is not a child of `parent`.
    fn remove_child(&self, parent: NodeId, child: NodeId) -> Result<Option<NodeId>>;

    /// Put `new_child` at the position of `old_child` within `parent` and detach
    /// `old_child`; `None` when `old_child` is not a child of `parent`.
    fn replace_child(
        &self,
        parent: NodeId,
        new_child: NodeId,
        old_child: NodeId,
    ) -> Result<Option<NodeId>>;

    fn set_attribute(&self, node: NodeId, name: &str, value: &str) -> Result<()>;

    fn remove_attribute(&self, node: NodeId, name: &str) -> Result<()>;

    fn add_event_listener(&self, node: NodeId, event: &str, listener: Callback) -> Result<()>;

    /// Remove the listener for `event` that is identical to `listener`.
    fn remove_event_listener(&self, node: NodeId, event: &str, listener: &Callback) -> Result<()>;

    /// Replace the content of a text node.
    fn set_text(&self, node: NodeId, data: &str) -> Result<()>;

    /// First attached element whose `id` attribute equals `id`, in document order.
    fn get_element_by_id(&self, id: &str) -> Result<Option<NodeId>>;
}
