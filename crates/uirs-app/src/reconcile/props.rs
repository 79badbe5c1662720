//! Property application and diffing
//!
//! A property whose key starts with `on` and whose value is callable is an event
//! listener for the lowercased remainder of the key (`onClick` listens for
//! `click`). Everything else is an attribute holding the stringified value.

use tracing::trace;
use uirs_core::{Callback, NodeId, PropValue, Props, Result};
use uirs_dom::Dom;

/// Key of the deferred insertion hook
pub const ON_INSERT: &str = "onInsert";

/// How a single property lands on a presentation node
#[derive(Debug)]
pub(crate) enum PropAction<'a> {
    Listener {
        event: String,
        callback: &'a Callback,
    },
    Attribute {
        name: &'a str,
        value: String,
    },
}

pub(crate) fn classify<'a>(key: &'a str, value: &'a PropValue) -> PropAction<'a> {
    match (key.strip_prefix("on"), value.as_callback()) {
        (Some(event), Some(callback)) => PropAction::Listener {
            event: event.to_lowercase(),
            callback,
        },
        _ => PropAction::Attribute {
            name: key,
            value: value.to_attribute_value(),
        },
    }
}

pub(crate) fn add_prop<D: Dom + ?Sized>(dom: &D, node: NodeId, key: &str, value: &PropValue) -> Result<()> {
    match classify(key, value) {
        PropAction::Listener { event, callback } => {
            dom.add_event_listener(node, &event, callback.clone())
        }
        PropAction::Attribute { name, value } => dom.set_attribute(node, name, &value),
    }
}

pub(crate) fn remove_prop<D: Dom + ?Sized>(
    dom: &D,
    node: NodeId,
    key: &str,
    value: &PropValue,
) -> Result<()> {
    match classify(key, value) {
        PropAction::Listener { event, callback } => {
            dom.remove_event_listener(node, &event, callback)
        }
        PropAction::Attribute { name, .. } => dom.remove_attribute(node, name),
    }
}

/// Apply every property of a freshly created node.
pub(crate) fn apply_props<D: Dom + ?Sized>(dom: &D, node: NodeId, props: Option<&Props>) -> Result<()> {
    for (key, value) in props.into_iter().flat_map(Props::iter) {
        add_prop(dom, node, key, value)?;
    }
    Ok(())
}

/// Bring a node's properties from `old` to `new`.
///
/// Old entries are removed when the key is gone, its classification changed, or
/// it was a listener replaced by a different callback. New entries are applied
/// unless an identical entry is already in place, so rendering the same props
/// twice touches nothing.
pub(crate) fn update_props<D: Dom + ?Sized>(
    dom: &D,
    node: NodeId,
    old: Option<&Props>,
    new: Option<&Props>,
) -> Result<()> {
    for (key, old_value) in old.into_iter().flat_map(Props::iter) {
        let new_value = new.and_then(|p| p.get(key));
        if new_value.map_or(true, |new_value| !same_listener_slot(key, old_value, new_value)) {
            trace!("Removing prop '{}' from {}", key, node);
            remove_prop(dom, node, key, old_value)?;
        }
    }

    for (key, new_value) in new.into_iter().flat_map(Props::iter) {
        let old_value = old.and_then(|p| p.get(key));
        if old_value.map_or(true, |old_value| !unchanged(key, old_value, new_value)) {
            add_prop(dom, node, key, new_value)?;
        }
    }
    Ok(())
}

/// An old entry survives when it stays an attribute (the new value overwrites
/// it) or stays the very same listener.
fn same_listener_slot(key: &str, old: &PropValue, new: &PropValue) -> bool {
    match (classify(key, old), classify(key, new)) {
        (PropAction::Attribute { .. }, PropAction::Attribute { .. }) => true,
        (PropAction::Listener { callback: a, .. }, PropAction::Listener { callback: b, .. }) => {
            a.ptr_eq(b)
        }
        _ => false,
    }
}

fn unchanged(key: &str, old: &PropValue, new: &PropValue) -> bool {
    match (classify(key, old), classify(key, new)) {
        (PropAction::Attribute { value: a, .. }, PropAction::Attribute { value: b, .. }) => a == b,
        (PropAction::Listener { callback: a, .. }, PropAction::Listener { callback: b, .. }) => {
            a.ptr_eq(b)
        }
        _ => false,
    }
}

/// The insertion hook, if `props` carries a callable `onInsert`.
pub(crate) fn insert_hook(props: Option<&Props>) -> Option<Callback> {
    props
        .and_then(|p| p.get(ON_INSERT))
        .and_then(PropValue::as_callback)
        .cloned()
}
