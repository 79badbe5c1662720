//! Opaque presentation-node handles
//!
//! A [`NodeId`] names one live node inside whatever presentation layer backs the
//! application. Handles are issued by the presentation adapter and borrowed by the
//! instance tree; they carry no ownership of the node itself.

use serde::Serialize;
use std::fmt;

/// Handle to a live presentation node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NodeId(u64);

impl NodeId {
    /// Wrap a raw identifier issued by a presentation adapter.
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
