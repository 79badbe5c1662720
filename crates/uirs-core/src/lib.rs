//! # uirs-core - Core Domain Types
//!
//! Foundation crate for uirs. Provides the element model, presentation-node
//! handles, error handling and logging setup.
//!
//! This crate has **zero internal dependencies** -- it only depends on external
//! crates (serde, thiserror, regex, tracing, toml).
//!
//! ## Public API
//!
//! ### Element Model (`element`, `ui_node`, `props`)
//! - [`Element`] - Root, Text or Fragment description of desired UI
//! - [`element()`] - Factory building an element from a [`Tag`], props and children
//! - [`UiNode`] - Heterogeneous render output, flattened by [`normalize()`]
//! - [`Props`], [`PropValue`], [`Callback`] - Element properties
//!
//! ### Presentation Handles (`node`)
//! - [`NodeId`] - Opaque handle to a live presentation node
//!
//! ### Error Handling (`error`)
//! - [`Error`] - Error enum with `fatal` vs `recoverable` classification
//! - [`Result`] - Type alias for `std::result::Result<T, Error>`
//! - [`ResultExt`] - Extension trait for adding error context
//!
//! ## Prelude
//!
//! Import commonly used types with:
//! ```rust
//! use uirs_core::prelude::*;
//! ```

pub mod element;
pub mod error;
pub mod logging;
pub mod node;
pub mod props;
pub mod ui_node;

/// Prelude for common imports used throughout all uirs crates
pub mod prelude {
    pub use super::error::{Error, Result, ResultExt};
    pub use tracing::{debug, error, info, instrument, trace, warn};
}

// Re-export commonly used types at crate root for convenience
pub use element::{
    element, Component, Element, ElementKind, FragmentElement, RootElement, Tag, TextElement,
    FRAGMENT,
};
pub use error::{Error, Result, ResultExt};
pub use node::NodeId;
pub use props::{number_to_string, Callback, PropValue, Props};
pub use ui_node::{normalize, UiNode};
