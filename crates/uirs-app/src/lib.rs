//! uirs-app - Reconciliation engine and application runtime for uirs
//!
//! This crate keeps a live presentation tree in step with the element trees a
//! render function produces. It implements the TEA (The Elm Architecture) style
//! loop: an event runs through `update`, the new state is rendered, and the
//! resulting element tree is reconciled against the mounted instance tree.
//!
//! - `instance`: the mutable shadow of the element tree
//! - `reconcile`: create / remove / replace / patch decisions, positional children
//! - `runtime`: [`App`], [`Trigger`], [`MountedApp`], [`run_app`]
//! - `config`: settings loaded from `.uirs/config.toml`

pub mod config;
pub mod event;
pub mod instance;
pub mod produce;
pub mod reconcile;
pub mod runtime;

// Re-export primary types
pub use event::RuntimeEvent;
pub use instance::Instance;
pub use produce::produce;
pub use reconcile::Reconciler;
pub use runtime::{run_app, run_with_root, App, Host, MountedApp, Trigger, DEFAULT_ROOT_ID};
