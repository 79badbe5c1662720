//! uirs - virtual element trees reconciled into a live presentation tree
//!
//! The library parts live in the workspace crates:
//! - `uirs-core`: elements, props, errors, logging
//! - `uirs-dom`: the presentation adapter and an in-memory document
//! - `uirs-app`: reconciler and application runtime
//!
//! This crate holds the counter demo and the headless runner behind the `uirs`
//! binary.

pub mod counter;
pub mod headless;

pub use counter::{counter_app, Counter, Msg};
pub use headless::runner::{run_demo, DemoOptions};
pub use headless::HeadlessEvent;
