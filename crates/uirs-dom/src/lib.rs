//! uirs-dom - Presentation layer for uirs
//!
//! Defines the capability surface the reconciler drives ([`Dom`]), an in-memory
//! document implementing it ([`MemoryDom`]), and the deferred task primitive
//! used for insertion callbacks ([`Scheduler`], [`IdleQueue`]).

pub mod adapter;
pub mod memory;
pub mod scheduler;
mod serialize;

pub use adapter::Dom;
pub use memory::{MemoryDom, Mutation};
pub use scheduler::{IdleQueue, Scheduler, Task};
