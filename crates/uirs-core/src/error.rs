//! Application error types with rich context

use crate::node::NodeId;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Error types organized by layer
#[derive(Debug, Error)]
pub enum Error {
    // ─────────────────────────────────────────────────────────────
    // Common/Infrastructure Errors
    // ─────────────────────────────────────────────────────────────
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    // ─────────────────────────────────────────────────────────────
    // Element Model Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Cannot construct an element from tag `{tag}`")]
    InvalidTag { tag: String },

    #[error("Render failed: {message}")]
    Render { message: String },

    // ─────────────────────────────────────────────────────────────
    // Presentation Layer Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Presentation node {node} does not exist")]
    NodeNotFound { node: NodeId },

    #[error("Presentation node {node} is not a {expected} node")]
    InvalidNodeKind {
        node: NodeId,
        expected: &'static str,
    },

    #[error("Cannot insert {child} into {parent}: the node is an ancestor of its new parent")]
    HierarchyRequest { parent: NodeId, child: NodeId },

    // ─────────────────────────────────────────────────────────────
    // Runtime Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to mount application: no container with id `{id}`")]
    ContainerNotFound { id: String },

    #[error("Event triggered while the application was already updating")]
    ReentrantTrigger,

    #[error("Application stopped: an earlier update left the presentation tree out of sync")]
    RuntimeHalted,

    // ─────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

// ─────────────────────────────────────────────────────────────────
// Convenience Constructors
// ─────────────────────────────────────────────────────────────────

impl Error {
    pub fn invalid_tag(tag: impl Into<String>) -> Self {
        Self::InvalidTag { tag: tag.into() }
    }

    pub fn render(message: impl Into<String>) -> Self {
        Self::Render {
            message: message.into(),
        }
    }

    pub fn node_not_found(node: NodeId) -> Self {
        Self::NodeNotFound { node }
    }

    pub fn invalid_node_kind(node: NodeId, expected: &'static str) -> Self {
        Self::InvalidNodeKind { node, expected }
    }

    pub fn hierarchy_request(parent: NodeId, child: NodeId) -> Self {
        Self::HierarchyRequest { parent, child }
    }

    pub fn container_not_found(id: impl Into<String>) -> Self {
        Self::ContainerNotFound { id: id.into() }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Check if this error indicates a programming or mount failure that must abort
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::InvalidTag { .. }
                | Error::ContainerNotFound { .. }
                | Error::ReentrantTrigger
                | Error::RuntimeHalted
        )
    }
}

// ─────────────────────────────────────────────────────────────────
// Error Context Extensions
// ─────────────────────────────────────────────────────────────────

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let err = e.into();
            tracing::error!("{}: {:?}", context.into(), err);
            err
        })
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| {
            let err = e.into();
            tracing::error!("{}: {:?}", f(), err);
            err
        })
    }
}
