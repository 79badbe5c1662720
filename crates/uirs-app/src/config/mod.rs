//! Configuration file parsing for uirs
//!
//! Supports:
//! - `.uirs/config.toml` - mount, demo and output settings

pub mod settings;
pub mod types;

pub use settings::{init_config_dir, load_settings, CONFIG_FILENAME, UIRS_DIR};
pub use types::*;
