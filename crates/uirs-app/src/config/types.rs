//! Configuration types for uirs
//!
//! Every field has a default so a partial or empty `config.toml` still loads.

use serde::{Deserialize, Serialize};

/// Global settings from `.uirs/config.toml`
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct Settings {
    #[serde(default)]
    pub mount: MountSettings,

    #[serde(default)]
    pub demo: DemoSettings,

    #[serde(default)]
    pub output: OutputSettings,
}

/// Where applications are mounted
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct MountSettings {
    /// Identifier of the container element looked up by `run_app`
    #[serde(default = "default_root_id")]
    pub root_id: String,
}

impl Default for MountSettings {
    fn default() -> Self {
        Self {
            root_id: default_root_id(),
        }
    }
}

/// Parameters of the bundled counter demo
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct DemoSettings {
    /// Number of simulated clicks
    #[serde(default = "default_clicks")]
    pub clicks: u32,

    /// Text rendered in front of the count
    #[serde(default = "default_label")]
    pub label: String,
}

impl Default for DemoSettings {
    fn default() -> Self {
        Self {
            clicks: default_clicks(),
            label: default_label(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct OutputSettings {
    #[serde(default)]
    pub format: OutputFormat,
}

/// How the demo reports its result
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Final container markup
    #[default]
    Html,
    /// One JSON event per line
    Json,
}

fn default_root_id() -> String {
    crate::runtime::DEFAULT_ROOT_ID.to_string()
}

fn default_clicks() -> u32 {
    5
}

fn default_label() -> String {
    "Count: ".to_string()
}
