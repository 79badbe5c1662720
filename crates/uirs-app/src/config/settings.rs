//! Settings parser for .uirs/config.toml

use super::types::Settings;
use std::path::Path;
use uirs_core::prelude::*;

pub const CONFIG_FILENAME: &str = "config.toml";
pub const UIRS_DIR: &str = ".uirs";

const DEFAULT_CONFIG: &str = r#"# uirs configuration

[mount]
root_id = "root"        # id of the container element applications mount into

[demo]
clicks = 5              # simulated clicks on the counter button
label = "Count: "

[output]
format = "html"         # "html" prints the final markup, "json" streams events
"#;

/// Load settings from `.uirs/config.toml`.
///
/// Missing or unreadable files fall back to defaults.
pub fn load_settings(project_path: &Path) -> Settings {
    let config_path = project_path.join(UIRS_DIR).join(CONFIG_FILENAME);

    if !config_path.exists() {
        debug!("No config file at {:?}, using defaults", config_path);
        return Settings::default();
    }

    match std::fs::read_to_string(&config_path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(settings) => {
                debug!("Loaded settings from {:?}", config_path);
                settings
            }
            Err(e) => {
                warn!("Failed to parse {:?}: {}", config_path, e);
                Settings::default()
            }
        },
        Err(e) => {
            warn!("Failed to read {:?}: {}", config_path, e);
            Settings::default()
        }
    }
}

/// Create a commented default config in `.uirs/`. An existing file is left alone.
pub fn init_config_dir(project_path: &Path) -> Result<()> {
    let uirs_dir = project_path.join(UIRS_DIR);

    if !uirs_dir.exists() {
        std::fs::create_dir_all(&uirs_dir)
            .map_err(|e| Error::config(format!("Failed to create .uirs dir: {}", e)))?;
    }

    let config_path = uirs_dir.join(CONFIG_FILENAME);
    if !config_path.exists() {
        std::fs::write(&config_path, DEFAULT_CONFIG)
            .map_err(|e| Error::config(format!("Failed to write config.toml: {}", e)))?;
        info!("Created default config at {:?}", config_path);
    }

    Ok(())
}
