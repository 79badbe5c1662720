//! uirs - mount the counter demo into an in-memory document
//!
//! This is the binary entry point. All logic lives in the library.

use std::io;
use std::path::PathBuf;

use clap::Parser;
use color_eyre::Result;
use tracing::info;
use uirs::{run_demo, DemoOptions};
use uirs_app::config::{init_config_dir, load_settings, OutputFormat};

/// uirs - positional reconciler demo
#[derive(Parser, Debug)]
#[command(name = "uirs")]
#[command(about = "Mount the counter demo, click it and print the result", long_about = None)]
struct Args {
    /// Project directory holding .uirs/config.toml
    #[arg(value_name = "PATH")]
    path: Option<PathBuf>,

    /// Number of simulated clicks (overrides [demo] clicks)
    #[arg(long)]
    clicks: Option<u32>,

    /// Container id to mount into (overrides [mount] root_id)
    #[arg(long)]
    root_id: Option<String>,

    /// Stream NDJSON events instead of printing markup
    #[arg(long)]
    json: bool,

    /// Write a default .uirs/config.toml and exit
    #[arg(long)]
    init: bool,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    uirs_core::logging::init()?;

    let args = Args::parse();

    // Get base path from args or use current directory
    let base_path = args
        .path
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));

    if args.init {
        init_config_dir(&base_path)?;
        eprintln!("Wrote default config under {}", base_path.display());
        return Ok(());
    }

    let settings = load_settings(&base_path);
    let mut options = DemoOptions::from(&settings);
    if let Some(clicks) = args.clicks {
        options.clicks = clicks;
    }
    if let Some(root_id) = args.root_id {
        options.root_id = root_id;
    }
    if args.json {
        options.format = OutputFormat::Json;
    }

    let mut stdout = io::stdout().lock();
    if let Err(e) = run_demo(&options, &mut stdout) {
        if let Ok(log_file) = uirs_core::logging::get_current_log_file() {
            eprintln!("Demo failed; details in {}", log_file.display());
        }
        return Err(e.into());
    }
    info!("uirs exiting");
    Ok(())
}
