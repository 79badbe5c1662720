//! Headless mode - JSON event output for scripted runs
//!
//! Events are written as NDJSON (newline-delimited JSON), one event per line.
//! Each event has an "event" field naming its type.
//!
//! # Example Output
//!
//! ```json
//! {"event":"mounted","root_id":"root","root":3,"timestamp":1704700001000}
//! {"event":"clicked","click":1,"count":1,"timestamp":1704700001002}
//! {"event":"rendered","generation":1,"html":"<div class=\"counter\">...</div>","timestamp":1704700001003}
//! ```

pub mod runner;

use chrono::Utc;
use serde::Serialize;
use std::io::Write;
use uirs_core::NodeId;

/// Events emitted in headless mode
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum HeadlessEvent {
    /// Counter app mounted into its container
    Mounted {
        root_id: String,
        root: Option<NodeId>,
        timestamp: i64,
    },

    /// One simulated click was processed
    Clicked {
        click: u32,
        count: u32,
        timestamp: i64,
    },

    /// Final markup after all clicks and deferred hooks ran
    Rendered {
        generation: u64,
        html: String,
        timestamp: i64,
    },
}

impl HeadlessEvent {
    /// Write this event as one JSON line.
    pub fn write_to(&self, out: &mut dyn Write) -> uirs_core::Result<()> {
        let json = serde_json::to_string(self)?;
        writeln!(out, "{}", json)?;
        out.flush()?;
        Ok(())
    }

    /// Get current timestamp in milliseconds
    fn now() -> i64 {
        Utc::now().timestamp_millis()
    }

    // ─────────────────────────────────────────────────────────
    // Convenience constructors
    // ─────────────────────────────────────────────────────────

    pub fn mounted(root_id: &str, root: Option<NodeId>) -> Self {
        Self::Mounted {
            root_id: root_id.to_string(),
            root,
            timestamp: Self::now(),
        }
    }

    pub fn clicked(click: u32, count: u32) -> Self {
        Self::Clicked {
            click,
            count,
            timestamp: Self::now(),
        }
    }

    pub fn rendered(generation: u64, html: String) -> Self {
        Self::Rendered {
            generation,
            html,
            timestamp: Self::now(),
        }
    }
}
