//! Demo runner - mounts the counter into an in-memory document and clicks it

use std::io::Write;
use std::rc::Rc;

use tracing::info;
use uirs_app::config::{OutputFormat, Settings};
use uirs_app::{run_app, Host};
use uirs_core::prelude::*;
use uirs_dom::{IdleQueue, MemoryDom};

use super::HeadlessEvent;
use crate::counter::counter_app;

/// What the demo does, resolved from settings and command-line overrides
#[derive(Debug, Clone, PartialEq)]
pub struct DemoOptions {
    pub root_id: String,
    pub clicks: u32,
    pub label: String,
    pub format: OutputFormat,
}

impl From<&Settings> for DemoOptions {
    fn from(settings: &Settings) -> Self {
        Self {
            root_id: settings.mount.root_id.clone(),
            clicks: settings.demo.clicks,
            label: settings.demo.label.clone(),
            format: settings.output.format,
        }
    }
}

impl Default for DemoOptions {
    fn default() -> Self {
        Self::from(&Settings::default())
    }
}

/// Mount the counter, click it `options.clicks` times, run deferred hooks and
/// report to `out`. Returns the container's final markup.
pub fn run_demo(options: &DemoOptions, out: &mut dyn Write) -> Result<String> {
    info!(
        "Running counter demo in #{} ({} clicks)",
        options.root_id, options.clicks
    );
    let json = options.format == OutputFormat::Json;

    let (dom, _) = MemoryDom::with_container(&options.root_id)
        .with_context(|| format!("Failed to create a document with #{}", options.root_id))?;
    let dom = Rc::new(dom);
    let queue = Rc::new(IdleQueue::new());
    let host = Host::new(dom.clone(), queue.clone());

    let app = run_app(counter_app(options.label.as_str()), host, &options.root_id)
        .context("Failed to mount the counter demo")?;
    if json {
        HeadlessEvent::mounted(&options.root_id, app.root_node()).write_to(out)?;
    }

    let button = dom
        .find_by_tag("button")?
        .ok_or_else(|| Error::render("counter rendered no button"))?;
    for click in 1..=options.clicks {
        dom.click(button)
            .with_context(|| format!("Click {} on {} failed", click, button))?;
        if json {
            let count = app.with_state(|s| s.count);
            HeadlessEvent::clicked(click, count).write_to(out)?;
        }
    }

    let ran = queue.flush();
    debug!("Ran {} deferred tasks", ran);

    let html = dom.inner_html(app.container())?;
    if json {
        HeadlessEvent::rendered(app.generation(), html.clone()).write_to(out)?;
    } else {
        writeln!(out, "{}", html)?;
    }
    Ok(html)
}
