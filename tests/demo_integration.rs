//! Integration tests for the headless demo runner and its configuration

use std::rc::Rc;

use tempfile::TempDir;

use uirs::{counter_app, run_demo, DemoOptions};
use uirs_app::{run_app, Host};
use uirs_app::config::{init_config_dir, load_settings, OutputFormat, CONFIG_FILENAME, UIRS_DIR};
use uirs_core::Error;
use uirs_dom::{IdleQueue, MemoryDom};

fn json_lines(out: Vec<u8>) -> Vec<serde_json::Value> {
    String::from_utf8(out)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

#[test]
fn test_json_output_streams_events() {
    let options = DemoOptions {
        clicks: 3,
        format: OutputFormat::Json,
        ..DemoOptions::default()
    };
    let mut out = Vec::new();
    run_demo(&options, &mut out).unwrap();

    let events = json_lines(out);
    assert_eq!(events.len(), 5);
    assert_eq!(events[0]["event"], "mounted");
    assert_eq!(events[0]["root_id"], "root");
    for (i, event) in events[1..4].iter().enumerate() {
        assert_eq!(event["event"], "clicked");
        assert_eq!(event["click"], i + 1);
        assert_eq!(event["count"], i + 1);
    }
    assert_eq!(events[4]["event"], "rendered");
    assert_eq!(events[4]["generation"], 3);
    assert!(events[4]["html"]
        .as_str()
        .unwrap()
        .contains(r#"<button type="button">3</button>"#));
}

#[test]
fn test_zero_clicks_renders_initial_state() {
    let options = DemoOptions {
        clicks: 0,
        ..DemoOptions::default()
    };
    let mut out = Vec::new();
    let html = run_demo(&options, &mut out).unwrap();

    insta::assert_snapshot!(
        html,
        @r#"<div class="counter"><span class="label">Count: </span><button type="button">0</button></div>"#
    );
}

#[test]
fn test_settings_drive_the_demo() {
    let temp = TempDir::new().unwrap();
    init_config_dir(temp.path()).unwrap();
    std::fs::write(
        temp.path().join(UIRS_DIR).join(CONFIG_FILENAME),
        r#"
[mount]
root_id = "app"

[demo]
clicks = 2
label = "Total: "
"#,
    )
    .unwrap();

    let options = DemoOptions::from(&load_settings(temp.path()));
    let mut out = Vec::new();
    let html = run_demo(&options, &mut out).unwrap();

    assert!(html.contains(r#"<span class="label">Total: </span>"#));
    assert!(html.contains(r#"<button type="button">2</button>"#));
}

#[test]
fn test_custom_root_id_mounts() {
    let options = DemoOptions {
        root_id: "main".to_string(),
        clicks: 1,
        ..DemoOptions::default()
    };
    let mut out = Vec::new();
    let html = run_demo(&options, &mut out).unwrap();
    assert!(html.contains(r#"<button type="button">1</button>"#));
}

#[test]
fn test_missing_container_fails_to_mount() {
    let (dom, _) = MemoryDom::with_container("main").unwrap();
    let host = Host::new(Rc::new(dom), Rc::new(IdleQueue::new()));

    let err = run_app(counter_app(""), host, "root").unwrap_err();
    assert!(matches!(err, Error::ContainerNotFound { .. }));
    assert!(err.is_fatal());
}
