//! Integration tests for the counter app on the in-memory document

use std::rc::Rc;

use uirs::{counter_app, Msg};
use uirs_app::{run_app, Host, RuntimeEvent, DEFAULT_ROOT_ID};
use uirs_dom::{IdleQueue, MemoryDom, Mutation};

fn mount() -> (
    Rc<MemoryDom>,
    Rc<IdleQueue>,
    uirs_app::MountedApp<uirs::Counter, Msg>,
) {
    let (dom, _) = MemoryDom::with_container(DEFAULT_ROOT_ID).unwrap();
    let dom = Rc::new(dom);
    let queue = Rc::new(IdleQueue::new());
    let host = Host::new(dom.clone(), queue.clone());
    let app = run_app(counter_app("Count: "), host, DEFAULT_ROOT_ID).unwrap();
    (dom, queue, app)
}

#[test]
fn test_five_clicks_update_the_same_button() {
    let (dom, _queue, app) = mount();
    let button = dom.find_by_tag("button").unwrap().unwrap();

    for _ in 0..5 {
        dom.click(button).unwrap();
    }

    assert_eq!(dom.text_content(button).unwrap(), "5");
    assert_eq!(dom.find_by_tag("button").unwrap(), Some(button));
    assert!(dom.is_attached(button).unwrap());
    assert_eq!(app.with_state(|s| s.count), 5);
}

#[test]
fn test_markup_after_clicks() {
    let (dom, queue, app) = mount();
    let button = dom.find_by_tag("button").unwrap().unwrap();
    dom.click(button).unwrap();
    dom.click(button).unwrap();
    queue.flush();

    insta::assert_snapshot!(
        dom.inner_html(app.container()).unwrap(),
        @r#"<div class="counter"><span class="label">Count: </span><button type="button">2</button></div>"#
    );
}

#[test]
fn test_click_only_touches_text_and_listener() {
    let (dom, _queue, _app) = mount();
    let button = dom.find_by_tag("button").unwrap().unwrap();
    dom.take_mutations();

    dom.click(button).unwrap();

    // the count text changes and the fresh click listener replaces the old one
    let mutations = dom.take_mutations();
    assert!(mutations
        .iter()
        .any(|m| matches!(m, Mutation::SetText { data, .. } if data == "1")));
    assert!(mutations.iter().all(|m| !matches!(
        m,
        Mutation::AppendChild { .. } | Mutation::ReplaceChild { .. } | Mutation::RemoveChild { .. }
    )));
    assert_eq!(dom.listener_count(button, "click").unwrap(), 1);
}

#[test]
fn test_reset_returns_to_zero() {
    let (dom, _queue, app) = mount();
    let button = dom.find_by_tag("button").unwrap().unwrap();
    dom.click(button).unwrap();
    app.send(Msg::Reset).unwrap();

    assert_eq!(dom.text_content(button).unwrap(), "0");
    assert_eq!(app.generation(), 2);
}

#[test]
fn test_insert_hook_runs_once_per_mount() {
    let (dom, queue, _app) = mount();
    let button = dom.find_by_tag("button").unwrap().unwrap();
    assert_eq!(queue.pending(), 1);

    dom.click(button).unwrap();
    dom.click(button).unwrap();

    // updates patch the button in place, so no new hook is scheduled
    assert_eq!(queue.flush(), 1);
    assert_eq!(queue.pending(), 0);
}

#[test]
fn test_observer_counts_updates() {
    let (dom, _queue, app) = mount();
    let generations = Rc::new(std::cell::RefCell::new(Vec::new()));
    let sink = generations.clone();
    app.subscribe(move |event| {
        if let RuntimeEvent::Updated { generation, .. } = event {
            sink.borrow_mut().push(*generation);
        }
    });

    let button = dom.find_by_tag("button").unwrap().unwrap();
    dom.click(button).unwrap();
    dom.click(button).unwrap();
    dom.click(button).unwrap();

    assert_eq!(*generations.borrow(), vec![1, 2, 3]);
}
