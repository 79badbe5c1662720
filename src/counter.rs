//! Counter demo application
//!
//! A label followed by a button showing the click count. Every click sends
//! [`Msg::Increment`] through the runtime's trigger.

use uirs_app::{produce, App, Trigger};
use uirs_core::prelude::*;
use uirs_core::{children, element, props, Callback, Element};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Msg {
    Increment,
    Reset,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Counter {
    pub count: u32,
}

/// Render the counter.
pub fn view(trigger: &Trigger<Msg>, state: &Counter, label: &str) -> Result<Element> {
    element(
        "div",
        Some(props! { "class" => "counter" }),
        children![
            element("span", Some(props! { "class" => "label" }), children![label])?,
            element(
                "button",
                Some(props! {
                    "type" => "button",
                    "onClick" => trigger.callback(Msg::Increment),
                    "onInsert" => Callback::new(|node| debug!("Counter button {} inserted", node)),
                }),
                children![state.count],
            )?,
        ],
    )
}

pub fn update(msg: Msg, state: &Counter) -> Counter {
    match msg {
        Msg::Increment => produce(|s: &mut Counter| s.count += 1)(state),
        Msg::Reset => Counter::default(),
    }
}

/// Unmounted counter app with `label` in front of the count.
pub fn counter_app(label: impl Into<String>) -> App<Counter, Msg> {
    let label = label.into();
    App::new(
        Counter::default(),
        move |trigger: &Trigger<Msg>, state: &Counter| view(trigger, state, &label),
        update,
    )
}
