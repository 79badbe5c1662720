//! Application runtime - the event → update → render → reconcile loop
//!
//! An [`App`] is unmounted until [`App::mount`] consumes it; there is no way back.
//! Once mounted, every event sent through a [`Trigger`] runs to completion
//! before `send` returns:
//!
//! 1. `update(event, &state)` computes the next state
//! 2. `render(&trigger, &next)` builds a new element tree
//! 3. the tree is reconciled against the previous instance tree
//! 4. state, instance tree and generation are stored, observers are notified
//!
//! Sending from inside `render` or `update` fails with
//! [`Error::ReentrantTrigger`] instead of corrupting the loop.
//!
//! A failed reconcile may leave the presentation tree partly patched, with no
//! instance tree describing it. The runtime then halts: the error is returned
//! once, and every later send fails with [`Error::RuntimeHalted`] rather than
//! mounting a second tree beside the stale one.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use uirs_core::prelude::*;
use uirs_core::{Callback, Element, NodeId};
use uirs_dom::{Dom, Scheduler};

use crate::event::RuntimeEvent;
use crate::instance::Instance;
use crate::reconcile::Reconciler;

/// Container identifier used when none is configured
pub const DEFAULT_ROOT_ID: &str = "root";

type RenderFn<S, E> = Box<dyn Fn(&Trigger<E>, &S) -> Result<Element>>;
type UpdateFn<S, E> = Box<dyn Fn(E, &S) -> S>;
type Observer = Rc<dyn Fn(&RuntimeEvent)>;

// ─────────────────────────────────────────────────────────────────────────────
// Host
// ─────────────────────────────────────────────────────────────────────────────

/// Presentation adapter plus the scheduler used for deferred insertion hooks
#[derive(Clone)]
pub struct Host {
    dom: Rc<dyn Dom>,
    scheduler: Rc<dyn Scheduler>,
}

impl Host {
    pub fn new(dom: Rc<dyn Dom>, scheduler: Rc<dyn Scheduler>) -> Self {
        Self { dom, scheduler }
    }

    pub fn dom(&self) -> &dyn Dom {
        &*self.dom
    }

    pub fn scheduler(&self) -> &dyn Scheduler {
        &*self.scheduler
    }

    pub fn reconciler(&self) -> Reconciler<'_, dyn Dom> {
        Reconciler::new(&*self.dom, &*self.scheduler)
    }
}

impl fmt::Debug for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Host").finish_non_exhaustive()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// App (unmounted)
// ─────────────────────────────────────────────────────────────────────────────

/// An application that has not been mounted yet
pub struct App<S, E> {
    initial: S,
    render: RenderFn<S, E>,
    update: UpdateFn<S, E>,
    observers: Vec<Observer>,
}

impl<S: 'static, E: 'static> App<S, E> {
    /// Wrap the initial state, a render function and an update function.
    ///
    /// `update` must handle every event value; it is never given a chance to
    /// decline one.
    pub fn new(
        initial: S,
        render: impl Fn(&Trigger<E>, &S) -> Result<Element> + 'static,
        update: impl Fn(E, &S) -> S + 'static,
    ) -> Self {
        Self {
            initial,
            render: Box::new(render),
            update: Box::new(update),
            observers: Vec::new(),
        }
    }

    /// Register an observer before mounting so it also sees `Mounted`.
    pub fn subscribe(mut self, observer: impl Fn(&RuntimeEvent) + 'static) -> Self {
        self.observers.push(Rc::new(observer));
        self
    }

    /// Render the initial state into `container`.
    pub fn mount(self, host: Host, container: NodeId) -> Result<MountedApp<S, E>> {
        let App {
            initial,
            render,
            update,
            observers,
        } = self;

        let runtime = Rc::new_cyclic(|weak: &Weak<Runtime<S, E>>| {
            let dispatch: Weak<dyn Dispatch<E>> = weak.clone();
            Runtime {
                host,
                container,
                render,
                update,
                trigger: Trigger { runtime: dispatch },
                current: RefCell::new(Current {
                    state: initial,
                    root: None,
                    generation: 0,
                    halted: false,
                }),
                observers: RefCell::new(observers),
            }
        });

        let root = runtime.mount()?;
        info!("Mounted application in {} (root {:?})", container, root);
        runtime.notify(&RuntimeEvent::Mounted { container, root });

        Ok(MountedApp { runtime })
    }
}

impl<S, E> fmt::Debug for App<S, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("App")
            .field("observers", &self.observers.len())
            .finish_non_exhaustive()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Runtime (mounted)
// ─────────────────────────────────────────────────────────────────────────────

/// Everything `trigger` mutates
struct Current<S> {
    state: S,
    root: Option<Instance>,
    generation: u64,
    halted: bool,
}

struct Runtime<S, E> {
    host: Host,
    container: NodeId,
    render: RenderFn<S, E>,
    update: UpdateFn<S, E>,
    trigger: Trigger<E>,
    current: RefCell<Current<S>>,
    observers: RefCell<Vec<Observer>>,
}

/// Type-erased entry point a [`Trigger`] calls back into
trait Dispatch<E> {
    fn dispatch(&self, event: E) -> Result<()>;
}

impl<S, E> Runtime<S, E> {
    fn mount(&self) -> Result<Option<NodeId>> {
        let mut current = self
            .current
            .try_borrow_mut()
            .map_err(|_| Error::ReentrantTrigger)?;
        let elem = (self.render)(&self.trigger, &current.state)?;
        current.root = self
            .host
            .reconciler()
            .reconcile(self.container, Some(&elem), None)?;
        Ok(current.root.as_ref().map(Instance::dom_node))
    }

    fn notify(&self, event: &RuntimeEvent) {
        // snapshot so observers may subscribe or send while being notified
        let observers = self.observers.borrow().clone();
        trace!("Notifying {} observers of {}", observers.len(), event.event_type());
        for observer in observers {
            observer(event);
        }
    }
}

impl<S, E> Dispatch<E> for Runtime<S, E> {
    fn dispatch(&self, event: E) -> Result<()> {
        let (generation, root) = {
            let mut current = self
                .current
                .try_borrow_mut()
                .map_err(|_| Error::ReentrantTrigger)?;
            if current.halted {
                return Err(Error::RuntimeHalted);
            }

            let next = (self.update)(event, &current.state);
            let elem = (self.render)(&self.trigger, &next)?;
            let previous = current.root.take();
            match self
                .host
                .reconciler()
                .reconcile(self.container, Some(&elem), previous)
            {
                Ok(root) => current.root = root,
                Err(e) => {
                    current.halted = true;
                    error!("Reconcile failed in {}, halting: {}", self.container, e);
                    return Err(e);
                }
            }
            current.state = next;
            current.generation += 1;

            (
                current.generation,
                current.root.as_ref().map(Instance::dom_node),
            )
        };

        debug!("Update cycle {} complete (root {:?})", generation, root);
        self.notify(&RuntimeEvent::Updated { generation, root });
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Trigger
// ─────────────────────────────────────────────────────────────────────────────

/// Handle that feeds events into a mounted runtime.
///
/// Holds only a weak reference, so listeners built from it never keep the
/// runtime alive. Once the [`MountedApp`] is dropped, sending is a no-op.
pub struct Trigger<E> {
    runtime: Weak<dyn Dispatch<E>>,
}

impl<E: 'static> Trigger<E> {
    /// Run one full update cycle for `event`.
    pub fn send(&self, event: E) -> Result<()> {
        match self.runtime.upgrade() {
            Some(runtime) => runtime.dispatch(event),
            None => {
                debug!("Trigger fired after the runtime was dropped, ignoring");
                Ok(())
            }
        }
    }

    /// Listener that sends a copy of `event` each time it is called.
    ///
    /// Failures cannot travel back through the presentation layer, so they are
    /// logged.
    pub fn callback(&self, event: E) -> Callback
    where
        E: Clone,
    {
        let trigger = self.clone();
        Callback::new(move |node| match trigger.send(event.clone()) {
            Err(e) if e.is_fatal() => error!("Event from {} failed: {}", node, e),
            Err(e) => warn!("Event from {} failed: {}", node, e),
            Ok(()) => {}
        })
    }
}

impl<E> Clone for Trigger<E> {
    fn clone(&self) -> Self {
        Self {
            runtime: self.runtime.clone(),
        }
    }
}

impl<E> fmt::Debug for Trigger<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Trigger")
            .field("alive", &(self.runtime.strong_count() > 0))
            .finish()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// MountedApp
// ─────────────────────────────────────────────────────────────────────────────

/// Owner of a mounted runtime
pub struct MountedApp<S, E> {
    runtime: Rc<Runtime<S, E>>,
}

impl<S: 'static, E: 'static> MountedApp<S, E> {
    pub fn trigger(&self) -> Trigger<E> {
        self.runtime.trigger.clone()
    }

    /// Shorthand for `self.trigger().send(event)`.
    pub fn send(&self, event: E) -> Result<()> {
        self.runtime.dispatch(event)
    }

    /// Read the current state.
    ///
    /// # Panics
    ///
    /// When called from inside `render` or `update`.
    pub fn with_state<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        f(&self.runtime.current.borrow().state)
    }

    /// Inspect the current root instance.
    ///
    /// # Panics
    ///
    /// When called from inside `render` or `update`.
    pub fn with_root<R>(&self, f: impl FnOnce(Option<&Instance>) -> R) -> R {
        f(self.runtime.current.borrow().root.as_ref())
    }

    /// Presentation node of the root instance, if the render produced one.
    pub fn root_node(&self) -> Option<NodeId> {
        self.with_root(|root| root.map(Instance::dom_node))
    }

    pub fn container(&self) -> NodeId {
        self.runtime.container
    }

    /// Number of completed update cycles.
    pub fn generation(&self) -> u64 {
        self.runtime.current.borrow().generation
    }

    /// Whether a failed reconcile stopped the runtime.
    pub fn is_halted(&self) -> bool {
        self.runtime.current.borrow().halted
    }

    pub fn host(&self) -> &Host {
        &self.runtime.host
    }

    pub fn subscribe(&self, observer: impl Fn(&RuntimeEvent) + 'static) {
        self.runtime.observers.borrow_mut().push(Rc::new(observer));
    }
}

impl<S, E> fmt::Debug for MountedApp<S, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MountedApp")
            .field("container", &self.runtime.container)
            .finish_non_exhaustive()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Entry points
// ─────────────────────────────────────────────────────────────────────────────

/// Mount `app` into `root` when there is one.
///
/// `Ok(None)` means no container was available and nothing was mounted; the
/// caller must not carry on as if the app were running.
pub fn run_with_root<S: 'static, E: 'static>(
    app: App<S, E>,
    host: Host,
    root: Option<NodeId>,
) -> Result<Option<MountedApp<S, E>>> {
    match root {
        Some(container) => app.mount(host, container).map(Some),
        None => {
            warn!("No container to mount into");
            Ok(None)
        }
    }
}

/// Look up the container with identifier `id` and mount `app` into it.
pub fn run_app<S: 'static, E: 'static>(
    app: App<S, E>,
    host: Host,
    id: &str,
) -> Result<MountedApp<S, E>> {
    let root = host.dom().get_element_by_id(id)?;
    run_with_root(app, host, root)?.ok_or_else(|| Error::container_not_found(id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use uirs_core::{children, element, props};
    use uirs_dom::{IdleQueue, MemoryDom};

    #[derive(Debug, Clone, PartialEq)]
    enum Msg {
        Click,
        Reset,
    }

    #[derive(Debug, Clone, Default)]
    struct Counter {
        count: i64,
    }

    fn counter_app() -> App<Counter, Msg> {
        App::new(
            Counter::default(),
            |trigger: &Trigger<Msg>, state: &Counter| {
                element(
                    "button",
                    Some(props! { "onClick" => trigger.callback(Msg::Click) }),
                    children![state.count],
                )
            },
            |msg: Msg, state: &Counter| match msg {
                Msg::Click => Counter {
                    count: state.count + 1,
                },
                Msg::Reset => Counter::default(),
            },
        )
    }

    fn host() -> (Rc<MemoryDom>, Rc<IdleQueue>, Host) {
        let (dom, _) = MemoryDom::with_container(DEFAULT_ROOT_ID).unwrap();
        let dom = Rc::new(dom);
        let queue = Rc::new(IdleQueue::new());
        let host = Host::new(dom.clone(), queue.clone());
        (dom, queue, host)
    }

    #[test]
    fn test_counter_clicks_keep_button_identity() {
        let (dom, _queue, host) = host();
        let app = run_app(counter_app(), host, DEFAULT_ROOT_ID).unwrap();
        let button = app.root_node().unwrap();
        assert_eq!(dom.text_content(button).unwrap(), "0");

        for _ in 0..5 {
            dom.click(button).unwrap();
        }

        assert_eq!(app.root_node(), Some(button));
        assert_eq!(dom.text_content(button).unwrap(), "5");
        assert_eq!(app.with_state(|s| s.count), 5);
        assert_eq!(app.generation(), 5);
        assert_eq!(dom.listener_count(button, "click").unwrap(), 1);
    }

    #[test]
    fn test_send_runs_update_synchronously() {
        let (dom, _queue, host) = host();
        let app = run_app(counter_app(), host, DEFAULT_ROOT_ID).unwrap();

        app.send(Msg::Click).unwrap();
        app.trigger().send(Msg::Click).unwrap();
        assert_eq!(app.with_state(|s| s.count), 2);

        app.send(Msg::Reset).unwrap();
        assert_eq!(dom.inner_html(app.container()).unwrap(), "<button>0</button>");
    }

    #[test]
    fn test_missing_container_is_fatal() {
        let (_dom, _queue, host) = host();
        let err = run_app(counter_app(), host, "nope").unwrap_err();
        assert!(matches!(err, Error::ContainerNotFound { ref id } if id == "nope"));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_run_with_root_reports_absence() {
        let (_dom, _queue, host) = host();
        assert!(run_with_root(counter_app(), host, None).unwrap().is_none());
    }

    #[test]
    fn test_send_from_render_is_rejected() {
        let (_dom, _queue, host) = host();
        let app: App<(), ()> = App::new(
            (),
            |trigger: &Trigger<()>, _: &()| {
                trigger.send(())?;
                Ok(Element::text("unreachable"))
            },
            |_, _| (),
        );

        let err = run_app(app, host, DEFAULT_ROOT_ID).unwrap_err();
        assert!(matches!(err, Error::ReentrantTrigger));
    }

    #[test]
    fn test_render_error_keeps_previous_state() {
        let (dom, _queue, host) = host();
        let app = App::new(
            0u32,
            |_: &Trigger<u32>, n: &u32| {
                if *n > 1 {
                    Err(Error::render("too big"))
                } else {
                    Ok(Element::text(n.to_string()))
                }
            },
            |by: u32, n: &u32| n + by,
        );
        let app = run_app(app, host, DEFAULT_ROOT_ID).unwrap();

        let err = app.send(5).unwrap_err();
        assert!(matches!(err, Error::Render { .. }));
        assert_eq!(app.with_state(|n| *n), 0);
        assert_eq!(app.generation(), 0);

        app.send(1).unwrap();
        assert_eq!(dom.inner_html(app.container()).unwrap(), "1");
    }

    #[test]
    fn test_trigger_outliving_runtime_is_noop() {
        let (dom, _queue, host) = host();
        let app = run_app(counter_app(), host, DEFAULT_ROOT_ID).unwrap();
        let trigger = app.trigger();
        let button = app.root_node().unwrap();
        drop(app);

        assert!(trigger.send(Msg::Click).is_ok());
        // the listener still sits on the node but goes nowhere
        dom.click(button).unwrap();
        assert_eq!(dom.text_content(button).unwrap(), "0");
    }

    #[test]
    fn test_observers_see_mount_and_updates() {
        let (_dom, _queue, host) = host();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let app = counter_app()
            .subscribe(move |event| sink.borrow_mut().push(event.clone()));
        let app = run_app(app, host, DEFAULT_ROOT_ID).unwrap();

        app.send(Msg::Click).unwrap();
        app.send(Msg::Click).unwrap();

        let seen = seen.borrow();
        let root = app.root_node();
        assert_eq!(
            *seen,
            vec![
                RuntimeEvent::Mounted {
                    container: app.container(),
                    root
                },
                RuntimeEvent::Updated {
                    generation: 1,
                    root
                },
                RuntimeEvent::Updated {
                    generation: 2,
                    root
                },
            ]
        );
    }

    #[test]
    fn test_observer_may_read_state() {
        let (_dom, _queue, host) = host();
        let app = Rc::new(run_app(counter_app(), host, DEFAULT_ROOT_ID).unwrap());
        let last = Rc::new(Cell::new(-1));

        let weak = Rc::downgrade(&app);
        let sink = last.clone();
        app.subscribe(move |_| {
            if let Some(app) = weak.upgrade() {
                sink.set(app.with_state(|s| s.count));
            }
        });

        app.send(Msg::Click).unwrap();
        assert_eq!(last.get(), 1);
    }

    #[test]
    fn test_on_insert_runs_after_flush() {
        let (dom, queue, host) = host();
        let inserted = Rc::new(Cell::new(None));
        let sink = inserted.clone();
        let hook = Callback::new(move |node| sink.set(Some(node)));

        let app = App::new(
            (),
            move |_: &Trigger<()>, _: &()| {
                element("canvas", Some(props! { "onInsert" => hook.clone() }), vec![])
            },
            |_, _| (),
        );
        let app = run_app(app, host, DEFAULT_ROOT_ID).unwrap();
        assert_eq!(inserted.get(), None);

        assert_eq!(queue.flush(), 1);
        assert_eq!(inserted.get(), app.root_node());
        assert!(dom.is_attached(app.root_node().unwrap()).unwrap());
    }

    /// In-memory document whose `set_text` fails while `fail_text` is set
    struct BrokenTextDom {
        inner: MemoryDom,
        fail_text: Cell<bool>,
    }

    impl Dom for BrokenTextDom {
        fn create_element(&self, tag_name: &str) -> Result<NodeId> {
            self.inner.create_element(tag_name)
        }
        fn create_text_node(&self, data: &str) -> Result<NodeId> {
            self.inner.create_text_node(data)
        }
        fn create_fragment(&self) -> Result<NodeId> {
            self.inner.create_fragment()
        }
        fn contains(&self, parent: NodeId, node: NodeId) -> Result<bool> {
            self.inner.contains(parent, node)
        }
        fn append_child(&self, parent: NodeId, child: NodeId) -> Result<NodeId> {
            self.inner.append_child(parent, child)
        }
        fn remove_child(&self, parent: NodeId, child: NodeId) -> Result<Option<NodeId>> {
            self.inner.remove_child(parent, child)
        }
        fn replace_child(
            &self,
            parent: NodeId,
            new_child: NodeId,
            old_child: NodeId,
        ) -> Result<Option<NodeId>> {
            self.inner.replace_child(parent, new_child, old_child)
        }
        fn set_attribute(&self, node: NodeId, name: &str, value: &str) -> Result<()> {
            self.inner.set_attribute(node, name, value)
        }
        fn remove_attribute(&self, node: NodeId, name: &str) -> Result<()> {
            self.inner.remove_attribute(node, name)
        }
        fn add_event_listener(&self, node: NodeId, event: &str, listener: Callback) -> Result<()> {
            self.inner.add_event_listener(node, event, listener)
        }
        fn remove_event_listener(
            &self,
            node: NodeId,
            event: &str,
            listener: &Callback,
        ) -> Result<()> {
            self.inner.remove_event_listener(node, event, listener)
        }
        fn set_text(&self, node: NodeId, data: &str) -> Result<()> {
            if self.fail_text.get() {
                return Err(Error::invalid_node_kind(node, "text"));
            }
            self.inner.set_text(node, data)
        }
        fn get_element_by_id(&self, id: &str) -> Result<Option<NodeId>> {
            self.inner.get_element_by_id(id)
        }
    }

    #[test]
    fn test_failed_reconcile_halts_without_duplicating_tree() {
        let (inner, container) = MemoryDom::with_container(DEFAULT_ROOT_ID).unwrap();
        let dom = Rc::new(BrokenTextDom {
            inner,
            fail_text: Cell::new(false),
        });
        let host = Host::new(dom.clone(), Rc::new(IdleQueue::new()));
        let app = run_app(counter_app(), host, DEFAULT_ROOT_ID).unwrap();
        app.send(Msg::Click).unwrap();

        dom.fail_text.set(true);
        let err = app.send(Msg::Click).unwrap_err();
        assert!(matches!(err, Error::InvalidNodeKind { .. }));
        assert!(app.is_halted());

        dom.fail_text.set(false);
        let err = app.send(Msg::Click).unwrap_err();
        assert!(matches!(err, Error::RuntimeHalted));

        // one root under the container, state frozen at the last good cycle
        assert_eq!(dom.inner.children(container).unwrap().len(), 1);
        assert_eq!(app.with_state(|s| s.count), 1);
        assert_eq!(app.generation(), 1);
    }
}
