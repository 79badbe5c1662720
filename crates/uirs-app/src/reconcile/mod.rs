//! Reconciler - keeps the instance tree and presentation tree in step with
//! freshly rendered elements
//!
//! For one tree position, given the old instance and the new element:
//!
//! | old     | new     | outcome                                             |
//! |---------|---------|-----------------------------------------------------|
//! | none    | some    | add: create an instance, append its node            |
//! | some    | none    | remove: detach the node, no instance remains        |
//! | some    | some    | replace when variant or root tag differs            |
//! | some    | some    | otherwise patch in place, keeping the node handle   |
//! | none    | none    | nothing                                             |
//!
//! Children are matched strictly by index. Inserting or removing in the middle of
//! a list shifts every later sibling onto a different old instance, which may
//! then be patched or replaced; nodes are never moved.

pub(crate) mod props;


use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, warn};
use uirs_core::prelude::*;
use uirs_core::{Element, NodeId};
use uirs_dom::{Dom, Scheduler};

use crate::instance::{FragmentInstance, Instance, RootInstance, SharedProps, TextInstance};

pub use props::ON_INSERT;

/// Diffing and patching over a presentation adapter
pub struct Reconciler<'a, D: Dom + ?Sized> {
    dom: &'a D,
    scheduler: &'a dyn Scheduler,
}

impl<'a, D: Dom + ?Sized> Reconciler<'a, D> {
    pub fn new(dom: &'a D, scheduler: &'a dyn Scheduler) -> Self {
        Self { dom, scheduler }
    }

    /// Build the instance and presentation subtree for `elem`.
    ///
    /// The returned node is detached; the caller decides where it goes. A root
    /// whose props carry a callable `onInsert` gets a deferred task that calls the
    /// hook with the node, provided the hook is still present on the instance's
    /// props when the task runs.
    pub fn create_instance(&self, elem: &Element) -> Result<Instance> {
        match elem {
            Element::Text(text) => {
                let dom_node = self.dom.create_text_node(&text.value)?;
                Ok(Instance::Text(TextInstance {
                    value: text.value.clone(),
                    dom_node,
                }))
            }
            Element::Root(root) => {
                let dom_node = self.dom.create_element(root.tag_name())?;
                props::apply_props(self.dom, dom_node, root.props())?;
                let child_insts = self.create_children(dom_node, root.children())?;

                let shared = Rc::new(RefCell::new(root.props().cloned()));
                if props::insert_hook(root.props()).is_some() {
                    self.schedule_insert_hook(dom_node, shared.clone());
                }

                Ok(Instance::Root(RootInstance {
                    tag_name: root.tag_name().to_string(),
                    props: shared,
                    dom_node,
                    child_insts,
                }))
            }
            Element::Fragment(fragment) => {
                let dom_node = self.dom.create_fragment()?;
                let child_insts = self.create_children(dom_node, fragment.children())?;
                Ok(Instance::Fragment(FragmentInstance {
                    dom_node,
                    child_insts,
                }))
            }
        }
    }

    fn create_children(&self, parent: NodeId, children: &[Element]) -> Result<Vec<Instance>> {
        let mut insts = Vec::with_capacity(children.len());
        for child in children {
            let inst = self.create_instance(child)?;
            self.dom.append_child(parent, inst.dom_node())?;
            insts.push(inst);
        }
        Ok(insts)
    }

    fn schedule_insert_hook(&self, node: NodeId, shared: SharedProps) {
        self.scheduler.post(Box::new(move || {
            // read at fire time; an update may have removed the hook since
            let hook = props::insert_hook(shared.borrow().as_ref());
            match hook {
                Some(hook) => hook.call(node),
                None => debug!("onInsert for {} no longer present, skipping", node),
            }
        }));
    }

    /// Reconcile one tree position inside `container`.
    ///
    /// Returns the instance now occupying the position, or `None` when it is
    /// empty. In-place updates return the very instance that was passed in.
    pub fn reconcile(
        &self,
        container: NodeId,
        elem: Option<&Element>,
        inst: Option<Instance>,
    ) -> Result<Option<Instance>> {
        match (inst, elem) {
            (None, Some(elem)) => self.add(container, elem).map(Some),
            (Some(inst), None) => self.remove(container, inst),
            (Some(inst), Some(elem)) if !inst.matches(elem) => self.replace(container, elem, inst),
            (Some(inst), Some(elem)) => self.update(elem, inst).map(Some),
            (None, None) => Ok(None),
        }
    }

    fn add(&self, container: NodeId, elem: &Element) -> Result<Instance> {
        let inst = self.create_instance(elem)?;
        self.dom.append_child(container, inst.dom_node())?;
        debug!("Added {} {} to {}", elem.kind(), inst.dom_node(), container);
        Ok(inst)
    }

    /// Whether `node` is still inside `container`. Nodes moved or detached
    /// outside the reconciler are left alone.
    fn still_mounted(&self, container: NodeId, node: NodeId, op: &str) -> Result<bool> {
        let mounted = self.dom.contains(container, node)?;
        if !mounted {
            warn!("{} of {} skipped: not inside {}", op, node, container);
        }
        Ok(mounted)
    }

    fn remove(&self, container: NodeId, inst: Instance) -> Result<Option<Instance>> {
        if !self.still_mounted(container, inst.dom_node(), "Remove")? {
            return Ok(None);
        }
        match self.dom.remove_child(container, inst.dom_node())? {
            Some(node) => debug!("Removed {} from {}", node, container),
            None => warn!(
                "Remove of {} skipped: not a child of {}",
                inst.dom_node(),
                container
            ),
        }
        Ok(None)
    }

    fn replace(
        &self,
        container: NodeId,
        elem: &Element,
        inst: Instance,
    ) -> Result<Option<Instance>> {
        if !self.still_mounted(container, inst.dom_node(), "Replace")? {
            return Ok(None);
        }
        let new_inst = self.create_instance(elem)?;
        match self
            .dom
            .replace_child(container, new_inst.dom_node(), inst.dom_node())?
        {
            Some(old) => {
                debug!(
                    "Replaced {} {} with {} {} in {}",
                    inst.kind(),
                    old,
                    elem.kind(),
                    new_inst.dom_node(),
                    container
                );
                Ok(Some(new_inst))
            }
            None => {
                warn!(
                    "Replace of {} skipped: not a child of {}",
                    inst.dom_node(),
                    container
                );
                Ok(None)
            }
        }
    }

    fn update(&self, elem: &Element, inst: Instance) -> Result<Instance> {
        match (inst, elem) {
            (Instance::Text(mut text), Element::Text(new)) => {
                if text.value != new.value {
                    self.dom.set_text(text.dom_node, &new.value)?;
                    text.value = new.value.clone();
                }
                Ok(Instance::Text(text))
            }
            (Instance::Root(mut root), Element::Root(new)) => {
                let old_props = root.props.replace(new.props().cloned());
                props::update_props(self.dom, root.dom_node, old_props.as_ref(), new.props())?;
                let old_children = std::mem::take(&mut root.child_insts);
                root.child_insts =
                    self.reconcile_children(root.dom_node, old_children, new.children())?;
                Ok(Instance::Root(root))
            }
            (Instance::Fragment(mut fragment), Element::Fragment(new)) => {
                let old_children = std::mem::take(&mut fragment.child_insts);
                fragment.child_insts =
                    self.reconcile_children(fragment.dom_node, old_children, new.children())?;
                Ok(Instance::Fragment(fragment))
            }
            (inst, elem) => {
                // reconcile() only routes matching pairs here
                unreachable!("update of {} instance with {} element", inst.kind(), elem.kind())
            }
        }
    }

    /// Pair old children with new elements by index. Positions that end up empty
    /// are dropped from the result.
    fn reconcile_children(
        &self,
        parent: NodeId,
        old: Vec<Instance>,
        new: &[Element],
    ) -> Result<Vec<Instance>> {
        let max_len = old.len().max(new.len());
        let mut old = old.into_iter();
        let mut child_insts = Vec::with_capacity(new.len());
        for i in 0..max_len {
            if let Some(inst) = self.reconcile(parent, new.get(i), old.next())? {
                child_insts.push(inst);
            }
        }
        Ok(child_insts)
    }
}
