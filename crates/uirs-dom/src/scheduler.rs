//! Deferred task scheduling
//!
//! Insertion callbacks must not run during the synchronous reconcile pass that
//! created their node. The reconciler posts them to a [`Scheduler`]; when they
//! actually run is up to the host. [`IdleQueue`] is the host-driven
//! implementation: tasks run only when [`IdleQueue::flush`] is called.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use tracing::trace;

/// A unit of deferred work
pub type Task = Box<dyn FnOnce()>;

/// Post work to run later, never before the current synchronous phase completes.
///
/// Posted tasks cannot be retracted.
pub trait Scheduler {
    fn post(&self, task: Task);
}

impl<S: Scheduler + ?Sized> Scheduler for Rc<S> {
    fn post(&self, task: Task) {
        (**self).post(task)
    }
}

/// FIFO queue of tasks run on demand
#[derive(Default)]
pub struct IdleQueue {
    tasks: RefCell<VecDeque<Task>>,
}

impl IdleQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tasks waiting to run.
    pub fn pending(&self) -> usize {
        self.tasks.borrow().len()
    }

    /// Run queued tasks in posting order until the queue is empty, including
    /// tasks posted by tasks run during this flush. Returns how many ran.
    pub fn flush(&self) -> usize {
        let mut ran = 0;
        loop {
            // the borrow must end before the task runs; tasks may post more work
            let next = self.tasks.borrow_mut().pop_front();
            match next {
                Some(task) => {
                    task();
                    ran += 1;
                }
                None => break,
            }
        }
        trace!("Idle queue flushed {} task(s)", ran);
        ran
    }
}

impl Scheduler for IdleQueue {
    fn post(&self, task: Task) {
        self.tasks.borrow_mut().push_back(task);
    }
}

impl std::fmt::Debug for IdleQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdleQueue")
            .field("pending", &self.pending())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_tasks_do_not_run_until_flushed() {
        let queue = IdleQueue::new();
        let ran = Rc::new(Cell::new(false));
        let flag = ran.clone();
        queue.post(Box::new(move || flag.set(true)));

        assert!(!ran.get());
        assert_eq!(queue.pending(), 1);

        assert_eq!(queue.flush(), 1);
        assert!(ran.get());
        assert_eq!(queue.pending(), 0);
    }

    #[test]
    fn test_flush_runs_in_fifo_order() {
        let queue = IdleQueue::new();
        let order = Rc::new(RefCell::new(Vec::new()));
        for i in 0..3 {
            let order = order.clone();
            queue.post(Box::new(move || order.borrow_mut().push(i)));
        }
        queue.flush();
        assert_eq!(*order.borrow(), vec![0, 1, 2]);
    }

    #[test]
    fn test_tasks_posted_during_flush_also_run() {
        let queue = Rc::new(IdleQueue::new());
        let count = Rc::new(Cell::new(0));

        let inner_queue = queue.clone();
        let inner_count = count.clone();
        queue.post(Box::new(move || {
            inner_count.set(inner_count.get() + 1);
            let c = inner_count.clone();
            inner_queue.post(Box::new(move || c.set(c.get() + 1)));
        }));

        assert_eq!(queue.flush(), 2);
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn test_rc_scheduler_forwards() {
        let queue = Rc::new(IdleQueue::new());
        let scheduler: &dyn Scheduler = &queue;
        scheduler.post(Box::new(|| {}));
        assert_eq!(queue.pending(), 1);
    }
}
