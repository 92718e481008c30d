//! Observer channel for tree events.
//!
//! Listeners see every status transition and every structural addition of a
//! tree. They are meant for tooling (debug views, logging) and must not try to
//! drive the tree they observe.

use std::sync::Arc;

use crate::{Status, TaskId};

/// A status transition of one task.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StatusUpdate<'a> {
    /// The task whose status was set.
    pub task: TaskId,
    /// The task's name.
    pub name: &'a str,
    /// Status before the update.
    pub previous: Status,
    /// Status after the update. Equal to `previous` when a running task
    /// reports `running` again.
    pub status: Status,
}

/// Receives task events from a [`BehaviorTree`](crate::BehaviorTree).
pub trait Listener: Send + Sync {
    /// A task's status was set.
    fn status_updated(&self, update: &StatusUpdate<'_>);

    /// A child was added at `index` of `parent`; `parent` is `None` when the
    /// root of the tree was set.
    fn child_added(&self, _parent: Option<TaskId>, _index: usize) {}
}

/// Ordered set of listeners, compared by identity.
#[derive(Clone, Default)]
pub(crate) struct Listeners {
    entries: Vec<Arc<dyn Listener>>,
}

impl Listeners {
    pub(crate) fn add(&mut self, listener: Arc<dyn Listener>) {
        self.entries.push(listener);
    }

    /// Removes the first entry that is the same allocation as `listener`.
    pub(crate) fn remove(&mut self, listener: &Arc<dyn Listener>) -> bool {
        let position = self
            .entries
            .iter()
            .position(|entry| std::ptr::addr_eq(Arc::as_ptr(entry), Arc::as_ptr(listener)));
        match position {
            Some(index) => {
                self.entries.remove(index);
                true
            }
            None => false,
        }
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn status_updated(&self, update: &StatusUpdate<'_>) {
        for listener in &self.entries {
            listener.status_updated(update);
        }
    }

    pub(crate) fn child_added(&self, parent: Option<TaskId>, index: usize) {
        for listener in &self.entries {
            listener.child_added(parent, index);
        }
    }
}

/// Forwards tree events to `tracing` at debug level.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingListener;

impl Listener for TracingListener {
    fn status_updated(&self, update: &StatusUpdate<'_>) {
        tracing::debug!(
            task = %update.task,
            name = update.name,
            previous = %update.previous,
            status = %update.status,
            "task status updated"
        );
    }

    fn child_added(&self, parent: Option<TaskId>, index: usize) {
        match parent {
            Some(parent) => tracing::debug!(%parent, index, "child task added"),
            None => tracing::debug!("root task set"),
        }
    }
}
