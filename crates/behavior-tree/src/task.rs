//! Core task trait.
//!
//! This module defines the [`Task`] trait, the capability every node of a
//! behavior tree implements. A task never owns its children or talks to its
//! parent directly: the [`BehaviorTree`](crate::BehaviorTree) keeps all tasks
//! in an arena and hands each hook a [`TaskContext`] through which the task
//! runs children and reports its own status.

use core::fmt;

use crate::TaskContext;

/// Handle of a task attached to a [`BehaviorTree`](crate::BehaviorTree).
///
/// Ids are indices into the tree's arena. They stay valid for the lifetime
/// of the tree and are preserved by [`BehaviorTree::instantiate`], so an id
/// taken from a template names the same task in every clone.
///
/// [`BehaviorTree::instantiate`]: crate::BehaviorTree::instantiate
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskId(pub(crate) usize);

impl TaskId {
    /// Returns the arena index of this task.
    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// How many children a task accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Arity {
    /// No children (conditions, actions).
    Leaf,
    /// Exactly one child (decorators).
    Single,
    /// Any number of children (composites).
    Many,
}

impl Arity {
    /// Maximum number of children, or `None` when unbounded.
    pub const fn max_children(self) -> Option<usize> {
        match self {
            Arity::Leaf => Some(0),
            Arity::Single => Some(1),
            Arity::Many => None,
        }
    }

    /// Children required before the task can run.
    pub const fn min_children(self) -> usize {
        match self {
            Arity::Single => 1,
            Arity::Leaf | Arity::Many => 0,
        }
    }
}

/// A behavior tree node, generic over the blackboard type `E`.
///
/// # Contract
///
/// - [`start`](Task::start) is called once each time the task is entered from
///   a non-running state. It resets per-run state and must not report a status.
/// - [`on_update`](Task::on_update) is called on entry (after `start`) and on
///   every later step while the task is `Running`. Before the update completes
///   the task must report exactly one of `success`, `fail` or `running` through
///   the context, either directly or from one of the `child_*` hooks that the
///   tree invokes after `on_update` returns.
/// - The `child_*` hooks receive the index of the reporting child.
/// - [`reset`](Task::reset) clears per-run state; fixed parameters survive.
///
/// Tasks must be `Clone` to be attached (see [`TaskClone`]), which is how one
/// parsed template becomes one independent tree per entity.
pub trait Task<E: 'static>: TaskClone<E> + Send {
    /// Short name used in logs, errors and listener events.
    fn name(&self) -> &str;

    /// How many children this task accepts.
    fn arity(&self) -> Arity {
        Arity::Leaf
    }

    /// Called when the task is entered.
    fn start(&mut self, _cx: &mut TaskContext<'_, E>) {}

    /// Advances the task by one step.
    fn on_update(&mut self, cx: &mut TaskContext<'_, E>);

    /// A child finished successfully.
    fn child_success(&mut self, _cx: &mut TaskContext<'_, E>, _child: usize) {}

    /// A child failed.
    fn child_fail(&mut self, _cx: &mut TaskContext<'_, E>, _child: usize) {}

    /// A child needs more steps; by default the task keeps running as well.
    fn child_running(&mut self, cx: &mut TaskContext<'_, E>, _child: usize) {
        cx.running();
    }

    /// Clears per-run state.
    fn reset(&mut self) {}
}

/// Object-safe cloning for boxed tasks.
///
/// Implemented automatically for every `Task` that is `Clone + 'static`.
pub trait TaskClone<E: 'static> {
    /// Returns a boxed copy of this task.
    fn clone_task(&self) -> Box<dyn Task<E>>;
}

impl<E: 'static, T> TaskClone<E> for T
where
    T: Task<E> + Clone + 'static,
{
    fn clone_task(&self) -> Box<dyn Task<E>> {
        Box::new(self.clone())
    }
}

/// Clones a task and clears its per-run state.
pub(crate) fn fresh_copy<E: 'static>(task: &dyn Task<E>) -> Box<dyn Task<E>> {
    let mut copy = task.clone_task();
    copy.reset();
    copy
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Invert, Success};

    #[test]
    fn arity_limits() {
        assert_eq!(Arity::Leaf.max_children(), Some(0));
        assert_eq!(Arity::Single.max_children(), Some(1));
        assert_eq!(Arity::Many.max_children(), None);
        assert_eq!(Arity::Leaf.min_children(), 0);
        assert_eq!(Arity::Single.min_children(), 1);
        assert_eq!(Arity::Many.min_children(), 0);
    }

    fn copy_name<E: 'static>(task: &dyn Task<E>) -> String {
        fresh_copy(task).name().to_owned()
    }

    #[test]
    fn fresh_copies_work_for_any_blackboard() {
        assert_eq!(copy_name::<()>(&Success), "success");
        assert_eq!(copy_name::<String>(&Invert), "invert");
    }

    #[test]
    fn task_id_display() {
        assert_eq!(TaskId(7).to_string(), "#7");
        assert_eq!(TaskId(7).index(), 7);
    }
}
