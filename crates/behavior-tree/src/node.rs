//! Detached task trees.
//!
//! A [`TaskNode`] owns a task together with its guard and children before the
//! whole structure is attached to a [`BehaviorTree`](crate::BehaviorTree).
//! Parsed trees and subtree libraries are kept as `TaskNode` templates;
//! cloning a template yields fresh tasks with no per-run state.

use core::fmt;

use crate::task::fresh_copy;
use crate::{Arity, Task, TreeError};

/// A task with its guard and children, not yet attached to a tree.
pub struct TaskNode<E> {
    pub(crate) task: Box<dyn Task<E>>,
    pub(crate) guard: Option<Box<TaskNode<E>>>,
    pub(crate) children: Vec<TaskNode<E>>,
}

impl<E: 'static> TaskNode<E> {
    /// Wraps a task with no guard and no children.
    pub fn new(task: impl Task<E> + 'static) -> Self {
        Self::from_boxed(Box::new(task))
    }

    /// Wraps an already boxed task.
    pub fn from_boxed(task: Box<dyn Task<E>>) -> Self {
        Self {
            task,
            guard: None,
            children: Vec::new(),
        }
    }

    /// Builds a node from a task and its children without checking arity.
    pub(crate) fn with_children_unchecked(
        task: impl Task<E> + 'static,
        children: Vec<TaskNode<E>>,
    ) -> Self {
        Self {
            task: Box::new(task),
            guard: None,
            children,
        }
    }

    /// Name of the wrapped task.
    pub fn name(&self) -> &str {
        self.task.name()
    }

    /// Arity of the wrapped task.
    pub fn arity(&self) -> Arity {
        self.task.arity()
    }

    /// Child nodes in order.
    pub fn children(&self) -> &[TaskNode<E>] {
        &self.children
    }

    /// The guard, if any.
    pub fn guard(&self) -> Option<&TaskNode<E>> {
        self.guard.as_deref()
    }

    /// Appends a child and returns its index.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::ChildLimitExceeded`] if the task's arity is already
    /// satisfied; the node is left unchanged.
    pub fn add_child(&mut self, child: TaskNode<E>) -> Result<usize, TreeError> {
        if let Some(limit) = self.arity().max_children()
            && self.children.len() >= limit
        {
            return Err(TreeError::ChildLimitExceeded {
                name: self.name().to_owned(),
                limit,
            });
        }
        self.children.push(child);
        Ok(self.children.len() - 1)
    }

    /// Builder form of [`add_child`](Self::add_child).
    pub fn with_child(mut self, child: TaskNode<E>) -> Result<Self, TreeError> {
        self.add_child(child)?;
        Ok(self)
    }

    /// Guards this task.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::GuardAlreadySet`] if the task is already guarded;
    /// the existing guard is kept.
    pub fn set_guard(&mut self, guard: TaskNode<E>) -> Result<(), TreeError> {
        if self.guard.is_some() {
            return Err(TreeError::GuardAlreadySet {
                name: self.name().to_owned(),
            });
        }
        self.guard = Some(Box::new(guard));
        Ok(())
    }

    /// Builder form of [`set_guard`](Self::set_guard).
    pub fn with_guard(mut self, guard: TaskNode<E>) -> Result<Self, TreeError> {
        self.set_guard(guard)?;
        Ok(self)
    }

    /// Number of tasks in this subtree, guards included.
    pub fn task_count(&self) -> usize {
        let guard = self.guard.as_ref().map_or(0, |guard| guard.task_count());
        let children: usize = self.children.iter().map(TaskNode::task_count).sum();
        1 + guard + children
    }

    fn write_tree(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        write!(f, "{:indent$}", "", indent = depth * 2)?;
        if let Some(guard) = &self.guard {
            write!(f, "?{} ", guard.name())?;
        }
        writeln!(f, "{}", self.name())?;
        for child in &self.children {
            child.write_tree(f, depth + 1)?;
        }
        Ok(())
    }
}

impl<E: 'static> Clone for TaskNode<E> {
    fn clone(&self) -> Self {
        Self {
            task: fresh_copy(self.task.as_ref()),
            guard: self.guard.clone(),
            children: self.children.clone(),
        }
    }
}

impl<E: 'static> fmt::Debug for TaskNode<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskNode")
            .field("name", &self.name())
            .field("guard", &self.guard)
            .field("children", &self.children)
            .finish()
    }
}

/// Renders the subtree one task per line, two spaces per level, guards shown
/// as `?name` in front of the task they guard.
impl<E: 'static> fmt::Display for TaskNode<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_tree(f, 0)
    }
}
