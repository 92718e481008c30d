//! Errors raised while building or stepping a behavior tree.
//!
//! Construction errors leave the tree untouched. Contract violations abort the
//! step that detected them; the tree should be [`reset`] before it is stepped
//! again.
//!
//! [`reset`]: crate::BehaviorTree::reset

use crate::{Status, TaskId};

/// Errors produced by [`BehaviorTree`](crate::BehaviorTree) and
/// [`TaskNode`](crate::TaskNode).
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    /// The tree already has a root; a tree has at most one, permanently.
    #[error("a behavior tree cannot have more than one root task")]
    RootAlreadySet,

    /// `step` was called before any root was attached.
    #[error("behavior tree has no root task")]
    NoRoot,

    /// The id does not name a task of this tree.
    #[error("task {0} does not belong to this tree")]
    UnknownTask(TaskId),

    /// The task's arity does not allow another child.
    #[error("task '{name}' accepts at most {limit} child task(s)")]
    ChildLimitExceeded { name: String, limit: usize },

    /// The task is already guarded.
    #[error("task '{name}' already has a guard")]
    GuardAlreadySet { name: String },

    /// A task asked the tree to run a child it does not have.
    #[error("task '{name}' ({task}) has no child at index {index}")]
    ChildOutOfRange {
        task: TaskId,
        name: String,
        index: usize,
    },

    /// An update finished without the task reporting any status.
    #[error("task '{name}' ({task}) finished its update without reporting a status")]
    NoTransition { task: TaskId, name: String },

    /// A task reported more than one status within a single update.
    #[error("task '{name}' ({task}) reported more than one status in a single update")]
    MultipleTransitions { task: TaskId, name: String },

    /// A guard was still running (or never started) after its evaluation.
    #[error("guard '{name}' ({task}) did not complete during evaluation (status: {status})")]
    GuardNotTerminal {
        task: TaskId,
        name: String,
        status: Status,
    },

    /// A task was asked to execute while one of its own hooks was running.
    #[error("task '{name}' ({task}) was re-entered while already executing")]
    Reentered { task: TaskId, name: String },
}

impl TreeError {
    /// Returns a stable identifier for this error variant.
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::RootAlreadySet => "TREE_ROOT_ALREADY_SET",
            Self::NoRoot => "TREE_NO_ROOT",
            Self::UnknownTask(_) => "TREE_UNKNOWN_TASK",
            Self::ChildLimitExceeded { .. } => "TREE_CHILD_LIMIT_EXCEEDED",
            Self::GuardAlreadySet { .. } => "TREE_GUARD_ALREADY_SET",
            Self::ChildOutOfRange { .. } => "TASK_CHILD_OUT_OF_RANGE",
            Self::NoTransition { .. } => "TASK_NO_TRANSITION",
            Self::MultipleTransitions { .. } => "TASK_MULTIPLE_TRANSITIONS",
            Self::GuardNotTerminal { .. } => "GUARD_NOT_TERMINAL",
            Self::Reentered { .. } => "TASK_REENTERED",
        }
    }

    /// Returns true if the error reports a defect in a task implementation
    /// rather than a bad construction call.
    pub const fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            Self::ChildOutOfRange { .. }
                | Self::NoTransition { .. }
                | Self::MultipleTransitions { .. }
                | Self::GuardNotTerminal { .. }
                | Self::Reentered { .. }
        )
    }
}
