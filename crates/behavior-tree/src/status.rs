//! Status carried by every task in a tree.

/// The lifecycle state of a task.
///
/// # Lifecycle
///
/// A task starts out `Fresh`. Once the tree enters it, it only moves between
/// `Running`, `Succeeded` and `Failed` until it is reset:
/// - Conditions usually complete immediately (e.g., "Is enemy visible?")
/// - Actions may take several steps (e.g., "Walk to the door")
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum Status {
    /// The task has never been started, or has been reset.
    #[default]
    Fresh,

    /// The task needs more steps to reach a result.
    Running,

    /// The task completed successfully.
    ///
    /// For conditions: the condition was met.
    /// For actions: the action finished without errors.
    Succeeded,

    /// The task failed.
    ///
    /// For conditions: the condition was not met.
    /// For actions: the action could not be carried out.
    Failed,
}

impl Status {
    /// Returns `true` if this status is `Fresh`.
    #[inline]
    pub fn is_fresh(self) -> bool {
        matches!(self, Status::Fresh)
    }

    /// Returns `true` if this status is `Running`.
    #[inline]
    pub fn is_running(self) -> bool {
        matches!(self, Status::Running)
    }

    /// Returns `true` if this status is `Succeeded`.
    #[inline]
    pub fn is_success(self) -> bool {
        matches!(self, Status::Succeeded)
    }

    /// Returns `true` if this status is `Failed`.
    #[inline]
    pub fn is_failure(self) -> bool {
        matches!(self, Status::Failed)
    }

    /// Returns `true` for `Succeeded` and `Failed`.
    #[inline]
    pub fn is_terminal(self) -> bool {
        matches!(self, Status::Succeeded | Status::Failed)
    }
}
