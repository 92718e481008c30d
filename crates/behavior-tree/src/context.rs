//! Per-hook access to the running tree.

use crate::tree::Control;
use crate::{BehaviorTree, Status, TaskId, TreeError};

/// Handle given to every [`Task`](crate::Task) hook.
///
/// Through it a task reads and writes the blackboard, runs its children and
/// reports its own status. Reports made here are delivered to the task's
/// controller once the current hook returns.
pub struct TaskContext<'a, E> {
    pub(crate) tree: &'a mut BehaviorTree<E>,
    id: TaskId,
    dt: f32,
}

impl<'a, E: 'static> TaskContext<'a, E> {
    pub(crate) fn new(tree: &'a mut BehaviorTree<E>, id: TaskId, dt: f32) -> Self {
        Self { tree, id, dt }
    }

    /// The task this context belongs to.
    #[inline]
    pub fn id(&self) -> TaskId {
        self.id
    }

    /// Seconds elapsed since the previous step, as passed to
    /// [`BehaviorTree::step`].
    #[inline]
    pub fn delta(&self) -> f32 {
        self.dt
    }

    pub fn blackboard(&self) -> &E {
        self.tree.blackboard()
    }

    pub fn blackboard_mut(&mut self) -> &mut E {
        self.tree.blackboard_mut()
    }

    /// Current status of this task.
    pub fn status(&self) -> Status {
        self.tree.status_of(self.id)
    }

    pub fn child_count(&self) -> usize {
        self.tree.child_count_of(self.id)
    }

    /// Status of the child at `index`.
    pub fn child_status(&self, index: usize) -> Option<Status> {
        self.tree
            .child_of(self.id, index)
            .map(|child| self.tree.status_of(child))
    }

    /// Runs the child at `index`: continues it if it is running, otherwise
    /// checks its guard and starts it. The child's report arrives through one
    /// of the `child_*` hooks after the current hook returns.
    ///
    /// An out-of-range index aborts the step with
    /// [`TreeError::ChildOutOfRange`].
    pub fn run_child(&mut self, index: usize) {
        match self.tree.child_of(self.id, index) {
            Some(child) => self.tree.drive(child, Control::Task(self.id), self.dt),
            None => {
                let name = self.tree.name_of(self.id).to_owned();
                self.tree.raise(TreeError::ChildOutOfRange {
                    task: self.id,
                    name,
                    index,
                });
            }
        }
    }

    /// Reports success.
    pub fn success(&mut self) {
        self.tree.transition(self.id, Status::Succeeded, self.dt);
    }

    /// Reports failure.
    pub fn fail(&mut self) {
        self.tree.transition(self.id, Status::Failed, self.dt);
    }

    /// Reports that this task needs more steps.
    pub fn running(&mut self) {
        self.tree.transition(self.id, Status::Running, self.dt);
    }
}
