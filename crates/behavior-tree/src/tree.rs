//! The behavior tree driver.
//!
//! [`BehaviorTree`] owns every task of one tree instance in an arena, together
//! with the blackboard shared by those tasks, the listeners observing them and
//! a hidden guard evaluator. Callers step it once per simulation tick.
//!
//! # Status propagation
//!
//! A task reports `success`, `fail` or `running` through its
//! [`TaskContext`]. The report goes to the task's *controller*: its parent,
//! the tree itself for the root, or the guard evaluator for guards. Because
//! the controller is still inside the hook that ran the child, reports are
//! queued in the controller's inbox and delivered through the `child_*` hooks
//! as soon as that hook returns. Delivery order matches the order in which
//! children reported.

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use crate::listener::{Listener, Listeners, StatusUpdate};
use crate::task::fresh_copy;
use crate::{Arity, Status, Task, TaskContext, TaskId, TaskNode, TreeError};

/// Arena slot of the guard evaluator.
pub(crate) const GUARD_EVALUATOR: TaskId = TaskId(0);

/// Who receives a task's status reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Control {
    /// The tree itself (root task).
    Tree,
    /// Another task of the arena.
    Task(TaskId),
}

/// Where a newly inserted task is linked.
#[derive(Clone, Copy, Debug)]
enum Link {
    Root,
    Child(TaskId),
    Guard(TaskId),
}

#[derive(Clone, Copy, Debug)]
struct Report {
    child: usize,
    status: Status,
}

/// One task of the arena plus its wiring.
pub(crate) struct Slot<E> {
    /// `None` only while one of the task's hooks is executing.
    task: Option<Box<dyn Task<E>>>,
    name: String,
    arity: Arity,
    status: Status,
    parent: Option<TaskId>,
    control: Option<Control>,
    guard: Option<TaskId>,
    children: Vec<TaskId>,
    inbox: VecDeque<Report>,
    /// Status reports made during the current update.
    transitions: u32,
}

impl<E: 'static> Slot<E> {
    fn new(task: Box<dyn Task<E>>, parent: Option<TaskId>) -> Self {
        Self {
            name: task.name().to_owned(),
            arity: task.arity(),
            task: Some(task),
            status: Status::Fresh,
            parent,
            control: None,
            guard: None,
            children: Vec::new(),
            inbox: VecDeque::new(),
            transitions: 0,
        }
    }

    fn fresh_copy(&self) -> Self {
        Self {
            task: self.task.as_deref().map(|task| fresh_copy(task)),
            name: self.name.clone(),
            arity: self.arity,
            status: Status::Fresh,
            parent: self.parent,
            control: None,
            guard: self.guard,
            children: self.children.clone(),
            inbox: VecDeque::new(),
            transitions: 0,
        }
    }
}

/// Zero-child task that anchors guard evaluation and absorbs guard reports.
#[derive(Clone, Copy, Debug, Default)]
struct GuardEvaluator;

impl<E: 'static> Task<E> for GuardEvaluator {
    fn name(&self) -> &str {
        "guard-evaluator"
    }

    fn on_update(&mut self, _cx: &mut TaskContext<'_, E>) {}

    fn child_running(&mut self, _cx: &mut TaskContext<'_, E>, _child: usize) {}
}

/// A behavior tree instance: tasks, blackboard and listeners.
///
/// # Example
///
/// ```
/// use behavior_tree::{BehaviorTree, Status, builder};
///
/// let root = builder::sequence(vec![builder::success(), builder::success()]);
/// let mut tree = BehaviorTree::with_root(root, ());
/// assert_eq!(tree.step(0.016), Ok(Status::Succeeded));
/// ```
pub struct BehaviorTree<E> {
    slots: Vec<Slot<E>>,
    root: Option<TaskId>,
    blackboard: E,
    status: Status,
    listeners: Listeners,
    fault: Option<TreeError>,
}

impl<E: 'static> BehaviorTree<E> {
    /// Creates a tree with no root.
    pub fn new(blackboard: E) -> Self {
        Self {
            slots: vec![Slot::new(Box::new(GuardEvaluator), None)],
            root: None,
            blackboard,
            status: Status::Fresh,
            listeners: Listeners::default(),
            fault: None,
        }
    }

    /// Creates a tree and attaches `root`.
    pub fn with_root(root: TaskNode<E>, blackboard: E) -> Self {
        let mut tree = Self::new(blackboard);
        tree.insert(root, Link::Root);
        tree
    }

    // ========================================================================
    // Construction
    // ========================================================================

    /// Attaches the root task.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::RootAlreadySet`] if the tree already has a root.
    pub fn add_child(&mut self, root: TaskNode<E>) -> Result<TaskId, TreeError> {
        if self.root.is_some() {
            return Err(TreeError::RootAlreadySet);
        }
        Ok(self.insert(root, Link::Root))
    }

    /// Appends `child` to the children of an attached task.
    ///
    /// # Errors
    ///
    /// - [`TreeError::UnknownTask`] if `parent` is not a task of this tree
    /// - [`TreeError::ChildLimitExceeded`] if the parent's arity is satisfied
    pub fn attach(&mut self, parent: TaskId, child: TaskNode<E>) -> Result<TaskId, TreeError> {
        let slot = self.slot(parent).ok_or(TreeError::UnknownTask(parent))?;
        if let Some(limit) = slot.arity.max_children()
            && slot.children.len() >= limit
        {
            return Err(TreeError::ChildLimitExceeded {
                name: slot.name.clone(),
                limit,
            });
        }
        Ok(self.insert(child, Link::Child(parent)))
    }

    /// Guards an attached task.
    ///
    /// # Errors
    ///
    /// - [`TreeError::UnknownTask`] if `task` is not a task of this tree
    /// - [`TreeError::GuardAlreadySet`] if the task is already guarded
    pub fn set_guard(&mut self, task: TaskId, guard: TaskNode<E>) -> Result<TaskId, TreeError> {
        let slot = self.slot(task).ok_or(TreeError::UnknownTask(task))?;
        if slot.guard.is_some() {
            return Err(TreeError::GuardAlreadySet {
                name: slot.name.clone(),
            });
        }
        Ok(self.insert(guard, Link::Guard(task)))
    }

    fn insert(&mut self, node: TaskNode<E>, link: Link) -> TaskId {
        let TaskNode {
            task,
            guard,
            children,
        } = node;
        let id = TaskId(self.slots.len());
        let parent = match link {
            Link::Child(parent) => Some(parent),
            Link::Root | Link::Guard(_) => None,
        };
        self.slots.push(Slot::new(task, parent));

        match link {
            Link::Root => {
                self.root = Some(id);
                self.slots[id.0].control = Some(Control::Tree);
                self.listeners.child_added(None, 0);
            }
            Link::Child(parent) => {
                let index = self.slots[parent.0].children.len();
                self.slots[parent.0].children.push(id);
                self.listeners.child_added(Some(parent), index);
            }
            Link::Guard(owner) => self.slots[owner.0].guard = Some(id),
        }

        if let Some(guard) = guard {
            self.insert(*guard, Link::Guard(id));
        }
        for child in children {
            self.insert(child, Link::Child(id));
        }
        id
    }

    // ========================================================================
    // Inspection
    // ========================================================================

    fn slot(&self, id: TaskId) -> Option<&Slot<E>> {
        if id == GUARD_EVALUATOR {
            return None;
        }
        self.slots.get(id.0)
    }

    /// The root task, if set.
    pub fn root(&self) -> Option<TaskId> {
        self.root
    }

    /// Status of the tree after the last step.
    pub fn status(&self) -> Status {
        self.status
    }

    /// Status of one task.
    pub fn task_status(&self, id: TaskId) -> Option<Status> {
        self.slot(id).map(|slot| slot.status)
    }

    /// Name of one task.
    pub fn task_name(&self, id: TaskId) -> Option<&str> {
        self.slot(id).map(|slot| slot.name.as_str())
    }

    /// Children of a task, empty for unknown ids.
    pub fn children(&self, id: TaskId) -> &[TaskId] {
        match self.slot(id) {
            Some(slot) => &slot.children,
            None => &[],
        }
    }

    /// Structural parent of a task. Roots and guards have none.
    pub fn parent(&self, id: TaskId) -> Option<TaskId> {
        self.slot(id).and_then(|slot| slot.parent)
    }

    /// Guard of a task.
    pub fn guard_of(&self, id: TaskId) -> Option<TaskId> {
        self.slot(id).and_then(|slot| slot.guard)
    }

    /// All tasks in insertion order, guards included.
    pub fn tasks(&self) -> impl Iterator<Item = TaskId> + '_ {
        (1..self.slots.len()).map(TaskId)
    }

    /// Number of attached tasks, guards included.
    pub fn task_count(&self) -> usize {
        self.slots.len() - 1
    }

    /// The blackboard shared by all tasks.
    pub fn blackboard(&self) -> &E {
        &self.blackboard
    }

    /// Mutable access to the blackboard.
    pub fn blackboard_mut(&mut self) -> &mut E {
        &mut self.blackboard
    }

    /// Replaces the blackboard, returning the previous one.
    pub fn set_blackboard(&mut self, blackboard: E) -> E {
        std::mem::replace(&mut self.blackboard, blackboard)
    }

    // ========================================================================
    // Listeners
    // ========================================================================

    /// Registers a listener; listeners are notified in registration order.
    pub fn add_listener(&mut self, listener: Arc<dyn Listener>) {
        self.listeners.add(listener);
    }

    /// Removes a listener by identity. Returns `false` if it was not registered.
    pub fn remove_listener(&mut self, listener: &Arc<dyn Listener>) -> bool {
        self.listeners.remove(listener)
    }

    /// Removes every listener.
    pub fn clear_listeners(&mut self) {
        self.listeners.clear();
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    // ========================================================================
    // Execution
    // ========================================================================

    /// Advances the tree by one tick.
    ///
    /// A running root is updated. Otherwise the root is re-anchored to the
    /// tree, its guard is checked and it is started and updated, or failed if
    /// the guard rejects it.
    ///
    /// # Errors
    ///
    /// - [`TreeError::NoRoot`] if no root is attached
    /// - a contract violation raised by a task during the step; the step is
    ///   aborted and the tree should be [`reset`](Self::reset)
    pub fn step(&mut self, dt: f32) -> Result<Status, TreeError> {
        let root = self.root.ok_or(TreeError::NoRoot)?;
        tracing::trace!(%root, dt, "stepping behavior tree");

        self.fault = None;
        self.drive(root, Control::Tree, dt);

        if let Some(fault) = self.fault.take() {
            tracing::warn!(code = fault.error_code(), "behavior tree step aborted: {fault}");
            return Err(fault);
        }
        Ok(self.status)
    }

    /// Resets every task to `Fresh` and re-anchors the root.
    pub fn reset(&mut self) {
        if let Some(root) = self.root {
            self.reset_task(root);
            self.slots[root.0].control = Some(Control::Tree);
        }
        self.status = Status::Fresh;
        self.fault = None;
    }

    /// Creates an independent copy of this tree around another blackboard.
    ///
    /// Tasks are cloned with fresh status and no per-run state; task ids are
    /// preserved. Listeners are not copied.
    pub fn instantiate(&self, blackboard: E) -> Self {
        let mut tree = Self {
            slots: self.slots.iter().map(Slot::fresh_copy).collect(),
            root: self.root,
            blackboard,
            status: Status::Fresh,
            listeners: Listeners::default(),
            fault: None,
        };
        if let Some(root) = tree.root {
            tree.slots[root.0].control = Some(Control::Tree);
        }
        tree
    }

    /// Enters or continues a task on behalf of `control`.
    pub(crate) fn drive(&mut self, id: TaskId, control: Control, dt: f32) {
        if self.fault.is_some() {
            return;
        }
        self.slots[id.0].transitions = 0;

        if self.slots[id.0].status == Status::Running {
            self.update(id, dt);
            return;
        }

        self.slots[id.0].control = Some(control);
        if self.check_guard(id, dt) {
            self.with_task(id, dt, |task, cx| task.start(cx));
            self.update(id, dt);
        } else {
            self.transition(id, Status::Failed, dt);
        }
    }

    fn update(&mut self, id: TaskId, dt: f32) {
        self.with_task(id, dt, |task, cx| task.on_update(cx));
        if self.fault.is_none() && self.slots[id.0].transitions == 0 {
            let name = self.slots[id.0].name.clone();
            self.raise(TreeError::NoTransition { task: id, name });
        }
    }

    /// Evaluates the guard chain of `id`, returning true if it may run.
    fn check_guard(&mut self, id: TaskId, dt: f32) -> bool {
        let Some(guard) = self.slots[id.0].guard else {
            return true;
        };
        if !self.check_guard(guard, dt) {
            return false;
        }

        let slot = &mut self.slots[guard.0];
        slot.control = Some(Control::Task(GUARD_EVALUATOR));
        slot.transitions = 0;
        self.with_task(guard, dt, |task, cx| task.start(cx));
        self.update(guard, dt);
        if self.fault.is_some() {
            return false;
        }

        match self.slots[guard.0].status {
            Status::Succeeded => true,
            Status::Failed => false,
            status => {
                let name = self.slots[guard.0].name.clone();
                self.raise(TreeError::GuardNotTerminal {
                    task: guard,
                    name,
                    status,
                });
                false
            }
        }
    }

    /// Runs one hook of a task, then delivers the reports its children queued.
    fn with_task(
        &mut self,
        id: TaskId,
        dt: f32,
        hook: impl FnOnce(&mut Box<dyn Task<E>>, &mut TaskContext<'_, E>),
    ) {
        if self.fault.is_some() {
            return;
        }
        let Some(mut task) = self.slots[id.0].task.take() else {
            let name = self.slots[id.0].name.clone();
            self.raise(TreeError::Reentered { task: id, name });
            return;
        };

        let mut cx = TaskContext::new(self, id, dt);
        hook(&mut task, &mut cx);
        while let Some(report) = cx.tree.next_report(id) {
            match report.status {
                Status::Succeeded => task.child_success(&mut cx, report.child),
                Status::Failed => task.child_fail(&mut cx, report.child),
                Status::Running => task.child_running(&mut cx, report.child),
                Status::Fresh => {}
            }
        }

        self.slots[id.0].task = Some(task);
    }

    fn next_report(&mut self, id: TaskId) -> Option<Report> {
        let inbox = &mut self.slots[id.0].inbox;
        if self.fault.is_some() {
            inbox.clear();
            return None;
        }
        inbox.pop_front()
    }

    /// Sets a task's status, notifies listeners and reports to its controller.
    pub(crate) fn transition(&mut self, id: TaskId, status: Status, dt: f32) {
        if self.fault.is_some() {
            return;
        }
        let slot = &mut self.slots[id.0];
        slot.transitions += 1;
        if slot.transitions > 1 {
            let name = slot.name.clone();
            self.raise(TreeError::MultipleTransitions { task: id, name });
            return;
        }

        let previous = std::mem::replace(&mut slot.status, status);
        tracing::trace!(task = %id, name = %slot.name, %previous, %status, "task status set");
        let update = StatusUpdate {
            task: id,
            name: &self.slots[id.0].name,
            previous,
            status,
        };
        self.listeners.status_updated(&update);

        self.report(id, status, dt);
    }

    fn report(&mut self, id: TaskId, status: Status, dt: f32) {
        match self.slots[id.0].control {
            None => {}
            Some(Control::Tree) => {
                let previous = std::mem::replace(&mut self.status, status);
                if status.is_terminal() {
                    tracing::debug!(%previous, %status, "behavior tree run finished");
                }
            }
            Some(Control::Task(controller)) => {
                let child = self.slots[controller.0]
                    .children
                    .iter()
                    .position(|&child| child == id)
                    .unwrap_or(0);
                self.slots[controller.0]
                    .inbox
                    .push_back(Report { child, status });
                // Only the guard evaluator is ever idle when it receives a report.
                if self.slots[controller.0].task.is_some() {
                    self.with_task(controller, dt, |_, _| {});
                }
            }
        }
    }

    pub(crate) fn raise(&mut self, error: TreeError) {
        if self.fault.is_none() {
            self.fault = Some(error);
        }
    }

    fn reset_task(&mut self, id: TaskId) {
        let slot = &mut self.slots[id.0];
        slot.status = Status::Fresh;
        slot.control = None;
        slot.inbox.clear();
        slot.transitions = 0;
        if let Some(task) = slot.task.as_mut() {
            task.reset();
        }

        let guard = slot.guard;
        let children = slot.children.clone();
        if let Some(guard) = guard {
            self.reset_task(guard);
        }
        for child in children {
            self.reset_task(child);
        }
    }

    // Accessors for `TaskContext`.

    pub(crate) fn status_of(&self, id: TaskId) -> Status {
        self.slots[id.0].status
    }

    pub(crate) fn child_of(&self, id: TaskId, index: usize) -> Option<TaskId> {
        self.slots[id.0].children.get(index).copied()
    }

    pub(crate) fn child_count_of(&self, id: TaskId) -> usize {
        self.slots[id.0].children.len()
    }

    pub(crate) fn name_of(&self, id: TaskId) -> &str {
        &self.slots[id.0].name
    }
}

impl<E: Clone + 'static> Clone for BehaviorTree<E> {
    fn clone(&self) -> Self {
        self.instantiate(self.blackboard.clone())
    }
}

impl<E: 'static> fmt::Debug for BehaviorTree<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BehaviorTree")
            .field("root", &self.root)
            .field("status", &self.status)
            .field("tasks", &self.task_count())
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}
