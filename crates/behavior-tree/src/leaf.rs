//! Leaf tasks.
//!
//! Leaves have no children. [`Success`], [`Failure`] and [`Wait`] are
//! general purpose; [`Condition`] and [`Action`] adapt closures over the
//! blackboard so game code can plug in behaviors without a new type.

use core::fmt;

use crate::{Status, Task, TaskContext};

/// Succeeds immediately.
#[derive(Clone, Copy, Debug, Default)]
pub struct Success;

impl<E: 'static> Task<E> for Success {
    fn name(&self) -> &str {
        "success"
    }

    fn on_update(&mut self, cx: &mut TaskContext<'_, E>) {
        cx.success();
    }
}

/// Fails immediately.
#[derive(Clone, Copy, Debug, Default)]
pub struct Failure;

impl<E: 'static> Task<E> for Failure {
    fn name(&self) -> &str {
        "failure"
    }

    fn on_update(&mut self, cx: &mut TaskContext<'_, E>) {
        cx.fail();
    }
}

/// Keeps running until the given number of seconds has elapsed.
///
/// Time is accumulated from the `dt` of the steps *after* the one that
/// entered the task, so `Wait::new(0.0)` succeeds on entry.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Wait {
    seconds: f32,
    elapsed: f32,
}

impl Wait {
    pub fn new(seconds: f32) -> Self {
        Self {
            seconds,
            elapsed: 0.0,
        }
    }

    pub fn seconds(&self) -> f32 {
        self.seconds
    }
}

impl<E: 'static> Task<E> for Wait {
    fn name(&self) -> &str {
        "wait"
    }

    fn start(&mut self, _cx: &mut TaskContext<'_, E>) {
        self.elapsed = 0.0;
    }

    fn on_update(&mut self, cx: &mut TaskContext<'_, E>) {
        if cx.status().is_running() {
            self.elapsed += cx.delta();
        }
        if self.elapsed >= self.seconds {
            cx.success();
        } else {
            cx.running();
        }
    }

    fn reset(&mut self) {
        self.elapsed = 0.0;
    }
}

/// Succeeds when the predicate holds for the blackboard, fails otherwise.
#[derive(Clone)]
pub struct Condition<F> {
    name: String,
    predicate: F,
}

impl<F> Condition<F> {
    pub fn new(name: impl Into<String>, predicate: F) -> Self {
        Self {
            name: name.into(),
            predicate,
        }
    }
}

impl<E, F> Task<E> for Condition<F>
where
    E: 'static,
    F: Fn(&E) -> bool + Clone + Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn on_update(&mut self, cx: &mut TaskContext<'_, E>) {
        if (self.predicate)(cx.blackboard()) {
            cx.success();
        } else {
            cx.fail();
        }
    }
}

impl<F> fmt::Debug for Condition<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Condition")
            .field("name", &self.name)
            .finish()
    }
}

/// Runs a closure over the blackboard and the step's `dt` every update.
///
/// The closure's return value becomes the task's report. Returning
/// [`Status::Fresh`] reports nothing, which aborts the step with
/// [`TreeError::NoTransition`](crate::TreeError::NoTransition).
#[derive(Clone)]
pub struct Action<F> {
    name: String,
    action: F,
}

impl<F> Action<F> {
    pub fn new(name: impl Into<String>, action: F) -> Self {
        Self {
            name: name.into(),
            action,
        }
    }
}

impl<E, F> Task<E> for Action<F>
where
    E: 'static,
    F: FnMut(&mut E, f32) -> Status + Clone + Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn on_update(&mut self, cx: &mut TaskContext<'_, E>) {
        let dt = cx.delta();
        match (self.action)(cx.blackboard_mut(), dt) {
            Status::Succeeded => cx.success(),
            Status::Failed => cx.fail(),
            Status::Running => cx.running(),
            Status::Fresh => {}
        }
    }
}

impl<F> fmt::Debug for Action<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Action").field("name", &self.name).finish()
    }
}
