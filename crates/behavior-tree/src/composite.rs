//! Composite tasks.
//!
//! Composite tasks control the execution flow of multiple children. This
//! module provides the two fundamental building blocks: [`Sequence`] (AND
//! logic) and [`Selector`] (OR logic). Both try children strictly left to
//! right and never reorder them.

use crate::{Arity, Task, TaskContext};

/// Runs children in order until one fails.
///
/// # Semantics
///
/// - If a child fails, the sequence **fails immediately**; later children are
///   not started
/// - If a child succeeds, the sequence **continues** with the next child in
///   the same step
/// - If all children succeed (or there are none), the sequence succeeds
///
/// This is analogous to a short-circuited logical AND (&&) operation.
#[derive(Clone, Copy, Debug, Default)]
pub struct Sequence {
    current: usize,
}

impl Sequence {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<E: 'static> Task<E> for Sequence {
    fn name(&self) -> &str {
        "sequence"
    }

    fn arity(&self) -> Arity {
        Arity::Many
    }

    fn start(&mut self, _cx: &mut TaskContext<'_, E>) {
        self.current = 0;
    }

    fn on_update(&mut self, cx: &mut TaskContext<'_, E>) {
        if self.current < cx.child_count() {
            cx.run_child(self.current);
        } else {
            cx.success();
        }
    }

    fn child_success(&mut self, cx: &mut TaskContext<'_, E>, _child: usize) {
        self.current += 1;
        if self.current < cx.child_count() {
            cx.run_child(self.current);
        } else {
            cx.success();
        }
    }

    fn child_fail(&mut self, cx: &mut TaskContext<'_, E>, _child: usize) {
        cx.fail();
    }

    fn reset(&mut self) {
        self.current = 0;
    }
}

/// Runs children in order until one succeeds.
///
/// # Semantics
///
/// - If a child succeeds, the selector **succeeds immediately**
/// - If a child fails, the selector **continues** with the next child in the
///   same step
/// - If all children fail (or there are none), the selector fails
///
/// This is analogous to a short-circuited logical OR (||) operation.
#[derive(Clone, Copy, Debug, Default)]
pub struct Selector {
    current: usize,
}

impl Selector {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<E: 'static> Task<E> for Selector {
    fn name(&self) -> &str {
        "selector"
    }

    fn arity(&self) -> Arity {
        Arity::Many
    }

    fn start(&mut self, _cx: &mut TaskContext<'_, E>) {
        self.current = 0;
    }

    fn on_update(&mut self, cx: &mut TaskContext<'_, E>) {
        if self.current < cx.child_count() {
            cx.run_child(self.current);
        } else {
            cx.fail();
        }
    }

    fn child_success(&mut self, cx: &mut TaskContext<'_, E>, _child: usize) {
        cx.success();
    }

    fn child_fail(&mut self, cx: &mut TaskContext<'_, E>, _child: usize) {
        self.current += 1;
        if self.current < cx.child_count() {
            cx.run_child(self.current);
        } else {
            cx.fail();
        }
    }

    fn reset(&mut self) {
        self.current = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BehaviorTree, Status, TaskNode};

    struct TestContext {
        value: i32,
    }

    #[derive(Clone)]
    struct Increment;
    impl Task<TestContext> for Increment {
        fn name(&self) -> &str {
            "increment"
        }

        fn on_update(&mut self, cx: &mut TaskContext<'_, TestContext>) {
            cx.blackboard_mut().value += 1;
            cx.success();
        }
    }

    #[derive(Clone)]
    struct Decrement;
    impl Task<TestContext> for Decrement {
        fn name(&self) -> &str {
            "decrement"
        }

        fn on_update(&mut self, cx: &mut TaskContext<'_, TestContext>) {
            cx.blackboard_mut().value -= 1;
            cx.success();
        }
    }

    #[derive(Clone)]
    struct FailAlways;
    impl Task<TestContext> for FailAlways {
        fn name(&self) -> &str {
            "fail-always"
        }

        fn on_update(&mut self, cx: &mut TaskContext<'_, TestContext>) {
            cx.fail();
        }
    }

    /// Runs for one step, then succeeds.
    #[derive(Clone)]
    struct Slow;
    impl Task<TestContext> for Slow {
        fn name(&self) -> &str {
            "slow"
        }

        fn on_update(&mut self, cx: &mut TaskContext<'_, TestContext>) {
            if cx.status().is_running() {
                cx.success();
            } else {
                cx.running();
            }
        }
    }

    fn run(
        composite: impl Task<TestContext> + 'static,
        children: Vec<TaskNode<TestContext>>,
    ) -> (Status, i32) {
        let root = TaskNode::with_children_unchecked(composite, children);
        let mut tree = BehaviorTree::with_root(root, TestContext { value: 0 });
        let status = tree.step(1.0).unwrap();
        (status, tree.blackboard().value)
    }

    #[test]
    fn sequence_all_success() {
        let children = vec![TaskNode::new(Increment), TaskNode::new(Increment)];
        assert_eq!(run(Sequence::new(), children), (Status::Succeeded, 2));
    }

    #[test]
    fn sequence_fails_on_first_failure() {
        let children = vec![
            TaskNode::new(Increment),
            TaskNode::new(FailAlways),
            TaskNode::new(Increment), // never started
        ];
        assert_eq!(run(Sequence::new(), children), (Status::Failed, 1));
    }

    #[test]
    fn selector_succeeds_on_first_success() {
        let children = vec![
            TaskNode::new(FailAlways),
            TaskNode::new(Increment),
            TaskNode::new(Decrement), // never started
        ];
        assert_eq!(run(Selector::new(), children), (Status::Succeeded, 1));
    }

    #[test]
    fn selector_fails_when_all_fail() {
        let children = vec![TaskNode::new(FailAlways), TaskNode::new(FailAlways)];
        assert_eq!(run(Selector::new(), children), (Status::Failed, 0));
    }

    #[test]
    fn empty_composites() {
        assert_eq!(run(Sequence::new(), Vec::new()).0, Status::Succeeded);
        assert_eq!(run(Selector::new(), Vec::new()).0, Status::Failed);
    }

    #[test]
    fn sequence_resumes_running_child() {
        let root = TaskNode::with_children_unchecked(
            Sequence::new(),
            vec![
                TaskNode::new(Increment),
                TaskNode::new(Slow),
                TaskNode::new(Increment),
            ],
        );
        let mut tree = BehaviorTree::with_root(root, TestContext { value: 0 });

        assert_eq!(tree.step(1.0), Ok(Status::Running));
        assert_eq!(tree.blackboard().value, 1);

        // The first child is not run again.
        assert_eq!(tree.step(1.0), Ok(Status::Succeeded));
        assert_eq!(tree.blackboard().value, 2);
    }
}
