//! Builder utilities for ergonomic behavior tree construction.
//!
//! This module provides helper functions to reduce boilerplate when building
//! trees in code. Instead of writing
//! `TaskNode::new(Sequence::new()).with_child(...)?.with_child(...)?`, you can
//! use shorter functions like `sequence(vec![...])`. Each helper produces a
//! node whose child count already matches the task's arity, so none of them
//! can fail.

use crate::{
    Action, AlwaysFail, AlwaysSucceed, Condition, Failure, Invert, Repeat, RepeatCount, Selector,
    Sequence, Status, Success, TaskNode, UntilFail, UntilSuccess, Wait,
};

/// Creates a sequence node.
#[inline]
pub fn sequence<E: 'static>(children: Vec<TaskNode<E>>) -> TaskNode<E> {
    TaskNode::with_children_unchecked(Sequence::new(), children)
}

/// Creates a selector node.
#[inline]
pub fn selector<E: 'static>(children: Vec<TaskNode<E>>) -> TaskNode<E> {
    TaskNode::with_children_unchecked(Selector::new(), children)
}

/// Creates an invert node.
#[inline]
pub fn invert<E: 'static>(child: TaskNode<E>) -> TaskNode<E> {
    TaskNode::with_children_unchecked(Invert, vec![child])
}

/// Creates an always-succeed node.
#[inline]
pub fn always_succeed<E: 'static>(child: TaskNode<E>) -> TaskNode<E> {
    TaskNode::with_children_unchecked(AlwaysSucceed, vec![child])
}

#[inline]
pub fn always_fail<E: 'static>(child: TaskNode<E>) -> TaskNode<E> {
    TaskNode::with_children_unchecked(AlwaysFail, vec![child])
}

#[inline]
pub fn until_success<E: 'static>(child: TaskNode<E>) -> TaskNode<E> {
    TaskNode::with_children_unchecked(UntilSuccess, vec![child])
}

#[inline]
pub fn until_fail<E: 'static>(child: TaskNode<E>) -> TaskNode<E> {
    TaskNode::with_children_unchecked(UntilFail, vec![child])
}

/// Creates a repeat node.
///
/// Shorthand for a [`Repeat`] over `count` wrapping `child`.
#[inline]
pub fn repeat<E: 'static>(count: RepeatCount, child: TaskNode<E>) -> TaskNode<E> {
    TaskNode::with_children_unchecked(Repeat::new(count), vec![child])
}

#[inline]
pub fn success<E: 'static>() -> TaskNode<E> {
    TaskNode::new(Success)
}

#[inline]
pub fn failure<E: 'static>() -> TaskNode<E> {
    TaskNode::new(Failure)
}

#[inline]
pub fn wait<E: 'static>(seconds: f32) -> TaskNode<E> {
    TaskNode::new(Wait::new(seconds))
}

/// Creates a condition leaf from a predicate over the blackboard.
#[inline]
pub fn condition<E, F>(name: &str, predicate: F) -> TaskNode<E>
where
    E: 'static,
    F: Fn(&E) -> bool + Clone + Send + 'static,
{
    TaskNode::new(Condition::new(name, predicate))
}

/// Creates an action leaf from a closure over the blackboard and `dt`.
#[inline]
pub fn action<E, F>(name: &str, action: F) -> TaskNode<E>
where
    E: 'static,
    F: FnMut(&mut E, f32) -> Status + Clone + Send + 'static,
{
    TaskNode::new(Action::new(name, action))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BehaviorTree;

    #[test]
    fn helpers_build_runnable_trees() {
        let root = selector(vec![
            sequence(vec![
                condition("has-target", |target: &Option<u32>| target.is_some()),
                success(),
            ]),
            invert(failure()),
        ]);
        assert_eq!(root.task_count(), 6);

        let mut tree = BehaviorTree::with_root(root, None);
        assert_eq!(tree.step(0.0), Ok(Status::Succeeded));
    }

    #[test]
    fn repeat_helper_wraps_the_child() {
        let root: TaskNode<()> = repeat(RepeatCount::Fixed(2), always_fail(success()));
        assert_eq!(root.to_string(), "repeat\n  always-fail\n    success\n");
    }
}
