//! Decorator tasks.
//!
//! Decorators wrap a single child and convert its result under a policy. This
//! module provides [`Invert`] (NOT logic), [`AlwaysSucceed`] and
//! [`AlwaysFail`] (result suppression), and the looping decorators
//! [`Repeat`], [`UntilSuccess`] and [`UntilFail`].
//!
//! Looping decorators restart their child on the *next* step after it
//! finishes, so a child that completes instantly runs once per step.

use core::fmt;
use core::str::FromStr;

use rand::Rng;

use crate::{Arity, Task, TaskContext};

/// Inverts the result of its child.
///
/// # Semantics
///
/// - If the child succeeds, the decorator fails
/// - If the child fails, the decorator succeeds
///
/// This is analogous to a logical NOT (!) operation.
#[derive(Clone, Copy, Debug, Default)]
pub struct Invert;

impl<E: 'static> Task<E> for Invert {
    fn name(&self) -> &str {
        "invert"
    }

    fn arity(&self) -> Arity {
        Arity::Single
    }

    fn on_update(&mut self, cx: &mut TaskContext<'_, E>) {
        cx.run_child(0);
    }

    fn child_success(&mut self, cx: &mut TaskContext<'_, E>, _child: usize) {
        cx.fail();
    }

    fn child_fail(&mut self, cx: &mut TaskContext<'_, E>, _child: usize) {
        cx.success();
    }
}

/// Succeeds whatever the child's result.
///
/// Useful for optional behaviors that shouldn't cause a sequence to fail.
#[derive(Clone, Copy, Debug, Default)]
pub struct AlwaysSucceed;

impl<E: 'static> Task<E> for AlwaysSucceed {
    fn name(&self) -> &str {
        "always-succeed"
    }

    fn arity(&self) -> Arity {
        Arity::Single
    }

    fn on_update(&mut self, cx: &mut TaskContext<'_, E>) {
        cx.run_child(0);
    }

    fn child_success(&mut self, cx: &mut TaskContext<'_, E>, _child: usize) {
        cx.success();
    }

    fn child_fail(&mut self, cx: &mut TaskContext<'_, E>, _child: usize) {
        cx.success();
    }
}

/// Fails whatever the child's result.
#[derive(Clone, Copy, Debug, Default)]
pub struct AlwaysFail;

impl<E: 'static> Task<E> for AlwaysFail {
    fn name(&self) -> &str {
        "always-fail"
    }

    fn arity(&self) -> Arity {
        Arity::Single
    }

    fn on_update(&mut self, cx: &mut TaskContext<'_, E>) {
        cx.run_child(0);
    }

    fn child_success(&mut self, cx: &mut TaskContext<'_, E>, _child: usize) {
        cx.fail();
    }

    fn child_fail(&mut self, cx: &mut TaskContext<'_, E>, _child: usize) {
        cx.fail();
    }
}

/// Retries its child, one attempt per step, until it succeeds.
#[derive(Clone, Copy, Debug, Default)]
pub struct UntilSuccess;

impl<E: 'static> Task<E> for UntilSuccess {
    fn name(&self) -> &str {
        "until-success"
    }

    fn arity(&self) -> Arity {
        Arity::Single
    }

    fn on_update(&mut self, cx: &mut TaskContext<'_, E>) {
        cx.run_child(0);
    }

    fn child_success(&mut self, cx: &mut TaskContext<'_, E>, _child: usize) {
        cx.success();
    }

    fn child_fail(&mut self, cx: &mut TaskContext<'_, E>, _child: usize) {
        cx.running();
    }
}

/// Retries its child, one attempt per step, until it fails; then succeeds.
#[derive(Clone, Copy, Debug, Default)]
pub struct UntilFail;

impl<E: 'static> Task<E> for UntilFail {
    fn name(&self) -> &str {
        "until-fail"
    }

    fn arity(&self) -> Arity {
        Arity::Single
    }

    fn on_update(&mut self, cx: &mut TaskContext<'_, E>) {
        cx.run_child(0);
    }

    fn child_success(&mut self, cx: &mut TaskContext<'_, E>, _child: usize) {
        cx.running();
    }

    fn child_fail(&mut self, cx: &mut TaskContext<'_, E>, _child: usize) {
        cx.success();
    }
}

/// How many times a [`Repeat`] runs its child.
///
/// Negative counts repeat forever. The textual form is an integer,
/// `forever`, or `uniform,LOW,HIGH` for a count drawn on every entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RepeatCount {
    Fixed(i64),
    /// Drawn uniformly from `low..=high` each time the decorator starts.
    Uniform { low: i64, high: i64 },
}

impl RepeatCount {
    pub const FOREVER: Self = Self::Fixed(-1);

    /// Picks the count for one run.
    pub fn draw(&self) -> i64 {
        match *self {
            Self::Fixed(count) => count,
            Self::Uniform { low, high } if high <= low => low,
            Self::Uniform { low, high } => rand::thread_rng().gen_range(low..=high),
        }
    }

    pub fn is_forever(&self) -> bool {
        matches!(self, Self::Fixed(count) if *count < 0)
    }
}

impl fmt::Display for RepeatCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(count) if *count < 0 => f.write_str("forever"),
            Self::Fixed(count) => write!(f, "{count}"),
            Self::Uniform { low, high } => write!(f, "uniform,{low},{high}"),
        }
    }
}

/// A repeat count that could not be parsed.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("invalid repeat count '{0}' (expected an integer, 'forever' or 'uniform,LOW,HIGH')")]
pub struct InvalidRepeatCount(pub String);

impl FromStr for RepeatCount {
    type Err = InvalidRepeatCount;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        let invalid = || InvalidRepeatCount(s.to_owned());

        if text.eq_ignore_ascii_case("forever") {
            return Ok(Self::FOREVER);
        }
        if let Some(bounds) = text.strip_prefix("uniform,") {
            let (low, high) = bounds.split_once(',').ok_or_else(invalid)?;
            let low: i64 = low.trim().parse().map_err(|_| invalid())?;
            let high: i64 = high.trim().parse().map_err(|_| invalid())?;
            if low > high {
                return Err(invalid());
            }
            return Ok(Self::Uniform { low, high });
        }
        text.parse().map(Self::Fixed).map_err(|_| invalid())
    }
}

/// Runs its child a number of times, then succeeds.
///
/// # Semantics
///
/// - The count is drawn from the [`RepeatCount`] on every entry
/// - Child success and child failure both count as one repetition
/// - When the counter reaches zero the decorator succeeds; a negative counter
///   never does, so an infinite repeat only ends through [`reset`] or a guard
///
/// [`reset`]: crate::BehaviorTree::reset
#[derive(Clone, Copy, Debug)]
pub struct Repeat {
    count: RepeatCount,
    remaining: i64,
}

impl Repeat {
    pub fn new(count: RepeatCount) -> Self {
        Self {
            count,
            remaining: 0,
        }
    }

    /// Repeats exactly `times` times (forever if negative).
    pub fn times(times: i64) -> Self {
        Self::new(RepeatCount::Fixed(times))
    }

    pub fn forever() -> Self {
        Self::new(RepeatCount::FOREVER)
    }

    pub fn count(&self) -> RepeatCount {
        self.count
    }

    fn completed<E: 'static>(&mut self, cx: &mut TaskContext<'_, E>) {
        if self.remaining > 0 {
            self.remaining -= 1;
        }
        if self.remaining == 0 {
            cx.success();
        } else {
            cx.running();
        }
    }
}

impl<E: 'static> Task<E> for Repeat {
    fn name(&self) -> &str {
        "repeat"
    }

    fn arity(&self) -> Arity {
        Arity::Single
    }

    fn start(&mut self, _cx: &mut TaskContext<'_, E>) {
        self.remaining = self.count.draw();
    }

    fn on_update(&mut self, cx: &mut TaskContext<'_, E>) {
        if self.remaining == 0 {
            cx.success();
        } else {
            cx.run_child(0);
        }
    }

    fn child_success(&mut self, cx: &mut TaskContext<'_, E>, _child: usize) {
        self.completed(cx);
    }

    fn child_fail(&mut self, cx: &mut TaskContext<'_, E>, _child: usize) {
        self.completed(cx);
    }

    fn reset(&mut self) {
        self.remaining = 0;
    }
}
