//! Name-to-task mapping used by the parser.

use std::collections::HashMap;
use std::fmt;

use super::{Attributes, BuildError};
use crate::{
    AlwaysFail, AlwaysSucceed, AttrValue, Failure, Invert, Repeat, RepeatCount, Selector, Sequence,
    Success, Task, TaskNode, UntilFail, UntilSuccess, Wait,
};

/// Creates a task from the attributes of a statement.
pub type TaskFactory<E> =
    dyn Fn(&Attributes) -> Result<Box<dyn Task<E>>, BuildError> + Send + Sync;

/// Maps statement names to task factories.
pub struct TaskRegistry<E> {
    factories: HashMap<String, Box<TaskFactory<E>>>,
}

impl<E: 'static> TaskRegistry<E> {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Creates a registry holding the built-in tasks:
    ///
    /// | name | task | attributes |
    /// |---|---|---|
    /// | `sequence` | [`Sequence`] | |
    /// | `selector` | [`Selector`] | |
    /// | `repeat` | [`Repeat`] | `times`: integer, `"forever"` or `"uniform,LOW,HIGH"` (default forever) |
    /// | `invert` | [`Invert`] | |
    /// | `always-succeed` | [`AlwaysSucceed`] | |
    /// | `always-fail` | [`AlwaysFail`] | |
    /// | `until-success` | [`UntilSuccess`] | |
    /// | `until-fail` | [`UntilFail`] | |
    /// | `success` | [`Success`] | |
    /// | `failure` | [`Failure`] | |
    /// | `wait` | [`Wait`] | `seconds`: number (required) |
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry
            .register_task("sequence", Sequence::new())
            .register_task("selector", Selector::new())
            .register_task("invert", Invert)
            .register_task("always-succeed", AlwaysSucceed)
            .register_task("always-fail", AlwaysFail)
            .register_task("until-success", UntilSuccess)
            .register_task("until-fail", UntilFail)
            .register_task("success", Success)
            .register_task("failure", Failure)
            .register("repeat", |attributes| {
                attributes.expect_only("repeat", &["times"])?;
                let task: Box<dyn Task<E>> = Box::new(Repeat::new(repeat_count(attributes)?));
                Ok(task)
            })
            .register("wait", |attributes| {
                attributes.expect_only("wait", &["seconds"])?;
                let seconds = attributes.require("wait", "seconds")?;
                let seconds = seconds
                    .as_float()
                    .ok_or_else(|| invalid("seconds", "number", seconds))?;
                let task: Box<dyn Task<E>> = Box::new(Wait::new(seconds as f32));
                Ok(task)
            });
        registry
    }

    /// Registers a factory, replacing any previous one of the same name.
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn(&Attributes) -> Result<Box<dyn Task<E>>, BuildError> + Send + Sync + 'static,
    {
        self.factories.insert(name.into(), Box::new(factory));
        self
    }

    /// Registers a task that takes no attributes; every statement gets a fresh
    /// copy of `prototype`.
    pub fn register_task<T>(&mut self, name: impl Into<String>, prototype: T) -> &mut Self
    where
        T: Task<E> + Clone + Sync + 'static,
    {
        let name = name.into();
        let task_name = name.clone();
        self.register(name, move |attributes| {
            attributes.expect_only(&task_name, &[])?;
            let task: Box<dyn Task<E>> = Box::new(prototype.clone());
            Ok(task)
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Creates the task registered under `name`.
    ///
    /// # Errors
    ///
    /// [`BuildError::UnknownTask`] for unregistered names, otherwise whatever
    /// the factory reports.
    pub fn create(
        &self,
        name: &str,
        attributes: &Attributes,
    ) -> Result<Box<dyn Task<E>>, BuildError> {
        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| BuildError::UnknownTask(name.to_owned()))?;
        factory(attributes)
    }
}

impl<E: 'static> Default for TaskRegistry<E> {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl<E: 'static> fmt::Debug for TaskRegistry<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskRegistry")
            .field("names", &self.names())
            .finish()
    }
}

fn invalid(attribute: &str, expected: &'static str, found: &AttrValue) -> BuildError {
    BuildError::InvalidAttribute {
        attribute: attribute.to_owned(),
        expected,
        found: found.to_string(),
    }
}

fn repeat_count(attributes: &Attributes) -> Result<RepeatCount, BuildError> {
    let Some(value) = attributes.get("times") else {
        return Ok(RepeatCount::FOREVER);
    };
    match value {
        AttrValue::Int(times) => Ok(RepeatCount::Fixed(*times)),
        AttrValue::Str(text) => text
            .parse()
            .map_err(|_| invalid("times", "repeat count", value)),
        _ => Err(invalid("times", "repeat count", value)),
    }
}

/// Named subtree templates spliced in by `->name` statements.
pub struct TreeLibrary<E> {
    subtrees: HashMap<String, TaskNode<E>>,
}

impl<E: 'static> TreeLibrary<E> {
    pub fn new() -> Self {
        Self {
            subtrees: HashMap::new(),
        }
    }

    /// Stores a template, returning the one it replaces.
    pub fn insert(&mut self, name: impl Into<String>, subtree: TaskNode<E>) -> Option<TaskNode<E>> {
        self.subtrees.insert(name.into(), subtree)
    }

    pub fn get(&self, name: &str) -> Option<&TaskNode<E>> {
        self.subtrees.get(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<TaskNode<E>> {
        self.subtrees.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.subtrees.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.subtrees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subtrees.is_empty()
    }

    /// Returns a fresh copy of the named template.
    pub fn instantiate(&self, name: &str) -> Result<TaskNode<E>, BuildError> {
        self.subtrees
            .get(name)
            .cloned()
            .ok_or_else(|| BuildError::UnknownSubtree(name.to_owned()))
    }
}

impl<E: 'static> Default for TreeLibrary<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: 'static> Clone for TreeLibrary<E> {
    fn clone(&self) -> Self {
        Self {
            subtrees: self.subtrees.clone(),
        }
    }
}

impl<E: 'static> fmt::Debug for TreeLibrary<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.subtrees.keys().collect();
        names.sort_unstable();
        f.debug_struct("TreeLibrary")
            .field("names", &names)
            .finish()
    }
}
