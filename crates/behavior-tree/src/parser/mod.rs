//! Builds behavior trees from the textual tree language.
//!
//! [`TreeParser`] drives a [`TreeReader`] and maps every statement to a task:
//! plain statements through the [`TaskRegistry`], `->name` references by
//! copying a template from the [`TreeLibrary`]. Parsing is all-or-nothing;
//! the first error discards everything built so far.
//!
//! # Structure
//!
//! - A line's first statement becomes a child of the last task of the nearest
//!   preceding line with smaller indentation.
//! - Further statements on the same line nest inside the statement before
//!   them, so `repeat(times:3) ->patrol` repeats the patrol subtree.
//! - A guard statement `?name` guards the next statement, which may be on a
//!   later line. Consecutive guards chain: in `?a ?b task`, `a` guards `b`
//!   and `b` guards `task`.
//! - A document has exactly one root.

mod assembler;
mod error;
mod registry;
mod statement;

use std::io::Read;

pub use error::BuildError;
pub use registry::{TaskFactory, TaskRegistry, TreeLibrary};
pub use statement::{Attributes, Statement};

use crate::{BehaviorTree, DebugLevel, ParseError, ParserConfig, Task, TaskNode, TreeReader};
use assembler::Assembler;

/// Parser producing [`TaskNode`] templates and [`BehaviorTree`]s.
///
/// # Example
///
/// ```
/// use behavior_tree::{Status, TreeParser};
///
/// let parser = TreeParser::<()>::new();
/// let mut tree = parser.parse(
///     "sequence\n  repeat(times:2) success\n  invert failure\n",
///     (),
/// )?;
///
/// assert_eq!(tree.step(0.1)?, Status::Running);
/// assert_eq!(tree.step(0.1)?, Status::Succeeded);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct TreeParser<E> {
    registry: TaskRegistry<E>,
    library: TreeLibrary<E>,
    config: ParserConfig,
}

impl<E: 'static> TreeParser<E> {
    /// Creates a parser with the built-in tasks and default configuration.
    pub fn new() -> Self {
        Self::with_config(ParserConfig::default())
    }

    pub fn with_config(config: ParserConfig) -> Self {
        Self {
            registry: TaskRegistry::with_builtins(),
            library: TreeLibrary::new(),
            config,
        }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Registers a task factory under `name`.
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn(&Attributes) -> Result<Box<dyn Task<E>>, BuildError> + Send + Sync + 'static,
    {
        self.registry.register(name, factory);
        self
    }

    pub fn registry(&self) -> &TaskRegistry<E> {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut TaskRegistry<E> {
        &mut self.registry
    }

    pub fn library(&self) -> &TreeLibrary<E> {
        &self.library
    }

    pub fn library_mut(&mut self) -> &mut TreeLibrary<E> {
        &mut self.library
    }

    /// Makes `subtree` available to `->name` references.
    pub fn register_subtree(
        &mut self,
        name: impl Into<String>,
        subtree: TaskNode<E>,
    ) -> Option<TaskNode<E>> {
        self.library.insert(name, subtree)
    }

    /// Parses `text` and stores the result as a library subtree.
    pub fn parse_subtree(&mut self, name: impl Into<String>, text: &str) -> Result<(), ParseError> {
        let subtree = self.parse_template(text)?;
        self.library.insert(name, subtree);
        Ok(())
    }

    /// Parses `text` into a detached template.
    ///
    /// # Errors
    ///
    /// - [`ParseError::Syntax`] for malformed text
    /// - [`ParseError::Build`] when the statements do not form a valid tree;
    ///   errors detected at the end of the document report its last line
    pub fn parse_template(&self, text: &str) -> Result<TaskNode<E>, ParseError> {
        let mut assembler = Assembler::new(&self.registry, &self.library, self.config.debug_level);
        TreeReader::from_config(&self.config)
            .parse(text, &mut assembler)
            .map_err(unwrap_build_error)?;

        let root = assembler.finish().map_err(|error| ParseError::Build {
            line: text.lines().count().max(1),
            error,
        })?;

        if self.config.debug_level >= DebugLevel::Low {
            tracing::debug!(tasks = root.task_count(), "parsed behavior tree:\n{root}");
        }
        Ok(root)
    }

    /// Parses `text` into a tree around `blackboard`.
    pub fn parse(&self, text: &str, blackboard: E) -> Result<BehaviorTree<E>, ParseError> {
        let root = self.parse_template(text)?;
        Ok(BehaviorTree::with_root(root, blackboard))
    }

    /// Reads the whole source from `reader`, then parses it.
    pub fn parse_reader<R: Read>(
        &self,
        mut reader: R,
        blackboard: E,
    ) -> Result<BehaviorTree<E>, ParseError> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        self.parse(&text, blackboard)
    }
}

impl<E: 'static> Default for TreeParser<E> {
    fn default() -> Self {
        Self::new()
    }
}

/// Surfaces the assembler's own rejections as build errors.
fn unwrap_build_error(error: ParseError) -> ParseError {
    match error {
        ParseError::Rejected { line, near, source } => match source.downcast::<BuildError>() {
            Ok(error) => ParseError::Build {
                line,
                error: *error,
            },
            Err(source) => ParseError::Rejected { line, near, source },
        },
        other => other,
    }
}
