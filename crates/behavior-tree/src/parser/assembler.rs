//! Turns reader events into a task tree.
//!
//! Open tasks are kept on a stack together with the indentation of the line
//! that created them. A line's first task closes every open task indented at
//! least as deep, then becomes a child of the innermost task left open.
//! Further tasks on the same line nest inside the task before them.
//! Decorators must have their child by the time they are closed.

use super::{BuildError, Statement, TaskRegistry, TreeLibrary};
use crate::reader::{AttrValue, HandlerResult, ReadHandler};
use crate::{DebugLevel, TaskNode, TreeError};

struct Frame<E> {
    indent: usize,
    node: TaskNode<E>,
    /// Children attached or still open below this task.
    children: usize,
}

pub(super) struct Assembler<'p, E> {
    registry: &'p TaskRegistry<E>,
    library: &'p TreeLibrary<E>,
    debug_level: DebugLevel,
    stack: Vec<Frame<E>>,
    root: Option<TaskNode<E>>,
    has_root: bool,
    line_indent: usize,
    placed_on_line: bool,
    /// Guard chain waiting for the statement it guards.
    pending_guard: Option<TaskNode<E>>,
    statement: Option<Statement>,
}

impl<'p, E: 'static> Assembler<'p, E> {
    pub(super) fn new(
        registry: &'p TaskRegistry<E>,
        library: &'p TreeLibrary<E>,
        debug_level: DebugLevel,
    ) -> Self {
        Self {
            registry,
            library,
            debug_level,
            stack: Vec::new(),
            root: None,
            has_root: false,
            line_indent: 0,
            placed_on_line: false,
            pending_guard: None,
            statement: None,
        }
    }

    /// Closes every open task and returns the root.
    pub(super) fn finish(mut self) -> Result<TaskNode<E>, BuildError> {
        if let Some(guard) = self.pending_guard.take() {
            return Err(BuildError::DanglingGuard(guard.name().to_owned()));
        }
        self.close_frames(0)?;
        self.root.ok_or(BuildError::EmptyDocument)
    }

    fn build(&self, statement: &Statement) -> Result<TaskNode<E>, BuildError> {
        if statement.is_subtree_ref {
            if !statement.attributes.is_empty() {
                return Err(BuildError::SubtreeAttributes(statement.name.clone()));
            }
            return self.library.instantiate(&statement.name);
        }
        let task = self
            .registry
            .create(&statement.name, &statement.attributes)?;
        Ok(TaskNode::from_boxed(task))
    }

    fn place(&mut self, node: TaskNode<E>) -> Result<(), BuildError> {
        if !self.placed_on_line {
            self.close_frames(self.line_indent)?;
            self.placed_on_line = true;
        }

        match self.stack.last_mut() {
            Some(parent) => {
                if let Some(limit) = parent.node.arity().max_children()
                    && parent.children >= limit
                {
                    return Err(TreeError::ChildLimitExceeded {
                        name: parent.node.name().to_owned(),
                        limit,
                    }
                    .into());
                }
                parent.children += 1;
            }
            None if self.has_root => return Err(BuildError::MultipleRoots),
            None => self.has_root = true,
        }

        self.stack.push(Frame {
            indent: self.line_indent,
            children: node.children().len(),
            node,
        });
        Ok(())
    }

    fn close_frames(&mut self, indent: usize) -> Result<(), BuildError> {
        while self.stack.last().is_some_and(|open| open.indent >= indent) {
            let Some(frame) = self.stack.pop() else {
                break;
            };
            ensure_children(&frame.node)?;
            match self.stack.last_mut() {
                Some(parent) => {
                    parent.node.add_child(frame.node)?;
                }
                None => self.root = Some(frame.node),
            }
        }
        Ok(())
    }
}

fn ensure_children<E: 'static>(node: &TaskNode<E>) -> Result<(), BuildError> {
    if node.children().len() < node.arity().min_children() {
        return Err(BuildError::MissingChild(node.name().to_owned()));
    }
    Ok(())
}

impl<E: 'static> ReadHandler for Assembler<'_, E> {
    fn start_line(&mut self, indent: usize) -> HandlerResult {
        self.line_indent = indent;
        self.placed_on_line = false;
        Ok(())
    }

    fn start_statement(
        &mut self,
        name: &str,
        is_subtree_ref: bool,
        is_guard: bool,
    ) -> HandlerResult {
        self.statement = Some(Statement::new(name, is_subtree_ref, is_guard));
        Ok(())
    }

    fn attribute(&mut self, name: &str, value: AttrValue) -> HandlerResult {
        if let Some(statement) = self.statement.as_mut()
            && !statement.attributes.insert(name, value)
        {
            return Err(BuildError::DuplicateAttribute {
                task: statement.name.clone(),
                attribute: name.to_owned(),
            }
            .into());
        }
        Ok(())
    }

    fn end_statement(&mut self) -> HandlerResult {
        let Some(statement) = self.statement.take() else {
            return Ok(());
        };
        if self.debug_level >= DebugLevel::High {
            tracing::debug!(%statement, indent = self.line_indent, "statement read");
        }

        let mut node = self.build(&statement)?;
        if let Some(pending) = self.pending_guard.take() {
            node.set_guard(pending).map_err(BuildError::from)?;
        }

        if statement.is_guard {
            // Guards never take nested children.
            ensure_children(&node)?;
            self.pending_guard = Some(node);
        } else {
            self.place(node)?;
        }
        Ok(())
    }

    fn end_line(&mut self) -> HandlerResult {
        Ok(())
    }

    fn comment(&mut self, text: &str) -> HandlerResult {
        if self.debug_level >= DebugLevel::High {
            tracing::debug!(text, "comment read");
        }
        Ok(())
    }
}
