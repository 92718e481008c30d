//! Behavior tree runtime for game AI with a compact tree-definition language.
//!
//! A [`BehaviorTree`] owns a tree of tasks, a blackboard value `E` shared by
//! every task, and an ordered list of [`Listener`]s. Each call to
//! [`BehaviorTree::step`] advances the tree by one tick of `dt` seconds and
//! propagates [`Status`] changes from the leaves up to the root.
//!
//! - **Tasks**: anything implementing [`Task`]; composites ([`Sequence`],
//!   [`Selector`]), decorators ([`Repeat`], [`Invert`], ...) and leaves
//!   ([`Wait`], [`Condition`], [`Action`], ...) are provided
//! - **Guards**: any task may carry a guard subtree that must succeed before
//!   the task is entered
//! - **Instances**: [`BehaviorTree::instantiate`] clones a tree for another
//!   entity with fresh run state and its own blackboard
//! - **Text**: [`TreeParser`] builds trees from indentation-based source,
//!   driving the event-driven [`TreeReader`]
//!
//! # Example
//!
//! ```
//! use behavior_tree::{Status, TreeParser};
//!
//! let mut parser = TreeParser::<u32>::new();
//! parser.register_subtree("idle", behavior_tree::builder::wait(0.5));
//!
//! let mut tree = parser.parse("selector\n  ?failure success\n  ->idle\n", 0)?;
//! assert_eq!(tree.step(0.25)?, Status::Running);
//! assert_eq!(tree.step(0.25)?, Status::Running);
//! assert_eq!(tree.step(0.25)?, Status::Succeeded);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod builder;
pub mod composite;
pub mod config;
pub mod context;
pub mod decorator;
pub mod error;
pub mod leaf;
pub mod listener;
pub mod node;
pub mod parser;
pub mod reader;
pub mod status;
pub mod task;
pub mod tree;

pub use composite::{Selector, Sequence};
pub use config::{DebugLevel, ParserConfig};
pub use context::TaskContext;
pub use decorator::{
    AlwaysFail, AlwaysSucceed, InvalidRepeatCount, Invert, Repeat, RepeatCount, UntilFail,
    UntilSuccess,
};
pub use error::TreeError;
pub use leaf::{Action, Condition, Failure, Success, Wait};
pub use listener::{Listener, StatusUpdate, TracingListener};
pub use node::TaskNode;
pub use parser::{
    Attributes, BuildError, Statement, TaskFactory, TaskRegistry, TreeLibrary, TreeParser,
};
pub use reader::{
    AttrValue, HandlerResult, ParseError, ParsedLine, ReadHandler, StatementCollector, SyntaxError,
    TreeReader,
};
pub use status::Status;
pub use task::{Arity, Task, TaskClone, TaskId};
pub use tree::BehaviorTree;
