use crate::TreeError;

/// Well-formed statements that do not describe a valid tree.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum BuildError {
    /// No factory is registered under the statement's name.
    #[error("unknown task type '{0}'")]
    UnknownTask(String),

    /// No library subtree is registered under the referenced name.
    #[error("unknown subtree '{0}'")]
    UnknownSubtree(String),

    #[error("task '{task}' has no attribute '{attribute}'")]
    UnknownAttribute { task: String, attribute: String },

    #[error("task '{task}' requires attribute '{attribute}'")]
    MissingAttribute { task: String, attribute: String },

    #[error("attribute '{attribute}' of task '{task}' is given more than once")]
    DuplicateAttribute { task: String, attribute: String },

    #[error("attribute '{attribute}' expects a value of type {expected}, found {found}")]
    InvalidAttribute {
        attribute: String,
        expected: &'static str,
        found: String,
    },

    #[error("subtree reference '{0}' cannot take attributes")]
    SubtreeAttributes(String),

    /// A decorator was closed before any task was nested under it.
    #[error("task '{0}' requires a child task")]
    MissingChild(String),

    #[error("a behavior tree definition can only have one root task")]
    MultipleRoots,

    /// The document ended while a guard was waiting for its task.
    #[error("guard '{0}' is not followed by a task to guard")]
    DanglingGuard(String),

    #[error("behavior tree definition contains no tasks")]
    EmptyDocument,

    /// Arity overflow or guard conflict while wiring tasks.
    #[error(transparent)]
    Tree(#[from] TreeError),
}

impl BuildError {
    /// Returns a stable identifier for this error variant.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownTask(_) => "BUILD_UNKNOWN_TASK",
            Self::UnknownSubtree(_) => "BUILD_UNKNOWN_SUBTREE",
            Self::UnknownAttribute { .. } => "BUILD_UNKNOWN_ATTRIBUTE",
            Self::MissingAttribute { .. } => "BUILD_MISSING_ATTRIBUTE",
            Self::DuplicateAttribute { .. } => "BUILD_DUPLICATE_ATTRIBUTE",
            Self::InvalidAttribute { .. } => "BUILD_INVALID_ATTRIBUTE",
            Self::SubtreeAttributes(_) => "BUILD_SUBTREE_ATTRIBUTES",
            Self::MissingChild(_) => "BUILD_MISSING_CHILD",
            Self::MultipleRoots => "BUILD_MULTIPLE_ROOTS",
            Self::DanglingGuard(_) => "BUILD_DANGLING_GUARD",
            Self::EmptyDocument => "BUILD_EMPTY_DOCUMENT",
            Self::Tree(error) => error.error_code(),
        }
    }
}
