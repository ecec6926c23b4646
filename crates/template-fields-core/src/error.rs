use std::fmt;
use thiserror::Error;

/// The remote calls the editor makes against the field store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteOperation {
    LoadFields,
    DeleteFields,
    InsertFields,
}

impl fmt::Display for RemoteOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemoteOperation::LoadFields => write!(f, "load fields"),
            RemoteOperation::DeleteFields => write!(f, "delete fields"),
            RemoteOperation::InsertFields => write!(f, "insert fields"),
        }
    }
}

/// A remote store call failed.
///
/// Network, permission and validation failures all share this one kind and
/// carry the store's message text.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct RemoteError {
    pub operation: RemoteOperation,
    pub message: String,
}

impl RemoteError {
    pub fn new(operation: RemoteOperation, message: impl Into<String>) -> Self {
        Self {
            operation,
            message: message.into(),
        }
    }
}

/// Inspector input that could not be turned into an edit
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("Not a number: {0:?}")]
    InvalidNumber(String),

    #[error("Page must be a whole number of at least 1: {0:?}")]
    InvalidPage(String),

    #[error("Unknown field kind: {0:?}")]
    UnknownKind(String),

    #[error("Unknown field attribute: {0:?}")]
    UnknownAttribute(String),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EditorError {
    #[error("No template loaded")]
    NoTemplate,

    #[error("Field not found: {0}")]
    UnknownField(String),

    #[error("No field selected")]
    NothingSelected,

    #[error("A save is already in progress")]
    SaveInProgress,

    #[error(transparent)]
    InvalidEdit(#[from] EditError),

    #[error(transparent)]
    Remote(#[from] RemoteError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing configuration value: {0}")]
    Missing(&'static str),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
