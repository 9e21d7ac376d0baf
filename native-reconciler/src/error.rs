use crate::class::UnknownType;
use crate::style::StyleError;
use crate::value::Name;
use thiserror::Error;

/// Errors raised by the native toolkit itself. Passed through unchanged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NativeError {
    #[error("no native class `{0}` is registered")]
    UnknownClass(Name),

    #[error("class {class} has no property `{property}`")]
    UnknownProperty { class: Name, property: Name },

    #[error("class {class} has no signal `{signal}`")]
    UnknownSignal { class: Name, signal: Name },

    #[error("invalid value for `{property}`: {message}")]
    InvalidValue { property: Name, message: String },

    #[error("class {class} does not accept child role `{role}`")]
    UnsupportedRole { class: Name, role: Name },

    #[error("no native object {0}")]
    UnknownObject(String),

    #[error("{0} cannot hold children")]
    NotAContainer(String),

    #[error("{child} is an ancestor of {parent}")]
    WouldCycle { parent: String, child: String },

    #[error("{child} is not a child of {parent}")]
    NotAChild { parent: String, child: String },

    #[error("stylesheet rejected: {0}")]
    Stylesheet(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReconcileError {
    #[error(transparent)]
    UnknownType(#[from] UnknownType),

    #[error("style compile failed: {0}")]
    StyleCompile(#[from] StyleError),

    #[error("no common native parent for {child} and {before}")]
    OrderingInvariantViolation { child: String, before: String },

    #[error(transparent)]
    Native(#[from] NativeError),
}

pub type Result<T> = std::result::Result<T, ReconcileError>;
