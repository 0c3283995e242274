//! Error types

use thiserror::Error;

/// Errors raised while building or invoking a command
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// A command builder was finished without an execute operation
    #[error("command has no execute operation")]
    MissingExecute,

    /// No parameter was supplied for a command whose parameter type cannot be absent
    #[error("missing command parameter: expected a value of type {expected}")]
    MissingParameter { expected: &'static str },

    /// The supplied parameter is not of the command's parameter type
    #[error("invalid command parameter: expected {expected}, got a value of another type")]
    ParameterType { expected: &'static str },
}

/// Errors raised by value converters
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConvertError {
    /// The converter only works in the forward direction
    #[error("{converter} does not support converting back")]
    Unsupported { converter: &'static str },
}
