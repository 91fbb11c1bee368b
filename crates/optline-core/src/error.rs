use thiserror::Error;

/// Raised while building a registry. These are programmer errors in the option
/// table, so they are returned straight to the caller and never routed through
/// the parse-time error handler.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DefinitionError {
    #[error("empty option found. the last option name is {}", .last.as_deref().unwrap_or(""))]
    EmptyName { last: Option<String> },

    #[error("option {0} is redefined.")]
    Redefined(String),

    #[error("short option must be single characters (got '{0}')")]
    InvalidShortName(String),

    #[error("short option -{short} is already used by {existing}")]
    DuplicateShortName { short: char, existing: String },

    #[error("optional argument can only work with long option ({0})")]
    OptionalWithShortName(String),
}

/// Raised while tokenizing argv. A failed parse is wholly invalid.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("invalid option {0}")]
    UnknownOption(String),

    #[error("option {0} need argument")]
    MissingArgument(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EventError {
    #[error("unknown option {0}")]
    UnknownOption(String),

    #[error("Getopt event on '{0}' is not found")]
    NoHandler(String),
}

/// Any failure from this crate, for callers that mix registration, events
/// and parsing in one fallible block.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error(transparent)]
    Definition(#[from] DefinitionError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Event(#[from] EventError),
}
