//! Errors that abort a run before the scheduler is ever started.

use std::fmt;

/// Malformed input: bad JSON, an unknown `type` tag, or a `data` payload
/// that does not match its type's schema.
#[derive(Debug)]
pub enum ParseError {
    Json(serde_json::Error),
    UnknownType(String),
    BadData {
        type_tag: String,
        source: serde_json::Error,
    },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Json(e) => write!(f, "cannot decode to object: {e}"),
            ParseError::UnknownType(tag) => write!(f, "unknown object type {tag}"),
            ParseError::BadData { type_tag, source } => {
                write!(f, "cannot parse data attributes for {type_tag}: {source}")
            }
        }
    }
}

impl std::error::Error for ParseError {}

/// A dependency-graph well-formedness violation, detected once the whole
/// tree has been walked.
#[derive(Debug)]
pub enum GraphError {
    /// Names of futures referenced in some `awaits` list but never
    /// completed by any object.
    Unresolved(Vec<String>),
    /// Names of futures completed by more than one object.
    Duplicated(Vec<String>),
}

impl fmt::Display for GraphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphError::Unresolved(names) => {
                write!(f, "futures {} are never completed", names.join(", "))
            }
            GraphError::Duplicated(names) => write!(
                f,
                "futures {} are completed by multiple objects",
                names.join(", ")
            ),
        }
    }
}

impl std::error::Error for GraphError {}

/// Anything that can cause [`crate::parse`] to fail.
#[derive(Debug)]
pub enum Error {
    Parse(ParseError),
    Graph(GraphError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Parse(e) => write!(f, "{e}"),
            Error::Graph(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<ParseError> for Error {
    fn from(e: ParseError) -> Error {
        Error::Parse(e)
    }
}

impl From<GraphError> for Error {
    fn from(e: GraphError) -> Error {
        Error::Graph(e)
    }
}
