use std::error::Error;
use std::fmt::{Display, Formatter};

/// An error from constructing a gate or binding a decomposition rule.
#[derive(Debug)]
pub enum DecompositionError {
    /// Gate parameters or operand registers violate a documented bound.
    InvalidParameters(String),
    /// A rule was invoked outside its documented preconditions.
    NotDecomposable(String),
}

impl DecompositionError {
    /// Construct a new parameter-bound error.
    pub fn invalid<S>(msg: S) -> Self
    where
        S: Into<String>,
    {
        Self::InvalidParameters(msg.into())
    }

    /// Construct a new precondition error.
    pub fn not_decomposable<S>(msg: S) -> Self
    where
        S: Into<String>,
    {
        Self::NotDecomposable(msg.into())
    }
}

/// A result which may contain a decomposition error.
pub type DecompositionResult<T> = Result<T, DecompositionError>;

impl Error for DecompositionError {}

impl Display for DecompositionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidParameters(msg) => write!(f, "invalid parameters: {}", msg),
            Self::NotDecomposable(msg) => write!(f, "not decomposable: {}", msg),
        }
    }
}
