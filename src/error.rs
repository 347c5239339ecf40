use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Programmer errors raised by container operations.
///
/// Not-found and duplicate-on-add are never errors; those are reported
/// through `bool` returns.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A required value was unset, e.g. an element whose key is `None`.
    #[error("{operation}: `{argument}` must be set")]
    NullArgument {
        operation: &'static str,
        argument: &'static str,
    },
    #[error("key not found")]
    KeyNotFound,
    #[error("index {index} out of range for length {len}")]
    IndexOutOfRange { index: usize, len: usize },
    /// A mutation was attempted through a read-only contract.
    #[error("{operation} is not supported by a read-only collection")]
    InvalidOperation { operation: &'static str },
}

impl Error {
    pub(crate) fn null(operation: &'static str, argument: &'static str) -> Self {
        Error::NullArgument {
            operation,
            argument,
        }
    }

    pub(crate) fn read_only(operation: &'static str) -> Self {
        Error::InvalidOperation { operation }
    }
}
