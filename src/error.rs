use thiserror::Error;

/// Errors of the point attribute data model. All of them describe invalid input by the caller and none of them
/// are transient, so retrying the same operation will always fail again.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AttributeError {
    #[error("Unknown point attribute type '{0}'")]
    UnknownTypeName(String),

    #[error("Unknown point attribute type ordinal {0}")]
    UnknownTypeOrdinal(usize),

    #[error("Unknown point attribute '{0}'")]
    UnknownAttribute(String),

    #[error("Point attribute '{name}' cannot have {num_elements} elements")]
    InvalidElementCount { name: String, num_elements: usize },

    #[error("Attribute index {index} is out of range for a record with {size} attributes")]
    IndexOutOfRange { index: usize, size: usize },
}

/// Coarse classification of an [AttributeError]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// An unknown type name, type ordinal or attribute name was requested
    NotFound,
    /// An attribute definition was requested with invalid parameters
    InvalidArgument,
    /// An attribute index beyond the end of a record was requested
    OutOfRange,
}

impl AttributeError {
    /// Returns the [ErrorKind] of this error
    /// ```
    /// # use potree_attributes::*;
    /// let error = AttributeError::UnknownAttribute("NOT_A_REAL_NAME".into());
    /// assert_eq!(ErrorKind::NotFound, error.kind());
    /// ```
    pub fn kind(&self) -> ErrorKind {
        match self {
            AttributeError::UnknownTypeName(_)
            | AttributeError::UnknownTypeOrdinal(_)
            | AttributeError::UnknownAttribute(_) => ErrorKind::NotFound,
            AttributeError::InvalidElementCount { .. } => ErrorKind::InvalidArgument,
            AttributeError::IndexOutOfRange { .. } => ErrorKind::OutOfRange,
        }
    }
}

pub type Result<T> = std::result::Result<T, AttributeError>;
