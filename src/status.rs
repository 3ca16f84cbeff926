//! Status codes and errors for record access operations
//!
//! Loader and store implementations report failures through [`AccessError`];
//! the cache passes them through to the caller unchanged.

use std::fmt;

/// Coarse status code for an access operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum Status {
    /// Operation completed successfully
    #[default]
    Ok = 0,
    /// Record was not found in the store
    NotFound = 1,
    /// I/O error occurred
    IoError = 2,
    /// Data corruption detected
    Corruption = 3,
    /// Feature or operation not supported
    NotSupported = 4,
    /// Invalid operation in current state
    InvalidOperation = 5,
    /// A retained proxy handle no longer refers to a live binding
    StaleHandle = 6,
}

impl Status {
    /// Check if the status indicates success
    #[inline]
    pub const fn is_ok(&self) -> bool {
        matches!(self, Status::Ok)
    }

    /// Check if the record was not found
    #[inline]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Status::NotFound)
    }

    /// Check if the status indicates an error
    #[inline]
    pub const fn is_error(&self) -> bool {
        !self.is_ok()
    }

    /// Get the status as a string
    pub const fn as_str(&self) -> &'static str {
        match self {
            Status::Ok => "Ok",
            Status::NotFound => "NotFound",
            Status::IoError => "IoError",
            Status::Corruption => "Corruption",
            Status::NotSupported => "NotSupported",
            Status::InvalidOperation => "InvalidOperation",
            Status::StaleHandle => "StaleHandle",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Errors returned by the record access cache and its collaborators.
#[derive(Debug, thiserror::Error)]
pub enum AccessError {
    /// The operation is deliberately not provided by this cache.
    #[error("operation not supported: {0}")]
    Unsupported(&'static str),
    /// A record was created for a key already present in the batch.
    #[error("key already present in batch: {0}")]
    DuplicateKey(String),
    /// A retained handle outlived its binding.
    #[error("proxy handle refers to a binding that is no longer in the batch")]
    StaleHandle,
    /// The store holds no record with this id.
    #[error("record {id} not found")]
    NotFound {
        /// Record id.
        id: u64,
    },
    /// I/O error raised by a loader or store.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// Record content failed validation.
    #[error("corrupt record: {0}")]
    Corruption(String),
    /// Store-level failure while persisting a record.
    #[error("store error: {0}")]
    Store(String),
    /// A slot in the batch index carried no binding.
    #[error("batch slot is not bound to a record")]
    UnboundProxy,
}

impl AccessError {
    /// Map the error onto its coarse status code.
    pub fn status(&self) -> Status {
        match self {
            AccessError::Unsupported(_) => Status::NotSupported,
            AccessError::DuplicateKey(_) | AccessError::UnboundProxy => Status::InvalidOperation,
            AccessError::StaleHandle => Status::StaleHandle,
            AccessError::NotFound { .. } => Status::NotFound,
            AccessError::Io(_) | AccessError::Store(_) => Status::IoError,
            AccessError::Corruption(_) => Status::Corruption,
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, AccessError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_checks() {
        assert!(Status::Ok.is_ok());
        assert!(!Status::Ok.is_error());

        assert!(Status::NotFound.is_not_found());
        assert!(Status::NotFound.is_error());
        assert!(Status::IoError.is_error());
        assert!(Status::StaleHandle.is_error());
    }

    #[test]
    fn test_status_display() {
        assert_eq!(format!("{}", Status::Ok), "Ok");
        assert_eq!(format!("{}", Status::NotSupported), "NotSupported");
        assert_eq!(format!("{}", Status::StaleHandle), "StaleHandle");
        assert_eq!(Status::InvalidOperation.as_str(), "InvalidOperation");
    }

    #[test]
    fn test_status_default() {
        assert_eq!(Status::default(), Status::Ok);
    }

    #[test]
    fn test_error_status_mapping() {
        assert_eq!(
            AccessError::Unsupported("set_to").status(),
            Status::NotSupported
        );
        assert_eq!(
            AccessError::DuplicateKey("7".into()).status(),
            Status::InvalidOperation
        );
        assert_eq!(AccessError::StaleHandle.status(), Status::StaleHandle);
        assert_eq!(AccessError::NotFound { id: 3 }.status(), Status::NotFound);
        assert_eq!(
            AccessError::Corruption("bad header".into()).status(),
            Status::Corruption
        );

        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk gone");
        assert_eq!(AccessError::from(io).status(), Status::IoError);
    }

    #[test]
    fn test_error_display() {
        let err = AccessError::NotFound { id: 42 };
        assert_eq!(err.to_string(), "record 42 not found");

        let err = AccessError::Unsupported("set_to");
        assert!(err.to_string().contains("set_to"));
    }
}
