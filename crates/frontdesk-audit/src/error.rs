//! Audit store error types.

/// Errors a persistence backend can report from an insert or listing.
///
/// None of these ever reach an HTTP client: the recorder absorbs them on the
/// write path, and the admin listing maps them to an opaque 500.
#[derive(Debug, thiserror::Error)]
pub enum AuditStoreError {
    /// Failed to reach the backing store.
    #[error("connection error: {message}")]
    Connection { message: String },

    /// The store rejected the record (constraint violation).
    #[error("constraint violation: {message}")]
    Constraint { message: String },

    /// The record could not be serialized for storage.
    #[error("serialization error: {message}")]
    Serialization { message: String },

    /// Any other backend failure.
    #[error("internal store error: {message}")]
    Internal { message: String },
}

impl AuditStoreError {
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn constraint(message: impl Into<String>) -> Self {
        Self::Constraint {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}
