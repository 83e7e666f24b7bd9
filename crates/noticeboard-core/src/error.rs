//! Error types for the external collaborators.
//!
//! Each collaborator gets its own taxonomy so handlers can distinguish the
//! one condition that is not a fault (an absent document) from transport and
//! protocol failures, which are always terminal for the current request.

use thiserror::Error;

/// Errors from the object store collaborator.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// The requested key does not exist in the bucket.
    ///
    /// This is the expected first-run state for list documents, not a
    /// fault; callers normalize it to an empty list.
    #[error("object not found: {key}")]
    NotFound {
        /// Key that was requested
        key: String,
    },

    /// Transport-level failure reaching the store.
    #[error("storage request failed: {message}")]
    Transport {
        /// Description of the transport failure
        message: String,
    },

    /// The store answered with a status outside the expected set.
    #[error("storage responded with HTTP {status}")]
    UnexpectedStatus {
        /// HTTP status code returned by the store
        status: u16,
    },

    /// A document could not be encoded for persistence.
    #[error("failed to encode document: {message}")]
    Encoding {
        /// Description of the encoding failure
        message: String,
    },

    /// The store client could not be constructed.
    #[error("invalid store configuration: {message}")]
    Configuration {
        /// Description of the configuration problem
        message: String,
    },
}

impl StoreError {
    /// Creates a transport error from a message.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport { message: message.into() }
    }

    /// Creates an encoding error from a message.
    pub fn encoding(message: impl Into<String>) -> Self {
        Self::Encoding { message: message.into() }
    }

    /// Creates a configuration error from a message.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration { message: message.into() }
    }

    /// Returns whether this error is the expected-absence case.
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Errors from the pub/sub notifier collaborator.
#[derive(Debug, Clone, Error)]
pub enum NotifyError {
    /// Transport-level failure reaching the notifier.
    #[error("notifier request failed: {message}")]
    Transport {
        /// Description of the transport failure
        message: String,
    },

    /// The notifier answered with a non-success status.
    #[error("notifier responded with HTTP {status}")]
    UnexpectedStatus {
        /// HTTP status code returned by the notifier
        status: u16,
    },

    /// The notifier client could not be constructed.
    #[error("invalid notifier configuration: {message}")]
    Configuration {
        /// Description of the configuration problem
        message: String,
    },
}

impl NotifyError {
    /// Creates a transport error from a message.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport { message: message.into() }
    }

    /// Creates a configuration error from a message.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration { message: message.into() }
    }
}
