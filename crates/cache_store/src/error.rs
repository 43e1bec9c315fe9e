// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Error types for cache store operations.

/// Boxed error type produced by backend clients.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// An error from a cache store operation.
///
/// Backend failures are kept opaque: use [`std::error::Error::source()`] to reach the
/// underlying client error if needed.
///
/// # Example
///
/// ```
/// use cache_store::Error;
///
/// let error = Error::from_message("connection reset");
/// assert!(error.to_string().contains("connection reset"));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The backend rejected or failed to complete a call.
    #[error("backend error: {0}")]
    Backend(#[source] BoxError),

    /// A value could not be encoded into, or decoded from, the stored envelope.
    #[error("codec error: {0}")]
    Codec(#[from] serde_json::Error),

    /// The store was configured with values it cannot honour.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    /// Creates a backend error from any type that can be converted to an error.
    ///
    /// This is the public API for creating cache store errors from backend crates.
    ///
    /// # Examples
    ///
    /// ```
    /// use cache_store::Error;
    ///
    /// let error = Error::from_message("operation failed");
    /// assert!(matches!(error, Error::Backend(_)));
    /// ```
    pub fn from_message(cause: impl Into<BoxError>) -> Self {
        Self::Backend(cause.into())
    }

    /// Returns `true` if this error originated in the backend.
    #[must_use]
    pub fn is_backend(&self) -> bool {
        matches!(self, Self::Backend(_))
    }
}

/// A specialized [`Result`] type for cache store operations.
pub type Result<T> = std::result::Result<T, Error>;
