// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::fmt;

/// A logical cache entry name supplied by the caller.
///
/// Names are opaque: the store never interprets them beyond prefixing them with its namespace.
///
/// # Examples
///
/// ```
/// use cache_store::CacheName;
///
/// let name = CacheName::from("GET /users/1");
/// assert_eq!(name.as_str(), "GET /users/1");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheName(String);

impl CacheName {
    /// Creates a cache name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CacheName {
    fn from(name: &str) -> Self {
        Self(name.to_owned())
    }
}

impl From<String> for CacheName {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl fmt::Display for CacheName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A fully-qualified backend key.
///
/// Keys are produced by [`KeyNamespace`](crate::KeyNamespace) for every operation and are
/// never stored on their own. Backends also hand keys back from pattern listings.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(String);

impl CacheKey {
    /// Wraps a raw backend key.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Returns the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the key and returns the inner string.
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
