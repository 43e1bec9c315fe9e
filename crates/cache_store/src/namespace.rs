// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::{CacheKey, CacheName};

/// Namespace used when none is configured.
pub const DEFAULT_NAMESPACE: &str = "mappersmith_cache";

const SEPARATOR: char = ':';
const MATCH_ALL: char = '*';
const GLOB_SPECIAL: [char; 5] = ['*', '?', '[', ']', '\\'];

/// Derives fully-qualified backend keys from logical cache names.
///
/// Every key is `<namespace>:<name>`, so one namespace maps names to keys one-to-one and
/// keeps them apart from unrelated keys living in the same backend.
///
/// # Examples
///
/// ```
/// use cache_store::{CacheName, KeyNamespace};
///
/// let namespace = KeyNamespace::new("http");
/// assert_eq!(namespace.key(&CacheName::from("users")).as_str(), "http:users");
/// assert_eq!(namespace.wildcard().as_str(), "http:*");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyNamespace {
    prefix: String,
}

impl Default for KeyNamespace {
    fn default() -> Self {
        Self::new(DEFAULT_NAMESPACE)
    }
}

impl KeyNamespace {
    /// Creates a namespace with the given prefix.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self { prefix: prefix.into() }
    }

    /// Returns the namespace prefix.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Returns the backend key for `name`.
    #[must_use]
    pub fn key(&self, name: &CacheName) -> CacheKey {
        self.join(name.as_str())
    }

    /// Returns the glob pattern matching every key in this namespace, and only those.
    ///
    /// Glob metacharacters in the prefix are backslash-escaped, so a prefix such as `v[1]`
    /// can't match keys of another namespace.
    #[must_use]
    pub fn wildcard(&self) -> CacheKey {
        let mut pattern = String::with_capacity(self.prefix.len() * 2 + 2);
        for c in self.prefix.chars() {
            if GLOB_SPECIAL.contains(&c) {
                pattern.push('\\');
            }
            pattern.push(c);
        }
        pattern.push(SEPARATOR);
        pattern.push(MATCH_ALL);
        CacheKey::new(pattern)
    }

    fn join(&self, suffix: &str) -> CacheKey {
        let mut key = String::with_capacity(self.prefix.len() + 1 + suffix.len());
        key.push_str(&self.prefix);
        key.push(SEPARATOR);
        key.push_str(suffix);
        CacheKey::new(key)
    }
}
