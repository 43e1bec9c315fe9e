// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Per-call and per-store configuration.

use serde::Deserialize;

use crate::{DEFAULT_NAMESPACE, DEFAULT_TTL, KeyNamespace, Result, TtlPolicy, TtlSeconds};

/// Options accepted by a single write.
///
/// Callers without options pass [`WriteOptions::default()`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct WriteOptions {
    /// Overrides the store's default expiry for this write.
    pub ttl: Option<TtlSeconds>,
}

impl WriteOptions {
    /// Options overriding the expiry with `secs` seconds.
    ///
    /// # Examples
    ///
    /// ```
    /// use cache_store::{TtlSeconds, WriteOptions};
    ///
    /// assert_eq!(WriteOptions::with_ttl(30).ttl, Some(TtlSeconds::new(30)));
    /// ```
    #[must_use]
    pub fn with_ttl(secs: u64) -> Self {
        Self {
            ttl: Some(TtlSeconds::new(secs)),
        }
    }
}

/// Store-wide settings shared by every backend adapter.
///
/// Deserializes from configuration files with missing fields taking their defaults:
///
/// ```
/// use cache_store::StoreOptions;
///
/// let options: StoreOptions = serde_json::from_str(r#"{ "namespace": "http" }"#)?;
/// assert_eq!(options.namespace, "http");
/// assert_eq!(options.default_ttl.as_secs(), 300);
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StoreOptions {
    /// Prefix for every backend key.
    pub namespace: String,
    /// Expiry for writes that don't specify one.
    pub default_ttl: TtlSeconds,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_owned(),
            default_ttl: DEFAULT_TTL,
        }
    }
}

impl StoreOptions {
    /// Returns the key namespace described by these options.
    #[must_use]
    pub fn key_namespace(&self) -> KeyNamespace {
        KeyNamespace::new(self.namespace.clone())
    }

    /// Returns the TTL policy described by these options.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`](crate::Error::InvalidConfig) if the default TTL is zero.
    pub fn ttl_policy(&self) -> Result<TtlPolicy> {
        TtlPolicy::new(self.default_ttl)
    }
}
