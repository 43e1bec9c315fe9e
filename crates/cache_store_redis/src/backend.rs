// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The key-value backend a store delegates storage to.

use std::fmt;

use cache_store::{CacheKey, Result, TtlSeconds};
use tokio::sync::broadcast;

/// A key-value backend with native per-key expiry.
///
/// The store owns no connection state of its own: it receives a backend at construction and
/// calls it for every operation. Backends handle their own transport, reconnects and timeouts.
pub trait Backend: Send + Sync {
    /// Fetches the payload stored under `key`, or `None` if the key doesn't exist.
    fn get(&self, key: &CacheKey) -> impl Future<Output = Result<Option<String>>> + Send;

    /// Stores `payload` under `key`, expiring it after `ttl`.
    fn set_with_expiry(&self, key: &CacheKey, ttl: TtlSeconds, payload: &str) -> impl Future<Output = Result<()>> + Send;

    /// Deletes `keys`. Missing keys are ignored and an empty slice succeeds without a round trip.
    fn delete(&self, keys: &[CacheKey]) -> impl Future<Output = Result<()>> + Send;

    /// Lists the keys matching a glob `pattern` such as `namespace:*`.
    fn keys(&self, pattern: &CacheKey) -> impl Future<Output = Result<Vec<CacheKey>>> + Send;

    /// Subscribes to connection-level faults raised outside of any single call.
    ///
    /// Returns `None` for backends that never raise such faults.
    fn faults(&self) -> Option<broadcast::Receiver<BackendFault>> {
        None
    }
}

/// A connection-level fault raised by a backend.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BackendFault {
    message: String,
}

impl BackendFault {
    /// Creates a fault with a human-readable description.
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }

    /// Returns the fault description.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for BackendFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}
