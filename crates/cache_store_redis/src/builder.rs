// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Builder for configuring Redis cache stores.

use std::sync::Arc;

use cache_store::{Result, StoreOptions, TtlSeconds};

use crate::{Backend, ErrorReporter, ErrorSink, RedisCacheStore};

/// Builder for configuring a [`RedisCacheStore`].
///
/// # Examples
///
/// ```
/// use cache_store_redis::RedisCacheStore;
/// use cache_store_redis::testing::{MemoryBackend, RecordingSink};
///
/// let store = RedisCacheStore::builder()
///     .namespace("http")
///     .default_ttl(60)
///     .logger(RecordingSink::new())
///     .build(MemoryBackend::new())?;
///
/// assert_eq!(store.namespace().prefix(), "http");
/// assert_eq!(store.default_ttl().as_secs(), 60);
/// # Ok::<(), cache_store::Error>(())
/// ```
#[derive(Debug, Default)]
pub struct RedisCacheStoreBuilder {
    options: StoreOptions,
    reporter: ErrorReporter,
}

impl RedisCacheStoreBuilder {
    /// Creates a builder with the default namespace, a five minute default TTL and
    /// failures logged through `tracing`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces all store-wide settings at once, e.g. with options loaded from configuration.
    #[must_use]
    pub fn options(mut self, options: StoreOptions) -> Self {
        self.options = options;
        self
    }

    /// Sets the prefix every key is stored under.
    #[must_use]
    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.options.namespace = namespace.into();
        self
    }

    /// Sets the expiry, in seconds, of writes that don't specify one.
    #[must_use]
    pub fn default_ttl(mut self, secs: u64) -> Self {
        self.options.default_ttl = TtlSeconds::new(secs);
        self
    }

    /// Sends reported failures to `sink` instead of `tracing`.
    #[must_use]
    pub fn logger(mut self, sink: impl ErrorSink + 'static) -> Self {
        self.reporter = ErrorReporter::new(Arc::new(sink));
        self
    }

    /// Discards reported failures.
    #[must_use]
    pub fn silent(mut self) -> Self {
        self.reporter = ErrorReporter::silent();
        self
    }

    /// Builds a store over `backend`.
    ///
    /// When called inside a tokio runtime, the store also subscribes to the backend's
    /// connection faults and reports them until its last clone is dropped.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`](cache_store::Error::InvalidConfig) if the default TTL is
    /// zero.
    pub fn build<B: Backend>(self, backend: B) -> Result<RedisCacheStore<B>> {
        let ttl = self.options.ttl_policy()?;
        let namespace = self.options.key_namespace();
        Ok(RedisCacheStore::from_parts(backend, namespace, ttl, self.reporter))
    }
}
