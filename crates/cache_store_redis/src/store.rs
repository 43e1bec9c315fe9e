// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The Redis cache store adapter.

use std::sync::Arc;

use cache_store::{CacheName, CacheStore, KeyNamespace, Lookup, Result, TtlPolicy, TtlSeconds, WriteOptions};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::builder::RedisCacheStoreBuilder;
use crate::subscription::FaultSubscription;
use crate::{Backend, ErrorReporter, Operation, RedisBackend, codec};

/// A cache store keeping its entries in a key-value [`Backend`].
///
/// The store is stateless between calls: each operation derives its key and TTL, makes one
/// backend round trip (two for [`clear`](Self::clear)) and reports any failure. Clones share
/// the backend handle and the fault subscription.
///
/// Operations are generic over the value type, so one store can hold values of different
/// types under different names. Through the [`CacheStore`] trait the value type is fixed per
/// use site.
///
/// # Examples
///
/// ```
/// use cache_store::{CacheName, WriteOptions};
/// use cache_store_redis::RedisCacheStore;
/// use cache_store_redis::testing::MemoryBackend;
///
/// # futures::executor::block_on(async {
/// let store = RedisCacheStore::builder().namespace("docs").silent().build(MemoryBackend::new())?;
///
/// let name = CacheName::from("answer");
/// store.write(&name, &42, WriteOptions::default()).await?;
/// assert_eq!(store.read::<i32>(&name).await, Some(42));
///
/// store.delete(&name).await?;
/// assert_eq!(store.read::<i32>(&name).await, None);
/// # Ok::<(), cache_store::Error>(())
/// # });
/// ```
#[derive(Debug)]
pub struct RedisCacheStore<B = RedisBackend> {
    backend: Arc<B>,
    namespace: KeyNamespace,
    ttl: TtlPolicy,
    reporter: ErrorReporter,
    faults: Option<Arc<FaultSubscription>>,
}

impl<B> Clone for RedisCacheStore<B> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            namespace: self.namespace.clone(),
            ttl: self.ttl,
            reporter: self.reporter.clone(),
            faults: self.faults.clone(),
        }
    }
}

impl RedisCacheStore {
    /// Creates a new builder for configuring a store.
    #[must_use]
    pub fn builder() -> RedisCacheStoreBuilder {
        RedisCacheStoreBuilder::new()
    }
}

impl<B: Backend> RedisCacheStore<B> {
    pub(crate) fn from_parts(backend: B, namespace: KeyNamespace, ttl: TtlPolicy, reporter: ErrorReporter) -> Self {
        let faults = backend
            .faults()
            .and_then(|faults| FaultSubscription::start(faults, reporter.clone()))
            .map(Arc::new);

        Self {
            backend: Arc::new(backend),
            namespace,
            ttl,
            reporter,
            faults,
        }
    }

    /// Returns the backend this store delegates to.
    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Returns the key namespace of this store.
    #[must_use]
    pub fn namespace(&self) -> &KeyNamespace {
        &self.namespace
    }

    /// Returns the expiry applied to writes without their own TTL.
    #[must_use]
    pub fn default_ttl(&self) -> TtlSeconds {
        self.ttl.default_ttl()
    }

    /// Reads the value stored under `name`.
    ///
    /// Fails open: a backend error or an unreadable payload is reported and returns `None`.
    pub async fn read<V>(&self, name: &CacheName) -> Option<V>
    where
        V: DeserializeOwned,
    {
        let key = self.namespace.key(name);
        let payload = match self.backend.get(&key).await {
            Ok(payload) => payload,
            Err(error) => {
                self.reporter.report(Operation::Read, &error);
                return None;
            }
        };

        match codec::decode(payload.as_deref()) {
            Ok(Lookup::Present(value)) => {
                tracing::debug!(cache.key = %key, "cache hit");
                Some(value)
            }
            Ok(Lookup::Absent) => {
                tracing::debug!(cache.key = %key, "cache miss");
                None
            }
            Err(error) => {
                self.reporter.report(Operation::Read, &error);
                None
            }
        }
    }

    /// Stores `value` under `name` with the TTL resolved from `options`.
    ///
    /// # Errors
    ///
    /// Returns the encoding or backend error, after reporting it.
    pub async fn write<V>(&self, name: &CacheName, value: &V, options: WriteOptions) -> Result<()>
    where
        V: Serialize + ?Sized,
    {
        let ttl = self.ttl.resolve(&options);
        let key = self.namespace.key(name);
        let payload = codec::encode(value).inspect_err(|error| self.reporter.report(Operation::Write, error))?;

        self.backend
            .set_with_expiry(&key, ttl, &payload)
            .await
            .inspect_err(|error| self.reporter.report(Operation::Write, error))
    }

    /// Removes the value stored under `name`. Removing a missing entry succeeds.
    ///
    /// # Errors
    ///
    /// Returns the backend error, after reporting it.
    pub async fn delete(&self, name: &CacheName) -> Result<()> {
        let key = self.namespace.key(name);
        self.backend
            .delete(std::slice::from_ref(&key))
            .await
            .inspect_err(|error| self.reporter.report(Operation::Delete, error))
    }

    /// Does nothing: the backend expires entries on its own.
    ///
    /// # Errors
    ///
    /// Never fails.
    pub fn cleanup(&self) -> impl Future<Output = Result<()>> + Send {
        std::future::ready(Ok(()))
    }

    /// Removes every key in this store's namespace.
    ///
    /// The keys are listed first and exactly the listed keys are deleted. If listing fails,
    /// nothing is deleted.
    ///
    /// # Errors
    ///
    /// Returns the listing or delete error, after reporting it.
    pub async fn clear(&self) -> Result<()> {
        let pattern = self.namespace.wildcard();
        let keys = self
            .backend
            .keys(&pattern)
            .await
            .inspect_err(|error| self.reporter.report(Operation::Clear, error))?;

        tracing::debug!(cache.pattern = %pattern, count = keys.len(), "clearing namespace");

        self.backend
            .delete(&keys)
            .await
            .inspect_err(|error| self.reporter.report(Operation::Clear, error))
    }
}

impl<B, V> CacheStore<V> for RedisCacheStore<B>
where
    B: Backend,
    V: Serialize + DeserializeOwned + Send + Sync,
{
    async fn read(&self, name: &CacheName) -> Option<V> {
        Self::read(self, name).await
    }

    async fn write(&self, name: &CacheName, value: V, options: WriteOptions) -> Result<()> {
        Self::write(self, name, &value, options).await
    }

    async fn delete(&self, name: &CacheName) -> Result<()> {
        Self::delete(self, name).await
    }

    async fn clear(&self) -> Result<()> {
        Self::clear(self).await
    }

    async fn cleanup(&self) -> Result<()> {
        Self::cleanup(self).await
    }
}
