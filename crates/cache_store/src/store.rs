// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The core trait for cache store adapters.
//!
//! [`CacheStore`] is the contract a higher-level caching layer programs against. Adapters
//! implement it for one storage backend and own the failure policy: reads never fail, while
//! mutations report what went wrong.

use crate::{CacheName, Result, WriteOptions};

/// Trait for cache store implementations.
///
/// `read`, `write`, `delete` and `clear` are required. `cleanup` defaults to a no-op that
/// completes immediately, which suits any backend that expires entries on its own.
///
/// Every method resolves exactly once; resolving is the operation's completion.
pub trait CacheStore<V>: Send + Sync {
    /// Reads the value stored under `name`.
    ///
    /// Returns `None` when nothing is stored. Implementations fail open: a backend failure is
    /// reported and surfaces as `None` rather than as an error.
    fn read(&self, name: &CacheName) -> impl Future<Output = Option<V>> + Send;

    /// Stores `value` under `name`, expiring it according to `options`.
    fn write(&self, name: &CacheName, value: V, options: WriteOptions) -> impl Future<Output = Result<()>> + Send;

    /// Removes the value stored under `name`. Removing a missing entry succeeds.
    fn delete(&self, name: &CacheName) -> impl Future<Output = Result<()>> + Send;

    /// Removes every entry owned by this store, leaving unrelated backend keys alone.
    fn clear(&self) -> impl Future<Output = Result<()>> + Send;

    /// Sweeps expired entries.
    fn cleanup(&self) -> impl Future<Output = Result<()>> + Send {
        async { Ok(()) }
    }
}
