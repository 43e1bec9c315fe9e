// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! Redis-backed cache store.
//!
//! This crate provides [`RedisCacheStore`], an adapter that implements the
//! [`CacheStore`](cache_store::CacheStore) contract on top of a key-value [`Backend`] with native
//! per-key expiry. [`RedisBackend`] is the production backend; anything else implementing
//! [`Backend`] works too.
//!
//! # Quick Start
//!
//! ```no_run
//! use cache_store::{CacheName, WriteOptions};
//! use cache_store_redis::{BackendOptions, RedisBackend, RedisCacheStore};
//!
//! # async fn example() -> cache_store::Result<()> {
//! let backend = RedisBackend::connect(&BackendOptions::default()).await?;
//! let store = RedisCacheStore::builder().namespace("http").build(backend)?;
//!
//! let name = CacheName::from("GET /users/1");
//! store.write(&name, &"cached body", WriteOptions::with_ttl(30)).await?;
//! let body: Option<String> = store.read(&name).await;
//! assert_eq!(body.as_deref(), Some("cached body"));
//! # Ok(())
//! # }
//! ```
//!
//! # Failure Policy
//!
//! - **Reads fail open**: a backend error is reported and the read returns `None`, exactly
//!   like a miss.
//! - **Mutations report and return**: a failed write, delete or clear is reported and also
//!   returned as an error. Callers using
//!   [`CacheStoreExt`](cache_store::CacheStoreExt) get a completion signal that only fires on
//!   success.
//! - **Clear never guesses**: if the keys of the namespace cannot be listed, nothing is
//!   deleted.
//!
//! Every failure goes through the store's [`ErrorReporter`], which logs through `tracing`
//! unless another [`ErrorSink`] is configured.

mod backend;
mod builder;
pub mod codec;
mod redis_backend;
mod reporter;
mod store;
mod subscription;
#[cfg(any(feature = "test-util", test))]
pub mod testing;

#[doc(inline)]
pub use backend::{Backend, BackendFault};
#[doc(inline)]
pub use builder::RedisCacheStoreBuilder;
#[doc(inline)]
pub use redis_backend::{BackendOptions, RedisBackend};
#[doc(inline)]
pub use reporter::{ErrorReporter, ErrorSink, Operation, TracingSink};
#[doc(inline)]
pub use store::RedisCacheStore;
