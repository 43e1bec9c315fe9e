// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! Core cache store abstractions for building backend adapters.
//!
//! This crate defines the [`CacheStore`] trait that a backend adapter implements on behalf of a
//! higher-level caching layer (for example an HTTP client's response cache), along with the
//! shared policy pieces every adapter consumes:
//!
//! - [`KeyNamespace`] turns a logical [`CacheName`] into a fully-qualified [`CacheKey`].
//! - [`TtlPolicy`] resolves the expiry for a write from [`WriteOptions`] or a configured default.
//! - [`Lookup`] keeps "stored a falsy value" and "nothing stored" apart.
//! - [`CompletionSignal`] and [`CacheStoreExt`] offer the callback-style completion contract.
//!
//! # Implementing a Cache Store
//!
//! ```
//! use cache_store::{CacheName, CacheStore, KeyNamespace, Result, TtlPolicy, WriteOptions};
//! use std::collections::HashMap;
//! use std::sync::RwLock;
//!
//! struct SimpleStore {
//!     namespace: KeyNamespace,
//!     ttl: TtlPolicy,
//!     data: RwLock<HashMap<String, String>>,
//! }
//!
//! impl CacheStore<String> for SimpleStore {
//!     async fn read(&self, name: &CacheName) -> Option<String> {
//!         let key = self.namespace.key(name);
//!         self.data.read().ok()?.get(key.as_str()).cloned()
//!     }
//!
//!     async fn write(&self, name: &CacheName, value: String, options: WriteOptions) -> Result<()> {
//!         let _ttl = self.ttl.resolve(&options);
//!         let key = self.namespace.key(name);
//!         if let Ok(mut data) = self.data.write() {
//!             data.insert(key.into_string(), value);
//!         }
//!         Ok(())
//!     }
//!
//!     async fn delete(&self, name: &CacheName) -> Result<()> {
//!         let key = self.namespace.key(name);
//!         if let Ok(mut data) = self.data.write() {
//!             data.remove(key.as_str());
//!         }
//!         Ok(())
//!     }
//!
//!     async fn clear(&self) -> Result<()> {
//!         if let Ok(mut data) = self.data.write() {
//!             data.clear();
//!         }
//!         Ok(())
//!     }
//! }
//! ```

mod completion;
pub mod error;
mod lookup;
mod name;
mod namespace;
pub mod options;
pub(crate) mod store;
mod ttl;

#[doc(inline)]
pub use completion::{CacheStoreExt, CompletionSignal};
#[doc(inline)]
pub use error::{BoxError, Error, Result};
#[doc(inline)]
pub use lookup::Lookup;
#[doc(inline)]
pub use name::{CacheKey, CacheName};
#[doc(inline)]
pub use namespace::{DEFAULT_NAMESPACE, KeyNamespace};
#[doc(inline)]
pub use options::{StoreOptions, WriteOptions};
#[doc(inline)]
pub use store::CacheStore;
#[doc(inline)]
pub use ttl::{DEFAULT_TTL, TtlPolicy, TtlSeconds};
