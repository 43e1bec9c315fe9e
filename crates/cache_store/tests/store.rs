// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Integration tests for `CacheStore` default methods and the callback-style extension.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use cache_store::{
    CacheName, CacheStore, CacheStoreExt, CompletionSignal, Error, KeyNamespace, Result, TtlPolicy, TtlSeconds, WriteOptions,
};
use parking_lot::Mutex;

/// Minimal store over a map that can be told to fail every mutation.
struct MinimalStore {
    namespace: KeyNamespace,
    ttl: TtlPolicy,
    data: Mutex<HashMap<String, (String, TtlSeconds)>>,
    failing: AtomicBool,
}

impl MinimalStore {
    fn new() -> Self {
        Self {
            namespace: KeyNamespace::new("test"),
            ttl: TtlPolicy::default(),
            data: Mutex::new(HashMap::new()),
            failing: AtomicBool::new(false),
        }
    }

    fn fail_mutations(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    fn check(&self) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(Error::from_message("store unavailable"));
        }
        Ok(())
    }

    fn ttl_of(&self, name: &str) -> Option<TtlSeconds> {
        let key = self.namespace.key(&CacheName::from(name));
        self.data.lock().get(key.as_str()).map(|(_, ttl)| *ttl)
    }
}

impl CacheStore<String> for MinimalStore {
    async fn read(&self, name: &CacheName) -> Option<String> {
        let key = self.namespace.key(name);
        self.data.lock().get(key.as_str()).map(|(value, _)| value.clone())
    }

    async fn write(&self, name: &CacheName, value: String, options: WriteOptions) -> Result<()> {
        self.check()?;
        let ttl = self.ttl.resolve(&options);
        self.data.lock().insert(self.namespace.key(name).into_string(), (value, ttl));
        Ok(())
    }

    async fn delete(&self, name: &CacheName) -> Result<()> {
        self.check()?;
        self.data.lock().remove(self.namespace.key(name).as_str());
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        self.check()?;
        self.data.lock().clear();
        Ok(())
    }
}

fn counting_signal() -> (CompletionSignal, Arc<AtomicUsize>) {
    let count = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&count);
    let signal = CompletionSignal::new(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    (signal, count)
}

#[tokio::test]
async fn default_cleanup_completes_immediately() {
    let store = MinimalStore::new();
    CacheStore::<String>::cleanup(&store).await.expect("cleanup should succeed");
}

#[tokio::test]
async fn cleanup_then_fires_signal() {
    let store = MinimalStore::new();
    let (signal, count) = counting_signal();
    CacheStoreExt::<String>::cleanup_then(&store, Some(signal)).await;
    assert_eq!(count.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn cleanup_then_without_signal_is_fine() {
    let store = MinimalStore::new();
    CacheStoreExt::<String>::cleanup_then(&store, None).await;
}

#[tokio::test]
async fn write_then_fires_once_on_success() {
    let store = MinimalStore::new();
    let name = CacheName::from("a");
    let (signal, count) = counting_signal();

    store.write_then(&name, "value".to_owned(), WriteOptions::default(), Some(signal)).await;

    assert_eq!(count.load(Ordering::SeqCst), 1);
    assert_eq!(CacheStore::<String>::read(&store, &name).await.as_deref(), Some("value"));
}

#[tokio::test]
async fn write_then_withholds_signal_on_failure() {
    let store = MinimalStore::new();
    store.fail_mutations();
    let (signal, count) = counting_signal();

    store
        .write_then(&CacheName::from("a"), "value".to_owned(), WriteOptions::default(), Some(signal))
        .await;

    assert_eq!(count.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn write_respects_ttl_resolution() {
    let store = MinimalStore::new();
    store
        .write(&CacheName::from("short"), "v".to_owned(), WriteOptions::with_ttl(30))
        .await
        .expect("write failed");
    store
        .write(&CacheName::from("default"), "v".to_owned(), WriteOptions::default())
        .await
        .expect("write failed");

    assert_eq!(store.ttl_of("short"), Some(TtlSeconds::new(30)));
    assert_eq!(store.ttl_of("default"), Some(TtlSeconds::new(300)));
}

#[tokio::test]
async fn delete_then_fires_for_missing_entry() {
    let store = MinimalStore::new();
    let (signal, count) = counting_signal();
    CacheStoreExt::<String>::delete_then(&store, &CacheName::from("never-written"), Some(signal)).await;
    assert_eq!(count.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn clear_then_withholds_signal_on_failure() {
    let store = MinimalStore::new();
    store.fail_mutations();
    let (signal, count) = counting_signal();
    CacheStoreExt::<String>::clear_then(&store, Some(signal)).await;
    assert_eq!(count.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn read_then_always_calls_back() {
    let store = MinimalStore::new();
    let seen = Arc::new(Mutex::new(Vec::new()));

    let sink = Arc::clone(&seen);
    store.read_then(&CacheName::from("missing"), move |value: Option<String>| sink.lock().push(value)).await;

    store
        .write(&CacheName::from("present"), "here".to_owned(), WriteOptions::default())
        .await
        .expect("write failed");
    let sink = Arc::clone(&seen);
    store.read_then(&CacheName::from("present"), move |value: Option<String>| sink.lock().push(value)).await;

    assert_eq!(*seen.lock(), vec![None, Some("here".to_owned())]);
}
