// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::fmt;

use crate::{CacheName, CacheStore, Result, WriteOptions};

/// A one-shot notification that an operation completed successfully.
///
/// The signal is consumed when fired, so it can fire at most once. Dropping it unfired is how
/// a failed operation withholds completion.
///
/// # Examples
///
/// ```
/// use cache_store::CompletionSignal;
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::sync::Arc;
///
/// let fired = Arc::new(AtomicUsize::new(0));
/// let counter = Arc::clone(&fired);
/// let signal = CompletionSignal::new(move || {
///     counter.fetch_add(1, Ordering::SeqCst);
/// });
///
/// signal.fire();
/// assert_eq!(fired.load(Ordering::SeqCst), 1);
/// ```
pub struct CompletionSignal(Box<dyn FnOnce() + Send>);

impl CompletionSignal {
    /// Wraps `callback` as a completion signal.
    pub fn new(callback: impl FnOnce() + Send + 'static) -> Self {
        Self(Box::new(callback))
    }

    /// Fires the signal.
    pub fn fire(self) {
        (self.0)();
    }

    fn settle(signal: Option<Self>, outcome: &Result<()>) {
        if outcome.is_ok()
            && let Some(signal) = signal
        {
            signal.fire();
        }
    }
}

impl fmt::Debug for CompletionSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompletionSignal").finish_non_exhaustive()
    }
}

/// Callback-style operations for every [`CacheStore`].
///
/// Mutations take an optional [`CompletionSignal`] that fires only if the operation
/// succeeded. Failures never reach the signal; the store has already reported them.
///
/// # Examples
///
/// ```
/// use cache_store::{CacheName, CacheStore, CacheStoreExt, CompletionSignal, Result, WriteOptions};
///
/// struct NullStore;
///
/// impl CacheStore<u32> for NullStore {
///     async fn read(&self, _name: &CacheName) -> Option<u32> {
///         None
///     }
///     async fn write(&self, _name: &CacheName, _value: u32, _options: WriteOptions) -> Result<()> {
///         Ok(())
///     }
///     async fn delete(&self, _name: &CacheName) -> Result<()> {
///         Ok(())
///     }
///     async fn clear(&self) -> Result<()> {
///         Ok(())
///     }
/// }
///
/// # futures::executor::block_on(async {
/// let store = NullStore;
/// let (tx, rx) = std::sync::mpsc::channel();
/// CacheStoreExt::<u32>::cleanup_then(&store, Some(CompletionSignal::new(move || tx.send(()).unwrap()))).await;
/// assert!(rx.try_recv().is_ok());
/// # });
/// ```
pub trait CacheStoreExt<V>: CacheStore<V> {
    /// Reads `name` and hands the result to `callback`, which is always called exactly once.
    fn read_then<F>(&self, name: &CacheName, callback: F) -> impl Future<Output = ()> + Send
    where
        F: FnOnce(Option<V>) + Send,
    {
        async move { callback(self.read(name).await) }
    }

    /// Writes `value` and fires `done` if the write succeeded.
    fn write_then(
        &self,
        name: &CacheName,
        value: V,
        options: WriteOptions,
        done: Option<CompletionSignal>,
    ) -> impl Future<Output = ()> + Send
    where
        V: Send,
    {
        async move {
            let outcome = self.write(name, value, options).await;
            CompletionSignal::settle(done, &outcome);
        }
    }

    /// Deletes `name` and fires `done` if the delete succeeded.
    fn delete_then(&self, name: &CacheName, done: Option<CompletionSignal>) -> impl Future<Output = ()> + Send {
        async move {
            let outcome = self.delete(name).await;
            CompletionSignal::settle(done, &outcome);
        }
    }

    /// Clears the store and fires `done` if the clear succeeded.
    fn clear_then(&self, done: Option<CompletionSignal>) -> impl Future<Output = ()> + Send {
        async move {
            let outcome = self.clear().await;
            CompletionSignal::settle(done, &outcome);
        }
    }

    /// Runs cleanup and fires `done` if it succeeded.
    fn cleanup_then(&self, done: Option<CompletionSignal>) -> impl Future<Output = ()> + Send {
        async move {
            let outcome = self.cleanup().await;
            CompletionSignal::settle(done, &outcome);
        }
    }
}

impl<V, S> CacheStoreExt<V> for S where S: CacheStore<V> + ?Sized {}
