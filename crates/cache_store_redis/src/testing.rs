// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! In-memory backend and sinks for testing.
//!
//! [`MemoryBackend`] behaves like a key-value store with expiry, records every call it receives
//! and can be told to fail calls on demand. [`RecordingSink`] collects reported failures, and
//! [`LogCapture`] collects `tracing` output.

use std::collections::HashMap;
use std::io::Write;
use std::sync::Arc;

use cache_store::{CacheKey, Error, Result, TtlSeconds};
use parking_lot::Mutex;
use tokio::sync::broadcast;
use tracing_subscriber::fmt::MakeWriter;

use crate::{Backend, BackendFault, ErrorSink, Operation};

const FAULT_CAPACITY: usize = 16;

/// Recorded backend call with full context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendOp {
    /// A get of the given key.
    Get(CacheKey),
    /// A set-with-expiry.
    SetWithExpiry {
        /// The key written.
        key: CacheKey,
        /// The expiry requested.
        ttl: TtlSeconds,
        /// The payload written.
        payload: String,
    },
    /// A delete of the given keys.
    Delete(Vec<CacheKey>),
    /// A key listing with the given pattern.
    Keys(CacheKey),
}

type FailPredicate = Box<dyn Fn(&BackendOp) -> bool + Send + Sync>;

#[derive(Debug, Clone, PartialEq, Eq)]
struct StoredPayload {
    payload: String,
    ttl: TtlSeconds,
}

/// A configurable in-memory backend for testing.
///
/// Clones share state, so a test can keep one handle while the store owns another.
///
/// # Examples
///
/// ```
/// use cache_store::{CacheKey, TtlSeconds};
/// use cache_store_redis::Backend;
/// use cache_store_redis::testing::{BackendOp, MemoryBackend};
///
/// # futures::executor::block_on(async {
/// let backend = MemoryBackend::new();
/// backend.fail_when(|op| matches!(op, BackendOp::Get(_)));
///
/// assert!(backend.get(&CacheKey::new("ns:a")).await.is_err());
/// assert!(backend.set_with_expiry(&CacheKey::new("ns:a"), TtlSeconds::new(5), "{}").await.is_ok());
/// # });
/// ```
pub struct MemoryBackend {
    data: Arc<Mutex<HashMap<CacheKey, StoredPayload>>>,
    operations: Arc<Mutex<Vec<BackendOp>>>,
    fail_when: Arc<Mutex<Option<FailPredicate>>>,
    faults: broadcast::Sender<BackendFault>,
}

impl std::fmt::Debug for MemoryBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryBackend")
            .field("data", &self.data)
            .field("operations", &self.operations)
            .field("fail_when", &self.fail_when.lock().is_some())
            .finish_non_exhaustive()
    }
}

impl Clone for MemoryBackend {
    fn clone(&self) -> Self {
        Self {
            data: Arc::clone(&self.data),
            operations: Arc::clone(&self.operations),
            fail_when: Arc::clone(&self.fail_when),
            faults: self.faults.clone(),
        }
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBackend {
    /// Creates an empty backend.
    #[must_use]
    pub fn new() -> Self {
        let (faults, _) = broadcast::channel(FAULT_CAPACITY);
        Self {
            data: Arc::new(Mutex::new(HashMap::new())),
            operations: Arc::new(Mutex::new(Vec::new())),
            fail_when: Arc::new(Mutex::new(None)),
            faults,
        }
    }

    /// Stores a raw payload without recording an operation.
    pub fn insert_raw(&self, key: impl Into<String>, payload: impl Into<String>, ttl: TtlSeconds) {
        self.data.lock().insert(
            CacheKey::new(key),
            StoredPayload {
                payload: payload.into(),
                ttl,
            },
        );
    }

    /// Returns the raw payload stored under `key`.
    #[must_use]
    pub fn payload(&self, key: &str) -> Option<String> {
        self.data.lock().get(&CacheKey::new(key)).map(|stored| stored.payload.clone())
    }

    /// Returns the expiry the payload under `key` was stored with.
    #[must_use]
    pub fn ttl(&self, key: &str) -> Option<TtlSeconds> {
        self.data.lock().get(&CacheKey::new(key)).map(|stored| stored.ttl)
    }

    /// Returns true if the backend holds `key`.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.data.lock().contains_key(&CacheKey::new(key))
    }

    /// Returns the number of stored keys.
    #[must_use]
    pub fn entry_count(&self) -> usize {
        self.data.lock().len()
    }

    /// Sets a predicate that decides which calls fail.
    pub fn fail_when<F>(&self, predicate: F)
    where
        F: Fn(&BackendOp) -> bool + Send + Sync + 'static,
    {
        *self.fail_when.lock() = Some(Box::new(predicate));
    }

    /// Clears the failure predicate, letting all calls succeed.
    pub fn clear_failures(&self) {
        *self.fail_when.lock() = None;
    }

    /// Returns a clone of all recorded calls.
    #[must_use]
    pub fn operations(&self) -> Vec<BackendOp> {
        self.operations.lock().clone()
    }

    /// Clears all recorded calls.
    pub fn clear_operations(&self) {
        self.operations.lock().clear();
    }

    /// Raises a connection-level fault. Returns the number of subscribers that received it.
    pub fn emit_fault(&self, message: &str) -> usize {
        self.faults.send(BackendFault::new(message)).unwrap_or(0)
    }

    /// Records `op` and fails it if the predicate says so.
    fn call(&self, op: BackendOp) -> Result<()> {
        let fail = self.fail_when.lock().as_ref().is_some_and(|predicate| predicate(&op));
        let description = match &op {
            BackendOp::Get(_) => "get",
            BackendOp::SetWithExpiry { .. } => "setex",
            BackendOp::Delete(_) => "del",
            BackendOp::Keys(_) => "keys",
        };
        self.operations.lock().push(op);
        if fail {
            return Err(Error::from_message(format!("mock: {description} failed")));
        }
        Ok(())
    }
}

impl Backend for MemoryBackend {
    async fn get(&self, key: &CacheKey) -> Result<Option<String>> {
        self.call(BackendOp::Get(key.clone()))?;
        Ok(self.data.lock().get(key).map(|stored| stored.payload.clone()))
    }

    async fn set_with_expiry(&self, key: &CacheKey, ttl: TtlSeconds, payload: &str) -> Result<()> {
        self.call(BackendOp::SetWithExpiry {
            key: key.clone(),
            ttl,
            payload: payload.to_owned(),
        })?;
        self.data.lock().insert(
            key.clone(),
            StoredPayload {
                payload: payload.to_owned(),
                ttl,
            },
        );
        Ok(())
    }

    async fn delete(&self, keys: &[CacheKey]) -> Result<()> {
        self.call(BackendOp::Delete(keys.to_vec()))?;
        let mut data = self.data.lock();
        for key in keys {
            data.remove(key);
        }
        Ok(())
    }

    async fn keys(&self, pattern: &CacheKey) -> Result<Vec<CacheKey>> {
        self.call(BackendOp::Keys(pattern.clone()))?;
        let mut keys: Vec<CacheKey> = self
            .data
            .lock()
            .keys()
            .filter(|key| glob_match(pattern.as_str(), key.as_str()))
            .cloned()
            .collect();
        keys.sort();
        Ok(keys)
    }

    fn faults(&self) -> Option<broadcast::Receiver<BackendFault>> {
        Some(self.faults.subscribe())
    }
}

#[derive(Clone, Copy, PartialEq)]
enum GlobToken {
    Any,
    One,
    Literal(char),
}

fn glob_tokens(pattern: &str) -> Vec<GlobToken> {
    let mut tokens = Vec::with_capacity(pattern.len());
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        tokens.push(match c {
            '*' => GlobToken::Any,
            '?' => GlobToken::One,
            '\\' => GlobToken::Literal(chars.next().unwrap_or('\\')),
            c => GlobToken::Literal(c),
        });
    }
    tokens
}

/// Matches `text` against a glob supporting `*`, `?` and backslash escapes, as Redis `KEYS`
/// does.
fn glob_match(pattern: &str, text: &str) -> bool {
    let pattern = glob_tokens(pattern);
    let text: Vec<char> = text.chars().collect();

    let (mut p, mut t) = (0, 0);
    let mut backtrack: Option<(usize, usize)> = None;

    while t < text.len() {
        match pattern.get(p) {
            Some(GlobToken::Any) => {
                backtrack = Some((p, t));
                p += 1;
            }
            Some(GlobToken::One) => {
                p += 1;
                t += 1;
            }
            Some(&GlobToken::Literal(c)) if c == text[t] => {
                p += 1;
                t += 1;
            }
            _ => match backtrack {
                Some((star, matched)) => {
                    p = star + 1;
                    t = matched + 1;
                    backtrack = Some((star, matched + 1));
                }
                None => return false,
            },
        }
    }

    pattern[p..].iter().all(|&token| token == GlobToken::Any)
}

/// An [`ErrorSink`] that keeps every message.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    messages: Arc<Mutex<Vec<String>>>,
}

impl RecordingSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a clone of all recorded messages.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().clone()
    }

    /// Returns true if any recorded message contains `needle`.
    #[must_use]
    pub fn contains(&self, needle: &str) -> bool {
        self.messages.lock().iter().any(|message| message.contains(needle))
    }
}

impl ErrorSink for RecordingSink {
    fn error(&self, _operation: Operation, message: &str) {
        self.messages.lock().push(message.to_owned());
    }
}

/// Log capture buffer for testing.
///
/// Uses `tracing_subscriber::fmt::MakeWriter` to capture formatted log output into a shared
/// buffer that can be inspected in tests.
#[derive(Debug, Clone, Default)]
pub struct LogCapture {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl LogCapture {
    /// Creates an empty capture buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the captured log output as a string.
    #[must_use]
    pub fn output(&self) -> String {
        String::from_utf8_lossy(&self.buffer.lock()).to_string()
    }

    /// Asserts that the captured log output contains the given string.
    ///
    /// # Panics
    ///
    /// Panics if `expected` was not logged.
    pub fn assert_contains(&self, expected: &str) {
        let output = self.output();
        assert!(
            output.contains(expected),
            "log output does not contain '{expected}', got:\n{output}"
        );
    }

    /// Creates a `tracing_subscriber` that writes to this capture buffer.
    /// Use with `set_default()` for thread-local capture.
    #[must_use]
    pub fn subscriber(&self) -> impl tracing::Subscriber {
        use tracing_subscriber::layer::SubscriberExt;
        tracing_subscriber::registry().with(tracing_subscriber::fmt::layer().with_writer(self.clone()).with_ansi(false))
    }
}

impl<'a> MakeWriter<'a> for LogCapture {
    type Writer = LogCaptureWriter;

    fn make_writer(&'a self) -> Self::Writer {
        LogCaptureWriter {
            buffer: Arc::clone(&self.buffer),
        }
    }
}

/// Writer that appends to a [`LogCapture`] buffer.
#[derive(Debug)]
pub struct LogCaptureWriter {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl Write for LogCaptureWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.buffer.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
