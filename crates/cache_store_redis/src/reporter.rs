// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Error reporting for non-fatal backend failures.

use std::fmt;
use std::sync::Arc;

const PREFIX: &str = "[RedisCacheStore]";

/// The store operation a reported failure belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    /// A read.
    Read,
    /// A write.
    Write,
    /// A single-key delete.
    Delete,
    /// A namespace-wide clear, listing or deleting.
    Clear,
    /// A connection-level fault not tied to any call.
    Connection,
}

impl Operation {
    /// Returns the operation tag used in reported messages.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Write => "write",
            Self::Delete => "delete",
            Self::Clear => "clear",
            Self::Connection => "connection",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Destination for reported failures.
pub trait ErrorSink: Send + Sync {
    /// Records a formatted failure message for `operation`.
    fn error(&self, operation: Operation, message: &str);
}

/// Sink emitting each failure as a `tracing` error event with a `cache.operation` field.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl ErrorSink for TracingSink {
    fn error(&self, operation: Operation, message: &str) {
        tracing::event!(target: "cache_store_redis", tracing::Level::ERROR, cache.operation = %operation, "{message}");
    }
}

/// Funnels backend failures to an [`ErrorSink`].
///
/// Reporting never fails and never changes the outcome of the operation being reported. A
/// reporter without a sink discards everything.
///
/// # Examples
///
/// ```
/// use cache_store_redis::{ErrorReporter, ErrorSink, Operation};
/// use std::sync::{Arc, Mutex};
///
/// #[derive(Default)]
/// struct Collect(Mutex<Vec<String>>);
///
/// impl ErrorSink for Collect {
///     fn error(&self, _operation: Operation, message: &str) {
///         self.0.lock().unwrap().push(message.to_owned());
///     }
/// }
///
/// let sink = Arc::new(Collect::default());
/// let reporter = ErrorReporter::new(Arc::clone(&sink) as Arc<dyn ErrorSink>);
/// reporter.report(Operation::Write, &"connection reset");
///
/// assert_eq!(sink.0.lock().unwrap()[0], "[RedisCacheStore] #write connection reset");
/// ```
#[derive(Clone)]
pub struct ErrorReporter {
    sink: Option<Arc<dyn ErrorSink>>,
}

impl Default for ErrorReporter {
    fn default() -> Self {
        Self::new(Arc::new(TracingSink))
    }
}

impl ErrorReporter {
    /// Creates a reporter forwarding to `sink`.
    #[must_use]
    pub fn new(sink: Arc<dyn ErrorSink>) -> Self {
        Self { sink: Some(sink) }
    }

    /// Creates a reporter that discards every failure.
    #[must_use]
    pub fn silent() -> Self {
        Self { sink: None }
    }

    /// Reports `error` as a failure of `operation`.
    pub fn report(&self, operation: Operation, error: &dyn fmt::Display) {
        if let Some(sink) = &self.sink {
            sink.error(operation, &format!("{PREFIX} #{operation} {error}"));
        }
    }
}

impl fmt::Debug for ErrorReporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErrorReporter").field("sink", &self.sink.is_some()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{LogCapture, RecordingSink};

    #[test]
    fn operation_as_str() {
        assert_eq!(Operation::Read.as_str(), "read");
        assert_eq!(Operation::Write.as_str(), "write");
        assert_eq!(Operation::Delete.as_str(), "delete");
        assert_eq!(Operation::Clear.as_str(), "clear");
        assert_eq!(Operation::Connection.as_str(), "connection");
    }

    #[test]
    fn report_tags_message_with_operation() {
        let sink = RecordingSink::new();
        let reporter = ErrorReporter::new(Arc::new(sink.clone()));

        reporter.report(Operation::Delete, &"boom");

        assert_eq!(sink.messages(), vec!["[RedisCacheStore] #delete boom".to_owned()]);
    }

    #[test]
    fn silent_reporter_is_a_no_op() {
        let reporter = ErrorReporter::silent();
        reporter.report(Operation::Read, &"ignored");
        assert!(format!("{reporter:?}").contains("false"));
    }

    #[test]
    fn default_reporter_logs_through_tracing() {
        let capture = LogCapture::new();
        let _guard = tracing::subscriber::set_default(capture.subscriber());

        ErrorReporter::default().report(Operation::Clear, &"listing failed");

        capture.assert_contains("ERROR");
        capture.assert_contains("cache.operation=clear");
        capture.assert_contains("[RedisCacheStore] #clear listing failed");
    }
}
