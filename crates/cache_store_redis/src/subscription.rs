// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use tokio::runtime::Handle;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;

use crate::{BackendFault, ErrorReporter, Operation};

/// Forwards a backend's connection faults to an [`ErrorReporter`] until dropped.
#[derive(Debug)]
pub(crate) struct FaultSubscription {
    listener: JoinHandle<()>,
}

impl FaultSubscription {
    /// Starts listening on the current tokio runtime.
    ///
    /// Returns `None` outside of a runtime; faults then go unreported.
    pub(crate) fn start(mut faults: broadcast::Receiver<BackendFault>, reporter: ErrorReporter) -> Option<Self> {
        let Ok(runtime) = Handle::try_current() else {
            tracing::warn!("no tokio runtime, backend connection faults will not be reported");
            return None;
        };

        let listener = runtime.spawn(async move {
            loop {
                match faults.recv().await {
                    Ok(fault) => reporter.report(Operation::Connection, &fault),
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "backend fault listener fell behind");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        });

        Some(Self { listener })
    }
}

impl Drop for FaultSubscription {
    fn drop(&mut self) {
        self.listener.abort();
    }
}
