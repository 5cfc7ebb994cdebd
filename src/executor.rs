use std::sync::Arc;
use std::time::Duration;

use tokio::time::timeout;

use crate::classifier::{Status, classify};
use crate::probe::{Probe, ProbeContext};
use crate::report::ProbeResult;

/// Runs batches of probes concurrently against a shared context.
#[derive(Clone)]
pub struct Executor {
    context: Arc<ProbeContext>,
}

impl Executor {
    pub fn new(context: ProbeContext) -> Self {
        Executor {
            context: Arc::new(context),
        }
    }

    /// Run every probe of `batch` at once and return one result per probe, in batch order.
    ///
    /// Each probe is bounded by `deadline`; a probe still running when it fires is dropped,
    /// which releases its sockets, and reported with its family's timeout outcome.
    /// No probe failure escapes as an error.
    pub async fn run(&self, batch: &[Probe], deadline: Duration) -> Vec<ProbeResult> {
        let mut handles = Vec::with_capacity(batch.len());

        for probe in batch {
            let probe = probe.clone();
            let context = Arc::clone(&self.context);

            let handle = tokio::spawn(async move {
                let outcome = match timeout(deadline, probe.execute(&context, deadline)).await {
                    Ok(outcome) => outcome,
                    Err(_) => probe.timed_out(),
                };
                classify(&outcome)
            });

            handles.push(handle);
        }

        let mut results = Vec::with_capacity(batch.len());
        for (probe, handle) in batch.iter().zip(handles) {
            let result = match handle.await {
                Ok((status, details)) => ProbeResult::new(probe, status, details),
                Err(e) => {
                    tracing::error!("Probe task for {} failed: {e}", probe.address());
                    let details = if e.is_panic() {
                        "Probe panicked"
                    } else {
                        "Probe cancelled"
                    };
                    ProbeResult::new(probe, Status::Fail, details)
                }
            };
            results.push(result);
        }

        results
    }
}
