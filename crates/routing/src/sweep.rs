//! Bulk rejection of every pending request.

use {
    handoff_channels::ResultNotifier,
    handoff_common::ConnectionRequestResult,
    tracing::{info, warn},
};

#[cfg(feature = "metrics")]
use handoff_metrics::{counter, labels, routing as routing_metrics};

use crate::resolve::ConnectionResolver;

impl ConnectionResolver {
    /// Reject every request pending at the moment of the call and hand each
    /// result to `notifier`, in request order.
    ///
    /// Returns `false` when there was nothing to reject. Individual failures
    /// do not stop the sweep and do not change the return value.
    pub async fn reject_all_pending(&self, notifier: &dyn ResultNotifier) -> bool {
        let results = self.reject_all_pending_results().await;
        if results.is_empty() {
            return false;
        }
        for result in &results {
            notifier.notify(result).await;
        }
        true
    }

    /// Reject every request in a snapshot of the pending set and return the
    /// per-request results in order. Requests arriving after the snapshot are
    /// left alone.
    pub async fn reject_all_pending_results(&self) -> Vec<ConnectionRequestResult> {
        let snapshot = match self.store.pending_requests().await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(error = %e, "could not snapshot pending requests for rejection");
                return Vec::new();
            },
        };
        if snapshot.is_empty() {
            return Vec::new();
        }

        let mut results = Vec::with_capacity(snapshot.len());
        for request in &snapshot {
            results.push(self.store.reject_request(&request.requestor, None).await);
        }

        let failed = results.iter().filter(|r| r.is_error()).count();
        info!(
            total = results.len(),
            failed, "rejected all pending connection requests"
        );
        #[cfg(feature = "metrics")]
        {
            counter!(routing_metrics::SWEEPS_TOTAL).increment(1);
            for requestor in results.iter().filter_map(ConnectionRequestResult::requestor) {
                counter!(
                    routing_metrics::REQUESTS_REJECTED_TOTAL,
                    labels::CHANNEL => requestor.channel_id.clone()
                )
                .increment(1);
            }
        }
        results
    }
}
