use std::sync::Arc;
use tokio::sync::watch;

use crate::domain::model::DashboardSummary;

/// Holds the latest published summary and notifies subscribers on change.
///
/// Readers only ever see whole snapshots; a refresh builds a new summary and
/// swaps it in with [`SummaryStore::publish`].
#[derive(Debug, Clone)]
pub struct SummaryStore {
    sender: Arc<watch::Sender<Arc<DashboardSummary>>>,
}

impl SummaryStore {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(Arc::new(DashboardSummary::default()));
        Self {
            sender: Arc::new(sender),
        }
    }

    pub fn current(&self) -> Arc<DashboardSummary> {
        self.sender.borrow().clone()
    }

    pub fn publish(&self, summary: DashboardSummary) -> Arc<DashboardSummary> {
        let summary = Arc::new(summary);
        self.sender.send_replace(summary.clone());
        summary
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<DashboardSummary>> {
        self.sender.subscribe()
    }
}

impl Default for SummaryStore {
    fn default() -> Self {
        Self::new()
    }
}
