// Source feed - publishes whole snapshots of the user's collections to subscribers
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::application::settings_repository::SourceRepository;
use crate::domain::snapshot::SourceSnapshot;

#[derive(Clone)]
pub struct SourceFeed {
    tx: Arc<watch::Sender<Arc<SourceSnapshot>>>,
}

impl Default for SourceFeed {
    fn default() -> Self {
        Self::new(SourceSnapshot::default())
    }
}

impl SourceFeed {
    pub fn new(initial: SourceSnapshot) -> Self {
        let (tx, _) = watch::channel(Arc::new(initial.normalized()));
        Self { tx: Arc::new(tx) }
    }

    pub fn current(&self) -> Arc<SourceSnapshot> {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<SourceSnapshot>> {
        self.tx.subscribe()
    }

    /// Replaces the snapshot, in display order. Subscribers are only woken when it
    /// differs from the current one.
    pub fn publish(&self, snapshot: SourceSnapshot) -> bool {
        let snapshot = snapshot.normalized();
        self.tx.send_if_modified(|current| {
            if **current == snapshot {
                false
            } else {
                *current = Arc::new(snapshot);
                true
            }
        })
    }

    /// Reads a fresh snapshot and publishes it
    pub async fn refresh(
        &self,
        repository: &dyn SourceRepository,
        user_id: &str,
        timeout: Duration,
    ) -> anyhow::Result<bool> {
        let snapshot = tokio::time::timeout(timeout, repository.load_snapshot(user_id))
            .await
            .context("Source snapshot read timed out")?
            .context("Failed to read source collections")?;
        let records = snapshot.record_count();
        let changed = self.publish(snapshot);
        tracing::debug!("Refreshed {} source records, changed: {}", records, changed);
        Ok(changed)
    }

    /// Polls the repository every `interval` until the task is aborted.
    /// Failed reads are logged and the last good snapshot is kept.
    pub fn spawn_refresh(
        &self,
        repository: Arc<dyn SourceRepository>,
        user_id: String,
        interval: Duration,
        timeout: Duration,
    ) -> JoinHandle<()> {
        let feed = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if let Err(e) = feed.refresh(repository.as_ref(), &user_id, timeout).await {
                    tracing::error!("Source refresh failed: {:#}", e);
                }
            }
        })
    }
}
