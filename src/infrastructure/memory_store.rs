// In-memory repository for local runs and tests
use crate::application::settings_repository::{SettingsRepository, SourceRepository};
use crate::domain::settings::UserSettings;
use crate::domain::snapshot::SourceSnapshot;
use crate::domain::widget::{LayoutSlot, StoredWidget};
use crate::infrastructure::store_error::StoreError;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::RwLock;

#[derive(Debug, Default)]
pub struct MemoryStore {
    settings: RwLock<HashMap<String, Map<String, Value>>>,
    snapshots: RwLock<HashMap<String, SourceSnapshot>>,
    reject_writes: AtomicBool,
    writes: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn put_snapshot(&self, user_id: &str, snapshot: SourceSnapshot) {
        self.snapshots
            .write()
            .await
            .insert(user_id.to_string(), snapshot);
    }

    pub async fn put_settings(&self, user_id: &str, settings: &UserSettings) -> Result<()> {
        let Value::Object(document) =
            serde_json::to_value(settings).context("Failed to encode settings")?
        else {
            anyhow::bail!("settings did not encode to an object");
        };
        self.settings
            .write()
            .await
            .insert(user_id.to_string(), document);
        Ok(())
    }

    /// Makes every following layout write fail until switched back
    pub fn reject_writes(&self, reject: bool) {
        self.reject_writes.store(reject, Ordering::SeqCst);
    }

    /// Number of accepted layout writes
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SettingsRepository for MemoryStore {
    async fn load_settings(&self, user_id: &str) -> Result<UserSettings> {
        let settings = self.settings.read().await;
        match settings.get(user_id) {
            Some(document) => Ok(serde_json::from_value(Value::Object(document.clone()))
                .context("Stored settings do not match the settings shape")?),
            None => Ok(UserSettings::default()),
        }
    }

    async fn replace_layout(
        &self,
        user_id: &str,
        slot: LayoutSlot,
        widgets: Vec<StoredWidget>,
    ) -> Result<()> {
        if self.reject_writes.load(Ordering::SeqCst) {
            return Err(StoreError::WriteRejected(user_id.to_string()).into());
        }
        let layout = serde_json::to_value(&widgets).context("Failed to encode layout")?;
        self.settings
            .write()
            .await
            .entry(user_id.to_string())
            .or_default()
            .insert(slot.field_name().to_string(), layout);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[async_trait]
impl SourceRepository for MemoryStore {
    async fn load_snapshot(&self, user_id: &str) -> Result<SourceSnapshot> {
        Ok(self
            .snapshots
            .read()
            .await
            .get(user_id)
            .cloned()
            .unwrap_or_default())
    }
}
