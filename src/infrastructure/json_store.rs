// JSON file repository - settings and source collections as plain files under one root
use crate::application::settings_repository::{SettingsRepository, SourceRepository};
use crate::domain::settings::UserSettings;
use crate::domain::snapshot::SourceSnapshot;
use crate::domain::widget::{LayoutSlot, StoredWidget};
use crate::infrastructure::store_error::StoreError;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

/// Layout on disk:
/// `<root>/settings/<user>.json` holds the settings document,
/// `<root>/collections/<user>.json` holds every source collection keyed by name.
#[derive(Debug)]
pub struct JsonFileStore {
    root: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            write_lock: Mutex::new(()),
        }
    }

    fn settings_path(&self, user_id: &str) -> PathBuf {
        self.root.join("settings").join(format!("{}.json", user_id))
    }

    fn collections_path(&self, user_id: &str) -> PathBuf {
        self.root.join("collections").join(format!("{}.json", user_id))
    }

    /// File contents, or `None` when the file does not exist
    async fn read_json(path: &Path) -> Result<Option<Value>> {
        let bytes = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(StoreError::Io {
                    path: path.display().to_string(),
                    source,
                }
                .into())
            }
        };
        let value = serde_json::from_slice(&bytes).map_err(|e| StoreError::Malformed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Ok(Some(value))
    }

    /// Write through a sibling temp file so readers never see a partial document
    async fn write_json(path: &Path, value: &Value) -> Result<()> {
        let io_error = |source| StoreError::Io {
            path: path.display().to_string(),
            source,
        };
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(io_error)?;
        }
        let bytes = serde_json::to_vec_pretty(value).context("Failed to encode document")?;
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, bytes).await.map_err(io_error)?;
        tokio::fs::rename(&tmp, path).await.map_err(io_error)?;
        Ok(())
    }
}

#[async_trait]
impl SettingsRepository for JsonFileStore {
    async fn load_settings(&self, user_id: &str) -> Result<UserSettings> {
        let path = self.settings_path(user_id);
        match Self::read_json(&path).await? {
            Some(value) => {
                let settings = serde_json::from_value(value).map_err(|e| StoreError::Malformed {
                    path: path.display().to_string(),
                    reason: e.to_string(),
                })?;
                Ok(settings)
            }
            None => {
                tracing::info!("No settings file for {}, using defaults", user_id);
                Ok(UserSettings::default())
            }
        }
    }

    async fn replace_layout(
        &self,
        user_id: &str,
        slot: LayoutSlot,
        widgets: Vec<StoredWidget>,
    ) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let path = self.settings_path(user_id);

        let mut document = match Self::read_json(&path).await? {
            Some(Value::Object(map)) => map,
            Some(_) => {
                return Err(StoreError::Malformed {
                    path: path.display().to_string(),
                    reason: "settings document is not an object".to_string(),
                }
                .into())
            }
            None => Map::new(),
        };
        let layout = serde_json::to_value(&widgets).context("Failed to encode layout")?;
        document.insert(slot.field_name().to_string(), layout);

        Self::write_json(&path, &Value::Object(document)).await
    }
}

#[async_trait]
impl SourceRepository for JsonFileStore {
    async fn load_snapshot(&self, user_id: &str) -> Result<SourceSnapshot> {
        let path = self.collections_path(user_id);
        let Some(value) = Self::read_json(&path).await? else {
            tracing::warn!("No collections file at {}", path.display());
            return Ok(SourceSnapshot::default());
        };
        let snapshot = serde_json::from_value(value).map_err(|e| StoreError::Malformed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Ok(snapshot)
    }
}
