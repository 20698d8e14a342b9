// Layout store - optimistic local layout mutations with fire-and-forget persistence
use std::marker::PhantomData;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use chrono::Utc;
use thiserror::Error;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::application::settings_repository::SettingsRepository;
use crate::domain::layout::Layout;
use crate::domain::settings::{CurrencyFormat, UserSettings};
use crate::domain::widget::{StoredWidget, WidgetInstance, WidgetKind, WidgetType};

#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("failed to persist {field}: {message}")]
    Persist { field: &'static str, message: String },
    #[error("persisting {field} timed out after {timeout:?}")]
    Timeout { field: &'static str, timeout: Duration },
}

/// Resolves once the background write finished, failed or timed out
pub type PersistHandle = JoinHandle<Result<(), LayoutError>>;

/// The locally held settings document, shared by both layout stores
#[derive(Debug, Clone, Default)]
pub struct SettingsCell {
    inner: Arc<RwLock<UserSettings>>,
}

impl SettingsCell {
    pub fn new(settings: UserSettings) -> Self {
        Self {
            inner: Arc::new(RwLock::new(settings)),
        }
    }

    pub fn read<R>(&self, f: impl FnOnce(&UserSettings) -> R) -> R {
        let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        f(&guard)
    }

    pub fn update<R>(&self, f: impl FnOnce(&mut UserSettings) -> R) -> R {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }

    pub fn replace(&self, settings: UserSettings) {
        self.update(|current| *current = settings);
    }

    pub fn currency(&self) -> CurrencyFormat {
        self.read(UserSettings::currency)
    }
}

/// Hands out widget ids: epoch milliseconds, strictly increasing per process
#[derive(Debug, Default)]
pub struct IdGenerator {
    last: AtomicI64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next id that is above both the last issued id and `floor`
    pub fn next_id(&self, floor: i64) -> i64 {
        let now = Utc::now().timestamp_millis();
        let mut current = self.last.load(Ordering::Relaxed);
        loop {
            let candidate = now.max(current + 1).max(floor);
            match self
                .last
                .compare_exchange_weak(current, candidate, Ordering::SeqCst, Ordering::Relaxed)
            {
                Ok(_) => return candidate,
                Err(actual) => current = actual,
            }
        }
    }
}

/// Orders one slot's writes. Snapshots are numbered under the settings lock and
/// a snapshot older than the last one sent to the repository is dropped.
#[derive(Debug, Default)]
struct LayoutWriter {
    issued: AtomicU64,
    sent: Mutex<u64>,
}

impl LayoutWriter {
    fn next_sequence(&self) -> u64 {
        self.issued.fetch_add(1, Ordering::SeqCst) + 1
    }
}

#[derive(Clone)]
pub struct LayoutStore<K: WidgetKind> {
    settings: SettingsCell,
    writer: Arc<LayoutWriter>,
    repository: Arc<dyn SettingsRepository>,
    ids: Arc<IdGenerator>,
    user_id: String,
    persist_timeout: Duration,
    kind: PhantomData<K>,
}

impl<K: WidgetKind> LayoutStore<K> {
    pub fn new(
        settings: SettingsCell,
        repository: Arc<dyn SettingsRepository>,
        ids: Arc<IdGenerator>,
        user_id: String,
        persist_timeout: Duration,
    ) -> Self {
        Self {
            settings,
            writer: Arc::new(LayoutWriter::default()),
            repository,
            ids,
            user_id,
            persist_timeout,
            kind: PhantomData,
        }
    }

    pub fn layout(&self) -> Layout<K> {
        self.settings.read(|s| K::layout(s).clone())
    }

    pub fn settings(&self) -> &SettingsCell {
        &self.settings
    }

    /// Appends a widget locally and starts persisting the whole layout
    pub fn add(&self, widget_type: WidgetType<K>) -> (WidgetInstance<K>, PersistHandle) {
        let (widget, stored, sequence) = self.settings.update(|settings| {
            let layout = K::layout_mut(settings);
            let floor = layout
                .widgets()
                .iter()
                .filter_map(|w| w.id.parse::<i64>().ok())
                .max()
                .map_or(0, |max| max + 1);
            let id = self.ids.next_id(floor).to_string();
            let widget = layout.append(id, widget_type);
            (widget, layout.to_stored(), self.writer.next_sequence())
        });

        tracing::info!(
            "Added {} widget {} to {}",
            widget.widget_type.token(),
            widget.id,
            K::SLOT.field_name()
        );
        (widget, self.persist(sequence, stored))
    }

    /// Removes a widget locally and starts persisting the layout.
    /// Returns `None` without writing when no widget has that id.
    pub fn remove(&self, id: &str) -> Option<(WidgetInstance<K>, PersistHandle)> {
        let removed = self.settings.update(|settings| {
            let layout = K::layout_mut(settings);
            layout
                .remove(id)
                .map(|removed| (removed, layout.to_stored(), self.writer.next_sequence()))
        });

        let Some((removed, stored, sequence)) = removed else {
            tracing::debug!("No widget {} in {}, nothing to remove", id, K::SLOT.field_name());
            return None;
        };
        tracing::info!(
            "Removed {} widget {} from {}",
            removed.widget_type.token(),
            removed.id,
            K::SLOT.field_name()
        );
        Some((removed, self.persist(sequence, stored)))
    }

    fn persist(&self, sequence: u64, widgets: Vec<StoredWidget>) -> PersistHandle {
        let writer = self.writer.clone();
        let repository = self.repository.clone();
        let user_id = self.user_id.clone();
        let timeout = self.persist_timeout;
        let slot = K::SLOT;

        tokio::spawn(async move {
            let mut sent = writer.sent.lock().await;
            if *sent > sequence {
                tracing::debug!(
                    "Skipping layout {} for {}, layout {} was already sent",
                    sequence,
                    slot.field_name(),
                    *sent
                );
                return Ok(());
            }
            *sent = sequence;

            let count = widgets.len();
            let write = repository.replace_layout(&user_id, slot, widgets);
            let result = match tokio::time::timeout(timeout, write).await {
                Ok(Ok(())) => {
                    tracing::debug!("Persisted {} widgets to {}", count, slot.field_name());
                    Ok(())
                }
                Ok(Err(e)) => Err(LayoutError::Persist {
                    field: slot.field_name(),
                    message: format!("{:#}", e),
                }),
                Err(_) => Err(LayoutError::Timeout {
                    field: slot.field_name(),
                    timeout,
                }),
            };
            if let Err(e) = &result {
                // Local state stays as is; the next successful write carries it
                tracing::error!("{}", e);
            }
            result
        })
    }
}
