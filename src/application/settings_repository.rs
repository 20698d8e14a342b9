// Repository traits for the user settings document and the source collections
use crate::domain::settings::UserSettings;
use crate::domain::snapshot::SourceSnapshot;
use crate::domain::widget::{LayoutSlot, StoredWidget};
use async_trait::async_trait;

#[async_trait]
pub trait SettingsRepository: Send + Sync {
    /// Load the settings document for a user, defaults when the user has none
    async fn load_settings(&self, user_id: &str) -> anyhow::Result<UserSettings>;

    /// Replace one layout field of the settings document with the full widget list.
    /// Other fields of the document are left untouched.
    async fn replace_layout(
        &self,
        user_id: &str,
        slot: LayoutSlot,
        widgets: Vec<StoredWidget>,
    ) -> anyhow::Result<()>;
}

#[async_trait]
pub trait SourceRepository: Send + Sync {
    /// Read every source collection owned by the user
    async fn load_snapshot(&self, user_id: &str) -> anyhow::Result<SourceSnapshot>;
}
