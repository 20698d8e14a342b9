// Firestore repository implementation (REST API)
use crate::application::settings_repository::{SettingsRepository, SourceRepository};
use crate::domain::settings::UserSettings;
use crate::domain::snapshot::SourceSnapshot;
use crate::domain::widget::{LayoutSlot, StoredWidget};
use crate::infrastructure::firestore_value::{fields_to_json, to_firestore, FirestoreDocument};
use crate::infrastructure::store_error::StoreError;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Map, Value};

const SETTINGS_COLLECTION: &str = "settings";
const BACKEND: &str = "Firestore";

#[derive(Debug, Clone)]
pub struct FirestoreStore {
    host: String,
    project: String,
    token: Option<String>,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct RunQueryRow {
    #[serde(default)]
    document: Option<FirestoreDocument>,
}

impl FirestoreStore {
    pub fn new(host: String, project: String, token: Option<String>) -> Self {
        Self {
            host: host.trim_end_matches('/').to_string(),
            project,
            token,
            client: reqwest::Client::new(),
        }
    }

    fn documents_url(&self) -> String {
        format!(
            "{}/v1/projects/{}/databases/(default)/documents",
            self.host, self.project
        )
    }

    fn settings_url(&self, user_id: &str) -> String {
        format!(
            "{}/{}/{}",
            self.documents_url(),
            SETTINGS_COLLECTION,
            urlencoding::encode(user_id)
        )
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        Err(StoreError::Status {
            backend: BACKEND,
            status,
            body,
        }
        .into())
    }

    /// Every document of `collection` whose `userId` equals `user_id`.
    /// Documents that do not match the record shape are skipped.
    async fn query_collection<T: DeserializeOwned>(
        &self,
        collection: &str,
        user_id: &str,
    ) -> Result<Vec<T>> {
        let body = json!({
            "structuredQuery": {
                "from": [{ "collectionId": collection }],
                "where": {
                    "fieldFilter": {
                        "field": { "fieldPath": "userId" },
                        "op": "EQUAL",
                        "value": { "stringValue": user_id }
                    }
                }
            }
        });

        tracing::debug!("Running Firestore query on {} for {}", collection, user_id);
        let response = self
            .authorize(self.client.post(format!("{}:runQuery", self.documents_url())))
            .json(&body)
            .send()
            .await
            .with_context(|| format!("Failed to send query for {}", collection))?;
        let rows = Self::check(response)
            .await?
            .json::<Vec<RunQueryRow>>()
            .await
            .with_context(|| format!("Failed to parse query response for {}", collection))?;

        let mut records = Vec::with_capacity(rows.len());
        for document in rows.into_iter().filter_map(|row| row.document) {
            let path = document.name.clone();
            match serde_json::from_value::<T>(document.into_json()) {
                Ok(record) => records.push(record),
                Err(e) => tracing::warn!("Skipping malformed document {}: {}", path, e),
            }
        }
        Ok(records)
    }
}

#[async_trait]
impl SettingsRepository for FirestoreStore {
    async fn load_settings(&self, user_id: &str) -> Result<UserSettings> {
        let url = self.settings_url(user_id);
        let response = self
            .authorize(self.client.get(&url))
            .send()
            .await
            .context("Failed to send settings request to Firestore")?;

        if response.status() == StatusCode::NOT_FOUND {
            tracing::info!("No settings document for {}, using defaults", user_id);
            return Ok(UserSettings::default());
        }

        let document = Self::check(response)
            .await?
            .json::<FirestoreDocument>()
            .await
            .context("Failed to parse Firestore settings document")?;
        let fields = Value::Object(fields_to_json(document.fields));
        let settings = serde_json::from_value(fields).map_err(|e| StoreError::Malformed {
            path: url,
            reason: e.to_string(),
        })?;
        Ok(settings)
    }

    async fn replace_layout(
        &self,
        user_id: &str,
        slot: LayoutSlot,
        widgets: Vec<StoredWidget>,
    ) -> Result<()> {
        let field = slot.field_name();
        let layout = serde_json::to_value(&widgets).context("Failed to encode layout")?;
        let mut fields = Map::new();
        fields.insert(field.to_string(), to_firestore(&layout));

        let response = self
            .authorize(self.client.patch(self.settings_url(user_id)))
            .query(&[("updateMask.fieldPaths", field)])
            .json(&json!({ "fields": fields }))
            .send()
            .await
            .with_context(|| format!("Failed to send {} update to Firestore", field))?;
        Self::check(response).await?;
        Ok(())
    }
}

#[async_trait]
impl SourceRepository for FirestoreStore {
    async fn load_snapshot(&self, user_id: &str) -> Result<SourceSnapshot> {
        let (accounts, transactions, tasks, habits, habit_logs, goals, clients, projects, project_tasks) =
            futures::try_join!(
                self.query_collection("accounts", user_id),
                self.query_collection("transactions", user_id),
                self.query_collection("tasks", user_id),
                self.query_collection("habits", user_id),
                self.query_collection("habit_logs", user_id),
                self.query_collection("goals", user_id),
                self.query_collection("clients", user_id),
                self.query_collection("projects", user_id),
                self.query_collection("project_tasks", user_id),
            )?;

        Ok(SourceSnapshot {
            accounts,
            transactions,
            tasks,
            habits,
            habit_logs,
            goals,
            clients,
            projects,
            project_tasks,
        })
    }
}
