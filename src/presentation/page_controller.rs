// Page controller - view/edit mode and page composition for one layout
use std::sync::{Mutex, PoisonError};

use thiserror::Error;
use tokio::sync::watch;

use crate::application::aggregators::AggregationContext;
use crate::application::layout_store::{LayoutStore, PersistHandle};
use crate::application::registry::{Registry, RegistryEntry, Resolution, NO_DATA_STREAM};
use crate::domain::dashboard::{CatalogEntry, PageMode, PageView, RenderedWidget};
use crate::domain::scene::Scene;
use crate::domain::snapshot::SourceSnapshot;
use crate::domain::widget::{LayoutSlot, StoredWidget, WidgetInstance, WidgetKind, WidgetType};
use crate::presentation::charts;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ControllerError {
    #[error("the {page} page is not in editing mode")]
    NotEditing { page: &'static str },
    #[error("unknown page {0}")]
    UnknownPage(String),
    #[error("{token} is not a {page} widget type")]
    UnknownWidgetType { page: &'static str, token: String },
    #[error("no widget {id} on the {page} page")]
    UnknownWidget { page: &'static str, id: String },
}

pub struct PageController<K: RegistryEntry> {
    store: LayoutStore<K>,
    registry: Registry<K>,
    mode: Mutex<PageMode>,
    revision: watch::Sender<u64>,
}

impl<K: RegistryEntry> PageController<K> {
    pub fn new(store: LayoutStore<K>) -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            store,
            registry: Registry::new(),
            mode: Mutex::new(PageMode::Viewing),
            revision,
        }
    }

    fn page(&self) -> &'static str {
        K::SLOT.page_name()
    }

    pub fn mode(&self) -> PageMode {
        *self.mode.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_mode(&self, mode: PageMode) {
        let changed = {
            let mut current = self.mode.lock().unwrap_or_else(PoisonError::into_inner);
            std::mem::replace(&mut *current, mode) != mode
        };
        if changed {
            tracing::info!("{} page now {:?}", self.page(), mode);
            self.bump();
        }
    }

    pub fn begin_editing(&self) {
        self.set_mode(PageMode::Editing);
    }

    /// Leaves editing; every change was already persisted when it was made
    pub fn finish_editing(&self) {
        self.set_mode(PageMode::Viewing);
    }

    fn require_editing(&self) -> Result<(), ControllerError> {
        match self.mode() {
            PageMode::Editing => Ok(()),
            PageMode::Viewing => Err(ControllerError::NotEditing { page: self.page() }),
        }
    }

    fn bump(&self) {
        self.revision.send_modify(|rev| *rev += 1);
    }

    /// Changes on every layout mutation or mode switch
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    pub fn add(&self, token: &str) -> Result<(WidgetInstance<K>, PersistHandle), ControllerError> {
        self.require_editing()?;
        let kind = K::from_token(token).ok_or_else(|| ControllerError::UnknownWidgetType {
            page: self.page(),
            token: token.to_string(),
        })?;
        let added = self.store.add(WidgetType::Known(kind));
        self.bump();
        Ok(added)
    }

    /// `Ok(None)` when no widget has that id; nothing is written then
    pub fn remove(&self, id: &str) -> Result<Option<PersistHandle>, ControllerError> {
        self.require_editing()?;
        let removed = self.store.remove(id).map(|(_, handle)| handle);
        if removed.is_some() {
            self.bump();
        }
        Ok(removed)
    }

    pub fn catalog(&self) -> Vec<CatalogEntry> {
        self.registry.catalog()
    }

    fn render_instance(
        &self,
        widget: &WidgetInstance<K>,
        snapshot: &SourceSnapshot,
        ctx: &AggregationContext,
        editing: bool,
    ) -> RenderedWidget {
        let resolution = self.registry.resolve(&widget.widget_type);
        let (shape, scene) = match resolution {
            Resolution::Resolved(spec) => {
                let content = (spec.aggregate)(snapshot, ctx);
                (Some(spec.shape), charts::render(spec.shape, content))
            }
            Resolution::Placeholder { .. } => (None, Scene::placeholder(NO_DATA_STREAM)),
        };
        RenderedWidget {
            id: widget.id.clone(),
            widget_type: widget.widget_type.token().to_string(),
            title: resolution.title().to_string(),
            position: widget.position,
            shape,
            scene,
            removable: editing,
        }
    }

    /// Composes every layout instance in layout order
    pub fn render(&self, snapshot: &SourceSnapshot, ctx: &AggregationContext) -> PageView {
        let mode = self.mode();
        let editing = mode == PageMode::Editing;
        let layout = self.store.layout();
        let widgets: Vec<RenderedWidget> = layout
            .widgets()
            .iter()
            .map(|w| self.render_instance(w, snapshot, ctx, editing))
            .collect();
        tracing::debug!("Rendered {} widgets on the {} page", widgets.len(), self.page());

        PageView {
            title: K::PAGE.title,
            subtitle: K::PAGE.subtitle,
            mode,
            empty_message: widgets.is_empty().then_some(K::PAGE.empty_message),
            widgets,
            catalog: if editing { self.catalog() } else { Vec::new() },
        }
    }

    pub fn render_widget(
        &self,
        id: &str,
        snapshot: &SourceSnapshot,
        ctx: &AggregationContext,
    ) -> Result<RenderedWidget, ControllerError> {
        let layout = self.store.layout();
        let widget = layout.get(id).ok_or_else(|| ControllerError::UnknownWidget {
            page: self.page(),
            id: id.to_string(),
        })?;
        Ok(self.render_instance(widget, snapshot, ctx, self.mode() == PageMode::Editing))
    }
}

/// Type-erased page, so the HTTP layer can route by page name
pub trait Page: Send + Sync {
    fn slot(&self) -> LayoutSlot;
    fn mode(&self) -> PageMode;
    fn begin_editing(&self);
    fn finish_editing(&self);
    fn add_widget(&self, token: &str) -> Result<StoredWidget, ControllerError>;
    fn remove_widget(&self, id: &str) -> Result<bool, ControllerError>;
    fn render_page(&self, snapshot: &SourceSnapshot, ctx: &AggregationContext) -> PageView;
    fn render_widget(
        &self,
        id: &str,
        snapshot: &SourceSnapshot,
        ctx: &AggregationContext,
    ) -> Result<RenderedWidget, ControllerError>;
    fn subscribe(&self) -> watch::Receiver<u64>;
}

impl<K: RegistryEntry> Page for PageController<K> {
    fn slot(&self) -> LayoutSlot {
        K::SLOT
    }

    fn mode(&self) -> PageMode {
        PageController::mode(self)
    }

    fn begin_editing(&self) {
        PageController::begin_editing(self)
    }

    fn finish_editing(&self) {
        PageController::finish_editing(self)
    }

    fn add_widget(&self, token: &str) -> Result<StoredWidget, ControllerError> {
        // The write finishes in the background and logs its own failure
        let (widget, _persist) = self.add(token)?;
        Ok(widget.to_stored())
    }

    fn remove_widget(&self, id: &str) -> Result<bool, ControllerError> {
        Ok(self.remove(id)?.is_some())
    }

    fn render_page(&self, snapshot: &SourceSnapshot, ctx: &AggregationContext) -> PageView {
        self.render(snapshot, ctx)
    }

    fn render_widget(
        &self,
        id: &str,
        snapshot: &SourceSnapshot,
        ctx: &AggregationContext,
    ) -> Result<RenderedWidget, ControllerError> {
        PageController::render_widget(self, id, snapshot, ctx)
    }

    fn subscribe(&self) -> watch::Receiver<u64> {
        PageController::subscribe(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::layout_store::{IdGenerator, SettingsCell};
    use crate::domain::layout::Layout;
    use crate::domain::records::{Account, Transaction, TransactionType};
    use crate::domain::settings::{CurrencyFormat, UserSettings};
    use crate::domain::widget::{AnalyticsWidgetType, DashboardWidgetType};
    use crate::infrastructure::memory_store::MemoryStore;
    use chrono::{TimeZone, Utc};
    use std::sync::Arc;
    use std::time::Duration;

    fn controller<K: RegistryEntry>(settings: UserSettings) -> (PageController<K>, Arc<MemoryStore>) {
        let repo = Arc::new(MemoryStore::new());
        let store = LayoutStore::new(
            SettingsCell::new(settings),
            repo.clone(),
            Arc::new(IdGenerator::new()),
            "u1".to_string(),
            Duration::from_secs(1),
        );
        (PageController::new(store), repo)
    }

    fn empty_settings() -> UserSettings {
        UserSettings {
            dashboard_layout: Layout::default(),
            analytics_layout: Layout::default(),
            ..Default::default()
        }
    }

    fn ctx() -> AggregationContext {
        AggregationContext::new(
            Utc.with_ymd_and_hms(2026, 4, 20, 12, 0, 0).unwrap(),
            CurrencyFormat::default(),
        )
    }

    #[tokio::test]
    async fn test_add_and_remove_require_editing() {
        let (page, repo) = controller::<DashboardWidgetType>(empty_settings());
        assert_eq!(page.mode(), PageMode::Viewing);
        assert_eq!(
            page.add("clock").unwrap_err(),
            ControllerError::NotEditing { page: "dashboard" }
        );
        assert!(page.remove("1").is_err());

        page.begin_editing();
        let (widget, handle) = page.add("clock").unwrap();
        handle.await.unwrap().unwrap();
        assert_eq!(repo.write_count(), 1);

        page.finish_editing();
        assert!(page.remove(&widget.id).is_err());
        assert_eq!(repo.write_count(), 1);
    }

    #[tokio::test]
    async fn test_add_rejects_other_page_types() {
        let (page, _) = controller::<DashboardWidgetType>(empty_settings());
        page.begin_editing();
        assert!(matches!(
            page.add("net_worth"),
            Err(ControllerError::UnknownWidgetType { page: "dashboard", .. })
        ));
    }

    #[tokio::test]
    async fn test_empty_page_message() {
        let (page, _) = controller::<AnalyticsWidgetType>(empty_settings());
        let view = page.render(&SourceSnapshot::default(), &ctx());
        assert_eq!(view.title, "Command_Center");
        assert_eq!(view.subtitle, "GLOBAL ANALYTICS AGGREGATOR");
        assert_eq!(view.empty_message, Some("NO DATA STREAMS ACTIVE"));
        assert!(view.catalog.is_empty());

        let (page, _) = controller::<DashboardWidgetType>(empty_settings());
        let view = page.render(&SourceSnapshot::default(), &ctx());
        assert_eq!(view.empty_message, Some("DASHBOARD EMPTY"));
    }

    #[tokio::test]
    async fn test_default_dashboard_renders_in_order() {
        let (page, _) = controller::<DashboardWidgetType>(UserSettings::default());
        let view = page.render(&SourceSnapshot::default(), &ctx());
        let titles: Vec<&str> = view.widgets.iter().map(|w| w.title.as_str()).collect();
        assert_eq!(titles, vec!["SYSTEM_TIME", "NAVIGATION", "PRIORITY_TASKS"]);
        assert_eq!(view.widgets[2].scene, Scene::placeholder("NO PENDING DIRECTIVES"));
        assert!(view.empty_message.is_none());
        assert!(view.widgets.iter().all(|w| !w.removable));
    }

    #[tokio::test]
    async fn test_unknown_type_renders_placeholder_card() {
        let mut settings = empty_settings();
        settings
            .analytics_layout
            .append("9".to_string(), WidgetType::Unrecognized("stock_ticker".to_string()));
        let (page, _) = controller::<AnalyticsWidgetType>(settings);

        let view = page.render(&SourceSnapshot::default(), &ctx());
        let widget = view.widget("9").unwrap();
        assert_eq!(widget.title, "DATA MODULE");
        assert_eq!(widget.scene, Scene::placeholder("NO DATA STREAM"));
        assert_eq!(widget.widget_type, "stock_ticker");
        assert!(widget.shape.is_none());
    }

    #[tokio::test]
    async fn test_expense_pie_end_to_end() {
        let mut settings = empty_settings();
        settings
            .analytics_layout
            .append("a2".to_string(), AnalyticsWidgetType::ExpensePie.into());
        let (page, _) = controller::<AnalyticsWidgetType>(settings);

        let expense = |id: &str, category: &str, amount: f64| Transaction {
            id: id.to_string(),
            account_id: "acc".to_string(),
            kind: TransactionType::Expense,
            amount,
            category: category.to_string(),
            date: ctx().now.timestamp_millis(),
            ..Default::default()
        };
        let snapshot = SourceSnapshot {
            accounts: vec![Account {
                id: "acc".to_string(),
                balance: 1000.0,
                ..Default::default()
            }],
            transactions: vec![
                expense("t1", "Food", 30.0),
                expense("t2", "Rent", 90.0),
                expense("t3", "Food", 30.0),
            ],
            ..Default::default()
        };

        let view = page.render(&snapshot, &ctx());
        let Scene::Pie(pie) = &view.widgets[0].scene else {
            panic!("expense widget should render a pie");
        };
        let labels: Vec<&str> = pie.slices.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["Rent", "Food"]);
        assert!((pie.slices[0].fraction - 0.6).abs() < 1e-9);
        assert!((pie.total_sweep() - 360.0).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_editing_exposes_catalog_and_removal() {
        let (page, _) = controller::<DashboardWidgetType>(UserSettings::default());
        let mut revisions = page.subscribe();
        page.begin_editing();
        assert!(revisions.has_changed().unwrap());

        let view = page.render(&SourceSnapshot::default(), &ctx());
        assert_eq!(view.mode, PageMode::Editing);
        assert_eq!(view.catalog.len(), DashboardWidgetType::ALL.len());
        assert_eq!(view.catalog[0].label, "Digital Clock");
        assert!(view.widgets.iter().all(|w| w.removable));
    }

    #[tokio::test]
    async fn test_remove_absent_id_is_noop() {
        let (page, repo) = controller::<DashboardWidgetType>(UserSettings::default());
        page.begin_editing();
        assert_eq!(page.remove_widget("missing"), Ok(false));
        assert_eq!(repo.write_count(), 0);
    }
}
