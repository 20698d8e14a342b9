// Application state for HTTP handlers
use std::sync::Arc;

use chrono::Utc;

use crate::application::aggregators::AggregationContext;
use crate::application::source_feed::SourceFeed;
use crate::application::layout_store::SettingsCell;
use crate::domain::widget::{AnalyticsWidgetType, DashboardWidgetType, LayoutSlot};
use crate::presentation::page_controller::{ControllerError, Page, PageController};

#[derive(Clone)]
pub struct AppState {
    pub dashboard: Arc<PageController<DashboardWidgetType>>,
    pub analytics: Arc<PageController<AnalyticsWidgetType>>,
    pub feed: SourceFeed,
    pub settings: SettingsCell,
}

impl AppState {
    pub fn page(&self, name: &str) -> Result<Arc<dyn Page>, ControllerError> {
        match LayoutSlot::from_page_name(name) {
            Some(LayoutSlot::Dashboard) => Ok(self.dashboard.clone()),
            Some(LayoutSlot::Analytics) => Ok(self.analytics.clone()),
            None => Err(ControllerError::UnknownPage(name.to_string())),
        }
    }

    /// Aggregation inputs as of now
    pub fn context(&self) -> AggregationContext {
        AggregationContext::new(Utc::now(), self.settings.currency())
    }
}
