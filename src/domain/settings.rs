// User settings domain model
use serde::{Deserialize, Serialize};

use super::layout::Layout;
use super::widget::{AnalyticsWidgetType, DashboardWidgetType, Position, WidgetInstance};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CurrencyPosition {
    #[default]
    Left,
    Right,
}

/// Currency display preference. Used for formatting only, never for conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyFormat {
    pub symbol: String,
    pub position: CurrencyPosition,
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        Self {
            symbol: default_currency(),
            position: CurrencyPosition::Left,
        }
    }
}

/// The parts of the settings document this subsystem reads. Other fields are ignored
/// on read and left untouched on write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSettings {
    #[serde(default = "default_dashboard_layout")]
    pub dashboard_layout: Layout<DashboardWidgetType>,
    #[serde(default = "default_analytics_layout")]
    pub analytics_layout: Layout<AnalyticsWidgetType>,
    #[serde(default = "default_currency")]
    pub base_currency: String,
    #[serde(default)]
    pub currency_position: CurrencyPosition,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            dashboard_layout: default_dashboard_layout(),
            analytics_layout: default_analytics_layout(),
            base_currency: default_currency(),
            currency_position: CurrencyPosition::default(),
        }
    }
}

impl UserSettings {
    pub fn currency(&self) -> CurrencyFormat {
        CurrencyFormat {
            symbol: self.base_currency.clone(),
            position: self.currency_position,
        }
    }
}

fn default_currency() -> String {
    "$".to_string()
}

fn default_dashboard_layout() -> Layout<DashboardWidgetType> {
    Layout::new(vec![
        WidgetInstance::new("1", DashboardWidgetType::Clock, Position::new(0, 0)),
        WidgetInstance::new("2", DashboardWidgetType::Modules, Position::new(0, 1)),
        WidgetInstance::new("3", DashboardWidgetType::TasksList, Position::new(0, 2)),
    ])
}

fn default_analytics_layout() -> Layout<AnalyticsWidgetType> {
    Layout::new(vec![
        WidgetInstance::new("a1", AnalyticsWidgetType::NetWorth, Position::new(0, 0)),
        WidgetInstance::new("a2", AnalyticsWidgetType::ExpensePie, Position::new(1, 0)),
        WidgetInstance::new("a3", AnalyticsWidgetType::RevenueBar, Position::new(0, 1)),
        WidgetInstance::new("a4", AnalyticsWidgetType::TaskPie, Position::new(1, 1)),
        WidgetInstance::new("a5", AnalyticsWidgetType::HabitTrend, Position::new(0, 2)),
    ])
}
