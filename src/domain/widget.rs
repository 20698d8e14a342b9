// Widget domain model
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::hash::Hash;

use super::layout::Layout;
use super::settings::UserSettings;

/// The settings field a layout lives under. Each slot has its own widget enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayoutSlot {
    Dashboard,
    Analytics,
}

impl LayoutSlot {
    pub fn field_name(&self) -> &'static str {
        match self {
            LayoutSlot::Dashboard => "dashboardLayout",
            LayoutSlot::Analytics => "analyticsLayout",
        }
    }

    pub fn page_name(&self) -> &'static str {
        match self {
            LayoutSlot::Dashboard => "dashboard",
            LayoutSlot::Analytics => "analytics",
        }
    }

    pub fn from_page_name(name: &str) -> Option<Self> {
        match name {
            "dashboard" => Some(LayoutSlot::Dashboard),
            "analytics" => Some(LayoutSlot::Analytics),
            _ => None,
        }
    }
}

/// A closed enumeration of widget types belonging to one layout slot
pub trait WidgetKind: Copy + Eq + Hash + fmt::Debug + Send + Sync + 'static {
    const ALL: &'static [Self];
    const SLOT: LayoutSlot;

    fn token(&self) -> &'static str;

    fn from_token(token: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|kind| kind.token() == token)
    }

    fn layout(settings: &UserSettings) -> &Layout<Self>;

    fn layout_mut(settings: &mut UserSettings) -> &mut Layout<Self>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DashboardWidgetType {
    Clock,
    Modules,
    QuickNote,
    TasksList,
    WalletSummary,
    HabitToday,
    GoalsList,
}

impl WidgetKind for DashboardWidgetType {
    const ALL: &'static [Self] = &[
        Self::Clock,
        Self::Modules,
        Self::TasksList,
        Self::GoalsList,
        Self::HabitToday,
        Self::WalletSummary,
        Self::QuickNote,
    ];
    const SLOT: LayoutSlot = LayoutSlot::Dashboard;

    fn token(&self) -> &'static str {
        match self {
            Self::Clock => "clock",
            Self::Modules => "modules",
            Self::QuickNote => "quick_note",
            Self::TasksList => "tasks_list",
            Self::WalletSummary => "wallet_summary",
            Self::HabitToday => "habit_today",
            Self::GoalsList => "goals_list",
        }
    }

    fn layout(settings: &UserSettings) -> &Layout<Self> {
        &settings.dashboard_layout
    }

    fn layout_mut(settings: &mut UserSettings) -> &mut Layout<Self> {
        &mut settings.dashboard_layout
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnalyticsWidgetType {
    NetWorth,
    ExpensePie,
    RevenueBar,
    TaskPie,
    HabitTrend,
    GoalProgress,
    CrmRevenue,
    CrmDistribution,
    CrmTopClients,
    HabitPerformance,
    WalletTrend,
}

impl WidgetKind for AnalyticsWidgetType {
    const ALL: &'static [Self] = &[
        Self::NetWorth,
        Self::ExpensePie,
        Self::RevenueBar,
        Self::TaskPie,
        Self::HabitTrend,
        Self::GoalProgress,
        Self::CrmRevenue,
        Self::CrmDistribution,
        Self::CrmTopClients,
        Self::HabitPerformance,
        Self::WalletTrend,
    ];
    const SLOT: LayoutSlot = LayoutSlot::Analytics;

    fn token(&self) -> &'static str {
        match self {
            Self::NetWorth => "net_worth",
            Self::ExpensePie => "expense_pie",
            Self::RevenueBar => "revenue_bar",
            Self::TaskPie => "task_pie",
            Self::HabitTrend => "habit_trend",
            Self::GoalProgress => "goal_progress",
            Self::CrmRevenue => "crm_revenue",
            Self::CrmDistribution => "crm_distribution",
            Self::CrmTopClients => "crm_top_clients",
            Self::HabitPerformance => "habit_performance",
            Self::WalletTrend => "wallet_trend",
        }
    }

    fn layout(settings: &UserSettings) -> &Layout<Self> {
        &settings.analytics_layout
    }

    fn layout_mut(settings: &mut UserSettings) -> &mut Layout<Self> {
        &mut settings.analytics_layout
    }
}

/// A widget type token as stored. Tokens this build does not recognise are kept
/// verbatim so that rewriting the layout does not destroy them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetType<K> {
    Known(K),
    Unrecognized(String),
}

impl<K: WidgetKind> WidgetType<K> {
    pub fn parse(token: &str) -> Self {
        match K::from_token(token) {
            Some(kind) => WidgetType::Known(kind),
            None => WidgetType::Unrecognized(token.to_string()),
        }
    }

    pub fn token(&self) -> &str {
        match self {
            WidgetType::Known(kind) => kind.token(),
            WidgetType::Unrecognized(token) => token,
        }
    }

    pub fn known(&self) -> Option<K> {
        match self {
            WidgetType::Known(kind) => Some(*kind),
            WidgetType::Unrecognized(_) => None,
        }
    }
}

impl<K: WidgetKind> From<K> for WidgetType<K> {
    fn from(kind: K) -> Self {
        WidgetType::Known(kind)
    }
}

impl<K: WidgetKind> Serialize for WidgetType<K> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.token())
    }
}

impl<'de, K: WidgetKind> Deserialize<'de> for WidgetType<K> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let token = String::deserialize(deserializer)?;
        Ok(Self::parse(&token))
    }
}

/// Grid placement. Only append order is meaningful today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Position {
    #[serde(default)]
    pub x: i64,
    #[serde(default)]
    pub y: i64,
}

impl Position {
    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "K: WidgetKind")]
pub struct WidgetInstance<K> {
    pub id: String,
    #[serde(rename = "type")]
    pub widget_type: WidgetType<K>,
    #[serde(flatten)]
    pub position: Position,
}

impl<K: WidgetKind> WidgetInstance<K> {
    pub fn new(id: impl Into<String>, widget_type: impl Into<WidgetType<K>>, position: Position) -> Self {
        Self {
            id: id.into(),
            widget_type: widget_type.into(),
            position,
        }
    }

    pub fn to_stored(&self) -> StoredWidget {
        StoredWidget {
            id: self.id.clone(),
            widget_type: self.widget_type.token().to_string(),
            x: self.position.x,
            y: self.position.y,
        }
    }
}

/// Untyped wire shape of a widget instance inside the settings document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredWidget {
    pub id: String,
    #[serde(rename = "type")]
    pub widget_type: String,
    #[serde(default)]
    pub x: i64,
    #[serde(default)]
    pub y: i64,
}
