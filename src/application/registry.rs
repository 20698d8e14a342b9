// Widget registry - resolves a widget type to its title, aggregator and render shape
use std::collections::HashMap;

use crate::application::aggregators::{self as agg, AggregationContext, HabitView, WalletRange};
use crate::domain::dashboard::{CatalogEntry, RenderShape};
use crate::domain::format::format_money;
use crate::domain::metric::MetricSeries;
use crate::domain::scene::{ClockFace, LauncherEntry, ListRow, Scene, StatCard};
use crate::domain::snapshot::SourceSnapshot;
use crate::domain::widget::{AnalyticsWidgetType, DashboardWidgetType, WidgetKind, WidgetType};

/// Message shown in place of a widget whose type cannot be resolved
pub const NO_DATA_STREAM: &str = "NO DATA STREAM";

/// What an aggregator hands to the rendering surface
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetContent {
    Series(MetricSeries),
    Rows {
        rows: Vec<ListRow>,
        empty_message: &'static str,
    },
    Custom(Scene),
}

pub type Aggregate = fn(&SourceSnapshot, &AggregationContext) -> WidgetContent;

#[derive(Debug, Clone, Copy)]
pub struct WidgetSpec {
    /// Header shown above the widget
    pub title: &'static str,
    /// Name in the add-widget menu
    pub label: &'static str,
    pub shape: RenderShape,
    pub aggregate: Aggregate,
}

/// Static copy of the page a registry backs
#[derive(Debug, Clone, Copy)]
pub struct PageCopy {
    pub title: &'static str,
    pub subtitle: &'static str,
    pub empty_message: &'static str,
}

pub trait RegistryEntry: WidgetKind {
    /// Title of the placeholder shown for unresolvable types
    const PLACEHOLDER_TITLE: &'static str;
    const PAGE: PageCopy;

    fn spec(self) -> WidgetSpec;
}

#[derive(Debug, Clone, Copy)]
pub enum Resolution<'a> {
    Resolved(&'a WidgetSpec),
    Placeholder { title: &'static str },
}

impl Resolution<'_> {
    pub fn title(&self) -> &'static str {
        match self {
            Resolution::Resolved(spec) => spec.title,
            Resolution::Placeholder { title } => *title,
        }
    }
}

pub struct Registry<K: RegistryEntry> {
    entries: HashMap<K, WidgetSpec>,
}

impl<K: RegistryEntry> Default for Registry<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: RegistryEntry> Registry<K> {
    pub fn new() -> Self {
        let entries = K::ALL.iter().map(|kind| (*kind, kind.spec())).collect();
        Self { entries }
    }

    /// Never fails: anything without an entry resolves to the placeholder
    pub fn resolve(&self, widget_type: &WidgetType<K>) -> Resolution<'_> {
        match widget_type.known().and_then(|kind| self.entries.get(&kind)) {
            Some(spec) => Resolution::Resolved(spec),
            None => {
                tracing::debug!(
                    "No {:?} registry entry for widget type {:?}",
                    K::SLOT,
                    widget_type.token()
                );
                Resolution::Placeholder {
                    title: K::PLACEHOLDER_TITLE,
                }
            }
        }
    }

    pub fn resolve_token(&self, token: &str) -> Resolution<'_> {
        self.resolve(&WidgetType::parse(token))
    }

    /// Add-widget menu, in declaration order
    pub fn catalog(&self) -> Vec<CatalogEntry> {
        K::ALL
            .iter()
            .filter_map(|kind| {
                self.entries.get(kind).map(|spec| CatalogEntry {
                    widget_type: kind.token(),
                    label: spec.label,
                })
            })
            .collect()
    }
}

fn entry(title: &'static str, label: &'static str, shape: RenderShape, aggregate: Aggregate) -> WidgetSpec {
    WidgetSpec {
        title,
        label,
        shape,
        aggregate,
    }
}

// Dashboard widgets

const LAUNCHER: &[LauncherEntry] = &[
    LauncherEntry { view: "notebooks", label: "NOTES" },
    LauncherEntry { view: "tasks", label: "TASKS" },
    LauncherEntry { view: "goals", label: "GOALS" },
    LauncherEntry { view: "analytics", label: "DATA" },
    LauncherEntry { view: "crm", label: "CRM" },
    LauncherEntry { view: "wallet", label: "WALLET" },
    LauncherEntry { view: "habits", label: "HABITS" },
    LauncherEntry { view: "chat", label: "CHAT" },
];

fn clock_face(_: &SourceSnapshot, ctx: &AggregationContext) -> WidgetContent {
    WidgetContent::Custom(Scene::Clock(ClockFace {
        date: ctx.now.format("%A, %B %-d, %Y").to_string(),
        time: ctx.now.format("%H:%M:%S").to_string(),
    }))
}

fn launcher(_: &SourceSnapshot, _: &AggregationContext) -> WidgetContent {
    WidgetContent::Custom(Scene::Launcher {
        entries: LAUNCHER.to_vec(),
    })
}

fn quick_note(_: &SourceSnapshot, _: &AggregationContext) -> WidgetContent {
    WidgetContent::Custom(Scene::NoteCapture {
        prompt: "Type thought here...".to_string(),
    })
}

fn pending_task_rows(src: &SourceSnapshot, _: &AggregationContext) -> WidgetContent {
    let rows = agg::pending_tasks(&src.tasks)
        .into_iter()
        .map(|task| {
            let mut row = ListRow::new(task.title.clone());
            row.checked = Some(false);
            if !task.subtasks.is_empty() {
                let done = task.subtasks.iter().filter(|s| s.completed).count();
                row.detail = Some(format!("{}/{}", done, task.subtasks.len()));
            }
            row
        })
        .collect();
    WidgetContent::Rows {
        rows,
        empty_message: "NO PENDING DIRECTIVES",
    }
}

fn wallet_summary(src: &SourceSnapshot, ctx: &AggregationContext) -> WidgetContent {
    WidgetContent::Custom(Scene::Stat(StatCard {
        caption: "Total Assets".to_string(),
        value: format_money(agg::total_balance(&src.accounts), &ctx.currency),
        change: None,
    }))
}

fn habit_rows(src: &SourceSnapshot, ctx: &AggregationContext) -> WidgetContent {
    let rows = agg::habit_checklist(&src.habits, &src.habit_logs, ctx.today())
        .into_iter()
        .map(|(habit, done)| {
            let mut row = ListRow::new(habit.title.clone());
            row.checked = Some(done);
            row
        })
        .collect();
    WidgetContent::Rows {
        rows,
        empty_message: "NO TRACKERS ACTIVE",
    }
}

fn goal_rows(src: &SourceSnapshot, ctx: &AggregationContext) -> WidgetContent {
    let rows = agg::upcoming_goals(&src.goals, ctx.now)
        .into_iter()
        .map(|goal| {
            let mut row = ListRow::new(goal.title);
            row.detail = Some(format!("{}d", goal.days_left));
            row.progress = Some(goal.progress);
            row.alert = goal.days_left < 0;
            row
        })
        .collect();
    WidgetContent::Rows {
        rows,
        empty_message: "NO MISSIONS SET",
    }
}

impl RegistryEntry for DashboardWidgetType {
    const PLACEHOLDER_TITLE: &'static str = "WIDGET";
    const PAGE: PageCopy = PageCopy {
        title: "Dashboard",
        subtitle: "OPERATIONAL OVERVIEW",
        empty_message: "DASHBOARD EMPTY",
    };

    fn spec(self) -> WidgetSpec {
        match self {
            Self::Clock => entry("SYSTEM_TIME", "Digital Clock", RenderShape::Custom, clock_face),
            Self::Modules => entry("NAVIGATION", "App Launcher", RenderShape::Custom, launcher),
            Self::TasksList => entry("PRIORITY_TASKS", "Active Tasks", RenderShape::List, pending_task_rows),
            Self::GoalsList => entry("ACTIVE_MISSIONS", "Mission List", RenderShape::List, goal_rows),
            Self::HabitToday => entry("DAILY_PROTOCOL", "Habit Checklist", RenderShape::List, habit_rows),
            Self::WalletSummary => entry("FINANCIAL_STATUS", "Net Worth", RenderShape::Custom, wallet_summary),
            Self::QuickNote => entry("QUICK_LOG", "Quick Capture", RenderShape::Custom, quick_note),
        }
    }
}

// Analytics widgets

fn net_worth(src: &SourceSnapshot, _: &AggregationContext) -> WidgetContent {
    WidgetContent::Series(agg::net_worth_trend(&src.accounts, &src.transactions))
}

fn expense_pie(src: &SourceSnapshot, _: &AggregationContext) -> WidgetContent {
    WidgetContent::Series(agg::expense_breakdown(&src.transactions))
}

fn revenue_bar(src: &SourceSnapshot, _: &AggregationContext) -> WidgetContent {
    WidgetContent::Series(agg::revenue_by_month(&src.project_tasks))
}

fn task_pie(src: &SourceSnapshot, _: &AggregationContext) -> WidgetContent {
    WidgetContent::Series(agg::task_completion(&src.tasks))
}

fn habit_trend(src: &SourceSnapshot, ctx: &AggregationContext) -> WidgetContent {
    WidgetContent::Series(agg::habit_consistency(&src.habits, &src.habit_logs, ctx.today()))
}

fn goal_bars(src: &SourceSnapshot, _: &AggregationContext) -> WidgetContent {
    WidgetContent::Series(agg::goal_progress(&src.goals))
}

fn crm_revenue(src: &SourceSnapshot, _: &AggregationContext) -> WidgetContent {
    WidgetContent::Series(agg::crm_revenue_trend(&src.project_tasks))
}

fn crm_distribution(src: &SourceSnapshot, _: &AggregationContext) -> WidgetContent {
    WidgetContent::Series(agg::crm_value_distribution(&src.project_tasks))
}

fn crm_clients(src: &SourceSnapshot, _: &AggregationContext) -> WidgetContent {
    WidgetContent::Series(agg::crm_top_clients(&src.project_tasks, &src.projects, &src.clients))
}

fn habit_performance(src: &SourceSnapshot, ctx: &AggregationContext) -> WidgetContent {
    WidgetContent::Series(agg::habit_analytics(
        &src.habits,
        &src.habit_logs,
        HabitView::default(),
        ctx.today(),
    ))
}

fn wallet_trend(src: &SourceSnapshot, ctx: &AggregationContext) -> WidgetContent {
    let trend = agg::wallet_analytics(&src.accounts, &src.transactions, WalletRange::default(), ctx.now);
    WidgetContent::Series(trend.series)
}

impl RegistryEntry for AnalyticsWidgetType {
    const PLACEHOLDER_TITLE: &'static str = "DATA MODULE";
    const PAGE: PageCopy = PageCopy {
        title: "Command_Center",
        subtitle: "GLOBAL ANALYTICS AGGREGATOR",
        empty_message: "NO DATA STREAMS ACTIVE",
    };

    fn spec(self) -> WidgetSpec {
        match self {
            Self::NetWorth => entry("FINANCIAL TRAJECTORY", "Financial Trajectory", RenderShape::Line, net_worth),
            Self::ExpensePie => entry("OUTFLOW DISTRIBUTION", "Spending Breakdown", RenderShape::Pie, expense_pie),
            Self::RevenueBar => entry("AGENCY REVENUE (EST)", "Agency Revenue", RenderShape::Bar, revenue_bar),
            Self::TaskPie => entry("DIRECTIVE COMPLETION", "Directive Completion", RenderShape::Pie, task_pie),
            Self::HabitTrend => entry("HABIT CONSISTENCY (14D)", "Consistency Score", RenderShape::Line, habit_trend),
            Self::GoalProgress => entry("MISSION VELOCITY", "Mission Progress", RenderShape::Bar, goal_bars),
            Self::CrmRevenue => entry("REVENUE TREND", "Revenue Trend", RenderShape::Bar, crm_revenue),
            Self::CrmDistribution => entry("VALUE DISTRIBUTION", "Value Distribution", RenderShape::Pie, crm_distribution),
            Self::CrmTopClients => entry("TOP CLIENTS", "Top Clients", RenderShape::Bar, crm_clients),
            Self::HabitPerformance => entry("PERFORMANCE_ANALYTICS", "Habit Performance", RenderShape::Line, habit_performance),
            Self::WalletTrend => entry("NET_WORTH_TREND", "Net Worth Trend", RenderShape::Line, wallet_trend),
        }
    }
}
