//! Metric aggregators.
//!
//! Every aggregator is a pure function from source collections to a bounded,
//! render-ready [`MetricSeries`] (or a small typed row list for list widgets).
//! Wall-clock time only enters through explicit `now`/`today` arguments so the
//! same inputs always produce the same output.

mod crm;
mod finance;
mod goals;
mod habits;
mod tasks;

pub use crm::{
    crm_revenue_trend, crm_top_clients, crm_value_distribution, revenue_by_month, REVENUE_MONTHS,
    TOP_CLIENTS,
};
pub use finance::{
    expense_breakdown, net_worth_trend, total_balance, wallet_analytics, WalletRange, WalletTrend,
    EXPENSE_CATEGORY_CAP, NET_WORTH_STEPS, NOW_LABEL,
};
pub use goals::{goal_progress, upcoming_goals, GoalDeadline, GOAL_LABEL_CHARS, GOAL_PROGRESS_CAP, UPCOMING_GOALS};
pub use habits::{
    habit_analytics, habit_checklist, habit_consistency, HabitView, CONSISTENCY_DAYS,
};
pub use tasks::{pending_tasks, task_completion, PENDING_TASKS};

use chrono::{DateTime, NaiveDate, Utc};
use std::collections::HashMap;

use crate::domain::metric::MetricPoint;
use crate::domain::settings::CurrencyFormat;

/// Inputs every aggregator may need besides the source collections
#[derive(Debug, Clone)]
pub struct AggregationContext {
    pub now: DateTime<Utc>,
    pub currency: CurrencyFormat,
}

impl AggregationContext {
    pub fn new(now: DateTime<Utc>, currency: CurrencyFormat) -> Self {
        Self { now, currency }
    }

    pub fn today(&self) -> NaiveDate {
        self.now.date_naive()
    }
}

/// Sums values per label, keeping labels in first-seen order
#[derive(Debug, Default)]
struct LabelTotals {
    points: Vec<MetricPoint>,
    index: HashMap<String, usize>,
}

impl LabelTotals {
    fn add(&mut self, label: &str, value: f64) {
        match self.index.get(label) {
            Some(&i) => self.points[i].value += value,
            None => {
                self.index.insert(label.to_string(), self.points.len());
                self.points.push(MetricPoint::new(label, value));
            }
        }
    }

    /// Largest first; ties keep first-seen order
    fn into_descending(self) -> Vec<MetricPoint> {
        let mut points = self.points;
        points.sort_by(|a, b| b.value.total_cmp(&a.value));
        points
    }
}

fn ratio_percent(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64 * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_totals_groups_and_sorts() {
        let mut totals = LabelTotals::default();
        totals.add("Food", 20.0);
        totals.add("Rent", 500.0);
        totals.add("Food", 30.0);
        totals.add("Fun", 50.0);

        let points = totals.into_descending();
        let labels: Vec<&str> = points.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, vec!["Rent", "Food", "Fun"]);
        assert_eq!(points[1].value, 50.0);
    }

    #[test]
    fn test_ratio_percent_zero_denominator() {
        assert_eq!(ratio_percent(3, 0), 0.0);
        assert_eq!(ratio_percent(1, 4), 25.0);
    }
}
