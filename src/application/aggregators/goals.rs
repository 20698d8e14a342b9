// Goal aggregators
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::metric::{MetricPoint, MetricSeries};
use crate::domain::records::{Goal, GoalStatus};

pub const GOAL_PROGRESS_CAP: usize = 6;
pub const GOAL_LABEL_CHARS: usize = 10;
pub const UPCOMING_GOALS: usize = 3;
const MS_PER_DAY: f64 = 86_400_000.0;

fn active(goals: &[Goal]) -> impl Iterator<Item = &Goal> {
    goals.iter().filter(|g| g.status == GoalStatus::Active)
}

/// Progress of the first active goals, labelled with a shortened title
pub fn goal_progress(goals: &[Goal]) -> MetricSeries {
    let points = active(goals)
        .take(GOAL_PROGRESS_CAP)
        .map(|g| {
            let label: String = g.title.chars().take(GOAL_LABEL_CHARS).collect();
            MetricPoint::new(label, g.progress())
        })
        .collect();
    MetricSeries::or_placeholder(points)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalDeadline {
    pub title: String,
    pub progress: f64,
    /// Whole days until the target date, rounded up; negative once overdue
    pub days_left: i64,
}

/// Active goals with the nearest target dates
pub fn upcoming_goals(goals: &[Goal], now: DateTime<Utc>) -> Vec<GoalDeadline> {
    let now_ms = now.timestamp_millis();
    let mut upcoming: Vec<&Goal> = active(goals).collect();
    upcoming.sort_by_key(|g| g.target_date);
    upcoming
        .into_iter()
        .take(UPCOMING_GOALS)
        .map(|g| GoalDeadline {
            title: g.title.clone(),
            progress: g.progress(),
            days_left: ((g.target_date - now_ms) as f64 / MS_PER_DAY).ceil() as i64,
        })
        .collect()
}
