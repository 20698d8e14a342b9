// Habit aggregators: consistency trend, ranged analytics, today's checklist
use chrono::{Datelike, Duration, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::ratio_percent;
use crate::domain::metric::{MetricPoint, MetricSeries};
use crate::domain::records::{Habit, HabitLog};

pub const CONSISTENCY_DAYS: i64 = 14;

/// Completed (habit, day) pairs
struct Completions<'a> {
    done: HashSet<(&'a str, &'a str)>,
}

impl<'a> Completions<'a> {
    fn new(logs: &'a [HabitLog]) -> Self {
        let done = logs
            .iter()
            .filter(|l| l.completed)
            .map(|l| (l.habit_id.as_str(), l.date.as_str()))
            .collect();
        Self { done }
    }

    fn is_done(&self, habit_id: &str, day: &str) -> bool {
        self.done.contains(&(habit_id, day))
    }

    /// Percent of habits completed on `day`; 0 when there are no habits
    fn score(&self, habits: &[Habit], day: NaiveDate) -> f64 {
        let key = day_key(day);
        let completed = habits.iter().filter(|h| self.is_done(&h.id, &key)).count();
        ratio_percent(completed, habits.len())
    }
}

fn day_key(day: NaiveDate) -> String {
    day.format("%Y-%m-%d").to_string()
}

/// Daily completion score for the last 14 days, oldest first, ending today
pub fn habit_consistency(habits: &[Habit], logs: &[HabitLog], today: NaiveDate) -> MetricSeries {
    let completions = Completions::new(logs);
    (0..CONSISTENCY_DAYS)
        .rev()
        .map(|back| {
            let day = today - Duration::days(back);
            MetricPoint::new(day.format("%a").to_string(), completions.score(habits, day))
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum HabitView {
    Daily,
    #[default]
    Weekly,
    Monthly,
    Yearly,
}

impl HabitView {
    pub fn parse(token: &str) -> Option<Self> {
        match token.to_ascii_lowercase().as_str() {
            "daily" => Some(Self::Daily),
            "weekly" => Some(Self::Weekly),
            "monthly" => Some(Self::Monthly),
            "yearly" => Some(Self::Yearly),
            _ => None,
        }
    }

    /// Number of points the view produces
    pub fn span(&self) -> usize {
        match self {
            Self::Daily | Self::Weekly => 7,
            Self::Monthly => 30,
            Self::Yearly => 12,
        }
    }
}

/// Completion score over a window sized by `view`: one point per day for the
/// daily, weekly and monthly views, one mean-of-days point per month for yearly.
pub fn habit_analytics(
    habits: &[Habit],
    logs: &[HabitLog],
    view: HabitView,
    today: NaiveDate,
) -> MetricSeries {
    let completions = Completions::new(logs);

    if view == HabitView::Yearly {
        let this_month = NaiveDate::from_ymd_opt(today.year(), today.month(), 1).unwrap_or(today);
        return (0..view.span() as u32)
            .rev()
            .filter_map(|back| this_month.checked_sub_months(Months::new(back)))
            .map(|first| {
                let days = days_in_month(first);
                let total: f64 = (0..days)
                    .map(|offset| completions.score(habits, first + Duration::days(offset)))
                    .sum();
                MetricPoint::new(first.format("%b").to_string().to_uppercase(), total / days as f64)
            })
            .collect();
    }

    (0..view.span() as i64)
        .rev()
        .map(|back| {
            let day = today - Duration::days(back);
            let label = match view {
                HabitView::Monthly => day.day().to_string(),
                _ => day.format("%a").to_string().to_uppercase(),
            };
            MetricPoint::new(label, completions.score(habits, day))
        })
        .collect()
}

fn days_in_month(first: NaiveDate) -> i64 {
    first
        .checked_add_months(Months::new(1))
        .map(|next| (next - first).num_days())
        .unwrap_or(30)
}

/// Every habit with its completion state for `today`, in collection order
pub fn habit_checklist<'a>(
    habits: &'a [Habit],
    logs: &[HabitLog],
    today: NaiveDate,
) -> Vec<(&'a Habit, bool)> {
    let completions = Completions::new(logs);
    let key = day_key(today);
    habits
        .iter()
        .map(|h| (h, completions.is_done(&h.id, &key)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::format::format_percent;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 10).unwrap()
    }

    fn habit(id: &str) -> Habit {
        Habit {
            id: id.to_string(),
            title: id.to_uppercase(),
            ..Default::default()
        }
    }

    fn log(habit_id: &str, day: NaiveDate) -> HabitLog {
        HabitLog {
            habit_id: habit_id.to_string(),
            date: day_key(day),
            completed: true,
        }
    }

    #[test]
    fn test_consistency_without_habits_is_all_zero() {
        let series = habit_consistency(&[], &[], today());
        assert_eq!(series.len(), CONSISTENCY_DAYS as usize);
        assert!(series.values().all(|v| v == 0.0));
    }

    #[test]
    fn test_consistency_all_done_is_100() {
        let habits = vec![habit("a"), habit("b")];
        let logs: Vec<HabitLog> = (0..CONSISTENCY_DAYS)
            .flat_map(|back| {
                let day = today() - Duration::days(back);
                vec![log("a", day), log("b", day)]
            })
            .collect();

        let series = habit_consistency(&habits, &logs, today());
        assert!(series.values().all(|v| v == 100.0));
        assert_eq!(series.last().unwrap().label, "Tue");
    }

    #[test]
    fn test_two_of_three_habits_scores_two_thirds() {
        let habits = vec![habit("a"), habit("b"), habit("c")];
        let logs = vec![log("a", today()), log("c", today())];

        let series = habit_consistency(&habits, &logs, today());
        let score = series.last().unwrap().value;
        assert!((score - 200.0 / 3.0).abs() < 1e-9);
        assert_eq!(format_percent(score), "67%");
    }

    #[test]
    fn test_uncompleted_logs_do_not_count() {
        let habits = vec![habit("a")];
        let mut entry = log("a", today());
        entry.completed = false;
        let series = habit_consistency(&habits, &[entry], today());
        assert_eq!(series.last().unwrap().value, 0.0);
    }

    #[test]
    fn test_analytics_spans() {
        let habits = vec![habit("a")];
        for view in [HabitView::Daily, HabitView::Weekly, HabitView::Monthly, HabitView::Yearly] {
            let series = habit_analytics(&habits, &[], view, today());
            assert_eq!(series.len(), view.span());
        }
    }

    #[test]
    fn test_monthly_labels_are_day_numbers() {
        let series = habit_analytics(&[habit("a")], &[log("a", today())], HabitView::Monthly, today());
        let last = series.last().unwrap();
        assert_eq!(last.label, "10");
        assert_eq!(last.value, 100.0);
        assert_eq!(series.points()[0].label, "9");
    }

    #[test]
    fn test_yearly_averages_month() {
        // February 2026 has 28 days; complete 7 of them
        let feb = NaiveDate::from_ymd_opt(2026, 2, 1).unwrap();
        let logs: Vec<HabitLog> = (0..7).map(|d| log("a", feb + Duration::days(d))).collect();

        let series = habit_analytics(&[habit("a")], &logs, HabitView::Yearly, today());
        let points = series.points();
        assert_eq!(points[11].label, "MAR");
        assert_eq!(points[10].label, "FEB");
        assert_eq!(points[10].value, 25.0);
        assert_eq!(points[0].label, "APR");
    }

    #[test]
    fn test_checklist_marks_today() {
        let habits = vec![habit("a"), habit("b")];
        let yesterday = today() - Duration::days(1);
        let logs = vec![log("a", today()), log("b", yesterday)];

        let checklist = habit_checklist(&habits, &logs, today());
        assert_eq!(checklist.len(), 2);
        assert!(checklist[0].1);
        assert!(!checklist[1].1);
    }
}
