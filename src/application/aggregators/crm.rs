// CRM aggregators: earned revenue over time, value buckets, top clients
use chrono::{Datelike, NaiveDate};
use std::collections::{BTreeMap, HashMap};

use super::LabelTotals;
use crate::domain::metric::{MetricPoint, MetricSeries};
use crate::domain::records::{Client, Project, ProjectTask};

pub const REVENUE_MONTHS: usize = 6;
pub const TOP_CLIENTS: usize = 5;

/// Earned value per calendar month, chronological
fn earned_by_month(tasks: &[ProjectTask]) -> BTreeMap<(i32, u32), f64> {
    let mut months = BTreeMap::new();
    for t in tasks.iter().filter(|t| t.is_earned()) {
        if let Some(created) = t.created() {
            *months.entry((created.year(), created.month())).or_insert(0.0) += t.value();
        }
    }
    months
}

fn month_label((year, month): (i32, u32), pattern: &str) -> String {
    NaiveDate::from_ymd_opt(year, month, 1)
        .map(|d| d.format(pattern).to_string())
        .unwrap_or_default()
}

/// Earned revenue for the most recent months with activity, labelled `Mon YY`
pub fn revenue_by_month(tasks: &[ProjectTask]) -> MetricSeries {
    let months = earned_by_month(tasks);
    let skip = months.len().saturating_sub(REVENUE_MONTHS);
    let points = months
        .into_iter()
        .skip(skip)
        .map(|(key, value)| MetricPoint::new(month_label(key, "%b %y"), value))
        .collect();
    MetricSeries::or_placeholder(points)
}

/// Earned revenue for every month with activity, labelled `Mon`,
/// or `Mon YY` once the months span more than one year
pub fn crm_revenue_trend(tasks: &[ProjectTask]) -> MetricSeries {
    let months = earned_by_month(tasks);
    let years: Vec<i32> = months.keys().map(|(year, _)| *year).collect();
    let pattern = if years.first() == years.last() { "%b" } else { "%b %y" };
    let points = months
        .into_iter()
        .map(|(key, value)| MetricPoint::new(month_label(key, pattern), value))
        .collect();
    MetricSeries::or_placeholder(points)
}

/// Settled (billed), Unbilled (completed, not billed) and Pipeline (not completed) value
pub fn crm_value_distribution(tasks: &[ProjectTask]) -> MetricSeries {
    if tasks.is_empty() {
        return MetricSeries::placeholder();
    }
    let sum = |keep: fn(&ProjectTask) -> bool| -> f64 {
        tasks.iter().filter(|t| keep(t)).map(ProjectTask::value).sum()
    };
    MetricSeries::new(vec![
        MetricPoint::new("Settled", sum(|t| t.billed)),
        MetricPoint::new("Unbilled", sum(|t| !t.billed && t.completed)),
        MetricPoint::new("Pipeline", sum(|t| !t.completed)),
    ])
}

/// Earned revenue per client company, joined task → project → client
pub fn crm_top_clients(
    tasks: &[ProjectTask],
    projects: &[Project],
    clients: &[Client],
) -> MetricSeries {
    let project_client: HashMap<&str, &str> = projects
        .iter()
        .map(|p| (p.id.as_str(), p.client_id.as_str()))
        .collect();
    let client_company: HashMap<&str, &str> = clients
        .iter()
        .map(|c| (c.id.as_str(), c.company.as_str()))
        .collect();

    let mut totals = LabelTotals::default();
    for t in tasks.iter().filter(|t| t.is_earned()) {
        let company = project_client
            .get(t.project_id.as_str())
            .and_then(|client_id| client_company.get(client_id));
        if let Some(company) = company {
            totals.add(company, t.value());
        }
    }

    let mut points = totals.into_descending();
    points.truncate(TOP_CLIENTS);
    MetricSeries::or_placeholder(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn task(project: &str, month: u32, hours: f64, completed: bool, billed: bool) -> ProjectTask {
        ProjectTask {
            id: format!("{}-{}", project, month),
            project_id: project.to_string(),
            hours,
            rate: 100.0,
            completed,
            billed,
            created_at: Utc
                .with_ymd_and_hms(2025, month, 15, 0, 0, 0)
                .unwrap()
                .timestamp_millis(),
            ..Default::default()
        }
    }

    #[test]
    fn test_revenue_by_month_keeps_latest_six_chronologically() {
        let tasks: Vec<ProjectTask> = (1..=9).map(|m| task("p", m, 1.0, true, false)).collect();
        let series = revenue_by_month(&tasks);
        let labels: Vec<&str> = series.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, vec!["Apr 25", "May 25", "Jun 25", "Jul 25", "Aug 25", "Sep 25"]);
        assert!(series.values().all(|v| v == 100.0));
    }

    #[test]
    fn test_revenue_ignores_unearned_work() {
        let tasks = vec![task("p", 3, 2.0, false, false), task("p", 3, 1.5, false, true)];
        let series = revenue_by_month(&tasks);
        assert_eq!(series.points(), &[MetricPoint::new("Mar 25", 150.0)]);
        assert!(revenue_by_month(&[task("p", 3, 2.0, false, false)]).is_placeholder());
    }

    #[test]
    fn test_crm_revenue_trend_all_months() {
        let tasks: Vec<ProjectTask> = (1..=9).map(|m| task("p", m, 1.0, true, true)).collect();
        let series = crm_revenue_trend(&tasks);
        assert_eq!(series.len(), 9);
        assert_eq!(series.points()[0].label, "Jan");
        assert!(crm_revenue_trend(&[]).is_placeholder());
    }

    #[test]
    fn test_crm_revenue_trend_labels_year_when_spanning_years() {
        let mut next_year = task("p", 1, 2.0, true, true);
        next_year.created_at = Utc.with_ymd_and_hms(2026, 1, 10, 0, 0, 0).unwrap().timestamp_millis();
        let tasks = vec![task("p", 1, 1.0, true, true), next_year];

        let series = crm_revenue_trend(&tasks);
        let labels: Vec<&str> = series.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, vec!["Jan 25", "Jan 26"]);
    }

    #[test]
    fn test_value_distribution_buckets() {
        let tasks = vec![
            task("p", 1, 1.0, true, true),
            task("p", 2, 2.0, true, false),
            task("p", 3, 4.0, false, false),
        ];
        let series = crm_value_distribution(&tasks);
        assert_eq!(
            series.points(),
            &[
                MetricPoint::new("Settled", 100.0),
                MetricPoint::new("Unbilled", 200.0),
                MetricPoint::new("Pipeline", 400.0),
            ]
        );
        assert!(crm_value_distribution(&[]).is_placeholder());
    }

    #[test]
    fn test_top_clients_join() {
        let clients = vec![
            Client { id: "c1".into(), company: "Acme".into(), ..Default::default() },
            Client { id: "c2".into(), company: "Globex".into(), ..Default::default() },
        ];
        let projects = vec![
            Project { id: "p1".into(), client_id: "c1".into(), ..Default::default() },
            Project { id: "p2".into(), client_id: "c2".into(), ..Default::default() },
            Project { id: "p3".into(), client_id: "c1".into(), ..Default::default() },
        ];
        let tasks = vec![
            task("p1", 1, 1.0, true, false),
            task("p2", 1, 3.0, true, true),
            task("p3", 2, 1.0, false, true),
            task("p2", 2, 9.0, false, false),
            task("orphan", 1, 50.0, true, true),
        ];

        let series = crm_top_clients(&tasks, &projects, &clients);
        assert_eq!(
            series.points(),
            &[MetricPoint::new("Globex", 300.0), MetricPoint::new("Acme", 200.0)]
        );
        assert!(crm_top_clients(&[], &projects, &clients).is_placeholder());
    }
}
