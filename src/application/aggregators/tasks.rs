// Task aggregators
use crate::domain::metric::{MetricPoint, MetricSeries};
use crate::domain::records::Task;

pub const PENDING_TASKS: usize = 4;

/// Completed vs pending counts
pub fn task_completion(tasks: &[Task]) -> MetricSeries {
    if tasks.is_empty() {
        return MetricSeries::placeholder();
    }
    let completed = tasks.iter().filter(|t| t.completed).count();
    MetricSeries::new(vec![
        MetricPoint::new("Completed", completed as f64),
        MetricPoint::new("Pending", (tasks.len() - completed) as f64),
    ])
}

/// First few open tasks, in collection order
pub fn pending_tasks(tasks: &[Task]) -> Vec<&Task> {
    tasks
        .iter()
        .filter(|t| !t.completed)
        .take(PENDING_TASKS)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(title: &str, completed: bool) -> Task {
        Task {
            id: title.to_string(),
            title: title.to_string(),
            completed,
            ..Default::default()
        }
    }

    #[test]
    fn test_task_completion_counts() {
        let tasks = vec![task("a", true), task("b", false), task("c", false)];
        let series = task_completion(&tasks);
        assert_eq!(
            series.points(),
            &[MetricPoint::new("Completed", 1.0), MetricPoint::new("Pending", 2.0)]
        );
    }

    #[test]
    fn test_task_completion_empty() {
        assert!(task_completion(&[]).is_placeholder());
    }

    #[test]
    fn test_pending_tasks_limit() {
        let tasks: Vec<Task> = (0..10).map(|i| task(&i.to_string(), i % 3 == 0)).collect();
        let pending = pending_tasks(&tasks);
        assert_eq!(pending.len(), PENDING_TASKS);
        assert!(pending.iter().all(|t| !t.completed));
        assert_eq!(pending[0].title, "1");
    }
}
