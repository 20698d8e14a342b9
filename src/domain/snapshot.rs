// Point-in-time view of every source collection the aggregators read
use std::cmp::Reverse;

use serde::{Deserialize, Serialize};

use super::records::{Account, Client, Goal, Habit, HabitLog, Project, ProjectTask, Task, Transaction};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct SourceSnapshot {
    pub accounts: Vec<Account>,
    pub transactions: Vec<Transaction>,
    pub tasks: Vec<Task>,
    pub habits: Vec<Habit>,
    pub habit_logs: Vec<HabitLog>,
    pub goals: Vec<Goal>,
    pub clients: Vec<Client>,
    pub projects: Vec<Project>,
    pub project_tasks: Vec<ProjectTask>,
}

impl SourceSnapshot {
    /// Puts every collection in display order: newest first, goals by nearest target date.
    /// Sorts are stable, so ties keep their read order.
    pub fn normalized(mut self) -> Self {
        self.accounts.sort_by_key(|a| Reverse(a.created_at));
        self.transactions.sort_by_key(|t| Reverse(t.date));
        self.tasks.sort_by_key(|t| Reverse(t.created_at));
        self.habits.sort_by_key(|h| Reverse(h.created_at));
        self.goals.sort_by_key(|g| g.target_date);
        self.project_tasks.sort_by_key(|t| Reverse(t.created_at));
        self
    }

    pub fn record_count(&self) -> usize {
        self.accounts.len()
            + self.transactions.len()
            + self.tasks.len()
            + self.habits.len()
            + self.habit_logs.len()
            + self.goals.len()
            + self.clients.len()
            + self.projects.len()
            + self.project_tasks.len()
    }
}
