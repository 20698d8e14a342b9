// Source collection records, as they arrive from the document store
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

fn millis_to_utc(ms: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_millis(ms)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Account {
    pub id: String,
    pub name: String,
    pub balance: f64,
    pub currency: String,
    pub exclude_from_totals: bool,
    pub created_at: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    #[default]
    Expense,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Transaction {
    pub id: String,
    pub account_id: String,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub amount: f64,
    pub category: String,
    pub description: String,
    /// Epoch milliseconds
    pub date: i64,
}

impl Transaction {
    pub fn occurred_at(&self) -> Option<DateTime<Utc>> {
        millis_to_utc(self.date)
    }

    /// Effect of this transaction on the balance it was booked against
    pub fn signed_amount(&self) -> f64 {
        match self.kind {
            TransactionType::Income => self.amount,
            TransactionType::Expense => -self.amount,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Subtask {
    pub id: String,
    pub title: String,
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub completed: bool,
    pub created_at: i64,
    pub subtasks: Vec<Subtask>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Habit {
    pub id: String,
    pub title: String,
    pub created_at: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct HabitLog {
    pub habit_id: String,
    /// Calendar day, `YYYY-MM-DD`
    pub date: String,
    pub completed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GoalStatus {
    #[default]
    Active,
    Completed,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Goal {
    pub id: String,
    pub title: String,
    /// Epoch milliseconds
    pub target_date: i64,
    pub target_amount: Option<f64>,
    pub current_amount: Option<f64>,
    pub status: GoalStatus,
}

impl Goal {
    /// Percent of the numeric target reached, capped at 100.
    /// Goals without a positive target report 0.
    pub fn progress(&self) -> f64 {
        match self.target_amount {
            Some(target) if target > 0.0 => {
                (self.current_amount.unwrap_or(0.0) / target * 100.0).min(100.0)
            }
            _ => 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Client {
    pub id: String,
    pub name: String,
    pub company: String,
    pub email: String,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Project {
    pub id: String,
    pub client_id: String,
    pub title: String,
    pub status: String,
    pub hourly_rate: Option<f64>,
    pub budget: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectTask {
    pub id: String,
    pub project_id: String,
    pub title: String,
    pub completed: bool,
    pub hours: f64,
    pub rate: f64,
    pub billed: bool,
    /// Epoch milliseconds
    pub created_at: i64,
}

impl ProjectTask {
    pub fn value(&self) -> f64 {
        self.hours * self.rate
    }

    /// Work that counts as earned revenue: billed or at least completed
    pub fn is_earned(&self) -> bool {
        self.billed || self.completed
    }

    pub fn created(&self) -> Option<DateTime<Utc>> {
        millis_to_utc(self.created_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transaction_deserializes_from_store_shape() {
        let json = r#"{"id":"t1","accountId":"a1","type":"income","amount":12.5,"category":"Salary","date":1700000000000,"userId":"u"}"#;
        let t: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(t.kind, TransactionType::Income);
        assert_eq!(t.account_id, "a1");
        assert_eq!(t.signed_amount(), 12.5);
        assert!(t.occurred_at().is_some());
    }

    #[test]
    fn test_goal_progress_handles_missing_target() {
        let goal = Goal {
            current_amount: Some(50.0),
            ..Default::default()
        };
        assert_eq!(goal.progress(), 0.0);

        let goal = Goal {
            target_amount: Some(0.0),
            current_amount: Some(50.0),
            ..Default::default()
        };
        assert_eq!(goal.progress(), 0.0);

        let goal = Goal {
            target_amount: Some(40.0),
            current_amount: Some(50.0),
            ..Default::default()
        };
        assert_eq!(goal.progress(), 100.0);
    }
}
