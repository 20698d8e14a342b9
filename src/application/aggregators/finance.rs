// Wallet aggregators: net worth trajectory, spending breakdown, ranged trend
use chrono::{DateTime, Datelike, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::LabelTotals;
use crate::domain::metric::{MetricPoint, MetricSeries};
use crate::domain::records::{Account, Transaction, TransactionType};

pub const NOW_LABEL: &str = "Now";
pub const NET_WORTH_STEPS: usize = 10;
pub const EXPENSE_CATEGORY_CAP: usize = 6;
const UNCATEGORIZED: &str = "Uncategorized";

fn day_label(t: &Transaction) -> String {
    t.occurred_at()
        .map(|d| d.format("%b %-d").to_string())
        .unwrap_or_default()
}

/// Accounts counted towards totals, and their summed balance
fn counted_accounts(accounts: &[Account]) -> (HashSet<&str>, f64) {
    let counted: Vec<&Account> = accounts.iter().filter(|a| !a.exclude_from_totals).collect();
    let balance = counted.iter().map(|a| a.balance).sum();
    (counted.iter().map(|a| a.id.as_str()).collect(), balance)
}

/// Transactions booked against counted accounts, newest first
fn newest_first<'a>(transactions: &'a [Transaction], counted: &HashSet<&str>) -> Vec<&'a Transaction> {
    let mut relevant: Vec<&Transaction> = transactions
        .iter()
        .filter(|t| counted.contains(t.account_id.as_str()))
        .collect();
    relevant.sort_by(|a, b| b.date.cmp(&a.date));
    relevant
}

/// Sum of every account balance, flagged accounts included
pub fn total_balance(accounts: &[Account]) -> f64 {
    accounts.iter().map(|a| a.balance).sum()
}

/// Balance trajectory reconstructed backwards from today's total through the most
/// recent transactions, returned oldest first and ending at the `Now` anchor.
pub fn net_worth_trend(accounts: &[Account], transactions: &[Transaction]) -> MetricSeries {
    let (counted, balance) = counted_accounts(accounts);

    let mut points = vec![MetricPoint::new(NOW_LABEL, balance)];
    let mut runner = balance;
    for t in newest_first(transactions, &counted).into_iter().take(NET_WORTH_STEPS) {
        runner -= t.signed_amount();
        points.push(MetricPoint::new(day_label(t), runner));
    }

    points.reverse();
    MetricSeries::new(points)
}

/// Expense totals per category, largest first
pub fn expense_breakdown(transactions: &[Transaction]) -> MetricSeries {
    let mut totals = LabelTotals::default();
    for t in transactions.iter().filter(|t| t.kind == TransactionType::Expense) {
        let category = t.category.trim();
        let category = if category.is_empty() { UNCATEGORIZED } else { category };
        totals.add(category, t.amount);
    }

    let mut points = totals.into_descending();
    points.truncate(EXPENSE_CATEGORY_CAP);
    MetricSeries::or_placeholder(points)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum WalletRange {
    #[serde(rename = "1M")]
    OneMonth,
    #[default]
    #[serde(rename = "3M")]
    ThreeMonths,
    #[serde(rename = "6M")]
    SixMonths,
    #[serde(rename = "YTD")]
    YearToDate,
    #[serde(rename = "ALL")]
    All,
}

impl WalletRange {
    pub fn parse(token: &str) -> Option<Self> {
        match token.to_ascii_uppercase().as_str() {
            "1M" => Some(Self::OneMonth),
            "3M" => Some(Self::ThreeMonths),
            "6M" => Some(Self::SixMonths),
            "YTD" => Some(Self::YearToDate),
            "ALL" => Some(Self::All),
            _ => None,
        }
    }

    /// Earliest instant shown for this range; `None` shows everything
    pub fn cutoff(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            Self::OneMonth => now.checked_sub_months(Months::new(1)),
            Self::ThreeMonths => now.checked_sub_months(Months::new(3)),
            Self::SixMonths => now.checked_sub_months(Months::new(6)),
            Self::YearToDate => NaiveDate::from_ymd_opt(now.year(), 1, 1)
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|d| d.and_utc()),
            Self::All => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WalletTrend {
    pub series: MetricSeries,
    /// Change from the first to the last shown point, in percent
    pub percent_change: f64,
}

/// Full balance history over the selected range, oldest first, with the
/// relative change across the window.
pub fn wallet_analytics(
    accounts: &[Account],
    transactions: &[Transaction],
    range: WalletRange,
    now: DateTime<Utc>,
) -> WalletTrend {
    let (counted, balance) = counted_accounts(accounts);
    let history = newest_first(transactions, &counted);

    if history.is_empty() {
        return WalletTrend {
            series: MetricSeries::new(vec![MetricPoint::new(NOW_LABEL, balance)]),
            percent_change: 0.0,
        };
    }

    let mut timeline = Vec::with_capacity(history.len() + 1);
    timeline.push((MetricPoint::new(NOW_LABEL, balance), now.timestamp_millis()));
    let mut runner = balance;
    for t in history {
        runner -= t.signed_amount();
        timeline.push((MetricPoint::new(day_label(t), runner), t.date));
    }

    let cutoff = range
        .cutoff(now)
        .map(|c| c.timestamp_millis())
        .unwrap_or(i64::MIN);
    let mut shown: Vec<MetricPoint> = timeline
        .iter()
        .filter(|(_, at)| *at >= cutoff)
        .map(|(p, _)| p.clone())
        .collect();
    shown.reverse();

    if shown.len() < 2 {
        let mut recent: Vec<MetricPoint> = timeline
            .into_iter()
            .take(NET_WORTH_STEPS)
            .map(|(p, _)| p)
            .collect();
        recent.reverse();
        return WalletTrend {
            series: MetricSeries::new(recent),
            percent_change: 0.0,
        };
    }

    let start = shown[0].value;
    let end = shown[shown.len() - 1].value;
    let percent_change = if start != 0.0 {
        (end - start) / start * 100.0
    } else {
        0.0
    };

    WalletTrend {
        series: MetricSeries::new(shown),
        percent_change,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const DAY_MS: i64 = 86_400_000;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 6, 15, 12, 0, 0).unwrap()
    }

    fn account(id: &str, balance: f64, excluded: bool) -> Account {
        Account {
            id: id.to_string(),
            balance,
            exclude_from_totals: excluded,
            ..Default::default()
        }
    }

    fn tx(account: &str, kind: TransactionType, amount: f64, days_ago: i64) -> Transaction {
        Transaction {
            id: format!("{}-{}", account, days_ago),
            account_id: account.to_string(),
            kind,
            amount,
            category: "General".to_string(),
            date: now().timestamp_millis() - days_ago * DAY_MS,
            ..Default::default()
        }
    }

    fn expense(category: &str, amount: f64) -> Transaction {
        Transaction {
            kind: TransactionType::Expense,
            category: category.to_string(),
            amount,
            ..Default::default()
        }
    }

    #[test]
    fn test_expense_breakdown_scenario() {
        let txns = vec![expense("Food", 20.0), expense("Food", 30.0), expense("Rent", 500.0)];
        let series = expense_breakdown(&txns);
        assert_eq!(
            series.points(),
            &[MetricPoint::new("Rent", 500.0), MetricPoint::new("Food", 50.0)]
        );
    }

    #[test]
    fn test_expense_breakdown_caps_and_ignores_income() {
        let mut txns: Vec<Transaction> = (0..9)
            .map(|i| expense(&format!("C{}", i), (i + 1) as f64))
            .collect();
        txns.push(Transaction {
            kind: TransactionType::Income,
            category: "Salary".to_string(),
            amount: 10_000.0,
            ..Default::default()
        });
        txns.push(expense("", 0.5));

        let series = expense_breakdown(&txns);
        assert_eq!(series.len(), EXPENSE_CATEGORY_CAP);
        assert_eq!(series.points()[0].label, "C8");
        assert!(series.iter().all(|p| p.label != "Salary"));
    }

    #[test]
    fn test_expense_breakdown_empty_is_placeholder() {
        assert!(expense_breakdown(&[]).is_placeholder());
    }

    #[test]
    fn test_net_worth_walk_forward_reproduces_balance() {
        let accounts = vec![account("a", 1000.0, false), account("b", 250.5, false)];
        let txns = vec![
            tx("a", TransactionType::Income, 300.0, 1),
            tx("a", TransactionType::Expense, 45.25, 2),
            tx("b", TransactionType::Expense, 12.0, 3),
            tx("b", TransactionType::Income, 80.0, 5),
        ];

        let series = net_worth_trend(&accounts, &txns);
        assert_eq!(series.len(), 5);
        assert_eq!(series.last().unwrap().label, NOW_LABEL);

        // Walk forward from the oldest point, applying transactions oldest first
        let mut chronological: Vec<&Transaction> = txns.iter().collect();
        chronological.sort_by_key(|t| t.date);
        let mut balance = series.points()[0].value;
        for t in chronological {
            balance += t.signed_amount();
        }
        assert_eq!(balance, 1250.5);
    }

    #[test]
    fn test_net_worth_caps_steps_and_skips_excluded_accounts() {
        let accounts = vec![account("a", 100.0, false), account("hidden", 9_999.0, true)];
        let mut txns: Vec<Transaction> = (1..=15)
            .map(|d| tx("a", TransactionType::Expense, 1.0, d))
            .collect();
        txns.push(tx("hidden", TransactionType::Income, 5_000.0, 0));

        let series = net_worth_trend(&accounts, &txns);
        assert_eq!(series.len(), NET_WORTH_STEPS + 1);
        assert_eq!(series.last().unwrap().value, 100.0);
        assert_eq!(series.points()[0].value, 110.0);
    }

    #[test]
    fn test_net_worth_empty_is_now_anchor() {
        let series = net_worth_trend(&[], &[]);
        assert_eq!(series.points(), &[MetricPoint::new(NOW_LABEL, 0.0)]);
    }

    #[test]
    fn test_wallet_analytics_filters_by_range() {
        let accounts = vec![account("a", 1000.0, false)];
        let txns = vec![
            tx("a", TransactionType::Income, 500.0, 10),
            tx("a", TransactionType::Income, 250.0, 60),
            tx("a", TransactionType::Expense, 100.0, 200),
        ];

        let trend = wallet_analytics(&accounts, &txns, WalletRange::OneMonth, now());
        // Point before the 10-day-old income, then Now
        assert_eq!(trend.series.len(), 2);
        assert_eq!(trend.series.points()[0].value, 500.0);
        assert_eq!(trend.percent_change, 100.0);

        let all = wallet_analytics(&accounts, &txns, WalletRange::All, now());
        assert_eq!(all.series.len(), 4);
        assert_eq!(all.series.points()[0].value, 350.0);
    }

    #[test]
    fn test_wallet_analytics_sparse_window_falls_back() {
        let accounts = vec![account("a", 50.0, false)];
        let txns = vec![tx("a", TransactionType::Income, 50.0, 100)];

        let trend = wallet_analytics(&accounts, &txns, WalletRange::OneMonth, now());
        assert_eq!(trend.percent_change, 0.0);
        assert_eq!(trend.series.len(), 2);
        assert_eq!(trend.series.last().unwrap().label, NOW_LABEL);
    }

    #[test]
    fn test_wallet_analytics_zero_start_has_no_change() {
        let accounts = vec![account("a", 40.0, false)];
        let txns = vec![tx("a", TransactionType::Income, 40.0, 1)];
        let trend = wallet_analytics(&accounts, &txns, WalletRange::All, now());
        assert_eq!(trend.series.points()[0].value, 0.0);
        assert_eq!(trend.percent_change, 0.0);
    }

    #[test]
    fn test_wallet_analytics_empty() {
        let trend = wallet_analytics(&[], &[], WalletRange::All, now());
        assert_eq!(trend.series.len(), 1);
        assert_eq!(trend.percent_change, 0.0);
    }

    #[test]
    fn test_range_parse_and_cutoff() {
        assert_eq!(WalletRange::parse("ytd"), Some(WalletRange::YearToDate));
        assert_eq!(WalletRange::parse("2Y"), None);
        let ytd = WalletRange::YearToDate.cutoff(now()).unwrap();
        assert_eq!(ytd, Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap());
        assert!(WalletRange::All.cutoff(now()).is_none());
    }
}
