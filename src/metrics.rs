//! Scalar KPI summaries over a record collection. Pure and total: every
//! field of [`DashboardMetrics`] is well-defined for an empty collection,
//! and ratios with a zero denominator are 0.

use crate::schema::{EnrichedRecord, Status};
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// An amount together with the number of records that produced it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Tally {
    pub amount: f64,
    pub count: usize,
}

impl Tally {
    fn plus(self, amount: f64) -> Tally {
        Tally {
            amount: self.amount + amount,
            count: self.count + 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardMetrics {
    /// Receipts whose received date is the calendar day before `today`.
    pub received_yesterday: Tally,
    /// Effective paid amounts over all Paid/Partial records.
    pub received_in_period: Tally,
    /// Outstanding balance of records past their due date.
    pub overdue_balance: Tally,
    /// Outstanding balance due between `today` and `today + 30` inclusive.
    pub due_within_30_days: Tally,
    /// Overdue share of the total open balance, in percent.
    pub percent_overdue: f64,
    /// Distinct client identifiers among overdue records.
    pub clients_at_risk: usize,
    /// Raw overdue line-item count (may exceed `clients_at_risk`).
    pub overdue_item_count: usize,
    /// Remaining balance summed over every record regardless of status.
    pub total_open_balance: f64,
    pub total_record_count: usize,
}

pub fn compute_metrics(records: &[EnrichedRecord], today: NaiveDate) -> DashboardMetrics {
    let yesterday = today.checked_sub_days(Days::new(1)).unwrap_or(today);
    let horizon = today.checked_add_days(Days::new(30)).unwrap_or(today);

    let received_yesterday = records
        .iter()
        .filter(|r| r.record.received_date == Some(yesterday))
        .fold(Tally::default(), |acc, r| acc.plus(r.received_amount()));

    let received_in_period = records
        .iter()
        .filter(|r| matches!(r.record.status, Status::Paid | Status::Partial))
        .fold(Tally::default(), |acc, r| acc.plus(r.paid_amount()));

    let overdue_balance = records
        .iter()
        .filter(|r| r.is_overdue(today))
        .fold(Tally::default(), |acc, r| acc.plus(r.record.remaining_balance));

    let due_within_30_days = records
        .iter()
        .filter(|r| {
            r.record.status != Status::Paid
                && r.record
                    .due_date
                    .is_some_and(|due| due >= today && due <= horizon)
        })
        .fold(Tally::default(), |acc, r| acc.plus(r.record.remaining_balance));

    // The denominator sums every record's balance, paid or not, so the
    // percentage lines up with the grand total shown on the titles page.
    let total_open_balance: f64 = records.iter().map(|r| r.record.remaining_balance).sum();
    let percent_overdue = if total_open_balance > 0.0 {
        overdue_balance.amount / total_open_balance * 100.0
    } else {
        0.0
    };

    let mut at_risk: HashSet<&str> = HashSet::new();
    for r in records.iter().filter(|r| r.is_overdue(today)) {
        if let Some(id) = r.client_risk_id() {
            at_risk.insert(id);
        }
    }

    DashboardMetrics {
        received_yesterday,
        received_in_period,
        overdue_balance,
        due_within_30_days,
        percent_overdue,
        clients_at_risk: at_risk.len(),
        overdue_item_count: overdue_balance.count,
        total_open_balance,
        total_record_count: records.len(),
    }
}
