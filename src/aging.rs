//! Aging of overdue balances into four fixed day-range buckets.

use crate::schema::EnrichedRecord;
use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgingBucket {
    pub label: &'static str,
    pub amount: f64,
    pub count: usize,
    /// Escalating severity: green, yellow, orange, red.
    pub color: &'static str,
}

const BUCKETS: [(&str, &str); 4] = [
    ("1-30", "#22c55e"),
    ("31-60", "#eab308"),
    ("61-90", "#f97316"),
    ("90+", "#ef4444"),
];

/// Accumulates the remaining balance of every overdue record into exactly
/// one bucket keyed by whole days late. Boundary values belong to the
/// lower bucket (exactly 30 days late lands in `1-30`). Always returns the
/// four buckets in order.
pub fn compute_aging(records: &[EnrichedRecord], today: NaiveDate) -> Vec<AgingBucket> {
    let mut amounts = [0.0f64; 4];
    let mut counts = [0usize; 4];

    for r in records.iter().filter(|r| r.is_overdue(today)) {
        let days = r.days_overdue(today);
        let idx = match days {
            d if d <= 30 => 0,
            d if d <= 60 => 1,
            d if d <= 90 => 2,
            _ => 3,
        };
        amounts[idx] += r.record.remaining_balance;
        counts[idx] += 1;
    }

    BUCKETS
        .iter()
        .zip(amounts.iter().zip(counts.iter()))
        .map(|(&(label, color), (&amount, &count))| AgingBucket {
            label,
            amount,
            count,
            color,
        })
        .collect()
}
