//! Grouping of overdue balances by a chosen dimension for treemap display.

use crate::schema::{Dimension, EnrichedRecord, UNDEFINED_LABEL};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupStat {
    pub name: String,
    pub total_balance: f64,
    pub count: usize,
    /// Mean lateness of the group's records, rounded to whole days.
    pub avg_delay_days: i64,
    /// Six-step severity scale keyed on the average delay.
    pub color: &'static str,
}

#[derive(Default)]
struct GroupAcc {
    balance: f64,
    count: usize,
    total_delay: i64,
}

fn severity_color(avg_delay: i64) -> &'static str {
    match avg_delay {
        d if d <= 30 => "#FFFF00",
        d if d <= 60 => "#FFD700",
        d if d <= 90 => "#FFA500",
        d if d <= 120 => "#FF8C00",
        d if d <= 180 => "#FF4500",
        _ => "#FF0000",
    }
}

fn group_key(item: &EnrichedRecord, dimension: Dimension) -> String {
    let key = match dimension {
        Dimension::Client => item.client_display_name().unwrap_or(""),
        Dimension::Company => item.record.company.as_str(),
        Dimension::Project => item.record.project.as_str(),
        Dimension::Bank => item.record.bank.as_str(),
    };
    if key.trim().is_empty() {
        UNDEFINED_LABEL.to_string()
    } else {
        key.to_string()
    }
}

/// Groups overdue records by `dimension`, accumulating balance, count and
/// average delay per group. Sorted descending by balance; equal balances
/// order alphabetically.
pub fn group_by_dimension(
    records: &[EnrichedRecord],
    dimension: Dimension,
    today: NaiveDate,
) -> Vec<GroupStat> {
    let mut groups: BTreeMap<String, GroupAcc> = BTreeMap::new();

    for item in records.iter().filter(|r| r.is_overdue(today)) {
        let acc = groups.entry(group_key(item, dimension)).or_default();
        acc.balance += item.record.remaining_balance;
        acc.count += 1;
        acc.total_delay += item.days_overdue(today);
    }

    let mut stats: Vec<GroupStat> = groups
        .into_iter()
        .map(|(name, acc)| {
            let avg_delay = (acc.total_delay as f64 / acc.count as f64).round() as i64;
            GroupStat {
                name,
                total_balance: acc.balance,
                count: acc.count,
                avg_delay_days: avg_delay,
                color: severity_color(avg_delay),
            }
        })
        .collect();

    stats.sort_by(|a, b| b.total_balance.total_cmp(&a.total_balance));
    stats
}
