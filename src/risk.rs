//! Risk concentration, recurring-debtor ranking and per-company
//! received-vs-overdue performance.

use crate::schema::{EnrichedRecord, Status, NO_COMPANY_LABEL, UNDEFINED_LABEL};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConcentrationEntry {
    pub name: String,
    pub balance: f64,
}

/// Share of the total overdue debt held by the largest debtors.
/// `rest_percent` is the share outside the top 5.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConcentrationStat {
    pub top5_balance: f64,
    pub top10_balance: f64,
    pub top5_percent: f64,
    pub top10_percent: f64,
    pub rest_percent: f64,
    pub top5_clients: Vec<ConcentrationEntry>,
    pub total_overdue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebtorRankEntry {
    pub name: String,
    pub company: String,
    pub count: usize,
    pub avg_delay_days: i64,
    pub balance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyPerformance {
    pub name: String,
    pub received: f64,
    pub overdue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAnalysis {
    pub concentration: ConcentrationStat,
    pub recurring_debtors: Vec<DebtorRankEntry>,
    pub company_performance: Vec<CompanyPerformance>,
}

fn display_name(item: &EnrichedRecord) -> String {
    item.client_display_name()
        .unwrap_or(UNDEFINED_LABEL)
        .to_string()
}

fn company_name(item: &EnrichedRecord) -> String {
    let company = item.record.company.as_str();
    if company.is_empty() {
        NO_COMPANY_LABEL.to_string()
    } else {
        company.to_string()
    }
}

fn percent(part: f64, total: f64) -> f64 {
    if total > 0.0 {
        part / total * 100.0
    } else {
        0.0
    }
}

fn concentration(overdue: &[&EnrichedRecord]) -> ConcentrationStat {
    let mut per_client: BTreeMap<String, f64> = BTreeMap::new();
    for item in overdue {
        *per_client.entry(display_name(item)).or_insert(0.0) += item.record.remaining_balance;
    }

    let total_overdue: f64 = per_client.values().sum();

    let mut ranked: Vec<ConcentrationEntry> = per_client
        .into_iter()
        .map(|(name, balance)| ConcentrationEntry { name, balance })
        .collect();
    ranked.sort_by(|a, b| b.balance.total_cmp(&a.balance));

    let top5_balance: f64 = ranked.iter().take(5).map(|e| e.balance).sum();
    let top10_balance: f64 = ranked.iter().take(10).map(|e| e.balance).sum();

    ConcentrationStat {
        top5_balance,
        top10_balance,
        top5_percent: percent(top5_balance, total_overdue),
        top10_percent: percent(top10_balance, total_overdue),
        rest_percent: percent(total_overdue - top5_balance, total_overdue),
        top5_clients: ranked.into_iter().take(5).collect(),
        total_overdue,
    }
}

fn recurring_debtors(overdue: &[&EnrichedRecord], today: NaiveDate) -> Vec<DebtorRankEntry> {
    #[derive(Default)]
    struct Acc {
        count: usize,
        total_delay: i64,
        balance: f64,
    }

    let mut per_pair: BTreeMap<(String, String), Acc> = BTreeMap::new();
    for item in overdue {
        let acc = per_pair
            .entry((display_name(item), company_name(item)))
            .or_default();
        acc.count += 1;
        acc.total_delay += item.days_overdue(today);
        acc.balance += item.record.remaining_balance;
    }

    let mut ranking: Vec<DebtorRankEntry> = per_pair
        .into_iter()
        .map(|((name, company), acc)| DebtorRankEntry {
            name,
            company,
            count: acc.count,
            avg_delay_days: (acc.total_delay as f64 / acc.count as f64).round() as i64,
            balance: acc.balance,
        })
        .collect();

    ranking.sort_by(|a, b| b.balance.total_cmp(&a.balance));
    ranking
}

fn company_performance(records: &[EnrichedRecord], today: NaiveDate) -> Vec<CompanyPerformance> {
    #[derive(Default)]
    struct Acc {
        received: f64,
        overdue: f64,
    }

    let mut per_company: BTreeMap<String, Acc> = BTreeMap::new();
    for item in records {
        let acc = per_company.entry(company_name(item)).or_default();

        if matches!(item.record.status, Status::Paid | Status::Partial) {
            acc.received += item.paid_amount();
        }
        if item.is_overdue(today) {
            acc.overdue += item.record.remaining_balance;
        }
    }

    let mut performance: Vec<CompanyPerformance> = per_company
        .into_iter()
        .map(|(name, acc)| CompanyPerformance {
            name,
            received: acc.received,
            overdue: acc.overdue,
        })
        .collect();

    performance.sort_by(|a, b| b.overdue.total_cmp(&a.overdue));
    performance
}

/// Runs the three analyses over one collection. Concentration and the
/// debtor ranking see only overdue records; company performance sees the
/// whole collection.
pub fn analyze_risk(records: &[EnrichedRecord], today: NaiveDate) -> RiskAnalysis {
    let overdue: Vec<&EnrichedRecord> = records.iter().filter(|r| r.is_overdue(today)).collect();

    RiskAnalysis {
        concentration: concentration(&overdue),
        recurring_debtors: recurring_debtors(&overdue, today),
        company_performance: company_performance(records, today),
    }
}
