//! # Receivables Analytics
//!
//! A library for turning raw accounts-receivable rows and client master
//! data into the derived structures behind a collections dashboard:
//! KPI summaries, aging buckets, grouped treemap statistics and
//! risk/performance rankings.
//!
//! ## Core Concepts
//!
//! - **Receivable record**: one invoice/title owed by a client, normalized
//!   from a loosely-typed source row by the locale parsers
//! - **Enriched record**: a receivable joined with its owning client by
//!   client code
//! - **Overdue**: any non-paid status with a due date strictly before the
//!   reference "today"
//! - **Total engine**: every aggregator is a pure function over an
//!   immutable collection; malformed data degrades to zeroes/absences and
//!   never aborts a computation
//!
//! ## Example
//!
//! ```rust,ignore
//! use receivables_analytics::*;
//! use chrono::NaiveDate;
//!
//! let receivables = parse_receivable_payload(&receivables_json)?;
//! let clients = parse_client_payload(&clients_json)?;
//! let records = enrich(receivables, &clients);
//!
//! let spec = FilterSpec {
//!     status: StatusFilter::Open,
//!     ..Default::default()
//! };
//! let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
//!
//! let snapshot = build_dashboard(&records, &spec, Dimension::Client, today);
//! println!("{:.1}% overdue", snapshot.metrics.percent_overdue);
//! ```

pub mod aging;
pub mod error;
pub mod filter;
pub mod grouping;
pub mod ingestion;
pub mod metrics;
pub mod parse;
pub mod risk;
pub mod schema;
pub mod utils;

pub use aging::{compute_aging, AgingBucket};
pub use error::{ReceivablesError, Result};
pub use filter::{
    available_banks, available_billing_periods, available_companies, filter_records,
};
pub use grouping::{group_by_dimension, GroupStat};
pub use ingestion::{
    enrich, ingest_clients, ingest_receivables, parse_client_payload, parse_receivable_payload,
    SOURCE_PAGE_SIZE,
};
pub use metrics::{compute_metrics, DashboardMetrics, Tally};
pub use parse::{parse_amount, parse_date};
pub use risk::{
    analyze_risk, CompanyPerformance, ConcentrationEntry, ConcentrationStat, DebtorRankEntry,
    RiskAnalysis,
};
pub use schema::*;
pub use utils::wall_clock_today;

use chrono::NaiveDate;
use log::{debug, info};

/// Everything a dashboard view needs, derived from one filtered pass over
/// the collection. The four aggregations are independent pure functions
/// and remain individually callable.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct DashboardSnapshot {
    pub metrics: DashboardMetrics,
    pub aging: Vec<AgingBucket>,
    pub treemap: Vec<GroupStat>,
    pub risk: RiskAnalysis,
}

/// Filters the collection once and runs all four aggregators on the
/// result. `dimension` selects the treemap grouping.
pub fn build_dashboard(
    records: &[EnrichedRecord],
    spec: &FilterSpec,
    dimension: Dimension,
    today: NaiveDate,
) -> DashboardSnapshot {
    let filtered = filter_records(records, spec);

    info!(
        "Building dashboard over {} of {} records",
        filtered.len(),
        records.len()
    );
    debug!("Reference day: {}, treemap dimension: {:?}", today, dimension);

    DashboardSnapshot {
        metrics: compute_metrics(&filtered, today),
        aging: compute_aging(&filtered, today),
        treemap: group_by_dimension(&filtered, dimension, today),
        risk: analyze_risk(&filtered, today),
    }
}
