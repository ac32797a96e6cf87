//! Multi-field conjunction filter over the enriched collection, plus the
//! distinct-value helpers the surrounding UI uses to populate its
//! dropdowns.

use crate::schema::{EnrichedRecord, FilterSpec, Status, StatusFilter};

impl FilterSpec {
    /// A record passes iff every active constraint holds. Empty set/string
    /// constraints always pass; the date range only applies when both
    /// bounds and the record's due date are present.
    pub fn matches(&self, item: &EnrichedRecord) -> bool {
        if !self.companies.is_empty() && !self.companies.contains(&item.record.company) {
            return false;
        }

        if !self.billing_periods.is_empty()
            && !self.billing_periods.contains(&item.record.billing_period)
        {
            return false;
        }

        if let ((Some(start), Some(end)), Some(due)) = (self.date_range, item.record.due_date) {
            if due < start || due > end {
                return false;
            }
        }

        match self.status {
            StatusFilter::All => {}
            StatusFilter::Open => {
                if item.record.status == Status::Paid {
                    return false;
                }
            }
            StatusFilter::Exact(status) => {
                if item.record.status != status {
                    return false;
                }
            }
        }

        if !self.bank.is_empty() && item.record.bank != self.bank {
            return false;
        }

        if !self.client_search.is_empty() {
            let needle = self.client_search.to_lowercase();
            let name = item.client_display_name().unwrap_or("");
            if !name.to_lowercase().contains(&needle) {
                return false;
            }
        }

        true
    }
}

/// Reduces the collection to the records matching `spec`. Snapshot
/// semantics: the result is an owned collection, the input is untouched.
pub fn filter_records(records: &[EnrichedRecord], spec: &FilterSpec) -> Vec<EnrichedRecord> {
    records
        .iter()
        .filter(|item| spec.matches(item))
        .cloned()
        .collect()
}

fn distinct_sorted<F>(records: &[EnrichedRecord], field: F) -> Vec<String>
where
    F: Fn(&EnrichedRecord) -> &str,
{
    let mut values: Vec<String> = records
        .iter()
        .map(|r| field(r).to_string())
        .filter(|v| !v.is_empty())
        .collect();
    values.sort();
    values.dedup();
    values
}

pub fn available_companies(records: &[EnrichedRecord]) -> Vec<String> {
    distinct_sorted(records, |r| &r.record.company)
}

pub fn available_banks(records: &[EnrichedRecord]) -> Vec<String> {
    distinct_sorted(records, |r| &r.record.bank)
}

pub fn available_billing_periods(records: &[EnrichedRecord]) -> Vec<String> {
    distinct_sorted(records, |r| &r.record.billing_period)
}
