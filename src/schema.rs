use crate::error::ReceivablesError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::str::FromStr;

/// Group label used when a dimension value is blank or whitespace-only.
pub const UNDEFINED_LABEL: &str = "Undefined";

/// Company label used when a record carries no company.
pub const NO_COMPANY_LABEL: &str = "N/A";

/// Collection status of a receivable line item.
///
/// Source data carries Portuguese/Spanish status tokens; `from_raw` maps
/// them (and their English equivalents) onto this closed set. Anything
/// unrecognized becomes `Unknown`, which behaves as "not paid" everywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Status {
    Paid,
    Overdue,
    Upcoming,
    Partial,
    Judicial,
    #[default]
    Unknown,
}

impl Status {
    pub fn from_raw(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "pago" | "paid" => Status::Paid,
            "vencido" | "overdue" => Status::Overdue,
            "a vencer" | "upcoming" => Status::Upcoming,
            "parcial" | "partial" => Status::Partial,
            "judicial" => Status::Judicial,
            _ => Status::Unknown,
        }
    }
}

/// Whether a payment settled the full document or only part of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SettlementType {
    Full,
    Partial,
    #[default]
    Other,
}

impl SettlementType {
    pub fn from_raw(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "integral" | "full" => SettlementType::Full,
            "parcial" | "partial" => SettlementType::Partial,
            _ => SettlementType::Other,
        }
    }
}

/// Client master data from the external registry. Read-only reference data,
/// keyed by `code`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientRecord {
    pub code: String,
    pub legal_name: String,
    pub trade_name: String,
    pub collections_email: String,
    pub collections_phone: String,
    pub collections_contact: String,
    pub payment_terms: String,
    pub country: String,
    pub province: String,
    pub municipality: String,
    pub address: String,
}

/// One entry of a receivable's partial-payment history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentEntry {
    pub date: Option<NaiveDate>,
    pub amount: f64,
}

/// One accounts-receivable line item, normalized from the loosely-typed
/// source row. Amounts are floating currency units; dates are day-level.
///
/// `remaining_balance` defaults to `total_amount` when the source column is
/// blank. The two are stored independently, so `total_amount -
/// remaining_balance` is the effective paid amount only outside the
/// partial-settlement path.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReceivableRecord {
    pub id: String,
    pub company: String,
    pub client_code: String,
    pub client_name_raw: String,
    pub project: String,
    pub document_number: String,
    pub billing_period: String,
    pub issue_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub received_date: Option<NaiveDate>,
    pub total_amount: f64,
    pub remaining_balance: f64,
    pub partial_amount: f64,
    pub status: Status,
    pub settlement: SettlementType,
    pub bank: String,
    pub payment_method: String,
    pub collection_type: String,
    pub commission_rate: String,
    pub notes: String,
    pub comments: String,
    pub receipt_notes: String,
    pub payment_history: Vec<PaymentEntry>,
    pub created_at: Option<NaiveDate>,
    pub created_by: String,
    pub modified_at: Option<NaiveDate>,
    pub modified_by: String,
}

/// A receivable joined with its owning client. Built once per load cycle by
/// [`crate::ingestion::enrich`] and superseded wholesale on refresh.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichedRecord {
    #[serde(flatten)]
    pub record: ReceivableRecord,
    pub client: Option<ClientRecord>,
}

impl EnrichedRecord {
    /// Overdue means any non-paid status with a due date strictly before
    /// the reference day.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.record.status != Status::Paid
            && self.record.due_date.is_some_and(|due| due < today)
    }

    /// Amount credited when the record shows up as received: the partial
    /// amount when a partial settlement carries one, otherwise the full
    /// document total.
    pub fn received_amount(&self) -> f64 {
        if self.record.settlement == SettlementType::Partial && self.record.partial_amount > 0.0 {
            self.record.partial_amount
        } else {
            self.record.total_amount
        }
    }

    /// Effective paid amount for period/company aggregation: the partial
    /// amount when present, otherwise total minus remaining balance. Stale
    /// balance data can make this negative; it is carried through as-is.
    pub fn paid_amount(&self) -> f64 {
        if self.record.settlement == SettlementType::Partial && self.record.partial_amount > 0.0 {
            self.record.partial_amount
        } else {
            self.record.total_amount - self.record.remaining_balance
        }
    }

    /// Display name for grouping: client trade name, falling back to the
    /// raw name carried on the receivable itself.
    pub fn client_display_name(&self) -> Option<&str> {
        self.client
            .as_ref()
            .map(|c| c.trade_name.as_str())
            .filter(|n| !n.trim().is_empty())
            .or_else(|| {
                let raw = self.record.client_name_raw.as_str();
                (!raw.trim().is_empty()).then_some(raw)
            })
    }

    /// Identifier used to count distinct clients at risk: the client code
    /// when present, else the raw client name. `None` when both are blank.
    pub fn client_risk_id(&self) -> Option<&str> {
        if !self.record.client_code.is_empty() {
            Some(self.record.client_code.as_str())
        } else if !self.record.client_name_raw.is_empty() {
            Some(self.record.client_name_raw.as_str())
        } else {
            None
        }
    }

    pub fn days_overdue(&self, today: NaiveDate) -> i64 {
        self.record
            .due_date
            .map(|due| crate::utils::days_between(due, today))
            .unwrap_or(0)
    }
}

/// Status constraint of a [`FilterSpec`]. `Open` is the original
/// dashboard's "everything not yet paid" pseudo-status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StatusFilter {
    #[default]
    All,
    Open,
    Exact(Status),
}

impl FromStr for StatusFilter {
    type Err = ReceivablesError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" | "todos" | "" => Ok(StatusFilter::All),
            "open" | "aberto" => Ok(StatusFilter::Open),
            "pago" | "paid" => Ok(StatusFilter::Exact(Status::Paid)),
            "vencido" | "overdue" => Ok(StatusFilter::Exact(Status::Overdue)),
            "a vencer" | "upcoming" => Ok(StatusFilter::Exact(Status::Upcoming)),
            "parcial" | "partial" => Ok(StatusFilter::Exact(Status::Partial)),
            "judicial" => Ok(StatusFilter::Exact(Status::Judicial)),
            other => Err(ReceivablesError::UnknownStatusFilter(other.to_string())),
        }
    }
}

/// Multi-field filter. Empty set/string means no constraint on that field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterSpec {
    pub companies: HashSet<String>,
    pub billing_periods: HashSet<String>,
    pub date_range: (Option<NaiveDate>, Option<NaiveDate>),
    pub status: StatusFilter,
    pub bank: String,
    pub client_search: String,
}

/// Grouping dimension for the treemap aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Dimension {
    Client,
    Company,
    Project,
    Bank,
}

impl FromStr for Dimension {
    type Err = ReceivablesError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "client" | "cliente" => Ok(Dimension::Client),
            "company" | "empresa" => Ok(Dimension::Company),
            "project" | "obra" => Ok(Dimension::Project),
            "bank" | "banco" => Ok(Dimension::Bank),
            other => Err(ReceivablesError::UnknownDimension(other.to_string())),
        }
    }
}
