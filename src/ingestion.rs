//! Conversion of loosely-typed source rows into the typed data model, plus
//! the client join. The receivables source returns arbitrary JSON rows
//! (paginated upstream in pages of [`SOURCE_PAGE_SIZE`]); everything is
//! normalized here through the locale parsers before it reaches an
//! aggregator.

use crate::error::Result;
use crate::parse::{parse_amount, parse_date};
use crate::schema::{
    ClientRecord, EnrichedRecord, PaymentEntry, ReceivableRecord, SettlementType, Status,
};
use chrono::NaiveDate;
use log::debug;
use serde_json::Value;
use std::collections::HashMap;

/// Page size used by loaders fetching from the receivables source.
pub const SOURCE_PAGE_SIZE: usize = 1000;

fn text(row: &Value, key: &str) -> String {
    match row.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

fn amount(row: &Value, key: &str) -> f64 {
    match row.get(key) {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => parse_amount(s),
        _ => 0.0,
    }
}

fn date(row: &Value, key: &str) -> Option<NaiveDate> {
    match row.get(key) {
        Some(Value::String(s)) => parse_date(s),
        _ => None,
    }
}

fn history_amount(entry: &Value) -> f64 {
    for key in ["amount", "valor", "importe"] {
        match entry.get(key) {
            Some(Value::Number(n)) => return n.as_f64().unwrap_or(0.0),
            Some(Value::String(s)) => return parse_amount(s),
            _ => {}
        }
    }
    0.0
}

fn history_date(entry: &Value) -> Option<NaiveDate> {
    ["date", "data", "fecha"]
        .iter()
        .find_map(|key| date(entry, key))
}

/// Parses the partial-payment history column, which arrives either as a
/// JSON array or as a JSON-encoded string. Malformed text degrades to an
/// empty history.
fn payment_history(row: &Value, key: &str) -> Vec<PaymentEntry> {
    let parsed;
    let entries = match row.get(key) {
        Some(Value::Array(items)) => items.as_slice(),
        Some(Value::String(s)) if !s.trim().is_empty() => {
            match serde_json::from_str::<Value>(s) {
                Ok(Value::Array(items)) => {
                    parsed = items;
                    parsed.as_slice()
                }
                _ => {
                    debug!("Discarding malformed payment history: {}", s);
                    return Vec::new();
                }
            }
        }
        _ => return Vec::new(),
    };

    entries
        .iter()
        .map(|entry| PaymentEntry {
            date: history_date(entry),
            amount: history_amount(entry),
        })
        .collect()
}

/// Normalizes one receivables row. `index` backs the generated id for rows
/// arriving without one.
pub fn receivable_from_row(row: &Value, index: usize) -> ReceivableRecord {
    let total_amount = amount(row, "valot_total");

    // A blank balance column means the document is fully outstanding.
    let remaining_balance = match row.get("saldo_a_pagar") {
        None | Some(Value::Null) => total_amount,
        Some(Value::String(s)) if s.is_empty() => total_amount,
        Some(_) => amount(row, "saldo_a_pagar"),
    };

    let id = match text(row, "id") {
        s if s.is_empty() => format!("generated-{}", index),
        s => s,
    };

    ReceivableRecord {
        id,
        company: text(row, "empresa"),
        client_code: text(row, "cod_cliente"),
        client_name_raw: text(row, "cliente"),
        project: text(row, "obra"),
        document_number: text(row, "num_doc"),
        billing_period: text(row, "periodo_fat"),
        issue_date: date(row, "data_emissao"),
        due_date: date(row, "dt_venc"),
        received_date: date(row, "dt_recebimento"),
        total_amount,
        remaining_balance,
        partial_amount: amount(row, "valor_parcial"),
        status: Status::from_raw(&text(row, "status")),
        settlement: SettlementType::from_raw(&text(row, "integral_parcial")),
        bank: text(row, "banco"),
        payment_method: text(row, "form_receb"),
        collection_type: text(row, "tipo_cobros"),
        commission_rate: text(row, "comisao_taxa"),
        notes: text(row, "obs"),
        comments: text(row, "comentarios"),
        receipt_notes: text(row, "obs_recebimento"),
        payment_history: payment_history(row, "hist_valor_parcial"),
        created_at: date(row, "creado"),
        created_by: text(row, "creado_por"),
        modified_at: date(row, "modificado"),
        modified_by: text(row, "modificado_por"),
    }
}

pub fn ingest_receivables(rows: &[Value]) -> Vec<ReceivableRecord> {
    rows.iter()
        .enumerate()
        .map(|(index, row)| receivable_from_row(row, index))
        .collect()
}

pub fn client_from_row(row: &Value) -> ClientRecord {
    ClientRecord {
        code: text(row, "cod_cliente"),
        legal_name: text(row, "razon_social"),
        trade_name: text(row, "nombre_comercial"),
        collections_email: text(row, "email_cobros"),
        collections_phone: text(row, "telefono_cobros"),
        collections_contact: text(row, "resp_cobros"),
        payment_terms: text(row, "tp_prazos_pg"),
        country: text(row, "pais"),
        province: text(row, "provincia"),
        municipality: text(row, "municipio"),
        address: text(row, "domicilio"),
    }
}

/// Clients without a code cannot be joined and are dropped.
pub fn ingest_clients(rows: &[Value]) -> Vec<ClientRecord> {
    rows.iter()
        .map(client_from_row)
        .filter(|c| !c.code.is_empty())
        .collect()
}

/// Decodes a whole receivables payload (a JSON array of rows).
pub fn parse_receivable_payload(json: &str) -> Result<Vec<ReceivableRecord>> {
    let rows: Vec<Value> = serde_json::from_str(json)?;
    Ok(ingest_receivables(&rows))
}

/// Decodes a whole client-registry payload (a JSON array of rows).
pub fn parse_client_payload(json: &str) -> Result<Vec<ClientRecord>> {
    let rows: Vec<Value> = serde_json::from_str(json)?;
    Ok(ingest_clients(&rows))
}

/// Joins each receivable with its owning client by code. Duplicate client
/// codes resolve last-write-wins; an empty code never matches.
pub fn enrich(receivables: Vec<ReceivableRecord>, clients: &[ClientRecord]) -> Vec<EnrichedRecord> {
    let by_code: HashMap<&str, &ClientRecord> = clients
        .iter()
        .filter(|c| !c.code.is_empty())
        .map(|c| (c.code.as_str(), c))
        .collect();

    receivables
        .into_iter()
        .map(|record| {
            let client = if record.client_code.is_empty() {
                None
            } else {
                by_code.get(record.client_code.as_str()).map(|c| (*c).clone())
            };
            EnrichedRecord { record, client }
        })
        .collect()
}
