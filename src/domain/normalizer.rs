//! Inbound webhook payload normalization.
//!
//! Two payload shapes coexist across the watcher's history:
//!
//! - **Nested**: `{ProcedureTypeValue, ProcedureTypeName,
//!   RawTransaction: {transaction: {...}, timestamp, moneyFlew},
//!   ParsedTransaction: {...}}` — carries its own `txId`, timestamp is a
//!   numeric-string epoch.
//! - **Flat**: all fields at the top level, `moneyFlow` instead of
//!   `moneyFlew`, no `txId` (one is synthesized), timestamp either ISO-8601
//!   or a numeric epoch.
//!
//! Shape is detected by the presence of a `RawTransaction` key; both
//! branches converge on [`EventDraft`]. Normalization is pure per record:
//! the caller decides batch atomicity by walking [`records`] and
//! normalizing one record at a time.

use chrono::{DateTime, Utc};
use serde_json::Value;

use super::event::EventDraft;
use crate::error::QxError;

/// Splits a webhook body into its ordered record sequence.
///
/// A single JSON object is a one-record batch; an array is taken in order.
///
/// # Errors
///
/// Returns [`QxError::InvalidPayload`] when the body is neither an object
/// nor an array.
pub fn records(body: &Value) -> Result<Vec<&Value>, QxError> {
    match body {
        Value::Array(items) => Ok(items.iter().collect()),
        Value::Object(_) => Ok(vec![body]),
        _ => Err(QxError::InvalidPayload(
            "expected a JSON object or array of objects".to_string(),
        )),
    }
}

/// Normalizes one inbound record into an [`EventDraft`].
///
/// Absent optional fields become empty strings or `None`. Only missing
/// identifying fields (`sourceId`, and `txId` for the nested shape) fail
/// the record.
///
/// # Errors
///
/// Returns [`QxError::MissingField`] when an identifying field is absent
/// and [`QxError::InvalidPayload`] when the record is not a JSON object.
pub fn normalize_record(record: &Value) -> Result<EventDraft, QxError> {
    if !record.is_object() {
        return Err(QxError::InvalidPayload(
            "record must be a JSON object".to_string(),
        ));
    }
    if record.get("RawTransaction").is_some() {
        normalize_nested(record)
    } else {
        normalize_flat(record)
    }
}

fn normalize_nested(record: &Value) -> Result<EventDraft, QxError> {
    let raw_tx = record
        .get("RawTransaction")
        .ok_or_else(|| QxError::MissingField("RawTransaction".to_string()))?;
    let tx = raw_tx
        .get("transaction")
        .ok_or_else(|| QxError::MissingField("RawTransaction.transaction".to_string()))?;
    let parsed = record.get("ParsedTransaction");

    let tx_id = required_str(tx, "txId", "RawTransaction.transaction.txId")?;
    let source_id = required_str(tx, "sourceId", "RawTransaction.transaction.sourceId")?;

    Ok(EventDraft {
        tx_id,
        procedure_type_value: int_field(record, "ProcedureTypeValue") as i32,
        procedure_type_name: str_field(record, "ProcedureTypeName"),
        source_id,
        dest_id: str_field(tx, "destId"),
        amount: amount_string(tx.get("amount")),
        tick_number: int_field(tx, "tickNumber"),
        timestamp: epoch_millis(raw_tx.get("timestamp")),
        money_flew: raw_tx.get("moneyFlew").and_then(Value::as_bool),
        issuer_address: parsed.map(|p| str_field(p, "IssuerAddress")).unwrap_or_default(),
        asset_name: parsed.map(|p| str_field(p, "AssetName")).unwrap_or_default(),
        price: parsed.and_then(|p| p.get("Price")).and_then(Value::as_f64),
        number_of_shares: parsed
            .and_then(|p| p.get("NumberOfShares"))
            .and_then(Value::as_i64),
        raw_payload: record.clone(),
    })
}

fn normalize_flat(record: &Value) -> Result<EventDraft, QxError> {
    let source_id = required_str(record, "sourceId", "sourceId")?;
    let tick_number = int_field(record, "tickNumber");

    // No txId in this shape. Combine tick, source and a fine-grained local
    // time marker so watcher retries within the same tick stay distinct.
    let tx_id = format!(
        "qx-{tick_number}-{source_id}-{}",
        Utc::now().timestamp_micros()
    );

    Ok(EventDraft {
        tx_id,
        procedure_type_value: int_field(record, "ProcedureTypeValue") as i32,
        procedure_type_name: str_field(record, "ProcedureTypeName"),
        source_id,
        dest_id: str_field(record, "destId"),
        amount: amount_string(record.get("amount")),
        tick_number,
        timestamp: epoch_millis(record.get("timestamp")),
        money_flew: record.get("moneyFlow").and_then(Value::as_bool),
        issuer_address: str_field(record, "IssuerAddress"),
        asset_name: str_field(record, "AssetName"),
        price: record.get("Price").and_then(Value::as_f64),
        number_of_shares: record.get("NumberOfShares").and_then(Value::as_i64),
        raw_payload: record.clone(),
    })
}

/// Reads a required string field, rejecting absent or empty values.
fn required_str(value: &Value, key: &str, context: &str) -> Result<String, QxError> {
    value
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .ok_or_else(|| QxError::MissingField(context.to_string()))
}

/// Reads an optional string field, defaulting to empty.
fn str_field(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// Reads an optional integer field, defaulting to 0.
fn int_field(value: &Value, key: &str) -> i64 {
    value.get(key).and_then(Value::as_i64).unwrap_or(0)
}

/// Renders an amount value (JSON string or number) as a string; absent or
/// null amounts become the empty string.
fn amount_string(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => {
            if let Some(i) = n.as_i64() {
                i.to_string()
            } else if let Some(u) = n.as_u64() {
                u.to_string()
            } else {
                // Float amounts are truncated to their integer magnitude.
                n.as_f64().map(|f| (f as i64).to_string()).unwrap_or_default()
            }
        }
        _ => String::new(),
    }
}

/// Converts a payload timestamp into epoch milliseconds.
///
/// Accepts a numeric epoch (milliseconds), a numeric-string epoch, or an
/// ISO-8601 string. Absent or unparseable timestamps fall back to the
/// current server time.
fn epoch_millis(value: Option<&Value>) -> i64 {
    match value {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or_else(now_millis),
        Some(Value::String(s)) => {
            if let Ok(epoch) = s.parse::<i64>() {
                epoch
            } else if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
                dt.timestamp_millis()
            } else {
                now_millis()
            }
        }
        _ => now_millis(),
    }
}

fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use serde_json::json;

    fn nested_payload() -> Value {
        json!({
            "ProcedureTypeValue": 5,
            "ProcedureTypeName": "AddToBidOrder",
            "RawTransaction": {
                "transaction": {
                    "sourceId": "WALLET_A",
                    "destId": "WALLET_B",
                    "amount": "15000000",
                    "tickNumber": 12345,
                    "inputType": 6,
                    "inputSize": 80,
                    "inputHex": "deadbeef",
                    "signatureHex": "cafebabe",
                    "txId": "abc123"
                },
                "timestamp": "1704067200000",
                "moneyFlew": true
            },
            "ParsedTransaction": {
                "IssuerAddress": "ISSUER_X",
                "AssetName": "QUBIC",
                "Price": 1.0,
                "NumberOfShares": 15000000
            }
        })
    }

    fn flat_payload() -> Value {
        json!({
            "ProcedureTypeValue": 1,
            "ProcedureTypeName": "AddToBidOrder",
            "sourceId": "WALLET_A",
            "destId": "",
            "amount": 15000000,
            "tickNumber": 1000,
            "timestamp": "2024-01-01T00:00:00Z",
            "moneyFlow": true,
            "IssuerAddress": "ISSUER_X",
            "AssetName": "QUBIC",
            "Price": 1,
            "NumberOfShares": 15000000
        })
    }

    #[test]
    fn nested_shape_maps_all_fields() {
        let Ok(draft) = normalize_record(&nested_payload()) else {
            panic!("nested payload should normalize");
        };
        assert_eq!(draft.tx_id, "abc123");
        assert_eq!(draft.procedure_type_value, 5);
        assert_eq!(draft.procedure_type_name, "AddToBidOrder");
        assert_eq!(draft.source_id, "WALLET_A");
        assert_eq!(draft.dest_id, "WALLET_B");
        assert_eq!(draft.amount, "15000000");
        assert_eq!(draft.tick_number, 12345);
        assert_eq!(draft.timestamp, 1_704_067_200_000);
        assert_eq!(draft.money_flew, Some(true));
        assert_eq!(draft.issuer_address, "ISSUER_X");
        assert_eq!(draft.asset_name, "QUBIC");
        assert_eq!(draft.number_of_shares, Some(15_000_000));
        assert_eq!(draft.raw_payload, nested_payload());
    }

    #[test]
    fn flat_shape_synthesizes_tx_id() {
        let Ok(draft) = normalize_record(&flat_payload()) else {
            panic!("flat payload should normalize");
        };
        assert!(draft.tx_id.starts_with("qx-1000-WALLET_A-"));
        assert_eq!(draft.amount, "15000000");
        assert_eq!(draft.money_flew, Some(true));
    }

    #[test]
    fn iso_timestamp_becomes_epoch_millis() {
        let Ok(draft) = normalize_record(&flat_payload()) else {
            panic!("flat payload should normalize");
        };
        // 2024-01-01T00:00:00Z
        assert_eq!(draft.timestamp, 1_704_067_200_000);
    }

    #[test]
    fn numeric_timestamp_is_taken_as_millis() {
        let mut payload = flat_payload();
        if let Some(obj) = payload.as_object_mut() {
            obj.insert("timestamp".to_string(), json!(1_704_067_200_123_i64));
        }
        let Ok(draft) = normalize_record(&payload) else {
            panic!("flat payload should normalize");
        };
        assert_eq!(draft.timestamp, 1_704_067_200_123);
    }

    #[test]
    fn missing_source_fails_the_record() {
        let mut payload = flat_payload();
        if let Some(obj) = payload.as_object_mut() {
            obj.remove("sourceId");
        }
        assert!(matches!(
            normalize_record(&payload),
            Err(QxError::MissingField(_))
        ));
    }

    #[test]
    fn nested_without_tx_id_fails() {
        let mut payload = nested_payload();
        if let Some(tx) = payload
            .pointer_mut("/RawTransaction/transaction")
            .and_then(Value::as_object_mut)
        {
            tx.remove("txId");
        }
        assert!(matches!(
            normalize_record(&payload),
            Err(QxError::MissingField(_))
        ));
    }

    #[test]
    fn absent_optional_fields_default_instead_of_failing() {
        let payload = json!({
            "sourceId": "WALLET_A",
            "tickNumber": 7
        });
        let Ok(draft) = normalize_record(&payload) else {
            panic!("minimal flat payload should normalize");
        };
        assert_eq!(draft.amount, "");
        assert_eq!(draft.dest_id, "");
        assert_eq!(draft.asset_name, "");
        assert_eq!(draft.money_flew, None);
        assert_eq!(draft.price, None);
        assert!(draft.timestamp > 0);
    }

    #[test]
    fn batch_body_preserves_record_order() {
        let body = json!([flat_payload(), nested_payload()]);
        let Ok(items) = records(&body) else {
            panic!("array body should split");
        };
        assert_eq!(items.len(), 2);
        let Some(first) = items.first() else {
            panic!("expected first record");
        };
        assert!(first.get("RawTransaction").is_none());
    }

    #[test]
    fn scalar_body_is_rejected() {
        assert!(matches!(
            records(&json!("nope")),
            Err(QxError::InvalidPayload(_))
        ));
    }
}
