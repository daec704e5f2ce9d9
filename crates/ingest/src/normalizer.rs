//! Cleans raw JSON records into typed rows.
//!
//! `clean_revenue` and the column-fill pass reproduce a permissive,
//! never-raise cleaning policy: malformed per-row data degrades silently to
//! zero/empty rather than aborting the request. Only structural errors
//! (an empty `overall` table) are raised, and they are raised by the
//! caller, not here.

use abtest_core::types::{OverallRow, TransactionLine};
use serde_json::{Map, Value};

pub type RawRecord = Map<String, Value>;

/// Cleans and converts a revenue-like cell to `f64`.
///
/// Null/empty -> 0.0. Already-numeric -> cast. Otherwise every character
/// that is not a digit, `.`, or `-` is stripped and the remainder parsed;
/// a parse failure degrades to 0.0 rather than raising.
#[must_use]
pub fn clean_revenue(value: &Value) -> f64 {
    match value {
        Value::Null => 0.0,
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => {
            if s.is_empty() {
                return 0.0;
            }
            let cleaned: String = s.chars().filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-').collect();
            cleaned.parse::<f64>().unwrap_or(0.0)
        }
        Value::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        _ => 0.0,
    }
}

/// Best-effort numeric coercion for non-revenue numeric fields (`users`,
/// `quantity`, ...): same permissive policy as `clean_revenue`.
#[must_use]
pub fn coerce_f64(value: &Value) -> f64 {
    clean_revenue(value)
}

/// Best-effort string coercion: missing/null becomes empty string.
#[must_use]
pub fn coerce_string(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string().trim_matches('"').to_string(),
    }
}

/// Cleans every column whose name contains "revenue" (case-insensitive)
/// across all records, and fills missing cells per-column: empty string
/// for columns whose values are predominantly textual, 0 for numeric ones.
#[must_use]
pub fn clean_records(records: Vec<RawRecord>) -> Vec<RawRecord> {
    if records.is_empty() {
        return records;
    }

    let mut columns: Vec<String> = Vec::new();
    for record in &records {
        for key in record.keys() {
            if !columns.contains(key) {
                columns.push(key.clone());
            }
        }
    }

    let numeric_columns: Vec<bool> = columns
        .iter()
        .map(|col| column_is_numeric(&records, col))
        .collect();

    records
        .into_iter()
        .map(|mut record| {
            for (col, is_numeric) in columns.iter().zip(numeric_columns.iter()) {
                let is_revenue = col.to_lowercase().contains("revenue");
                let entry = record.get(col).cloned();
                let cleaned = if is_revenue {
                    Value::from(clean_revenue(&entry.unwrap_or(Value::Null)))
                } else {
                    match entry {
                        Some(Value::Null) | None => {
                            if *is_numeric {
                                Value::from(0.0)
                            } else {
                                Value::String(String::new())
                            }
                        }
                        Some(v) => v,
                    }
                };
                record.insert(col.clone(), cleaned);
            }
            record
        })
        .collect()
}

fn column_is_numeric(records: &[RawRecord], column: &str) -> bool {
    let mut numeric = 0usize;
    let mut total = 0usize;
    for record in records {
        if let Some(v) = record.get(column) {
            if matches!(v, Value::Null) {
                continue;
            }
            total += 1;
            if matches!(v, Value::Number(_)) {
                numeric += 1;
            }
        }
    }
    total > 0 && numeric == total
}

/// Parses cleaned records into `OverallRow`s. Missing `users`/`user_add_to_carts`
/// degrade to 0 rather than raising, matching the row-level leniency of the
/// rest of the normalizer.
#[must_use]
pub fn parse_overall_rows(records: &[RawRecord]) -> Vec<OverallRow> {
    records
        .iter()
        .map(|r| OverallRow {
            variation: coerce_string(r.get("variation")),
            users: coerce_f64(r.get("users").unwrap_or(&Value::Null)),
            user_add_to_carts: coerce_f64(r.get("user_add_to_carts").unwrap_or(&Value::Null)),
        })
        .collect()
}

/// Parses cleaned records into `TransactionLine`s, synthesizing `"N/A"` for
/// the optional descriptive columns when the column is entirely absent.
#[must_use]
pub fn parse_transaction_lines(records: &[RawRecord]) -> Vec<TransactionLine> {
    records
        .iter()
        .map(|r| TransactionLine {
            transaction_id: string_field(r, "transaction_id", ""),
            variation: string_field(r, "variation", ""),
            device_category: string_field(r, "device_category", "N/A"),
            item_category2: string_field(r, "item_category2", "N/A"),
            item_name: string_field(r, "item_name", "N/A"),
            item_bundle: string_field(r, "item_bundle", "N/A"),
            item_name_simple: string_field(r, "item_name_simple", "N/A"),
            quantity: coerce_f64(r.get("quantity").unwrap_or(&Value::Null)),
            revenue: clean_revenue(r.get("revenue").unwrap_or(&Value::Null)),
        })
        .collect()
}

fn string_field(record: &RawRecord, key: &str, default_when_absent: &str) -> String {
    match record.get(key) {
        Some(Value::Null) | None => default_when_absent.to_string(),
        Some(Value::String(s)) if s.trim().is_empty() => default_when_absent.to_string(),
        Some(other) => coerce_string(Some(other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn clean_revenue_strips_currency_symbols() {
        let v = json!("€ 1234.56");
        assert!((clean_revenue(&v) - 1234.56).abs() < 1e-9);
    }

    #[test]
    fn clean_revenue_negative_string() {
        let v = json!("-42");
        assert!((clean_revenue(&v) - (-42.0)).abs() < 1e-9);
    }

    #[test]
    fn clean_revenue_empty_string_is_zero() {
        assert_eq!(clean_revenue(&json!("")), 0.0);
    }

    #[test]
    fn clean_revenue_null_is_zero() {
        assert_eq!(clean_revenue(&Value::Null), 0.0);
    }

    #[test]
    fn clean_revenue_passthrough_numeric() {
        assert!((clean_revenue(&json!(19.99)) - 19.99).abs() < 1e-9);
    }

    #[test]
    fn clean_revenue_unparseable_falls_back_to_zero() {
        assert_eq!(clean_revenue(&json!("n/a")), 0.0);
    }

    #[test]
    fn clean_records_fills_missing_numeric_column_with_zero() {
        let records: Vec<RawRecord> = vec![
            serde_json::from_value(json!({"revenue": 10.0, "quantity": 2})).unwrap(),
            serde_json::from_value(json!({"revenue": 5.0})).unwrap(),
        ];
        let cleaned = clean_records(records);
        let expected = json!(0.0);
        assert_eq!(cleaned[1].get("quantity"), Some(&expected));
    }

    #[test]
    fn parse_transaction_lines_defaults_missing_optional_columns_to_na() {
        let records: Vec<RawRecord> = vec![serde_json::from_value(json!({
            "transaction_id": "T1",
            "variation": "Control",
            "quantity": 2,
            "revenue": 20.0
        }))
        .unwrap()];
        let lines = parse_transaction_lines(&records);
        assert_eq!(lines[0].item_category2, "N/A");
        assert_eq!(lines[0].device_category, "N/A");
    }
}
