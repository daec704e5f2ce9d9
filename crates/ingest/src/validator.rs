//! Non-blocking sanity checks on a transaction log: negative revenue,
//! non-positive quantity, and missing variation tags are reported as
//! warnings, never as failures.

use abtest_core::types::TransactionLine;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RangeStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ValidationStats {
    pub total_transactions: usize,
    pub total_records: usize,
    pub avg_items_per_transaction: f64,
    pub revenue_range: RangeStats,
    pub quantity_range: RangeStats,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ValidationWarning {
    #[serde(rename = "type")]
    pub kind: String,
    pub count: usize,
    pub sample: Vec<TransactionLine>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub warnings: Vec<ValidationWarning>,
    pub stats: ValidationStats,
}

/// Validates a raw transaction log and reports warnings without ever
/// failing the request: an empty log yields zeroed stats and no warnings.
#[must_use]
pub fn validate_transaction_lines(lines: &[TransactionLine]) -> ValidationReport {
    if lines.is_empty() {
        return ValidationReport {
            is_valid: true,
            warnings: Vec::new(),
            stats: ValidationStats {
                total_transactions: 0,
                total_records: 0,
                avg_items_per_transaction: 0.0,
                revenue_range: RangeStats { min: 0.0, max: 0.0, mean: 0.0 },
                quantity_range: RangeStats { min: 0.0, max: 0.0, mean: 0.0 },
            },
        };
    }

    let mut distinct_ids: Vec<&str> = lines.iter().map(|l| l.transaction_id.as_str()).collect();
    distinct_ids.sort_unstable();
    distinct_ids.dedup();
    let total_transactions = distinct_ids.len();
    let total_records = lines.len();

    let revenues: Vec<f64> = lines.iter().map(|l| l.revenue).collect();
    let quantities: Vec<f64> = lines.iter().map(|l| l.quantity).collect();

    let mut warnings = Vec::new();

    let negative_revenue: Vec<&TransactionLine> = lines.iter().filter(|l| l.revenue < 0.0).collect();
    if !negative_revenue.is_empty() {
        tracing::warn!(count = negative_revenue.len(), "negative revenue rows detected");
        warnings.push(ValidationWarning {
            kind: "negative_revenue".to_string(),
            count: negative_revenue.len(),
            sample: negative_revenue.into_iter().take(2).cloned().collect(),
        });
    }

    let invalid_quantity: Vec<&TransactionLine> = lines.iter().filter(|l| l.quantity <= 0.0).collect();
    if !invalid_quantity.is_empty() {
        tracing::warn!(count = invalid_quantity.len(), "non-positive quantity rows detected");
        warnings.push(ValidationWarning {
            kind: "invalid_quantity".to_string(),
            count: invalid_quantity.len(),
            sample: invalid_quantity.into_iter().take(2).cloned().collect(),
        });
    }

    let missing_variation: Vec<&TransactionLine> = lines.iter().filter(|l| l.variation.trim().is_empty()).collect();
    if !missing_variation.is_empty() {
        tracing::warn!(count = missing_variation.len(), "rows missing variation tag");
        warnings.push(ValidationWarning {
            kind: "missing_variation".to_string(),
            count: missing_variation.len(),
            sample: missing_variation.into_iter().take(2).cloned().collect(),
        });
    }

    ValidationReport {
        is_valid: true,
        warnings,
        stats: ValidationStats {
            total_transactions,
            total_records,
            avg_items_per_transaction: total_records as f64 / total_transactions.max(1) as f64,
            revenue_range: range_stats(&revenues),
            quantity_range: range_stats(&quantities),
        },
    }
}

fn range_stats(values: &[f64]) -> RangeStats {
    if values.is_empty() {
        return RangeStats { min: 0.0, max: 0.0, mean: 0.0 };
    }
    let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    RangeStats { min, max, mean }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(id: &str, variation: &str, revenue: f64, quantity: f64) -> TransactionLine {
        TransactionLine {
            transaction_id: id.to_string(),
            variation: variation.to_string(),
            device_category: "mobile".to_string(),
            item_category2: "N/A".to_string(),
            item_name: "N/A".to_string(),
            item_bundle: "N/A".to_string(),
            item_name_simple: "N/A".to_string(),
            quantity,
            revenue,
        }
    }

    #[test]
    fn flags_negative_revenue() {
        let lines = vec![line("T1", "Control", -5.0, 1.0), line("T2", "Control", 10.0, 1.0)];
        let report = validate_transaction_lines(&lines);
        assert!(report.warnings.iter().any(|w| w.kind == "negative_revenue"));
    }

    #[test]
    fn flags_non_positive_quantity() {
        let lines = vec![line("T1", "Control", 5.0, 0.0)];
        let report = validate_transaction_lines(&lines);
        assert!(report.warnings.iter().any(|w| w.kind == "invalid_quantity"));
    }

    #[test]
    fn flags_missing_variation() {
        let lines = vec![line("T1", "", 5.0, 1.0)];
        let report = validate_transaction_lines(&lines);
        assert!(report.warnings.iter().any(|w| w.kind == "missing_variation"));
    }

    #[test]
    fn clean_data_has_no_warnings() {
        let lines = vec![line("T1", "Control", 5.0, 1.0), line("T2", "V1", 6.0, 2.0)];
        let report = validate_transaction_lines(&lines);
        assert!(report.warnings.is_empty());
        assert_eq!(report.stats.total_transactions, 2);
    }

    #[test]
    fn empty_input_is_valid_with_zeroed_stats() {
        let report = validate_transaction_lines(&[]);
        assert!(report.is_valid);
        assert_eq!(report.stats.total_records, 0);
    }
}
