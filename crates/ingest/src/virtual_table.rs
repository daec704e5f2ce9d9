//! Collapses the line-item transaction log into one row per `transaction_id`.

use abtest_core::types::{TransactionLine, VirtualTransaction};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

const CONCAT_FIELDS: usize = 4;

struct Group<'a> {
    lines: Vec<&'a TransactionLine>,
}

fn group_by_transaction_id(lines: &[TransactionLine]) -> Vec<Group<'_>> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<Group> = Vec::new();

    for line in lines {
        if let Some(&i) = index.get(line.transaction_id.as_str()) {
            groups[i].lines.push(line);
        } else {
            index.insert(line.transaction_id.as_str(), groups.len());
            groups.push(Group { lines: vec![line] });
        }
    }
    groups
}

fn concat_field(lines: &[&TransactionLine], accessor: impl Fn(&TransactionLine) -> &str) -> String {
    let mut values: Vec<&str> = lines
        .iter()
        .map(|l| accessor(l))
        .filter(|v| !v.trim().is_empty() && *v != "N/A")
        .collect();
    values.sort_unstable();
    values.dedup();
    values.join(" | ")
}

fn capped_concat_field(
    lines: &[&TransactionLine],
    accessor: impl Fn(&TransactionLine) -> &str,
    max_items: usize,
) -> String {
    let mut values: Vec<&str> = lines
        .iter()
        .map(|l| accessor(l))
        .filter(|v| !v.trim().is_empty() && *v != "N/A")
        .collect();
    values.sort_unstable();
    values.dedup();

    if values.len() <= max_items {
        return values.join(" | ");
    }
    let shown = values[..max_items].join(" | ");
    format!("{shown} (+{} autres)", values.len() - max_items)
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Builds the full-precision virtual table: one row per `transaction_id`,
/// with uncapped `" | "`-joined descriptive fields.
#[must_use]
pub fn build_virtual_table(lines: &[TransactionLine]) -> Vec<VirtualTransaction> {
    group_by_transaction_id(lines)
        .into_iter()
        .map(|group| {
            let first = group.lines[0];
            let revenue: f64 = group.lines.iter().map(|l| l.revenue).sum();
            let quantity: f64 = group.lines.iter().map(|l| l.quantity).sum();
            VirtualTransaction {
                transaction_id: first.transaction_id.clone(),
                variation: first.variation.clone(),
                device_category: first.device_category.clone(),
                revenue: round2(revenue),
                quantity,
                item_category2: concat_field(&group.lines, |l| &l.item_category2),
                item_name: concat_field(&group.lines, |l| &l.item_name),
                item_bundle: concat_field(&group.lines, |l| &l.item_bundle),
                item_name_simple: concat_field(&group.lines, |l| &l.item_name_simple),
            }
        })
        .collect()
}

/// One row of the `/aggregate-transactions` response: a virtual transaction
/// with capped, "(+N autres)"-suffixed descriptors and a human-readable
/// `products_summary`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AggregatedTransaction {
    pub transaction_id: String,
    pub variation: String,
    pub device_category: String,
    pub revenue: f64,
    pub quantity: f64,
    pub unique_products: usize,
    pub item_category2: String,
    pub item_name: String,
    pub item_bundle: String,
    pub item_name_simple: String,
    pub products_summary: String,
}

/// Builds the `/aggregate-transactions` view: descriptive fields capped at
/// 3 concatenated values, plus a `products_summary` string.
#[must_use]
pub fn build_aggregated_transactions(lines: &[TransactionLine]) -> Vec<AggregatedTransaction> {
    group_by_transaction_id(lines)
        .into_iter()
        .map(|group| {
            let first = group.lines[0];
            let revenue: f64 = group.lines.iter().map(|l| l.revenue).sum();
            let quantity: f64 = group.lines.iter().map(|l| l.quantity).sum();
            let unique_products = group.lines.len();
            let products_summary = format!(
                "{unique_products} produit{} ({} unité{})",
                plural_suffix(unique_products as f64),
                quantity as i64,
                plural_suffix(quantity),
            );
            AggregatedTransaction {
                transaction_id: first.transaction_id.clone(),
                variation: first.variation.clone(),
                device_category: first.device_category.clone(),
                revenue: round2(revenue),
                quantity,
                unique_products,
                item_category2: capped_concat_field(&group.lines, |l| &l.item_category2, 3),
                item_name: capped_concat_field(&group.lines, |l| &l.item_name, 3),
                item_bundle: capped_concat_field(&group.lines, |l| &l.item_bundle, 3),
                item_name_simple: capped_concat_field(&group.lines, |l| &l.item_name_simple, 3),
                products_summary,
            }
        })
        .collect()
}

fn plural_suffix(count: f64) -> &'static str {
    if count > 1.0 {
        "s"
    } else {
        ""
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(id: &str, variation: &str, item_name: &str, revenue: f64, quantity: f64) -> TransactionLine {
        TransactionLine {
            transaction_id: id.to_string(),
            variation: variation.to_string(),
            device_category: "mobile".to_string(),
            item_category2: "N/A".to_string(),
            item_name: item_name.to_string(),
            item_bundle: "N/A".to_string(),
            item_name_simple: "N/A".to_string(),
            quantity,
            revenue,
        }
    }

    #[test]
    fn transaction_id_is_unique_in_virtual_table() {
        let lines = vec![
            line("T1", "Control", "A", 10.0, 1.0),
            line("T1", "Control", "B", 5.0, 1.0),
            line("T2", "Control", "C", 7.0, 1.0),
        ];
        let vt = build_virtual_table(&lines);
        assert_eq!(vt.len(), 2);
    }

    #[test]
    fn revenue_conservation() {
        let lines = vec![
            line("T1", "Control", "A", 10.0, 1.0),
            line("T1", "Control", "B", 5.5, 2.0),
        ];
        let vt = build_virtual_table(&lines);
        assert!((vt[0].revenue - 15.5).abs() < 1e-9);
        assert!((vt[0].quantity - 3.0).abs() < 1e-9);
    }

    #[test]
    fn scenario_s5_products_summary_and_cap() {
        let names = ["zeta", "alpha", "gamma", "beta", "delta"];
        let lines: Vec<TransactionLine> = names
            .iter()
            .map(|n| line("T1", "Control", n, 10.0, 1.0))
            .collect();
        let agg = build_aggregated_transactions(&lines);
        assert_eq!(agg.len(), 1);
        assert_eq!(agg[0].products_summary, "5 produits (5 unités)");
        assert_eq!(agg[0].item_name, "alpha | beta | delta (+2 autres)");
    }

    #[test]
    fn singular_products_summary() {
        let lines = vec![line("T1", "Control", "A", 10.0, 1.0)];
        let agg = build_aggregated_transactions(&lines);
        assert_eq!(agg[0].products_summary, "1 produit (1 unité)");
    }
}
