//! Identifies the control variation, iterates the variations in `overall`,
//! invokes the metric calculators, and assembles the per-variation response.

use crate::calculators;
use abtest_core::config::BootstrapConfig;
use abtest_core::error::AppError;
use abtest_core::types::{AnalysisResponse, MetricMap, OverallRow, Unit, VariationMap, VirtualTransaction};

/// Which subset of metrics an endpoint wants computed, matching the two
/// distinct metric sets the original service's two analysis endpoints return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricProfile {
    Overview,
    Revenue,
}

/// Finds the variation in `overall` whose name contains "control"
/// (case-insensitive). Diverges from the original service, which silently
/// takes the first match: here, zero or more than one distinct matching
/// variation name fails fast with `ConfigError` rather than guessing.
pub fn find_control_variation(overall: &[OverallRow]) -> Result<String, AppError> {
    let mut matches: Vec<&str> = Vec::new();
    for row in overall {
        if row.variation.to_lowercase().contains("control") && !matches.contains(&row.variation.as_str()) {
            matches.push(&row.variation);
        }
    }

    match matches.as_slice() {
        [single] => Ok((*single).to_string()),
        [] => Err(AppError::config_error("no variation containing \"control\" found in overall data")),
        _ => Err(AppError::config_error(format!(
            "multiple variations contain \"control\": {}",
            matches.join(", ")
        ))),
    }
}

fn unique_variations(overall: &[OverallRow]) -> Vec<String> {
    let mut seen = Vec::new();
    for row in overall {
        if !seen.contains(&row.variation) {
            seen.push(row.variation.clone());
        }
    }
    seen
}

fn find_overall_row<'a>(overall: &'a [OverallRow], variation: &str) -> Option<&'a OverallRow> {
    overall.iter().find(|r| r.variation == variation)
}

/// Runs the full per-variation metric computation and assembles the response.
///
/// A single metric's failure never aborts the request: degraded metrics fall
/// back to a zeroed result and are logged at `error`, per the orchestrator's
/// fault-isolation contract.
pub fn run_analysis(
    overall: &[OverallRow],
    virtual_table: &[VirtualTransaction],
    profile: MetricProfile,
    bootstrap: &BootstrapConfig,
) -> Result<AnalysisResponse, AppError> {
    if overall.is_empty() {
        return Err(AppError::input_missing("overall"));
    }

    let control = find_control_variation(overall)?;
    let mut data: VariationMap = VariationMap::new();

    for variation in unique_variations(overall) {
        let var_overall = find_overall_row(overall, &variation)
            .ok_or_else(|| AppError::envelope_error(format!("no overall row for variation {variation}")))?;
        let ctrl_overall = find_overall_row(overall, &control)
            .ok_or_else(|| AppError::envelope_error(format!("no overall row for control variation {control}")))?;

        let var_slice: Vec<&VirtualTransaction> = virtual_table.iter().filter(|t| t.variation == variation).collect();
        let ctrl_slice: Vec<&VirtualTransaction> = virtual_table.iter().filter(|t| t.variation == control).collect();

        let metrics = compute_variation_metrics(var_overall, ctrl_overall, &var_slice, &ctrl_slice, profile, bootstrap);
        data.insert(variation, metrics);
    }

    Ok(AnalysisResponse {
        success: true,
        data,
        control,
        virtual_table: virtual_table.to_vec(),
    })
}

fn compute_variation_metrics(
    var_overall: &OverallRow,
    ctrl_overall: &OverallRow,
    var_slice: &[&VirtualTransaction],
    ctrl_slice: &[&VirtualTransaction],
    profile: MetricProfile,
    bootstrap: &BootstrapConfig,
) -> MetricMap {
    let var_revenues: Vec<f64> = var_slice.iter().map(|t| t.revenue).collect();
    let ctrl_revenues: Vec<f64> = ctrl_slice.iter().map(|t| t.revenue).collect();
    let var_quantities: Vec<f64> = var_slice.iter().map(|t| t.quantity).collect();
    let ctrl_quantities: Vec<f64> = ctrl_slice.iter().map(|t| t.quantity).collect();

    let mut metrics = MetricMap::new();

    metrics.insert("users".to_string(), calculators::users(var_overall.users, ctrl_overall.users));

    match profile {
        MetricProfile::Overview => {
            metrics.insert(
                "add_to_cart_rate".to_string(),
                calculators::add_to_cart_rate(
                    var_overall.user_add_to_carts,
                    var_overall.users,
                    ctrl_overall.user_add_to_carts,
                    ctrl_overall.users,
                ),
            );
            metrics.insert(
                "transaction_rate".to_string(),
                degrade_if_unsound(
                    calculators::transaction_rate(var_slice.len(), var_overall.users, ctrl_slice.len(), ctrl_overall.users),
                    Unit::Percentage,
                    "transaction_rate",
                ),
            );
            metrics.insert("total_revenue".to_string(), calculators::total_revenue(&var_revenues, &ctrl_revenues));
        }
        MetricProfile::Revenue => {
            metrics.insert(
                "transaction_rate".to_string(),
                degrade_if_unsound(
                    calculators::transaction_rate(var_slice.len(), var_overall.users, ctrl_slice.len(), ctrl_overall.users),
                    Unit::Percentage,
                    "transaction_rate",
                ),
            );
            metrics.insert("aov".to_string(), calculators::aov(&var_revenues, &ctrl_revenues, bootstrap));
            metrics.insert(
                "avg_products".to_string(),
                calculators::avg_products(&var_quantities, &ctrl_quantities, bootstrap),
            );
            metrics.insert("total_revenue".to_string(), calculators::total_revenue(&var_revenues, &ctrl_revenues));
            metrics.insert(
                "arpu".to_string(),
                calculators::arpu(&var_revenues, &ctrl_revenues, var_overall.users, ctrl_overall.users, bootstrap),
            );
        }
    }

    metrics
}

/// Per-metric failures degrade to a zeroed result rather than aborting the
/// response. The calculators here are pure arithmetic and cannot panic on
/// well-typed input, so this is a defensive seam for the NaN/Inf edge cases
/// that slip through permissive normalization (e.g. `0/0` in a rate).
fn degrade_if_unsound(result: abtest_core::types::MetricResult, unit: Unit, metric_name: &str) -> abtest_core::types::MetricResult {
    if result.value.is_finite() && result.control_value.is_finite() && result.confidence.is_finite() {
        result
    } else {
        tracing::error!(metric = metric_name, "calculator produced a non-finite result, degrading to zero");
        abtest_core::types::MetricResult::zeroed(unit)
    }
}
