// roiwatch/src/eval/report.rs
//
// Monitoring payload (JSON) and markdown report for a batch Summary.
//
// The JSON payload keeps the shape downstream monitoring dashboards already
// consume: top-level actual/projected ROI plus a single "ROI" test-result
// entry carrying the baseline metrics and cost multipliers it was computed
// with.

use serde_json::{json, Value};

use super::Summary;
use crate::config::RoiConfig;
use crate::records::Outcome;

/// Build the monitoring payload for downstream consumption.
pub fn payload(summary: &Summary, config: &RoiConfig) -> Value {
    let values = json!({
        "actual_roi":       summary.actual_roi,
        "projected_roi":    summary.projected_roi,
        "amount_field":     summary.amount_field,
        "baseline_metrics": config.baseline_rates,
        "cost_multipliers": config.cost_table,
    });

    let observed = json!({
        "TPR": summary.outcome_counts.recall(),
        "TNR": summary.outcome_counts.specificity(),
    });

    json!({
        "actual_roi":         summary.actual_roi,
        "projected_roi":      summary.projected_roi,
        "amount_field":       summary.amount_field,
        "projection_status":  summary.projection_status,
        "projection_formula": summary.projection_formula,
        "convention":         summary.convention,
        "n_records":          summary.n_records,
        "outcome_counts":     summary.outcome_counts,
        "outcome_values":     summary.outcome_values,
        "observed_rates":     observed,
        "evaluated_at":       summary.evaluated_at,
        "ROI": [{
            "test_name":     "ROI",
            "test_category": "ROI",
            "test_type":     "ROI",
            "test_id":       "ROI",
            "values":        values,
        }],
    })
}

/// Serialize the payload as a single JSON line.
pub fn to_json(summary: &Summary, config: &RoiConfig) -> String {
    payload(summary, config).to_string()
}

/// Markdown-formatted report for terminal use.
pub fn render_markdown(summary: &Summary) -> String {
    let projected = summary
        .projected_roi
        .map(|p| format!("{:.2}", p))
        .unwrap_or_else(|| format!("n/a ({})", summary.projection_status));

    let mut out = String::new();
    out.push_str("# ROI Report\n\n");
    out.push_str(&format!(
        "**Records**: {}  **Amount field**: `{}`  **Convention**: {}\n\n",
        summary.n_records, summary.amount_field, summary.convention
    ));
    out.push_str("| Metric        | Value        |\n");
    out.push_str("|---------------|--------------|\n");
    out.push_str(&format!("| Actual ROI    | {:.2} |\n", summary.actual_roi));
    out.push_str(&format!("| Projected ROI | {} |\n", projected));
    out.push_str(&format!("| Precision     | {:.4} |\n", summary.outcome_counts.precision()));
    out.push_str(&format!("| Recall (TPR)  | {:.4} |\n", summary.outcome_counts.recall()));
    out.push_str(&format!("| TNR           | {:.4} |\n", summary.outcome_counts.specificity()));
    out.push_str(&format!("| F1            | {:.4} |\n", summary.outcome_counts.f1()));
    out.push('\n');

    out.push_str("### Outcomes\n\n");
    out.push_str("| Outcome | Count | ROI |\n");
    out.push_str("|---------|-------|-----|\n");
    for outcome in Outcome::ALL {
        out.push_str(&format!(
            "| {} | {} | {:.2} |\n",
            outcome,
            summary.outcome_counts.get(outcome),
            summary.outcome_values.get(outcome)
        ));
    }
    out
}
