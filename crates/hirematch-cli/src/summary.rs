//! Terminal summary tables for the pipeline stages.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use hirematch_report::RankedCandidate;

use hirematch_cli::logging::redact_value;
use hirematch_cli::pipeline::{EvaluateResult, FeaturesResult, PreprocessResult, TrainResult};

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
}

fn header_cell(text: &str) -> Cell {
    Cell::new(text).add_attribute(Attribute::Bold)
}

fn metric_row(table: &mut Table, name: &str, value: String) {
    table.add_row(vec![Cell::new(name), Cell::new(value)]);
}

pub fn print_preprocess_summary(result: &PreprocessResult) {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Preprocess"), header_cell("Value")]);
    apply_table_style(&mut table);
    metric_row(&mut table, "Rows", result.rows.to_string());
    metric_row(&mut table, "Columns", result.columns.to_string());
    metric_row(&mut table, "Positive labels", result.positives.to_string());
    metric_row(&mut table, "Table", result.table.display().to_string());
    println!("{table}");
}

pub fn print_features_summary(result: &FeaturesResult) {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Features"), header_cell("Value")]);
    apply_table_style(&mut table);
    metric_row(&mut table, "Rows", result.rows.to_string());
    metric_row(&mut table, "Columns", result.columns.to_string());
    metric_row(
        &mut table,
        "Target-encoded columns",
        result.target_encoded.to_string(),
    );
    metric_row(&mut table, "Table", result.table.display().to_string());
    println!("{table}");
}

pub fn print_train_summary(result: &TrainResult) {
    let outcome = &result.outcome;
    let mut table = Table::new();
    table.set_header(vec![header_cell("Training"), header_cell("Value")]);
    apply_table_style(&mut table);
    metric_row(&mut table, "Validation AUC", format!("{:.4}", outcome.validation_auc));
    metric_row(&mut table, "F1 (validation)", format!("{:.4}", outcome.threshold.f1));
    metric_row(&mut table, "Accuracy", format!("{:.1}%", outcome.accuracy * 100.0));
    metric_row(
        &mut table,
        "Threshold",
        format!("{:.2}", outcome.threshold.threshold),
    );
    metric_row(&mut table, "Features", outcome.feature_count.to_string());
    metric_row(&mut table, "Rows", outcome.rows.to_string());
    metric_row(
        &mut table,
        "Class weight",
        format!("{:.3}", outcome.scale_pos_weight),
    );
    metric_row(
        &mut table,
        "Trials (pruned)",
        format!(
            "{} ({})",
            outcome.search.trials.len(),
            outcome.search.pruned_count()
        ),
    );
    metric_row(
        &mut table,
        "Artifacts",
        result.artifacts_dir.display().to_string(),
    );
    println!("{table}");
}

pub fn print_evaluate_summary(result: &EvaluateResult) {
    let metrics = &result.metrics;
    let mut table = Table::new();
    table.set_header(vec![header_cell("Evaluation"), header_cell("Value")]);
    apply_table_style(&mut table);
    metric_row(&mut table, "AUC", format!("{:.4}", metrics.auc));
    metric_row(&mut table, "Accuracy", format!("{:.1}%", metrics.accuracy * 100.0));
    metric_row(&mut table, "Precision", format!("{:.4}", metrics.precision));
    metric_row(&mut table, "Recall", format!("{:.4}", metrics.recall));
    metric_row(&mut table, "F1", format!("{:.4}", metrics.f1));
    metric_row(&mut table, "Threshold", format!("{:.2}", metrics.threshold));
    metric_row(&mut table, "Rows evaluated", metrics.rows_evaluated.to_string());
    metric_row(
        &mut table,
        "Reports",
        result.reports_dir.display().to_string(),
    );
    println!("{table}");
}

pub fn print_rank_table(job_id: &str, candidates: &[RankedCandidate]) {
    if candidates.is_empty() {
        println!("No candidates matched vacancy {job_id}.");
        return;
    }
    println!("Top candidates for vacancy {job_id}:");
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("#"),
        header_cell("Applicant"),
        header_cell("Name"),
        header_cell("Score"),
        header_cell("Recommended"),
    ]);
    apply_table_style(&mut table);
    for (position, candidate) in candidates.iter().enumerate() {
        let recommended = if candidate.recommended {
            Cell::new("yes").fg(Color::Green)
        } else {
            Cell::new("no").fg(Color::DarkGrey)
        };
        table.add_row(vec![
            Cell::new(position + 1).set_alignment(CellAlignment::Right),
            Cell::new(&candidate.applicant_id),
            Cell::new(redact_value(&candidate.name)),
            Cell::new(format!("{:.3}", candidate.score))
                .set_alignment(CellAlignment::Right),
            recommended,
        ]);
    }
    println!("{table}");
}
