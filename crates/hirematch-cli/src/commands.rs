//! Subcommand entry points.

use anyhow::Result;
use tracing::info_span;

use hirematch_cli::pipeline::{Uploader, build_features, evaluate, preprocess, rank, train};

use crate::cli::{EvaluateArgs, RankArgs, RunArgs, StageArgs, TrainArgs};
use crate::summary::{
    print_evaluate_summary, print_features_summary, print_preprocess_summary, print_rank_table,
    print_train_summary,
};

pub fn run_preprocess(args: &StageArgs) -> Result<()> {
    let uploader = Uploader::from_env(args.no_upload)?;
    let result = preprocess(&args.data_dir, &args.work_dir, &uploader)?;
    print_preprocess_summary(&result);
    Ok(())
}

pub fn run_features(args: &StageArgs) -> Result<()> {
    let uploader = Uploader::from_env(args.no_upload)?;
    let result = build_features(&args.work_dir, &uploader)?;
    print_features_summary(&result);
    Ok(())
}

pub fn run_train(args: &TrainArgs) -> Result<()> {
    let uploader = Uploader::from_env(args.stage.no_upload)?;
    let result = train(
        &args.stage.work_dir,
        &args.artifacts_dir,
        args.trials,
        args.seed,
        &uploader,
    )?;
    print_train_summary(&result);
    Ok(())
}

pub fn run_evaluate(args: &EvaluateArgs) -> Result<()> {
    let uploader = Uploader::from_env(args.stage.no_upload)?;
    let result = evaluate(
        &args.stage.work_dir,
        &args.artifacts_dir,
        &args.reports_dir,
        args.seed,
        &uploader,
    )?;
    print_evaluate_summary(&result);
    Ok(())
}

pub fn run_rank(args: &RankArgs) -> Result<()> {
    let (_model, candidates) = rank(
        &args.stage.work_dir,
        &args.artifacts_dir,
        &args.job_id,
        args.min_score,
        args.top_n,
    )?;
    print_rank_table(&args.job_id, &candidates);
    Ok(())
}

/// Run every stage in order.
pub fn run_all(args: &RunArgs) -> Result<()> {
    let span = info_span!("run");
    let _guard = span.enter();
    let uploader = Uploader::from_env(args.stage.no_upload)?;

    let preprocessed = preprocess(&args.stage.data_dir, &args.stage.work_dir, &uploader)?;
    print_preprocess_summary(&preprocessed);

    let featured = build_features(&args.stage.work_dir, &uploader)?;
    print_features_summary(&featured);

    let trained = train(
        &args.stage.work_dir,
        &args.artifacts_dir,
        args.trials,
        args.seed,
        &uploader,
    )?;
    print_train_summary(&trained);

    let evaluated = evaluate(
        &args.stage.work_dir,
        &args.artifacts_dir,
        &args.reports_dir,
        args.seed,
        &uploader,
    )?;
    print_evaluate_summary(&evaluated);
    Ok(())
}
