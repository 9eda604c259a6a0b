//! Tests for interaction features and target encoding.

use hirematch_features::{TARGET_COLUMN, engineer_features_at};
use hirematch_ingest::MISSING_TEXT;
use hirematch_model::PipelineError;
use polars::prelude::*;

fn i64_column(df: &DataFrame, name: &str) -> Vec<i64> {
    df.column(name)
        .unwrap()
        .i64()
        .unwrap()
        .into_no_null_iter()
        .collect()
}

#[test]
fn missing_target_column_is_fatal() {
    let df = DataFrame::new(vec![Series::new("a".into(), ["x"]).into()]).unwrap();
    let err = engineer_features_at(&df, 2026).unwrap_err();
    assert!(matches!(err, PipelineError::MissingColumn(name) if name == TARGET_COLUMN));
}

#[test]
fn level_match_requires_candidate_at_or_above_job() {
    let df = DataFrame::new(vec![
        Series::new(
            "perfil_vaga_nivel_profissional".into(),
            ["Pleno", "Sênior", "Pleno", "Especialista"],
        )
        .into(),
        Series::new(
            "informacoes_profissionais_nivel_profissional".into(),
            ["Sênior", "Júnior", "Pleno", MISSING_TEXT],
        )
        .into(),
        Series::new(TARGET_COLUMN.into(), [1i64, 0, 1, 0]).into(),
    ])
    .unwrap();
    let out = engineer_features_at(&df, 2026).unwrap().frame;
    assert_eq!(i64_column(&out, "match_nivel_profissional"), vec![1, 0, 1, 0]);
}

#[test]
fn city_match_uses_first_comma_token_and_ignores_sentinels() {
    let df = DataFrame::new(vec![
        Series::new(
            "perfil_vaga_cidade".into(),
            ["São Paulo", "Campinas", MISSING_TEXT],
        )
        .into(),
        Series::new(
            "informacoes_pessoais_local".into(),
            ["são paulo, SP", "Santos, SP", MISSING_TEXT],
        )
        .into(),
        Series::new(TARGET_COLUMN.into(), [1i64, 0, 0]).into(),
    ])
    .unwrap();
    let out = engineer_features_at(&df, 2026).unwrap().frame;
    assert_eq!(i64_column(&out, "match_cidade"), vec![1, 0, 0]);
}

#[test]
fn bins_and_age_are_derived_with_nulls_out_of_range() {
    let df = DataFrame::new(vec![
        Series::new("cv_experience_years".into(), [0i64, 4, 30]).into(),
        Series::new("cv_total_skills".into(), [2i64, 7, 50]).into(),
        Series::new("cv_word_count".into(), [10i64, 20, 30]).into(),
        Series::new(
            "informacoes_pessoais_data_nascimento".into(),
            ["1990-01-05", MISSING_TEXT, "05/06/2000"],
        )
        .into(),
        Series::new(TARGET_COLUMN.into(), [0i64, 1, 0]).into(),
    ])
    .unwrap();
    let out = engineer_features_at(&df, 2026).unwrap().frame;

    let experience: Vec<Option<u32>> = out
        .column("experience_bin")
        .unwrap()
        .u32()
        .unwrap()
        .into_iter()
        .collect();
    assert_eq!(experience, vec![Some(0), Some(2), None]);

    let skills: Vec<Option<u32>> = out
        .column("skills_bin")
        .unwrap()
        .u32()
        .unwrap()
        .into_iter()
        .collect();
    assert_eq!(skills, vec![Some(0), Some(2), None]);

    let complexity: Vec<f64> = out
        .column("cv_complexity")
        .unwrap()
        .f64()
        .unwrap()
        .into_no_null_iter()
        .collect();
    assert_eq!(complexity, vec![20.0, 140.0, 1500.0]);

    let ages: Vec<Option<i64>> = out
        .column("idade")
        .unwrap()
        .i64()
        .unwrap()
        .into_iter()
        .collect();
    assert_eq!(ages, vec![Some(36), None, Some(26)]);
}

#[test]
fn high_cardinality_strings_are_target_encoded() {
    let n = 24;
    let recruiters: Vec<String> = (0..n).map(|i| format!("recruiter-{i}")).collect();
    let cities: Vec<String> = (0..n).map(|_| "Campinas".to_string()).collect();
    let labels: Vec<i64> = (0..n).map(|i| i64::from(i % 2 == 0)).collect();
    let df = DataFrame::new(vec![
        Series::new("recrutador".into(), recruiters).into(),
        Series::new("perfil_vaga_cidade".into(), cities).into(),
        Series::new(TARGET_COLUMN.into(), labels).into(),
    ])
    .unwrap();
    let engineered = engineer_features_at(&df, 2026).unwrap();

    // 24 distinct recruiters exceed the cardinality threshold, one city does not.
    assert_eq!(engineered.encodings.len(), 1);
    assert_eq!(engineered.encodings[0].column, "recrutador");
    assert_eq!(
        engineered.frame.column("recrutador").unwrap().dtype(),
        &DataType::Float64
    );
    assert_eq!(
        engineered.frame.column("perfil_vaga_cidade").unwrap().dtype(),
        &DataType::String
    );
    assert_eq!(engineered.encodings[0].encode("never-seen"), 0.5);
}
