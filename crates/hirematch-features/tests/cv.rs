//! Tests for the résumé-derived feature columns.

use hirematch_features::{english_level, experience_years, extract_cv_features, skill_count};
use polars::prelude::*;
use proptest::prelude::*;

fn resume_frame(texts: &[&str]) -> DataFrame {
    DataFrame::new(vec![Series::new("cv_pt".into(), texts).into()]).unwrap()
}

fn i64_column(df: &DataFrame, name: &str) -> Vec<i64> {
    df.column(name)
        .unwrap()
        .i64()
        .unwrap()
        .into_no_null_iter()
        .collect()
}

#[test]
fn portuguese_resume_extracts_experience_and_skills() {
    let df = resume_frame(&["5 anos de experiência em python e sql, inglês avançado"]);
    let out = extract_cv_features(&df, "cv_pt").unwrap();
    assert_eq!(i64_column(&out, "cv_experience_years"), vec![5]);
    assert_eq!(i64_column(&out, "cv_english_level"), vec![3]);
    assert_eq!(i64_column(&out, "cv_skill_python"), vec![1]);
    assert_eq!(i64_column(&out, "cv_skill_sql"), vec![1]);
    assert!(i64_column(&out, "cv_total_skills")[0] >= 2);
    assert_eq!(i64_column(&out, "cv_has_content"), vec![1]);
}

#[test]
fn experience_mentions_are_capped() {
    // 99 is discarded as a parse artifact, the rest sum and cap at 30.
    assert_eq!(experience_years("99 anos"), 0);
    assert_eq!(experience_years("10 anos e depois mais 25 years"), 30);
    assert_eq!(experience_years("3 anos em java, 2 years of sql"), 5);
    assert_eq!(experience_years("sem números"), 0);
}

#[test]
fn english_level_takes_the_highest_keyword() {
    assert_eq!(english_level("inglês básico mas estudando"), 1);
    assert_eq!(english_level("intermediate english, fluent spanish"), 4);
    assert_eq!(english_level("nenhuma menção"), 0);
}

#[test]
fn skill_counts_are_case_insensitive() {
    assert_eq!(skill_count("Python e PYTHON e python", "python"), 3);
    assert_eq!(skill_count("sem a palavra", "docker"), 0);
}

#[test]
fn empty_resume_yields_zeroed_features() {
    let df = resume_frame(&[""]);
    let out = extract_cv_features(&df, "cv_pt").unwrap();
    assert_eq!(i64_column(&out, "cv_word_count"), vec![0]);
    assert_eq!(i64_column(&out, "cv_has_content"), vec![0]);
    assert_eq!(i64_column(&out, "cv_total_skills"), vec![0]);
}

#[test]
fn missing_resume_column_is_a_no_op() {
    let df = DataFrame::new(vec![Series::new("other".into(), ["x"]).into()]).unwrap();
    let out = extract_cv_features(&df, "cv_pt").unwrap();
    assert_eq!(out.width(), 1);
}

proptest! {
    #[test]
    fn experience_is_always_within_bounds(text in ".{0,200}") {
        let years = experience_years(&text);
        prop_assert!((0..=30).contains(&years));
    }

    #[test]
    fn english_level_is_always_within_bounds(text in ".{0,200}") {
        let level = english_level(&text);
        prop_assert!((0..=4).contains(&level));
    }
}
