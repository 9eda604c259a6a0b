//! Numeric signals derived from free-text résumé fields.
//!
//! Everything here is deterministic text scanning: counts, a capped
//! experience-years extraction, a keyword-based English level, and literal
//! occurrence counts for a fixed skill vocabulary. Résumés are Portuguese,
//! English, or a mix, so the keyword tables carry both spellings.

use std::sync::LazyLock;

use polars::prelude::*;
use regex::Regex;
use tracing::debug;

use hirematch_common::string_values;
use hirematch_model::Result;

/// Skill keywords counted per résumé, one `cv_skill_<keyword>` column each.
pub const SKILL_KEYWORDS: [&str; 31] = [
    "python",
    "java",
    "sql",
    "javascript",
    "html",
    "css",
    "aws",
    "azure",
    "cloud",
    "docker",
    "kubernetes",
    "machine learning",
    "ai",
    "data science",
    "big data",
    "excel",
    "power bi",
    "tableau",
    "sql server",
    "mysql",
    "nosql",
    "mongodb",
    "postgresql",
    "oracle",
    "linux",
    "windows",
    "git",
    "jenkins",
    "ci/cd",
    "agile",
    "scrum",
];

/// Keyword -> proficiency level, Portuguese and English spellings.
const ENGLISH_LEVELS: [(&str, i64); 14] = [
    ("basico", 1),
    ("básico", 1),
    ("iniciante", 1),
    ("basic", 1),
    ("intermediario", 2),
    ("intermediário", 2),
    ("intermedio", 2),
    ("intermediate", 2),
    ("avançado", 3),
    ("advanced", 3),
    ("fluente", 4),
    ("fluent", 4),
    ("nativo", 4),
    ("native", 4),
];

/// A mention of 50+ years is treated as a parse artifact, not experience.
const MAX_EXPERIENCE_PER_MENTION: u64 = 50;
/// Total experience is capped; résumés listing overlapping spans overshoot.
const MAX_EXPERIENCE_TOTAL: u64 = 30;

static EXPERIENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+)\s*(anos|ano|years|year|yr|y)").expect("valid experience pattern")
});

/// Sum of capped experience mentions, always in `[0, 30]`.
pub fn experience_years(text: &str) -> i64 {
    let lower = text.to_lowercase();
    let mut total: u64 = 0;
    for caps in EXPERIENCE_RE.captures_iter(&lower) {
        if let Ok(years) = caps[1].parse::<u64>()
            && years < MAX_EXPERIENCE_PER_MENTION
        {
            total += years;
        }
    }
    total.min(MAX_EXPERIENCE_TOTAL) as i64
}

/// Highest English proficiency keyword found anywhere in the text, 0..=4.
pub fn english_level(text: &str) -> i64 {
    let lower = text.to_lowercase();
    ENGLISH_LEVELS
        .iter()
        .filter(|(keyword, _)| lower.contains(keyword))
        .map(|(_, level)| *level)
        .max()
        .unwrap_or(0)
}

/// Case-insensitive non-overlapping occurrence count of a skill keyword.
pub fn skill_count(text: &str, keyword: &str) -> i64 {
    text.to_lowercase().matches(keyword).count() as i64
}

/// Derive the CV feature columns from the résumé column.
///
/// No-op when the résumé column is absent; callers must not assume the
/// derived columns always exist.
pub fn extract_cv_features(df: &DataFrame, cv_column: &str) -> Result<DataFrame> {
    let Some(texts) = string_values(df, cv_column) else {
        debug!(column = cv_column, "résumé column absent, skipping CV features");
        return Ok(df.clone());
    };
    let mut out = df.clone();

    let word_counts: Vec<i64> = texts
        .iter()
        .map(|text| text.split_whitespace().count() as i64)
        .collect();
    let char_counts: Vec<i64> = texts.iter().map(|text| text.chars().count() as i64).collect();
    let has_content: Vec<i64> = texts
        .iter()
        .map(|text| i64::from(text.trim().chars().count() > 10))
        .collect();
    let experience: Vec<i64> = texts.iter().map(|text| experience_years(text)).collect();
    let english: Vec<i64> = texts.iter().map(|text| english_level(text)).collect();

    out.with_column(Series::new("cv_word_count".into(), word_counts))?;
    out.with_column(Series::new("cv_char_count".into(), char_counts))?;
    out.with_column(Series::new("cv_has_content".into(), has_content))?;
    out.with_column(Series::new("cv_experience_years".into(), experience))?;
    out.with_column(Series::new("cv_english_level".into(), english))?;

    let mut totals = vec![0i64; texts.len()];
    for keyword in SKILL_KEYWORDS {
        let counts: Vec<i64> = texts
            .iter()
            .map(|text| skill_count(text, keyword))
            .collect();
        for (total, count) in totals.iter_mut().zip(&counts) {
            *total += count;
        }
        out.with_column(Series::new(format!("cv_skill_{keyword}").into(), counts))?;
    }
    out.with_column(Series::new("cv_total_skills".into(), totals))?;
    Ok(out)
}
