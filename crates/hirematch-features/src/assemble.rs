//! Joins the three flattened tables into one training frame and derives the
//! label.

use polars::prelude::*;
use tracing::{debug, warn};

use hirematch_common::string_values;
use hirematch_ingest::clean_frame;
use hirematch_model::Result;

/// Name of the binary label column added by [`assemble_dataset`].
pub const TARGET_COLUMN: &str = "target";

/// Prospect status values counting as positive contain this word.
const POSITIVE_STATUS_MARKER: &str = "encaminhado";

fn join_left(
    left: DataFrame,
    right: &DataFrame,
    left_key: &str,
    right_key: &str,
) -> Result<DataFrame> {
    if right.height() == 0 {
        debug!(key = right_key, "join skipped, right side is empty");
        return Ok(left);
    }
    if left.column(left_key).is_err() {
        warn!(key = left_key, "join skipped, left key column is missing");
        return Ok(left);
    }
    if right.column(right_key).is_err() {
        warn!(key = right_key, "join skipped, right key column is missing");
        return Ok(left);
    }
    let joined = left
        .lazy()
        .join(
            right.clone().lazy(),
            [col(left_key)],
            [col(right_key)],
            JoinArgs::new(JoinType::Left),
        )
        .collect()?;
    Ok(joined)
}

/// Add the binary `target` column from the prospect status.
///
/// A row is positive when its status contains "encaminhado" in any casing.
/// Rows without a status column are all negative; the column is always
/// non-null.
pub fn derive_target(df: &DataFrame) -> Result<DataFrame> {
    let labels: Vec<i64> = match string_values(df, "situacao_candidado") {
        Some(statuses) => statuses
            .iter()
            .map(|status| i64::from(status.to_lowercase().contains(POSITIVE_STATUS_MARKER)))
            .collect(),
        None => {
            warn!("status column missing, labelling every row negative");
            vec![0i64; df.height()]
        }
    };
    let mut out = df.clone();
    out.with_column(Series::new(TARGET_COLUMN.into(), labels))?;
    Ok(out)
}

/// Assemble the supervised dataset from the three cleaned source tables.
///
/// Prospects are left-joined to applicants on `codigo == applicant_id` and to
/// jobs on `job_id`, join gaps are re-filled with the missing-value
/// sentinels, and the label is derived from the prospect status. One output
/// row per prospect row.
pub fn assemble_dataset(
    prospects: &DataFrame,
    applicants: &DataFrame,
    jobs: &DataFrame,
) -> Result<DataFrame> {
    let joined = join_left(prospects.clone(), applicants, "codigo", "applicant_id")?;
    let joined = join_left(joined, jobs, "job_id", "job_id")?;
    let cleaned = clean_frame(&joined)?;
    let labelled = derive_target(&cleaned)?;
    let positives = labelled
        .column(TARGET_COLUMN)?
        .i64()?
        .into_no_null_iter()
        .filter(|label| *label == 1)
        .count();
    debug!(
        rows = labelled.height(),
        columns = labelled.width(),
        positives,
        "dataset assembled"
    );
    Ok(labelled)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_is_case_insensitive_substring_match() {
        let df = DataFrame::new(vec![
            Series::new(
                "situacao_candidado".into(),
                [
                    "Encaminhado ao Requisitante",
                    "Inscrito",
                    "ENCAMINHADO para entrevista",
                ],
            )
            .into(),
        ])
        .unwrap();
        let labelled = derive_target(&df).unwrap();
        let labels: Vec<i64> = labelled
            .column(TARGET_COLUMN)
            .unwrap()
            .i64()
            .unwrap()
            .into_no_null_iter()
            .collect();
        assert_eq!(labels, vec![1, 0, 1]);
    }

    #[test]
    fn missing_status_column_labels_all_negative() {
        let df =
            DataFrame::new(vec![Series::new("codigo".into(), ["1", "2"]).into()]).unwrap();
        let labelled = derive_target(&df).unwrap();
        let labels: Vec<i64> = labelled
            .column(TARGET_COLUMN)
            .unwrap()
            .i64()
            .unwrap()
            .into_no_null_iter()
            .collect();
        assert_eq!(labels, vec![0, 0]);
    }

    #[test]
    fn unmatched_join_rows_are_filled_with_sentinels() {
        let prospects = DataFrame::new(vec![
            Series::new("codigo".into(), ["101", "999"]).into(),
            Series::new("job_id".into(), ["900", "900"]).into(),
            Series::new(
                "situacao_candidado".into(),
                ["Encaminhado", "Inscrito"],
            )
            .into(),
        ])
        .unwrap();
        let applicants = DataFrame::new(vec![
            Series::new("applicant_id".into(), ["101"]).into(),
            Series::new("infos_basicas_nome".into(), ["Ana"]).into(),
        ])
        .unwrap();
        let jobs = DataFrame::new(vec![
            Series::new("job_id".into(), ["900"]).into(),
            Series::new("perfil_vaga_cidade".into(), ["Campinas"]).into(),
        ])
        .unwrap();
        let dataset = assemble_dataset(&prospects, &applicants, &jobs).unwrap();
        assert_eq!(dataset.height(), 2);
        let names: Vec<String> = hirematch_common::string_values(&dataset, "infos_basicas_nome")
            .unwrap();
        assert_eq!(names[0], "Ana");
        assert_eq!(names[1], hirematch_ingest::MISSING_TEXT);
    }

    #[test]
    fn empty_side_frames_leave_prospects_untouched() {
        let prospects = DataFrame::new(vec![
            Series::new("codigo".into(), ["101"]).into(),
            Series::new("job_id".into(), ["900"]).into(),
        ])
        .unwrap();
        let empty = DataFrame::empty();
        let dataset = assemble_dataset(&prospects, &empty, &empty).unwrap();
        assert_eq!(dataset.height(), 1);
        assert!(dataset.column(TARGET_COLUMN).is_ok());
    }
}
