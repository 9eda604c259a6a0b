//! ROC and precision/recall curve points for the report artifacts.

/// One point of the ROC curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RocPoint {
    pub false_positive_rate: f64,
    pub true_positive_rate: f64,
}

/// One point of the precision/recall curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrPoint {
    pub recall: f64,
    pub precision: f64,
}

/// Indices sorted by descending score, distinct-score group boundaries kept.
fn descending_order(scores: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));
    order
}

/// ROC curve from (0,0) to (1,1), one point per distinct score.
pub fn roc_points(labels: &[i64], scores: &[f64]) -> Vec<RocPoint> {
    let positives = labels.iter().filter(|label| **label == 1).count();
    let negatives = labels.len() - positives;
    if positives == 0 || negatives == 0 {
        return vec![
            RocPoint {
                false_positive_rate: 0.0,
                true_positive_rate: 0.0,
            },
            RocPoint {
                false_positive_rate: 1.0,
                true_positive_rate: 1.0,
            },
        ];
    }

    let order = descending_order(scores);
    let mut points = vec![RocPoint {
        false_positive_rate: 0.0,
        true_positive_rate: 0.0,
    }];
    let mut true_positives = 0usize;
    let mut false_positives = 0usize;
    let mut idx = 0;
    while idx < order.len() {
        let score = scores[order[idx]];
        // Consume the whole tied-score group before emitting a point.
        while idx < order.len() && scores[order[idx]].total_cmp(&score).is_eq() {
            if labels[order[idx]] == 1 {
                true_positives += 1;
            } else {
                false_positives += 1;
            }
            idx += 1;
        }
        points.push(RocPoint {
            false_positive_rate: false_positives as f64 / negatives as f64,
            true_positive_rate: true_positives as f64 / positives as f64,
        });
    }
    points
}

/// Precision/recall curve, one point per distinct score threshold, ending at
/// the conventional (recall 0, precision 1) anchor.
pub fn pr_points(labels: &[i64], scores: &[f64]) -> Vec<PrPoint> {
    let positives = labels.iter().filter(|label| **label == 1).count();
    if positives == 0 {
        return vec![PrPoint {
            recall: 0.0,
            precision: 1.0,
        }];
    }

    let order = descending_order(scores);
    let mut points = Vec::new();
    let mut true_positives = 0usize;
    let mut predicted = 0usize;
    let mut idx = 0;
    while idx < order.len() {
        let score = scores[order[idx]];
        while idx < order.len() && scores[order[idx]].total_cmp(&score).is_eq() {
            if labels[order[idx]] == 1 {
                true_positives += 1;
            }
            predicted += 1;
            idx += 1;
        }
        points.push(PrPoint {
            recall: true_positives as f64 / positives as f64,
            precision: true_positives as f64 / predicted as f64,
        });
    }
    points.push(PrPoint {
        recall: 0.0,
        precision: 1.0,
    });
    points
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perfect_separation_hugs_the_axes() {
        let labels = [0, 0, 1, 1];
        let scores = [0.1, 0.2, 0.8, 0.9];
        let roc = roc_points(&labels, &scores);
        assert_eq!(roc.first().map(|p| p.true_positive_rate), Some(0.0));
        assert!(roc.iter().any(|p| p.true_positive_rate == 1.0 && p.false_positive_rate == 0.0));
        assert_eq!(
            roc.last(),
            Some(&RocPoint {
                false_positive_rate: 1.0,
                true_positive_rate: 1.0
            })
        );

        let pr = pr_points(&labels, &scores);
        assert!(pr.iter().any(|p| p.recall == 1.0 && p.precision == 1.0));
        assert_eq!(
            pr.last(),
            Some(&PrPoint {
                recall: 0.0,
                precision: 1.0
            })
        );
    }

    #[test]
    fn single_class_degenerates_gracefully() {
        let roc = roc_points(&[1, 1], &[0.3, 0.8]);
        assert_eq!(roc.len(), 2);
        let pr = pr_points(&[0, 0], &[0.3, 0.8]);
        assert_eq!(pr.len(), 1);
    }

    #[test]
    fn tied_scores_share_one_point() {
        let labels = [0, 1, 0, 1];
        let scores = [0.5, 0.5, 0.5, 0.5];
        let roc = roc_points(&labels, &scores);
        assert_eq!(roc.len(), 2);
        assert_eq!(
            roc[1],
            RocPoint {
                false_positive_rate: 1.0,
                true_positive_rate: 1.0
            }
        );
    }
}
