//! Model discrimination metrics
//!
//! ROC curve and AUC for the fitted readmission model's predicted
//! probabilities.

/// Compute ROC curve points (FPR, TPR), ordered by increasing FPR
///
/// The threshold sweep visits each distinct score once, from highest to
/// lowest, so tied scores move the operating point in a single step. The
/// curve always starts at (0, 0) and ends at (1, 1).
#[must_use]
pub fn roc_points(labels: &[bool], scores: &[f64]) -> Vec<(f64, f64)> {
    debug_assert_eq!(labels.len(), scores.len());
    let positives = labels.iter().filter(|&&y| y).count();
    let negatives = labels.len() - positives;
    if positives == 0 || negatives == 0 {
        return vec![(0.0, 0.0), (1.0, 1.0)];
    }

    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| {
        scores[b]
            .partial_cmp(&scores[a])
            .expect("non-finite predicted probability")
    });

    let mut points = Vec::with_capacity(scores.len() + 1);
    points.push((0.0, 0.0));
    let mut tp = 0usize;
    let mut fp = 0usize;
    let mut i = 0;
    while i < order.len() {
        // consume the whole block of tied scores before emitting a point
        let threshold = scores[order[i]];
        while i < order.len() && scores[order[i]] == threshold {
            if labels[order[i]] {
                tp += 1;
            } else {
                fp += 1;
            }
            i += 1;
        }
        points.push((fp as f64 / negatives as f64, tp as f64 / positives as f64));
    }
    points
}

/// Area under the ROC curve via the trapezoidal rule
///
/// Expects points ordered by increasing FPR, as produced by [`roc_points`].
#[must_use]
pub fn auc(points: &[(f64, f64)]) -> f64 {
    if points.len() < 2 {
        return 0.0;
    }
    let mut area = 0.0;
    for w in points.windows(2) {
        let (x0, y0) = w[0];
        let (x1, y1) = w[1];
        let dx = x1 - x0;
        if dx < 0.0 {
            continue;
        }
        area += dx * (y0 + y1) / 2.0;
    }
    area
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perfect_ranking_has_auc_one() {
        let labels = [true, true, false, false];
        let scores = [0.9, 0.8, 0.2, 0.1];
        let points = roc_points(&labels, &scores);
        assert_eq!(points.first(), Some(&(0.0, 0.0)));
        assert_eq!(points.last(), Some(&(1.0, 1.0)));
        assert!((auc(&points) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn reversed_ranking_has_auc_zero() {
        let labels = [false, false, true, true];
        let scores = [0.9, 0.8, 0.2, 0.1];
        let points = roc_points(&labels, &scores);
        assert!(auc(&points).abs() < 1e-12);
    }

    #[test]
    fn interleaved_ranking_matches_hand_computation() {
        // ranked: 0.9(+), 0.7(-), 0.6(+), 0.3(-)
        // AUC = fraction of (+,-) pairs ranked correctly = 3/4
        let labels = [true, false, true, false];
        let scores = [0.9, 0.7, 0.6, 0.3];
        let points = roc_points(&labels, &scores);
        assert!((auc(&points) - 0.75).abs() < 1e-12);
    }

    #[test]
    fn fpr_is_monotone_non_decreasing() {
        let labels = [true, false, true, false, true, false];
        let scores = [0.9, 0.9, 0.6, 0.5, 0.4, 0.1];
        let points = roc_points(&labels, &scores);
        for w in points.windows(2) {
            assert!(w[1].0 >= w[0].0);
        }
    }

    #[test]
    fn degenerate_labels_yield_diagonal() {
        let labels = [true, true];
        let scores = [0.4, 0.6];
        assert_eq!(roc_points(&labels, &scores), vec![(0.0, 0.0), (1.0, 1.0)]);
    }
}
