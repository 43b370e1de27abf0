use crate::annotations::detection::{Candidate, Detection};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Parameters for overlap suppression.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct SuppressionParams {
    /// Candidates must score strictly above this to be considered at all.
    pub score_threshold: f32,
    /// Boxes overlapping an accepted box with at least this IoU are dropped.
    pub overlap_threshold: f32,
    /// Only let boxes suppress other boxes of the same class.
    pub per_class: bool,
}

impl Default for SuppressionParams {
    fn default() -> Self {
        SuppressionParams {
            score_threshold: 0.5,
            overlap_threshold: 0.4,
            per_class: false,
        }
    }
}

/// Non maximum suppression across all classes.
///
/// See [`suppress_with`].
pub fn suppress(
    candidates: &[Candidate],
    score_threshold: f32,
    overlap_threshold: f32,
) -> Vec<Detection> {
    suppress_with(
        candidates,
        &SuppressionParams {
            score_threshold,
            overlap_threshold,
            per_class: false,
        },
    )
}

/// Non maximum suppression is a way of removing duplicate detections.
///
/// Candidates at or below the score threshold are dropped, the rest are sorted by descending
/// confidence (stable, so ties keep discovery order). Walking that order, each candidate not yet
/// suppressed is accepted and every later candidate overlapping it with IoU at or above the
/// overlap threshold is suppressed. With `per_class` set, only candidates of the accepted
/// candidate's class can be suppressed by it.
///
/// The result is in acceptance order. The pass is quadratic in the number of candidates.
pub fn suppress_with(candidates: &[Candidate], params: &SuppressionParams) -> Vec<Detection> {
    let ordered: Vec<&Candidate> = candidates
        .iter()
        .filter(|candidate| candidate.confidence > params.score_threshold)
        .sorted_by(|a, b| b.confidence.total_cmp(&a.confidence))
        .collect();

    let mut suppressed: Vec<bool> = vec![false; ordered.len()];
    let mut detections: Vec<Detection> = Vec::new();
    for (current_index, current) in ordered.iter().enumerate() {
        if suppressed[current_index] {
            continue;
        }
        detections.push(Detection::from(**current));
        for (other_index, other) in ordered.iter().enumerate().skip(current_index + 1) {
            if suppressed[other_index] {
                continue;
            }
            if params.per_class && current.class_id != other.class_id {
                continue;
            }
            let iou = current.bbox.intersection_over_union(&other.bbox);
            if iou >= params.overlap_threshold {
                suppressed[other_index] = true;
            }
        }
    }
    debug!(
        candidates = candidates.len(),
        above_floor = ordered.len(),
        kept = detections.len(),
        per_class = params.per_class,
        "suppressed overlapping candidates"
    );
    detections
}
