use crate::annotations::bounding_box::BoundingBox;
use crate::annotations::detection::Candidate;
use ndarray::{Array2, ArrayBase, ArrayView1, Data, Ix2, s};
use thiserror::Error;
use tracing::debug;

/// One raw output grid of the network: a row per candidate, geometry first then scores.
pub type RawDetectionTensor = Array2<f32>;

/// Column holding the objectness score. Decoding skips it and reads class scores directly.
pub const OBJECTNESS_COLUMN: usize = 4;
/// First column of the per-class score vector.
pub const FIRST_SCORE_COLUMN: usize = OBJECTNESS_COLUMN + 1;
/// Fewest columns a tensor can have and still separate geometry from scores.
pub const MIN_TENSOR_COLUMNS: usize = 5;

#[derive(Debug, Error, PartialEq)]
pub enum DecodeError {
    #[error(
        "tensor {tensor_index} has {columns} columns, at least {MIN_TENSOR_COLUMNS} are needed \
        to separate box geometry from class scores"
    )]
    Shape { tensor_index: usize, columns: usize },
    #[error("no detection tensors were provided")]
    EmptyInput,
}

/// Finds the best scoring class. The first maximum wins ties and NaN scores are ignored.
fn best_class(scores: ArrayView1<f32>) -> Option<(usize, f32)> {
    scores
        .iter()
        .copied()
        .enumerate()
        .filter(|(_, score)| !score.is_nan())
        .reduce(|accum, row| if row.1 > accum.1 { row } else { accum })
}

/// Decodes raw network tensors into candidates in pixel space.
///
/// Every row contributes at most one candidate: the argmax of its class scores, kept only when
/// that score is strictly greater than `confidence_threshold`. Geometry columns are fractions of
/// the image size and get scaled by `image_width`/`image_height`. Candidates come out in tensor
/// order, then row order, with no deduplication.
///
/// Fails with [`DecodeError::EmptyInput`] when `tensors` is empty and with
/// [`DecodeError::Shape`] when any tensor has fewer than five columns, in which case nothing is
/// decoded.
pub fn decode<S>(
    tensors: &[ArrayBase<S, Ix2>],
    image_width: u32,
    image_height: u32,
    confidence_threshold: f32,
) -> Result<Vec<Candidate>, DecodeError>
where
    S: Data<Elem = f32>,
{
    if tensors.is_empty() {
        return Err(DecodeError::EmptyInput);
    }
    if let Some((tensor_index, tensor)) = tensors
        .iter()
        .enumerate()
        .find(|(_, tensor)| tensor.ncols() < MIN_TENSOR_COLUMNS)
    {
        return Err(DecodeError::Shape {
            tensor_index,
            columns: tensor.ncols(),
        });
    }

    let image_width = image_width as f32;
    let image_height = image_height as f32;
    let mut candidates: Vec<Candidate> = Vec::new();
    let mut rows_scanned = 0_usize;
    for tensor in tensors {
        for row in tensor.rows() {
            rows_scanned += 1;
            let Some((class_id, confidence)) = best_class(row.slice(s![FIRST_SCORE_COLUMN..]))
            else {
                continue;
            };
            if !(confidence > confidence_threshold) {
                continue;
            }
            let bbox = BoundingBox::from_center(
                row[0] * image_width,
                row[1] * image_height,
                row[2] * image_width,
                row[3] * image_height,
            );
            candidates.push(Candidate::new(class_id, confidence, bbox));
        }
    }
    debug!(
        tensors = tensors.len(),
        rows = rows_scanned,
        candidates = candidates.len(),
        "decoded detection tensors"
    );
    Ok(candidates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array2, array};

    #[test]
    fn decodes_normalized_geometry_into_pixels() {
        let tensor = array![[0.5_f32, 0.5, 0.2, 0.2, 0.9, 0.1, 0.8, 0.3]];
        let candidates = decode(&[tensor], 100, 100, 0.5_f32).unwrap();
        assert_eq!(candidates.len(), 1);
        let candidate = candidates[0];
        assert_eq!(candidate.class_id, 1);
        assert_eq!(candidate.confidence, 0.8_f32);
        assert!((candidate.bbox.left - 40.0).abs() < 1e-4);
        assert!((candidate.bbox.top - 40.0).abs() < 1e-4);
        assert!((candidate.bbox.width - 20.0).abs() < 1e-4);
        assert!((candidate.bbox.height - 20.0).abs() < 1e-4);
    }

    #[test]
    fn scales_axes_independently() {
        let tensor = array![[0.5_f32, 0.25, 0.5, 0.5, 0.0, 0.9]];
        let candidates = decode(&[tensor], 200, 100, 0.5_f32).unwrap();
        assert_eq!(
            candidates[0].bbox,
            BoundingBox::new(50_f32, 0_f32, 100_f32, 50_f32)
        );
    }

    #[test]
    fn threshold_is_exclusive() {
        let tensor = array![
            [0.5_f32, 0.5, 0.1, 0.1, 1.0, 0.5, 0.0],
            [0.5_f32, 0.5, 0.1, 0.1, 1.0, 0.0, 0.5000001],
        ];
        let candidates = decode(&[tensor], 10, 10, 0.5_f32).unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].class_id, 1);
    }

    #[test]
    fn objectness_column_is_not_a_class_score() {
        let tensor = array![[0.5_f32, 0.5, 0.1, 0.1, 0.99, 0.2, 0.3]];
        let candidates = decode(&[tensor], 10, 10, 0.5_f32).unwrap();
        assert!(candidates.is_empty());
    }

    #[test]
    fn first_maximum_wins_ties() {
        let tensor = array![[0.5_f32, 0.5, 0.1, 0.1, 0.0, 0.7, 0.9, 0.9]];
        let candidates = decode(&[tensor], 10, 10, 0.5_f32).unwrap();
        assert_eq!(candidates[0].class_id, 1);
    }

    #[test]
    fn preserves_tensor_then_row_order() {
        let first = array![
            [0.1_f32, 0.1, 0.1, 0.1, 0.0, 0.6, 0.0],
            [0.2_f32, 0.2, 0.1, 0.1, 0.0, 0.0, 0.7],
        ];
        let second = array![[0.3_f32, 0.3, 0.1, 0.1, 0.0, 0.9, 0.0]];
        let candidates = decode(&[first, second], 10, 10, 0.5_f32).unwrap();
        let confidences: Vec<f32> = candidates.iter().map(|c| c.confidence).collect();
        assert_eq!(confidences, vec![0.6_f32, 0.7, 0.9]);
    }

    #[test]
    fn keeps_overlapping_duplicates() {
        let row = [0.5_f32, 0.5, 0.2, 0.2, 0.0, 0.9];
        let tensor = Array2::from_shape_fn((3, 6), |(_, col)| row[col]);
        let candidates = decode(&[tensor], 100, 100, 0.5_f32).unwrap();
        assert_eq!(candidates.len(), 3);
    }

    #[test]
    fn rejects_tensors_with_too_few_columns() {
        let good = array![[0.5_f32, 0.5, 0.2, 0.2, 0.0, 0.9]];
        let narrow = array![[0.5_f32, 0.5, 0.9]];
        let result = decode(&[good, narrow], 100, 100, 0.5_f32);
        assert_eq!(
            result,
            Err(DecodeError::Shape {
                tensor_index: 1,
                columns: 3
            })
        );
    }

    #[test]
    fn zero_tensors_is_reported_as_empty_input() {
        let tensors: Vec<Array2<f32>> = Vec::new();
        assert_eq!(
            decode(&tensors, 100, 100, 0.5_f32),
            Err(DecodeError::EmptyInput)
        );
    }

    #[test]
    fn tensors_without_rows_or_scores_decode_to_nothing() {
        let no_rows = Array2::<f32>::zeros((0, 85));
        let no_scores = array![[0.5_f32, 0.5, 0.2, 0.2, 0.99]];
        let candidates = decode(&[no_rows, no_scores], 100, 100, 0.5_f32).unwrap();
        assert!(candidates.is_empty());
    }

    #[test]
    fn accepts_array_views() {
        let tensor = array![[0.5_f32, 0.5, 0.2, 0.2, 0.0, 0.9]];
        let candidates = decode(&[tensor.view()], 100, 100, 0.5_f32).unwrap();
        assert_eq!(candidates.len(), 1);
    }
}
