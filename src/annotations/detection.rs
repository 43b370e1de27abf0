use crate::annotations::bounding_box::BoundingBox;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A detection proposal decoded from a single row of a raw network tensor.
///
/// Candidates are ephemeral: the tensor decoder creates them and the overlap suppressor consumes
/// them. Many candidates usually describe the same object.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
pub struct Candidate {
    pub class_id: usize,
    pub confidence: f32,
    pub bbox: BoundingBox,
}

impl Candidate {
    pub fn new(class_id: usize, confidence: f32, bbox: BoundingBox) -> Self {
        Candidate {
            class_id,
            confidence,
            bbox,
        }
    }
}

/// A detection is what the post-processing pipeline produces as output.
///
/// It is a candidate that survived overlap suppression and cannot be modified afterwards. The
/// class id is never resolved to a name here, that happens in the catalog.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Detection(Candidate);

impl Detection {
    pub fn class_id(&self) -> usize {
        self.0.class_id
    }

    pub fn confidence(&self) -> f32 {
        self.0.confidence
    }

    pub fn bbox(&self) -> &BoundingBox {
        &self.0.bbox
    }
}

impl From<Candidate> for Detection {
    fn from(candidate: Candidate) -> Self {
        Detection(candidate)
    }
}

impl From<Detection> for Candidate {
    fn from(detection: Detection) -> Self {
        detection.0
    }
}

impl fmt::Display for Detection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "class {} ({:.2}%) at {}",
            self.0.class_id,
            self.0.confidence * 100.0,
            self.0.bbox
        )
    }
}

/// The result of one pipeline invocation, in the order detections were accepted.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DetectionSet {
    detections: Vec<Detection>,
}

impl DetectionSet {
    pub fn len(&self) -> usize {
        self.detections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.detections.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Detection> {
        self.detections.iter()
    }

    pub fn as_slice(&self) -> &[Detection] {
        &self.detections
    }

    /// Turns the set back into candidates so it can be fed through suppression again.
    pub fn to_candidates(&self) -> Vec<Candidate> {
        self.detections.iter().copied().map(Candidate::from).collect()
    }
}

impl From<Vec<Detection>> for DetectionSet {
    fn from(detections: Vec<Detection>) -> Self {
        DetectionSet { detections }
    }
}

impl IntoIterator for DetectionSet {
    type Item = Detection;
    type IntoIter = std::vec::IntoIter<Detection>;

    fn into_iter(self) -> Self::IntoIter {
        self.detections.into_iter()
    }
}

impl<'a> IntoIterator for &'a DetectionSet {
    type Item = &'a Detection;
    type IntoIter = std::slice::Iter<'a, Detection>;

    fn into_iter(self) -> Self::IntoIter {
        self.detections.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detection_round_trips_through_candidate() {
        let candidate = Candidate::new(
            3,
            0.75_f32,
            BoundingBox::new(1_f32, 2_f32, 3_f32, 4_f32),
        );
        let detection = Detection::from(candidate);
        assert_eq!(detection.class_id(), 3);
        assert_eq!(detection.confidence(), 0.75_f32);
        assert_eq!(Candidate::from(detection), candidate);
    }

    #[test]
    fn detection_set_serializes_as_plain_list() {
        let set = DetectionSet::from(vec![Detection::from(Candidate::new(
            1,
            0.5_f32,
            BoundingBox::new(0_f32, 0_f32, 2_f32, 2_f32),
        ))]);
        let json = serde_json::to_value(&set).unwrap();
        assert_eq!(
            json,
            serde_json::json!([{
                "class_id": 1,
                "confidence": 0.5,
                "bbox": {"left": 0.0, "top": 0.0, "width": 2.0, "height": 2.0}
            }])
        );
    }
}
