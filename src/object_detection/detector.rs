use crate::annotations::detection::DetectionSet;
use crate::config::ScanConfig;
use crate::error::ScanError;
use crate::image_utils::image_conversion::prepare_blob;
use crate::object_detection::object_detection_model::InferenceProvider;
use crate::object_detection::object_detection_utils::suppress_with;
use crate::object_detection::tensor_decoder::{DecodeError, decode};
use image::RgbImage;
use ndarray::{ArrayBase, Data, Ix2};
use std::time::Instant;
use tracing::{debug, info};

/// Runs an inference provider over an image and post-processes its raw output.
///
/// The detector holds configuration only. Model state belongs to the provider passed into
/// [`Detector::detect`], so one detector can serve any number of providers and threads.
#[derive(Clone, Debug, Default)]
pub struct Detector {
    config: ScanConfig,
}

impl Detector {
    pub fn new(config: ScanConfig) -> Self {
        Detector { config }
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Decodes and suppresses raw tensors for an image of the given pixel size.
    ///
    /// Having no tensors at all is treated as "nothing detected" rather than a failure. Only a
    /// tensor too narrow to hold geometry and scores is an error.
    pub fn post_process<S>(
        &self,
        tensors: &[ArrayBase<S, Ix2>],
        image_width: u32,
        image_height: u32,
    ) -> Result<DetectionSet, DecodeError>
    where
        S: Data<Elem = f32>,
    {
        let candidates = match decode(
            tensors,
            image_width,
            image_height,
            self.config.confidence_threshold,
        ) {
            Ok(candidates) => candidates,
            Err(DecodeError::EmptyInput) => {
                debug!("provider returned no tensors");
                Vec::new()
            }
            Err(err) => return Err(err),
        };
        let detections = suppress_with(&candidates, &self.config.suppression_params());
        Ok(DetectionSet::from(detections))
    }

    pub fn detect<P: InferenceProvider>(
        &self,
        provider: &mut P,
        image: &RgbImage,
    ) -> Result<DetectionSet, ScanError> {
        let blob = prepare_blob(
            image,
            self.config.input_width,
            self.config.input_height,
            self.config.channel_order,
        );
        let now = Instant::now();
        let tensors = provider
            .infer(blob.view())
            .map_err(|err| ScanError::Inference(Box::new(err)))?;
        let inference_time = now.elapsed();
        let detections = self.post_process(&tensors, image.width(), image.height())?;
        info!(
            width = image.width(),
            height = image.height(),
            detections = detections.len(),
            "inference took {:.2?}",
            inference_time
        );
        Ok(detections)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array2, array};

    #[test]
    fn no_tensors_means_nothing_detected() {
        let tensors: Vec<Array2<f32>> = Vec::new();
        let detections = Detector::default().post_process(&tensors, 640, 480).unwrap();
        assert!(detections.is_empty());
    }

    #[test]
    fn narrow_tensor_aborts_post_processing() {
        let tensors = vec![array![[0.1_f32, 0.2, 0.3]]];
        let result = Detector::default().post_process(&tensors, 640, 480);
        assert_eq!(
            result,
            Err(DecodeError::Shape {
                tensor_index: 0,
                columns: 3
            })
        );
    }

    #[test]
    fn per_class_flag_reaches_suppression() {
        let tensors = vec![array![
            [0.5_f32, 0.5, 0.2, 0.2, 1.0, 0.9, 0.0],
            [0.5_f32, 0.5, 0.2, 0.2, 1.0, 0.0, 0.8],
        ]];
        let joint = Detector::default().post_process(&tensors, 100, 100).unwrap();
        assert_eq!(joint.len(), 1);

        let per_class = Detector::new(ScanConfig {
            per_class_suppression: true,
            ..ScanConfig::default()
        })
        .post_process(&tensors, 100, 100)
        .unwrap();
        let ids: Vec<usize> = per_class.iter().map(|d| d.class_id()).collect();
        assert_eq!(ids, vec![0, 1]);
    }
}
