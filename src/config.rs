//! Settings for a scan, loadable from JSON and overridable from the command line.

use crate::error::ScanError;
use crate::object_detection::object_detection_utils::SuppressionParams;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Channel order of the blob handed to the network.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelOrder {
    #[default]
    Rgb,
    Bgr,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScanConfig {
    /// Rows whose best class score is not strictly above this are dropped while decoding.
    pub confidence_threshold: f32,
    /// Acceptance floor re-checked during suppression.
    pub score_threshold: f32,
    /// IoU at or above which two boxes count as the same object.
    pub overlap_threshold: f32,
    /// Suppress within each class instead of across all classes.
    pub per_class_suppression: bool,
    /// Network input width in pixels.
    pub input_width: u32,
    /// Network input height in pixels.
    pub input_height: u32,
    /// Order of the color planes in the network input. Models trained on BGR input want `bgr`.
    pub channel_order: ChannelOrder,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.5,
            score_threshold: 0.5,
            overlap_threshold: 0.4,
            per_class_suppression: false,
            input_width: 416,
            input_height: 416,
            channel_order: ChannelOrder::Rgb,
        }
    }
}

impl ScanConfig {
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ScanError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ScanError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&contents).map_err(|source| ScanError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn suppression_params(&self) -> SuppressionParams {
        SuppressionParams {
            score_threshold: self.score_threshold,
            overlap_threshold: self.overlap_threshold,
            per_class: self.per_class_suppression,
        }
    }
}
