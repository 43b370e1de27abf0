//! Fridge scanner: object detection post-processing and recipe suggestions.
//!
//! The heart of the crate turns a detection network's raw output grids into a clean set of
//! non-overlapping boxes: [`decode`] reads candidates out of the tensors and [`suppress`] runs
//! greedy non maximum suppression over them. Everything around that (image preparation, an ONNX
//! inference provider, class names, recipe lookup) is thin glue.

pub mod annotations;
pub mod catalog;
pub mod config;
pub mod error;
pub mod image_utils;
pub mod object_detection;
pub mod report;

pub use annotations::bounding_box::BoundingBox;
pub use annotations::detection::{Candidate, Detection, DetectionSet};
pub use config::{ChannelOrder, ScanConfig};
pub use error::ScanError;
pub use object_detection::detector::Detector;
pub use object_detection::object_detection_model::InferenceProvider;
pub use object_detection::object_detection_utils::{SuppressionParams, suppress, suppress_with};
pub use object_detection::tensor_decoder::{DecodeError, RawDetectionTensor, decode};
