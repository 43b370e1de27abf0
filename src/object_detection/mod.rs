pub mod detector;
pub mod object_detection_model;
pub mod object_detection_utils;
#[cfg(feature = "onnx")]
pub mod ort_inference_session;
pub mod tensor_decoder;
