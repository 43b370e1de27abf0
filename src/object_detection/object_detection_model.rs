use crate::object_detection::tensor_decoder::RawDetectionTensor;
use ndarray::ArrayView4;

/// Defines a trait that every inference backend must follow.
///
/// A provider owns whatever model or session state it needs; nothing about the model lives in
/// the post-processing pipeline. It takes the prepared image blob, laid out as
/// (batch, channel, row, column), and returns the raw detection grids the network produced, one
/// per output layer.
pub trait InferenceProvider {
    type Error: std::error::Error + Send + Sync + 'static;

    fn infer(&mut self, blob: ArrayView4<f32>) -> Result<Vec<RawDetectionTensor>, Self::Error>;
}
