use crate::object_detection::object_detection_model::InferenceProvider;
use crate::object_detection::tensor_decoder::RawDetectionTensor;
use ndarray::{Array2, ArrayView4};
use ort::session::Session;
use ort::value::Value;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum OrtProviderError {
    #[error(transparent)]
    Ort(#[from] ort::Error),
    #[error("model declares no inputs")]
    NoInput,
    #[error("model output `{name}` has shape {shape:?}, which cannot be read as rows of detections")]
    OutputShape { name: String, shape: Vec<i64> },
}

/// An onnxruntime inference session.
///
/// Wraps an ONNX session and hands every model output back as a 2D grid whose column count is
/// the output's last dimension, which is how detection heads lay out one candidate per row.
pub struct OrtInferenceSession {
    session: Session,
    input_name: String,
    output_names: Vec<String>,
}

impl OrtInferenceSession {
    pub fn new(model_path: &Path) -> Result<Self, OrtProviderError> {
        let session = Session::builder()?.commit_from_file(model_path)?;
        let input_name = session
            .inputs
            .first()
            .map(|input| input.name.clone())
            .ok_or(OrtProviderError::NoInput)?;
        let output_names: Vec<String> = session
            .outputs
            .iter()
            .map(|output| output.name.clone())
            .collect();
        info!(
            model = %model_path.display(),
            input = %input_name,
            outputs = output_names.len(),
            "loaded onnx model"
        );
        Ok(Self {
            session,
            input_name,
            output_names,
        })
    }
}

fn output_as_grid(
    name: &str,
    shape: &[i64],
    data: &[f32],
) -> Result<RawDetectionTensor, OrtProviderError> {
    let shape_error = || OrtProviderError::OutputShape {
        name: name.to_string(),
        shape: shape.to_vec(),
    };
    let columns = match shape.last() {
        Some(&columns) if columns > 0 => columns as usize,
        _ => return Err(shape_error()),
    };
    if data.len() % columns != 0 {
        return Err(shape_error());
    }
    Array2::from_shape_vec((data.len() / columns, columns), data.to_vec())
        .map_err(|_| shape_error())
}

impl InferenceProvider for OrtInferenceSession {
    type Error = OrtProviderError;

    fn infer(&mut self, blob: ArrayView4<f32>) -> Result<Vec<RawDetectionTensor>, Self::Error> {
        let shape: Vec<usize> = blob.shape().to_vec();
        let data: Vec<f32> = blob.iter().copied().collect();
        let input_value = Value::from_array((shape.as_slice(), data))?;
        let outputs = self
            .session
            .run(ort::inputs![self.input_name.as_str() => input_value])?;

        let mut tensors: Vec<RawDetectionTensor> = Vec::with_capacity(self.output_names.len());
        for name in &self.output_names {
            let (output_shape, output_data) = outputs[name.as_str()].try_extract_tensor::<f32>()?;
            let output_shape: Vec<i64> = output_shape.iter().copied().collect();
            let grid = output_as_grid(name, &output_shape, output_data)?;
            debug!(output = %name, rows = grid.nrows(), columns = grid.ncols(), "read model output");
            tensors.push(grid);
        }
        Ok(tensors)
    }
}
