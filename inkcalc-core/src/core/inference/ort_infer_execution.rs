use super::ort_infer::OrtInfer;
use crate::core::batch::{Tensor2D, Tensor4D};
use crate::core::errors::OCRError;
use ort::value::TensorRef;
use std::sync::atomic::Ordering;

impl OrtInfer {
    /// Returns the model path associated with this inference engine.
    pub fn model_path(&self) -> &std::path::Path {
        &self.model_path
    }

    /// Returns the model name associated with this inference engine.
    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// Runs a forward pass on a 4-D batch and returns the `[N, C]` scores.
    pub fn infer_2d(&self, x: &Tensor4D) -> Result<Tensor2D, OCRError> {
        let batch_size = x.shape()[0];
        let input_tensor = TensorRef::from_array_view(x.view())
            .map_err(|e| OCRError::inference_error(&self.model_name, "tensor_conversion", e))?;
        let inputs = ort::inputs![self.input_name.as_str() => input_tensor];

        let idx = self.next_idx.fetch_add(1, Ordering::Relaxed) % self.sessions.len();
        let mut session_guard = self.sessions[idx].lock().map_err(|_| {
            OCRError::inference_contract(
                &self.model_name,
                format!(
                    "failed to acquire session lock for session {}/{}",
                    idx,
                    self.sessions.len()
                ),
            )
        })?;

        let output_name = match &self.output_name {
            Some(name) => name.clone(),
            None => session_guard
                .outputs
                .first()
                .map(|o| o.name.clone())
                .ok_or_else(|| {
                    OCRError::inference_contract(&self.model_name, "model declares no outputs")
                })?,
        };

        let outputs = session_guard
            .run(inputs)
            .map_err(|e| OCRError::inference_error(&self.model_name, "forward_pass", e))?;

        let (shape, data) = outputs[output_name.as_str()]
            .try_extract_tensor::<f32>()
            .map_err(|e| OCRError::inference_error(&self.model_name, "output_extraction", e))?;

        if shape.len() != 2 || shape[0] as usize != batch_size {
            return Err(OCRError::inference_contract(
                &self.model_name,
                format!(
                    "expected output shape [{}, C], got {:?}",
                    batch_size,
                    shape.iter().collect::<Vec<_>>()
                ),
            ));
        }
        let classes = shape[1] as usize;
        Ok(Tensor2D::from_shape_vec((batch_size, classes), data.to_vec())?)
    }
}
