//! ONNX Runtime plumbing shared by the classifier models.

mod ort_infer;
mod ort_infer_execution;
pub mod session;

pub use ort_infer::OrtInfer;
pub use session::load_session;
