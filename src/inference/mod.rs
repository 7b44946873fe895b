//! Inference pipeline
//!
//! Binds the loaded scaler and classifier into one immutable context and
//! runs the validate -> scale -> score -> label pipeline for single and
//! batch requests.

mod context;

pub use context::{InferenceContext, Prediction};
