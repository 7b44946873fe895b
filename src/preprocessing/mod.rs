//! Feature normalization applied before classification
//!
//! The scaler is fitted offline during model training; this service only
//! loads the persisted parameters and applies the transform at inference
//! time.

mod scaler;

pub use scaler::RobustScaler;
