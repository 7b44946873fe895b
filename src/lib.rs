//! N-BaIoT Botnet Detector - IoT traffic inference service
//!
//! Classifies IoT network-traffic feature vectors as Attack or Benign
//! using a pre-trained binary classifier behind an HTTP API.
//!
//! # Modules
//!
//! ## Core pipeline
//! - [`features`] - Feature vector/matrix validation and CSV parsing
//! - [`preprocessing`] - Fitted robust scaler applied at inference time
//! - [`model`] - Pre-trained classifier backends (MLP, tree ensemble)
//! - [`inference`] - The validate -> scale -> score -> label pipeline
//!
//! ## Services
//! - [`server`] - HTTP server with the prediction endpoints
//! - [`config`] - Environment-driven service configuration

// Core error handling
pub mod error;

// Core pipeline
pub mod features;
pub mod preprocessing;
pub mod model;
pub mod inference;

// Services
pub mod config;
pub mod server;

pub use error::{DetectorError, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::DetectorConfig;
    pub use crate::error::{DetectorError, Result};
    pub use crate::features::FeatureMatrix;
    pub use crate::inference::{InferenceContext, Prediction};
    pub use crate::model::{
        AttackClassifier, BackendKind, GradientBoostedTrees, MlpConfig, MlpDetector,
        ATTACK_THRESHOLD,
    };
    pub use crate::preprocessing::RobustScaler;
    pub use crate::server::{create_router, AppState};
}
