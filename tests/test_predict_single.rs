//! Integration test: single-prediction endpoint

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use ndarray::{array, Array1, Array2};
use tower::ServiceExt;

use nbiot_detector::config::DetectorConfig;
use nbiot_detector::inference::InferenceContext;
use nbiot_detector::model::{AttackClassifier, MlpConfig, MlpDetector};
use nbiot_detector::preprocessing::RobustScaler;
use nbiot_detector::server::{create_router, AppState};

const INPUT_SIZE: usize = 115;

/// MLP whose logit equals the first scaled feature:
/// h = [relu(x0), relu(-x0)], logit = h0 - h1 = x0.
fn passthrough_mlp(n: usize) -> MlpDetector {
    let config = MlpConfig {
        input_size: n,
        hidden_size_1: 2,
        hidden_size_2: 2,
        output_size: 1,
        dropout_rate: 0.4,
    };
    let mut w1 = Array2::zeros((n, 2));
    w1[[0, 0]] = 1.0;
    w1[[0, 1]] = -1.0;
    let weights = vec![w1, array![[1.0, 0.0], [0.0, 1.0]], array![[1.0], [-1.0]]];
    let biases = vec![Array1::zeros(2), Array1::zeros(2), Array1::zeros(1)];
    MlpDetector::from_parameters(config, weights, biases).unwrap()
}

fn loaded_app() -> axum::Router {
    let config = DetectorConfig::default();
    let scaler =
        RobustScaler::from_parameters(vec![0.0; INPUT_SIZE], vec![1.0; INPUT_SIZE]).unwrap();
    let classifier = AttackClassifier::NeuralNetwork(passthrough_mlp(INPUT_SIZE));
    let context = InferenceContext::new(scaler, classifier).unwrap();
    let state = Arc::new(AppState::with_context(config.clone(), context));
    create_router(state, &config)
}

fn unloaded_app() -> axum::Router {
    let config = DetectorConfig::default();
    let state = Arc::new(AppState::new(config.clone()));
    create_router(state, &config)
}

fn predict_request(features: &serde_json::Value) -> Request<Body> {
    let body = serde_json::json!({ "features": features });
    Request::builder()
        .method("POST")
        .uri("/predict")
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

async fn response_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_predict_single_all_zeros() {
    let app = loaded_app();
    let features = serde_json::json!(vec![0.0; INPUT_SIZE]);
    let response = app.oneshot(predict_request(&features)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = response_json(response).await;
    let label = json["prediction_label"].as_u64().unwrap();
    let probability = json["probability_attack"].as_f64().unwrap();
    assert!(label == 0 || label == 1);
    assert!((0.0..=1.0).contains(&probability));
}

#[tokio::test]
async fn test_predict_single_attack_and_benign() {
    let app = loaded_app();

    let mut attack_features = vec![0.0; INPUT_SIZE];
    attack_features[0] = 5.0;
    let response = app
        .clone()
        .oneshot(predict_request(&serde_json::json!(attack_features)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = response_json(response).await;
    assert_eq!(json["prediction_label"], 1);
    assert_eq!(json["status"], "Attack");
    assert!(json["probability_attack"].as_f64().unwrap() > 0.5);

    let mut benign_features = vec![0.0; INPUT_SIZE];
    benign_features[0] = -5.0;
    let response = app
        .oneshot(predict_request(&serde_json::json!(benign_features)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = response_json(response).await;
    assert_eq!(json["prediction_label"], 0);
    assert_eq!(json["status"], "Benign");
    assert!(json["probability_attack"].as_f64().unwrap() < 0.5);
}

#[tokio::test]
async fn test_predict_single_invalid_feature_count() {
    let app = loaded_app();
    let features = serde_json::json!(vec![0.1; INPUT_SIZE - 1]);
    let response = app.oneshot(predict_request(&features)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = response_json(response).await;
    assert_eq!(json["error"], true);
    let message = json["message"].as_str().unwrap();
    assert!(message.contains("Expected 115"));
    assert!(message.contains("got 114"));
}

#[tokio::test]
async fn test_predict_single_non_numeric_feature() {
    let app = loaded_app();
    // A string where a number is expected fails JSON deserialization at the
    // boundary, before pipeline logic runs.
    let mut features = vec![serde_json::json!(0.1); INPUT_SIZE];
    features[0] = serde_json::json!("not_a_number");
    let response = app
        .oneshot(predict_request(&serde_json::json!(features)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_predict_single_before_load() {
    let app = unloaded_app();
    let features = serde_json::json!(vec![0.0; INPUT_SIZE]);
    let response = app.oneshot(predict_request(&features)).await.unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let json = response_json(response).await;
    assert!(json["message"].as_str().unwrap().contains("not loaded"));
}

#[tokio::test]
async fn test_read_root() {
    let app = loaded_app();
    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = response_json(response).await;
    assert!(json["message"]
        .as_str()
        .unwrap()
        .contains("N-BaIoT Botnet Detector API"));
}

#[tokio::test]
async fn test_health_reports_model() {
    let app = loaded_app();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = response_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["model_loaded"], true);
    assert_eq!(json["model"]["expected_features"], 115);
}

#[tokio::test]
async fn test_health_when_unloaded() {
    let app = unloaded_app();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = response_json(response).await;
    assert_eq!(json["model_loaded"], false);
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let app = loaded_app();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/does-not-exist")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_wrong_method_is_405() {
    let app = loaded_app();
    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/predict")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}
