//! Validation of detector responses at the deserialization boundary.

mod common;

use std::time::Duration;

use ferroscan::{InferenceClient, InferenceResponse, RoboflowClient};
use serde_json::json;

use common::*;

fn malformed_message(value: serde_json::Value) -> String {
    match InferenceResponse::from_json(value) {
        Err(Error::MalformedPrediction(message)) => message,
        other => panic!("expected MalformedPrediction, got {other:?}"),
    }
}

#[test]
fn parses_hosted_api_response() -> anyhow::Result<()> {
    let raw = response_json(&[
        ("ink", 0.9, 100.0, 100.0, 40.0, 20.0),
        ("ink", 0.25, 10.0, 12.0, 6.0, 8.0),
    ]);
    let response = InferenceResponse::from_json(raw.clone())?;

    assert_eq!(response.raw, raw);
    assert_eq!(response.predictions, vec![
        ink_prediction(),
        prediction("ink", 0.25, 10.0, 12.0, 6.0, 8.0),
    ]);
    Ok(())
}

#[test]
fn integer_coordinates_are_accepted() -> anyhow::Result<()> {
    let raw = json!({
        "predictions": [
            { "class": "ink", "confidence": 1, "x": 100, "y": 100, "width": 40, "height": 20 }
        ]
    });
    let response = InferenceResponse::from_json(raw)?;
    assert_eq!(response.predictions[0].confidence, 1.0);
    assert_eq!(response.predictions[0].bbox().x1, 80);
    Ok(())
}

#[test]
fn empty_prediction_list_is_valid() -> anyhow::Result<()> {
    let response = InferenceResponse::from_json(json!({ "predictions": [] }))?;
    assert!(response.predictions.is_empty());
    Ok(())
}

#[test]
fn missing_confidence_rejects_response() {
    let raw = json!({
        "predictions": [
            { "class": "ink", "x": 100.0, "y": 100.0, "width": 40.0, "height": 20.0 }
        ]
    });
    let message = malformed_message(raw);
    assert!(message.contains("prediction #1"), "{message}");
    assert!(message.contains("confidence"), "{message}");
}

#[test]
fn one_bad_entry_rejects_all() {
    let mut raw = response_json(&[("ink", 0.9, 100.0, 100.0, 40.0, 20.0)]);
    raw["predictions"]
        .as_array_mut()
        .unwrap()
        .push(json!({ "class": 3, "confidence": 0.5, "x": 1, "y": 1, "width": 1, "height": 1 }));

    let message = malformed_message(raw);
    assert!(message.contains("prediction #2"), "{message}");
}

#[test]
fn wrong_shapes_are_malformed() {
    assert!(malformed_message(json!({ "time": 0.1 })).contains("predictions"));
    assert!(malformed_message(json!({ "predictions": {} })).contains("not a list"));
    malformed_message(json!({
        "predictions": [{ "class": "ink", "confidence": "high", "x": 1, "y": 1, "width": 1, "height": 1 }]
    }));
}

#[test]
fn out_of_range_values_are_malformed() {
    let bad_confidence = response_json(&[("ink", 1.5, 10.0, 10.0, 4.0, 4.0)]);
    assert!(malformed_message(bad_confidence).contains("confidence"));

    let zero_width = response_json(&[("ink", 0.5, 10.0, 10.0, 0.0, 4.0)]);
    assert!(malformed_message(zero_width).contains("size"));

    let negative_height = response_json(&[("ink", 0.5, 10.0, 10.0, 4.0, -2.0)]);
    assert!(malformed_message(negative_height).contains("size"));
}

#[test]
fn coordinates_beyond_pixel_range_are_malformed() {
    let far_off = response_json(&[("ink", 0.9, 100.0, -3.0e9, 40.0, 20.0)]);
    assert!(malformed_message(far_off).contains("out of pixel range"));

    let huge = response_json(&[("ink", 0.9, 0.0, 10.0, 1.0e10, 20.0)]);
    assert!(malformed_message(huge).contains("prediction #1"));
}

#[test]
fn endpoint_joins_base_url_and_model() -> anyhow::Result<()> {
    let client = RoboflowClient::new("https://serverless.roboflow.com/", "secret", Duration::from_secs(5))?;
    let endpoint = client.endpoint(&ModelId::new(TEST_MODEL));
    assert_eq!(endpoint, "https://serverless.roboflow.com/encre-ferrogallique-2-wy9md/5");
    assert!(!endpoint.contains("secret"));
    Ok(())
}

#[tokio::test]
async fn unreachable_service_is_an_inference_error() -> anyhow::Result<()> {
    let upload = tempfile::Builder::new().suffix(".png").tempfile()?;
    gray_image(8, 8).save_with_format(upload.path(), image::ImageFormat::Png)?;

    let client = RoboflowClient::new("http://127.0.0.1:1", "secret", Duration::from_secs(5))?;
    let err = client
        .infer(upload.path(), &ModelId::new(TEST_MODEL))
        .await
        .expect_err("nothing listens on port 1");

    assert!(matches!(err, Error::InferenceCall(_)), "{err:?}");
    assert!(!err.to_string().contains("secret"));
    Ok(())
}
