use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use ferroscan::{
    ConfidenceThreshold, Configuration, Error, InferenceClient, ModelId, Prediction,
};
use image::{ImageBuffer, Rgb, RgbImage};
use serde_json::{Value, json};

pub const RED: Rgb<u8> = Rgb([255, 0, 0]);
pub const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
pub const GRAY: Rgb<u8> = Rgb([128, 128, 128]);

pub const TEST_MODEL: &str = "encre-ferrogallique-2-wy9md/5";

pub fn prediction(class: &str, confidence: f64, x: f64, y: f64, width: f64, height: f64) -> Prediction {
    Prediction {
        class_label: class.to_string(),
        confidence,
        center_x: x,
        center_y: y,
        width,
        height,
    }
}

/// The single ink detection used by most scenarios: box (80,90)-(120,110).
pub fn ink_prediction() -> Prediction {
    prediction("ink", 0.9, 100.0, 100.0, 40.0, 20.0)
}

pub fn threshold(value: f64) -> ConfidenceThreshold {
    ConfidenceThreshold::new(value).expect("valid threshold")
}

pub fn configuration(value: f64) -> Configuration {
    Configuration {
        model_id: ModelId::new(TEST_MODEL),
        confidence_threshold: threshold(value),
    }
}

/// Uniform gray canvas.
pub fn gray_image(width: u32, height: u32) -> RgbImage {
    ImageBuffer::from_pixel(width, height, GRAY)
}

/// Encode an image as PNG bytes, as if it had been uploaded.
pub fn png_upload(img: &RgbImage) -> Vec<u8> {
    let mut bytes = Cursor::new(Vec::new());
    img.write_to(&mut bytes, image::ImageFormat::Png)
        .expect("Failed to encode test image");
    bytes.into_inner()
}

/// Detector response in the hosted API's shape, extra fields included.
pub fn response_json(predictions: &[(&str, f64, f64, f64, f64, f64)]) -> Value {
    let items: Vec<Value> = predictions
        .iter()
        .enumerate()
        .map(|(i, (class, confidence, x, y, width, height))| {
            json!({
                "x": x,
                "y": y,
                "width": width,
                "height": height,
                "confidence": confidence,
                "class": class,
                "class_id": 0,
                "detection_id": format!("det-{i}"),
            })
        })
        .collect();

    json!({
        "inference_id": "test",
        "time": 0.05,
        "image": { "width": 200, "height": 200 },
        "predictions": items,
    })
}

/// In-memory detector that records which files it was given.
pub struct MockClient {
    response: Result<Value, String>,
    seen: Mutex<Vec<PathBuf>>,
}

impl MockClient {
    pub fn responding(value: Value) -> Self {
        Self {
            response: Ok(value),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            response: Err(message.to_string()),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn seen_paths(&self) -> Vec<PathBuf> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl InferenceClient for MockClient {
    async fn infer(&self, image: &Path, model: &ModelId) -> Result<Value, Error> {
        assert!(image.exists(), "upload should exist during the call");
        assert_eq!(model.as_str(), TEST_MODEL);
        image::open(image).expect("temporary upload should be a readable image");

        self.seen.lock().unwrap().push(image.to_path_buf());
        self.response.clone().map_err(Error::InferenceCall)
    }
}
