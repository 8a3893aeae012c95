//! Happy-path round trip: multipart upload → runner → JSON payload.

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use axum::Router;
use florascan::{Classifier, TopPrediction};
use image::DynamicImage;
use serde::Serialize;
use serde_json::json;

mod common;

#[derive(Debug, Serialize)]
struct Identification {
	success: bool,
	plant_type: String,
	confidence: f64,
	top_predictions: Vec<TopPrediction>,
	total_classes: usize,
}

struct StubModel;

#[async_trait]
impl Classifier for StubModel {
	type Response = Identification;

	const NAME: &'static str = "Plant Species Identification";
	const ARTIFACT: &'static str = "tests/fixtures/missing.safetensors";
	const ROUTES: &'static [&'static str] = &["/identify-plant", "/plant"];
	const DEBUG_ROUTE: bool = true;

	async fn setup() -> Result<Self> {
		Ok(Self)
	}

	fn predict(&self, image: DynamicImage) -> Result<Self::Response> {
		// Deterministic stand-in for a forward pass.
		assert!(image.width() > 0);

		Ok(Identification {
			success: true,
			plant_type: "aloevera".to_string(),
			confidence: 97.12,
			top_predictions: vec![TopPrediction {
				class: "aloevera".to_string(),
				confidence: 97.12,
			}],
			total_classes: 30,
		})
	}

	fn class_count(&self) -> usize {
		30
	}
}

async fn wait_until_loaded(app: &Router) {
	for _ in 0..100 {
		let health = common::get(app, "/health").await;
		if health["model_loaded"] == json!(true) {
			return;
		}

		tokio::time::sleep(Duration::from_millis(10)).await;
	}

	panic!("model never became ready");
}

#[tokio::test]
async fn serves_predictions_end_to_end() {
	let app = florascan::app::<StubModel>().unwrap();
	wait_until_loaded(&app).await;

	let png = common::png();
	let body = common::multipart_body("boundary", &[("image", Some("plant.png"), &png)]);
	let answer = common::post(&app, "/identify-plant", "boundary", body).await;

	assert_eq!(answer["success"], json!(true));
	assert_eq!(answer["plant_type"], json!("aloevera"));
	assert_eq!(answer["confidence"], json!(97.12));
	assert_eq!(answer["top_predictions"][0]["class"], json!("aloevera"));

	// The `file` field name and the alias route work too.
	let body = common::multipart_body("boundary", &[("file", Some("plant.png"), &png)]);
	let answer = common::post(&app, "/plant", "boundary", body).await;
	assert_eq!(answer["success"], json!(true));

	let health = common::get(&app, "/health").await;
	assert_eq!(health["status"], json!("healthy"));
	assert_eq!(health["num_classes"], json!(30));
	assert_eq!(health["model_name"], json!("Plant Species Identification"));

	let debug = common::get(&app, "/debug").await;
	assert_eq!(debug["model_loaded"], json!(true));
	assert_eq!(debug["model_file_exists"], json!(false));
	assert_eq!(debug["classes_count"], json!(30));

	let root = common::get(&app, "/").await;
	assert_eq!(root["service"], json!("Plant Species Identification"));
	assert!(root["endpoints"]
		.as_array()
		.unwrap()
		.contains(&json!("/identify-plant")));
}
