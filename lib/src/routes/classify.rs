use axum::{extract::Multipart, Extension, Json};
use serde_json::{json, Value};

use crate::runner::Runner;

/// Accept a multipart image upload and answer with the model's payload.
///
/// Every failure is reported as `{success: false, error}` with HTTP 200;
/// nothing on this route surfaces as a 500.
pub async fn classify(
	Extension(runner): Extension<Runner>,
	mut multipart: Multipart,
) -> Json<Value> {
	let mut upload = None;

	loop {
		match multipart.next_field().await {
			Ok(Some(field)) => {
				if !matches!(field.name(), Some("image" | "file")) {
					continue;
				}

				if field.file_name().map_or(false, str::is_empty) {
					return failure("No file selected");
				}

				match field.bytes().await {
					Ok(bytes) => {
						upload = Some(bytes);
						break;
					},
					Err(error) => return failure(&format!("Image processing error: {error}")),
				}
			},
			Ok(None) => break,
			Err(error) => return failure(&format!("Image processing error: {error}")),
		}
	}

	let Some(bytes) = upload else {
		return failure("No image uploaded");
	};

	let image = match image::load_from_memory(&bytes) {
		Ok(image) => image,
		Err(error) => return failure(&format!("Image processing error: {error}")),
	};

	match runner.run(image).await {
		Ok(payload) => Json(payload),
		Err(error) => failure(&error.to_string()),
	}
}

fn failure(message: &str) -> Json<Value> {
	Json(json!({ "success": false, "error": message }))
}
