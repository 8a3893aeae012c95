use axum::{
	body::Body,
	http::{header, Request, StatusCode},
	Router,
};
use serde_json::Value;
use tower::ServiceExt;

/// Build a multipart/form-data body from (name, filename, bytes) parts.
pub fn multipart_body(boundary: &str, parts: &[(&str, Option<&str>, &[u8])]) -> Vec<u8> {
	let mut body = Vec::new();

	for (name, filename, bytes) in parts {
		body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
		let disposition = filename.map_or_else(
			|| format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n"),
			|filename| {
				format!(
					"Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n\r\n"
				)
			},
		);
		body.extend_from_slice(disposition.as_bytes());
		body.extend_from_slice(bytes);
		body.extend_from_slice(b"\r\n");
	}

	body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());
	body
}

/// POST a multipart body and decode the JSON answer. Asserts HTTP 200.
pub async fn post(app: &Router, route: &str, boundary: &str, body: Vec<u8>) -> Value {
	let response = app
		.clone()
		.oneshot(
			Request::builder()
				.method("POST")
				.uri(route)
				.header(
					header::CONTENT_TYPE,
					format!("multipart/form-data; boundary={boundary}"),
				)
				.body(Body::from(body))
				.unwrap(),
		)
		.await
		.unwrap();

	assert_eq!(response.status(), StatusCode::OK);
	let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
	serde_json::from_slice(&bytes).unwrap()
}

/// GET a route and decode the JSON answer. Asserts HTTP 200.
pub async fn get(app: &Router, route: &str) -> Value {
	let response = app
		.clone()
		.oneshot(Request::builder().uri(route).body(Body::empty()).unwrap())
		.await
		.unwrap();

	assert_eq!(response.status(), StatusCode::OK);
	let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
	serde_json::from_slice(&bytes).unwrap()
}

/// A tiny valid PNG upload.
pub fn png() -> Vec<u8> {
	let image = image::DynamicImage::ImageRgb8(image::ImageBuffer::from_pixel(
		8,
		8,
		image::Rgb([10u8, 200, 30]),
	));

	let mut bytes = std::io::Cursor::new(Vec::new());
	image
		.write_to(&mut bytes, image::ImageOutputFormat::Png)
		.unwrap();

	bytes.into_inner()
}
