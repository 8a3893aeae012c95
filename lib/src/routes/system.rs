use std::{fs, path::Path};

use axum::{Extension, Json};
use serde::Serialize;
use serde_json::{json, Value};
use tch::Device;

use crate::runner::Runner;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
	/// "healthy" while the model is loaded, "error" otherwise.
	pub status: &'static str,
	pub model_loaded: bool,
	pub device: &'static str,
	pub num_classes: usize,
	pub model_name: &'static str,
	pub version: &'static str,
}

/// GET /health — load status, compute target and class count.
#[allow(clippy::unused_async)]
pub async fn health(Extension(runner): Extension<Runner>) -> Json<HealthResponse> {
	let loaded = runner.loaded();

	Json(HealthResponse {
		status: if loaded { "healthy" } else { "error" },
		model_loaded: loaded,
		device: crate::device_name(Device::cuda_if_available()),
		num_classes: runner.class_count(),
		model_name: runner.service(),
		version: env!("CARGO_PKG_VERSION"),
	})
}

/// GET /debug — artifact diagnostics for operational debugging.
#[allow(clippy::unused_async)]
pub async fn debug(Extension(runner): Extension<Runner>) -> Json<Value> {
	let artifact = Path::new(runner.artifact());
	let size = fs::metadata(artifact).map_or(0, |meta| meta.len());

	Json(json!({
		"model_loaded": runner.loaded(),
		"model_path": runner.artifact(),
		"model_file_exists": artifact.exists(),
		"model_file_size": size,
		"classes_count": runner.class_count(),
		"device": crate::device_name(Device::cuda_if_available()),
	}))
}

/// GET / — service banner.
#[allow(clippy::unused_async)]
pub async fn root(Extension(runner): Extension<Runner>) -> Json<Value> {
	Json(json!({
		"service": runner.service(),
		"version": env!("CARGO_PKG_VERSION"),
		"model_loaded": runner.loaded(),
		"endpoints": runner.routes(),
	}))
}
