use anyhow::Result;
use async_trait::async_trait;
use image::DynamicImage;
use serde::Serialize;

/// A florascan classification service.
///
/// One implementation per model variant; the serving library owns the
/// lifecycle (load once at startup, answer uploads for the process
/// lifetime).
#[async_trait]
pub trait Classifier: Sized + Send {
	/// JSON payload returned for a successful prediction.
	type Response: Serialize + Send + 'static;

	/// Human-readable service name, reported by `/health`.
	const NAME: &'static str;

	/// Filesystem path of the model checkpoint.
	const ARTIFACT: &'static str;

	/// Upload routes served by this classifier.
	const ROUTES: &'static [&'static str];

	/// Whether to expose the `/debug` diagnostics route.
	const DEBUG_ROUTE: bool = false;

	/// Load the model. Runs exactly once, at process start.
	///
	/// # Errors
	///
	/// Returns an error if the checkpoint cannot be loaded; the HTTP
	/// surface stays up and reports the model as not loaded.
	async fn setup() -> Result<Self>;

	/// Classify a decoded image.
	///
	/// # Errors
	///
	/// Returns an error if preprocessing or the forward pass fails.
	fn predict(&self, image: DynamicImage) -> Result<Self::Response>;

	/// Number of classes the loaded model distinguishes.
	fn class_count(&self) -> usize;
}
