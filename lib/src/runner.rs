use std::sync::{atomic::Ordering, Arc, OnceLock};

use atomic_enum::atomic_enum;
use florascan_core::Classifier;
use image::DynamicImage;
use serde_json::Value;
use tokio::sync::{mpsc, oneshot};

use crate::{helpers::with_timing, shutdown::Shutdown};

/// Lifecycle of the model-owning task.
#[atomic_enum]
#[derive(PartialEq)]
pub enum Health {
	Unknown,
	Starting,
	Ready,
	Busy,
	SetupFailed,
}

pub static RUNNER_HEALTH: AtomicHealth = AtomicHealth::new(Health::Unknown);

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Model not loaded. Please check server logs.")]
	NotLoaded,

	#[error("{0}")]
	Prediction(#[from] anyhow::Error),
}

type ResponseSender = oneshot::Sender<Result<Value, Error>>;

/// Handle to the task that owns the loaded model.
///
/// The model never crosses threads: requests are handed over an mpsc
/// channel and answered over oneshot senders. A failed setup leaves the
/// handle (and the HTTP surface) alive; requests then answer "not loaded".
#[derive(Clone)]
pub struct Runner {
	sender: mpsc::Sender<(ResponseSender, DynamicImage)>,
	service: &'static str,
	artifact: &'static str,
	routes: &'static [&'static str],
	classes: Arc<OnceLock<usize>>,
}

impl Runner {
	pub fn new<T: Classifier + 'static>(shutdown: Shutdown) -> Self {
		RUNNER_HEALTH.swap(Health::Starting, Ordering::SeqCst);

		let (sender, mut rx) = mpsc::channel::<(ResponseSender, DynamicImage)>(1);
		let classes = Arc::new(OnceLock::new());

		let task_classes = Arc::clone(&classes);
		let handle = tokio::spawn(async move {
			let classifier = match T::setup().await {
				Ok(classifier) => classifier,
				Err(error) => {
					tracing::error!("failed to load {}: {error:#}", T::NAME);
					RUNNER_HEALTH.swap(Health::SetupFailed, Ordering::SeqCst);
					return;
				},
			};

			task_classes.set(classifier.class_count()).ok();
			RUNNER_HEALTH.swap(Health::Ready, Ordering::SeqCst);

			while let Some((tx, image)) = rx.recv().await {
				RUNNER_HEALTH.swap(Health::Busy, Ordering::SeqCst);

				let (result, predict_time) = with_timing(|| classifier.predict(image));
				tracing::debug!("prediction finished in {predict_time:?}");

				let payload = result
					.and_then(|response| serde_json::to_value(response).map_err(Into::into))
					.map_err(Error::Prediction);
				tx.send(payload).ok();

				RUNNER_HEALTH.swap(Health::Ready, Ordering::SeqCst);
			}
		});

		tokio::spawn(async move {
			shutdown.handle().await;
			handle.abort();
		});

		Self {
			sender,
			service: T::NAME,
			artifact: T::ARTIFACT,
			routes: T::ROUTES,
			classes,
		}
	}

	/// Run one prediction through the model task.
	///
	/// # Errors
	///
	/// Returns an error if the model is not loaded or the prediction fails.
	pub async fn run(&self, image: DynamicImage) -> Result<Value, Error> {
		if !self.loaded() {
			return Err(Error::NotLoaded);
		}

		let (tx, rx) = oneshot::channel();
		self.sender
			.send((tx, image))
			.await
			.map_err(|_| Error::NotLoaded)?;

		rx.await.map_err(|_| Error::NotLoaded)?
	}

	#[must_use]
	pub fn loaded(&self) -> bool {
		matches!(
			RUNNER_HEALTH.load(Ordering::SeqCst),
			Health::Ready | Health::Busy
		)
	}

	#[must_use]
	pub const fn service(&self) -> &'static str {
		self.service
	}

	#[must_use]
	pub const fn artifact(&self) -> &'static str {
		self.artifact
	}

	#[must_use]
	pub const fn routes(&self) -> &'static [&'static str] {
		self.routes
	}

	#[must_use]
	pub fn class_count(&self) -> usize {
		self.classes.get().copied().unwrap_or(0)
	}

	pub fn extension(self) -> axum::Extension<Self> {
		axum::Extension(self)
	}
}
