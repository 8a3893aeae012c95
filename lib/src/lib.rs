#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

use std::{env, net::SocketAddr, num::ParseIntError};

use anyhow::Result;
use axum::{extract::DefaultBodyLimit, Router, Server};
use tch::Device;
use tower_http::cors::CorsLayer;
use tracing_subscriber::EnvFilter;

use crate::{runner::Runner, shutdown::Shutdown};

pub use crate::{
	arch::Architecture,
	errors::LoadError,
	infer::{Inference, TopPrediction},
	loader::{load, CatalogSource, LoadedModel, ModelSpec},
	preprocess::Recipe,
};
pub use florascan_core::{checkpoint, disease, labels, Classifier, LabelCatalog};

mod arch;
mod errors;
mod helpers;
mod infer;
mod loader;
mod preprocess;
mod routes;
mod runner;
mod shutdown;
mod weights;

/// Name of the compute target inference runs on.
#[must_use]
pub fn device_name(device: Device) -> &'static str {
	match device {
		Device::Cuda(_) => "cuda",
		_ => "cpu",
	}
}

/// Build the service router without binding a listener.
///
/// Spawns the model-owning task; the model loads in the background while
/// the router is already able to answer requests.
///
/// # Errors
///
/// Returns an error if called more than once per process.
pub fn app<T: Classifier + 'static>() -> Result<Router> {
	let shutdown = Shutdown::new()?;

	Ok(router::<T>(Runner::new::<T>(shutdown)))
}

/// Uploaded photos can be large; the default 2 MB axum limit is not enough.
const MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

fn router<T: Classifier + 'static>(runner: Runner) -> Router {
	routes::handler::<T>()
		.layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
		.layer(CorsLayer::permissive())
		.layer(runner.extension())
}

/// Start the server for the given classifier.
///
/// # Errors
///
/// This function will return an error if the PORT environment variable is
/// set but cannot be parsed, or if the server fails to start.
pub async fn start<T: Classifier + 'static>() -> Result<()> {
	tracing_subscriber::fmt()
		.with_env_filter(
			EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
		)
		.compact()
		.init();

	let shutdown = Shutdown::new()?;
	let runner = Runner::new::<T>(shutdown.clone());

	let addr = SocketAddr::from((
		[0, 0, 0, 0],
		env::var("PORT").map_or(Ok::<u16, ParseIntError>(5000), |p| p.parse())?,
	));

	let app = router::<T>(runner);

	tracing::info!("{} listening on {addr}", T::NAME);
	Server::bind(&addr)
		.serve(app.into_make_service())
		.with_graceful_shutdown(shutdown.handle())
		.await?;

	Ok(())
}

#[macro_export]
macro_rules! start {
	($struct_name:ident) => {
		#[tokio::main]
		async fn main() {
			$crate::start::<$struct_name>().await.unwrap();
		}
	};
}
