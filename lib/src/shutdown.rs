use std::{
	future::Future,
	sync::atomic::{AtomicBool, Ordering},
};

use tokio::{signal, sync::watch};

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[error("shutdown handler already created")]
pub struct AlreadyCreatedError;

static CREATED: AtomicBool = AtomicBool::new(false);

/// Resolves once SIGINT or SIGTERM is received.
#[derive(Debug, Clone)]
pub struct Shutdown {
	receiver: watch::Receiver<bool>,
}

impl Shutdown {
	/// Register the process-wide signal handlers.
	///
	/// # Errors
	///
	/// Returns an error when called more than once per process.
	pub fn new() -> Result<Self, AlreadyCreatedError> {
		if CREATED.swap(true, Ordering::SeqCst) {
			return Err(AlreadyCreatedError);
		}

		let (tx, rx) = watch::channel(false);
		let handle = register_handlers();

		tokio::spawn(async move {
			handle.await;
			tx.send(true).ok();
		});

		Ok(Self { receiver: rx })
	}

	pub fn handle(&self) -> impl Future<Output = ()> {
		let mut receiver = self.receiver.clone();

		async move {
			while !*receiver.borrow() {
				if receiver.changed().await.is_err() {
					break;
				}
			}
		}
	}
}

fn register_handlers() -> impl Future<Output = ()> {
	let ctrl_c = async {
		signal::ctrl_c()
			.await
			.expect("failed to install Ctrl+C handler");
	};

	#[cfg(unix)]
	let terminate = async {
		signal::unix::signal(signal::unix::SignalKind::terminate())
			.expect("failed to install signal handler")
			.recv()
			.await;
	};

	#[cfg(not(unix))]
	let terminate = std::future::pending::<()>();

	async {
		tokio::select! {
			_ = ctrl_c => {},
			_ = terminate => {},
		}

		tracing::info!("received shutdown signal");
	}
}
