use axum::{
	routing::{get, post},
	Router,
};
use florascan_core::Classifier;

pub mod classify;
pub mod system;

pub fn handler<T: Classifier>() -> Router {
	let mut router = Router::new()
		.route("/", get(system::root))
		.route("/health", get(system::health));

	if T::DEBUG_ROUTE {
		router = router.route("/debug", get(system::debug));
	}

	for route in T::ROUTES {
		router = router.route(route, post(classify::classify));
	}

	router
}
