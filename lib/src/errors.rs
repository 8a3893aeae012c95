use florascan_core::{checkpoint::ManifestError, labels::CatalogError};

/// Everything that can go wrong between a checkpoint path and a usable
/// model. Fatal for the model, not for the process: the HTTP surface keeps
/// serving and reports the model as not loaded.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
	#[error(transparent)]
	Manifest(#[from] ManifestError),

	#[error("checkpoint does not embed a class catalog and no fallback is compiled in")]
	MissingCatalog,

	#[error(transparent)]
	Catalog(#[from] CatalogError),

	#[error("checkpoint is missing parameter `{name}`")]
	MissingParameter { name: String },

	#[error("failed to apply checkpoint weights: {0}")]
	Weights(#[from] tch::TchError),
}
