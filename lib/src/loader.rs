use std::path::Path;

use florascan_core::{checkpoint::Manifest, LabelCatalog};
use image::DynamicImage;
use tch::{
	nn::{ModuleT, VarStore},
	Device,
};

use crate::{
	arch::Architecture,
	errors::LoadError,
	infer::{self, Inference},
	preprocess::Recipe,
	weights,
};

/// Where a service's label catalog comes from.
#[derive(Debug, Clone, Copy)]
pub enum CatalogSource {
	/// Compiled-in list; checkpoint metadata is ignored.
	Fixed(&'static [&'static str]),
	/// The checkpoint must embed `class_names`.
	Checkpoint,
	/// Prefer embedded `class_names`, fall back to the compiled-in list.
	CheckpointOr(&'static [&'static str]),
}

/// Everything the loader needs to reconstruct one model variant.
#[derive(Debug, Clone, Copy)]
pub struct ModelSpec {
	pub architecture: Architecture,
	pub recipe: Recipe,
	pub catalog: CatalogSource,
}

/// A model pinned to its compute device for the process lifetime.
pub struct LoadedModel {
	module: Box<dyn ModuleT + Send>,
	catalog: LabelCatalog,
	recipe: Recipe,
	device: Device,
	// Weight storage; the module holds views into it.
	_vs: VarStore,
}

/// Load a checkpoint and reconstruct the model it belongs to.
///
/// Runs once per process, at startup. The returned model is frozen (no
/// gradient tracking) and pinned to the accelerator when one is available.
///
/// # Errors
///
/// Returns an error if the checkpoint is missing, empty, malformed, has no
/// recognizable parameter mapping, resolves to no usable catalog, or does
/// not cover the architecture's parameters.
pub fn load(path: impl AsRef<Path>, spec: &ModelSpec) -> Result<LoadedModel, LoadError> {
	let path = path.as_ref();

	let manifest = Manifest::read(path)?;
	tracing::info!(
		"checkpoint {} ({} bytes, {} schema, {} tensors)",
		path.display(),
		manifest.size,
		manifest.schema.name(),
		manifest.keys.len()
	);
	tracing::debug!("checkpoint keys: {:?}", manifest.keys);

	let catalog = resolve_catalog(&manifest, spec.catalog)?;
	let device = Device::cuda_if_available();

	let mut vs = VarStore::new(device);
	let module = spec.architecture.build(&vs.root(), catalog.len() as i64);

	let tensors = weights::read(&manifest)?;
	weights::apply(&mut vs, &tensors)?;
	vs.freeze();

	tracing::info!(
		"{} ready on {} ({} classes)",
		spec.architecture.name(),
		crate::device_name(device),
		catalog.len()
	);

	Ok(LoadedModel {
		module,
		catalog,
		recipe: spec.recipe,
		device,
		_vs: vs,
	})
}

pub(crate) fn resolve_catalog(
	manifest: &Manifest,
	source: CatalogSource,
) -> Result<LabelCatalog, LoadError> {
	match source {
		CatalogSource::Fixed(labels) => Ok(LabelCatalog::from_static(labels)?),
		CatalogSource::Checkpoint => match manifest.class_names.clone() {
			Some(names) => Ok(LabelCatalog::new(names)?),
			None => Err(LoadError::MissingCatalog),
		},
		CatalogSource::CheckpointOr(fallback) => match manifest.class_names.clone() {
			Some(names) => Ok(LabelCatalog::new(names)?),
			None => {
				tracing::warn!(
					"checkpoint embeds no class catalog, using the compiled-in {} classes",
					fallback.len()
				);
				Ok(LabelCatalog::from_static(fallback)?)
			},
		},
	}
}

impl LoadedModel {
	/// Classify an image, returning the primary prediction and the top-k
	/// ranking.
	///
	/// # Errors
	///
	/// Returns an error if preprocessing or the forward pass fails.
	pub fn infer(&self, image: &DynamicImage, k: usize) -> anyhow::Result<Inference> {
		infer::infer(
			self.module.as_ref(),
			self.device,
			&self.recipe,
			&self.catalog,
			image,
			k,
		)
	}

	#[must_use]
	pub fn class_count(&self) -> usize {
		self.catalog.len()
	}

	#[must_use]
	pub const fn catalog(&self) -> &LabelCatalog {
		&self.catalog
	}

	#[must_use]
	pub const fn device(&self) -> Device {
		self.device
	}
}
