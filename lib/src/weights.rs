use std::collections::HashSet;

use florascan_core::checkpoint::Manifest;
use tch::{nn::VarStore, no_grad, Tensor};

use crate::errors::LoadError;

/// Read the checkpoint's tensors with the schema wrapper stripped.
///
/// # Errors
///
/// Returns an error if the tensor data cannot be read.
pub fn read(manifest: &Manifest) -> Result<Vec<(String, Tensor)>, LoadError> {
	let tensors = Tensor::read_safetensors(&manifest.path)?;

	Ok(tensors
		.into_iter()
		.map(|(name, tensor)| (manifest.schema.strip(&name).to_string(), tensor))
		.collect())
}

/// Copy named tensors into the variables registered in `vs`.
///
/// Every registered variable must be covered by the checkpoint; tensors the
/// architecture does not know are skipped with a warning.
///
/// # Errors
///
/// Returns an error on a missing parameter or a shape mismatch.
pub fn apply(vs: &mut VarStore, tensors: &[(String, Tensor)]) -> Result<(), LoadError> {
	let mut variables = vs.variables();
	let mut covered = HashSet::new();

	no_grad(|| -> Result<(), LoadError> {
		for (name, tensor) in tensors {
			match variables.get_mut(name.as_str()) {
				Some(variable) => {
					variable.f_copy_(tensor)?;
					covered.insert(name.as_str());
				},
				None => tracing::warn!("checkpoint tensor `{name}` has no matching variable"),
			}
		}

		Ok(())
	})?;

	for name in variables.keys() {
		if !covered.contains(name.as_str()) {
			return Err(LoadError::MissingParameter { name: name.clone() });
		}
	}

	Ok(())
}
