use std::{collections::HashMap, fs, path::Path};

use anyhow::{bail, Context, Result};
use florascan_core::checkpoint::Manifest;
use tch::Tensor;

use crate::tensors::TensorData;

/// Convert a legacy artifact into a safetensors checkpoint, embedding the
/// class catalog as `class_names` metadata.
pub fn handle(input: &Path, output: &Path, labels: Option<&Path>) -> Result<()> {
	let tensors = read_legacy(input)?;
	if tensors.is_empty() {
		bail!("{} contains no tensors", input.display());
	}

	let class_names = match labels {
		Some(path) => Some(read_labels(path)?),
		None => carried_class_names(input)?,
	};

	let metadata = class_names.as_ref().map(|names| {
		Ok::<_, anyhow::Error>(HashMap::from([(
			"class_names".to_string(),
			serde_json::to_string(names)?,
		)]))
	});
	let metadata = metadata.transpose()?;

	let views = tensors
		.iter()
		.map(|(name, tensor)| Ok((name.clone(), TensorData::try_from(tensor)?)))
		.collect::<Result<Vec<_>>>()?;

	safetensors::serialize_to_file(views, &metadata, output)
		.with_context(|| format!("failed to write {}", output.display()))?;

	println!(
		"wrote {} ({} tensors{})",
		output.display(),
		tensors.len(),
		class_names.map_or_else(String::new, |names| format!(", {} classes", names.len())),
	);

	Ok(())
}

fn read_legacy(path: &Path) -> Result<Vec<(String, Tensor)>> {
	let extension = path
		.extension()
		.and_then(|ext| ext.to_str())
		.unwrap_or_default();

	match extension {
		"safetensors" => Ok(Tensor::read_safetensors(path)?),
		"npz" => Ok(Tensor::read_npz(path)?),
		"ot" | "bin" => Ok(Tensor::load_multi(path)?),
		"pt" => {
			// TorchScript modules carry their parameters by name.
			let module = tch::CModule::load(path)
				.with_context(|| format!("failed to load TorchScript module {}", path.display()))?;

			Ok(module.named_parameters()?)
		},
		other => bail!("unsupported checkpoint format `{other}`"),
	}
}

fn read_labels(path: &Path) -> Result<Vec<String>> {
	let raw = fs::read_to_string(path)?;

	serde_json::from_str(&raw)
		.with_context(|| format!("{} is not a JSON string array", path.display()))
}

fn carried_class_names(input: &Path) -> Result<Option<Vec<String>>> {
	if input.extension().and_then(|ext| ext.to_str()) != Some("safetensors") {
		return Ok(None);
	}

	Ok(Manifest::read(input)?.class_names)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn converts_npz_archives_and_embeds_labels() {
		let dir = tempfile::tempdir().unwrap();
		let input = dir.path().join("legacy.npz");
		let output = dir.path().join("model.safetensors");
		let labels = dir.path().join("labels.json");

		let weight = Tensor::from_slice(&[1.0f32, 2.0, 3.0, 4.0]).view([2, 2]);
		let bias = Tensor::from_slice(&[0.5f32, -0.5]).view([2]);
		Tensor::write_npz(&[("fc.weight", &weight), ("fc.bias", &bias)], &input).unwrap();

		fs::write(&labels, r#"["daisy","rose"]"#).unwrap();

		handle(&input, &output, Some(&labels)).unwrap();

		let manifest = Manifest::read(&output).unwrap();
		assert_eq!(manifest.schema.name(), "flat");
		assert_eq!(
			manifest.keys,
			vec!["fc.bias".to_string(), "fc.weight".to_string()]
		);
		assert_eq!(
			manifest.class_names,
			Some(vec!["daisy".to_string(), "rose".to_string()])
		);

		let tensors = Tensor::read_safetensors(&output).unwrap();
		let (_, restored) = tensors
			.iter()
			.find(|(name, _)| name == "fc.weight")
			.unwrap();
		assert_eq!(restored.size(), vec![2, 2]);
		assert!((restored.double_value(&[1, 1]) - 4.0).abs() < 1e-6);
	}

	#[test]
	fn rejects_unknown_formats() {
		let dir = tempfile::tempdir().unwrap();
		let input = dir.path().join("model.pkl");
		fs::write(&input, b"pickle").unwrap();

		assert!(handle(&input, &dir.path().join("out.safetensors"), None).is_err());
	}
}
