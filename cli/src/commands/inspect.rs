use std::path::Path;

use anyhow::Result;
use florascan_core::checkpoint::Manifest;
use tch::Tensor;

/// Print a checkpoint's structure: size, schema, tensors and catalog.
pub fn handle(path: &Path) -> Result<()> {
	let manifest = Manifest::read(path)?;

	println!("checkpoint: {}", manifest.path.display());
	println!("size:       {} bytes", manifest.size);
	println!("schema:     {}", manifest.schema.name());
	match &manifest.class_names {
		Some(names) => println!("classes:    {} (embedded)", names.len()),
		None => println!("classes:    none embedded"),
	}

	let tensors = Tensor::read_safetensors(path)?;
	println!("tensors:    {}", tensors.len());
	for (name, tensor) in &tensors {
		println!("  {:60} {:?}", manifest.schema.strip(name), tensor.size());
	}

	Ok(())
}
