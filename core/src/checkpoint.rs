use std::{
	fs,
	path::{Path, PathBuf},
};

use safetensors::SafeTensors;

/// Recognized shapes a checkpoint's parameter mapping can take.
///
/// Historical artifacts wrapped their tensors under a `model_state_dict.` or
/// `state_dict.` prefix; newer ones store bare parameter names. Detection
/// tries the wrappers in that priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schema {
	ModelStateDict,
	StateDict,
	Flat,
}

const WRAPPERS: [Schema; 2] = [Schema::ModelStateDict, Schema::StateDict];

impl Schema {
	/// The tensor-name prefix this schema wraps parameters under.
	#[must_use]
	pub const fn prefix(self) -> Option<&'static str> {
		match self {
			Self::ModelStateDict => Some("model_state_dict."),
			Self::StateDict => Some("state_dict."),
			Self::Flat => None,
		}
	}

	#[must_use]
	pub const fn name(self) -> &'static str {
		match self {
			Self::ModelStateDict => "model_state_dict",
			Self::StateDict => "state_dict",
			Self::Flat => "flat",
		}
	}

	/// Strip this schema's wrapper from a stored tensor name.
	#[must_use]
	pub fn strip<'a>(self, name: &'a str) -> &'a str {
		match self.prefix() {
			Some(prefix) => name.strip_prefix(prefix).unwrap_or(name),
			None => name,
		}
	}
}

#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
	#[error("checkpoint not found at {0}")]
	NotFound(PathBuf),

	#[error("checkpoint at {0} is empty")]
	Empty(PathBuf),

	#[error("malformed checkpoint: {0}")]
	Malformed(String),

	#[error("no recognized parameter mapping in checkpoint (keys: {0:?})")]
	UnknownSchema(Vec<String>),

	#[error("embedded class names are not a JSON string array: {0}")]
	BadCatalog(String),

	#[error(transparent)]
	Io(#[from] std::io::Error),
}

/// Structure of a checkpoint, read without touching tensor data.
#[derive(Debug, Clone)]
pub struct Manifest {
	pub path: PathBuf,
	pub size: u64,
	pub schema: Schema,
	/// Tensor names as stored, wrapper included.
	pub keys: Vec<String>,
	/// Label catalog embedded as `class_names` metadata, if any.
	pub class_names: Option<Vec<String>>,
}

impl Manifest {
	/// Read a checkpoint's header and detect its parameter-mapping schema.
	///
	/// # Errors
	///
	/// Returns an error if the file is missing, empty, not a safetensors
	/// archive, carries no recognizable parameter mapping, or embeds a
	/// `class_names` entry that is not a JSON string array.
	pub fn read(path: &Path) -> Result<Self, ManifestError> {
		let meta =
			fs::metadata(path).map_err(|_| ManifestError::NotFound(path.to_path_buf()))?;
		if meta.len() == 0 {
			return Err(ManifestError::Empty(path.to_path_buf()));
		}

		let buffer = fs::read(path)?;
		let tensors = SafeTensors::deserialize(&buffer)
			.map_err(|error| ManifestError::Malformed(error.to_string()))?;

		let mut keys: Vec<String> = tensors.names().into_iter().cloned().collect();
		keys.sort();
		if keys.is_empty() {
			return Err(ManifestError::Malformed(
				"checkpoint contains no tensors".to_string(),
			));
		}

		let (_, header) = SafeTensors::read_metadata(&buffer)
			.map_err(|error| ManifestError::Malformed(error.to_string()))?;
		let class_names = header
			.metadata()
			.as_ref()
			.and_then(|metadata| metadata.get("class_names"))
			.map(|raw| {
				serde_json::from_str::<Vec<String>>(raw)
					.map_err(|error| ManifestError::BadCatalog(error.to_string()))
			})
			.transpose()?;

		let schema = detect_schema(&keys)?;

		Ok(Self {
			path: path.to_path_buf(),
			size: meta.len(),
			schema,
			keys,
			class_names,
		})
	}
}

/// Pick the parameter-mapping schema for a set of stored tensor names.
///
/// A single unrecognized wrapper (every name sharing one top-level segment
/// at depth >= 3) is a schema error; names like `fc.weight` are always
/// treated as a flat mapping.
///
/// # Errors
///
/// Returns [`ManifestError::UnknownSchema`] with the offending keys.
pub fn detect_schema(keys: &[String]) -> Result<Schema, ManifestError> {
	for schema in WRAPPERS {
		let Some(prefix) = schema.prefix() else {
			continue;
		};

		if keys.iter().any(|key| key.starts_with(prefix)) {
			return Ok(schema);
		}
	}

	let mut tops = keys
		.iter()
		.map(|key| key.split('.').next().unwrap_or(key.as_str()));
	if let Some(first) = tops.next() {
		let shared_wrapper = tops.all(|top| top == first)
			&& keys.iter().all(|key| key.split('.').count() >= 3);

		if shared_wrapper {
			return Err(ManifestError::UnknownSchema(keys.to_vec()));
		}
	}

	Ok(Schema::Flat)
}
