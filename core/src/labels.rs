use serde::{Deserialize, Serialize};

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
	#[error("label catalog is empty")]
	Empty,
}

/// Ordered list of class names. Index `i` names output neuron `i` of the
/// model the catalog was trained with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LabelCatalog(Vec<String>);

impl LabelCatalog {
	/// Build a catalog from owned labels.
	///
	/// # Errors
	///
	/// Returns an error if the label list is empty.
	pub fn new(labels: Vec<String>) -> Result<Self, CatalogError> {
		if labels.is_empty() {
			return Err(CatalogError::Empty);
		}

		Ok(Self(labels))
	}

	/// Build a catalog from a compiled-in label list.
	///
	/// # Errors
	///
	/// Returns an error if the label list is empty.
	pub fn from_static(labels: &[&str]) -> Result<Self, CatalogError> {
		Self::new(labels.iter().map(ToString::to_string).collect())
	}

	#[must_use]
	pub fn get(&self, index: usize) -> Option<&str> {
		self.0.get(index).map(String::as_str)
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.0.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = &str> {
		self.0.iter().map(String::as_str)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn indexes_in_order() {
		let catalog =
			LabelCatalog::from_static(&["Apple___healthy", "Tomato___Early_blight"]).unwrap();

		assert_eq!(catalog.len(), 2);
		assert_eq!(catalog.get(0), Some("Apple___healthy"));
		assert_eq!(catalog.get(1), Some("Tomato___Early_blight"));
		assert_eq!(catalog.get(2), None);
	}

	#[test]
	fn rejects_empty_catalogs() {
		assert_eq!(LabelCatalog::new(vec![]), Err(CatalogError::Empty));
		assert_eq!(LabelCatalog::from_static(&[]), Err(CatalogError::Empty));
	}
}
