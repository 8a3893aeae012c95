use anyhow::{ensure, Result};
use florascan_core::LabelCatalog;
use image::DynamicImage;
use itertools::Itertools;
use serde::Serialize;
use tch::{nn::ModuleT, no_grad, Device, Kind};

use crate::preprocess::Recipe;

/// One entry of the top-k ranking.
#[derive(Debug, Clone, Serialize)]
pub struct TopPrediction {
	pub class: String,
	pub confidence: f64,
}

/// Primary prediction plus the top-k ranking, confidences in [0, 100].
#[derive(Debug, Clone)]
pub struct Inference {
	pub index: usize,
	pub label: String,
	pub confidence: f64,
	pub top: Vec<TopPrediction>,
}

/// Round to two decimal places, the precision confidences are reported at.
#[must_use]
pub fn round2(value: f64) -> f64 {
	(value * 100.0).round() / 100.0
}

/// Run one image through a model: preprocess, forward in eval mode under
/// no-gradient tracking, softmax, and map the top-k indices to labels.
///
/// # Errors
///
/// Returns an error if the forward pass fails or the probability vector
/// does not line up with the catalog.
pub fn infer(
	module: &dyn ModuleT,
	device: Device,
	recipe: &Recipe,
	catalog: &LabelCatalog,
	image: &DynamicImage,
	k: usize,
) -> Result<Inference> {
	let input = recipe.apply(image).unsqueeze(0).to_device(device);
	let output = no_grad(|| module.forward_t(&input, false));
	let probabilities = output.softmax(-1, Kind::Float).squeeze_dim(0);

	let count = usize::try_from(probabilities.size1()?)?;
	ensure!(
		count == catalog.len(),
		"model outputs {count} classes but the catalog has {}",
		catalog.len()
	);

	let mut probs = vec![0.0f32; count];
	probabilities
		.to_device(Device::Cpu)
		.copy_data(&mut probs, count);

	// Stable sort: equal probabilities keep ascending index order.
	let ranked: Vec<(usize, f32)> = probs
		.iter()
		.copied()
		.enumerate()
		.sorted_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal))
		.collect();

	let top = ranked
		.iter()
		.take(k)
		.map(|&(index, probability)| TopPrediction {
			class: label_at(catalog, index),
			confidence: round2(f64::from(probability) * 100.0),
		})
		.collect();

	let (index, probability) = ranked[0];

	Ok(Inference {
		index,
		label: label_at(catalog, index),
		confidence: round2(f64::from(probability) * 100.0),
		top,
	})
}

fn label_at(catalog: &LabelCatalog, index: usize) -> String {
	catalog.get(index).unwrap_or("Unknown").to_string()
}

#[cfg(test)]
mod tests {
	use tch::{nn, Tensor};

	use super::*;

	const CLASSES: [&str; 4] = [
		"Apple___healthy",
		"Apple___Apple_scab",
		"Tomato___Early_blight",
		"Tomato___healthy",
	];

	fn constant_logits(logits: Vec<f32>) -> impl ModuleT {
		nn::func_t(move |xs, _train| {
			Tensor::from_slice(&logits)
				.unsqueeze(0)
				.expand(&[xs.size()[0], logits.len() as i64], true)
		})
	}

	fn leaf() -> DynamicImage {
		DynamicImage::ImageRgb8(image::ImageBuffer::from_pixel(
			64,
			64,
			image::Rgb([40u8, 160, 60]),
		))
	}

	#[test]
	fn dominant_logit_wins_with_near_total_confidence() {
		let module = constant_logits(vec![10.0, 0.0, 0.0, 0.0]);
		let catalog = LabelCatalog::from_static(&CLASSES).unwrap();

		let inference = infer(
			&module,
			Device::Cpu,
			&Recipe::imagenet_224(),
			&catalog,
			&leaf(),
			3,
		)
		.unwrap();

		assert_eq!(inference.index, 0);
		assert_eq!(inference.label, "Apple___healthy");
		assert!(inference.confidence > 99.8);
		assert!(inference.confidence <= 100.0);
	}

	#[test]
	fn probabilities_sum_to_one() {
		let module = constant_logits(vec![1.5, -0.5, 3.0, 0.0]);
		let catalog = LabelCatalog::from_static(&CLASSES).unwrap();

		let inference = infer(
			&module,
			Device::Cpu,
			&Recipe::plain_224(),
			&catalog,
			&leaf(),
			4,
		)
		.unwrap();

		let total: f64 = inference.top.iter().map(|entry| entry.confidence).sum();
		assert!((total - 100.0).abs() < 0.05, "total was {total}");
	}

	#[test]
	fn top_k_is_sorted_descending_with_stable_ties() {
		// Logits chosen so softmax yields exactly [0.7, 0.2, 0.05, 0.05].
		let logits: Vec<f32> = [0.7f32, 0.2, 0.05, 0.05]
			.iter()
			.map(|p| p.ln())
			.collect();
		let module = constant_logits(logits);
		let catalog = LabelCatalog::from_static(&CLASSES).unwrap();

		let inference = infer(
			&module,
			Device::Cpu,
			&Recipe::plain_224(),
			&catalog,
			&leaf(),
			3,
		)
		.unwrap();

		let confidences: Vec<f64> = inference.top.iter().map(|entry| entry.confidence).collect();
		assert_eq!(confidences, vec![70.0, 20.0, 5.0]);
		assert_eq!(inference.top[0].class, "Apple___healthy");
		assert_eq!(inference.top[1].class, "Apple___Apple_scab");
		// The 5% tie resolves to the lower index.
		assert_eq!(inference.top[2].class, "Tomato___Early_blight");
	}

	#[test]
	fn catalog_length_must_match_the_output_dimension() {
		let module = constant_logits(vec![1.0, 2.0, 3.0, 4.0]);
		let catalog = LabelCatalog::from_static(&["just", "three", "labels"]).unwrap();

		let result = infer(
			&module,
			Device::Cpu,
			&Recipe::plain_224(),
			&catalog,
			&leaf(),
			3,
		);

		assert!(result.is_err());
	}

	#[test]
	fn confidences_round_to_two_decimals() {
		assert!((round2(99.99999) - 100.0).abs() < f64::EPSILON);
		assert!((round2(12.3456) - 12.35).abs() < f64::EPSILON);
		assert!((round2(0.004) - 0.0).abs() < f64::EPSILON);
	}
}
