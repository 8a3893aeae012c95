use anyhow::Result;
use async_trait::async_trait;
use florascan::{
	load, Architecture, CatalogSource, Classifier, LoadedModel, ModelSpec, Recipe,
};
use image::DynamicImage;
use serde::Serialize;

// The authoritative catalog lives in the checkpoint; there is no
// compiled-in fallback for this variant.
const SPEC: ModelSpec = ModelSpec {
	architecture: Architecture::ResNet18,
	recipe: Recipe::plain_224(),
	catalog: CatalogSource::Checkpoint,
};

#[derive(Debug, Serialize)]
struct FlowerMatch {
	success: bool,
	flower: String,
	confidence: f64,
}

struct FlowerModel {
	model: LoadedModel,
}

#[async_trait]
impl Classifier for FlowerModel {
	type Response = FlowerMatch;

	const NAME: &'static str = "Flower Classification";
	const ARTIFACT: &'static str = "weights/flower_classifier.safetensors";
	const ROUTES: &'static [&'static str] = &["/flower"];

	async fn setup() -> Result<Self> {
		Ok(Self {
			model: load(Self::ARTIFACT, &SPEC)?,
		})
	}

	fn predict(&self, image: DynamicImage) -> Result<Self::Response> {
		let inference = self.model.infer(&image, 3)?;

		Ok(FlowerMatch {
			success: true,
			confidence: inference.confidence,
			flower: inference.label,
		})
	}

	fn class_count(&self) -> usize {
		self.model.class_count()
	}
}

florascan::start!(FlowerModel);
