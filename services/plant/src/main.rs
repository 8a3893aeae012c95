use anyhow::Result;
use async_trait::async_trait;
use florascan::{
	load, Architecture, CatalogSource, Classifier, Inference, LoadedModel, ModelSpec, Recipe,
	TopPrediction,
};
use image::DynamicImage;
use serde::Serialize;

/// Fallback catalog for checkpoints predating embedded class names.
const PLANT_CLASSES: [&str; 30] = [
	"aloevera",
	"banana",
	"bilimbi",
	"cantaloupe",
	"cassava",
	"coconut",
	"corn",
	"cucumber",
	"curcuma",
	"eggplant",
	"galangal",
	"ginger",
	"guava",
	"kale",
	"longbeans",
	"mango",
	"melon",
	"orange",
	"paddy",
	"papaya",
	"peper chili",
	"pineapple",
	"pomelo",
	"shallot",
	"soybeans",
	"spinach",
	"sweet potatoes",
	"tobacco",
	"waterapple",
	"watermelon",
];

const SPEC: ModelSpec = ModelSpec {
	architecture: Architecture::ResNet50,
	recipe: Recipe::imagenet_256_crop_224(),
	catalog: CatalogSource::CheckpointOr(&PLANT_CLASSES),
};

#[derive(Debug, Serialize)]
struct Identification {
	success: bool,
	plant_type: String,
	confidence: f64,
	top_predictions: Vec<TopPrediction>,
	total_classes: usize,
}

fn identify(inference: Inference, total_classes: usize) -> Identification {
	Identification {
		success: true,
		confidence: inference.confidence,
		top_predictions: inference.top,
		plant_type: inference.label,
		total_classes,
	}
}

struct PlantModel {
	model: LoadedModel,
}

#[async_trait]
impl Classifier for PlantModel {
	type Response = Identification;

	const NAME: &'static str = "Plant Species Identification";
	const ARTIFACT: &'static str = "weights/plant_classifier.safetensors";
	const ROUTES: &'static [&'static str] = &["/identify-plant", "/plant"];
	const DEBUG_ROUTE: bool = true;

	async fn setup() -> Result<Self> {
		Ok(Self {
			model: load(Self::ARTIFACT, &SPEC)?,
		})
	}

	fn predict(&self, image: DynamicImage) -> Result<Self::Response> {
		let inference = self.model.infer(&image, 3)?;

		Ok(identify(inference, self.model.class_count()))
	}

	fn class_count(&self) -> usize {
		self.model.class_count()
	}
}

florascan::start!(PlantModel);
