use anyhow::Result;
use async_trait::async_trait;
use florascan::{
	disease::{self, DiseaseInfo},
	load, Architecture, CatalogSource, Classifier, Inference, LoadedModel, ModelSpec, Recipe,
};
use image::DynamicImage;
use serde::Serialize;

/// PlantVillage label set, index-aligned with the checkpoint's output layer.
const DISEASE_CLASSES: [&str; 38] = [
	"Apple___Apple_scab",
	"Apple___Black_rot",
	"Apple___Cedar_apple_rust",
	"Apple___healthy",
	"Blueberry___healthy",
	"Cherry_(including_sour)___Powdery_mildew",
	"Cherry_(including_sour)___healthy",
	"Corn_(maize)___Cercospora_leaf_spot Gray_leaf_spot",
	"Corn_(maize)___Common_rust_",
	"Corn_(maize)___Northern_Leaf_Blight",
	"Corn_(maize)___healthy",
	"Grape___Black_rot",
	"Grape___Esca_(Black_Measles)",
	"Grape___Leaf_blight_(Isariopsis_Leaf_Spot)",
	"Grape___healthy",
	"Orange___Haunglongbing_(Citrus_greening)",
	"Peach___Bacterial_spot",
	"Peach___healthy",
	"Pepper,_bell___Bacterial_spot",
	"Pepper,_bell___healthy",
	"Potato___Early_blight",
	"Potato___Late_blight",
	"Potato___healthy",
	"Raspberry___healthy",
	"Soybean___healthy",
	"Squash___Powdery_mildew",
	"Strawberry___Leaf_scorch",
	"Strawberry___healthy",
	"Tomato___Bacterial_spot",
	"Tomato___Early_blight",
	"Tomato___Late_blight",
	"Tomato___Leaf_Mold",
	"Tomato___Septoria_leaf_spot",
	"Tomato___Spider_mites Two-spotted_spider_mite",
	"Tomato___Target_Spot",
	"Tomato___Tomato_Yellow_Leaf_Curl_Virus",
	"Tomato___Tomato_mosaic_virus",
	"Tomato___healthy",
];

const SPEC: ModelSpec = ModelSpec {
	architecture: Architecture::EfficientNetB0,
	recipe: Recipe::imagenet_224(),
	catalog: CatalogSource::Fixed(&DISEASE_CLASSES),
};

#[derive(Debug, Serialize)]
struct Diagnosis {
	success: bool,
	diagnosis: String,
	confidence: f64,
	is_healthy: bool,
	disease_info: DiseaseInfo,
}

fn diagnose(inference: Inference) -> Diagnosis {
	Diagnosis {
		success: true,
		is_healthy: disease::is_healthy(&inference.label),
		disease_info: disease::lookup(&inference.label),
		confidence: inference.confidence,
		diagnosis: inference.label,
	}
}

struct DiseaseModel {
	model: LoadedModel,
}

#[async_trait]
impl Classifier for DiseaseModel {
	type Response = Diagnosis;

	const NAME: &'static str = "Plant Disease Diagnosis";
	const ARTIFACT: &'static str = "weights/plant_disease_38.safetensors";
	const ROUTES: &'static [&'static str] = &["/diagnose", "/disease"];

	async fn setup() -> Result<Self> {
		Ok(Self {
			model: load(Self::ARTIFACT, &SPEC)?,
		})
	}

	fn predict(&self, image: DynamicImage) -> Result<Self::Response> {
		Ok(diagnose(self.model.infer(&image, 3)?))
	}

	fn class_count(&self) -> usize {
		self.model.class_count()
	}
}

florascan::start!(DiseaseModel);
