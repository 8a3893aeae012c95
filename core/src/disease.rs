use std::collections::HashMap;

use lazy_static::lazy_static;
use serde::Serialize;

/// Rough impact of a diagnosed condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Severity {
	None,
	Moderate,
	High,
}

/// Descriptive record attached to a disease diagnosis.
#[derive(Debug, Clone, Serialize)]
pub struct DiseaseInfo {
	pub name: String,
	pub severity: Severity,
	pub cause: String,
	pub symptoms: Vec<String>,
	pub treatment: Vec<String>,
	pub urgency: String,
}

fn entry(
	name: &str,
	severity: Severity,
	cause: &str,
	symptoms: &[&str],
	treatment: &[&str],
	urgency: &str,
) -> DiseaseInfo {
	DiseaseInfo {
		name: name.to_string(),
		severity,
		cause: cause.to_string(),
		symptoms: symptoms.iter().map(ToString::to_string).collect(),
		treatment: treatment.iter().map(ToString::to_string).collect(),
		urgency: urgency.to_string(),
	}
}

lazy_static! {
	static ref DISEASE_DB: HashMap<&'static str, DiseaseInfo> = HashMap::from([
		(
			"Apple___Apple_scab",
			entry(
				"Apple Scab",
				Severity::High,
				"Fungal disease caused by Venturia inaequalis",
				&[
					"Dark, scaly lesions on leaves and fruits",
					"Yellowing leaves",
					"Premature leaf drop",
				],
				&[
					"Apply fungicides like sulfur or copper-based sprays",
					"Remove and destroy infected leaves",
					"Practice good sanitation",
				],
				"High - Can significantly reduce yield",
			)
		),
		(
			"Apple___Black_rot",
			entry(
				"Apple Black Rot",
				Severity::Moderate,
				"Fungal disease caused by Botryosphaeria obtusa",
				&[
					"Brown spots on leaves",
					"Fruit rot with concentric rings",
					"Cankers on branches",
				],
				&[
					"Prune infected branches",
					"Apply fungicides",
					"Remove mummified fruits",
				],
				"Moderate - Can spread to fruits",
			)
		),
		(
			"Tomato___Early_blight",
			entry(
				"Tomato Early Blight",
				Severity::Moderate,
				"Fungal disease caused by Alternaria solani",
				&[
					"Concentric rings on leaves",
					"Yellowing lower leaves",
					"Dark lesions on stems",
				],
				&[
					"Apply copper-based fungicides",
					"Remove infected leaves",
					"Improve air circulation",
				],
				"Moderate - Can defoliate plants",
			)
		),
		(
			"Tomato___Late_blight",
			entry(
				"Tomato Late Blight",
				Severity::High,
				"Fungal disease caused by Phytophthora infestans",
				&[
					"Water-soaked lesions on leaves",
					"White mold growth",
					"Rapid plant collapse",
				],
				&[
					"Apply fungicides immediately",
					"Destroy infected plants",
					"Avoid overhead watering",
				],
				"High - Can destroy entire crop quickly",
			)
		),
		(
			"Tomato___healthy",
			entry(
				"Healthy Tomato",
				Severity::None,
				"No disease detected",
				&["Normal green foliage", "Healthy growth", "No visible lesions"],
				&[
					"Continue current care practices",
					"Monitor regularly",
					"Maintain proper watering",
				],
				"None - Plant is healthy",
			)
		),
		(
			"Apple___healthy",
			entry(
				"Healthy Apple",
				Severity::None,
				"No disease detected",
				&[
					"Vibrant green leaves",
					"Strong growth",
					"No spots or discoloration",
				],
				&[
					"Maintain current care routine",
					"Regular monitoring",
					"Proper fertilization",
				],
				"None - Plant is healthy",
			)
		),
	]);
}

/// Whether a label reads as a healthy outcome.
#[must_use]
pub fn is_healthy(label: &str) -> bool {
	label.to_lowercase().contains("healthy")
}

/// Look up the descriptive record for a label.
///
/// Total over arbitrary strings: labels outside the curated table get a
/// generic record templated on whether the label reads as healthy.
#[must_use]
pub fn lookup(label: &str) -> DiseaseInfo {
	if let Some(info) = DISEASE_DB.get(label) {
		return info.clone();
	}

	if is_healthy(label) {
		entry(
			"Healthy Plant",
			Severity::None,
			"No disease detected",
			&["Normal appearance", "Healthy growth pattern"],
			&["Continue current care practices"],
			"None - Plant is healthy",
		)
	} else {
		entry(
			&display_name(label),
			Severity::Moderate,
			"Plant disease detected - consult expert for specific identification",
			&[
				"Abnormal leaf patterns",
				"Discoloration",
				"Possible growth issues",
			],
			&[
				"Isolate affected plant",
				"Consult agricultural expert",
				"Consider general fungicide",
			],
			"Moderate - Professional consultation recommended",
		)
	}
}

/// Turn a `Crop___Condition_name` label into readable words.
fn display_name(label: &str) -> String {
	label.replace("___", " ").replace('_', " ")
}
