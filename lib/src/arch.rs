use tch::nn::{self, ModuleT};

/// Network architectures the loader can reconstruct.
///
/// Opaque builders over `tch::vision`; the rest of the crate only needs
/// the forward capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Architecture {
	EfficientNetB0,
	ResNet50,
	ResNet18,
}

impl Architecture {
	/// Reconstruct the network under the given variable path.
	#[must_use]
	pub fn build(self, vs: &nn::Path<'_>, classes: i64) -> Box<dyn ModuleT + Send> {
		match self {
			Self::EfficientNetB0 => Box::new(tch::vision::efficientnet::b0(vs, classes)),
			Self::ResNet50 => Box::new(tch::vision::resnet::resnet50(vs, classes)),
			Self::ResNet18 => Box::new(tch::vision::resnet::resnet18(vs, classes)),
		}
	}

	#[must_use]
	pub const fn name(self) -> &'static str {
		match self {
			Self::EfficientNetB0 => "efficientnet-b0",
			Self::ResNet50 => "resnet-50",
			Self::ResNet18 => "resnet-18",
		}
	}
}
