use image::{imageops::FilterType, DynamicImage};
use tch::Tensor;

/// Per-channel normalization constants of the ImageNet training
/// distribution.
pub const IMAGENET_MEAN: [f32; 3] = [0.485, 0.456, 0.406];
pub const IMAGENET_STD: [f32; 3] = [0.229, 0.224, 0.225];

/// Deterministic image → tensor transform, fixed per model variant.
///
/// A recipe is paired with the checkpoint it was trained against and is
/// never unified across variants; mismatched normalization degrades
/// accuracy without raising an error.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Recipe {
	/// Square side the image is resized to.
	pub resize: u32,
	/// Square side of the center crop applied after resizing, if any.
	pub center_crop: Option<u32>,
	/// Per-channel (mean, std) normalization, if any.
	pub normalize: Option<([f32; 3], [f32; 3])>,
}

impl Recipe {
	/// Resize straight to 224² with ImageNet normalization.
	#[must_use]
	pub const fn imagenet_224() -> Self {
		Self {
			resize: 224,
			center_crop: None,
			normalize: Some((IMAGENET_MEAN, IMAGENET_STD)),
		}
	}

	/// Resize to 256², center-crop to 224², ImageNet normalization.
	#[must_use]
	pub const fn imagenet_256_crop_224() -> Self {
		Self {
			resize: 256,
			center_crop: Some(224),
			normalize: Some((IMAGENET_MEAN, IMAGENET_STD)),
		}
	}

	/// Resize to 224² without normalization.
	#[must_use]
	pub const fn plain_224() -> Self {
		Self {
			resize: 224,
			center_crop: None,
			normalize: None,
		}
	}

	/// Side length of the tensor this recipe produces.
	#[must_use]
	pub const fn side(&self) -> u32 {
		match self.center_crop {
			Some(crop) => crop,
			None => self.resize,
		}
	}

	/// Convert an image to a CHW `f32` tensor.
	///
	/// Any color type is coerced to 3-channel RGB before the transform, so
	/// the output shape is `[3, side, side]` regardless of the input.
	#[must_use]
	pub fn apply(&self, image: &DynamicImage) -> Tensor {
		let rgb = DynamicImage::ImageRgb8(image.to_rgb8());

		let resized = rgb.resize_exact(self.resize, self.resize, FilterType::Triangle);
		let resized = match self.center_crop {
			Some(crop) => {
				let offset = (self.resize - crop) / 2;
				resized.crop_imm(offset, offset, crop, crop)
			},
			None => resized,
		};

		let pixels = resized.to_rgb8();
		let side = self.side() as usize;
		let count = side * side;
		let mut chw = vec![0.0f32; 3 * count];

		for (i, pixel) in pixels.pixels().enumerate() {
			for channel in 0..3 {
				let mut value = f32::from(pixel[channel]) / 255.0;
				if let Some((mean, std)) = self.normalize {
					value = (value - mean[channel]) / std[channel];
				}
				chw[channel * count + i] = value;
			}
		}

		Tensor::from_slice(&chw).view([3, side as i64, side as i64])
	}
}

#[cfg(test)]
mod tests {
	use image::{ImageBuffer, Rgb};

	use super::*;

	fn white_image(width: u32, height: u32) -> DynamicImage {
		DynamicImage::ImageRgb8(ImageBuffer::from_pixel(
			width,
			height,
			Rgb([255u8, 255, 255]),
		))
	}

	#[test]
	fn output_shape_is_fixed_regardless_of_input_size() {
		let recipe = Recipe::imagenet_224();

		for (width, height) in [(640, 480), (50, 50), (1, 1), (3000, 200)] {
			let tensor = recipe.apply(&white_image(width, height));
			assert_eq!(tensor.size(), vec![3, 224, 224]);
		}
	}

	#[test]
	fn center_crop_recipes_come_out_at_the_crop_size() {
		let recipe = Recipe::imagenet_256_crop_224();
		let tensor = recipe.apply(&white_image(600, 400));

		assert_eq!(recipe.side(), 224);
		assert_eq!(tensor.size(), vec![3, 224, 224]);
	}

	#[test]
	fn non_rgb_images_are_coerced() {
		let gray = DynamicImage::ImageLuma8(ImageBuffer::from_pixel(50, 40, image::Luma([128u8])));
		let tensor = Recipe::plain_224().apply(&gray);

		assert_eq!(tensor.size(), vec![3, 224, 224]);
	}

	#[test]
	fn plain_recipes_stay_in_unit_range() {
		let tensor = Recipe::plain_224().apply(&white_image(10, 10));

		let max = tensor.max().double_value(&[]);
		let min = tensor.min().double_value(&[]);
		assert!((max - 1.0).abs() < 1e-6);
		assert!(min >= 0.0);
	}

	#[test]
	fn normalization_uses_the_imagenet_constants() {
		let tensor = Recipe::imagenet_224().apply(&white_image(10, 10));

		// A white pixel normalizes to (1 - mean) / std per channel.
		let red = tensor.double_value(&[0, 0, 0]);
		let expected = f64::from((1.0 - IMAGENET_MEAN[0]) / IMAGENET_STD[0]);
		assert!((red - expected).abs() < 1e-4);
	}
}
