use std::borrow::Cow;

use anyhow::Result;
use safetensors::{Dtype, View};
use tch::{Device, Kind, Tensor};

/// Owned tensor bytes in the layout safetensors serializes.
pub struct TensorData {
	shape: Vec<usize>,
	data: Vec<u8>,
}

impl TryFrom<&Tensor> for TensorData {
	type Error = anyhow::Error;

	fn try_from(tensor: &Tensor) -> Result<Self> {
		let tensor = tensor.to_device(Device::Cpu).contiguous();
		let shape = tensor
			.size()
			.iter()
			.map(|&dim| usize::try_from(dim))
			.collect::<Result<Vec<_>, _>>()?;

		// Everything florascan serves is f32; half/double inputs are coerced.
		let tensor = match tensor.kind() {
			Kind::Float => tensor,
			_ => tensor.to_kind(Kind::Float),
		};

		let numel = tensor.numel();
		let mut values = vec![0.0f32; numel];
		tensor.copy_data(&mut values, numel);

		let data = values
			.iter()
			.flat_map(|value| value.to_le_bytes())
			.collect();

		Ok(Self { shape, data })
	}
}

impl View for TensorData {
	fn dtype(&self) -> Dtype {
		Dtype::F32
	}

	fn shape(&self) -> &[usize] {
		&self.shape
	}

	fn data(&self) -> Cow<'_, [u8]> {
		Cow::Borrowed(&self.data)
	}

	fn data_len(&self) -> usize {
		self.data.len()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn captures_shape_and_little_endian_bytes() {
		let tensor = Tensor::from_slice(&[1.0f32, 2.0, 3.0, 4.0, 5.0, 6.0]).view([2, 3]);
		let data = TensorData::try_from(&tensor).unwrap();

		assert_eq!(data.shape(), &[2, 3][..]);
		assert_eq!(data.data_len(), 24);
		assert_eq!(&data.data()[..4], &1.0f32.to_le_bytes());
	}

	#[test]
	fn coerces_double_tensors_to_f32() {
		let tensor = Tensor::from_slice(&[1.0f64, 2.0]).view([2]);
		let data = TensorData::try_from(&tensor).unwrap();

		assert_eq!(data.dtype(), Dtype::F32);
		assert_eq!(data.data_len(), 8);
	}
}
