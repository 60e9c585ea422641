/*
 * Flood Sentinel, flood risk estimation with GUI
 * Copyright (C) 2025 Athaariq A. Ramadhani <foss@athaariq.my.id>
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this program.  If not, see <http://www.gnu.org/licenses/>.
 */

use std::sync::{Mutex, PoisonError};

use burn::{
	backend::{ndarray::NdArrayDevice, NdArray},
	nn::{LinearConfig, Relu},
	prelude::*,
	tensor::{activation::softmax, TensorData},
};

use super::typedef::*;
use crate::preprocess::typedef::Record;
use crate::PipelineError;

impl FloodNetworkConfig {
	pub fn init<B: Backend>(&self, device: &B::Device) -> FloodNetwork<B> {
		FloodNetwork {
			hidden: LinearConfig::new(self.input_size, self.hidden_size).init(device),
			activation: Relu::new(),
			output: LinearConfig::new(self.hidden_size, self.num_classes).init(device),
		}
	}
}

impl<B: Backend> FloodNetwork<B> {
	/// Maps `[batch, features]` to `[batch, classes]` logits.
	pub fn forward(&self, input: Tensor<B, 2>) -> Tensor<B, 2> {
		let x = self.hidden.forward(input);
		let x = self.activation.forward(x);

		self.output.forward(x)
	}

	/// Weights recorded for a different architecture still load, so compare
	/// every layer against `config`.
	pub fn check_shapes(&self, config: &FloodNetworkConfig) -> Result<(), String> {
		let layers = [
			(
				"hidden",
				&self.hidden,
				[config.input_size, config.hidden_size],
			),
			(
				"output",
				&self.output,
				[config.hidden_size, config.num_classes],
			),
		];

		for (name, layer, expected) in layers {
			let found = layer.weight.val().dims();
			if found != expected {
				return Err(format!(
					"{name} layer weights are {found:?}, expected {expected:?}"
				));
			}

			if let Some(bias) = &layer.bias {
				let found = bias.val().dims();
				if found != [expected[1]] {
					return Err(format!(
						"{name} layer bias is {found:?}, expected [{}]",
						expected[1]
					));
				}
			}
		}

		Ok(())
	}
}

impl FloodClassifier {
	pub fn new(network: FloodNetwork<NdArray>, config: &FloodNetworkConfig) -> Self {
		Self {
			network: Mutex::new(network),
			input_size: config.input_size,
			device: NdArrayDevice::Cpu,
		}
	}
}

impl Classifier for FloodClassifier {
	fn predict(&self, record: &Record) -> Result<u8, PipelineError> {
		let [p0, p1] = self.predict_probability(record)?;

		// Ties go to the first class
		Ok(if p1 > p0 { 1 } else { 0 })
	}

	fn predict_probability(&self, record: &Record) -> Result<[f64; 2], PipelineError> {
		if record.len() != self.input_size {
			return Err(PipelineError::Shape {
				expected: self.input_size,
				found: record.len(),
			});
		}

		let values = record
			.values()
			.iter()
			.map(|each| *each as f32)
			.collect::<Vec<_>>();
		let input = Tensor::<NdArray, 2>::from_data(
			TensorData::new(values, [1, self.input_size]),
			&self.device,
		);

		let logits = {
			// A panic in forward leaves the weights untouched, the lock stays usable
			let guarded_network = self
				.network
				.lock()
				.unwrap_or_else(PoisonError::into_inner);

			guarded_network.forward(input)
		};

		let probabilities = softmax(logits, 1).into_data();
		let probabilities = probabilities.iter::<f64>().collect::<Vec<_>>();

		match probabilities.as_slice() {
			[p0, p1] => Ok([*p0, *p1]),
			others => Err(PipelineError::Inference(format!(
				"expected 2 class probabilities, got {}",
				others.len()
			))),
		}
	}
}

#[cfg(test)]
mod tests {
	use std::panic::{self, AssertUnwindSafe};

	use super::*;

	fn classifier(config: &FloodNetworkConfig) -> FloodClassifier {
		let network = config.init::<NdArray>(&NdArrayDevice::Cpu);
		FloodClassifier::new(network, config)
	}

	fn record(size: usize) -> Record {
		Record::new(
			(0..size).map(|index| format!("x{index}")),
			(0..size).map(|index| index as f64 * 0.1 - 0.5).collect(),
		)
		.unwrap()
	}

	#[test]
	fn probabilities_form_a_distribution() {
		let config = FloodNetworkConfig::new();
		let model = classifier(&config);

		let [p0, p1] = model.predict_probability(&record(11)).unwrap();

		assert!((0.0..=1.0).contains(&p0));
		assert!((0.0..=1.0).contains(&p1));
		assert!((p0 + p1 - 1.0).abs() < 1e-5);
	}

	#[test]
	fn label_follows_the_larger_probability() {
		let config = FloodNetworkConfig::new();
		let model = classifier(&config);
		let row = record(11);

		let [p0, p1] = model.predict_probability(&row).unwrap();
		let label = model.predict(&row).unwrap();

		assert_eq!(label, if p1 > p0 { 1 } else { 0 });
	}

	#[test]
	fn rejects_wrong_feature_count() {
		let config = FloodNetworkConfig::new();
		let model = classifier(&config);

		let err = model.predict(&record(4)).unwrap_err();

		assert!(matches!(
			err,
			PipelineError::Shape {
				expected: 11,
				found: 4
			}
		));
	}

	#[test]
	fn check_shapes_flags_foreign_weights() {
		let config = FloodNetworkConfig::new();
		let foreign = config
			.clone()
			.with_input_size(7)
			.init::<NdArray>(&NdArrayDevice::Cpu);

		assert!(config.init::<NdArray>(&NdArrayDevice::Cpu).check_shapes(&config).is_ok());

		let err = foreign.check_shapes(&config).unwrap_err();
		assert_eq!(err, "hidden layer weights are [7, 32], expected [11, 32]");
	}

	#[test]
	fn panicking_forward_does_not_lock_out_later_calls() {
		let config = FloodNetworkConfig::new();
		let foreign = config
			.clone()
			.with_input_size(7)
			.init::<NdArray>(&NdArrayDevice::Cpu);
		let model = FloodClassifier::new(foreign, &config);
		let row = record(11);

		for _ in 0..2 {
			let outcome = panic::catch_unwind(AssertUnwindSafe(|| model.predict(&row)));

			// Every call must reach the network again instead of reporting a poisoned lock
			assert!(outcome.is_err());
		}
	}

	#[test]
	fn config_defaults_match_the_feature_schema() {
		let config = FloodNetworkConfig::new();

		assert_eq!(config.input_size, 11);
		assert_eq!(config.num_classes, 2);
	}
}
