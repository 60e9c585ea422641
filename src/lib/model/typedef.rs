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

use std::sync::Mutex;

use burn::{
	backend::{ndarray::NdArrayDevice, NdArray},
	nn::{Linear, Relu},
	prelude::*,
};

use crate::preprocess::typedef::Record;
use crate::PipelineError;

/// Fitted binary classifier. Label 1 means high flood risk.
pub trait Classifier: Send + Sync {
	fn predict(&self, record: &Record) -> Result<u8, PipelineError>;

	/// Per-class probabilities `[p0, p1]`.
	fn predict_probability(&self, record: &Record) -> Result<[f64; 2], PipelineError>;
}

#[derive(Config, Debug)]
pub struct FloodNetworkConfig {
	#[config(default = 11)]
	pub input_size: usize,

	#[config(default = 32)]
	pub hidden_size: usize,

	#[config(default = 2)]
	pub num_classes: usize,
}

#[derive(Module, Debug)]
pub struct FloodNetwork<B: Backend> {
	pub hidden: Linear<B>,
	pub activation: Relu,
	pub output: Linear<B>,
}

/// The trained network pinned to the CPU backend.
pub struct FloodClassifier {
	pub(super) network: Mutex<FloodNetwork<NdArray>>,
	pub(super) input_size: usize,
	pub(super) device: NdArrayDevice,
}
