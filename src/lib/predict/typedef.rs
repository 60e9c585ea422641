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

use serde::Serialize;

#[derive(PartialEq, Eq, Serialize, Clone, Copy, Debug)]
#[serde(rename_all = "lowercase")]
pub enum FloodRisk {
	Low,
	High,
}

#[derive(Serialize, Clone, Copy, Debug, PartialEq)]
pub struct PredictionOutput {
	pub risk: FloodRisk,
	/// Probability of [`FloodRisk::High`], whatever the label is.
	pub probability: f64,
}

/// Outcome of one pipeline run. Failures carry display text only.
#[derive(Clone, Debug, PartialEq)]
pub enum PredictionResult {
	Predicted(PredictionOutput),
	Failed { message: String },
}
