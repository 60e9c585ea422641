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

use std::num::ParseFloatError;

#[cfg(feature = "desktop")]
use std::sync::Arc;

/// Per-request failures. These never escape the prediction pipeline, they are
/// rendered as an error message instead.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
	#[error("{0} is empty")]
	EmptyField(String),

	#[error("Columns are missing: {0}")]
	MissingColumns(String),

	#[error("Feature names unseen at fit time: {0}")]
	UnexpectedColumns(String),

	#[error("Input contains a non-finite value in column {0}")]
	NonFinite(String),

	#[error("Expected {expected} features, got {found}")]
	Shape { expected: usize, found: usize },

	#[error("Model returned an unknown label {0}")]
	UnknownLabel(u8),

	#[error("Probability {0} is outside of [0, 1]")]
	Probability(f64),

	/// `derive_period` is public and takes any integers. A month outside 1-12,
	/// such as -5, formats as `2023.-5`, which does not parse. The form clamps
	/// both sliders first, so it never produces this.
	#[error("Period is not numeric: {0}")]
	Period(#[from] ParseFloatError),

	#[error("Inference failed: {0}")]
	Inference(String),
}

#[cfg(feature = "desktop")]
pub(crate) struct AppState {
	pub artifacts: Arc<crate::artifact::typedef::Artifacts>,
}
