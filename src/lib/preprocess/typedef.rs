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

use serde::{Deserialize, Serialize};

use crate::PipelineError;

/// A single row of named numeric columns.
#[derive(Default, Clone, Debug, PartialEq)]
pub struct Record {
	pub(super) columns: Vec<String>,
	pub(super) values: Vec<f64>,
}

/// Fitted preprocessing step applied before classification.
pub trait Transformer: Send + Sync {
	fn transform(&self, record: &Record) -> Result<Record, PipelineError>;
}

/// Standardisation fitted offline, one entry per feature in fitted order.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct StandardScaler {
	pub feature_names: Vec<String>,
	pub mean: Vec<f64>,
	pub scale: Vec<f64>,
}
