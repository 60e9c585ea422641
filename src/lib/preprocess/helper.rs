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

use super::typedef::*;
use crate::PipelineError;

impl Record {
	/// Pairs every column with a value. Both sides must be the same length.
	pub fn new<C, S>(columns: C, values: Vec<f64>) -> Result<Self, PipelineError>
	where
		C: IntoIterator<Item = S>,
		S: Into<String>,
	{
		let columns = columns.into_iter().map(Into::into).collect::<Vec<String>>();

		if columns.len() != values.len() {
			return Err(PipelineError::Shape {
				expected: columns.len(),
				found: values.len(),
			});
		}

		Ok(Self { columns, values })
	}

	pub fn columns(&self) -> &[String] {
		&self.columns
	}

	pub fn values(&self) -> &[f64] {
		&self.values
	}

	pub fn len(&self) -> usize {
		self.values.len()
	}

	pub fn is_empty(&self) -> bool {
		self.values.is_empty()
	}

	pub fn get(&self, column: &str) -> Option<f64> {
		self.columns
			.iter()
			.position(|each| each == column)
			.map(|index| self.values[index])
	}
}

impl StandardScaler {
	/// Checks that the fitted vectors line up. Returns the reason otherwise.
	pub fn validate(&self) -> Result<(), String> {
		let features = self.feature_names.len();
		if features == 0 {
			return Err(String::from("the scaler has no features"));
		}

		if self.mean.len() != features || self.scale.len() != features {
			return Err(format!(
				"{} feature names but {} means and {} scales",
				features,
				self.mean.len(),
				self.scale.len()
			));
		}

		Ok(())
	}
}

impl Transformer for StandardScaler {
	fn transform(&self, record: &Record) -> Result<Record, PipelineError> {
		let missing = self
			.feature_names
			.iter()
			.filter(|each| record.get(each).is_none())
			.cloned()
			.collect::<Vec<_>>();
		if !missing.is_empty() {
			return Err(PipelineError::MissingColumns(missing.join(", ")));
		}

		let unexpected = record
			.columns()
			.iter()
			.filter(|each| !self.feature_names.contains(*each))
			.cloned()
			.collect::<Vec<_>>();
		if !unexpected.is_empty() {
			return Err(PipelineError::UnexpectedColumns(unexpected.join(", ")));
		}

		// Columns are picked by name, so the output always follows the fitted order
		let values = self
			.feature_names
			.iter()
			.zip(self.mean.iter().zip(self.scale.iter()))
			.map(|(name, (mean, scale))| {
				let value = record.get(name).unwrap_or(f64::NAN);
				if !value.is_finite() {
					return Err(PipelineError::NonFinite(name.clone()));
				}

				// Constant features were fitted with a zero scale
				let scale = if *scale == 0.0 { 1.0 } else { *scale };

				Ok((value - mean) / scale)
			})
			.collect::<Result<Vec<_>, _>>()?;

		Record::new(self.feature_names.iter().cloned(), values)
	}
}
