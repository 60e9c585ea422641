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

pub static FIELD_SPECS: [FieldSpec; 10] = [
	FieldSpec {
		feature: Feature::MaxTemp,
		label: "Max Temp (°C)",
		min: 0.0,
		max: Some(50.0),
		default: 30.0,
	},
	FieldSpec {
		feature: Feature::MinTemp,
		label: "Min Temp (°C)",
		min: 0.0,
		max: Some(40.0),
		default: 20.0,
	},
	FieldSpec {
		feature: Feature::Rainfall,
		label: "Rainfall (mm)",
		min: 0.0,
		max: Some(1000.0),
		default: 50.0,
	},
	FieldSpec {
		feature: Feature::RelativeHumidity,
		label: "Humidity (%)",
		min: 0.0,
		max: Some(100.0),
		default: 70.0,
	},
	FieldSpec {
		feature: Feature::WindSpeed,
		label: "Wind Speed (km/h)",
		min: 0.0,
		max: None,
		default: 10.0,
	},
	FieldSpec {
		feature: Feature::CloudCoverage,
		label: "Cloud Coverage (oktas)",
		min: 0.0,
		max: Some(8.0),
		default: 3.0,
	},
	FieldSpec {
		feature: Feature::BrightSunshine,
		label: "Sunshine (hours)",
		min: 0.0,
		max: Some(12.0),
		default: 6.0,
	},
	FieldSpec {
		feature: Feature::Latitude,
		label: "Latitude",
		min: -90.0,
		max: Some(90.0),
		default: 23.7,
	},
	FieldSpec {
		feature: Feature::Longitude,
		label: "Longitude",
		min: -180.0,
		max: Some(180.0),
		default: 90.4,
	},
	FieldSpec {
		feature: Feature::Altitude,
		label: "Altitude (m)",
		min: 0.0,
		max: None,
		default: 10.0,
	},
];

pub const YEAR_SLIDER: SliderSpec = SliderSpec {
	label: "Year",
	min: 1949,
	max: 2023,
	default: 2023,
};

pub const MONTH_SLIDER: SliderSpec = SliderSpec {
	label: "Month",
	min: 1,
	max: 12,
	default: 6,
};

impl Feature {
	/// Bounds of a directly entered feature. `Period` is derived, so it has none.
	pub fn spec(self) -> Option<&'static FieldSpec> {
		FIELD_SPECS.iter().find(|each| each.feature == self)
	}
}

impl FieldSpec {
	/// NaN is left alone so the preprocessor can reject it.
	pub fn clamp(&self, value: f64) -> f64 {
		if value.is_nan() {
			return value;
		}

		let lower_bounded = value.max(self.min);
		match self.max {
			Some(max) => lower_bounded.min(max),
			None => lower_bounded,
		}
	}
}

impl SliderSpec {
	pub fn clamp(&self, value: i64) -> i64 {
		value.clamp(self.min, self.max)
	}
}

impl Default for FormSchema {
	fn default() -> Self {
		Self {
			fields: FIELD_SPECS.to_vec(),
			year: YEAR_SLIDER,
			month: MONTH_SLIDER,
		}
	}
}

impl Default for FormState {
	fn default() -> Self {
		let default_of = |feature: Feature| feature.spec().map(|found| found.default);

		Self {
			max_temp: default_of(Feature::MaxTemp),
			min_temp: default_of(Feature::MinTemp),
			rainfall: default_of(Feature::Rainfall),
			relative_humidity: default_of(Feature::RelativeHumidity),
			wind_speed: default_of(Feature::WindSpeed),
			cloud_coverage: default_of(Feature::CloudCoverage),
			bright_sunshine: default_of(Feature::BrightSunshine),
			latitude: default_of(Feature::Latitude),
			longitude: default_of(Feature::Longitude),
			alt: default_of(Feature::Altitude),
			year: YEAR_SLIDER.default,
			month: MONTH_SLIDER.default,
		}
	}
}

/// Combines Year and Month into `YYYY.MM`. The month is zero-padded before
/// parsing, so June becomes 2023.06 and never 2023.6. Slider-bounded input
/// always parses; a negative month does not.
pub fn derive_period(year: i64, month: i64) -> Result<f64, std::num::ParseFloatError> {
	format!("{year}.{month:02}").parse::<f64>()
}

impl FormState {
	/// Reads every field at once, clamping each to its declared bounds.
	pub fn to_input(&self) -> Result<PredictionInput, PipelineError> {
		let read = |feature: Feature, raw: Option<f64>| -> Result<f64, PipelineError> {
			let value = raw.ok_or_else(|| PipelineError::EmptyField(feature.as_ref().to_string()))?;

			Ok(match feature.spec() {
				Some(spec) => spec.clamp(value),
				None => value,
			})
		};

		let year = YEAR_SLIDER.clamp(self.year);
		let month = MONTH_SLIDER.clamp(self.month);

		Ok(PredictionInput {
			max_temp: read(Feature::MaxTemp, self.max_temp)?,
			min_temp: read(Feature::MinTemp, self.min_temp)?,
			rainfall: read(Feature::Rainfall, self.rainfall)?,
			relative_humidity: read(Feature::RelativeHumidity, self.relative_humidity)?,
			wind_speed: read(Feature::WindSpeed, self.wind_speed)?,
			cloud_coverage: read(Feature::CloudCoverage, self.cloud_coverage)?,
			bright_sunshine: read(Feature::BrightSunshine, self.bright_sunshine)?,
			latitude: read(Feature::Latitude, self.latitude)?,
			longitude: read(Feature::Longitude, self.longitude)?,
			alt: read(Feature::Altitude, self.alt)?,
			period: derive_period(year, month)?,
		})
	}
}

impl PredictionInput {
	pub fn value(&self, feature: Feature) -> f64 {
		match feature {
			Feature::MaxTemp => self.max_temp,
			Feature::MinTemp => self.min_temp,
			Feature::Rainfall => self.rainfall,
			Feature::RelativeHumidity => self.relative_humidity,
			Feature::WindSpeed => self.wind_speed,
			Feature::CloudCoverage => self.cloud_coverage,
			Feature::BrightSunshine => self.bright_sunshine,
			Feature::Latitude => self.latitude,
			Feature::Longitude => self.longitude,
			Feature::Altitude => self.alt,
			Feature::Period => self.period,
		}
	}
}
