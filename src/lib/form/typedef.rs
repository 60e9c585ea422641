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

use serde::{Deserialize, Serialize, Serializer};
use strum_macros::{AsRefStr, EnumCount, EnumIter};

/// Model features, declared in the exact column order the preprocessor was
/// fitted with.
#[derive(PartialEq, Eq, EnumIter, EnumCount, AsRefStr, Clone, Copy, Debug)]
pub enum Feature {
	#[strum(serialize = "Max_Temp")]
	MaxTemp,
	#[strum(serialize = "Min_Temp")]
	MinTemp,
	#[strum(serialize = "Rainfall")]
	Rainfall,
	#[strum(serialize = "Relative_Humidity")]
	RelativeHumidity,
	#[strum(serialize = "Wind_Speed")]
	WindSpeed,
	#[strum(serialize = "Cloud_Coverage")]
	CloudCoverage,
	#[strum(serialize = "Bright_Sunshine")]
	BrightSunshine,
	#[strum(serialize = "LATITUDE")]
	Latitude,
	#[strum(serialize = "LONGITUDE")]
	Longitude,
	#[strum(serialize = "ALT")]
	Altitude,
	#[strum(serialize = "Period")]
	Period,
}

impl Serialize for Feature {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.serialize_str(self.as_ref())
	}
}

/// A directly entered numeric control. `max` of `None` means unbounded above.
#[derive(Serialize, Clone, Copy, Debug)]
#[serde(rename_all = "camelCase")]
pub struct FieldSpec {
	pub feature: Feature,
	pub label: &'static str,
	pub min: f64,
	pub max: Option<f64>,
	pub default: f64,
}

#[derive(Serialize, Clone, Copy, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SliderSpec {
	pub label: &'static str,
	pub min: i64,
	pub max: i64,
	pub default: i64,
}

#[derive(Serialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct FormSchema {
	pub fields: Vec<FieldSpec>,
	pub year: SliderSpec,
	pub month: SliderSpec,
}

/// Raw state of the form at submit time. Numeric fields are `None` when the
/// user cleared them.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FormState {
	pub max_temp: Option<f64>,
	pub min_temp: Option<f64>,
	pub rainfall: Option<f64>,
	pub relative_humidity: Option<f64>,
	pub wind_speed: Option<f64>,
	pub cloud_coverage: Option<f64>,
	pub bright_sunshine: Option<f64>,
	pub latitude: Option<f64>,
	pub longitude: Option<f64>,
	pub alt: Option<f64>,
	pub year: i64,
	pub month: i64,
}

/// One fully populated, clamped submission.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PredictionInput {
	pub max_temp: f64,
	pub min_temp: f64,
	pub rainfall: f64,
	pub relative_humidity: f64,
	pub wind_speed: f64,
	pub cloud_coverage: f64,
	pub bright_sunshine: f64,
	pub latitude: f64,
	pub longitude: f64,
	pub alt: f64,
	pub period: f64,
}
