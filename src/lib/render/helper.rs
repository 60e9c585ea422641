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

use std::fmt;

use super::typedef::*;
use crate::form::typedef::PredictionInput;
use crate::predict::typedef::{FloodRisk, PredictionResult};

pub const RAINFALL_THRESHOLD: f64 = 150.0;
pub const HUMIDITY_THRESHOLD: f64 = 85.0;

pub const RISK_FACTOR_HEADING: &str = "Critical risk factors:";
pub const CHECKLIST_HEADING: &str = "Common fixes:";
pub const CHECKLIST: [&str; 3] = [
	"Verify all inputs are numbers",
	"Check model expects the same features",
	"Ensure preprocessor handles Period as float",
];

fn percent(probability: f64) -> String {
	format!("{:.1}%", probability * 100.0)
}

/// Annotations only make sense for the high-risk branch.
fn risk_factors(input: &PredictionInput) -> Vec<String> {
	let mut factors = Vec::with_capacity(2);

	if input.rainfall > RAINFALL_THRESHOLD {
		factors.push(format!("- Rainfall: {:?}mm (threshold exceeded)", input.rainfall));
	}

	if input.relative_humidity > HUMIDITY_THRESHOLD {
		factors.push(format!(
			"- Humidity: {:?}% (prolonged saturation)",
			input.relative_humidity
		));
	}

	factors
}

pub fn render_failure(message: &str) -> RenderedResult {
	RenderedResult::Error {
		message: format!("Prediction error: {message}"),
		checklist: CHECKLIST.iter().map(|each| each.to_string()).collect(),
	}
}

pub fn render(result: &PredictionResult, input: &PredictionInput) -> RenderedResult {
	match result {
		PredictionResult::Predicted(output) => match output.risk {
			FloodRisk::High => RenderedResult::HighRisk {
				headline: format!(
					"🚨 Flood Risk: HIGH ({} probability)",
					percent(output.probability)
				),
				risk_factors: risk_factors(input),
			},
			FloodRisk::Low => RenderedResult::LowRisk {
				headline: format!(
					"✅ Flood Risk: LOW ({} probability)",
					percent(output.probability)
				),
			},
		},
		PredictionResult::Failed { message } => render_failure(message),
	}
}

impl fmt::Display for RenderedResult {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			RenderedResult::HighRisk {
				headline,
				risk_factors,
			} => {
				writeln!(f, "{headline}")?;
				write!(f, "{RISK_FACTOR_HEADING}")?;
				for each in risk_factors {
					write!(f, "\n{each}")?;
				}
				Ok(())
			}
			RenderedResult::LowRisk { headline } => write!(f, "{headline}"),
			RenderedResult::Error { message, checklist } => {
				writeln!(f, "{message}")?;
				write!(f, "{CHECKLIST_HEADING}")?;
				for (index, each) in checklist.iter().enumerate() {
					write!(f, "\n{}. {}", index + 1, each)?;
				}
				Ok(())
			}
		}
	}
}
