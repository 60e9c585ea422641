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

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use strum::IntoEnumIterator;

use super::typedef::*;
use crate::artifact::typedef::Artifacts;
use crate::form::typedef::{Feature, FormState, PredictionInput};
use crate::preprocess::typedef::Record;
use crate::render::helper::{render, render_failure};
use crate::render::typedef::RenderedResult;
use crate::PipelineError;

impl TryFrom<u8> for FloodRisk {
	type Error = PipelineError;

	fn try_from(label: u8) -> Result<Self, Self::Error> {
		match label {
			0 => Ok(FloodRisk::Low),
			1 => Ok(FloodRisk::High),
			unknown => Err(PipelineError::UnknownLabel(unknown)),
		}
	}
}

/// Lays the input out as a single row, columns in fitted order.
pub fn assemble_record(input: &PredictionInput) -> Result<Record, PipelineError> {
	let values = Feature::iter()
		.map(|feature| input.value(feature))
		.collect::<Vec<_>>();

	Record::new(Feature::iter().map(|feature| feature.as_ref().to_string()), values)
}

fn predict(input: &PredictionInput, artifacts: &Artifacts) -> Result<PredictionOutput, PipelineError> {
	let record = assemble_record(input)?;
	tracing::debug!(?record, "assembled prediction record");

	let encoded = artifacts.preprocessor.transform(&record)?;
	let label = artifacts.classifier.predict(&encoded)?;
	let [_, probability] = artifacts.classifier.predict_probability(&encoded)?;

	if !(0.0..=1.0).contains(&probability) {
		return Err(PipelineError::Probability(probability));
	}

	Ok(PredictionOutput {
		risk: FloodRisk::try_from(label)?,
		probability,
	})
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
	if let Some(found) = payload.downcast_ref::<&str>() {
		found.to_string()
	} else if let Some(found) = payload.downcast_ref::<String>() {
		found.clone()
	} else {
		String::from("the model panicked")
	}
}

/// Transforms and classifies one input. Nothing escapes: errors and panics
/// from either artifact come back as [`PredictionResult::Failed`].
pub fn run_prediction(input: &PredictionInput, artifacts: &Artifacts) -> PredictionResult {
	let outcome = panic::catch_unwind(AssertUnwindSafe(|| predict(input, artifacts)));

	let result = match outcome {
		Ok(Ok(output)) => PredictionResult::Predicted(output),
		Ok(Err(err)) => PredictionResult::Failed {
			message: err.to_string(),
		},
		Err(payload) => PredictionResult::Failed {
			message: panic_message(payload),
		},
	};

	match &result {
		PredictionResult::Predicted(output) => tracing::info!(
			risk = ?output.risk,
			probability = output.probability,
			"prediction completed"
		),
		PredictionResult::Failed { message } => {
			tracing::warn!(error = %message, "prediction failed")
		}
	}

	result
}

/// One request/response cycle for an already assembled input.
pub fn handle_submit(input: &PredictionInput, artifacts: &Artifacts) -> RenderedResult {
	let result = run_prediction(input, artifacts);
	render(&result, input)
}

/// Same as [`handle_submit`], starting from the raw form state.
pub fn handle_form(form: &FormState, artifacts: &Artifacts) -> RenderedResult {
	match form.to_input() {
		Ok(input) => handle_submit(&input, artifacts),
		Err(err) => {
			tracing::warn!(error = %err, "form could not be read");
			render_failure(&err.to_string())
		}
	}
}

#[cfg(test)]
mod tests {
	use std::sync::{Arc, Mutex};

	use burn::backend::{ndarray::NdArrayDevice, NdArray};

	use super::*;
	use crate::model::typedef::{Classifier, FloodClassifier, FloodNetworkConfig};
	use crate::preprocess::typedef::{StandardScaler, Transformer};

	struct RecordingTransformer {
		seen: Arc<Mutex<Vec<Record>>>,
	}

	impl Transformer for RecordingTransformer {
		fn transform(&self, record: &Record) -> Result<Record, PipelineError> {
			self.seen.lock().unwrap().push(record.clone());
			Ok(record.clone())
		}
	}

	struct Passthrough;

	impl Transformer for Passthrough {
		fn transform(&self, record: &Record) -> Result<Record, PipelineError> {
			Ok(record.clone())
		}
	}

	struct Fixed {
		label: u8,
		probabilities: [f64; 2],
	}

	impl Classifier for Fixed {
		fn predict(&self, _record: &Record) -> Result<u8, PipelineError> {
			Ok(self.label)
		}

		fn predict_probability(&self, _record: &Record) -> Result<[f64; 2], PipelineError> {
			Ok(self.probabilities)
		}
	}

	struct Exploding;

	impl Classifier for Exploding {
		fn predict(&self, _record: &Record) -> Result<u8, PipelineError> {
			panic!("tensor shape mismatch");
		}

		fn predict_probability(&self, _record: &Record) -> Result<[f64; 2], PipelineError> {
			panic!("tensor shape mismatch");
		}
	}

	fn fixed(label: u8, probabilities: [f64; 2]) -> Box<Fixed> {
		Box::new(Fixed {
			label,
			probabilities,
		})
	}

	fn default_input() -> PredictionInput {
		FormState::default().to_input().unwrap()
	}

	fn fitted_scaler() -> StandardScaler {
		StandardScaler {
			feature_names: Feature::iter().map(|each| each.as_ref().to_string()).collect(),
			mean: vec![0.0; 11],
			scale: vec![1.0; 11],
		}
	}

	#[test]
	fn record_columns_follow_the_fixed_order() {
		let record = assemble_record(&default_input()).unwrap();

		assert_eq!(
			record.columns(),
			[
				"Max_Temp",
				"Min_Temp",
				"Rainfall",
				"Relative_Humidity",
				"Wind_Speed",
				"Cloud_Coverage",
				"Bright_Sunshine",
				"LATITUDE",
				"LONGITUDE",
				"ALT",
				"Period",
			]
		);
		assert_eq!(
			record.values(),
			[30.0, 20.0, 50.0, 70.0, 10.0, 3.0, 6.0, 23.7, 90.4, 10.0, 2023.06]
		);
	}

	#[test]
	fn transformer_receives_the_assembled_record() {
		let seen = Arc::new(Mutex::new(Vec::new()));
		let transformer = RecordingTransformer { seen: seen.clone() };
		let artifacts = Artifacts::new(Box::new(transformer), fixed(0, [0.9, 0.1]));
		let input = default_input();

		run_prediction(&input, &artifacts);

		assert_eq!(*seen.lock().unwrap(), [assemble_record(&input).unwrap()]);
	}

	#[test]
	fn probability_is_taken_from_the_positive_class() {
		let artifacts = Artifacts::new(Box::new(Passthrough), fixed(1, [0.3, 0.7]));

		let result = run_prediction(&default_input(), &artifacts);

		assert_eq!(
			result,
			PredictionResult::Predicted(PredictionOutput {
				risk: FloodRisk::High,
				probability: 0.7,
			})
		);
	}

	#[test]
	fn unknown_label_fails() {
		let artifacts = Artifacts::new(Box::new(Passthrough), fixed(3, [0.5, 0.5]));

		let result = run_prediction(&default_input(), &artifacts);

		assert_eq!(
			result,
			PredictionResult::Failed {
				message: String::from("Model returned an unknown label 3"),
			}
		);
	}

	#[test]
	fn out_of_range_probability_fails() {
		let artifacts = Artifacts::new(Box::new(Passthrough), fixed(1, [-0.2, 1.2]));

		let result = run_prediction(&default_input(), &artifacts);

		assert!(matches!(result, PredictionResult::Failed { .. }));
	}

	#[test]
	fn panicking_classifier_is_contained() {
		let artifacts = Artifacts::new(Box::new(Passthrough), Box::new(Exploding));

		let result = run_prediction(&default_input(), &artifacts);

		assert_eq!(
			result,
			PredictionResult::Failed {
				message: String::from("tensor shape mismatch"),
			}
		);
	}

	#[test]
	fn failed_transform_renders_checklist_and_next_submission_still_works() {
		let artifacts = Artifacts::new(Box::new(fitted_scaler()), fixed(0, [0.8, 0.2]));

		let broken = PredictionInput {
			rainfall: f64::NAN,
			..default_input()
		};
		let rendered = handle_submit(&broken, &artifacts);
		match &rendered {
			RenderedResult::Error { message, checklist } => {
				assert!(message.contains("Rainfall"));
				assert_eq!(checklist.len(), 3);
			}
			others => panic!("expected the error branch, got {others:?}"),
		}

		let rendered = handle_submit(&default_input(), &artifacts);
		assert!(matches!(rendered, RenderedResult::LowRisk { .. }));
	}

	#[test]
	fn empty_form_field_renders_the_error_branch() {
		let artifacts = Artifacts::new(Box::new(Passthrough), fixed(1, [0.1, 0.9]));
		let form = FormState {
			rainfall: None,
			..Default::default()
		};

		let rendered = handle_form(&form, &artifacts);

		assert_eq!(rendered, render_failure("Rainfall is empty"));
	}

	#[test]
	fn burn_network_runs_end_to_end() {
		let config = FloodNetworkConfig::new();
		let network = config.init::<NdArray>(&NdArrayDevice::Cpu);
		let input = default_input();
		let scaler = StandardScaler {
			mean: assemble_record(&input).unwrap().values().to_vec(),
			..fitted_scaler()
		};
		let artifacts = Artifacts::new(
			Box::new(scaler),
			Box::new(FloodClassifier::new(network, &config)),
		);

		let result = run_prediction(&input, &artifacts);

		match result {
			PredictionResult::Predicted(output) => {
				assert!((0.0..=1.0).contains(&output.probability));
			}
			PredictionResult::Failed { message } => panic!("prediction failed: {message}"),
		}
	}
}
