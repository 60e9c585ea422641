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

use std::{
	fs::File,
	io::{BufReader, ErrorKind},
	path::{Path, PathBuf},
	sync::{Arc, Mutex, OnceLock, PoisonError},
};

use burn::{
	backend::{ndarray::NdArrayDevice, NdArray},
	prelude::*,
	record::CompactRecorder,
};

use super::typedef::*;
use crate::model::typedef::{Classifier, FloodClassifier, FloodNetworkConfig};
use crate::preprocess::typedef::{StandardScaler, Transformer};

static ARTIFACTS: ArtifactCache = ArtifactCache::new();

impl Default for ArtifactConfig {
	fn default() -> Self {
		Self::in_directory(".")
	}
}

impl ArtifactConfig {
	pub fn in_directory<P: Into<PathBuf>>(directory: P) -> Self {
		Self {
			directory: directory.into(),
			preprocessor_file: String::from("preprocessor.json"),
			network_config_file: String::from("flood_prediction.json"),
			network_record_file: String::from("flood_prediction.mpk"),
		}
	}

	pub fn preprocessor_path(&self) -> PathBuf {
		self.directory.join(&self.preprocessor_file)
	}

	pub fn network_config_path(&self) -> PathBuf {
		self.directory.join(&self.network_config_file)
	}

	pub fn network_record_path(&self) -> PathBuf {
		self.directory.join(&self.network_record_file)
	}
}

impl Artifacts {
	pub fn new(preprocessor: Box<dyn Transformer>, classifier: Box<dyn Classifier>) -> Self {
		Self {
			preprocessor,
			classifier,
		}
	}
}

impl std::fmt::Debug for Artifacts {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Artifacts").finish_non_exhaustive()
	}
}

impl ArtifactCache {
	pub const fn new() -> Self {
		Self {
			slot: OnceLock::new(),
			init_guard: Mutex::new(()),
		}
	}

	pub fn get(&self) -> Option<Arc<Artifacts>> {
		self.slot.get().cloned()
	}

	/// Runs `load` only if nothing was cached yet. A failed load leaves the
	/// slot empty.
	pub fn get_or_load<F>(&self, load: F) -> Result<Arc<Artifacts>, ArtifactError>
	where
		F: FnOnce() -> Result<Artifacts, ArtifactError>,
	{
		if let Some(found) = self.slot.get() {
			return Ok(found.clone());
		}

		// The guard protects no data, a poisoned one is still usable
		let _guarded_init = self
			.init_guard
			.lock()
			.unwrap_or_else(PoisonError::into_inner);

		if let Some(found) = self.slot.get() {
			return Ok(found.clone());
		}

		let loaded = Arc::new(load()?);
		let _ = self.slot.set(loaded.clone());

		Ok(loaded)
	}
}

/// Returns the process-wide pair, reading storage on the first call only.
pub fn load_artifacts(config: &ArtifactConfig) -> Result<Arc<Artifacts>, ArtifactError> {
	ARTIFACTS.get_or_load(|| read_artifacts(config))
}

/// Reads both artifacts from storage, bypassing the cache.
pub fn read_artifacts(config: &ArtifactConfig) -> Result<Artifacts, ArtifactError> {
	tracing::info!(
		directory = %config.directory.display(),
		"loading flood model artifacts"
	);

	let preprocessor = read_preprocessor(&config.preprocessor_path())?;

	let network_config_path = config.network_config_path();
	let network_config = read_network_config(&network_config_path)?;

	if preprocessor.feature_names.len() != network_config.input_size {
		return Err(ArtifactError::Malformed {
			path: network_config_path,
			reason: format!(
				"the network expects {} features but the preprocessor emits {}",
				network_config.input_size,
				preprocessor.feature_names.len()
			),
		});
	}

	let classifier = read_classifier(&config.network_record_path(), &network_config)?;

	tracing::info!(
		features = preprocessor.feature_names.len(),
		hidden_size = network_config.hidden_size,
		"flood model artifacts loaded"
	);

	Ok(Artifacts::new(Box::new(preprocessor), Box::new(classifier)))
}

fn malformed<E: std::fmt::Display>(path: &Path, reason: E) -> ArtifactError {
	ArtifactError::Malformed {
		path: path.to_path_buf(),
		reason: reason.to_string(),
	}
}

fn ensure_exists(path: &Path) -> Result<(), ArtifactError> {
	if path.is_file() {
		Ok(())
	} else {
		Err(ArtifactError::Missing(path.to_path_buf()))
	}
}

fn read_preprocessor(path: &Path) -> Result<StandardScaler, ArtifactError> {
	let file = File::open(path).map_err(|err| match err.kind() {
		ErrorKind::NotFound => ArtifactError::Missing(path.to_path_buf()),
		_ => malformed(path, err),
	})?;

	let scaler: StandardScaler =
		serde_json::from_reader(BufReader::new(file)).map_err(|err| malformed(path, err))?;
	scaler.validate().map_err(|reason| malformed(path, reason))?;

	Ok(scaler)
}

fn read_network_config(path: &Path) -> Result<FloodNetworkConfig, ArtifactError> {
	ensure_exists(path)?;

	FloodNetworkConfig::load(path).map_err(|err| malformed(path, err))
}

fn read_classifier(
	path: &Path,
	config: &FloodNetworkConfig,
) -> Result<FloodClassifier, ArtifactError> {
	ensure_exists(path)?;

	let device = NdArrayDevice::Cpu;
	let network = config
		.init::<NdArray>(&device)
		.load_file(path, &CompactRecorder::new(), &device)
		.map_err(|err| malformed(path, err))?;
	network
		.check_shapes(config)
		.map_err(|reason| malformed(path, reason))?;

	Ok(FloodClassifier::new(network, config))
}

#[cfg(test)]
mod tests {
	use std::sync::atomic::{AtomicUsize, Ordering};

	use strum::IntoEnumIterator;

	use super::*;
	use crate::form::typedef::Feature;
	use crate::preprocess::typedef::Record;
	use crate::PipelineError;

	struct Passthrough;

	impl Transformer for Passthrough {
		fn transform(&self, record: &Record) -> Result<Record, PipelineError> {
			Ok(record.clone())
		}
	}

	struct AlwaysLow;

	impl Classifier for AlwaysLow {
		fn predict(&self, _record: &Record) -> Result<u8, PipelineError> {
			Ok(0)
		}

		fn predict_probability(&self, _record: &Record) -> Result<[f64; 2], PipelineError> {
			Ok([1.0, 0.0])
		}
	}

	fn feature_names() -> Vec<String> {
		Feature::iter().map(|each| each.as_ref().to_string()).collect()
	}

	fn write_artifacts(directory: &Path, feature_count: usize) {
		let config = ArtifactConfig::in_directory(directory);
		let names = feature_names();

		let scaler = StandardScaler {
			feature_names: names[..feature_count].to_vec(),
			mean: vec![0.0; feature_count],
			scale: vec![1.0; feature_count],
		};
		let file = File::create(config.preprocessor_path()).unwrap();
		serde_json::to_writer(file, &scaler).unwrap();

		let network_config = FloodNetworkConfig::new();
		network_config.save(config.network_config_path()).unwrap();
		network_config
			.init::<NdArray>(&NdArrayDevice::Cpu)
			.save_file(config.network_record_path(), &CompactRecorder::new())
			.unwrap();
	}

	#[test]
	fn reads_a_complete_directory() {
		let directory = tempfile::tempdir().unwrap();
		write_artifacts(directory.path(), 11);

		let artifacts = read_artifacts(&ArtifactConfig::in_directory(directory.path())).unwrap();

		let record = Record::new(feature_names(), vec![1.0; 11]).unwrap();
		let encoded = artifacts.preprocessor.transform(&record).unwrap();
		let [p0, p1] = artifacts.classifier.predict_probability(&encoded).unwrap();
		assert!((p0 + p1 - 1.0).abs() < 1e-5);
	}

	#[test]
	fn missing_preprocessor_is_reported() {
		let directory = tempfile::tempdir().unwrap();

		let err = read_artifacts(&ArtifactConfig::in_directory(directory.path())).unwrap_err();

		assert!(matches!(err, ArtifactError::Missing(ref path) if path.ends_with("preprocessor.json")));
	}

	#[test]
	fn missing_network_record_is_reported() {
		let directory = tempfile::tempdir().unwrap();
		write_artifacts(directory.path(), 11);
		std::fs::remove_file(directory.path().join("flood_prediction.mpk")).unwrap();

		let err = read_artifacts(&ArtifactConfig::in_directory(directory.path())).unwrap_err();

		assert!(matches!(err, ArtifactError::Missing(ref path) if path.ends_with("flood_prediction.mpk")));
	}

	#[test]
	fn corrupt_preprocessor_is_malformed() {
		let directory = tempfile::tempdir().unwrap();
		write_artifacts(directory.path(), 11);
		std::fs::write(directory.path().join("preprocessor.json"), b"not json").unwrap();

		let err = read_artifacts(&ArtifactConfig::in_directory(directory.path())).unwrap_err();

		assert!(matches!(err, ArtifactError::Malformed { .. }));
	}

	#[test]
	fn weights_of_another_architecture_are_malformed() {
		let directory = tempfile::tempdir().unwrap();
		write_artifacts(directory.path(), 11);

		let config = ArtifactConfig::in_directory(directory.path());
		FloodNetworkConfig::new()
			.with_input_size(7)
			.init::<NdArray>(&NdArrayDevice::Cpu)
			.save_file(config.network_record_path(), &CompactRecorder::new())
			.unwrap();

		let err = read_artifacts(&config).unwrap_err();

		assert!(matches!(err, ArtifactError::Malformed { ref path, .. } if path.ends_with("flood_prediction.mpk")));
		assert!(err.to_string().contains("expected [11, 32]"));
	}

	#[test]
	fn feature_count_mismatch_is_malformed() {
		let directory = tempfile::tempdir().unwrap();
		write_artifacts(directory.path(), 7);

		let err = read_artifacts(&ArtifactConfig::in_directory(directory.path())).unwrap_err();

		assert!(matches!(err, ArtifactError::Malformed { ref path, .. } if path.ends_with("flood_prediction.json")));
	}

	#[test]
	fn cache_loads_at_most_once() {
		let cache = ArtifactCache::new();
		let loads = AtomicUsize::new(0);
		let load = || -> Result<Artifacts, ArtifactError> {
			loads.fetch_add(1, Ordering::SeqCst);
			Ok(Artifacts::new(Box::new(Passthrough), Box::new(AlwaysLow)))
		};

		let first = cache.get_or_load(load).unwrap();
		let second = cache.get_or_load(load).unwrap();

		assert!(Arc::ptr_eq(&first, &second));
		assert!(Arc::ptr_eq(&first, &cache.get().unwrap()));
		assert_eq!(loads.load(Ordering::SeqCst), 1);
	}

	#[test]
	fn failed_load_is_not_cached() {
		let cache = ArtifactCache::new();

		let err = cache
			.get_or_load(|| Err(ArtifactError::Missing(PathBuf::from("gone.json"))))
			.err()
			.unwrap();
		assert_eq!(err.to_string(), "Artifact not found: gone.json");
		assert!(cache.get().is_none());

		let loaded = cache
			.get_or_load(|| Ok(Artifacts::new(Box::new(Passthrough), Box::new(AlwaysLow))))
			.unwrap();
		assert!(Arc::ptr_eq(&loaded, &cache.get().unwrap()));
	}
}
