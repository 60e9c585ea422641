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

use std::path::PathBuf;
use std::sync::{Arc, Mutex, OnceLock};

use crate::model::typedef::Classifier;
use crate::preprocess::typedef::Transformer;

/// Where the artifacts live and what they are called.
#[derive(Clone, Debug, PartialEq)]
pub struct ArtifactConfig {
	pub directory: PathBuf,
	pub preprocessor_file: String,
	pub network_config_file: String,
	pub network_record_file: String,
}

/// Startup failures. Without both artifacts nothing can be served.
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
	#[error("Artifact not found: {}", .0.display())]
	Missing(PathBuf),

	#[error("Artifact {} is malformed: {reason}", path.display())]
	Malformed { path: PathBuf, reason: String },
}

pub struct Artifacts {
	pub preprocessor: Box<dyn Transformer>,
	pub classifier: Box<dyn Classifier>,
}

/// Write-once slot for the loaded pair. Loading happens at most once, later
/// callers share the same [`Arc`].
#[derive(Default)]
pub struct ArtifactCache {
	pub(super) slot: OnceLock<Arc<Artifacts>>,
	pub(super) init_guard: Mutex<()>,
}
