#![recursion_limit = "256"]

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

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod typedef;
pub use typedef::PipelineError;

pub mod artifact;
pub mod form;
pub mod model;
pub mod predict;
pub mod preprocess;
pub mod render;

#[cfg(feature = "desktop")]
use form::command::*;
#[cfg(feature = "desktop")]
use predict::command::*;

static TRACING: Once = Once::new();

/// Installs the global subscriber. `FLOOD_LOG` overrides the filter, e.g.
/// `FLOOD_LOG=flood_sentinel_lib=debug`.
pub fn init_tracing() {
	TRACING.call_once(|| {
		let filter = EnvFilter::try_from_env("FLOOD_LOG")
			.unwrap_or_else(|_| EnvFilter::new("flood_sentinel_lib=info"));

		tracing_subscriber::registry()
			.with(fmt::layer().with_target(true).with_line_number(true))
			.with(filter)
			.init();
	});
}

#[cfg(feature = "desktop")]
#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
	use tauri::Manager;
	use tauri_plugin_dialog::{DialogExt, MessageDialogKind};

	init_tracing();

	tauri::Builder::default()
		.plugin(tauri_plugin_dialog::init())
		.invoke_handler(tauri::generate_handler![get_form_schema, submit_prediction])
		.setup(|app| {
			let config = artifact::typedef::ArtifactConfig::default();

			// Missing artifacts are fatal, the form is never shown
			let artifacts = match artifact::helper::load_artifacts(&config) {
				Ok(ok) => ok,
				Err(err) => {
					tracing::error!(error = %err, "cannot load flood model artifacts");

					if let Some(window) = app.get_webview_window("main") {
						let _ = window.hide();
					}

					// Setup runs on the main thread, a blocking dialog would never get answered
					let handle = app.handle().clone();
					app.dialog()
						.message(err.to_string())
						.title("Cannot Load Flood Model")
						.kind(MessageDialogKind::Error)
						.show(move |_| handle.exit(1));
					return Ok(());
				}
			};

			app.manage(typedef::AppState { artifacts });
			Ok(())
		})
		.run(tauri::generate_context!())
		.expect("error while running tauri application");
}
