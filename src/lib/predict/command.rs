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

use tauri::State;

use crate::form::typedef::FormState;
use crate::render::helper::render_failure;
use crate::render::typedef::RenderedResult;
use crate::typedef::AppState;

use super::helper::handle_form;

#[tauri::command]
pub(crate) async fn submit_prediction(
	state: State<'_, AppState>,
	form: FormState,
) -> Result<RenderedResult, ()> {
	let artifacts = state.artifacts.clone();

	// Inference is CPU-bound, keep it off the async runtime
	match tauri::async_runtime::spawn_blocking(move || handle_form(&form, &artifacts)).await {
		Ok(ok) => Ok(ok),
		Err(err) => {
			tracing::error!(error = %err, "prediction worker crashed");
			Ok(render_failure(&err.to_string()))
		}
	}
}
