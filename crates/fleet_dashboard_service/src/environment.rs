/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/

use std::time::Duration;

use crate::{
    common::{geofence::OverlayConfig, types::*},
    tools::{error::AppError, logger::LoggerConfig},
};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::info;
use url::Url;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub workers: usize,
    pub logger_cfg: LoggerConfig,
    pub fleet_api_base_url: String,
    pub request_timeout: u64,
    pub max_allowed_req_size: usize,
    pub geofence_overlay_cfg: GeofenceOverlayConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct GeofenceOverlayConfig {
    pub vertex_count: usize,
    pub max_vertex_count: usize,
    pub display_scale_factor: f64,
    pub default_strategy: String,
}

pub fn read_dhall_config(config_path: &str) -> Result<AppConfig, String> {
    let config = serde_dhall::from_file(config_path).parse::<AppConfig>();
    match config {
        Ok(config) => Ok(config),
        Err(e) => Err(format!("Error reading config: {}", e)),
    }
}

#[derive(Clone)]
pub struct AppState {
    pub fleet_api_base_url: Url,
    pub http_client: Client,
    pub overlay_cfg: OverlayConfig,
    pub request_timeout: u64,
    pub max_allowed_req_size: usize,
}

impl AppState {
    /// Validates the configuration and builds the shared state handed to every worker.
    ///
    /// The upstream client gets `request_timeout` as its own timeout so an outbound call never
    /// outlives the incoming request waiting on it.
    pub fn new(app_config: AppConfig) -> Result<AppState, AppError> {
        let fleet_api_base_url = Url::parse(&app_config.fleet_api_base_url).map_err(|err| {
            AppError::InvalidConfiguration(format!(
                "fleet_api_base_url ({}) : {err}",
                app_config.fleet_api_base_url
            ))
        })?;

        let default_strategy = app_config
            .geofence_overlay_cfg
            .default_strategy
            .parse::<ProjectionStrategy>()
            .map_err(|_| {
                AppError::InvalidConfiguration(format!(
                    "geofence_overlay_cfg.default_strategy ({}) must be greatCircle or planarApprox",
                    app_config.geofence_overlay_cfg.default_strategy
                ))
            })?;

        let GeofenceOverlayConfig {
            vertex_count,
            max_vertex_count,
            ..
        } = app_config.geofence_overlay_cfg;

        if max_vertex_count > MAX_VERTEX_COUNT {
            return Err(AppError::InvalidConfiguration(format!(
                "geofence_overlay_cfg.max_vertex_count ({max_vertex_count}) must be at most {MAX_VERTEX_COUNT}"
            )));
        }

        if vertex_count < 3 || vertex_count > max_vertex_count {
            return Err(AppError::InvalidConfiguration(format!(
                "geofence_overlay_cfg.vertex_count ({vertex_count}) must be within [3, {max_vertex_count}]"
            )));
        }

        let display_scale_factor = app_config.geofence_overlay_cfg.display_scale_factor;
        if !display_scale_factor.is_finite() || display_scale_factor <= 0.0 {
            return Err(AppError::InvalidConfiguration(format!(
                "geofence_overlay_cfg.display_scale_factor ({display_scale_factor}) must be positive"
            )));
        }

        let http_client = Client::builder()
            .timeout(Duration::from_millis(app_config.request_timeout))
            .build()
            .map_err(|err| AppError::InvalidConfiguration(err.to_string()))?;

        info!(
            tag = "[App State]",
            fleet_api_base_url = %fleet_api_base_url,
            default_strategy = %default_strategy,
            vertex_count = vertex_count,
            max_vertex_count = max_vertex_count,
            display_scale_factor = display_scale_factor
        );

        Ok(AppState {
            fleet_api_base_url,
            http_client,
            overlay_cfg: OverlayConfig {
                vertex_count,
                max_vertex_count,
                display_scale_factor,
                default_strategy,
            },
            request_timeout: app_config.request_timeout,
            max_allowed_req_size: app_config.max_allowed_req_size,
        })
    }
}
