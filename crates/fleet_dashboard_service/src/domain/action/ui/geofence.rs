/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/
use actix_web::web::Data;

use crate::{
    common::{geo_circle::project, geofence::*, types::*},
    domain::types::ui::geofence::*,
    environment::AppState,
    outbound::external::fetch_geofences,
    tools::error::AppError,
};
use tracing::info;

pub async fn geofence_overlay(
    data: Data<AppState>,
    credential: Credential,
    GeofenceOverlayQuery { strategy, search }: GeofenceOverlayQuery,
) -> Result<GeofenceOverlayResponse, AppError> {
    let strategy = strategy.unwrap_or(data.overlay_cfg.default_strategy);

    let records =
        fetch_geofences(&data.http_client, &data.fleet_api_base_url, &credential).await?;

    let total = records.len();
    let records = records.into_iter().flatten().collect::<Vec<GeofenceRecord>>();
    let skipped_records = total - records.len();

    let records = filter_by_name(records, search.as_deref());

    let GeofenceOverlay { features, rejected } =
        build_geofence_overlay(&records, strategy, &data.overlay_cfg);

    info!(
        tag = "[Geofence Overlay]",
        strategy = %strategy,
        geofences = features.features.len(),
        rejected = rejected.len(),
        skipped_records = skipped_records
    );

    Ok(GeofenceOverlayResponse {
        strategy,
        features,
        rejected,
        skipped_records,
    })
}

pub fn project_circle(
    data: Data<AppState>,
    CircleRequest {
        center,
        radius_km,
        vertex_count,
        strategy,
    }: CircleRequest,
) -> Result<CircleResponse, AppError> {
    let strategy = strategy.unwrap_or(data.overlay_cfg.default_strategy);
    let vertex_count = vertex_count.unwrap_or(data.overlay_cfg.vertex_count);

    if vertex_count > data.overlay_cfg.max_vertex_count {
        return Err(AppError::InvalidGeometry(format!(
            "vertex count must be at most {}, got {vertex_count}",
            data.overlay_cfg.max_vertex_count
        )));
    }

    let ring = project(
        &GeoCircle {
            center,
            radius_km,
            vertex_count,
        },
        strategy,
    )?;

    Ok(CircleResponse {
        strategy,
        vertex_count,
        ring,
    })
}
