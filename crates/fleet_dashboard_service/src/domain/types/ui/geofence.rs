/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/
use geojson::FeatureCollection;
use serde::{Deserialize, Serialize};

use crate::common::types::*;

#[derive(Deserialize, Debug)]
pub struct GeofenceOverlayQuery {
    pub strategy: Option<ProjectionStrategy>,
    pub search: Option<String>,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct GeofenceOverlayResponse {
    pub strategy: ProjectionStrategy,
    pub features: FeatureCollection,
    pub rejected: Vec<RejectedGeofence>,
    pub skipped_records: usize,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CircleRequest {
    pub center: Point,
    pub radius_km: f64,
    pub vertex_count: Option<usize>,
    pub strategy: Option<ProjectionStrategy>,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CircleResponse {
    pub strategy: ProjectionStrategy,
    pub vertex_count: usize,
    pub ring: Vec<Point>,
}
