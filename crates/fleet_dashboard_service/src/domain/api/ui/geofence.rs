/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/
use actix_web::{
    get, post,
    web::{Data, Json, Query},
    HttpRequest,
};

use crate::{
    domain::{action::ui::geofence, api::bearer_credential, types::ui::geofence::*},
    environment::AppState,
    tools::error::AppError,
};

#[get("/ui/geofences/overlay")]
pub async fn geofence_overlay(
    data: Data<AppState>,
    query: Query<GeofenceOverlayQuery>,
    req: HttpRequest,
) -> Result<Json<GeofenceOverlayResponse>, AppError> {
    let credential = bearer_credential(&req)?;

    Ok(Json(
        geofence::geofence_overlay(data, credential, query.into_inner()).await?,
    ))
}

#[post("/ui/geofence/circle")]
pub async fn project_circle(
    data: Data<AppState>,
    param_obj: Json<CircleRequest>,
) -> Result<Json<CircleResponse>, AppError> {
    let request_body = param_obj.into_inner();

    Ok(Json(geofence::project_circle(data, request_body)?))
}
