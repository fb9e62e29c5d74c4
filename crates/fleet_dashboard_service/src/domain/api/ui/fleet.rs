/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/
use actix_web::{
    get,
    web::{Data, Json, Query},
    HttpRequest,
};

use crate::{
    common::types::*,
    domain::{action::ui::fleet, api::bearer_credential, types::ui::fleet::*},
    environment::AppState,
    tools::error::AppError,
};

#[get("/ui/fleet/utilization")]
pub async fn fleet_utilization(
    data: Data<AppState>,
    req: HttpRequest,
) -> Result<Json<FleetUtilization>, AppError> {
    let credential = bearer_credential(&req)?;

    Ok(Json(fleet::fleet_utilization(data, credential).await?))
}

#[get("/ui/fleet/status")]
pub async fn fleet_status(
    data: Data<AppState>,
    query: Query<FleetStatusQuery>,
    req: HttpRequest,
) -> Result<Json<FleetStatusResponse>, AppError> {
    let credential = bearer_credential(&req)?;
    let FleetStatusQuery { search } = query.into_inner();

    Ok(Json(fleet::fleet_status(data, credential, search).await?))
}
