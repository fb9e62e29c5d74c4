/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/
use actix_web::web::Data;

use crate::{
    common::{aggregation::aggregate_all, fleet_status::*, types::*},
    domain::types::ui::fleet::*,
    environment::AppState,
    outbound::external::{fetch_daily_status, fetch_live_locations},
    tools::error::AppError,
};
use tracing::info;

pub async fn fleet_utilization(
    data: Data<AppState>,
    credential: Credential,
) -> Result<FleetUtilization, AppError> {
    let vehicles =
        fetch_daily_status(&data.http_client, &data.fleet_api_base_url, &credential).await?;

    let utilization = aggregate_all(&vehicles);

    info!(
        tag = "[Fleet Utilization]",
        vehicles = utilization.summary.len(),
        skipped_records = utilization.skipped_records
    );

    Ok(utilization)
}

pub async fn fleet_status(
    data: Data<AppState>,
    credential: Credential,
    search: Option<String>,
) -> Result<FleetStatusResponse, AppError> {
    let records =
        fetch_live_locations(&data.http_client, &data.fleet_api_base_url, &credential).await?;

    let total = records.len();
    let records = records.into_iter().flatten().collect::<Vec<LiveLocationRecord>>();
    let skipped_records = total - records.len();

    let counts = summarize_fleet_status(&records);
    let vehicles = filter_by_vehicle_number(records, search.as_deref());

    Ok(FleetStatusResponse {
        counts,
        vehicles,
        skipped_records,
    })
}
