/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/
use actix_web::web::Data;
use chrono::Utc;

use crate::{
    common::{reminders::partition_reminders, types::*},
    environment::AppState,
    outbound::external::fetch_vehicle_documents,
    tools::error::AppError,
};

pub async fn document_reminders(
    data: Data<AppState>,
    credential: Credential,
) -> Result<ReminderBoard, AppError> {
    let records =
        fetch_vehicle_documents(&data.http_client, &data.fleet_api_base_url, &credential).await?;

    Ok(partition_reminders(
        records.into_iter().flatten().collect(),
        Utc::now(),
    ))
}
