/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/
use super::types::*;
use crate::common::types::*;
use crate::tools::{callapi::call_api, error::AppError};
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use url::Url;

pub const DAILY_STATUS_PATH: &str = "dailyStatus";
pub const GEOFENCES_PATH: &str = "geofences";
pub const LIVE_LOCATION_PATH: &str = "get-live-location";
pub const VEHICLE_DOCUMENTS_PATH: &str = "vehicle-documents";

/// Appends `path` to the base URL, keeping every segment of the base.
pub fn endpoint(base_url: &Url, path: &str) -> Result<Url, AppError> {
    Url::parse(&format!(
        "{}/{}",
        base_url.as_str().trim_end_matches('/'),
        path.trim_start_matches('/')
    ))
    .map_err(|err| AppError::InvalidConfiguration(format!("{path} : {err}")))
}

async fn fetch_records<T: DeserializeOwned>(
    client: &Client,
    base_url: &Url,
    path: &str,
    credential: &Credential,
) -> Result<Vec<Option<T>>, AppError> {
    let authorization = format!("Bearer {}", credential.inner());

    let envelope = call_api::<ApiEnvelope, String>(
        client,
        Method::GET,
        &endpoint(base_url, path)?,
        vec![
            ("content-type", "application/json"),
            ("authorization", authorization.as_str()),
        ],
        None,
    )
    .await?;

    Ok(normalize_records::<T>(path, envelope))
}

pub async fn fetch_daily_status(
    client: &Client,
    base_url: &Url,
    credential: &Credential,
) -> Result<Vec<Option<VehicleDailyStatus>>, AppError> {
    fetch_records(client, base_url, DAILY_STATUS_PATH, credential).await
}

pub async fn fetch_geofences(
    client: &Client,
    base_url: &Url,
    credential: &Credential,
) -> Result<Vec<Option<GeofenceRecord>>, AppError> {
    fetch_records(client, base_url, GEOFENCES_PATH, credential).await
}

pub async fn fetch_live_locations(
    client: &Client,
    base_url: &Url,
    credential: &Credential,
) -> Result<Vec<Option<LiveLocationRecord>>, AppError> {
    fetch_records(client, base_url, LIVE_LOCATION_PATH, credential).await
}

pub async fn fetch_vehicle_documents(
    client: &Client,
    base_url: &Url,
    credential: &Credential,
) -> Result<Vec<Option<VehicleDocumentRecord>>, AppError> {
    fetch_records(client, base_url, VEHICLE_DOCUMENTS_PATH, credential).await
}
