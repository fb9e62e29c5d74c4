/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/

use crate::common::{types::*, utils::contains_ignore_case};

pub fn classify_status(status: Option<&str>) -> VehicleStatus {
    let status = status.unwrap_or_default().trim().to_lowercase();

    match status.as_str() {
        "running" => VehicleStatus::Running,
        "parked" => VehicleStatus::Stopped,
        "idle" => VehicleStatus::Idle,
        _ if status.contains("no data since") => VehicleStatus::Disconnected,
        _ => VehicleStatus::Unknown,
    }
}

/// Counts the fleet per live status. `all` includes vehicles whose status is not recognised.
pub fn summarize_fleet_status(records: &[LiveLocationRecord]) -> FleetStatusCounts {
    records.iter().fold(
        FleetStatusCounts {
            all: records.len(),
            ..Default::default()
        },
        |mut counts, record| {
            match classify_status(record.status.as_deref()) {
                VehicleStatus::Running => counts.running += 1,
                VehicleStatus::Stopped => counts.stopped += 1,
                VehicleStatus::Idle => counts.idle += 1,
                VehicleStatus::Disconnected => counts.disconnected += 1,
                VehicleStatus::Unknown => {}
            }
            counts
        },
    )
}

pub fn filter_by_vehicle_number(
    records: Vec<LiveLocationRecord>,
    search: Option<&str>,
) -> Vec<LiveLocationRecord> {
    match search.map(str::trim).filter(|term| !term.is_empty()) {
        Some(term) => records
            .into_iter()
            .filter(|record| contains_ignore_case(&record.vehicle_number.inner(), term))
            .collect(),
        None => records,
    }
}
