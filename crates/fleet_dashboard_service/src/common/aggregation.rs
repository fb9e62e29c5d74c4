/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/

use crate::common::types::*;
use crate::tools::error::AppError;
use std::fmt::Display;
use tracing::warn;

/// Resolves the count shown for a stop category. The upstream precomputed count wins over the
/// array length; a disagreement is logged since it points at an upstream consistency issue.
fn stop_count(
    vehicle_number: &VehicleNumber,
    category: &str,
    override_count: Option<u64>,
    events: &[StopEvent],
) -> u64 {
    let derived = events.len() as u64;
    match override_count {
        Some(count) => {
            if count != derived {
                warn!(
                    tag = "[Count Override Mismatch]",
                    vehicle_number = %vehicle_number.inner(),
                    category = category,
                    override_count = count,
                    events = derived,
                );
            }
            count
        }
        None => derived,
    }
}

fn total_time(events: &[StopEvent]) -> Seconds {
    Seconds(
        events
            .iter()
            .map(|StopEvent { total_time }| total_time.inner())
            .sum(),
    )
}

fn total_distance(segments: &[RunningSegment]) -> Kilometers {
    Kilometers(
        segments
            .iter()
            .map(|RunningSegment { distance }| distance.inner())
            .sum(),
    )
}

/// Builds the per-vehicle row of the fleet utilization table.
///
/// # Arguments
///
/// * `vehicle` - The vehicle's daily status record, `None` when the upstream entry was absent or undecodable.
///
/// # Returns
///
/// * `Ok(VehicleSummaryRow)` - Counts and totals for every event category.
/// * `Err(AppError::MalformedInput)` - When there is no record to summarize. Callers skip it and carry on with the batch.
pub fn build_summary_row(
    vehicle: Option<&VehicleDailyStatus>,
) -> Result<VehicleSummaryRow, AppError> {
    let vehicle = vehicle.ok_or_else(|| {
        AppError::MalformedInput("vehicle daily status record is absent".to_string())
    })?;

    Ok(VehicleSummaryRow {
        vehicle_number: vehicle.vehicle_number.to_owned(),
        unsched_stoppage: stop_count(
            &vehicle.vehicle_number,
            "unscheduled",
            vehicle.unscheduled_stops_count,
            &vehicle.unscheduled_stops,
        ),
        unsched_time: total_time(&vehicle.unscheduled_stops),
        gf_stops: vehicle.geo_fence_stops.len() as u64,
        gf_time: total_time(&vehicle.geo_fence_stops),
        idling: stop_count(
            &vehicle.vehicle_number,
            "idling",
            vehicle.idling_count,
            &vehicle.idling_stops,
        ),
        idling_time: total_time(&vehicle.idling_stops),
        daily_running: vehicle.daily_running.len() as u64,
        km: total_distance(&vehicle.daily_running),
    })
}

/// Duration band of a stop, compared on its total time in (fractional) minutes.
/// Exactly 20 and exactly 30 minutes both belong to the middle band.
pub fn classify_duration(Seconds(total_time): Seconds) -> DurationBand {
    let minutes = total_time / 60.0;
    if minutes < 20.0 {
        DurationBand::UnderTwentyMinutes
    } else if minutes <= 30.0 {
        DurationBand::TwentyToThirtyMinutes
    } else {
        DurationBand::OverThirtyMinutes
    }
}

pub fn classify_distance(Kilometers(distance): Kilometers) -> DistanceBand {
    if distance < 100.0 {
        DistanceBand::UpToHundredKm
    } else if distance <= 200.0 {
        DistanceBand::HundredToTwoHundredKm
    } else {
        DistanceBand::OverTwoHundredKm
    }
}

/// A histogram band with a fixed set of three ordered values.
trait Band: Copy + Display {
    const ORDERED: [Self; 3];

    fn position(self) -> usize;
}

impl Band for DurationBand {
    const ORDERED: [Self; 3] = [
        DurationBand::UnderTwentyMinutes,
        DurationBand::TwentyToThirtyMinutes,
        DurationBand::OverThirtyMinutes,
    ];

    fn position(self) -> usize {
        self as usize
    }
}

impl Band for DistanceBand {
    const ORDERED: [Self; 3] = [
        DistanceBand::UpToHundredKm,
        DistanceBand::HundredToTwoHundredKm,
        DistanceBand::OverTwoHundredKm,
    ];

    fn position(self) -> usize {
        self as usize
    }
}

fn histogram<B: Band, T>(pooled: impl Iterator<Item = T>, classify: impl Fn(T) -> B) -> [DurationBucket; 3] {
    let mut counts = [0_u64; 3];
    for item in pooled {
        counts[classify(item).position()] += 1;
    }

    B::ORDERED.map(|band| DurationBucket {
        label: band.to_string(),
        count: counts[band.position()],
    })
}

/// Pools every event of every vehicle per category and buckets them.
///
/// Counts are events, not vehicles: a vehicle with five idling stops adds five to the idling
/// histogram. Absent records contribute nothing.
pub fn aggregate_distributions(vehicles: &[Option<VehicleDailyStatus>]) -> FleetDistributions {
    let present = || vehicles.iter().flatten();

    FleetDistributions {
        unscheduled: histogram(
            present().flat_map(|vehicle| vehicle.unscheduled_stops.iter()),
            |stop: &StopEvent| classify_duration(stop.total_time),
        ),
        geofence: histogram(
            present().flat_map(|vehicle| vehicle.geo_fence_stops.iter()),
            |stop: &StopEvent| classify_duration(stop.total_time),
        ),
        idling: histogram(
            present().flat_map(|vehicle| vehicle.idling_stops.iter()),
            |stop: &StopEvent| classify_duration(stop.total_time),
        ),
        running: histogram(
            present().flat_map(|vehicle| vehicle.daily_running.iter()),
            |segment: &RunningSegment| classify_distance(segment.distance),
        ),
    }
}

/// Computes the whole fleet utilization view for one fetch cycle.
///
/// Summary rows keep the input order. Absent records are skipped and counted, they never blank
/// the rest of the table.
pub fn aggregate_all(vehicles: &[Option<VehicleDailyStatus>]) -> FleetUtilization {
    let mut skipped_records = 0;

    let summary = vehicles
        .iter()
        .enumerate()
        .filter_map(
            |(index, vehicle)| match build_summary_row(vehicle.as_ref()) {
                Ok(row) => Some(row),
                Err(err) => {
                    warn!(tag = "[Skipping Vehicle Record]", index = index, error = %err.message());
                    skipped_records += 1;
                    None
                }
            },
        )
        .collect::<Vec<VehicleSummaryRow>>();

    FleetUtilization {
        summary,
        distributions: aggregate_distributions(vehicles),
        skipped_records,
    }
}
