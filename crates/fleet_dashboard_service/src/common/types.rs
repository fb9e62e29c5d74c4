/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/
use serde::de::{IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

#[derive(Deserialize, Serialize, Clone, Debug, Default, Eq, Hash, PartialEq)]
#[macros::impl_getter]
pub struct VehicleNumber(pub String);
#[derive(Deserialize, Serialize, Clone, Debug, Eq, Hash, PartialEq)]
#[macros::impl_getter]
pub struct GeofenceId(pub String);
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Copy)]
#[macros::impl_getter]
pub struct Latitude(pub f64);
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Copy)]
#[macros::impl_getter]
pub struct Longitude(pub f64);
#[derive(Clone, Eq, PartialEq)]
#[macros::impl_getter]
pub struct Credential(pub String);

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// Duration in seconds. Decodes leniently: anything that is not a finite number is `0`.
#[derive(Serialize, Clone, Debug, Default, PartialEq, PartialOrd, Copy)]
#[macros::impl_getter]
pub struct Seconds(pub f64);

/// Distance in kilometers. Decodes leniently: anything that is not a finite number is `0`.
#[derive(Serialize, Clone, Debug, Default, PartialEq, PartialOrd, Copy)]
#[macros::impl_getter]
pub struct Kilometers(pub f64);

impl<'de> Deserialize<'de> for Seconds {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer
            .deserialize_any(LenientNumberVisitor { fallback: 0.0 })
            .map(Seconds)
    }
}

impl<'de> Deserialize<'de> for Kilometers {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer
            .deserialize_any(LenientNumberVisitor { fallback: 0.0 })
            .map(Kilometers)
    }
}

/// Accepts a JSON number or a numeric string. Every other shape (including non-finite
/// numbers) resolves to `fallback` instead of failing the surrounding record.
struct LenientNumberVisitor {
    fallback: f64,
}

impl<'de> Visitor<'de> for LenientNumberVisitor {
    type Value = f64;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("a number (integer/float) or a string containing a number")
    }

    fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E> {
        Ok(if value.is_finite() {
            value
        } else {
            self.fallback
        })
    }

    fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E> {
        Ok(value as f64)
    }

    fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E> {
        Ok(value as f64)
    }

    fn visit_str<E>(self, value: &str) -> Result<Self::Value, E> {
        Ok(value
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
            .unwrap_or(self.fallback))
    }

    fn visit_bool<E>(self, _: bool) -> Result<Self::Value, E> {
        Ok(self.fallback)
    }

    fn visit_unit<E>(self) -> Result<Self::Value, E> {
        Ok(self.fallback)
    }

    fn visit_none<E>(self) -> Result<Self::Value, E> {
        Ok(self.fallback)
    }

    fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(self)
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        while seq.next_element::<IgnoredAny>()?.is_some() {}
        Ok(self.fallback)
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
        Ok(self.fallback)
    }
}

/// Decodes a coordinate or radius; non-numeric input becomes `NaN` so geometry validation rejects it.
pub fn deserialize_number_or_nan<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(LenientNumberVisitor { fallback: f64::NAN })
}

/// `null` decodes the same way an absent field does.
pub fn deserialize_null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Decodes an upstream precomputed count. Anything that is not a non-negative whole number
/// (numeric strings included) becomes `None`, so the count falls back to the event list length.
pub fn deserialize_lenient_count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer
        .deserialize_any(LenientNumberVisitor { fallback: f64::NAN })
        .map(|count| {
            (count.is_finite() && count >= 0.0 && count.fract() == 0.0 && count <= u64::MAX as f64)
                .then_some(count as u64)
        })
}

fn nan() -> f64 {
    f64::NAN
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Copy)]
pub struct Point {
    pub lat: Latitude,
    pub lng: Longitude,
}

// Daily status (fleet utilization)

#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StopEvent {
    #[serde(default)]
    pub total_time: Seconds,
}

#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RunningSegment {
    #[serde(default)]
    pub distance: Kilometers,
}

#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VehicleDailyStatus {
    pub vehicle_number: VehicleNumber,
    #[serde(default, deserialize_with = "deserialize_null_as_default")]
    pub unscheduled_stops: Vec<StopEvent>,
    #[serde(default, deserialize_with = "deserialize_null_as_default")]
    pub geo_fence_stops: Vec<StopEvent>,
    #[serde(default, deserialize_with = "deserialize_null_as_default")]
    pub idling_stops: Vec<StopEvent>,
    #[serde(default, deserialize_with = "deserialize_null_as_default")]
    pub daily_running: Vec<RunningSegment>,
    #[serde(default, deserialize_with = "deserialize_lenient_count")]
    pub unscheduled_stops_count: Option<u64>,
    #[serde(default, deserialize_with = "deserialize_lenient_count")]
    pub idling_count: Option<u64>,
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VehicleSummaryRow {
    pub vehicle_number: VehicleNumber,
    pub unsched_stoppage: u64,
    pub unsched_time: Seconds,
    pub gf_stops: u64,
    pub gf_time: Seconds,
    pub idling: u64,
    pub idling_time: Seconds,
    pub daily_running: u64,
    pub km: Kilometers,
}

#[derive(Debug, Clone, Copy, EnumString, EnumIter, Display, Serialize, Deserialize, Eq, Hash, PartialEq)]
pub enum DurationBand {
    #[strum(serialize = "<20 min")]
    #[serde(rename = "<20 min")]
    UnderTwentyMinutes,
    #[strum(serialize = "20-30 min")]
    #[serde(rename = "20-30 min")]
    TwentyToThirtyMinutes,
    #[strum(serialize = ">30 min")]
    #[serde(rename = ">30 min")]
    OverThirtyMinutes,
}

#[derive(Debug, Clone, Copy, EnumString, EnumIter, Display, Serialize, Deserialize, Eq, Hash, PartialEq)]
pub enum DistanceBand {
    #[strum(serialize = "0-100 km")]
    #[serde(rename = "0-100 km")]
    UpToHundredKm,
    #[strum(serialize = "100-200 km")]
    #[serde(rename = "100-200 km")]
    HundredToTwoHundredKm,
    #[strum(serialize = ">200 km")]
    #[serde(rename = ">200 km")]
    OverTwoHundredKm,
}

/// One histogram bar. `count` is a number of pooled events, not of distinct vehicles.
#[derive(Deserialize, Serialize, Clone, Debug, Eq, PartialEq)]
pub struct DurationBucket {
    pub label: String,
    pub count: u64,
}

#[derive(Deserialize, Serialize, Clone, Debug, Eq, PartialEq)]
pub struct FleetDistributions {
    pub unscheduled: [DurationBucket; 3],
    pub geofence: [DurationBucket; 3],
    pub idling: [DurationBucket; 3],
    pub running: [DurationBucket; 3],
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FleetUtilization {
    pub summary: Vec<VehicleSummaryRow>,
    pub distributions: FleetDistributions,
    pub skipped_records: usize,
}

// Geofence geometry

pub const DEFAULT_VERTEX_COUNT: usize = 64;
/// Hard ceiling on ring size, whatever the configuration allows.
pub const MAX_VERTEX_COUNT: usize = 4096;

fn default_vertex_count() -> usize {
    DEFAULT_VERTEX_COUNT
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GeoCircle {
    pub center: Point,
    pub radius_km: f64,
    #[serde(default = "default_vertex_count")]
    pub vertex_count: usize,
}

#[derive(
    Debug, Clone, Copy, Default, EnumString, Display, Serialize, Deserialize, Eq, Hash, PartialEq,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum ProjectionStrategy {
    #[default]
    GreatCircle,
    /// Flat-earth small-angle approximation. Diverges near the poles.
    PlanarApprox,
}

#[derive(Debug, Clone, Copy, EnumString, Display, Serialize, Deserialize, Eq, PartialEq)]
pub enum DistanceUnit {
    #[strum(serialize = "m")]
    #[serde(rename = "m")]
    Meters,
    #[strum(serialize = "km")]
    #[serde(rename = "km")]
    Kilometers,
}

/// Geofence as returned by `GET /geofences`. Longitude travels as `long` on the wire.
#[derive(Deserialize, Serialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct GeofenceRecord {
    #[serde(rename = "_id", default)]
    pub id: Option<GeofenceId>,
    #[serde(default, deserialize_with = "deserialize_null_as_default")]
    pub name: String,
    #[serde(default = "nan", deserialize_with = "deserialize_number_or_nan")]
    pub lat: f64,
    #[serde(
        rename = "long",
        default = "nan",
        deserialize_with = "deserialize_number_or_nan"
    )]
    pub lng: f64,
    #[serde(default = "nan", deserialize_with = "deserialize_number_or_nan")]
    pub radius: f64,
    #[serde(rename = "distance_unit", default)]
    pub distance_unit: Option<String>,
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RejectedGeofence {
    pub id: Option<GeofenceId>,
    pub name: String,
    pub reason: String,
}

// Live location (dashboard KPIs)

#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LiveLocationRecord {
    #[serde(rename = "_id", default)]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_null_as_default")]
    pub vehicle_number: VehicleNumber,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub last_packet_received_at: Option<String>,
}

#[derive(Debug, Clone, Copy, EnumString, Display, Serialize, Deserialize, Eq, Hash, PartialEq)]
pub enum VehicleStatus {
    Running,
    Stopped,
    Idle,
    Disconnected,
    Unknown,
}

#[derive(Deserialize, Serialize, Clone, Debug, Default, Eq, PartialEq)]
pub struct FleetStatusCounts {
    pub all: usize,
    pub running: usize,
    pub stopped: usize,
    pub idle: usize,
    pub disconnected: usize,
}

// Vehicle documents (reminders)

#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VehicleDocumentRecord {
    #[serde(rename = "_id", default)]
    pub id: Option<String>,
    #[serde(default)]
    pub vehicle_number: Option<VehicleNumber>,
    #[serde(default)]
    pub document_type: Option<String>,
    #[serde(default)]
    pub expiry_date: Option<String>,
    #[serde(default, deserialize_with = "deserialize_null_as_default")]
    pub resolved: bool,
}

#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq)]
pub struct ReminderBoard {
    pub upcoming: Vec<VehicleDocumentRecord>,
    pub overdue: Vec<VehicleDocumentRecord>,
    pub resolved: Vec<VehicleDocumentRecord>,
}
