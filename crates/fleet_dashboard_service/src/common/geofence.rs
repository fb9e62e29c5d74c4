/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/

use crate::common::{geo_circle::*, types::*, utils::contains_ignore_case};
use crate::tools::prometheus::REJECTED_GEOFENCES;
use geojson::{FeatureCollection, JsonObject};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::warn;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OverlayConfig {
    pub vertex_count: usize,
    /// Largest `vertexCount` a circle request may ask for.
    pub max_vertex_count: usize,
    pub display_scale_factor: f64,
    pub default_strategy: ProjectionStrategy,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        OverlayConfig {
            vertex_count: DEFAULT_VERTEX_COUNT,
            max_vertex_count: 1024,
            display_scale_factor: 3.0,
            default_strategy: ProjectionStrategy::GreatCircle,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeofenceOverlay {
    pub features: FeatureCollection,
    pub rejected: Vec<RejectedGeofence>,
}

/// Radius of the geofence in kilometers, honouring `distance_unit`. Unknown or absent units are kilometers.
pub fn radius_in_km(record: &GeofenceRecord) -> f64 {
    let unit = record
        .distance_unit
        .as_deref()
        .and_then(|unit| DistanceUnit::from_str(unit.trim()).ok());

    match unit {
        Some(DistanceUnit::Meters) => record.radius / 1000.0,
        _ => record.radius,
    }
}

/// Circle drawn for a geofence on the map, enlarged by `display_scale_factor` so small fences stay visible.
pub fn geofence_to_circle(record: &GeofenceRecord, cfg: &OverlayConfig) -> GeoCircle {
    GeoCircle {
        center: Point {
            lat: Latitude(record.lat),
            lng: Longitude(record.lng),
        },
        radius_km: radius_in_km(record) * cfg.display_scale_factor,
        vertex_count: cfg.vertex_count,
    }
}

fn feature_properties(record: &GeofenceRecord, strategy: ProjectionStrategy) -> JsonObject {
    let mut properties = JsonObject::new();
    properties.insert(
        "id".to_string(),
        serde_json::json!(record.id.as_ref().map(|id| id.inner())),
    );
    properties.insert("name".to_string(), serde_json::json!(record.name));
    properties.insert("radiusKm".to_string(), serde_json::json!(radius_in_km(record)));
    properties.insert("strategy".to_string(), serde_json::json!(strategy));
    properties
}

/// Projects every geofence into a map polygon.
///
/// Geofences are independent: one that cannot be projected is reported in `rejected` and the rest
/// of the overlay is still built.
pub fn build_geofence_overlay(
    records: &[GeofenceRecord],
    strategy: ProjectionStrategy,
    cfg: &OverlayConfig,
) -> GeofenceOverlay {
    let mut features = Vec::with_capacity(records.len());
    let mut rejected = Vec::new();

    for record in records {
        match project(&geofence_to_circle(record, cfg), strategy) {
            Ok(ring) => features.push(to_geojson_feature(
                &ring,
                Some(feature_properties(record, strategy)),
            )),
            Err(err) => {
                warn!(tag = "[Rejected Geofence]", geofence_id = ?record.id, name = %record.name, error = %err.message());
                REJECTED_GEOFENCES.inc();
                rejected.push(RejectedGeofence {
                    id: record.id.to_owned(),
                    name: record.name.to_owned(),
                    reason: err.message(),
                });
            }
        }
    }

    GeofenceOverlay {
        features: FeatureCollection {
            bbox: None,
            features,
            foreign_members: None,
        },
        rejected,
    }
}

pub fn filter_by_name(records: Vec<GeofenceRecord>, search: Option<&str>) -> Vec<GeofenceRecord> {
    match search.map(str::trim).filter(|term| !term.is_empty()) {
        Some(term) => records
            .into_iter()
            .filter(|record| contains_ignore_case(&record.name, term))
            .collect(),
        None => records,
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    fn records() -> Vec<GeofenceRecord> {
        serde_json::from_value(serde_json::json!([
            { "_id": "g1", "name": "Surat Depot", "lat": 21.17, "long": 72.83, "radius": 2 },
            { "_id": "g2", "name": "Ahmedabad Yard", "lat": "23.02", "long": "72.57", "radius": 500, "distance_unit": "m" },
            { "_id": "g3", "name": "Broken", "lat": "abc", "long": 72.0, "radius": 1 },
            { "_id": "g4", "name": "surat north", "lat": 21.2, "long": 72.8 }
        ]))
        .unwrap()
    }

    #[test]
    fn radius_honours_distance_unit() {
        let records = records();
        assert_eq!(radius_in_km(&records[0]), 2.0);
        assert_eq!(radius_in_km(&records[1]), 0.5);
    }

    #[test]
    fn display_radius_is_scaled() {
        let records = records();
        let circle = geofence_to_circle(&records[1], &OverlayConfig::default());
        assert!((circle.radius_km - 1.5).abs() < 1e-12);
        assert_eq!(circle.center.lng, Longitude(72.57));
        assert_eq!(circle.vertex_count, DEFAULT_VERTEX_COUNT);
    }

    #[test]
    fn invalid_geofences_are_rejected_individually() {
        let overlay = build_geofence_overlay(
            &records(),
            ProjectionStrategy::GreatCircle,
            &OverlayConfig::default(),
        );

        assert_eq!(overlay.features.features.len(), 2);
        assert_eq!(
            overlay
                .rejected
                .iter()
                .map(|rejected| rejected.name.as_str())
                .collect::<Vec<&str>>(),
            vec!["Broken", "surat north"]
        );
        assert!(overlay.rejected[0].reason.contains("Invalid Geometry"));

        let properties = overlay.features.features[1].properties.as_ref().unwrap();
        assert_eq!(properties["id"], serde_json::json!("g2"));
        assert_eq!(properties["radiusKm"], serde_json::json!(0.5));
        assert_eq!(properties["strategy"], serde_json::json!("greatCircle"));
    }

    #[test]
    fn name_search_is_case_insensitive() {
        let filtered = filter_by_name(records(), Some(" SURAT "));
        assert_eq!(filtered.len(), 2);
        assert_eq!(filter_by_name(records(), Some("")).len(), 4);
        assert_eq!(filter_by_name(records(), None).len(), 4);
    }
}
