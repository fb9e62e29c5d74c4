/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/

use crate::common::{types::*, utils::*};
use crate::tools::error::AppError;
use geo::{coord, Coord, LineString, Polygon};
use geojson::{Feature, Geometry, JsonObject, Position, Value};

/// Displaces a center point by a distance along a compass bearing.
pub trait CircleProjection {
    /// `heading` is in degrees clockwise from north.
    fn offset(&self, center: &Point, radius_km: f64, heading: f64) -> Point;
}

/// Forward geodesic on a sphere of radius [`EARTH_RADIUS_KM`].
pub struct GreatCircleOffset;

/// Flat-earth small-angle approximation. The longitude scale `1 / cos(lat)` blows up towards the
/// poles, so it is only meaningful away from them.
pub struct PlanarOffset;

impl CircleProjection for GreatCircleOffset {
    fn offset(&self, center: &Point, radius_km: f64, heading: f64) -> Point {
        let Latitude(lat) = center.lat;
        let Longitude(lng) = center.lng;

        let angular_distance = radius_km / EARTH_RADIUS_KM;
        let bearing = deg2rad(heading);
        let phi1 = deg2rad(lat);
        let lambda1 = deg2rad(lng);

        let phi2 = (phi1.sin() * angular_distance.cos()
            + phi1.cos() * angular_distance.sin() * bearing.cos())
        .asin();
        let lambda2 = lambda1
            + (bearing.sin() * angular_distance.sin() * phi1.cos())
                .atan2(angular_distance.cos() - phi1.sin() * phi2.sin());

        Point {
            lat: Latitude(rad2deg(phi2)),
            lng: Longitude(normalize_longitude(rad2deg(lambda2))),
        }
    }
}

impl CircleProjection for PlanarOffset {
    fn offset(&self, center: &Point, radius_km: f64, heading: f64) -> Point {
        let Latitude(lat) = center.lat;
        let Longitude(lng) = center.lng;

        // Compass bearing to the mathematical angle measured counter-clockwise from east.
        let angle = deg2rad(90.0 - heading);
        let dx = (radius_km / EARTH_RADIUS_KM) * angle.cos();
        let dy = (radius_km / EARTH_RADIUS_KM) * angle.sin();

        Point {
            lat: Latitude(lat + rad2deg(dy)),
            lng: Longitude(normalize_longitude(
                lng + rad2deg(dx) / deg2rad(lat).cos(),
            )),
        }
    }
}

impl ProjectionStrategy {
    pub fn projector(&self) -> &'static dyn CircleProjection {
        match self {
            ProjectionStrategy::GreatCircle => &GreatCircleOffset,
            ProjectionStrategy::PlanarApprox => &PlanarOffset,
        }
    }
}

fn validate(circle: &GeoCircle) -> Result<(), AppError> {
    let Latitude(lat) = circle.center.lat;
    let Longitude(lng) = circle.center.lng;

    if !(3..=MAX_VERTEX_COUNT).contains(&circle.vertex_count) {
        return Err(AppError::InvalidGeometry(format!(
            "vertex count must be within [3, {MAX_VERTEX_COUNT}], got {}",
            circle.vertex_count
        )));
    }
    if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
        return Err(AppError::InvalidGeometry(format!(
            "latitude must be within [-90, 90], got {lat}"
        )));
    }
    if !lng.is_finite() {
        return Err(AppError::InvalidGeometry(format!(
            "longitude must be finite, got {lng}"
        )));
    }
    if !circle.radius_km.is_finite() || circle.radius_km < 0.0 {
        return Err(AppError::InvalidGeometry(format!(
            "radius must be a non-negative finite number of kilometers, got {}",
            circle.radius_km
        )));
    }
    Ok(())
}

/// Approximates a circle on the earth by a closed ring of vertices.
///
/// Vertex `i` sits at bearing `i * 360 / vertex_count` from the center, starting due north and
/// going clockwise. The ring holds `vertex_count + 1` points and the last one is a copy of the
/// first, so it is closed exactly rather than up to rounding. A zero radius yields the center
/// repeated.
///
/// # Errors
///
/// * `AppError::InvalidGeometry` - fewer than 3 or more than [`MAX_VERTEX_COUNT`] vertices, a negative or non-finite radius, or a
///   center that is not a valid coordinate.
pub fn project(circle: &GeoCircle, strategy: ProjectionStrategy) -> Result<Vec<Point>, AppError> {
    validate(circle)?;

    let projector = strategy.projector();
    let step = 360.0 / circle.vertex_count as f64;

    let mut ring = (0..circle.vertex_count)
        .map(|i| projector.offset(&circle.center, circle.radius_km, i as f64 * step))
        .collect::<Vec<Point>>();

    if let Some(first) = ring.first().copied() {
        ring.push(first);
    }

    Ok(ring)
}

pub fn to_geo_polygon(ring: &[Point]) -> Polygon<f64> {
    Polygon::new(
        LineString::from(
            ring.iter()
                .map(|Point { lat, lng }| coord! { x: lng.inner(), y: lat.inner() })
                .collect::<Vec<Coord<f64>>>(),
        ),
        vec![],
    )
}

/// Wraps a projected ring into a GeoJSON polygon feature. Positions are `[lng, lat]`.
pub fn to_geojson_feature(ring: &[Point], properties: Option<JsonObject>) -> Feature {
    let positions = ring
        .iter()
        .map(|Point { lat, lng }| vec![lng.inner(), lat.inner()])
        .collect::<Vec<Position>>();

    Feature {
        bbox: None,
        geometry: Some(Geometry::new(Value::Polygon(vec![positions]))),
        id: None,
        properties,
        foreign_members: None,
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use geo::Area;

    fn circle(lat: f64, lng: f64, radius_km: f64, vertex_count: usize) -> GeoCircle {
        GeoCircle {
            center: Point {
                lat: Latitude(lat),
                lng: Longitude(lng),
            },
            radius_km,
            vertex_count,
        }
    }

    #[test]
    fn ring_is_closed_and_has_vertex_count_plus_one_points() {
        for strategy in [ProjectionStrategy::GreatCircle, ProjectionStrategy::PlanarApprox] {
            for vertex_count in [3, 4, 7, 64, MAX_VERTEX_COUNT] {
                let ring = project(&circle(12.9716, 77.5946, 2.5, vertex_count), strategy).unwrap();
                assert_eq!(ring.len(), vertex_count + 1);
                assert_eq!(ring.first(), ring.last());
            }
        }
    }

    #[test]
    fn great_circle_cardinal_vertices() {
        let center = circle(20.5937, 78.9629, 5.0, 4);
        let ring = project(&center, ProjectionStrategy::GreatCircle).unwrap();

        assert_eq!(ring.len(), 5);
        assert_eq!(ring[0], ring[4]);

        // North
        assert!(ring[0].lat.inner() > 20.5937);
        assert!((ring[0].lng.inner() - 78.9629).abs() < 1e-9);
        assert!((distance_between_in_meters(&center.center, &ring[0]) - 5000.0).abs() < 1.0);

        // East
        assert!(ring[1].lng.inner() > 78.9629);

        // South
        assert!(ring[2].lat.inner() < 20.5937);
        assert!((ring[2].lng.inner() - 78.9629).abs() < 1e-9);
        assert!((distance_between_in_meters(&center.center, &ring[2]) - 5000.0).abs() < 1.0);
    }

    #[test]
    fn every_great_circle_vertex_is_at_radius() {
        let center = circle(-33.8688, 151.2093, 12.0, 64);
        let ring = project(&center, ProjectionStrategy::GreatCircle).unwrap();

        for vertex in ring.iter() {
            assert!((distance_between_in_meters(&center.center, vertex) - 12_000.0).abs() < 1.0);
        }
    }

    #[test]
    fn strategies_converge_near_equator() {
        for radius_km in [0.5, 5.0, 10.0] {
            let center = circle(0.5, 32.58, radius_km, 64);
            let precise = project(&center, ProjectionStrategy::GreatCircle).unwrap();
            let planar = project(&center, ProjectionStrategy::PlanarApprox).unwrap();

            for (a, b) in precise.iter().zip(planar.iter()) {
                assert!((a.lat.inner() - b.lat.inner()).abs() < 0.01);
                assert!((a.lng.inner() - b.lng.inner()).abs() < 0.01);
            }
        }
    }

    #[test]
    fn zero_radius_repeats_center() {
        let ring = project(&circle(20.0, 78.0, 0.0, 8), ProjectionStrategy::GreatCircle).unwrap();
        assert_eq!(ring.len(), 9);
        for vertex in ring {
            assert!((vertex.lat.inner() - 20.0).abs() < 1e-9);
            assert!((vertex.lng.inner() - 78.0).abs() < 1e-9);
        }
    }

    #[test]
    fn rejects_invalid_geometry() {
        let invalid = [
            circle(20.0, 78.0, 5.0, 2),
            circle(20.0, 78.0, 5.0, MAX_VERTEX_COUNT + 1),
            circle(20.0, 78.0, 5.0, usize::MAX),
            circle(20.0, 78.0, -1.0, 16),
            circle(20.0, 78.0, f64::NAN, 16),
            circle(20.0, 78.0, f64::INFINITY, 16),
            circle(f64::NAN, 78.0, 5.0, 16),
            circle(91.0, 78.0, 5.0, 16),
            circle(20.0, f64::NAN, 5.0, 16),
        ];

        for geometry in invalid.iter() {
            let err = project(geometry, ProjectionStrategy::GreatCircle).unwrap_err();
            assert_eq!(err.code(), "INVALID_GEOMETRY");
        }
    }

    #[test]
    fn longitudes_wrap_across_antimeridian() {
        let ring = project(&circle(0.0, 179.99, 5.0, 16), ProjectionStrategy::GreatCircle).unwrap();
        assert!(ring
            .iter()
            .all(|vertex| (-180.0..180.0).contains(&vertex.lng.inner())));
        assert!(ring.iter().any(|vertex| vertex.lng.inner() < 0.0));
    }

    #[test]
    fn polygon_and_feature_follow_lng_lat_order() {
        let ring = project(&circle(20.5937, 78.9629, 1.0, 32), ProjectionStrategy::GreatCircle).unwrap();

        let polygon = to_geo_polygon(&ring);
        assert_eq!(polygon.exterior().0.len(), 33);
        assert_eq!(polygon.exterior().0[0].x, ring[0].lng.inner());
        assert!(polygon.unsigned_area() > 0.0);

        let feature = to_geojson_feature(&ring, None);
        match feature.geometry.unwrap().value {
            Value::Polygon(rings) => {
                assert_eq!(rings.len(), 1);
                assert_eq!(rings[0][0], vec![ring[0].lng.inner(), ring[0].lat.inner()]);
            }
            other => panic!("expected a polygon, got {other:?}"),
        }
    }
}
