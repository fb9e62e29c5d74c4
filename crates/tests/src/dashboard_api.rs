/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/

use crate::fleet_upstream::{spawn_fleet_api, FLEET_TOKEN};
use actix_web::{http::StatusCode, test, web, App};
use fleet_dashboard_service::{
    domain::api,
    environment::{AppConfig, AppState, GeofenceOverlayConfig},
    tools::{
        error::AppError,
        logger::{LogLevel, LoggerConfig},
    },
};
use serde_json::{json, Value};

fn app_state(fleet_api_base_url: String) -> AppState {
    AppState::new(AppConfig {
        port: 8081,
        workers: 1,
        logger_cfg: LoggerConfig {
            level: LogLevel::INFO,
            log_to_file: false,
            log_dir: "./logs".to_string(),
        },
        fleet_api_base_url,
        request_timeout: 5000,
        max_allowed_req_size: 512_000,
        geofence_overlay_cfg: GeofenceOverlayConfig {
            vertex_count: 16,
            max_vertex_count: 256,
            display_scale_factor: 3.0,
            default_strategy: "greatCircle".to_string(),
        },
    })
    .expect("Failed to build app state")
}

macro_rules! dashboard_app {
    ($fleet_api_base_url:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new(app_state($fleet_api_base_url)))
                .app_data(web::JsonConfig::default().error_handler(|err, _| {
                    AppError::UnprocessibleRequest(err.to_string()).into()
                }))
                .configure(api::handler),
        )
        .await
    };
}

fn bearer() -> (&'static str, String) {
    ("Authorization", format!("Bearer {FLEET_TOKEN}"))
}

/// Nothing listens on the discard port, so any upstream call would fail loudly.
fn unreachable_fleet_api() -> String {
    "http://127.0.0.1:9/veyza-api/v0".to_string()
}

fn counts(buckets: &Value) -> Vec<u64> {
    buckets
        .as_array()
        .map(|buckets| {
            buckets
                .iter()
                .filter_map(|bucket| bucket["count"].as_u64())
                .collect()
        })
        .unwrap_or_default()
}

#[actix_web::test]
async fn health_check_is_up() {
    let app = dashboard_app!(unreachable_fleet_api());

    let req = test::TestRequest::get().uri("/healthcheck").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body, json!({ "result": "Service Is Up" }));
}

#[actix_web::test]
async fn circle_projection_returns_closed_ring() {
    let app = dashboard_app!(unreachable_fleet_api());

    let req = test::TestRequest::post()
        .uri("/ui/geofence/circle")
        .set_json(json!({
            "center": { "lat": 20.5937, "lng": 78.9629 },
            "radiusKm": 5,
            "vertexCount": 4
        }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["strategy"], json!("greatCircle"));
    assert_eq!(body["vertexCount"], json!(4));

    let ring = body["ring"].as_array().expect("ring is an array");
    assert_eq!(ring.len(), 5);
    assert_eq!(ring[0], ring[4]);
    assert!(ring[0]["lat"].as_f64().unwrap_or_default() > 20.5937);
    assert!(ring[2]["lat"].as_f64().unwrap_or_default() < 20.5937);
}

#[actix_web::test]
async fn circle_projection_uses_configured_vertex_count_and_requested_strategy() {
    let app = dashboard_app!(unreachable_fleet_api());

    let req = test::TestRequest::post()
        .uri("/ui/geofence/circle")
        .set_json(json!({
            "center": { "lat": 0.5, "lng": 32.58 },
            "radiusKm": 2.5,
            "strategy": "planarApprox"
        }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["strategy"], json!("planarApprox"));
    assert_eq!(body["ring"].as_array().map(Vec::len), Some(17));
}

#[actix_web::test]
async fn invalid_circle_is_a_bad_request() {
    let app = dashboard_app!(unreachable_fleet_api());

    let req = test::TestRequest::post()
        .uri("/ui/geofence/circle")
        .set_json(json!({
            "center": { "lat": 20.5937, "lng": 78.9629 },
            "radiusKm": 5,
            "vertexCount": 2
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["errorCode"], json!("INVALID_GEOMETRY"));
}

#[actix_web::test]
async fn oversized_vertex_count_is_a_bad_request() {
    let app = dashboard_app!(unreachable_fleet_api());

    for vertex_count in [json!(257), json!(u64::MAX)] {
        let req = test::TestRequest::post()
            .uri("/ui/geofence/circle")
            .set_json(json!({
                "center": { "lat": 20.5937, "lng": 78.9629 },
                "radiusKm": 5,
                "vertexCount": vertex_count
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["errorCode"], json!("INVALID_GEOMETRY"));
    }
}

#[actix_web::test]
async fn undecodable_circle_body_is_unprocessible() {
    let app = dashboard_app!(unreachable_fleet_api());

    let req = test::TestRequest::post()
        .uri("/ui/geofence/circle")
        .set_json(json!({ "radiusKm": "five" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[actix_web::test]
async fn authenticated_endpoints_require_bearer_token() {
    let app = dashboard_app!(unreachable_fleet_api());

    for uri in [
        "/ui/fleet/utilization",
        "/ui/fleet/status",
        "/ui/geofences/overlay",
        "/ui/documents/reminders",
    ] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "{uri}");

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["errorCode"], json!("MISSING_CREDENTIAL"), "{uri}");
    }
}

#[actix_web::test]
async fn fleet_utilization_aggregates_upstream_records() {
    let app = dashboard_app!(format!("{}/veyza-api/v0", spawn_fleet_api()));

    let req = test::TestRequest::get()
        .uri("/ui/fleet/utilization")
        .insert_header(bearer())
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["skippedRecords"], json!(1));

    let summary = body["summary"].as_array().expect("summary is an array");
    assert_eq!(summary.len(), 2);

    assert_eq!(summary[0]["vehicleNumber"], json!("GJ19Y9782"));
    assert_eq!(summary[0]["unschedStoppage"], json!(2));
    assert_eq!(summary[0]["unschedTime"].as_f64(), Some(3000.0));
    assert_eq!(summary[0]["gfStops"], json!(2));
    assert_eq!(summary[0]["dailyRunning"], json!(2));
    assert_eq!(summary[0]["km"].as_f64(), Some(130.5));

    assert_eq!(summary[1]["vehicleNumber"], json!("KA01AB1234"));
    assert_eq!(summary[1]["idling"], json!(3));
    assert_eq!(summary[1]["idlingTime"].as_f64(), Some(0.0));
    assert_eq!(summary[1]["dailyRunning"], json!(0));

    let distributions = &body["distributions"];
    assert_eq!(counts(&distributions["unscheduled"]), vec![1, 0, 1]);
    assert_eq!(counts(&distributions["geofence"]), vec![1, 1, 1]);
    assert_eq!(counts(&distributions["idling"]), vec![1, 0, 0]);
    assert_eq!(counts(&distributions["running"]), vec![2, 0, 0]);
    assert_eq!(distributions["running"][1]["label"], json!("100-200 km"));
}

#[actix_web::test]
async fn upstream_rejection_is_a_bad_gateway() {
    let app = dashboard_app!(format!("{}/veyza-api/v0", spawn_fleet_api()));

    let req = test::TestRequest::get()
        .uri("/ui/fleet/utilization")
        .insert_header(("Authorization", "Bearer someone-else"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["errorCode"], json!("EXTERNAL_API_CALL_ERROR"));
}

#[actix_web::test]
async fn upstream_failure_is_a_bad_gateway() {
    let app = dashboard_app!(format!("{}/broken/v0", spawn_fleet_api()));

    let req = test::TestRequest::get()
        .uri("/ui/fleet/utilization")
        .insert_header(bearer())
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
}

#[actix_web::test]
async fn geofence_overlay_projects_matching_fences() {
    let app = dashboard_app!(format!("{}/veyza-api/v0", spawn_fleet_api()));

    let req = test::TestRequest::get()
        .uri("/ui/geofences/overlay?search=surat&strategy=planarApprox")
        .insert_header(bearer())
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["strategy"], json!("planarApprox"));
    assert_eq!(body["features"]["type"], json!("FeatureCollection"));

    let features = body["features"]["features"]
        .as_array()
        .expect("features is an array");
    assert_eq!(features.len(), 2);
    assert_eq!(features[0]["properties"]["id"], json!("g1"));
    assert_eq!(features[1]["properties"]["radiusKm"].as_f64(), Some(0.8));

    let ring = features[0]["geometry"]["coordinates"][0]
        .as_array()
        .expect("ring is an array");
    assert_eq!(ring.len(), 17);
    assert_eq!(ring.first(), ring.last());

    let rejected = body["rejected"].as_array().expect("rejected is an array");
    assert_eq!(rejected.len(), 1);
    assert_eq!(rejected[0]["name"], json!("Surat Broken"));
}

#[actix_web::test]
async fn fleet_status_counts_whole_fleet_and_filters_list() {
    let app = dashboard_app!(format!("{}/veyza-api/v0", spawn_fleet_api()));

    let req = test::TestRequest::get()
        .uri("/ui/fleet/status?search=gj")
        .insert_header(bearer())
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(
        body["counts"],
        json!({ "all": 4, "running": 1, "stopped": 1, "idle": 1, "disconnected": 1 })
    );
    assert_eq!(body["skippedRecords"], json!(1));
    assert_eq!(
        body["vehicles"]
            .as_array()
            .map(|vehicles| vehicles.iter().map(|vehicle| vehicle["vehicleNumber"].clone()).collect::<Vec<Value>>()),
        Some(vec![json!("GJ19Y9782"), json!("GJ05AB0001")])
    );
}

#[actix_web::test]
async fn document_reminders_are_partitioned() {
    let app = dashboard_app!(format!("{}/veyza-api/v0", spawn_fleet_api()));

    let req = test::TestRequest::get()
        .uri("/ui/documents/reminders")
        .insert_header(bearer())
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    let ids = |tab: &str| {
        body[tab]
            .as_array()
            .map(|records| records.iter().map(|record| record["_id"].clone()).collect::<Vec<Value>>())
            .unwrap_or_default()
    };

    assert_eq!(ids("upcoming"), vec![json!("d1")]);
    assert_eq!(ids("overdue"), vec![json!("d2")]);
    assert_eq!(ids("resolved"), vec![json!("d3")]);
}
