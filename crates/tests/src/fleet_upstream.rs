/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/

//! A stand-in for the fleet REST API, served on an ephemeral local port.

use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer};
use serde_json::{json, Value};

pub const FLEET_TOKEN: &str = "fleet-token";

fn authorized(req: &HttpRequest) -> bool {
    req.headers()
        .get("authorization")
        .and_then(|header_value| header_value.to_str().ok())
        == Some(format!("Bearer {FLEET_TOKEN}").as_str())
}

fn respond(req: &HttpRequest, body: Value) -> HttpResponse {
    if authorized(req) {
        HttpResponse::Ok().json(body)
    } else {
        HttpResponse::Unauthorized().json(json!({ "message": "invalid token" }))
    }
}

async fn daily_status(req: HttpRequest) -> HttpResponse {
    respond(
        &req,
        json!({
            "data": [
                {
                    "vehicleNumber": "GJ19Y9782",
                    "unscheduledStops": [{ "totalTime": 900 }, { "totalTime": 2100 }],
                    "geoFenceStops": [{ "totalTime": 500 }, { "totalTime": 1500 }],
                    "dailyRunning": [{ "distance": "50" }, { "distance": "80.5" }]
                },
                null,
                {
                    "vehicleNumber": "KA01AB1234",
                    "geoFenceStops": [{ "totalTime": 2500 }],
                    "idlingStops": [{ "totalTime": "n/a" }],
                    "idlingCount": 3,
                    "dailyRunning": null
                }
            ]
        }),
    )
}

async fn geofences(req: HttpRequest) -> HttpResponse {
    respond(
        &req,
        json!([
            { "_id": "g1", "name": "Surat Depot", "lat": 21.17, "long": 72.83, "radius": 2, "distance_unit": "km" },
            { "_id": "g2", "name": "Surat Port", "lat": "21.10", "long": "72.70", "radius": 800, "distance_unit": "m" },
            { "_id": "g3", "name": "Surat Broken", "lat": "unknown", "long": 72.0, "radius": 1 },
            { "_id": "g4", "name": "Vadodara Hub", "lat": 22.30, "long": 73.18, "radius": 1.5 }
        ]),
    )
}

async fn live_locations(req: HttpRequest) -> HttpResponse {
    respond(
        &req,
        json!({
            "data": [
                { "_id": "l1", "vehicleNumber": "GJ19Y9782", "status": "Running" },
                { "_id": "l2", "vehicleNumber": "GJ05AB0001", "status": "parked" },
                { "_id": "l3", "vehicleNumber": "KA01AB1234", "status": "idle" },
                { "_id": "l4", "vehicleNumber": "MH12XY0001", "status": "No data since 2 days" },
                "garbage"
            ]
        }),
    )
}

async fn vehicle_documents(req: HttpRequest) -> HttpResponse {
    respond(
        &req,
        json!([
            { "_id": "d1", "vehicleNumber": "GJ19Y9782", "documentType": "Insurance", "expiryDate": "2099-01-01", "resolved": false },
            { "_id": "d2", "vehicleNumber": "GJ19Y9782", "documentType": "PUC", "expiryDate": "2001-05-01T00:00:00.000Z", "resolved": false },
            { "_id": "d3", "vehicleNumber": "KA01AB1234", "documentType": "Permit", "expiryDate": "2001-05-01", "resolved": true }
        ]),
    )
}

async fn failing(_: HttpRequest) -> HttpResponse {
    HttpResponse::InternalServerError().finish()
}

fn routes(config: &mut web::ServiceConfig) {
    config
        .route("/veyza-api/v0/dailyStatus", web::get().to(daily_status))
        .route("/veyza-api/v0/geofences", web::get().to(geofences))
        .route("/veyza-api/v0/get-live-location", web::get().to(live_locations))
        .route("/veyza-api/v0/vehicle-documents", web::get().to(vehicle_documents))
        .route("/broken/v0/dailyStatus", web::get().to(failing));
}

/// Starts the stand-in fleet API and returns its address, e.g. `http://127.0.0.1:40123`.
pub fn spawn_fleet_api() -> String {
    let server = HttpServer::new(|| App::new().configure(routes))
        .workers(1)
        .bind(("127.0.0.1", 0))
        .expect("Failed to bind the fleet API stand-in");

    let address = server
        .addrs()
        .first()
        .copied()
        .expect("Fleet API stand-in has no address");

    actix_web::rt::spawn(server.run());

    format!("http://{address}")
}
