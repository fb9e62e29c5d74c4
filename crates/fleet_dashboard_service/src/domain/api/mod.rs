/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/
pub mod ui;

use actix_web::{http::header::AUTHORIZATION, web::ServiceConfig, HttpRequest};

use crate::{common::types::Credential, tools::error::AppError};

pub fn handler(config: &mut ServiceConfig) {
    config
        .service(ui::healthcheck::health_check)
        .service(ui::fleet::fleet_utilization)
        .service(ui::fleet::fleet_status)
        .service(ui::geofence::geofence_overlay)
        .service(ui::geofence::project_circle)
        .service(ui::documents::document_reminders);
}

/// Reads the dashboard session token from `Authorization: Bearer <token>`.
pub fn bearer_credential(req: &HttpRequest) -> Result<Credential, AppError> {
    req.headers()
        .get(AUTHORIZATION)
        .and_then(|header_value| header_value.to_str().ok())
        .and_then(|authorization| {
            let (scheme, token) = authorization.trim().split_once(' ')?;
            scheme.eq_ignore_ascii_case("bearer").then(|| token.trim())
        })
        .filter(|token| !token.is_empty())
        .map(|token| Credential(token.to_string()))
        .ok_or(AppError::MissingCredential)
}
