/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/

use crate::skipped_records;
use crate::tools::prometheus::SKIPPED_RECORDS;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

/// List responses of the fleet API come either bare or wrapped in `data`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum ApiEnvelope {
    Wrapped { data: Vec<Value> },
    Raw(Vec<Value>),
}

impl ApiEnvelope {
    pub fn into_records(self) -> Vec<Value> {
        match self {
            ApiEnvelope::Wrapped { data } => data,
            ApiEnvelope::Raw(records) => records,
        }
    }
}

/// Decodes every record of a list response on its own.
///
/// A record that is `null` or does not decode into `T` becomes `None` at its position in the list, so
/// one bad entry never fails the rest of the batch.
pub fn normalize_records<T: DeserializeOwned>(source: &str, envelope: ApiEnvelope) -> Vec<Option<T>> {
    let records = envelope
        .into_records()
        .into_iter()
        .enumerate()
        .map(|(index, record)| {
            if record.is_null() {
                warn!(tag = "[Malformed Upstream Record]", source = source, index = index, error = "null record");
                return None;
            }
            serde_json::from_value::<T>(record)
                .map_err(|err| {
                    warn!(tag = "[Malformed Upstream Record]", source = source, index = index, error = %err);
                })
                .ok()
        })
        .collect::<Vec<Option<T>>>();

    let skipped = records.iter().filter(|record| record.is_none()).count();
    if skipped > 0 {
        skipped_records!(source, skipped);
    }

    records
}
