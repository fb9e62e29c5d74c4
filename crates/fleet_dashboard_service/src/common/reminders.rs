/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/

use crate::common::types::*;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use tracing::warn;

/// Parses an RFC 3339 timestamp, or a bare `YYYY-MM-DD` date taken as UTC midnight.
pub fn parse_expiry(expiry: &str) -> Option<DateTime<Utc>> {
    let expiry = expiry.trim();

    DateTime::parse_from_rfc3339(expiry)
        .map(|datetime| datetime.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(expiry, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
                .map(|datetime| Utc.from_utc_datetime(&datetime))
        })
}

/// Splits document reminders into the three dashboard tabs as of `now`.
///
/// Resolved reminders always go to `resolved`. An unresolved reminder expiring exactly at `now` is
/// still upcoming. Unresolved reminders without a readable expiry date are left out.
pub fn partition_reminders(
    records: Vec<VehicleDocumentRecord>,
    now: DateTime<Utc>,
) -> ReminderBoard {
    let mut board = ReminderBoard::default();

    for record in records {
        if record.resolved {
            board.resolved.push(record);
            continue;
        }

        match record.expiry_date.as_deref().and_then(parse_expiry) {
            Some(expiry) if expiry >= now => board.upcoming.push(record),
            Some(_) => board.overdue.push(record),
            None => {
                warn!(tag = "[Unreadable Reminder Expiry]", reminder_id = ?record.id, expiry_date = ?record.expiry_date);
            }
        }
    }

    board
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    fn reminder(id: &str, expiry_date: Option<&str>, resolved: bool) -> VehicleDocumentRecord {
        VehicleDocumentRecord {
            id: Some(id.to_string()),
            expiry_date: expiry_date.map(str::to_string),
            resolved,
            ..Default::default()
        }
    }

    fn ids(records: &[VehicleDocumentRecord]) -> Vec<&str> {
        records
            .iter()
            .filter_map(|record| record.id.as_deref())
            .collect()
    }

    #[test]
    fn parses_both_expiry_formats() {
        assert_eq!(
            parse_expiry("2024-03-01"),
            Some(Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap())
        );
        assert_eq!(
            parse_expiry("2024-03-01T10:30:00.000Z"),
            Some(Utc.with_ymd_and_hms(2024, 3, 1, 10, 30, 0).unwrap())
        );
        assert_eq!(
            parse_expiry("2024-03-01T16:00:00+05:30"),
            Some(Utc.with_ymd_and_hms(2024, 3, 1, 10, 30, 0).unwrap())
        );
        assert_eq!(parse_expiry("next tuesday"), None);
    }

    #[test]
    fn partitions_reminders_around_now() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let records = vec![
            reminder("future", Some("2024-06-30"), false),
            reminder("today", Some("2024-03-01"), false),
            reminder("past", Some("2024-01-15T08:00:00Z"), false),
            reminder("done-past", Some("2023-01-01"), true),
            reminder("done-undated", None, true),
            reminder("undated", None, false),
            reminder("garbled", Some("soon"), false),
        ];

        let board = partition_reminders(records, now);

        assert_eq!(ids(&board.upcoming), vec!["future", "today"]);
        assert_eq!(ids(&board.overdue), vec!["past"]);
        assert_eq!(ids(&board.resolved), vec!["done-past", "done-undated"]);
    }
}
