use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

pub const DEADLINE_DATE_FORMAT: &str = "%Y-%m-%d";

/// Completion deadline for one learning roadmap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deadline {
    pub roadmap_id: String,
    pub deadline: NaiveDate,
    /// Local wall-clock time without an offset, e.g. `2026-10-01T10:00:00.123456`.
    #[serde(deserialize_with = "local_timestamp")]
    pub created_at: NaiveDateTime,
    #[serde(deserialize_with = "local_timestamp")]
    pub updated_at: NaiveDateTime,
}

/// Accepts naive ISO-8601 timestamps, and offset-bearing RFC 3339 ones
/// converted to local time.
fn local_timestamp<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
    let raw = String::deserialize(deserializer)?;
    if let Ok(naive) = raw.parse::<NaiveDateTime>() {
        return Ok(naive);
    }
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Local).naive_local())
        .map_err(|e| serde::de::Error::custom(format!("invalid timestamp {raw:?}: {e}")))
}

impl Deadline {
    pub fn new(roadmap_id: String, deadline: NaiveDate) -> Self {
        let now = Local::now().naive_local();
        Self {
            roadmap_id,
            deadline,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn reschedule(&mut self, deadline: NaiveDate) {
        self.deadline = deadline;
        self.updated_at = Local::now().naive_local();
    }

    /// Whole calendar days from `today` to the deadline; negative once overdue.
    pub fn days_remaining(&self, today: NaiveDate) -> i64 {
        (self.deadline - today).num_days()
    }

    pub fn status(self, today: NaiveDate) -> DeadlineStatus {
        let days_remaining = self.days_remaining(today);
        DeadlineStatus {
            deadline: self,
            days_remaining,
        }
    }
}

/// A deadline as returned to callers, with `days_remaining` computed on read.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeadlineStatus {
    #[serde(flatten)]
    pub deadline: Deadline,
    pub days_remaining: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, DEADLINE_DATE_FORMAT).unwrap()
    }

    #[test]
    fn test_days_remaining() {
        let d = Deadline::new("rm-1".into(), date("2026-11-01"));
        assert_eq!(d.days_remaining(date("2026-10-16")), 16);
        assert_eq!(d.days_remaining(date("2026-11-01")), 0);
        assert_eq!(d.days_remaining(date("2026-11-03")), -2);
    }

    #[test]
    fn test_reschedule_keeps_created_at() {
        let mut d = Deadline::new("rm-1".into(), date("2026-11-01"));
        let created = d.created_at;
        d.reschedule(date("2026-12-01"));
        assert_eq!(d.created_at, created);
        assert!(d.updated_at >= created);
        assert_eq!(d.deadline, date("2026-12-01"));
    }

    #[test]
    fn test_status_serializes_flat() {
        let d = Deadline::new("rm-1".into(), date("2026-11-01"));
        let json = serde_json::to_value(d.status(date("2026-10-31"))).unwrap();
        assert_eq!(json["roadmap_id"], "rm-1");
        assert_eq!(json["deadline"], "2026-11-01");
        assert_eq!(json["days_remaining"], 1);
    }

    #[test]
    fn test_reads_naive_and_offset_timestamps() {
        let naive: Deadline = serde_json::from_str(
            r#"{"roadmap_id":"rm-1","deadline":"2026-12-01","created_at":"2026-10-01T10:00:00.123456","updated_at":"2026-10-02T08:30:00"}"#,
        )
        .unwrap();
        assert_eq!(naive.created_at.to_string(), "2026-10-01 10:00:00.123456");
        assert_eq!(naive.updated_at.to_string(), "2026-10-02 08:30:00");

        let offset: Deadline = serde_json::from_str(
            r#"{"roadmap_id":"rm-1","deadline":"2026-12-01","created_at":"2026-10-01T10:00:00+00:00","updated_at":"2026-10-01T10:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(offset.created_at, offset.updated_at);

        let bad = serde_json::from_str::<Deadline>(
            r#"{"roadmap_id":"rm-1","deadline":"2026-12-01","created_at":"yesterday","updated_at":"yesterday"}"#,
        );
        assert!(bad.is_err());
    }
}
