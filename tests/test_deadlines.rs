use chrono::{Duration, Local};
use skillgap::application::deadline::DeadlineUseCase;
use skillgap::domain::error::DomainError;
use skillgap::infrastructure::json::deadline_repo::JsonDeadlineRepo;
use std::sync::Arc;
use tempfile::TempDir;

fn setup(dir: &TempDir) -> DeadlineUseCase {
    let repo = JsonDeadlineRepo::open(dir.path().join("data").join("deadlines.json")).unwrap();
    DeadlineUseCase::new(Arc::new(repo))
}

fn in_days(days: i64) -> String {
    (Local::now().date_naive() + Duration::days(days))
        .format("%Y-%m-%d")
        .to_string()
}

#[test]
fn test_file_created_empty() {
    let dir = TempDir::new().unwrap();
    let _uc = setup(&dir);
    let raw = std::fs::read_to_string(dir.path().join("data/deadlines.json")).unwrap();
    assert_eq!(raw, "{}");
}

#[test]
fn test_set_and_get_deadline() {
    let dir = TempDir::new().unwrap();
    let uc = setup(&dir);

    let status = uc.set("roadmap-42", &in_days(10)).unwrap();
    assert_eq!(status.deadline.roadmap_id, "roadmap-42");
    assert_eq!(status.days_remaining, 10);

    let fetched = uc.get("roadmap-42").unwrap().unwrap();
    assert_eq!(fetched.days_remaining, 10);
    assert_eq!(fetched.deadline.deadline, status.deadline.deadline);
}

#[test]
fn test_overdue_is_negative() {
    let dir = TempDir::new().unwrap();
    let uc = setup(&dir);
    uc.set("late", &in_days(-3)).unwrap();
    assert_eq!(uc.get("late").unwrap().unwrap().days_remaining, -3);
}

#[test]
fn test_update_keeps_created_at() {
    let dir = TempDir::new().unwrap();
    let uc = setup(&dir);
    let first = uc.set("rm", &in_days(5)).unwrap();
    let second = uc.set("rm", &in_days(30)).unwrap();

    assert_eq!(second.deadline.created_at, first.deadline.created_at);
    assert!(second.deadline.updated_at >= first.deadline.updated_at);
    assert_eq!(second.days_remaining, 30);
}

#[test]
fn test_invalid_date_rejected() {
    let dir = TempDir::new().unwrap();
    let uc = setup(&dir);
    for bad in ["2026/10/16", "next week", "2026-13-01", ""] {
        let err = uc.set("rm", bad).unwrap_err();
        assert!(matches!(err, DomainError::InvalidInput(_)), "{bad} should be rejected");
    }
    assert!(uc.get("rm").unwrap().is_none());
}

#[test]
fn test_empty_roadmap_id_rejected() {
    let dir = TempDir::new().unwrap();
    let uc = setup(&dir);
    assert!(matches!(uc.set("  ", &in_days(1)), Err(DomainError::InvalidInput(_))));
}

#[test]
fn test_delete_deadline() {
    let dir = TempDir::new().unwrap();
    let uc = setup(&dir);
    uc.set("rm", &in_days(1)).unwrap();

    assert!(uc.delete("rm").unwrap());
    assert!(!uc.delete("rm").unwrap());
    assert!(uc.get("rm").unwrap().is_none());
}

#[test]
fn test_deadlines_persist_in_json() {
    let dir = TempDir::new().unwrap();
    {
        let uc = setup(&dir);
        uc.set("a", &in_days(2)).unwrap();
        uc.set("b", &in_days(4)).unwrap();
    }
    let uc = setup(&dir);
    assert_eq!(uc.get("b").unwrap().unwrap().days_remaining, 4);

    let raw = std::fs::read_to_string(dir.path().join("data/deadlines.json")).unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(json["a"]["roadmap_id"], "a");
    assert_eq!(json["a"]["deadline"], serde_json::Value::String(in_days(2)));
    assert!(json["a"].get("days_remaining").is_none());
}

#[test]
fn test_corrupt_file_is_parse_error() {
    let dir = TempDir::new().unwrap();
    let uc = setup(&dir);
    std::fs::write(dir.path().join("data/deadlines.json"), "not json").unwrap();
    assert!(matches!(uc.get("rm"), Err(DomainError::Parse(_))));
}

#[test]
fn test_reads_file_with_naive_timestamps() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("data/deadlines.json");
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    let deadline = in_days(7);
    // Offset-free isoformat timestamps, two-space indent.
    let existing = format!(
        r#"{{
  "rm-1": {{
    "roadmap_id": "rm-1",
    "deadline": "{deadline}",
    "created_at": "2026-10-01T10:00:00.123456",
    "updated_at": "2026-10-01T10:00:00.123456"
  }}
}}"#
    );
    std::fs::write(&path, existing).unwrap();
    let uc = setup(&dir);

    let status = uc.get("rm-1").unwrap().unwrap();
    assert_eq!(status.days_remaining, 7);
    assert_eq!(status.deadline.created_at.to_string(), "2026-10-01 10:00:00.123456");

    uc.set("rm-2", &in_days(1)).unwrap();
    let moved = uc.set("rm-1", &in_days(3)).unwrap();
    assert_eq!(moved.deadline.created_at.to_string(), "2026-10-01 10:00:00.123456");
    assert_eq!(moved.days_remaining, 3);

    let raw = std::fs::read_to_string(&path).unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let written = json["rm-2"]["created_at"].as_str().unwrap();
    assert!(chrono::NaiveDateTime::parse_from_str(written, "%Y-%m-%dT%H:%M:%S%.f").is_ok());
}
