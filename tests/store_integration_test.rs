use chrono::{TimeZone, Utc};
use logkeep::error::LogkeepError;
use logkeep::store::{
    decode_line, encode_line, FileLockPool, FixedClock, Level, LogEntry, LogQuery, LogStore,
    TypeCounter,
};
use std::sync::Arc;
use tempfile::TempDir;

fn store_at(root: &std::path::Path, clock: &FixedClock) -> LogStore {
    LogStore::with_components(
        root,
        Arc::new(FileLockPool::new()),
        Arc::new(TypeCounter::new()),
        Arc::new(clock.clone()),
    )
}

#[tokio::test]
async fn test_boot_scenario() {
    let temp_dir = TempDir::new().unwrap();
    let created_at = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
    let clock = FixedClock::new(created_at);
    let store = store_at(temp_dir.path(), &clock);

    let stored = store
        .write(&LogEntry::new(Level::Info, 3, "boot", "svc-a"))
        .await
        .unwrap();

    let content = std::fs::read_to_string(temp_dir.path().join("INFO/2024-01-02-3.txt")).unwrap();
    assert_eq!(content, "[2024-01-02T03-04-05Z]-[svc-a]-[3]:boot\n");

    let found = store
        .read(&LogQuery::at(created_at).level(Level::Info))
        .await
        .unwrap();
    assert_eq!(found, vec![stored]);
    assert_eq!(found[0].message, "boot");
    assert_eq!(found[0].location, "svc-a");
    assert_eq!(found[0].severity, 3);
}

#[tokio::test]
async fn test_malformed_line_is_skipped_during_read() {
    let temp_dir = TempDir::new().unwrap();
    let info = temp_dir.path().join("INFO");
    std::fs::create_dir_all(&info).unwrap();
    std::fs::write(
        info.join("2024-01-02-3.txt"),
        "[2024-01-02T03-04-05Z]-[svc-a]-[3]:boot\n[2024-01-02T03-04-05Z]-[svc-a]-[3]boot\n",
    )
    .unwrap();

    let store = LogStore::new(temp_dir.path());
    let query = LogQuery::at(Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap());
    let found = store.read(&query).await.unwrap();

    assert_eq!(found.len(), 1);
    assert_eq!(found[0].message, "boot");
}

#[tokio::test]
async fn test_write_level_range() {
    let temp_dir = TempDir::new().unwrap();
    let store = LogStore::new(temp_dir.path());

    let result = store.write(&LogEntry::new(Level::All, 3, "x", "y")).await;
    assert!(matches!(result, Err(LogkeepError::InvalidLevel(0))));
    assert!(matches!(Level::from_code(6), Err(LogkeepError::InvalidLevel(6))));

    // Severity is not validated by the store
    for code in 1..=5 {
        let level = Level::from_code(code).unwrap();
        for severity in [0u8, 1, 7, 9] {
            store
                .write(&LogEntry::new(level, severity, "ok", "test"))
                .await
                .unwrap();
        }
        assert_eq!(store.counter().get_level(level), 4);
    }
}

#[tokio::test]
async fn test_query_without_timestamp_is_empty() {
    let temp_dir = TempDir::new().unwrap();
    let store = LogStore::new(temp_dir.path());
    store
        .write(&LogEntry::new(Level::Error, 4, "failure", "db"))
        .await
        .unwrap();

    let query = LogQuery {
        level: Level::Error,
        severity: 4,
        message: "failure".to_string(),
        location: "db".to_string(),
        ..LogQuery::default()
    };
    assert!(store.read(&query).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_level_only_query_ignores_other_fields() {
    let temp_dir = TempDir::new().unwrap();
    let created_at = Utc.with_ymd_and_hms(2024, 3, 4, 5, 6, 7).unwrap();
    let clock = FixedClock::new(created_at);
    let store = store_at(temp_dir.path(), &clock);

    for (level, severity, message) in [
        (Level::Warn, 1, "low disk"),
        (Level::Warn, 6, "very low disk"),
        (Level::Info, 2, "heartbeat"),
    ] {
        store
            .write(&LogEntry::new(level, severity, message, "node-1"))
            .await
            .unwrap();
    }

    let warns = store
        .read(&LogQuery::at(created_at).level(Level::Warn))
        .await
        .unwrap();
    assert_eq!(warns.len(), 2);
    assert!(warns.iter().all(|e| e.level == Level::Warn));

    let all = store.read(&LogQuery::at(created_at)).await.unwrap();
    assert_eq!(all.len(), 3);
    assert_eq!(all[0].level, Level::Info);

    let by_severity = store
        .read(&LogQuery::at(created_at).severity(6))
        .await
        .unwrap();
    assert_eq!(by_severity.len(), 1);
    assert_eq!(by_severity[0].message, "very low disk");
}

#[tokio::test]
async fn test_unreadable_file_does_not_fail_query() {
    let temp_dir = TempDir::new().unwrap();
    let created_at = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
    let clock = FixedClock::new(created_at);
    let store = store_at(temp_dir.path(), &clock);

    store
        .write(&LogEntry::new(Level::Debug, 1, "trace", "svc"))
        .await
        .unwrap();

    // A dangling symlink lists as a file but cannot be opened
    #[cfg(unix)]
    std::os::unix::fs::symlink(
        temp_dir.path().join("missing-target"),
        temp_dir.path().join("DEBUG/0000-broken.txt"),
    )
    .unwrap();

    let found = store.read(&LogQuery::at(created_at)).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].message, "trace");
}

#[test]
fn test_codec_round_trip_for_awkward_text() {
    let created_at = Utc.with_ymd_and_hms(1999, 12, 31, 23, 59, 59).unwrap();
    let samples = [
        ("plain", "main.rs"),
        ("percent % plus + space", "a b"),
        ("multi\nline\r\nmessage", "crates/core/src/lib.rs:10"),
        ("[brackets]-[dashes]:colons", "]-["),
        ("emoji 🚀 and ünïcödé", "модуль"),
    ];

    for (message, location) in samples {
        let entry = LogEntry {
            created_at: Some(created_at),
            ..LogEntry::new(Level::Fatal, 7, message, location)
        };
        let line = encode_line(&entry, &created_at);
        assert_eq!(decode_line(&line, Level::Fatal).unwrap(), entry);
    }
}
