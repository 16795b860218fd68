//! End-to-end behavior of production and development loggers.

mod common;

use chrono::Local;
use common::{date, json_lines, with_message, Captured};
use daylog::{ConsoleWriter, Logger, Mode};
use std::collections::HashSet;
use std::fs;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

#[test]
fn test_production_logger_writes_json_lines() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path().join("t1");
    let captured = Captured::default();
    let logger = Logger::builder()
        .mode(Mode::Production)
        .path(&dir)
        .console(captured.console())
        .build()
        .unwrap();

    let today = logger.last_rotation();
    assert_eq!(today, Local::now().date_naive());
    let file = dir.join(format!("{}.txt", today.format("%Y-%m-%d")));
    assert_eq!(logger.current_file(), Some(file.clone()));
    assert!(file.is_file());

    daylog::info!(logger, k = "v", "hello");
    drop(logger);

    let raw = fs::read_to_string(&file).unwrap();
    let line = raw
        .lines()
        .find(|l| l.contains("hello"))
        .expect("record missing from file");
    assert!(line.contains(r#""level":"INFO""#), "{line}");
    assert!(line.contains(r#""k":"v""#), "{line}");
    assert!(captured.contents().contains(line));

    let records = json_lines(&file);
    let hello = with_message(&records, "hello");
    assert_eq!(hello.len(), 1);
    assert!(hello[0]["filename"].as_str().unwrap().ends_with("scenarios.rs"));
    assert!(hello[0]["timestamp"].is_string());
}

#[test]
fn test_development_logger_prints_to_console_only() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path().join("dev");
    let captured = Captured::default();
    let logger = Logger::builder()
        .mode(Mode::Development)
        .path(&dir)
        .console(captured.console())
        .build()
        .unwrap();

    daylog::error!(logger, code = 7, "boom");

    let out = captured.contents();
    assert!(out.contains("boom"));
    assert!(out.contains("ERROR"));
    assert!(logger.current_file().is_none());
    assert!(!dir.exists());
}

#[test]
fn test_day_change_moves_to_new_file() {
    let tmp = tempfile::tempdir().unwrap();
    let logger = Logger::builder()
        .mode(Mode::Production)
        .path(tmp.path())
        .console(Captured::default().console())
        .start_date(date(2024, 2, 28))
        .rotation_watcher(false)
        .build()
        .unwrap();

    for seq in 0..3 {
        daylog::info!(logger, seq, "before");
    }
    let old = logger.current_file().unwrap();

    assert!(logger.rotate_if_needed(date(2024, 2, 29)).unwrap());
    assert!(!logger.rotate_if_needed(date(2024, 2, 29)).unwrap());
    let new = logger.current_file().unwrap();
    assert_eq!(old, tmp.path().join("2024-02-28.txt"));
    assert_eq!(new, tmp.path().join("2024-02-29.txt"));

    for seq in 0..2 {
        daylog::info!(logger, seq, "after");
    }

    let old_records = json_lines(&old);
    assert_eq!(old_records.len(), 3);
    assert_eq!(with_message(&old_records, "before").len(), 3);

    let new_records = json_lines(&new);
    assert_eq!(with_message(&new_records, "after").len(), 2);
    assert!(with_message(&new_records, "before").is_empty());
    assert_eq!(with_message(&new_records, "rotated log file").len(), 1);
}

#[test]
fn test_rotation_under_concurrent_emitters() {
    const THREADS: usize = 8;
    const PER_THREAD: usize = 250;

    let tmp = tempfile::tempdir().unwrap();
    let logger = Arc::new(
        Logger::builder()
            .mode(Mode::Production)
            .path(tmp.path())
            .console(ConsoleWriter::custom(io::sink))
            .start_date(date(2024, 3, 1))
            .rotation_watcher(false)
            .build()
            .unwrap(),
    );
    let emitted = Arc::new(AtomicUsize::new(0));

    let handles: Vec<_> = (0..THREADS)
        .map(|worker| {
            let logger = Arc::clone(&logger);
            let emitted = Arc::clone(&emitted);
            thread::spawn(move || {
                for seq in 0..PER_THREAD {
                    daylog::info!(logger, worker, seq, "record");
                    emitted.fetch_add(1, Ordering::Relaxed);
                }
            })
        })
        .collect();

    while emitted.load(Ordering::Relaxed) < THREADS * PER_THREAD / 4 {
        thread::yield_now();
    }
    assert!(logger.rotate_if_needed(date(2024, 3, 2)).unwrap());

    for handle in handles {
        handle.join().unwrap();
    }

    let mut seen = HashSet::new();
    for name in ["2024-03-01.txt", "2024-03-02.txt"] {
        let records = json_lines(&tmp.path().join(name));
        for record in with_message(&records, "record") {
            let key = (
                record["worker"].as_u64().unwrap(),
                record["seq"].as_u64().unwrap(),
            );
            assert!(seen.insert(key), "duplicate record {key:?}");
        }
    }
    assert_eq!(seen.len(), THREADS * PER_THREAD);
}

#[test]
fn test_two_loggers_share_a_day_file() {
    let tmp = tempfile::tempdir().unwrap();
    let build = || {
        Logger::builder()
            .mode(Mode::Production)
            .path(tmp.path())
            .console(ConsoleWriter::custom(io::sink))
            .start_date(date(2024, 4, 1))
            .rotation_watcher(false)
            .build()
            .unwrap()
    };

    let first = build();
    daylog::info!(first, "from first");
    let second = build();
    daylog::info!(second, "from second");
    drop((first, second));

    let records = json_lines(&tmp.path().join("2024-04-01.txt"));
    assert_eq!(with_message(&records, "from first").len(), 1);
    assert_eq!(with_message(&records, "from second").len(), 1);
}
