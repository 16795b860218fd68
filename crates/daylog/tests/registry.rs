//! Process-wide default logger.
//!
//! The registry is global, so everything runs in one test.

use daylog::{Category, Mode};
use std::path::Path;
use std::sync::Arc;

#[test]
fn test_registry_lifecycle() {
    let dev = daylog::create_dev_logger();
    assert!(Arc::ptr_eq(&dev, &daylog::get()));
    assert_eq!(dev.mode(), Mode::Development);
    assert_eq!(dev.category(), Category::Service);
    daylog::info!(daylog::get(), "through the default");

    let tmp = tempfile::tempdir().unwrap();
    let prod = daylog::create_prod_logger(Some(tmp.path())).unwrap();
    assert!(Arc::ptr_eq(&prod, &daylog::get()));
    assert_eq!(prod.mode(), Mode::Production);
    assert!(prod.is_rotating());
    assert!(prod.current_file().unwrap().starts_with(tmp.path()));

    let request_dir = tmp.path().join("requests");
    let request = daylog::create_request_logger(Mode::Production, Some(&request_dir)).unwrap();
    assert_eq!(request.category(), Category::Request);
    assert!(request.is_rotating());
    assert!(request.current_file().unwrap().starts_with(&request_dir));
    assert!(Arc::ptr_eq(&prod, &daylog::get()));

    let quiet = daylog::create_request_logger(Mode::Development, None).unwrap();
    assert_eq!(quiet.path(), Path::new("./logs/request_logs/"));
    assert!(quiet.current_file().is_none());

    daylog::create_dev_logger();
    assert!(!Arc::ptr_eq(&prod, &daylog::get()));
    // the registry let go of the production logger
    assert_eq!(Arc::strong_count(&prod), 1);

    // a regular file where the log directory should be
    let blocked = prod.current_file().unwrap();
    assert!(daylog::create_prod_logger(Some(&blocked)).is_err());
    assert_eq!(daylog::get().mode(), Mode::Development);
}
