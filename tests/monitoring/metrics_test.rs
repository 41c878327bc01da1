/*!
 * Performance Monitor Integration Tests
 */

use ai_os_vfs::vfs::{Vfs, WriteOptions};
use ai_os_vfs::MetricsSnapshot;

#[tokio::test]
async fn test_operations_and_errors_counted() {
    let vfs = Vfs::new();
    vfs.write_file("/f", b"x", WriteOptions::default())
        .await
        .unwrap();
    vfs.read_file("/f").await.unwrap();
    assert!(vfs.read_file("/missing").await.is_err());
    assert!(vfs.create_dir("/f", None).await.is_err());

    let metrics = vfs.metrics();
    assert_eq!(metrics.operations["write_file"].calls, 1);
    assert_eq!(metrics.operations["read_file"].calls, 2);
    assert_eq!(metrics.operations["read_file"].errors, 1);
    assert_eq!(metrics.operations["create_dir"].errors, 1);
    assert_eq!(metrics.errors["not_found"], 1);
    assert_eq!(metrics.errors["file_exists"], 1);
}

#[tokio::test]
async fn test_nested_calls_counted_once() {
    let vfs = Vfs::new();
    vfs.append_file("/log", b"a").await.unwrap();

    let metrics = vfs.metrics();
    assert_eq!(metrics.operations["append_file"].calls, 1);
    assert!(!metrics.operations.contains_key("read_file"));
    assert!(!metrics.operations.contains_key("write_file"));
}

#[tokio::test]
async fn test_snapshot_serializes() {
    let vfs = Vfs::new();
    vfs.stat("/").await.unwrap();

    let json = serde_json::to_string(&vfs.metrics()).unwrap();
    let parsed: MetricsSnapshot = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed.operations["stat"].calls, 1);
    assert_eq!(parsed.cache_misses, 1);
}
