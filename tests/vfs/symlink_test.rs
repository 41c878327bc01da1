/*!
 * Symlink Tests
 * Link creation, resolution and the hop bound
 */

use ai_os_vfs::vfs::{ErrorKind, Vfs, WriteOptions};
use ai_os_vfs::VfsConfig;

#[tokio::test]
async fn test_symlink_follow_and_lstat() {
    let vfs = Vfs::new();
    vfs.create_dir("/docs", None).await.unwrap();
    vfs.write_file("/docs/readme", b"hello", WriteOptions::default())
        .await
        .unwrap();
    vfs.symlink("readme", "/docs/latest").await.unwrap();

    assert_eq!(vfs.read_file("/docs/latest").await.unwrap(), b"hello");
    assert_eq!(vfs.readlink("/docs/latest").await.unwrap(), "readme");

    let followed = vfs.stat("/docs/latest").await.unwrap();
    let link = vfs.lstat("/docs/latest").await.unwrap();
    assert!(followed.is_file());
    assert!(link.is_symlink());
    assert_eq!(link.size, "readme".len() as u64);
}

#[tokio::test]
async fn test_relative_target_with_parent_segments() {
    let vfs = Vfs::new();
    vfs.create_dir_all("/a/b", None).await.unwrap();
    vfs.create_dir("/c", None).await.unwrap();
    vfs.write_file("/c/f", b"c", WriteOptions::default())
        .await
        .unwrap();
    vfs.symlink("../../c", "/a/b/up").await.unwrap();

    assert_eq!(vfs.read_file("/a/b/up/f").await.unwrap(), b"c");
    let entries = vfs.read_dir("/a/b/up").await.unwrap();
    assert_eq!(entries.len(), 1);
}

#[tokio::test]
async fn test_delete_file_removes_link_not_target() {
    let vfs = Vfs::new();
    vfs.write_file("/t", b"x", WriteOptions::default())
        .await
        .unwrap();
    vfs.symlink("/t", "/l").await.unwrap();

    vfs.delete_file("/l").await.unwrap();
    assert!(vfs.exists("/t").await.unwrap());
    assert!(vfs.lstat("/l").await.is_err());
}

#[tokio::test]
async fn test_dangling_symlink() {
    let vfs = Vfs::new();
    vfs.symlink("/nowhere", "/dangling").await.unwrap();

    assert!(!vfs.exists("/dangling").await.unwrap());
    assert!(vfs.lstat("/dangling").await.unwrap().is_symlink());
    assert_eq!(vfs.read_file("/dangling").await.unwrap_err().kind(), ErrorKind::NotFound);

    // Writing through a dangling link creates its target
    vfs.write_file("/dangling", b"now", WriteOptions::default())
        .await
        .unwrap();
    assert_eq!(vfs.read_file("/nowhere").await.unwrap(), b"now");
}

#[tokio::test]
async fn test_symlink_cycle_hits_depth_bound() {
    let vfs = Vfs::new();
    vfs.symlink("/loop-b", "/loop-a").await.unwrap();
    vfs.symlink("/loop-a", "/loop-b").await.unwrap();

    let err = vfs.read_file("/loop-a").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidPath);
    assert_eq!(vfs.exists("/loop-a").await.unwrap_err().kind(), ErrorKind::InvalidPath);
}

#[tokio::test]
async fn test_chain_within_and_beyond_bound() {
    let config = VfsConfig {
        max_symlink_depth: 3,
        ..VfsConfig::default()
    };
    let vfs = Vfs::with_config(config);
    vfs.write_file("/end", b"end", WriteOptions::default())
        .await
        .unwrap();
    vfs.symlink("/end", "/l1").await.unwrap();
    vfs.symlink("/l1", "/l2").await.unwrap();
    vfs.symlink("/l2", "/l3").await.unwrap();
    vfs.symlink("/l3", "/l4").await.unwrap();

    assert_eq!(vfs.read_file("/l3").await.unwrap(), b"end");
    assert_eq!(vfs.read_file("/l4").await.unwrap_err().kind(), ErrorKind::InvalidPath);
}

#[tokio::test]
async fn test_symlink_errors() {
    let vfs = Vfs::new();
    vfs.write_file("/f", b"x", WriteOptions::default())
        .await
        .unwrap();

    assert_eq!(vfs.symlink("/x", "/f").await.unwrap_err().kind(), ErrorKind::FileExists);
    assert_eq!(vfs.symlink("", "/l").await.unwrap_err().kind(), ErrorKind::InvalidPath);
    assert_eq!(vfs.readlink("/f").await.unwrap_err().kind(), ErrorKind::InvalidPath);
    assert_eq!(vfs.readlink("/missing").await.unwrap_err().kind(), ErrorKind::NotFound);
}
