/*!
 * Memory Provider Tests
 * Inode contract, transactional delete and reachability GC
 */

use ai_os_vfs::vfs::{ErrorKind, FileType, InodeId, MemoryProvider, Permissions, StorageProvider};

async fn dir(fs: &MemoryProvider, parent: InodeId, name: &str) -> InodeId {
    let inode = fs
        .create_inode(FileType::Directory, Permissions::dir_default())
        .await
        .unwrap();
    fs.add_child(parent, name, inode.id).await.unwrap();
    inode.id
}

async fn file(fs: &MemoryProvider, parent: InodeId, name: &str, data: &[u8]) -> InodeId {
    let inode = fs
        .create_inode(FileType::File, Permissions::file_default())
        .await
        .unwrap();
    fs.write_file(inode.id, data).await.unwrap();
    fs.add_child(parent, name, inode.id).await.unwrap();
    inode.id
}

#[tokio::test]
async fn test_failed_delete_leaves_tree_intact() {
    let fs = MemoryProvider::new();
    let root = fs.root_id();
    let a = dir(&fs, root, "a").await;
    let b = dir(&fs, a, "b").await;
    let f = file(&fs, b, "f", b"keep").await;
    // A link back to the root makes the subtree undeletable
    fs.add_child(b, "escape", root).await.unwrap();

    let before = fs.usage();
    let err = fs.delete_inode(a).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AccessDenied);

    assert_eq!(fs.usage(), before);
    assert_eq!(fs.lookup(root, "a").await.unwrap(), Some(a));
    assert_eq!(fs.lookup(a, "b").await.unwrap(), Some(b));
    assert_eq!(fs.read_file(f).await.unwrap(), b"keep");
}

#[tokio::test]
async fn test_optimize_removes_orphans_only() {
    let fs = MemoryProvider::new();
    let root = fs.root_id();
    let kept_dir = dir(&fs, root, "kept").await;
    let kept = file(&fs, kept_dir, "f", b"12345").await;

    let orphan_dir = dir(&fs, root, "orphan").await;
    let orphan_file = file(&fs, orphan_dir, "g", b"abc").await;
    let never_linked = fs
        .create_inode(FileType::File, Permissions::file_default())
        .await
        .unwrap();
    fs.remove_child(root, "orphan").await.unwrap();

    let report = fs.optimize().await.unwrap();
    assert_eq!(report.removed_inodes, 3);
    assert_eq!(report.reclaimed_bytes, 3);

    assert!(fs.get_inode(kept).await.is_ok());
    for gone in [orphan_dir, orphan_file, never_linked.id] {
        assert_eq!(fs.get_inode(gone).await.unwrap_err().kind(), ErrorKind::NotFound);
    }
    assert_eq!(fs.usage().bytes_used, 5);

    let again = fs.optimize().await.unwrap();
    assert_eq!(again.removed_inodes, 0);
}

#[tokio::test]
async fn test_add_child_validation() {
    let fs = MemoryProvider::new();
    let root = fs.root_id();
    let f = file(&fs, root, "f", b"").await;

    assert_eq!(fs.add_child(root, "x", 999).await.unwrap_err().kind(), ErrorKind::NotFound);
    assert_eq!(fs.add_child(999, "x", f).await.unwrap_err().kind(), ErrorKind::NotFound);
    assert_eq!(fs.add_child(f, "x", f).await.unwrap_err().kind(), ErrorKind::NotAFile);
    assert_eq!(
        fs.add_child(root, "a/b", f).await.unwrap_err().kind(),
        ErrorKind::InvalidPath
    );
}

#[tokio::test]
async fn test_read_dir_sorted_snapshot() {
    let fs = MemoryProvider::new();
    let root = fs.root_id();
    for name in ["zeta", "alpha", "mid"] {
        file(&fs, root, name, b"").await;
    }

    let names: Vec<String> = fs
        .read_dir(root)
        .await
        .unwrap()
        .into_iter()
        .map(|e| e.name)
        .collect();
    assert_eq!(names, vec!["alpha", "mid", "zeta"]);
}
