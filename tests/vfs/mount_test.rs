/*!
 * Mount Tests
 * Routing precedence, read-only mounts and provider factories
 */

use std::sync::Arc;

use ai_os_vfs::vfs::memory::CAPACITY_OPTION;
use ai_os_vfs::vfs::{
    ErrorKind, MemoryProvider, MountConfig, ProviderOptions, StorageProvider, Vfs, VfsResult,
    WriteOptions,
};

#[tokio::test]
async fn test_mount_precedence() {
    let root = Arc::new(MemoryProvider::new());
    let vfs = Vfs::with_root(Default::default(), root.clone());
    let mounted = Arc::new(MemoryProvider::new());
    vfs.mount_provider(MountConfig::new("/mnt/x", "memory"), mounted.clone())
        .unwrap();

    vfs.write_file("/mnt/x/file", b"routed", WriteOptions::default())
        .await
        .unwrap();

    assert_eq!(root.usage().bytes_used, 0);
    assert_eq!(mounted.usage().bytes_used, 6);
    assert!(root.lookup(root.root_id(), "mnt").await.unwrap().is_none());
    assert!(mounted
        .lookup(mounted.root_id(), "file")
        .await
        .unwrap()
        .is_some());
}

#[tokio::test]
async fn test_read_only_mount() {
    let vfs = Vfs::new();
    let provider = Arc::new(MemoryProvider::new());
    let seeded = provider
        .create_inode(ai_os_vfs::FileType::File, Default::default())
        .await
        .unwrap();
    provider.write_file(seeded.id, b"fixed").await.unwrap();
    provider
        .add_child(provider.root_id(), "fixed.txt", seeded.id)
        .await
        .unwrap();

    vfs.mount_provider(MountConfig::readonly("/ro", "memory"), provider)
        .unwrap();

    assert_eq!(vfs.read_file("/ro/fixed.txt").await.unwrap(), b"fixed");
    assert_eq!(vfs.read_dir("/ro").await.unwrap().len(), 1);

    let denied = [
        vfs.write_file("/ro/fixed.txt", b"x", WriteOptions::default())
            .await
            .unwrap_err(),
        vfs.write_file("/ro/new.txt", b"x", WriteOptions::default())
            .await
            .unwrap_err(),
        vfs.delete_file("/ro/fixed.txt").await.unwrap_err(),
        vfs.create_dir("/ro/dir", None).await.unwrap_err(),
        vfs.chmod("/ro/fixed.txt", 0o777).await.unwrap_err(),
        vfs.symlink("/x", "/ro/link").await.unwrap_err(),
        vfs.rename("/ro/fixed.txt", "/moved").await.unwrap_err(),
        // Unresolvable paths are still under the read-only prefix
        vfs.write_file("/ro/missing/x", b"x", WriteOptions::default())
            .await
            .unwrap_err(),
        vfs.create_dir("/ro/missing/sub", None).await.unwrap_err(),
        vfs.create_dir_all("/ro/missing/sub", None).await.unwrap_err(),
        vfs.delete_file("/ro/missing/x").await.unwrap_err(),
        vfs.symlink("/x", "/ro/missing/link").await.unwrap_err(),
        vfs.rename("/ro/missing/x", "/moved").await.unwrap_err(),
    ];
    for err in denied {
        assert_eq!(err.kind(), ErrorKind::AccessDenied, "{err}");
    }
    assert_eq!(vfs.read_file("/ro/fixed.txt").await.unwrap(), b"fixed");
}

#[tokio::test]
async fn test_mount_by_factory_with_options() {
    let vfs = Vfs::new();
    vfs.mount(MountConfig::new("/small", "memory").with_option(CAPACITY_OPTION, "4"))
        .unwrap();

    vfs.write_file("/small/a", b"1234", WriteOptions::default())
        .await
        .unwrap();
    let err = vfs
        .write_file("/small/b", b"5", WriteOptions::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NoSpace);
    assert_eq!(err.path(), "/small/b");
}

#[tokio::test]
async fn test_unknown_factory() {
    let vfs = Vfs::new();
    let err = vfs.mount(MountConfig::new("/net", "nfs")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidPath);
}

#[tokio::test]
async fn test_register_custom_factory() {
    let vfs = Vfs::new();
    vfs.register_provider(
        "scratch",
        |_options: &ProviderOptions| -> VfsResult<Arc<dyn StorageProvider>> {
            Ok(Arc::new(MemoryProvider::with_capacity(1024)))
        },
    );
    vfs.mount(MountConfig::new("/scratch", "scratch")).unwrap();

    let usage = vfs
        .mount_usage()
        .into_iter()
        .find(|(prefix, _)| prefix == "/scratch")
        .map(|(_, usage)| usage)
        .unwrap();
    assert_eq!(usage.capacity, Some(1024));
}

#[tokio::test]
async fn test_mount_unmount_lifecycle() {
    let vfs = Vfs::new();
    vfs.mount(MountConfig::new("/data", "memory")).unwrap();
    assert_eq!(
        vfs.mount(MountConfig::new("/data/", "memory"))
            .unwrap_err()
            .kind(),
        ErrorKind::FileExists
    );

    vfs.write_file("/data/f", b"x", WriteOptions::default())
        .await
        .unwrap();
    assert!(vfs.stat("/data/f").await.is_ok());

    let removed = vfs.unmount("/data").unwrap();
    assert_eq!(removed.path, "/data");
    assert!(!vfs.exists("/data/f").await.unwrap());

    assert_eq!(vfs.unmount("/data").unwrap_err().kind(), ErrorKind::NotFound);
    assert_eq!(vfs.unmount("/").unwrap_err().kind(), ErrorKind::AccessDenied);

    let paths: Vec<String> = vfs.get_mounts().into_iter().map(|m| m.path).collect();
    assert_eq!(paths, vec!["/"]);
}

#[tokio::test]
async fn test_mount_root_protected() {
    let vfs = Vfs::new();
    vfs.create_dir("/outer", None).await.unwrap();
    vfs.mount(MountConfig::new("/outer/inner", "memory")).unwrap();

    assert_eq!(
        vfs.delete_dir("/outer/inner", true).await.unwrap_err().kind(),
        ErrorKind::AccessDenied
    );
    assert_eq!(
        vfs.delete_dir("/outer", true).await.unwrap_err().kind(),
        ErrorKind::AccessDenied
    );
    assert!(vfs.exists("/outer").await.unwrap());
}

#[tokio::test]
async fn test_rename_over_mount_point_denied() {
    let vfs = Vfs::new();
    vfs.create_dir("/outer", None).await.unwrap();
    vfs.mount(MountConfig::new("/outer/inner", "memory")).unwrap();
    vfs.write_file("/outer/inner/f", b"kept", WriteOptions::default())
        .await
        .unwrap();

    let err = vfs.rename("/outer", "/moved").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AccessDenied);
    assert!(vfs.exists("/outer").await.unwrap());
    assert!(!vfs.exists("/moved").await.unwrap());
    assert_eq!(vfs.read_file("/outer/inner/f").await.unwrap(), b"kept");
}

#[tokio::test]
async fn test_cross_mount_rename() {
    let vfs = Vfs::new();
    vfs.mount(MountConfig::new("/tmp", "memory")).unwrap();
    vfs.write_file("/draft.txt", b"draft", WriteOptions::default())
        .await
        .unwrap();
    vfs.chown("/draft.txt", "alice", None).await.unwrap();

    vfs.rename("/draft.txt", "/tmp/draft.txt").await.unwrap();
    assert!(!vfs.exists("/draft.txt").await.unwrap());
    assert_eq!(vfs.read_file("/tmp/draft.txt").await.unwrap(), b"draft");
    assert_eq!(vfs.stat("/tmp/draft.txt").await.unwrap().owner, "alice");

    vfs.create_dir("/folder", None).await.unwrap();
    let err = vfs.rename("/folder", "/tmp/folder").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidPath);
    assert!(vfs.exists("/folder").await.unwrap());
}

#[tokio::test]
async fn test_symlink_across_mounts() {
    let vfs = Vfs::new();
    vfs.mount(MountConfig::new("/tmp", "memory")).unwrap();
    vfs.create_dir("/tmp/real", None).await.unwrap();
    vfs.symlink("/tmp/real", "/shortcut").await.unwrap();

    vfs.write_file("/shortcut/f", b"via link", WriteOptions::default())
        .await
        .unwrap();
    assert_eq!(vfs.read_file("/tmp/real/f").await.unwrap(), b"via link");
}
