/*!
 * Facade Tests
 * File and directory operations through the public path API
 */

use ai_os_vfs::vfs::{DirEntry, ErrorKind, FileType, Permissions, Vfs, WriteOptions};
use pretty_assertions::assert_eq;

async fn write(vfs: &Vfs, path: &str, data: &[u8]) {
    vfs.write_file(path, data, WriteOptions::default())
        .await
        .unwrap();
}

#[tokio::test]
async fn test_home_scenario() {
    let vfs = Vfs::new();
    vfs.create_dir("/home", None).await.unwrap();
    vfs.create_dir("/home/user", None).await.unwrap();
    write(&vfs, "/home/user/a.txt", b"hello").await;

    assert_eq!(vfs.read_file("/home/user/a.txt").await.unwrap(), b"hello");

    let entries = vfs.read_dir("/home/user").await.unwrap();
    let listed: Vec<(&str, FileType)> = entries
        .iter()
        .map(|e: &DirEntry| (e.name.as_str(), e.file_type))
        .collect();
    assert_eq!(listed, vec![("a.txt", FileType::File)]);
}

#[tokio::test]
async fn test_round_trip_and_size() {
    let vfs = Vfs::new();
    let data = vec![7u8; 1500];
    write(&vfs, "/blob.bin", &data).await;

    assert_eq!(vfs.read_file("/blob.bin").await.unwrap(), data);
    let stat = vfs.stat("/blob.bin").await.unwrap();
    assert_eq!(stat.size, 1500);
    assert_eq!(stat.blocks, 3);
    assert!(stat.is_file());
}

#[tokio::test]
async fn test_write_requires_parent() {
    let vfs = Vfs::new();
    let err = vfs
        .write_file("/missing/file.txt", b"x", WriteOptions::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(err.path(), "/missing");
}

#[tokio::test]
async fn test_write_options() {
    let vfs = Vfs::new();

    let err = vfs
        .write_file("/new.txt", b"x", WriteOptions::new().create(false))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    vfs.write_file(
        "/new.txt",
        b"x",
        WriteOptions::new()
            .exclusive(true)
            .permissions(Permissions::new(0o600)),
    )
    .await
    .unwrap();
    assert_eq!(vfs.stat("/new.txt").await.unwrap().permissions.mode, 0o600);

    let err = vfs
        .write_file("/new.txt", b"y", WriteOptions::new().exclusive(true))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::FileExists);
    assert_eq!(vfs.read_file("/new.txt").await.unwrap(), b"x");
}

#[tokio::test]
async fn test_append_file() {
    let vfs = Vfs::new();
    vfs.append_file("/log.txt", b"one\n").await.unwrap();
    vfs.append_file("/log.txt", b"two\n").await.unwrap();
    assert_eq!(vfs.read_file("/log.txt").await.unwrap(), b"one\ntwo\n");
}

#[tokio::test]
async fn test_type_errors() {
    let vfs = Vfs::new();
    vfs.create_dir("/dir", None).await.unwrap();
    write(&vfs, "/file", b"x").await;

    assert_eq!(vfs.read_file("/dir").await.unwrap_err().kind(), ErrorKind::IsDirectory);
    assert_eq!(
        vfs.write_file("/dir", b"x", WriteOptions::default())
            .await
            .unwrap_err()
            .kind(),
        ErrorKind::IsDirectory
    );
    assert_eq!(vfs.delete_file("/dir").await.unwrap_err().kind(), ErrorKind::IsDirectory);
    assert_eq!(vfs.read_dir("/file").await.unwrap_err().kind(), ErrorKind::NotAFile);
    assert_eq!(vfs.delete_dir("/file", false).await.unwrap_err().kind(), ErrorKind::NotAFile);

    let err = vfs.read_file("/file/below").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotAFile);
    assert!(!vfs.exists("/file/below").await.unwrap());
}

#[tokio::test]
async fn test_invalid_paths() {
    let vfs = Vfs::new();
    assert_eq!(vfs.read_file("relative").await.unwrap_err().kind(), ErrorKind::InvalidPath);
    assert_eq!(vfs.stat("").await.unwrap_err().kind(), ErrorKind::InvalidPath);
    assert_eq!(vfs.exists("nope").await.unwrap_err().kind(), ErrorKind::InvalidPath);
}

#[tokio::test]
async fn test_create_dir_conflicts() {
    let vfs = Vfs::new();
    vfs.create_dir("/a", None).await.unwrap();
    assert_eq!(vfs.create_dir("/a", None).await.unwrap_err().kind(), ErrorKind::FileExists);
    assert_eq!(vfs.create_dir("/", None).await.unwrap_err().kind(), ErrorKind::FileExists);
    assert_eq!(vfs.create_dir("/x/y", None).await.unwrap_err().kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_create_dir_all() {
    let vfs = Vfs::new();
    vfs.create_dir_all("/a/b/c", None).await.unwrap();
    vfs.create_dir_all("/a/b/c", None).await.unwrap();
    assert!(vfs.stat("/a/b/c").await.unwrap().is_dir());

    write(&vfs, "/a/file", b"x").await;
    let err = vfs.create_dir_all("/a/file/sub", None).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotAFile);
}

#[tokio::test]
async fn test_deletion_cascades() {
    let vfs = Vfs::new();
    vfs.create_dir_all("/a/b/c", None).await.unwrap();
    write(&vfs, "/a/b/c/deep.txt", b"deep").await;

    let err = vfs.delete_dir("/a", false).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotEmpty);
    assert!(vfs.exists("/a/b/c/deep.txt").await.unwrap());

    vfs.delete_dir("/a", true).await.unwrap();
    for path in ["/a", "/a/b", "/a/b/c", "/a/b/c/deep.txt"] {
        assert!(!vfs.exists(path).await.unwrap(), "{path} should be gone");
    }
    assert!(vfs.read_dir("/").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_delete_root_denied() {
    let vfs = Vfs::new();
    assert_eq!(vfs.delete_dir("/", true).await.unwrap_err().kind(), ErrorKind::AccessDenied);
}

#[tokio::test]
async fn test_delete_file() {
    let vfs = Vfs::new();
    write(&vfs, "/f", b"x").await;
    vfs.delete_file("/f").await.unwrap();
    assert!(!vfs.exists("/f").await.unwrap());
    assert_eq!(vfs.delete_file("/f").await.unwrap_err().kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_permission_bits_enforced() {
    let vfs = Vfs::new();
    write(&vfs, "/secret", b"x").await;

    vfs.chmod("/secret", 0o200).await.unwrap();
    assert_eq!(vfs.read_file("/secret").await.unwrap_err().kind(), ErrorKind::AccessDenied);

    vfs.chmod("/secret", 0o400).await.unwrap();
    assert_eq!(vfs.read_file("/secret").await.unwrap(), b"x");
    let err = vfs
        .write_file("/secret", b"y", WriteOptions::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AccessDenied);

    vfs.create_dir("/locked", Some(Permissions::new(0o555)))
        .await
        .unwrap();
    let err = vfs
        .write_file("/locked/f", b"x", WriteOptions::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AccessDenied);
    assert_eq!(err.path(), "/locked");
}

#[tokio::test]
async fn test_chown() {
    let vfs = Vfs::new();
    write(&vfs, "/f", b"x").await;
    vfs.chown("/f", "alice", Some("staff")).await.unwrap();

    let stat = vfs.stat("/f").await.unwrap();
    assert_eq!(stat.owner, "alice");
    assert_eq!(stat.group, "staff");

    vfs.chown("/f", "bob", None).await.unwrap();
    let stat = vfs.stat("/f").await.unwrap();
    assert_eq!(stat.owner, "bob");
    assert_eq!(stat.group, "staff");
}

#[tokio::test]
async fn test_rename_within_mount() {
    let vfs = Vfs::new();
    vfs.create_dir_all("/src/inner", None).await.unwrap();
    write(&vfs, "/src/inner/f.txt", b"data").await;
    let before = vfs.stat("/src").await.unwrap();

    vfs.rename("/src", "/dst").await.unwrap();
    assert!(!vfs.exists("/src").await.unwrap());
    assert_eq!(vfs.read_file("/dst/inner/f.txt").await.unwrap(), b"data");
    assert_eq!(vfs.stat("/dst").await.unwrap().id, before.id);
}

#[tokio::test]
async fn test_rename_replaces_and_validates() {
    let vfs = Vfs::new();
    write(&vfs, "/a", b"a").await;
    write(&vfs, "/b", b"b").await;
    vfs.create_dir_all("/d/sub", None).await.unwrap();

    vfs.rename("/a", "/b").await.unwrap();
    assert_eq!(vfs.read_file("/b").await.unwrap(), b"a");
    assert!(!vfs.exists("/a").await.unwrap());

    assert_eq!(vfs.rename("/b", "/d").await.unwrap_err().kind(), ErrorKind::IsDirectory);
    assert_eq!(vfs.rename("/d", "/d/sub/x").await.unwrap_err().kind(), ErrorKind::InvalidPath);
    assert_eq!(vfs.rename("/nope", "/x").await.unwrap_err().kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_copy() {
    let vfs = Vfs::new();
    write(&vfs, "/orig", b"payload").await;
    vfs.chmod("/orig", 0o640).await.unwrap();

    vfs.copy("/orig", "/dup").await.unwrap();
    assert_eq!(vfs.read_file("/dup").await.unwrap(), b"payload");
    assert_eq!(vfs.stat("/dup").await.unwrap().permissions.mode, 0o640);

    write(&vfs, "/orig", b"changed").await;
    assert_eq!(vfs.read_file("/dup").await.unwrap(), b"payload");

    vfs.create_dir("/dir", None).await.unwrap();
    assert_eq!(vfs.copy("/dir", "/dir2").await.unwrap_err().kind(), ErrorKind::IsDirectory);
}

#[tokio::test]
async fn test_optimize_keeps_reachable() {
    let vfs = Vfs::new();
    vfs.create_dir_all("/keep/me", None).await.unwrap();
    write(&vfs, "/keep/me/f", b"x").await;

    let report = vfs.optimize().await.unwrap();
    assert_eq!(report.removed_inodes, 0);
    assert_eq!(vfs.read_file("/keep/me/f").await.unwrap(), b"x");
}

#[tokio::test]
async fn test_concurrent_writers_last_wins() {
    let vfs = Vfs::new();
    write(&vfs, "/shared", b"").await;

    let mut handles = Vec::new();
    for i in 0..8u8 {
        let vfs = vfs.clone();
        handles.push(tokio::spawn(async move {
            vfs.write_file("/shared", &[i; 4], WriteOptions::default())
                .await
                .unwrap();
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let data = vfs.read_file("/shared").await.unwrap();
    assert_eq!(data.len(), 4);
    assert!(data.iter().all(|b| *b == data[0]));
}
