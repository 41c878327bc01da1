/*!
 * VFS Initialization
 * Standard mounts, directory structure and host seeding
 */

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::facade::{Vfs, WriteOptions, MEMORY_PROVIDER};
use super::memory::CAPACITY_OPTION;
use super::mount::MountConfig;
use super::path;
use super::paths::{mounts, standard_directories};
use super::types::*;
use crate::config::VfsConfig;

/// Counts of what a host import created
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedReport {
    pub directories: usize,
    pub files: usize,
    pub symlinks: usize,
    pub bytes: u64,
}

/// Build a VFS with the standard mounts and directory structure
///
/// When `config.seed_path` is set, that host directory is imported
/// under `config.seed_target`; a failed import is logged, not fatal.
pub async fn init_vfs(config: VfsConfig) -> VfsResult<Vfs> {
    info!("Initializing VFS with standard directory structure");

    let tmp_capacity = config.tmp_capacity;
    let cache_capacity = config.cache_mount_capacity;
    let seed = config
        .seed_path
        .clone()
        .map(|source| (PathBuf::from(source), config.seed_target.clone()));

    let vfs = Vfs::with_config(config);

    info!(capacity = tmp_capacity, "Mounting in-memory filesystem at /tmp");
    vfs.mount(
        MountConfig::new(mounts::TMP, MEMORY_PROVIDER)
            .with_option(CAPACITY_OPTION, tmp_capacity.to_string()),
    )?;

    info!(capacity = cache_capacity, "Mounting in-memory filesystem at /cache");
    vfs.mount(
        MountConfig::new(mounts::CACHE, MEMORY_PROVIDER)
            .with_option(CAPACITY_OPTION, cache_capacity.to_string()),
    )?;

    create_standard_directories(&vfs).await?;

    if let Some((source, target)) = seed {
        match seed_from_host(&vfs, &source, &target).await {
            Ok(report) => info!(
                source = %source.display(),
                target = %target,
                files = report.files,
                directories = report.directories,
                bytes = report.bytes,
                "Host directory imported"
            ),
            Err(e) => warn!(source = %source.display(), error = %e, "Failed to import host directory"),
        }
    }

    info!("VFS initialization complete");
    Ok(vfs)
}

/// Create all standard directories in the filesystem
async fn create_standard_directories(vfs: &Vfs) -> VfsResult<()> {
    let dirs = standard_directories();
    let total = dirs.len();
    let mut created = 0;
    let mut existed = 0;

    for dir in dirs {
        if vfs.exists(dir).await? {
            existed += 1;
            continue;
        }

        match vfs.create_dir(dir, None).await {
            Ok(()) => created += 1,
            Err(e) => warn!(path = %dir, error = %e, "Failed to create directory"),
        }
    }

    info!(
        created = created,
        existed = existed,
        total = total,
        "Standard directory structure ready"
    );
    Ok(())
}

/// Recursively copy a host directory into the VFS under `target`
///
/// Existing files are overwritten; missing directories are created.
/// A missing source is not an error and yields an empty report.
pub async fn seed_from_host(vfs: &Vfs, source: &Path, target: &str) -> VfsResult<SeedReport> {
    let mut report = SeedReport::default();
    if !source.exists() {
        info!(source = %source.display(), "No host directory to import");
        return Ok(report);
    }

    let target = path::normalize(target)?;
    vfs.create_dir_all(&target, None).await?;

    let mut pending = vec![(source.to_path_buf(), target)];
    while let Some((host_dir, vfs_dir)) = pending.pop() {
        let entries = std::fs::read_dir(&host_dir).map_err(|e| VfsError::from_io(&e, vfs_dir.clone()))?;

        for entry in entries {
            let entry = entry.map_err(|e| VfsError::from_io(&e, vfs_dir.clone()))?;
            let name = entry.file_name().to_string_lossy().into_owned();
            let host_path = entry.path();
            let vfs_path = path::join(&[vfs_dir.as_str(), name.as_str()]);
            let file_type = entry
                .file_type()
                .map_err(|e| VfsError::from_io(&e, vfs_path.clone()))?;
            debug!(host = %host_path.display(), path = %vfs_path, "importing entry");

            if file_type.is_dir() {
                if !vfs.exists(&vfs_path).await? {
                    vfs.create_dir(&vfs_path, None).await?;
                    report.directories += 1;
                }
                pending.push((host_path, vfs_path));
            } else if file_type.is_symlink() {
                let link = std::fs::read_link(&host_path)
                    .map_err(|e| VfsError::from_io(&e, vfs_path.clone()))?;
                if vfs.lstat(&vfs_path).await.is_ok() {
                    vfs.delete_file(&vfs_path).await?;
                }
                vfs.symlink(&link.to_string_lossy(), &vfs_path).await?;
                report.symlinks += 1;
            } else {
                let data =
                    std::fs::read(&host_path).map_err(|e| VfsError::from_io(&e, vfs_path.clone()))?;
                vfs.write_file(&vfs_path, &data, WriteOptions::default())
                    .await?;
                report.files += 1;
                report.bytes += data.len() as u64;
            }
        }
    }

    Ok(report)
}
