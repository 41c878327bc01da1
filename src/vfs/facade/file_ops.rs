/*!
 * File Operations
 * Content reads and writes, deletion and metadata queries
 */

use super::{require_read, require_write, Vfs, WriteOptions};
use crate::vfs::observable::FileEvent;
use crate::vfs::path;
use crate::vfs::types::*;

impl Vfs {
    /// Read the full contents of a file
    pub async fn read_file(&self, path: &str) -> VfsResult<Vec<u8>> {
        self.observe("read_file", path, self.read_file_impl(path))
            .await
    }

    /// Write a file, replacing its contents
    ///
    /// A missing file is created inside its existing parent unless
    /// `options.create` is unset. Parents are never created implicitly.
    pub async fn write_file(&self, path: &str, data: &[u8], options: WriteOptions) -> VfsResult<()> {
        self.observe("write_file", path, self.write_file_impl(path, data, options))
            .await
    }

    /// Append to a file, creating it when missing
    pub async fn append_file(&self, path: &str, data: &[u8]) -> VfsResult<()> {
        self.observe("append_file", path, async {
            let mut contents = match self.read_file_impl(path).await {
                Ok(contents) => contents,
                Err(err) if err.kind() == ErrorKind::NotFound => Vec::new(),
                Err(err) => return Err(err),
            };
            contents.extend_from_slice(data);
            self.write_file_impl(path, &contents, WriteOptions::default())
                .await
        })
        .await
    }

    /// Delete a file, symlink or special inode
    pub async fn delete_file(&self, path: &str) -> VfsResult<()> {
        self.observe("delete_file", path, self.delete_file_impl(path))
            .await
    }

    /// Whether the path resolves to an existing inode
    pub async fn exists(&self, path: &str) -> VfsResult<bool> {
        self.observe("exists", path, async {
            match self.locate(path, true).await {
                Ok(located) => Ok(located.inode.is_some()),
                Err(err) if matches!(err.kind(), ErrorKind::NotFound | ErrorKind::NotAFile) => {
                    Ok(false)
                }
                Err(err) => Err(err),
            }
        })
        .await
    }

    /// Metadata of the inode a path resolves to, served from cache when possible
    pub async fn stat(&self, path: &str) -> VfsResult<Inode> {
        self.observe("stat", path, self.stat_impl(path)).await
    }

    /// Metadata without following a terminal symlink
    pub async fn lstat(&self, path: &str) -> VfsResult<Inode> {
        self.observe("lstat", path, async {
            let located = self.locate(path, false).await?;
            located.existing().cloned()
        })
        .await
    }

    /// Change permission bits
    pub async fn chmod(&self, path: &str, mode: u32) -> VfsResult<()> {
        let update = InodeUpdate::permissions(Permissions::new(mode));
        self.observe("chmod", path, self.update_impl(path, update))
            .await
    }

    /// Change owner and optionally group
    pub async fn chown(&self, path: &str, owner: &str, group: Option<&str>) -> VfsResult<()> {
        let update = InodeUpdate::owner(owner, group.map(str::to_string));
        self.observe("chown", path, self.update_impl(path, update))
            .await
    }

    pub(super) async fn read_file_impl(&self, path: &str) -> VfsResult<Vec<u8>> {
        let located = self.locate(path, true).await?;
        let inode = located.existing()?;
        if inode.is_dir() {
            return Err(VfsError::is_directory(located.path.clone()));
        }
        require_read(inode, &located.path)?;

        located
            .provider()
            .read_file(inode.id)
            .await
            .map_err(|e| e.with_path(located.path.clone()))
    }

    pub(super) async fn write_file_impl(
        &self,
        path: &str,
        data: &[u8],
        options: WriteOptions,
    ) -> VfsResult<()> {
        let located = self.locate_mut(path, true).await?;
        let provider = located.provider();

        let event = match &located.inode {
            Some(inode) => {
                if options.exclusive {
                    return Err(VfsError::file_exists(located.path.clone()));
                }
                if inode.is_dir() {
                    return Err(VfsError::is_directory(located.path.clone()));
                }
                require_write(inode, &located.path)?;

                provider
                    .write_file(inode.id, data)
                    .await
                    .map_err(|e| e.with_path(located.path.clone()))?;
                FileEvent::Modified {
                    path: located.path.clone(),
                }
            }
            None => {
                if !options.create {
                    return Err(VfsError::not_found(located.path.clone()));
                }
                require_write(&located.parent, located.parent_path())?;

                let permissions = options.permissions.unwrap_or_else(Permissions::file_default);
                let inode = provider
                    .create_inode(FileType::File, permissions)
                    .await
                    .map_err(|e| e.with_path(located.path.clone()))?;

                let linked = match provider.write_file(inode.id, data).await {
                    Ok(_) => {
                        provider
                            .add_child(located.parent.id, &located.name, inode.id)
                            .await
                    }
                    Err(err) => Err(err),
                };
                if let Err(err) = linked {
                    self.discard(provider, inode.id).await;
                    return Err(err.with_path(located.path.clone()));
                }

                FileEvent::Created {
                    path: located.path.clone(),
                }
            }
        };

        self.evict_located(&located);
        self.emit(event);
        Ok(())
    }

    async fn delete_file_impl(&self, path: &str) -> VfsResult<()> {
        let located = self.locate_mut(path, false).await?;
        let inode = located.existing()?;
        if inode.is_dir() {
            return Err(VfsError::is_directory(located.path.clone()));
        }
        require_write(&located.parent, located.parent_path())?;

        let provider = located.provider();
        provider
            .delete_inode(inode.id)
            .await
            .map_err(|e| e.with_path(located.path.clone()))?;
        provider
            .remove_child(located.parent.id, &located.name)
            .await
            .map_err(|e| e.with_path(located.path.clone()))?;

        self.evict_located(&located);
        self.emit(FileEvent::Deleted {
            path: located.path.clone(),
        });
        Ok(())
    }

    async fn stat_impl(&self, path: &str) -> VfsResult<Inode> {
        let normalized = path::normalize(path)?;
        if let Some(inode) = self.inner.cache.get(&normalized) {
            self.inner.monitor.record_cache_hit();
            return Ok(inode);
        }
        self.inner.monitor.record_cache_miss();

        let generation = self.inner.cache.generation();
        let located = self.locate(&normalized, true).await?;
        let inode = located.existing()?.clone();
        if !located.via_symlink {
            self.inner
                .cache
                .insert_if_current(normalized, inode.clone(), generation);
        }
        Ok(inode)
    }

    async fn update_impl(&self, path: &str, update: InodeUpdate) -> VfsResult<()> {
        let located = self.locate_mut(path, true).await?;
        let inode = located.existing()?;

        located
            .provider()
            .update_inode(inode.id, update)
            .await
            .map_err(|e| e.with_path(located.path.clone()))?;

        self.evict_located(&located);
        self.emit(FileEvent::Modified {
            path: located.path.clone(),
        });
        Ok(())
    }
}
