/*!
 * Move Operations
 * Rename within or across mounts, and file copies
 */

use std::sync::Arc;

use super::resolve::Located;
use super::{require_read, require_write, Vfs};
use crate::vfs::observable::FileEvent;
use crate::vfs::path;
use crate::vfs::provider::StorageProvider;
use crate::vfs::types::*;

impl Vfs {
    /// Move `from` to `to`, replacing a compatible destination
    ///
    /// Within one mount the inode is relinked. Across mounts only
    /// non-directory inodes can move; they are copied then deleted.
    pub async fn rename(&self, from: &str, to: &str) -> VfsResult<()> {
        self.observe("rename", from, self.rename_impl(from, to))
            .await
    }

    /// Copy a file to `to`, replacing an existing destination file
    pub async fn copy(&self, from: &str, to: &str) -> VfsResult<()> {
        self.observe("copy", from, self.copy_impl(from, to)).await
    }

    async fn rename_impl(&self, from: &str, to: &str) -> VfsResult<()> {
        let source = self.locate_mut(from, false).await?;
        let dest = self.locate_mut(to, false).await?;

        let inode = source.existing()?.clone();
        if source.path == dest.path {
            return Ok(());
        }
        if source.route.is_mount_root() {
            return Err(VfsError::access_denied(source.path.clone()).with_detail("mount point"));
        }
        if dest.route.is_mount_root() {
            return Err(VfsError::access_denied(dest.path.clone()).with_detail("mount point"));
        }
        if inode.is_dir() && self.contains_mount(&source.path) {
            return Err(VfsError::access_denied(source.path.clone())
                .with_detail("contains a mount point"));
        }
        if inode.is_dir() && path::is_ancestor(&source.path, &dest.path) {
            return Err(VfsError::invalid_path(dest.path.clone())
                .with_detail("cannot move a directory into itself"));
        }
        require_write(&source.parent, source.parent_path())?;
        require_write(&dest.parent, dest.parent_path())?;
        self.check_replaceable(&inode, &dest).await?;

        if source.route.mount_path == dest.route.mount_path {
            let provider = source.provider();
            provider
                .add_child(dest.parent.id, &dest.name, inode.id)
                .await
                .map_err(|e| e.with_path(dest.path.clone()))?;
            // Both names now point at the same inode
            if source.parent.id != dest.parent.id || source.name != dest.name {
                provider
                    .remove_child(source.parent.id, &source.name)
                    .await
                    .map_err(|e| e.with_path(source.path.clone()))?;
            }
        } else {
            if inode.is_dir() {
                return Err(VfsError::invalid_path(source.path.clone())
                    .with_detail("cannot move a directory across mounts"));
            }
            self.transfer(source.provider(), &inode, &source.path, &dest, true)
                .await?;
            let provider = source.provider();
            provider
                .delete_inode(inode.id)
                .await
                .map_err(|e| e.with_path(source.path.clone()))?;
            provider
                .remove_child(source.parent.id, &source.name)
                .await
                .map_err(|e| e.with_path(source.path.clone()))?;
        }

        if let Some(replaced) = &dest.inode {
            self.drop_replaced(&dest, replaced.id).await?;
        }

        self.evict_tree(&source);
        self.evict_tree(&dest);
        self.emit(FileEvent::Renamed {
            from: source.path.clone(),
            to: dest.path.clone(),
        });
        Ok(())
    }

    async fn copy_impl(&self, from: &str, to: &str) -> VfsResult<()> {
        let source = self.locate(from, true).await?;
        let dest = self.locate_mut(to, false).await?;

        let inode = source.existing()?.clone();
        if inode.is_dir() {
            return Err(VfsError::is_directory(source.path.clone()));
        }
        require_read(&inode, &source.path)?;
        if source.path == dest.path {
            return Ok(());
        }
        if dest.route.is_mount_root() {
            return Err(VfsError::is_directory(dest.path.clone()));
        }
        require_write(&dest.parent, dest.parent_path())?;
        self.check_replaceable(&inode, &dest).await?;

        self.transfer(source.provider(), &inode, &source.path, &dest, false)
            .await?;
        if let Some(replaced) = &dest.inode {
            self.drop_replaced(&dest, replaced.id).await?;
        }

        self.evict_located(&dest);
        self.emit(match dest.inode {
            Some(_) => FileEvent::Modified {
                path: dest.path.clone(),
            },
            None => FileEvent::Created {
                path: dest.path.clone(),
            },
        });
        Ok(())
    }

    /// Whether `inode` may take the place of whatever sits at `dest`
    async fn check_replaceable(&self, inode: &Inode, dest: &Located) -> VfsResult<()> {
        let Some(existing) = &dest.inode else {
            return Ok(());
        };

        match (inode.is_dir(), existing.is_dir()) {
            (false, true) => Err(VfsError::is_directory(dest.path.clone())),
            (true, false) => Err(VfsError::not_a_file(dest.path.clone())),
            (true, true) => {
                let entries = dest
                    .provider()
                    .read_dir(existing.id)
                    .await
                    .map_err(|e| e.with_path(dest.path.clone()))?;
                if entries.is_empty() {
                    Ok(())
                } else {
                    Err(VfsError::not_empty(dest.path.clone()))
                }
            }
            (false, false) => Ok(()),
        }
    }

    /// Delete the inode a destination name pointed at before being relinked
    async fn drop_replaced(&self, dest: &Located, replaced: InodeId) -> VfsResult<()> {
        dest.provider()
            .delete_inode(replaced)
            .await
            .map_err(|e| e.with_path(dest.path.clone()))
    }

    /// Recreate a non-directory inode at `dest`, linking it last
    async fn transfer(
        &self,
        source: &Arc<dyn StorageProvider>,
        inode: &Inode,
        from: &str,
        dest: &Located,
        preserve_owner: bool,
    ) -> VfsResult<()> {
        if inode.is_dir() {
            return Err(VfsError::is_directory(from));
        }

        let target = dest.provider();
        let created = target
            .create_inode(inode.file_type, inode.permissions)
            .await
            .map_err(|e| e.with_path(dest.path.clone()))?;

        let populate = async {
            match inode.file_type {
                FileType::File => {
                    let data = source.read_file(inode.id).await?;
                    target.write_file(created.id, &data).await?;
                }
                FileType::Symlink => {
                    let link = source.read_link(inode.id).await?;
                    target.set_link_target(created.id, &link).await?;
                }
                FileType::Device | FileType::Fifo | FileType::Directory => {}
            }
            if preserve_owner {
                let update = InodeUpdate::owner(inode.owner.clone(), Some(inode.group.clone()));
                target.update_inode(created.id, update).await?;
            }
            target
                .add_child(dest.parent.id, &dest.name, created.id)
                .await
        };

        if let Err(err) = populate.await {
            self.discard(target, created.id).await;
            return Err(err.with_path(dest.path.clone()));
        }
        Ok(())
    }
}
