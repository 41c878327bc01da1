/*!
 * Directory Operations
 * Listing, creation and (recursive) removal of directories
 */

use super::{require_read, require_write, Vfs};
use crate::vfs::observable::FileEvent;
use crate::vfs::path;
use crate::vfs::types::*;

impl Vfs {
    /// Entries of a directory, sorted by name
    ///
    /// Mount points are not listed in their parent directory.
    pub async fn read_dir(&self, path: &str) -> VfsResult<Vec<DirEntry>> {
        self.observe("read_dir", path, async {
            let located = self.locate(path, true).await?;
            let inode = located.existing()?;
            if !inode.is_dir() {
                return Err(VfsError::not_a_file(located.path.clone()));
            }
            require_read(inode, &located.path)?;

            located
                .provider()
                .read_dir(inode.id)
                .await
                .map_err(|e| e.with_path(located.path.clone()))
        })
        .await
    }

    /// Create a directory inside an existing parent
    pub async fn create_dir(&self, path: &str, permissions: Option<Permissions>) -> VfsResult<()> {
        self.observe("create_dir", path, self.create_dir_impl(path, permissions))
            .await
    }

    /// Create a directory and every missing ancestor
    ///
    /// Succeeds when the directory already exists.
    pub async fn create_dir_all(&self, path: &str, permissions: Option<Permissions>) -> VfsResult<()> {
        self.observe("create_dir_all", path, async {
            let normalized = path::normalize(path)?;
            let mut current = path::ROOT.to_string();

            for segment in path::segments(&normalized) {
                current = path::join(&[current.as_str(), segment]);

                let located = self.locate(&current, true).await?;
                match &located.inode {
                    Some(inode) if inode.is_dir() => continue,
                    Some(_) => return Err(VfsError::not_a_file(current)),
                    None => match self.create_dir_impl(&current, permissions).await {
                        Ok(()) => {}
                        // Lost a race with a concurrent creator
                        Err(err) if err.kind() == ErrorKind::FileExists => {}
                        Err(err) => return Err(err),
                    },
                }
            }
            Ok(())
        })
        .await
    }

    /// Delete a directory
    ///
    /// Without `recursive` the directory must be empty. Mount roots and
    /// directories containing a mount point cannot be deleted.
    pub async fn delete_dir(&self, path: &str, recursive: bool) -> VfsResult<()> {
        self.observe("delete_dir", path, self.delete_dir_impl(path, recursive))
            .await
    }

    async fn create_dir_impl(&self, path: &str, permissions: Option<Permissions>) -> VfsResult<()> {
        let located = self.locate_mut(path, false).await?;
        if located.inode.is_some() {
            return Err(VfsError::file_exists(located.path.clone()));
        }
        require_write(&located.parent, located.parent_path())?;

        let provider = located.provider();
        let inode = provider
            .create_inode(
                FileType::Directory,
                permissions.unwrap_or_else(Permissions::dir_default),
            )
            .await
            .map_err(|e| e.with_path(located.path.clone()))?;

        if let Err(err) = provider
            .add_child(located.parent.id, &located.name, inode.id)
            .await
        {
            self.discard(provider, inode.id).await;
            return Err(err.with_path(located.path.clone()));
        }

        self.evict_located(&located);
        self.emit(FileEvent::Created {
            path: located.path.clone(),
        });
        Ok(())
    }

    async fn delete_dir_impl(&self, path: &str, recursive: bool) -> VfsResult<()> {
        let located = self.locate_mut(path, false).await?;
        let inode = located.existing()?;
        if !inode.is_dir() {
            return Err(VfsError::not_a_file(located.path.clone()));
        }
        if located.route.is_mount_root() {
            return Err(VfsError::access_denied(located.path.clone()).with_detail("mount point"));
        }
        if self.contains_mount(&located.path) {
            return Err(VfsError::access_denied(located.path.clone())
                .with_detail("contains a mount point"));
        }
        require_write(&located.parent, located.parent_path())?;

        let provider = located.provider();
        if !recursive {
            let entries = provider
                .read_dir(inode.id)
                .await
                .map_err(|e| e.with_path(located.path.clone()))?;
            if !entries.is_empty() {
                return Err(VfsError::not_empty(located.path.clone()));
            }
        }

        // The provider validates the whole subtree before removing anything
        provider
            .delete_inode(inode.id)
            .await
            .map_err(|e| e.with_path(located.path.clone()))?;
        provider
            .remove_child(located.parent.id, &located.name)
            .await
            .map_err(|e| e.with_path(located.path.clone()))?;

        self.evict_tree(&located);
        self.emit(FileEvent::Deleted {
            path: located.path.clone(),
        });
        Ok(())
    }
}
