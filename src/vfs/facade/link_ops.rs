/*!
 * Symlink Operations
 */

use super::{require_write, Vfs};
use crate::vfs::observable::FileEvent;
use crate::vfs::types::*;

impl Vfs {
    /// Create a symlink at `link_path` pointing to `target`
    ///
    /// The target is stored verbatim; relative targets resolve against
    /// the directory holding the link.
    pub async fn symlink(&self, target: &str, link_path: &str) -> VfsResult<()> {
        self.observe("symlink", link_path, async {
            if target.is_empty() || target.contains('\0') {
                return Err(VfsError::invalid_path(link_path).with_detail("invalid symlink target"));
            }

            let located = self.locate_mut(link_path, false).await?;
            if located.inode.is_some() {
                return Err(VfsError::file_exists(located.path.clone()));
            }
            require_write(&located.parent, located.parent_path())?;

            let provider = located.provider();
            let inode = provider
                .create_inode(FileType::Symlink, Permissions::symlink_default())
                .await
                .map_err(|e| e.with_path(located.path.clone()))?;

            let linked = match provider.set_link_target(inode.id, target).await {
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

            self.evict_located(&located);
            self.emit(FileEvent::Created {
                path: located.path.clone(),
            });
            Ok(())
        })
        .await
    }

    /// Target of a symlink
    pub async fn readlink(&self, path: &str) -> VfsResult<String> {
        self.observe("readlink", path, async {
            let located = self.locate(path, false).await?;
            let inode = located.existing()?;
            if !inode.is_symlink() {
                return Err(VfsError::invalid_path(located.path.clone())
                    .with_detail("not a symbolic link"));
            }

            located
                .provider()
                .read_link(inode.id)
                .await
                .map_err(|e| e.with_path(located.path.clone()))
        })
        .await
    }
}
