/*!
 * Path Resolution
 * Walks provider directory graphs, following symlinks through the mount table
 */

use std::sync::Arc;

use super::Vfs;
use crate::vfs::mount::Route;
use crate::vfs::path;
use crate::vfs::provider::StorageProvider;
use crate::vfs::types::*;

/// Result of resolving a path to its terminal inode
pub(super) struct Located {
    /// Normalized path as requested
    pub requested: String,
    /// Normalized path after following symlinks
    pub path: String,
    pub route: Route,
    /// Directory holding the terminal name (the mount root for a mount root)
    pub parent: Inode,
    /// Terminal name inside `parent`; empty for a mount root
    pub name: String,
    /// Terminal inode, `None` when the name does not exist yet
    pub inode: Option<Inode>,
    pub via_symlink: bool,
}

impl Located {
    pub fn existing(&self) -> VfsResult<&Inode> {
        self.inode
            .as_ref()
            .ok_or_else(|| VfsError::not_found(self.path.clone()))
    }

    pub fn provider(&self) -> &Arc<dyn StorageProvider> {
        &self.route.provider
    }

    pub fn parent_path(&self) -> &str {
        path::parent_of(&self.path)
    }
}

/// Absolute path of the first `segments` below a mount point
fn walked_path(mount_path: &str, segments: &[String]) -> String {
    let parts: Vec<&str> = std::iter::once(mount_path)
        .chain(segments.iter().map(String::as_str))
        .collect();
    path::join(&parts)
}

/// Inode behind a directory entry; `None` when the entry is stale
async fn live_inode(provider: &Arc<dyn StorageProvider>, id: InodeId) -> VfsResult<Option<Inode>> {
    match provider.get_inode(id).await {
        Ok(inode) => Ok(Some(inode)),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err),
    }
}

impl Vfs {
    /// Resolve a path to its owning provider and terminal inode
    ///
    /// Intermediate symlinks are always followed; a terminal symlink only
    /// when `follow_last` is set. Every hop restarts routing from the
    /// mount table, so a link may point into another mount.
    pub(super) async fn locate(&self, raw: &str, follow_last: bool) -> VfsResult<Located> {
        let requested = path::normalize(raw)?;
        let mut current = requested.clone();
        let mut hops = 0usize;
        let mut via_symlink = false;

        'restart: loop {
            let route = self.inner.mounts.route(&current)?;
            let provider = Arc::clone(&route.provider);
            let segments: Vec<String> = path::segments(&route.relative)
                .map(str::to_string)
                .collect();

            let mut dir = provider
                .get_inode(provider.root_id())
                .await
                .map_err(|e| e.with_path(route.mount_path.clone()))?;

            for (index, segment) in segments.iter().enumerate() {
                let walked = walked_path(&route.mount_path, &segments[..=index]);
                if !dir.is_dir() {
                    return Err(VfsError::not_a_file(walked_path(
                        &route.mount_path,
                        &segments[..index],
                    )));
                }

                let child = match provider
                    .lookup(dir.id, segment)
                    .await
                    .map_err(|e| e.with_path(walked.clone()))?
                {
                    Some(id) => live_inode(&provider, id)
                        .await
                        .map_err(|e| e.with_path(walked.clone()))?,
                    None => None,
                };

                let is_last = index + 1 == segments.len();
                match child {
                    None if is_last => {
                        return Ok(Located {
                            requested,
                            path: current,
                            route,
                            parent: dir,
                            name: segment.clone(),
                            inode: None,
                            via_symlink,
                        });
                    }
                    None => return Err(VfsError::not_found(walked)),
                    Some(inode) if inode.is_symlink() && (follow_last || !is_last) => {
                        hops += 1;
                        if hops > self.inner.config.max_symlink_depth {
                            return Err(VfsError::invalid_path(requested)
                                .with_detail("too many levels of symbolic links"));
                        }

                        let target = provider
                            .read_link(inode.id)
                            .await
                            .map_err(|e| e.with_path(walked.clone()))?;
                        let containing = walked_path(&route.mount_path, &segments[..index]);
                        let mut next = path::resolve(&containing, &[target.as_str()])?;
                        let rest = &segments[index + 1..];
                        if !rest.is_empty() {
                            next = path::join(&[next, rest.join("/")]);
                        }

                        current = next;
                        via_symlink = true;
                        continue 'restart;
                    }
                    Some(inode) if is_last => {
                        return Ok(Located {
                            requested,
                            path: current,
                            route,
                            parent: dir,
                            name: segment.clone(),
                            inode: Some(inode),
                            via_symlink,
                        });
                    }
                    Some(inode) => dir = inode,
                }
            }

            // Mount root
            return Ok(Located {
                requested,
                path: current,
                route,
                parent: dir.clone(),
                name: String::new(),
                inode: Some(dir),
                via_symlink,
            });
        }
    }

    /// `locate` for mutating calls
    ///
    /// Paths under a read-only mount fail `AccessDenied` whether or not
    /// they resolve. Only the requested path's own mount is consulted on
    /// failure, so links out to a writable mount still work.
    pub(super) async fn locate_mut(&self, raw: &str, follow_last: bool) -> VfsResult<Located> {
        match self.locate(raw, follow_last).await {
            Ok(located) => {
                located.route.check_writable(&located.path)?;
                Ok(located)
            }
            Err(err) => {
                let requested = path::normalize(raw)?;
                if let Ok(route) = self.inner.mounts.route(&requested) {
                    route.check_writable(&requested)?;
                }
                Err(err)
            }
        }
    }

    /// Whether a mount point lives strictly below `dir`
    pub(super) fn contains_mount(&self, dir: &str) -> bool {
        self.inner
            .mounts
            .mounts()
            .into_iter()
            .any(|m| m.path != dir && path::is_ancestor(dir, &m.path))
    }
}
