/*!
 * Storage Provider Traits
 * Inode-oriented CRUD contract implemented by every backing store
 */

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use super::types::*;
use crate::core::limits::ROOT_INODE_ID;

/// Backing store for one mount
///
/// Every call is logically atomic for a single caller. Implementations
/// must never hold an internal lock across an `.await`.
#[async_trait]
pub trait StorageProvider: Send + Sync + fmt::Debug {
    /// Provider type name (e.g. "memory")
    fn name(&self) -> &str;

    /// Id of the root directory inode
    fn root_id(&self) -> InodeId {
        ROOT_INODE_ID
    }

    /// Allocate an unlinked inode with a fresh id
    async fn create_inode(&self, file_type: FileType, permissions: Permissions) -> VfsResult<Inode>;

    /// Snapshot of an inode
    async fn get_inode(&self, id: InodeId) -> VfsResult<Inode>;

    /// Find a child of a directory by name
    async fn lookup(&self, parent: InodeId, name: &str) -> VfsResult<Option<InodeId>>;

    /// Link `child` under `parent` as `name`, replacing any existing link
    async fn add_child(&self, parent: InodeId, name: &str, child: InodeId) -> VfsResult<()>;

    /// Unlink `name` from `parent`; absent names are ignored
    async fn remove_child(&self, parent: InodeId, name: &str) -> VfsResult<()>;

    /// Delete an inode and, for directories, every linked descendant
    async fn delete_inode(&self, id: InodeId) -> VfsResult<()>;

    /// Read the full contents of a file inode
    async fn read_file(&self, id: InodeId) -> VfsResult<Vec<u8>>;

    /// Replace the contents of a file inode
    async fn write_file(&self, id: InodeId, data: &[u8]) -> VfsResult<Inode>;

    /// Snapshot of a directory's entries, sorted by name
    async fn read_dir(&self, id: InodeId) -> VfsResult<Vec<DirEntry>>;

    /// Target of a symlink inode
    async fn read_link(&self, id: InodeId) -> VfsResult<String>;

    /// Set the target of a symlink inode
    async fn set_link_target(&self, id: InodeId, target: &str) -> VfsResult<Inode>;

    /// Merge a partial update into an inode
    async fn update_inode(&self, id: InodeId, update: InodeUpdate) -> VfsResult<Inode>;

    /// Delete every inode not reachable from the root
    async fn optimize(&self) -> VfsResult<OptimizeReport>;

    /// Current storage usage
    fn usage(&self) -> ProviderUsage;
}

/// Result of an `optimize` pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptimizeReport {
    pub removed_inodes: usize,
    pub reclaimed_bytes: u64,
}

impl std::ops::AddAssign for OptimizeReport {
    fn add_assign(&mut self, other: Self) {
        self.removed_inodes += other.removed_inodes;
        self.reclaimed_bytes += other.reclaimed_bytes;
    }
}

/// Storage usage of a provider
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderUsage {
    pub inodes: usize,
    pub bytes_used: u64,
    pub capacity: Option<u64>,
}

/// Provider construction options, as carried by a mount config
pub type ProviderOptions = BTreeMap<String, String>;

/// Builds providers by name for `Vfs::mount`
pub trait ProviderFactory: Send + Sync {
    fn create(&self, options: &ProviderOptions) -> VfsResult<Arc<dyn StorageProvider>>;
}

impl<F> ProviderFactory for F
where
    F: Fn(&ProviderOptions) -> VfsResult<Arc<dyn StorageProvider>> + Send + Sync,
{
    fn create(&self, options: &ProviderOptions) -> VfsResult<Arc<dyn StorageProvider>> {
        self(options)
    }
}
