/*!
 * In-Memory Storage Provider
 * Fast, volatile inode store for testing and temporary storage
 */

mod dir_ops;
mod file_ops;
mod metadata_ops;
mod node;

use ahash::RandomState;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use super::provider::ProviderOptions;
use super::types::*;
use crate::core::limits::{DEFAULT_GROUP, DEFAULT_OWNER, ROOT_INODE_ID};
use node::StorageEntry;

/// Option key for the byte capacity of a memory mount
pub const CAPACITY_OPTION: &str = "capacity";

/// Option key for the owner stamped on new inodes
pub const OWNER_OPTION: &str = "owner";

/// Option key for the group stamped on new inodes
pub const GROUP_OPTION: &str = "group";

/// Inode table guarded by the provider lock
#[derive(Debug)]
pub(super) struct Store {
    pub(super) entries: HashMap<InodeId, StorageEntry, RandomState>,
    pub(super) next_id: InodeId,
    pub(super) bytes_used: u64,
}

impl Store {
    pub(super) fn entry(&self, id: InodeId) -> VfsResult<&StorageEntry> {
        self.entries.get(&id).ok_or_else(|| VfsError::not_found(inode_label(id)))
    }

    pub(super) fn entry_mut(&mut self, id: InodeId) -> VfsResult<&mut StorageEntry> {
        self.entries
            .get_mut(&id)
            .ok_or_else(|| VfsError::not_found(inode_label(id)))
    }
}

/// Error path used for failures that have no filesystem path yet
pub(super) fn inode_label(id: InodeId) -> String {
    format!("inode:{id}")
}

/// In-memory storage provider
///
/// Inode ids are allocated monotonically and never reused, so a stale
/// directory entry can only ever miss, never alias a newer inode.
/// Clones share the same store.
#[derive(Debug, Clone)]
pub struct MemoryProvider {
    pub(super) store: Arc<RwLock<Store>>,
    pub(super) max_size: Option<u64>,
    pub(super) owner: String,
    pub(super) group: String,
}

impl MemoryProvider {
    /// Create new in-memory provider with an empty root directory
    pub fn new() -> Self {
        Self::with_owner(DEFAULT_OWNER, DEFAULT_GROUP)
    }

    /// Create with the owner/group stamped on new inodes
    pub fn with_owner(owner: impl Into<String>, group: impl Into<String>) -> Self {
        let owner = owner.into();
        let group = group.into();

        let mut root = Inode::new(
            ROOT_INODE_ID,
            FileType::Directory,
            Permissions::dir_default(),
            owner.clone(),
            group.clone(),
        );
        // self + implicit parent
        root.links = 2;

        let mut entries = HashMap::with_hasher(RandomState::new());
        entries.insert(ROOT_INODE_ID, StorageEntry::new(root));

        Self {
            store: Arc::new(RwLock::new(Store {
                entries,
                next_id: ROOT_INODE_ID + 1,
                bytes_used: 0,
            })),
            max_size: None,
            owner,
            group,
        }
    }

    /// Create with size limit
    pub fn with_capacity(max_size: u64) -> Self {
        let mut provider = Self::new();
        provider.max_size = Some(max_size);
        provider
    }

    /// Build from mount options
    ///
    /// Understands `capacity` (bytes), `owner` and `group`.
    pub fn from_options(options: &ProviderOptions) -> VfsResult<Self> {
        let owner = options.get(OWNER_OPTION).map_or(DEFAULT_OWNER, String::as_str);
        let group = options.get(GROUP_OPTION).map_or(DEFAULT_GROUP, String::as_str);
        let mut provider = Self::with_owner(owner, group);
        if let Some(raw) = options.get(CAPACITY_OPTION) {
            let capacity = raw.trim().parse::<u64>().map_err(|e| {
                VfsError::invalid_path(CAPACITY_OPTION)
                    .with_detail(format!("invalid capacity {raw:?}: {e}"))
            })?;
            provider.max_size = Some(capacity);
        }
        Ok(provider)
    }

    /// Check that growing usage by `additional` bytes fits the capacity
    pub(super) fn check_space(&self, store: &Store, additional: u64, id: InodeId) -> VfsResult<()> {
        if let Some(max) = self.max_size {
            if store.bytes_used.saturating_add(additional) > max {
                return Err(VfsError::no_space(inode_label(id)).with_detail(format!(
                    "{} of {} bytes used, {} requested",
                    store.bytes_used, max, additional
                )));
            }
        }
        Ok(())
    }
}

impl Default for MemoryProvider {
    fn default() -> Self {
        Self::new()
    }
}
