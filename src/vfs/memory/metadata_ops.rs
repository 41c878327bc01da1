/*!
 * Metadata Operations Implementation
 * Inode allocation, updates, reachability GC and the provider trait
 */

use ahash::RandomState;
use async_trait::async_trait;
use std::collections::{HashSet, VecDeque};
use tracing::{debug, info};

use super::super::provider::{OptimizeReport, ProviderUsage, StorageProvider};
use super::super::types::*;
use super::node::StorageEntry;
use super::MemoryProvider;
use crate::core::limits::ROOT_INODE_ID;

impl MemoryProvider {
    pub(super) fn create_inode_impl(
        &self,
        file_type: FileType,
        permissions: Permissions,
    ) -> VfsResult<Inode> {
        let mut store = self.store.write();
        let id = store.next_id;
        store.next_id += 1;

        let mut inode = Inode::new(id, file_type, permissions, self.owner.clone(), self.group.clone());
        // Counted by add_child once a directory names it
        inode.links = 0;
        store.entries.insert(id, StorageEntry::new(inode.clone()));
        Ok(inode)
    }

    pub(super) fn get_inode_impl(&self, id: InodeId) -> VfsResult<Inode> {
        Ok(self.store.read().entry(id)?.inode.clone())
    }

    pub(super) fn update_inode_impl(&self, id: InodeId, update: InodeUpdate) -> VfsResult<Inode> {
        let mut store = self.store.write();
        let entry = store.entry_mut(id)?;
        update.apply(&mut entry.inode);
        Ok(entry.inode.clone())
    }

    /// Breadth-first reachability from the root; everything else goes
    pub(super) fn optimize_impl(&self) -> VfsResult<OptimizeReport> {
        let mut store = self.store.write();

        let mut reachable: HashSet<InodeId, RandomState> = HashSet::with_hasher(RandomState::new());
        let mut queue = VecDeque::from([ROOT_INODE_ID]);
        while let Some(current) = queue.pop_front() {
            if !reachable.insert(current) {
                continue;
            }
            if let Some(children) = store.entries.get(&current).and_then(StorageEntry::children) {
                queue.extend(
                    children
                        .values()
                        .filter(|child| store.entries.contains_key(*child))
                        .copied(),
                );
            }
        }

        let orphans: Vec<InodeId> = store
            .entries
            .keys()
            .filter(|id| !reachable.contains(*id))
            .copied()
            .collect();

        let mut report = OptimizeReport::default();
        for orphan in orphans {
            if let Some(entry) = store.entries.remove(&orphan) {
                let bytes = entry.payload.charged_bytes();
                store.bytes_used -= bytes;
                report.removed_inodes += 1;
                report.reclaimed_bytes += bytes;
                debug!(inode = orphan, bytes, "collected unreachable inode");
            }
        }

        if report.removed_inodes > 0 {
            info!(
                removed = report.removed_inodes,
                reclaimed_bytes = report.reclaimed_bytes,
                "memory provider optimized"
            );
        }
        Ok(report)
    }

    pub(super) fn usage_impl(&self) -> ProviderUsage {
        let store = self.store.read();
        ProviderUsage {
            inodes: store.entries.len(),
            bytes_used: store.bytes_used,
            capacity: self.max_size,
        }
    }
}

#[async_trait]
impl StorageProvider for MemoryProvider {
    fn name(&self) -> &str {
        "memory"
    }

    async fn create_inode(&self, file_type: FileType, permissions: Permissions) -> VfsResult<Inode> {
        self.create_inode_impl(file_type, permissions)
    }

    async fn get_inode(&self, id: InodeId) -> VfsResult<Inode> {
        self.get_inode_impl(id)
    }

    async fn lookup(&self, parent: InodeId, name: &str) -> VfsResult<Option<InodeId>> {
        self.lookup_impl(parent, name)
    }

    async fn add_child(&self, parent: InodeId, name: &str, child: InodeId) -> VfsResult<()> {
        self.add_child_impl(parent, name, child)
    }

    async fn remove_child(&self, parent: InodeId, name: &str) -> VfsResult<()> {
        self.remove_child_impl(parent, name)
    }

    async fn delete_inode(&self, id: InodeId) -> VfsResult<()> {
        self.delete_inode_impl(id)
    }

    async fn read_file(&self, id: InodeId) -> VfsResult<Vec<u8>> {
        self.read_file_impl(id)
    }

    async fn write_file(&self, id: InodeId, data: &[u8]) -> VfsResult<Inode> {
        self.write_file_impl(id, data)
    }

    async fn read_dir(&self, id: InodeId) -> VfsResult<Vec<DirEntry>> {
        self.read_dir_impl(id)
    }

    async fn read_link(&self, id: InodeId) -> VfsResult<String> {
        self.read_link_impl(id)
    }

    async fn set_link_target(&self, id: InodeId, target: &str) -> VfsResult<Inode> {
        self.set_link_target_impl(id, target)
    }

    async fn update_inode(&self, id: InodeId, update: InodeUpdate) -> VfsResult<Inode> {
        self.update_inode_impl(id, update)
    }

    async fn optimize(&self) -> VfsResult<OptimizeReport> {
        self.optimize_impl()
    }

    fn usage(&self) -> ProviderUsage {
        self.usage_impl()
    }
}
