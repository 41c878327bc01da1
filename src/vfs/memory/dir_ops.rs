/*!
 * Directory Operations Implementation
 * Child links, listings and transactional recursive delete
 */

use ahash::RandomState;
use std::collections::HashSet;

use super::super::types::*;
use super::{inode_label, MemoryProvider, Store};
use crate::core::limits::ROOT_INODE_ID;

impl MemoryProvider {
    pub(super) fn lookup_impl(&self, parent: InodeId, name: &str) -> VfsResult<Option<InodeId>> {
        let store = self.store.read();
        let entry = store.entry(parent)?;
        let children = entry
            .children()
            .ok_or_else(|| VfsError::not_a_file(inode_label(parent)))?;
        Ok(children.get(name).copied())
    }

    pub(super) fn add_child_impl(&self, parent: InodeId, name: &str, child: InodeId) -> VfsResult<()> {
        DirEntry::validate_name(name)?;
        let mut store = self.store.write();

        if !store.entries.contains_key(&child) {
            return Err(VfsError::not_found(inode_label(child)));
        }

        let entry = store.entry_mut(parent)?;
        let children = entry
            .children_mut()
            .ok_or_else(|| VfsError::not_a_file(inode_label(parent)))?;
        // Last writer wins: an existing link under this name is replaced
        let replaced = children.insert(name.to_string(), child);
        entry.inode.touch();

        if replaced != Some(child) {
            adjust_links(&mut store, child, 1);
            if let Some(old) = replaced {
                adjust_links(&mut store, old, -1);
            }
        }
        Ok(())
    }

    pub(super) fn remove_child_impl(&self, parent: InodeId, name: &str) -> VfsResult<()> {
        let mut store = self.store.write();
        let entry = store.entry_mut(parent)?;
        let children = entry
            .children_mut()
            .ok_or_else(|| VfsError::not_a_file(inode_label(parent)))?;
        if let Some(old) = children.remove(name) {
            entry.inode.touch();
            adjust_links(&mut store, old, -1);
        }
        Ok(())
    }

    pub(super) fn read_dir_impl(&self, id: InodeId) -> VfsResult<Vec<DirEntry>> {
        let store = self.store.read();
        let entry = store.entry(id)?;
        let children = entry
            .children()
            .ok_or_else(|| VfsError::not_a_file(inode_label(id)))?;

        // Links to deleted inodes are skipped
        Ok(children
            .iter()
            .filter_map(|(name, child)| {
                store.entries.get(child).map(|node| {
                    DirEntry::new_unchecked(name.clone(), *child, node.inode.file_type)
                })
            })
            .collect())
    }

    /// Delete an inode and its linked descendants
    ///
    /// The whole subtree is collected and validated before anything is
    /// removed, and removal happens under a single write lock, so a
    /// rejected delete leaves the tree untouched.
    pub(super) fn delete_inode_impl(&self, id: InodeId) -> VfsResult<()> {
        if id == ROOT_INODE_ID {
            return Err(VfsError::access_denied(inode_label(id)).with_detail("root is not deletable"));
        }

        let mut store = self.store.write();
        let doomed = collect_subtree(&store, id)?;

        // Pre-order collection; reversed it removes leaves before parents
        for victim in doomed.iter().rev() {
            if let Some(entry) = store.entries.remove(victim) {
                store.bytes_used -= entry.payload.charged_bytes();
            }
        }

        tracing::trace!(inode = id, removed = doomed.len(), "deleted inode subtree");
        Ok(())
    }
}

/// Shift the name count of a linked inode; dangling ids are ignored
fn adjust_links(store: &mut Store, id: InodeId, delta: i32) {
    if let Some(entry) = store.entries.get_mut(&id) {
        entry.inode.links = entry.inode.links.saturating_add_signed(delta);
    }
}

/// Pre-order list of `id` and every inode reachable below it
///
/// Dangling links are skipped. Fails if the root is reachable, which
/// only happens when the root was linked into its own subtree.
fn collect_subtree(store: &Store, id: InodeId) -> VfsResult<Vec<InodeId>> {
    store.entry(id)?;

    let mut seen: HashSet<InodeId, RandomState> = HashSet::with_hasher(RandomState::new());
    let mut order = Vec::new();
    let mut stack = vec![id];

    while let Some(current) = stack.pop() {
        if !seen.insert(current) {
            continue;
        }
        if current == ROOT_INODE_ID {
            return Err(VfsError::access_denied(inode_label(id))
                .with_detail("subtree links back to the root"));
        }
        let Some(entry) = store.entries.get(&current) else {
            continue;
        };
        order.push(current);
        if let Some(children) = entry.children() {
            stack.extend(children.values().rev().copied());
        }
    }

    Ok(order)
}
