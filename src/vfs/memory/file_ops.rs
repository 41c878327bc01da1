/*!
 * File Operations Implementation
 * Content reads and wholesale writes for file and symlink inodes
 */

use super::super::types::*;
use super::node::Payload;
use super::{inode_label, MemoryProvider};

impl MemoryProvider {
    pub(super) fn read_file_impl(&self, id: InodeId) -> VfsResult<Vec<u8>> {
        let store = self.store.read();
        let entry = store.entry(id)?;
        match &entry.payload {
            Payload::File(data) => Ok(data.clone()),
            Payload::Directory(_) => Err(VfsError::is_directory(inode_label(id))),
            Payload::Symlink(_) | Payload::Special => Err(VfsError::not_a_file(inode_label(id))),
        }
    }

    pub(super) fn write_file_impl(&self, id: InodeId, data: &[u8]) -> VfsResult<Inode> {
        let mut store = self.store.write();

        let old_len = match &store.entry(id)?.payload {
            Payload::File(existing) => existing.len() as u64,
            Payload::Directory(_) => return Err(VfsError::is_directory(inode_label(id))),
            Payload::Symlink(_) | Payload::Special => {
                return Err(VfsError::not_a_file(inode_label(id)))
            }
        };

        let new_len = data.len() as u64;
        if new_len > old_len {
            self.check_space(&store, new_len - old_len, id)?;
        }

        let entry = store.entry_mut(id)?;
        entry.payload = Payload::File(data.to_vec());
        entry.inode.set_size(new_len);
        entry.inode.touch();
        let inode = entry.inode.clone();

        store.bytes_used = store.bytes_used - old_len + new_len;
        Ok(inode)
    }

    pub(super) fn read_link_impl(&self, id: InodeId) -> VfsResult<String> {
        let store = self.store.read();
        match &store.entry(id)?.payload {
            Payload::Symlink(target) => Ok(target.clone()),
            _ => Err(VfsError::invalid_path(inode_label(id)).with_detail("not a symbolic link")),
        }
    }

    pub(super) fn set_link_target_impl(&self, id: InodeId, target: &str) -> VfsResult<Inode> {
        let mut store = self.store.write();

        let old_len = match &store.entry(id)?.payload {
            Payload::Symlink(existing) => existing.len() as u64,
            _ => {
                return Err(
                    VfsError::invalid_path(inode_label(id)).with_detail("not a symbolic link")
                )
            }
        };

        let new_len = target.len() as u64;
        if new_len > old_len {
            self.check_space(&store, new_len - old_len, id)?;
        }

        let entry = store.entry_mut(id)?;
        entry.payload = Payload::Symlink(target.to_string());
        entry.inode.set_size(new_len);
        entry.inode.touch();
        let inode = entry.inode.clone();

        store.bytes_used = store.bytes_used - old_len + new_len;
        Ok(inode)
    }
}
