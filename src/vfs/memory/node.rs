/*!
 * Storage Entry Types
 * Internal pairing of an inode with its payload
 */

use std::collections::BTreeMap;

use super::super::types::{FileType, Inode, InodeId};

/// Inode payload, by inode type
#[derive(Debug, Clone)]
pub(in crate::vfs) enum Payload {
    File(Vec<u8>),
    Directory(BTreeMap<String, InodeId>),
    Symlink(String),
    Special,
}

impl Payload {
    pub fn empty_for(file_type: FileType) -> Self {
        match file_type {
            FileType::File => Payload::File(Vec::new()),
            FileType::Directory => Payload::Directory(BTreeMap::new()),
            FileType::Symlink => Payload::Symlink(String::new()),
            FileType::Device | FileType::Fifo => Payload::Special,
        }
    }

    /// Bytes charged against the provider capacity
    pub fn charged_bytes(&self) -> u64 {
        match self {
            Payload::File(data) => data.len() as u64,
            Payload::Symlink(target) => target.len() as u64,
            Payload::Directory(_) | Payload::Special => 0,
        }
    }
}

/// An inode together with its content
#[derive(Debug, Clone)]
pub(in crate::vfs) struct StorageEntry {
    pub inode: Inode,
    pub payload: Payload,
}

impl StorageEntry {
    pub fn new(inode: Inode) -> Self {
        let payload = Payload::empty_for(inode.file_type);
        Self { inode, payload }
    }

    pub fn children(&self) -> Option<&BTreeMap<String, InodeId>> {
        match &self.payload {
            Payload::Directory(children) => Some(children),
            _ => None,
        }
    }

    pub fn children_mut(&mut self) -> Option<&mut BTreeMap<String, InodeId>> {
        match &mut self.payload {
            Payload::Directory(children) => Some(children),
            _ => None,
        }
    }
}
