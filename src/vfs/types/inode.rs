/*!
 * VFS Inode
 * Metadata and content identity of a filesystem object
 */

use super::file_type::FileType;
use super::permissions::Permissions;
use crate::core::limits::BLOCK_SIZE;
use crate::core::serde::{epoch_micros, is_zero_u64};
use serde::{Deserialize, Serialize};
use std::time::SystemTime;

/// Inode identifier, unique and never reused within one provider
pub type InodeId = u64;

/// Inode snapshot
///
/// Timestamps are serialized as microseconds since UNIX epoch.
/// `size` is authoritative for files; directories always report 0.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct Inode {
    pub id: InodeId,
    pub file_type: FileType,
    pub permissions: Permissions,
    pub owner: String,
    pub group: String,
    #[serde(skip_serializing_if = "is_zero_u64", default)]
    pub size: u64,
    /// Number of directory entries naming this inode
    pub links: u32,
    #[serde(skip_serializing_if = "is_zero_u64", default)]
    pub blocks: u64,
    #[serde(with = "epoch_micros")]
    pub created: SystemTime,
    #[serde(with = "epoch_micros")]
    pub modified: SystemTime,
    #[serde(with = "epoch_micros")]
    pub accessed: SystemTime,
}

impl Inode {
    /// Fresh inode with all timestamps set to now and one link
    pub fn new(
        id: InodeId,
        file_type: FileType,
        permissions: Permissions,
        owner: impl Into<String>,
        group: impl Into<String>,
    ) -> Self {
        let now = SystemTime::now();
        Self {
            id,
            file_type,
            permissions,
            owner: owner.into(),
            group: group.into(),
            size: 0,
            links: 1,
            blocks: 0,
            created: now,
            modified: now,
            accessed: now,
        }
    }

    /// Record a new content length; directories stay at zero
    pub(crate) fn set_size(&mut self, size: u64) {
        if self.is_dir() {
            return;
        }
        self.size = size;
        self.blocks = size.div_ceil(BLOCK_SIZE);
    }

    /// Bump the modified timestamp
    pub(crate) fn touch(&mut self) {
        self.modified = SystemTime::now();
    }

    /// Check if this is a directory
    ///
    /// # Performance
    /// Hot path - called on every segment during path resolution
    #[inline(always)]
    #[must_use]
    pub const fn is_dir(&self) -> bool {
        matches!(self.file_type, FileType::Directory)
    }

    /// Check if this is a regular file
    #[inline(always)]
    #[must_use]
    pub const fn is_file(&self) -> bool {
        matches!(self.file_type, FileType::File)
    }

    /// Check if this is a symbolic link
    #[inline(always)]
    #[must_use]
    pub const fn is_symlink(&self) -> bool {
        matches!(self.file_type, FileType::Symlink)
    }

    /// Check if this is a special file (device, fifo)
    #[inline]
    #[must_use]
    pub const fn is_special(&self) -> bool {
        matches!(self.file_type, FileType::Device | FileType::Fifo)
    }

    /// Full POSIX-style mode: type bits plus permission bits
    #[must_use]
    pub const fn mode(&self) -> u32 {
        self.file_type.mode_bits() | self.permissions.mode
    }
}

/// Partial inode update merged by `StorageProvider::update_inode`
///
/// Carries no `id` or `file_type`: both are immutable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InodeUpdate {
    pub permissions: Option<Permissions>,
    pub owner: Option<String>,
    pub group: Option<String>,
    pub accessed: Option<SystemTime>,
}

impl InodeUpdate {
    pub fn permissions(permissions: Permissions) -> Self {
        Self {
            permissions: Some(permissions),
            ..Self::default()
        }
    }

    pub fn owner(owner: impl Into<String>, group: Option<String>) -> Self {
        Self {
            owner: Some(owner.into()),
            group,
            ..Self::default()
        }
    }

    /// Apply the update in place
    pub(crate) fn apply(self, inode: &mut Inode) {
        if let Some(permissions) = self.permissions {
            inode.permissions = permissions;
        }
        if let Some(owner) = self.owner {
            inode.owner = owner;
        }
        if let Some(group) = self.group {
            inode.group = group;
        }
        if let Some(accessed) = self.accessed {
            inode.accessed = accessed;
        }
        inode.touch();
    }
}
