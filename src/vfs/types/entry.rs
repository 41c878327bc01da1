/*!
 * VFS Directory Entry
 * A (name, inode, type) view returned by directory listings
 */

use super::errors::VfsError;
use super::file_type::FileType;
use super::inode::InodeId;
use crate::core::limits::MAX_NAME_LENGTH;
use serde::{Deserialize, Deserializer, Serialize};

/// Directory entry
///
/// A view, not an owning reference: the inode it names may be deleted
/// after the listing was taken. Names are non-empty and contain neither
/// null bytes nor path separators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DirEntry {
    #[serde(deserialize_with = "deserialize_valid_filename")]
    pub name: String,
    pub inode: InodeId,
    pub file_type: FileType,
}

impl DirEntry {
    /// Create a new entry without validation (provider use)
    pub(crate) fn new_unchecked(name: String, inode: InodeId, file_type: FileType) -> Self {
        Self {
            name,
            inode,
            file_type,
        }
    }

    /// Check if this is a directory entry
    #[inline]
    #[must_use]
    pub const fn is_dir(&self) -> bool {
        matches!(self.file_type, FileType::Directory)
    }

    /// Check if this is a file entry
    #[inline]
    #[must_use]
    pub const fn is_file(&self) -> bool {
        matches!(self.file_type, FileType::File)
    }

    /// Validate a single path component before it is linked
    pub fn validate_name(name: &str) -> Result<(), VfsError> {
        if let Some(reason) = invalid_name_reason(name) {
            return Err(VfsError::invalid_path(name).with_detail(reason));
        }
        Ok(())
    }
}

fn invalid_name_reason(name: &str) -> Option<&'static str> {
    if name.is_empty() {
        return Some("entry name cannot be empty");
    }
    if name == "." || name == ".." {
        return Some("entry name cannot be a relative component");
    }
    if name.contains('\0') {
        return Some("entry name cannot contain null bytes");
    }
    if name.contains('/') {
        return Some("entry name cannot contain path separators");
    }
    if name.len() > MAX_NAME_LENGTH {
        return Some("entry name too long");
    }
    None
}

/// Deserialize and validate filename
fn deserialize_valid_filename<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let name = String::deserialize(deserializer)?;
    match invalid_name_reason(&name) {
        Some(reason) => Err(serde::de::Error::custom(reason)),
        None => Ok(name),
    }
}
