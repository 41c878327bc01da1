/*!
 * VFS Permissions
 * rwx×3 permission bitmask with validation
 */

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use crate::core::limits::{DEFAULT_DIR_MODE, DEFAULT_FILE_MODE, DEFAULT_SYMLINK_MODE};

/// Owner read bit
const OWNER_READ: u32 = 0o400;
/// Owner write bit
const OWNER_WRITE: u32 = 0o200;

/// Permission bitmask (Unix-style) with validation
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permissions {
    #[serde(deserialize_with = "deserialize_permission_mode")]
    pub mode: u32,
}

impl Permissions {
    /// Create permissions with mode validation (masks to valid bits)
    #[inline]
    #[must_use]
    pub const fn new(mode: u32) -> Self {
        Self {
            mode: mode & 0o7777,
        }
    }

    /// Default file permissions (0o644)
    #[inline]
    #[must_use]
    pub const fn file_default() -> Self {
        Self::new(DEFAULT_FILE_MODE)
    }

    /// Default directory permissions (0o755)
    #[inline]
    #[must_use]
    pub const fn dir_default() -> Self {
        Self::new(DEFAULT_DIR_MODE)
    }

    /// Default symlink permissions (0o777)
    #[inline]
    #[must_use]
    pub const fn symlink_default() -> Self {
        Self::new(DEFAULT_SYMLINK_MODE)
    }

    /// Create read-only permissions (0o444)
    #[inline]
    #[must_use]
    pub const fn readonly() -> Self {
        Self { mode: 0o444 }
    }

    /// Owner may read
    #[inline(always)]
    #[must_use]
    pub const fn owner_can_read(&self) -> bool {
        self.mode & OWNER_READ != 0
    }

    /// Owner may write
    #[inline(always)]
    #[must_use]
    pub const fn owner_can_write(&self) -> bool {
        self.mode & OWNER_WRITE != 0
    }
}

/// Deserialize and validate permission mode (must be <= 0o7777)
fn deserialize_permission_mode<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let mode = u32::deserialize(deserializer)?;
    if mode > 0o7777 {
        return Err(serde::de::Error::custom(format!(
            "invalid permission mode: 0o{:o} exceeds maximum 0o7777",
            mode
        )));
    }
    Ok(mode)
}

impl Default for Permissions {
    fn default() -> Self {
        Self::file_default()
    }
}

/// Renders the `rwxr-xr-x` form
impl fmt::Display for Permissions {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        const FLAGS: [char; 3] = ['r', 'w', 'x'];
        for bit in (0..9usize).rev() {
            let flag = if self.mode & (1 << bit) != 0 {
                FLAGS[2 - bit % 3]
            } else {
                '-'
            };
            write!(f, "{flag}")?;
        }
        Ok(())
    }
}
