/*!
 * VFS File Type Enum
 * Defines the type of an inode
 */

use serde::{Deserialize, Serialize};
use std::fmt;

/// Inode type with complete serde support
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileType {
    #[default]
    File,
    Directory,
    Symlink,
    Device,
    Fifo,
}

impl FileType {
    /// Mode bits for the type portion of a POSIX `st_mode`
    #[must_use]
    pub const fn mode_bits(self) -> u32 {
        match self {
            FileType::File => 0o100000,
            FileType::Directory => 0o040000,
            FileType::Symlink => 0o120000,
            FileType::Device => 0o020000,
            FileType::Fifo => 0o010000,
        }
    }

    /// Single-character marker used by `ls -l` style listings
    #[must_use]
    pub const fn marker(self) -> char {
        match self {
            FileType::File => '-',
            FileType::Directory => 'd',
            FileType::Symlink => 'l',
            FileType::Device => 'c',
            FileType::Fifo => 'p',
        }
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FileType::File => write!(f, "file"),
            FileType::Directory => write!(f, "directory"),
            FileType::Symlink => write!(f, "symlink"),
            FileType::Device => write!(f, "device"),
            FileType::Fifo => write!(f, "fifo"),
        }
    }
}
