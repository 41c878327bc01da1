/*!
 * VFS Types
 * Shared types for filesystem operations with serde support
 */

mod entry;
mod errors;
mod file_type;
mod inode;
mod permissions;

pub use entry::DirEntry;
pub use errors::{ErrorKind, VfsError, VfsResult};
pub use file_type::FileType;
pub use inode::{Inode, InodeId, InodeUpdate};
pub use permissions::Permissions;
