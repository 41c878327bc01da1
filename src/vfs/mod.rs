/*!
 * Virtual File System Module
 * Path-based filesystem over pluggable, mountable storage providers
 */

pub mod cache;
pub mod facade;
pub mod init;
pub mod memory;
pub mod mount;
pub mod observable;
pub mod path;
pub mod paths;
pub mod provider;
pub mod types;

// Re-exports
pub use cache::{CacheStats, MetadataCache};
pub use facade::{Vfs, WriteOptions, MEMORY_PROVIDER};
pub use init::{init_vfs, seed_from_host, SeedReport};
pub use memory::MemoryProvider;
pub use mount::{MountConfig, MountTable, Route};
pub use observable::{FileEvent, WatchGuard, WatchHandler, WatchRegistry};
pub use provider::{OptimizeReport, ProviderFactory, ProviderOptions, ProviderUsage, StorageProvider};
pub use types::{
    DirEntry, ErrorKind, FileType, Inode, InodeId, InodeUpdate, Permissions, VfsError, VfsResult,
};
