/*!
 * AI-OS Virtual File System
 * In-process, POSIX-flavored filesystem core exposed as a library
 */

pub mod config;
pub mod core;
pub mod monitoring;
pub mod vfs;

// Re-exports
pub use config::{ConfigError, VfsConfig};
pub use monitoring::{init_tracing, MetricsSnapshot, PerfMonitor};
pub use vfs::path::{basename, dirname, extname, join, normalize, relative, resolve, split};
pub use vfs::{
    init_vfs, seed_from_host, CacheStats, DirEntry, ErrorKind, FileEvent, FileType, Inode, InodeId,
    MemoryProvider, MountConfig, Permissions, StorageProvider, Vfs, VfsError, VfsResult,
    WatchGuard, WriteOptions,
};
