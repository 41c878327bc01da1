/*!
 * VFS Limits and Constants
 *
 * Centralized location for filesystem-wide limits and defaults.
 * Values marked [LINUX-COMPAT] mirror their Linux counterparts.
 */

// =============================================================================
// INODES
// =============================================================================

/// Inode id of every provider's root directory
pub const ROOT_INODE_ID: u64 = 1;

/// Block size used to derive `Inode::blocks` from the byte size
/// [LINUX-COMPAT] st_blocks is counted in 512-byte units
pub const BLOCK_SIZE: u64 = 512;

/// Maximum length of a single path component
/// [LINUX-COMPAT] NAME_MAX
pub const MAX_NAME_LENGTH: usize = 255;

// =============================================================================
// PATH RESOLUTION
// =============================================================================

/// Maximum number of symlink hops during a single resolution
/// [LINUX-COMPAT] MAXSYMLINKS
pub const MAX_SYMLINK_DEPTH: usize = 40;

// =============================================================================
// PERMISSIONS
// =============================================================================

/// Default mode for new files (rw-r--r--)
pub const DEFAULT_FILE_MODE: u32 = 0o644;

/// Default mode for new directories (rwxr-xr-x)
pub const DEFAULT_DIR_MODE: u32 = 0o755;

/// Default mode for symlinks (rwxrwxrwx)
pub const DEFAULT_SYMLINK_MODE: u32 = 0o777;

/// Owner assigned to inodes when no other owner is configured
pub const DEFAULT_OWNER: &str = "user";

/// Group assigned to inodes when no other group is configured
pub const DEFAULT_GROUP: &str = "users";

// =============================================================================
// CACHE & CAPACITY
// =============================================================================

/// Default metadata cache capacity (entries)
pub const DEFAULT_CACHE_CAPACITY: usize = 1024;

/// In-memory filesystem capacity for /tmp (100MB)
pub const TMP_FILESYSTEM_CAPACITY: u64 = 100 * 1024 * 1024;

/// In-memory filesystem capacity for /cache (50MB)
pub const CACHE_FILESYSTEM_CAPACITY: u64 = 50 * 1024 * 1024;

/// Operations slower than this are logged at warn level (milliseconds)
pub const SLOW_OPERATION_THRESHOLD_MS: u128 = 10;
