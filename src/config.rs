/*!
 * VFS Configuration
 *
 * Runtime configuration from defaults, environment variables or JSON
 */

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::limits::{
    CACHE_FILESYSTEM_CAPACITY, DEFAULT_CACHE_CAPACITY, DEFAULT_GROUP, DEFAULT_OWNER,
    MAX_SYMLINK_DEPTH, TMP_FILESYSTEM_CAPACITY,
};
use crate::vfs::paths;

/// Configuration loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error("malformed configuration: {0}")]
    Json(#[from] serde_json::Error),
}

/// VFS configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case", deny_unknown_fields)]
pub struct VfsConfig {
    /// Metadata cache capacity (entries)
    pub cache_capacity: usize,
    /// Symlink hops allowed in one resolution
    pub max_symlink_depth: usize,
    /// Owner stamped on inodes created by the default providers
    pub owner: String,
    /// Group stamped on inodes created by the default providers
    pub group: String,
    /// Byte capacity of the standard /tmp mount
    pub tmp_capacity: u64,
    /// Byte capacity of the standard /cache mount
    pub cache_mount_capacity: u64,
    /// Host directory imported at startup, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed_path: Option<String>,
    /// VFS directory receiving the imported tree
    pub seed_target: String,
}

impl Default for VfsConfig {
    fn default() -> Self {
        Self {
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            max_symlink_depth: MAX_SYMLINK_DEPTH,
            owner: DEFAULT_OWNER.to_string(),
            group: DEFAULT_GROUP.to_string(),
            tmp_capacity: TMP_FILESYSTEM_CAPACITY,
            cache_mount_capacity: CACHE_FILESYSTEM_CAPACITY,
            seed_path: None,
            seed_target: paths::system::APPS.to_string(),
        }
    }
}

impl VfsConfig {
    /// Defaults overridden by `VFS_*` environment variables
    ///
    /// Recognized: VFS_CACHE_CAPACITY, VFS_MAX_SYMLINK_DEPTH, VFS_OWNER,
    /// VFS_GROUP, VFS_TMP_CAPACITY, VFS_CACHE_MOUNT_CAPACITY,
    /// VFS_SEED_PATH, VFS_SEED_TARGET.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(value) = env_var("VFS_CACHE_CAPACITY") {
            config.cache_capacity = parse("VFS_CACHE_CAPACITY", value)?;
        }
        if let Some(value) = env_var("VFS_MAX_SYMLINK_DEPTH") {
            config.max_symlink_depth = parse("VFS_MAX_SYMLINK_DEPTH", value)?;
        }
        if let Some(value) = env_var("VFS_OWNER") {
            config.owner = value;
        }
        if let Some(value) = env_var("VFS_GROUP") {
            config.group = value;
        }
        if let Some(value) = env_var("VFS_TMP_CAPACITY") {
            config.tmp_capacity = parse("VFS_TMP_CAPACITY", value)?;
        }
        if let Some(value) = env_var("VFS_CACHE_MOUNT_CAPACITY") {
            config.cache_mount_capacity = parse("VFS_CACHE_MOUNT_CAPACITY", value)?;
        }
        if let Some(value) = env_var("VFS_SEED_PATH") {
            config.seed_path = Some(value);
        }
        if let Some(value) = env_var("VFS_SEED_TARGET") {
            config.seed_target = value;
        }

        Ok(config)
    }

    /// Parse a JSON document; missing fields keep their defaults
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Non-empty environment variable
fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse<T>(key: &'static str, value: String) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse::<T>().map_err(|e| ConfigError::Invalid {
        key,
        reason: e.to_string(),
        value,
    })
}
