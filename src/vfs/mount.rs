/*!
 * Mount Table
 * Longest-prefix routing of paths to storage providers
 */

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

use super::path::{self, ROOT};
use super::provider::{ProviderOptions, StorageProvider};
use super::types::*;
use crate::core::serde::is_false;

/// Mount point configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct MountConfig {
    pub path: String,
    pub provider: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub options: ProviderOptions,
    #[serde(default, skip_serializing_if = "is_false")]
    pub read_only: bool,
}

impl MountConfig {
    pub fn new<P: Into<String>, S: Into<String>>(path: P, provider: S) -> Self {
        Self {
            path: path.into(),
            provider: provider.into(),
            options: ProviderOptions::new(),
            read_only: false,
        }
    }

    pub fn readonly<P: Into<String>, S: Into<String>>(path: P, provider: S) -> Self {
        Self {
            read_only: true,
            ..Self::new(path, provider)
        }
    }

    /// Add a provider option
    #[must_use]
    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }
}

/// Internal mount entry with provider and options
struct MountEntry {
    config: MountConfig,
    provider: Arc<dyn StorageProvider>,
}

/// Outcome of routing a path through the table
#[derive(Clone)]
pub struct Route {
    pub provider: Arc<dyn StorageProvider>,
    /// Normalized prefix of the owning mount
    pub mount_path: String,
    /// Path inside the provider, always absolute (`/` for the mount root)
    pub relative: String,
    pub read_only: bool,
}

impl Route {
    /// Fail with `AccessDenied` when the owning mount is read-only
    pub fn check_writable(&self, path: &str) -> VfsResult<()> {
        if self.read_only {
            Err(VfsError::access_denied(path).with_detail("read-only mount"))
        } else {
            Ok(())
        }
    }

    /// Whether the path is the root of its mount
    #[inline]
    pub fn is_mount_root(&self) -> bool {
        self.relative == ROOT
    }
}

impl std::fmt::Debug for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Route")
            .field("provider", &self.provider.name())
            .field("mount_path", &self.mount_path)
            .field("relative", &self.relative)
            .field("read_only", &self.read_only)
            .finish()
    }
}

/// Mount table for provider routing
///
/// Entries are kept ordered by descending prefix length, so the first
/// match during routing is the longest one. The root mount is
/// installed at construction and can never be removed.
pub struct MountTable {
    mounts: RwLock<Vec<MountEntry>>,
}

impl MountTable {
    /// Create a table whose default `/` mount is `root`
    pub fn new(root: Arc<dyn StorageProvider>) -> Self {
        let config = MountConfig::new(ROOT, root.name());
        Self {
            mounts: RwLock::new(vec![MountEntry {
                config,
                provider: root,
            }]),
        }
    }

    /// Mount a provider using a MountConfig
    pub fn mount(&self, config: MountConfig, provider: Arc<dyn StorageProvider>) -> VfsResult<()> {
        let mount_path = path::normalize(&config.path)?;
        let mut mounts = self.mounts.write();

        if mounts.iter().any(|m| m.config.path == mount_path) {
            return Err(VfsError::file_exists(mount_path).with_detail("already mounted"));
        }

        let config = MountConfig {
            path: mount_path,
            ..config
        };
        mounts.push(MountEntry { config, provider });
        // Longest paths first, ties broken lexically for a stable listing
        mounts.sort_by(|a, b| {
            b.config
                .path
                .len()
                .cmp(&a.config.path.len())
                .then_with(|| a.config.path.cmp(&b.config.path))
        });

        Ok(())
    }

    /// Unmount the provider at exactly `mount_path`
    pub fn unmount(&self, mount_path: &str) -> VfsResult<MountConfig> {
        let mount_path = path::normalize(mount_path)?;
        if mount_path == ROOT {
            return Err(VfsError::access_denied(mount_path).with_detail("cannot unmount root"));
        }

        let mut mounts = self.mounts.write();
        let index = mounts
            .iter()
            .position(|m| m.config.path == mount_path)
            .ok_or_else(|| VfsError::not_found(mount_path.clone()).with_detail("not a mount point"))?;

        Ok(mounts.remove(index).config)
    }

    /// Resolve path to its owning provider and provider-relative path
    pub fn route(&self, path: &str) -> VfsResult<Route> {
        let path = path::normalize(path)?;
        let mounts = self.mounts.read();

        mounts
            .iter()
            .find(|m| path::is_ancestor(&m.config.path, &path))
            .map(|m| Route {
                provider: Arc::clone(&m.provider),
                mount_path: m.config.path.clone(),
                relative: path::strip_ancestor(&m.config.path, &path),
                read_only: m.config.read_only,
            })
            .ok_or_else(|| VfsError::not_found(path).with_detail("no provider mounted"))
    }

    /// List all mount points, longest prefix first
    pub fn mounts(&self) -> Vec<MountConfig> {
        self.mounts.read().iter().map(|m| m.config.clone()).collect()
    }

    /// Providers of every mount, with their prefixes
    pub fn providers(&self) -> Vec<(String, Arc<dyn StorageProvider>)> {
        self.mounts
            .read()
            .iter()
            .map(|m| (m.config.path.clone(), Arc::clone(&m.provider)))
            .collect()
    }

    /// Check if path is exactly a mount point
    pub fn is_mounted(&self, mount_path: &str) -> bool {
        match path::normalize(mount_path) {
            Ok(normalized) => self.mounts.read().iter().any(|m| m.config.path == normalized),
            Err(_) => false,
        }
    }
}

impl std::fmt::Debug for MountTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.mounts()).finish()
    }
}
