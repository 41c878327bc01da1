/*!
 * Mount Operations
 * Provider mounting, unmounting and maintenance across mounts
 */

use std::sync::Arc;
use tracing::info;

use super::Vfs;
use crate::vfs::mount::MountConfig;
use crate::vfs::path;
use crate::vfs::provider::{OptimizeReport, ProviderUsage, StorageProvider};
use crate::vfs::types::*;

impl Vfs {
    /// Mount a provider built by the factory named in `config.provider`
    pub fn mount(&self, config: MountConfig) -> VfsResult<()> {
        let factory = self
            .inner
            .factories
            .read()
            .get(&config.provider)
            .cloned()
            .ok_or_else(|| {
                VfsError::invalid_path(config.path.clone())
                    .with_detail(format!("unknown provider {:?}", config.provider))
            })?;

        let provider = factory.create(&config.options)?;
        self.mount_provider(config, provider)
    }

    /// Mount a pre-built provider
    pub fn mount_provider(
        &self,
        config: MountConfig,
        provider: Arc<dyn StorageProvider>,
    ) -> VfsResult<()> {
        let mount_path = path::normalize(&config.path)?;
        let provider_name = provider.name().to_string();
        let read_only = config.read_only;

        self.inner.mounts.mount(config, provider)?;
        self.inner.cache.invalidate_prefix(&mount_path);

        info!(
            path = %mount_path,
            provider = %provider_name,
            read_only,
            "mounted provider"
        );
        Ok(())
    }

    /// Remove the mount at exactly `mount_path`, returning its config
    pub fn unmount(&self, mount_path: &str) -> VfsResult<MountConfig> {
        let removed = self.inner.mounts.unmount(mount_path)?;
        self.inner.cache.invalidate_prefix(&removed.path);

        info!(path = %removed.path, provider = %removed.provider, "unmounted provider");
        Ok(removed)
    }

    /// Every mount, longest prefix first
    pub fn get_mounts(&self) -> Vec<MountConfig> {
        self.inner.mounts.mounts()
    }

    /// Storage usage of every mount
    pub fn mount_usage(&self) -> Vec<(String, ProviderUsage)> {
        self.inner
            .mounts
            .providers()
            .into_iter()
            .map(|(prefix, provider)| (prefix, provider.usage()))
            .collect()
    }

    /// Collect unreachable inodes on every mount
    pub async fn optimize(&self) -> VfsResult<OptimizeReport> {
        self.observe("optimize", path::ROOT, async {
            let mut total = OptimizeReport::default();
            for (prefix, provider) in self.inner.mounts.providers() {
                let report = provider
                    .optimize()
                    .await
                    .map_err(|e| e.with_path(prefix.clone()))?;
                if report.removed_inodes > 0 {
                    info!(
                        mount = %prefix,
                        removed = report.removed_inodes,
                        reclaimed_bytes = report.reclaimed_bytes,
                        "optimized mount"
                    );
                }
                total += report;
            }
            Ok(total)
        })
        .await
    }
}
