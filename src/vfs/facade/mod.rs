/*!
 * VFS Facade
 * Path-based filesystem API over the mount table, providers and cache
 *
 * Every public operation normalizes its input, routes it through the
 * mount table, walks the owning provider's directory graph, performs
 * the provider calls, evicts stale cache entries and only then notifies
 * watchers.
 */

mod dir_ops;
mod file_ops;
mod link_ops;
mod mount_ops;
mod move_ops;
mod resolve;

use ahash::RandomState;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, Instrument};

use super::cache::{CacheStats, MetadataCache};
use super::memory::{MemoryProvider, GROUP_OPTION, OWNER_OPTION};
use super::mount::MountTable;
use super::observable::{FileEvent, WatchGuard, WatchHandler, WatchRegistry};
use super::path;
use super::provider::{ProviderFactory, ProviderOptions, StorageProvider};
use super::types::*;
use crate::config::VfsConfig;
use crate::monitoring::{MetricsSnapshot, OperationSpan, PerfMonitor};
use resolve::Located;

/// Name of the built-in provider factory
pub const MEMORY_PROVIDER: &str = "memory";

/// Options for `Vfs::write_file`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOptions {
    /// Create the file when it does not exist
    pub create: bool,
    /// Fail with `FileExists` when the file already exists
    pub exclusive: bool,
    /// Permissions for a newly created file
    pub permissions: Option<Permissions>,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            create: true,
            exclusive: false,
            permissions: None,
        }
    }
}

impl WriteOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn create(mut self, create: bool) -> Self {
        self.create = create;
        self
    }

    #[must_use]
    pub fn exclusive(mut self, exclusive: bool) -> Self {
        self.exclusive = exclusive;
        self
    }

    #[must_use]
    pub fn permissions(mut self, permissions: Permissions) -> Self {
        self.permissions = Some(permissions);
        self
    }
}

type FactoryMap = HashMap<String, Arc<dyn ProviderFactory>, RandomState>;

struct VfsInner {
    mounts: MountTable,
    cache: MetadataCache,
    watchers: WatchRegistry,
    monitor: Arc<PerfMonitor>,
    factories: RwLock<FactoryMap>,
    config: VfsConfig,
}

/// Virtual filesystem facade
///
/// Cheap to clone; clones share mounts, cache and watchers.
#[derive(Clone)]
pub struct Vfs {
    inner: Arc<VfsInner>,
}

impl Vfs {
    /// Empty VFS with a memory provider mounted at `/`
    pub fn new() -> Self {
        Self::with_config(VfsConfig::default())
    }

    pub fn with_config(config: VfsConfig) -> Self {
        let root = MemoryProvider::with_owner(config.owner.clone(), config.group.clone());
        Self::with_root(config, Arc::new(root))
    }

    /// VFS whose mandatory `/` mount is the given provider
    pub fn with_root(config: VfsConfig, root: Arc<dyn StorageProvider>) -> Self {
        let mut factories: FactoryMap = HashMap::with_hasher(RandomState::new());
        factories.insert(MEMORY_PROVIDER.to_string(), memory_factory(&config));

        Self {
            inner: Arc::new(VfsInner {
                mounts: MountTable::new(root),
                cache: MetadataCache::new(config.cache_capacity),
                watchers: WatchRegistry::new(),
                monitor: Arc::new(PerfMonitor::new()),
                factories: RwLock::new(factories),
                config,
            }),
        }
    }

    pub fn config(&self) -> &VfsConfig {
        &self.inner.config
    }

    /// Register a named provider factory for `mount`
    ///
    /// Replaces any factory previously registered under the same name.
    pub fn register_provider<F>(&self, name: impl Into<String>, factory: F)
    where
        F: ProviderFactory + 'static,
    {
        self.inner
            .factories
            .write()
            .insert(name.into(), Arc::new(factory));
    }

    /// Subscribe to events at or below `path`
    ///
    /// Only future events are delivered. Dropping the guard unsubscribes.
    pub fn watch<F>(&self, path: &str, handler: F) -> VfsResult<WatchGuard>
    where
        F: Fn(&FileEvent) + Send + Sync + 'static,
    {
        let prefix = path::normalize(path)?;
        debug!(prefix = %prefix, "watch registered");
        let handler: WatchHandler = Arc::new(handler);
        Ok(self.inner.watchers.subscribe(prefix, handler))
    }

    /// Operation and cache counters
    pub fn metrics(&self) -> MetricsSnapshot {
        self.inner.monitor.snapshot()
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.inner.cache.stats()
    }

    /// Run `op` inside an operation span, recording its timing
    async fn observe<T, F>(&self, operation: &'static str, path: &str, op: F) -> VfsResult<T>
    where
        F: Future<Output = VfsResult<T>>,
    {
        let span = OperationSpan::new(operation, path);
        let timer = self.inner.monitor.start(operation);
        let result = op.instrument(span.span().clone()).await;
        span.record_result(&result);
        timer.finish(result.as_ref().err().map(VfsError::kind));
        result
    }

    /// Evict a path and its parent directory
    fn evict(&self, normalized: &str) {
        self.inner.cache.invalidate(normalized);
        self.inner.cache.invalidate(path::parent_of(normalized));
    }

    /// Evict both the requested and the resolved form of a location
    fn evict_located(&self, located: &Located) {
        self.evict(&located.path);
        if located.requested != located.path {
            self.evict(&located.requested);
        }
    }

    /// Evict a whole subtree plus the parent of its root
    fn evict_tree(&self, located: &Located) {
        for root in [&located.path, &located.requested] {
            self.inner.cache.invalidate_prefix(root);
            self.inner.cache.invalidate(path::parent_of(root));
        }
    }

    fn emit(&self, event: FileEvent) {
        self.inner.watchers.emit(event);
    }

    /// Best-effort removal of an inode that never got linked
    async fn discard(&self, provider: &Arc<dyn StorageProvider>, id: InodeId) {
        if let Err(err) = provider.delete_inode(id).await {
            debug!(inode = id, error = %err, "failed to discard unlinked inode");
        }
    }
}

impl Default for Vfs {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Vfs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Vfs")
            .field("mounts", &self.inner.mounts)
            .field("cache", &self.inner.cache)
            .field("watchers", &self.inner.watchers)
            .finish()
    }
}

/// Memory factory stamping the configured owner unless options override it
fn memory_factory(config: &VfsConfig) -> Arc<dyn ProviderFactory> {
    let owner = config.owner.clone();
    let group = config.group.clone();
    Arc::new(
        move |options: &ProviderOptions| -> VfsResult<Arc<dyn StorageProvider>> {
            let mut options = options.clone();
            options
                .entry(OWNER_OPTION.to_string())
                .or_insert_with(|| owner.clone());
            options
                .entry(GROUP_OPTION.to_string())
                .or_insert_with(|| group.clone());
            Ok(Arc::new(MemoryProvider::from_options(&options)?))
        },
    )
}

fn require_read(inode: &Inode, path: &str) -> VfsResult<()> {
    if inode.permissions.owner_can_read() {
        Ok(())
    } else {
        Err(VfsError::access_denied(path).with_detail("read permission denied"))
    }
}

fn require_write(inode: &Inode, path: &str) -> VfsResult<()> {
    if inode.permissions.owner_can_write() {
        Ok(())
    } else {
        Err(VfsError::access_denied(path).with_detail("write permission denied"))
    }
}
