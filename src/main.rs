/*!
 * AI-OS VFS - Demo Entry Point
 *
 * Builds the standard filesystem layout, imports an optional host
 * directory and reports mounts, usage and operation metrics.
 */

use anyhow::Context;
use tracing::info;

use ai_os_vfs::vfs::paths::user;
use ai_os_vfs::{init_tracing, init_vfs, VfsConfig, WriteOptions};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize structured tracing
    init_tracing();

    info!("AI-OS VFS starting...");
    info!("================================================");

    let config = VfsConfig::from_env().context("invalid VFS configuration")?;
    info!(
        cache_capacity = config.cache_capacity,
        owner = %config.owner,
        seed_path = ?config.seed_path,
        "Configuration loaded"
    );

    let vfs = init_vfs(config).await.context("VFS initialization failed")?;

    let welcome = format!("{}/welcome.txt", user::DOCUMENTS);
    vfs.write_file(&welcome, b"Welcome to AI-OS\n", WriteOptions::default())
        .await
        .context("failed to write welcome file")?;
    let stat = vfs.stat(&welcome).await?;
    info!(path = %welcome, size = stat.size, permissions = %stat.permissions, "Wrote welcome file");

    for mount in vfs.get_mounts() {
        info!(
            path = %mount.path,
            provider = %mount.provider,
            read_only = mount.read_only,
            "Mount"
        );
    }

    for (prefix, usage) in vfs.mount_usage() {
        info!(
            mount = %prefix,
            inodes = usage.inodes,
            bytes_used = usage.bytes_used,
            capacity = ?usage.capacity,
            "Usage"
        );
    }

    let report = vfs.optimize().await?;
    info!(removed = report.removed_inodes, "Optimize pass complete");

    let metrics = serde_json::to_string_pretty(&vfs.metrics())?;
    info!(cache = ?vfs.cache_stats(), "Cache statistics");
    info!("Operation metrics:\n{metrics}");

    info!("================================================");
    info!("AI-OS VFS shutting down");
    Ok(())
}
