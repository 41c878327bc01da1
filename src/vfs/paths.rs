/*!
 * Standard Filesystem Paths
 * Centralized path constants for the default VFS layout
 */

/// Standard mount points
pub mod mounts {
    /// Scratch space backed by a capacity-limited memory provider
    pub const TMP: &str = "/tmp";

    /// Cache space backed by a capacity-limited memory provider
    pub const CACHE: &str = "/cache";
}

/// System directories on the root mount
pub mod system {
    /// Applications imported from the host at startup
    pub const APPS: &str = "/apps";

    /// System configuration
    pub const ETC: &str = "/etc";

    /// Variable data
    pub const VAR: &str = "/var";

    /// Log files
    pub const LOG: &str = "/var/log";
}

/// User directories on the root mount
pub mod user {
    pub const HOME: &str = "/home";
    pub const USER: &str = "/home/user";
    pub const DOCUMENTS: &str = "/home/user/documents";
    pub const DOWNLOADS: &str = "/home/user/downloads";
    pub const PROJECTS: &str = "/home/user/projects";
}

/// All standard directories created at init, parents first
pub fn standard_directories() -> Vec<&'static str> {
    vec![
        system::APPS,
        system::ETC,
        system::VAR,
        system::LOG,
        user::HOME,
        user::USER,
        user::DOCUMENTS,
        user::DOWNLOADS,
        user::PROJECTS,
    ]
}
