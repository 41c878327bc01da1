/*!
 * Core Module
 * Shared limits and serde helpers
 */

pub mod limits;
pub mod serde;
