/*!
 * Serde Helpers
 * Wire encodings shared by inode snapshots, mount configs and metrics
 */

use serde::{Deserialize, Deserializer, Serializer};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Inode timestamps as whole microseconds since UNIX epoch
///
/// Clocks set before the epoch encode as 0 rather than failing the
/// whole snapshot.
pub mod epoch_micros {
    use super::*;

    pub fn serialize<S: Serializer>(time: &SystemTime, serializer: S) -> Result<S::Ok, S::Error> {
        let micros = time
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX))
            .unwrap_or(0);
        serializer.serialize_u64(micros)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<SystemTime, D::Error> {
        let micros = u64::deserialize(deserializer)?;
        UNIX_EPOCH
            .checked_add(Duration::from_micros(micros))
            .ok_or_else(|| serde::de::Error::custom("timestamp out of range"))
    }
}

/// `skip_serializing_if` predicate for zero counters and sizes
pub fn is_zero_u64(value: &u64) -> bool {
    *value == 0
}

/// `skip_serializing_if` predicate for flags that default to off
pub fn is_false(value: &bool) -> bool {
    !value
}
