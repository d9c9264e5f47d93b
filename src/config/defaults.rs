//! Default value functions for configuration.

use syncable_proto::log::DEFAULT_MAX_ENTRY_LEN;

/// Returns `true` (for serde defaults).
pub fn default_true() -> bool {
    true
}

pub fn default_log_level() -> String {
    "info".to_string()
}

pub fn default_diff_ops() -> Vec<String> {
    vec!["on".to_string()]
}

pub fn default_max_entry_len() -> usize {
    DEFAULT_MAX_ENTRY_LEN
}
