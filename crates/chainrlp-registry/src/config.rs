//! Type registry configuration.

use serde::{Deserialize, Serialize};

/// Tuning knobs for a [`TypeRegistry`](crate::TypeRegistry).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Number of cache entries to preallocate
    #[serde(default = "default_initial_capacity")]
    pub initial_capacity: usize,
    /// Maximum nesting of distinct types built in one resolution pass.
    /// Self-references never count; they stop at the placeholder.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

fn default_initial_capacity() -> usize { 64 }
fn default_max_depth() -> usize { 128 }

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            initial_capacity: default_initial_capacity(),
            max_depth: default_max_depth(),
        }
    }
}
