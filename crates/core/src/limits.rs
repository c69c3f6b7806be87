//! Size limits for path writes
//!
//! Auto-vivification pads arrays with nulls up to the addressed index, so an
//! unchecked `items[4000000000]` would try to allocate billions of cells.
//! These limits are checked by `Document::put` before any mutation happens.
//!
//! | Limit | Default |
//! |-------|---------|
//! | Path length | 256 segments |
//! | Array index reachable by padding | 1M |
//! | Nesting depth of a written value | 100 levels |

use crate::path::Path;
use crate::value::Value;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default maximum path length in segments
pub const MAX_PATH_SEGMENTS: usize = 256;

/// Default maximum array index a write may address
pub const MAX_ARRAY_INDEX: usize = 1_000_000;

/// Default maximum nesting depth of a written value
pub const MAX_NESTING_DEPTH: usize = 100;

/// Limits enforced on writes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    /// Maximum number of segments in a path expression
    pub max_path_segments: usize,
    /// Maximum array index reachable by a write
    pub max_array_index: usize,
    /// Maximum nesting depth of a written value
    pub max_nesting_depth: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Limits {
            max_path_segments: MAX_PATH_SEGMENTS,
            max_array_index: MAX_ARRAY_INDEX,
            max_nesting_depth: MAX_NESTING_DEPTH,
        }
    }
}

impl Limits {
    /// Create limits with small values for testing
    pub fn with_small_limits() -> Self {
        Limits {
            max_path_segments: 8,
            max_array_index: 100,
            max_nesting_depth: 4,
        }
    }

    /// Validate path length and every index it addresses
    pub fn validate_path(&self, path: &Path) -> Result<(), LimitError> {
        if path.len() > self.max_path_segments {
            return Err(LimitError::PathTooLong {
                length: path.len(),
                max: self.max_path_segments,
            });
        }
        for index in path.segments().iter().filter_map(|s| s.index()) {
            if index > self.max_array_index {
                return Err(LimitError::IndexTooLarge {
                    index,
                    max: self.max_array_index,
                });
            }
        }
        Ok(())
    }

    /// Validate the nesting depth of a value about to be written
    pub fn validate_value(&self, value: &Value) -> Result<(), LimitError> {
        let depth = value.nesting_depth();
        if depth > self.max_nesting_depth {
            return Err(LimitError::NestingTooDeep {
                depth,
                max: self.max_nesting_depth,
            });
        }
        Ok(())
    }
}

/// Limit validation errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LimitError {
    /// Path exceeds maximum length
    #[error("path length {length} exceeds maximum of {max} segments")]
    PathTooLong {
        /// Actual path length
        length: usize,
        /// Maximum allowed length
        max: usize,
    },

    /// Index exceeds the maximum reachable index
    #[error("array index {index} exceeds maximum of {max}")]
    IndexTooLarge {
        /// Requested index
        index: usize,
        /// Maximum allowed index
        max: usize,
    },

    /// Value nesting exceeds maximum depth
    #[error("value nesting depth {depth} exceeds maximum of {max} levels")]
    NestingTooDeep {
        /// Actual nesting depth
        depth: usize,
        /// Maximum allowed depth
        max: usize,
    },
}
