//! Document Store Test Suite
//!
//! Tests for the observable contract of path-addressable documents and the
//! session overlay built on them.
//!
//! ## Test Groups
//!
//! - **Path semantics**: strict vs lenient reads, auto-vivification, addressing errors
//! - **Merge semantics**: overwrite and add-new-only for maps and lists
//! - **History**: which writes are recorded, retention
//! - **Serialization**: text round trips, reserved keys, sentinel key
//! - **Sessions**: lifecycle predicates, bound sub-contexts, registry
//! - **Properties**: randomized round-trip and merge idempotence
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test --test document_store
//!
//! # Only the property tests
//! cargo test --test document_store prop_
//! ```

// Test utilities
mod test_utils;

mod history_tests;
mod merge_semantics;
mod path_semantics;
