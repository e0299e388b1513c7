//! Test infrastructure for the stream walker
//!
//! Provides fixture loading, seeded chunk splitting, and comparison helpers.

#![allow(dead_code)]

mod generators;
mod harness;
mod loader;

pub use generators::Gen;
pub use harness::{
    chunk_at, format_node, merge_text, preorder, reference, run_case, run_with_splits, walk,
    TestResult,
};
pub use loader::{load_fixtures_by_name, ExpectedNode, TestCase};
