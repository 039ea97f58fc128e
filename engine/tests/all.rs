//! Integration test aggregator
//!
//! Individual test modules are declared in `suite/mod.rs`.

mod common;
mod suite;
