//! Adapters that implement the domain repository ports.
//!
//! Only in-memory stores live here; they back the CLI and the tests.

pub mod memory_repo;
