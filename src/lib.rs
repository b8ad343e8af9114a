//! Unit Passport - archival production history documents
//!
//! Turns a unit tree (a unit, its production stages and its nested
//! component units) into a single YAML passport whose structure mirrors
//! the assembly hierarchy, with assembly times aggregated bottom-up.

pub mod cli;
pub mod config;
pub mod context;
pub mod di;
pub mod error;
pub mod models;
pub mod reporter;
pub mod services;

// Re-export FromRef at crate root for di-macros generated code
pub use di::FromRef;
