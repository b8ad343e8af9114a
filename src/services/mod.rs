//! Passport generation services.
//!
//! - [`total_duration`]: bottom-up assembly time over a unit tree
//! - [`DocumentBuilder`]: unit tree to passport document
//! - [`PassportWriter`]: YAML rendering and persistence
//! - [`is_yaml11_implicit`]: scalars that need quoting for YAML 1.1 readers
//! - [`PassportService`]: the async entry point composing the above

mod aggregation;
mod builder;
mod passport;
mod writer;
mod yaml;

pub use aggregation::total_duration;
pub use builder::DocumentBuilder;
pub use passport::PassportService;
pub use writer::{render, PassportWriter};
pub use yaml::is_yaml11_implicit;
