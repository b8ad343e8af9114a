//! Dependency injection infrastructure.
//!
//! This module provides compile-time dependency injection using the `FromRef` trait
//! and derive macros from `di-macros`.
//!
//! - `FromRef<T>`: Trait for extracting a value from a reference to `T`
//! - `#[derive(Context)]`: Makes each field of a struct extractable via `FromRef`
//! - `#[derive(FromContext)]`: Generates `FromRef` impl by resolving each field
//!
//! # Example
//!
//! ```ignore
//! use crate::di::{Context, FromContext, FromRef};
//!
//! #[derive(Context, Clone)]
//! pub struct AppContext {
//!     pub config: Arc<Config>,
//!     pub reporter: Reporter,
//! }
//!
//! #[derive(FromContext, Clone)]
//! #[from_context(Context = "AppContext")]
//! pub struct PassportService {
//!     config: Arc<Config>,  // resolved via FromRef<AppContext>
//!     reporter: Reporter,
//! }
//!
//! let service = PassportService::from_ref(&ctx);
//! ```

/// Trait for extracting a value from a reference to another type.
///
/// Types that implement `FromRef<T>` can be extracted from `&T`.
pub trait FromRef<T> {
    fn from_ref(input: &T) -> Self;
}

/// Blanket implementation: any Clone type can be extracted from itself.
impl<T: Clone> FromRef<T> for T {
    fn from_ref(input: &T) -> Self {
        input.clone()
    }
}

// Re-export derive macros
pub use di_macros::{Context, FromContext};
