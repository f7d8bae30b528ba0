//! Capability algebras for infinite-list.
//!
//! This module defines the traits the list controller depends on. Each is:
//!
//! - **Object-safe** — can be used as `dyn Trait`
//! - **Documented with laws** — properties that all implementations must satisfy
//! - **Async via `async_trait`**
//!
//! # Architecture
//!
//! ```text
//! Embedding application / main.rs
//!         ↓
//! List controller (list/)
//!         ↓
//! Algebras (algebras/)
//!         ↓
//! Interpreters (api/, closures via FnSource)
//! ```
//!
//! # Capability Traits
//!
//! - [`PageSource`] — first-page and next-page retrieval
//!
//! # Laws
//!
//! Each trait documents algebraic laws that all implementations must satisfy.
//! These are verified via law tests in each module's test suite.

pub mod error;
pub mod source;

// Re-exports for convenience
pub use error::FetchError;
pub use source::{FnSource, PageSource};
