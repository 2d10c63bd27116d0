//! # graft-git
//!
//! Git backend abstraction layer for Graft, built on git2-rs.
//! Provides the branch, history, and cherry-pick operations the
//! reconstruction engine needs, behind a mockable trait.

mod error;
mod repository;
mod traits;

pub use error::{Error, Result};
pub use git2::Oid;
pub use repository::Repository;
pub use traits::{GitBackend, LogEntry};
