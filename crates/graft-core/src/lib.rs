//! # graft-core
//!
//! Core library for Graft: the commit tree model, structural verification,
//! breadth-first segment extraction, and the reconstruction engine that
//! replays branch trees with a safe rename-swap protocol.

mod error;

pub mod config;
pub mod graph;
pub mod names;
pub mod reconstruct;
pub mod segment;
pub mod verify;
pub mod waiter;

pub use config::{Config, DEFAULT_CONFLICT_TIMEOUT_SECS};
pub use error::{Error, Result};
pub use graph::{CommitGraph, CommitNode, NodeId};
pub use names::TempNames;
pub use reconstruct::{
    Progress, ReconstructOptions, ReconstructReport, Reconstructor, SilentProgress,
};
pub use segment::{Segment, segments};
pub use verify::verify;

#[cfg(test)]
pub(crate) mod test_backend;
