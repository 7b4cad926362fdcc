//! Cluster-control client for deckhand
//!
//! This crate wraps the `kubectl` executable: listing pods for an
//! application label, listing and switching contexts, listing dev/test
//! namespaces, and reporting the active context.

mod client;

pub use client::{KubeClient, KubeError};

// Re-export types that are used in our public API
pub use deckhand_exec::CmdOutput;
pub use deckhand_types::{PodPhase, PodSummary};
