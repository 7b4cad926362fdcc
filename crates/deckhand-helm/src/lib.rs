//! Release-manager client for deckhand
//!
//! This crate wraps the `helm` executable: listing releases in a namespace,
//! fetching a release's status as structured data, and fetching its
//! deployment history for display.

mod client;

pub use client::{HelmClient, HelmError};

// Re-export types that are used in our public API
pub use deckhand_types::ReleaseStatus;
