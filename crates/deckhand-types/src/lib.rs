//! Shared types for deckhand
//!
//! This crate contains data structures used across multiple deckhand crates.

use chrono::DateTime;

// ============================================================================
// Release Types
// ============================================================================

/// Status of a single release, as reported by the release manager
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReleaseStatus {
    pub name: String,
    pub status: Option<String>,
    pub last_deployed: Option<String>,
    pub image_tag: Option<String>,
}

impl ReleaseStatus {
    pub fn new(name: String) -> Self {
        Self {
            name,
            status: None,
            last_deployed: None,
            image_tag: None,
        }
    }
}

// ============================================================================
// Pod Types
// ============================================================================

/// One row of pod information for the status view
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PodSummary {
    pub name: String,
    pub phase: PodPhase,
    pub started_at: Option<String>,
    pub image_tag: Option<String>,
}

impl PodSummary {
    pub fn new(name: String) -> Self {
        Self {
            name,
            phase: PodPhase::Unknown,
            started_at: None,
            image_tag: None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PodPhase {
    Pending,
    Running,
    Succeeded,
    Failed,
    Unknown,
}

impl From<&str> for PodPhase {
    fn from(s: &str) -> Self {
        match s {
            "Pending" => Self::Pending,
            "Running" => Self::Running,
            "Succeeded" => Self::Succeeded,
            "Failed" => Self::Failed,
            _ => Self::Unknown,
        }
    }
}

impl PodPhase {
    /// Display string matching the cluster's phase names
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Running => "Running",
            Self::Succeeded => "Succeeded",
            Self::Failed => "Failed",
            Self::Unknown => "Unknown",
        }
    }
}

// ============================================================================
// Flow Types
// ============================================================================

/// How an interactive flow ended.
///
/// Cancellation is a normal result, not an error; failures travel through
/// `Result` so the menu loop can react to all three uniformly.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlowOutcome {
    Completed,
    Cancelled,
}

// ============================================================================
// Parsing Helpers
// ============================================================================

/// Normalize an RFC 3339 timestamp to `yyyy-MM-dd HH:mm:ss`.
///
/// Returns `None` when the input is not a valid timestamp; callers decide
/// whether to fall back to the raw string.
pub fn normalize_timestamp(raw: &str) -> Option<String> {
    DateTime::parse_from_rfc3339(raw.trim())
        .ok()
        .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
}

/// Extract the tag portion of a container image reference.
///
/// The tag is everything after the last colon, so registries with a port
/// number (`host:5000/app:v1`) resolve correctly. A reference with no tag
/// yields `None`.
pub fn image_tag(image: &str) -> Option<String> {
    let (_, tag) = image.rsplit_once(':')?;
    if tag.contains('/') {
        // Colon belonged to a registry port, not a tag
        return None;
    }
    Some(tag.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_timestamp() {
        assert_eq!(
            normalize_timestamp("2024-03-07T09:15:42Z"),
            Some("2024-03-07 09:15:42".to_string())
        );
        assert_eq!(
            normalize_timestamp("2024-03-07T09:15:42.123456789+02:00"),
            Some("2024-03-07 09:15:42".to_string())
        );
        assert_eq!(normalize_timestamp("yesterday"), None);
    }

    #[test]
    fn test_image_tag_simple() {
        assert_eq!(image_tag("app:v1"), Some("v1".to_string()));
        assert_eq!(
            image_tag("registry.io/team/app:2.4.1"),
            Some("2.4.1".to_string())
        );
    }

    #[test]
    fn test_image_tag_registry_port() {
        assert_eq!(image_tag("host:5000/app:v1"), Some("v1".to_string()));
        assert_eq!(image_tag("host:5000/app"), None);
    }

    #[test]
    fn test_image_tag_untagged() {
        assert_eq!(image_tag("app"), None);
    }

    #[test]
    fn test_pod_phase_from_str() {
        assert_eq!(PodPhase::from("Running"), PodPhase::Running);
        assert_eq!(PodPhase::from("Terminating"), PodPhase::Unknown);
    }
}
