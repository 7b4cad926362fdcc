//! Client for the release manager CLI

use serde::Deserialize;
use thiserror::Error;

use deckhand_exec::{ExecError, render_command, run};
use deckhand_types::{ReleaseStatus, normalize_timestamp};

#[derive(Debug, Error)]
pub enum HelmError {
    #[error(transparent)]
    Exec(#[from] ExecError),

    #[error("failed to parse output of `{command}` as JSON: {source}")]
    ParseFailure {
        command: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Release manager client wrapper
pub struct HelmClient {
    bin: String,
}

impl HelmClient {
    pub fn new() -> Self {
        Self::with_bin("helm")
    }

    /// Use a non-default executable name (e.g. from a CLI flag)
    pub fn with_bin(bin: impl Into<String>) -> Self {
        Self { bin: bin.into() }
    }

    /// List release names in a namespace
    pub async fn list_releases(&self, namespace: &str) -> Result<Vec<String>, HelmError> {
        let out = run(&self.bin, &["list", "-q", "-n", namespace]).await?;
        Ok(out.lines())
    }

    /// Fetch the status of a release as a typed record
    pub async fn release_status(
        &self,
        release: &str,
        namespace: &str,
    ) -> Result<ReleaseStatus, HelmError> {
        let args = ["status", release, "-n", namespace, "--output", "json"];
        let out = run(&self.bin, &args).await?;

        let wire: ReleaseWire =
            serde_json::from_str(&out.stdout).map_err(|source| HelmError::ParseFailure {
                command: render_command(&self.bin, &args),
                source,
            })?;

        Ok(wire.into_status(release))
    }

    /// Fetch deployment history as a preformatted text table
    pub async fn release_history(
        &self,
        release: &str,
        namespace: &str,
    ) -> Result<String, HelmError> {
        let out = run(
            &self.bin,
            &["history", release, "-n", namespace, "--output", "table"],
        )
        .await?;
        Ok(out.stdout)
    }
}

impl Default for HelmClient {
    fn default() -> Self {
        Self::new()
    }
}

// Wire format of `helm status --output json`. Only the fields the status
// view reads are modeled; everything else is ignored.
#[derive(Debug, Deserialize)]
struct ReleaseWire {
    name: Option<String>,
    info: Option<InfoWire>,
    chart: Option<ChartWire>,
    config: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct InfoWire {
    status: Option<String>,
    last_deployed: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChartWire {
    metadata: Option<ChartMetadataWire>,
}

#[derive(Debug, Deserialize)]
struct ChartMetadataWire {
    #[serde(rename = "appVersion")]
    app_version: Option<String>,
}

impl ReleaseWire {
    /// Convert the wire record into a [`ReleaseStatus`].
    ///
    /// The image tag comes from the release values (`image.tag`) when set,
    /// falling back to the chart's app version. Missing fields stay `None`
    /// rather than failing the flow.
    fn into_status(self, fallback_name: &str) -> ReleaseStatus {
        let image_tag = self
            .config
            .as_ref()
            .and_then(|values| values.pointer("/image/tag"))
            .and_then(|tag| tag.as_str())
            .map(String::from)
            .or_else(|| {
                self.chart
                    .as_ref()
                    .and_then(|c| c.metadata.as_ref())
                    .and_then(|m| m.app_version.clone())
            });

        let info = self.info;
        let status = info.as_ref().and_then(|i| i.status.clone());
        let last_deployed = info
            .and_then(|i| i.last_deployed)
            .map(|raw| normalize_timestamp(&raw).unwrap_or(raw));

        ReleaseStatus {
            name: self.name.unwrap_or_else(|| fallback_name.to_string()),
            status,
            last_deployed,
            image_tag,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STATUS_JSON: &str = r#"{
        "name": "billing-api",
        "info": {
            "status": "deployed",
            "last_deployed": "2024-03-07T09:15:42.0000001Z",
            "description": "Upgrade complete"
        },
        "chart": {
            "metadata": {
                "name": "billing-api",
                "version": "1.4.0",
                "appVersion": "2.7.0"
            }
        },
        "config": {
            "image": { "tag": "2.7.1-rc3" },
            "replicas": 2
        },
        "version": 14,
        "namespace": "team-dev"
    }"#;

    #[test]
    fn test_status_from_wire() {
        let wire: ReleaseWire = serde_json::from_str(STATUS_JSON).unwrap();
        let status = wire.into_status("billing-api");

        assert_eq!(status.name, "billing-api");
        assert_eq!(status.status.as_deref(), Some("deployed"));
        assert_eq!(status.last_deployed.as_deref(), Some("2024-03-07 09:15:42"));
        // Values override wins over the chart app version
        assert_eq!(status.image_tag.as_deref(), Some("2.7.1-rc3"));
    }

    #[test]
    fn test_status_falls_back_to_app_version() {
        let wire: ReleaseWire = serde_json::from_str(
            r#"{"name": "x", "chart": {"metadata": {"appVersion": "0.9.2"}}}"#,
        )
        .unwrap();
        assert_eq!(wire.into_status("x").image_tag.as_deref(), Some("0.9.2"));
    }

    #[test]
    fn test_status_tolerates_missing_fields() {
        let wire: ReleaseWire = serde_json::from_str("{}").unwrap();
        let status = wire.into_status("orphan");

        assert_eq!(status.name, "orphan");
        assert_eq!(status.status, None);
        assert_eq!(status.last_deployed, None);
        assert_eq!(status.image_tag, None);
    }

    #[test]
    fn test_status_keeps_unparseable_timestamp_raw() {
        let wire: ReleaseWire =
            serde_json::from_str(r#"{"info": {"last_deployed": "moments ago"}}"#).unwrap();
        assert_eq!(
            wire.into_status("x").last_deployed.as_deref(),
            Some("moments ago")
        );
    }
}
