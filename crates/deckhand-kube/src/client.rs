//! Client for the cluster-control CLI

use serde::Deserialize;
use thiserror::Error;

use deckhand_exec::{CmdOutput, ExecError, render_command, run};
use deckhand_types::{PodPhase, PodSummary, image_tag, normalize_timestamp};

#[derive(Debug, Error)]
pub enum KubeError {
    #[error(transparent)]
    Exec(#[from] ExecError),

    #[error("failed to parse output of `{command}` as JSON: {source}")]
    ParseFailure {
        command: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("unknown context `{context}`, available: {available}")]
    UnknownContext { context: String, available: String },
}

/// Cluster client wrapper
pub struct KubeClient {
    bin: String,
}

impl KubeClient {
    pub fn new() -> Self {
        Self::with_bin("kubectl")
    }

    /// Use a non-default executable name (e.g. from a CLI flag)
    pub fn with_bin(bin: impl Into<String>) -> Self {
        Self { bin: bin.into() }
    }

    /// Fetch pod summaries for an application label in a namespace
    pub async fn pods_info(
        &self,
        app_label: &str,
        namespace: &str,
    ) -> Result<Vec<PodSummary>, KubeError> {
        let selector = format!("app={app_label}");
        let args = [
            "get",
            "pods",
            "-n",
            namespace,
            "-l",
            selector.as_str(),
            "-o",
            "json",
        ];
        let out = run(&self.bin, &args).await?;

        let wire: PodListWire =
            serde_json::from_str(&out.stdout).map_err(|source| KubeError::ParseFailure {
                command: render_command(&self.bin, &args),
                source,
            })?;

        Ok(pods_from_wire(wire))
    }

    /// List all context names from the cluster configuration
    pub async fn config_contexts(&self) -> Result<Vec<String>, KubeError> {
        let out = run(&self.bin, &["config", "get-contexts", "-o", "name"]).await?;
        Ok(out.lines())
    }

    /// List namespaces, narrowed to development and test environments
    pub async fn namespaces(&self) -> Result<Vec<String>, KubeError> {
        let out = run(&self.bin, &["get", "namespaces", "-o", "name"]).await?;
        Ok(filter_namespaces(out.lines()))
    }

    /// Report the active context name
    pub async fn current_context(&self) -> Result<String, KubeError> {
        let out = run(&self.bin, &["config", "current-context"]).await?;
        Ok(out.stdout.trim().to_string())
    }

    /// Switch the active context.
    ///
    /// The target is validated against [`Self::config_contexts`] first; an
    /// unknown context fails without issuing the mutating call.
    pub async fn use_context(&self, context: &str) -> Result<CmdOutput, KubeError> {
        let contexts = self.config_contexts().await?;
        resolve_context(context, &contexts)?;

        let out = run(&self.bin, &["config", "use-context", context]).await?;
        Ok(out)
    }
}

impl Default for KubeClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Check that `requested` names a known context
fn resolve_context(requested: &str, available: &[String]) -> Result<(), KubeError> {
    if available.iter().any(|c| c == requested) {
        return Ok(());
    }
    Err(KubeError::UnknownContext {
        context: requested.to_string(),
        available: available.join(", "),
    })
}

/// Keep only namespaces of dev and test environments, stripping the
/// `namespace/` prefix that `-o name` output carries
fn filter_namespaces(lines: Vec<String>) -> Vec<String> {
    lines
        .into_iter()
        .filter(|line| line.contains("dev") || line.contains("test"))
        .map(|line| match line.split_once('/') {
            Some((_, name)) => name.to_string(),
            None => line,
        })
        .collect()
}

// Wire format of `kubectl get pods -o json`. Only the fields the status
// view reads are modeled.
#[derive(Debug, Deserialize)]
struct PodListWire {
    #[serde(default)]
    items: Vec<PodItemWire>,
}

#[derive(Debug, Deserialize)]
struct PodItemWire {
    kind: Option<String>,
    #[serde(default)]
    metadata: MetadataWire,
    status: Option<PodStatusWire>,
    spec: Option<PodSpecWire>,
}

#[derive(Debug, Default, Deserialize)]
struct MetadataWire {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PodStatusWire {
    phase: Option<String>,
    #[serde(rename = "startTime")]
    start_time: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PodSpecWire {
    #[serde(default)]
    containers: Vec<ContainerWire>,
}

#[derive(Debug, Deserialize)]
struct ContainerWire {
    image: Option<String>,
}

/// Convert the wire list into pod summaries, keeping only `Pod` items in
/// input order
fn pods_from_wire(wire: PodListWire) -> Vec<PodSummary> {
    wire.items
        .into_iter()
        .filter(|item| item.kind.as_deref() == Some("Pod"))
        .map(|item| {
            let mut summary = PodSummary::new(item.metadata.name.unwrap_or_default());

            if let Some(status) = item.status {
                summary.phase = status
                    .phase
                    .as_deref()
                    .map(PodPhase::from)
                    .unwrap_or(PodPhase::Unknown);
                summary.started_at = status
                    .start_time
                    .map(|raw| normalize_timestamp(&raw).unwrap_or(raw));
            }

            summary.image_tag = item
                .spec
                .and_then(|spec| spec.containers.into_iter().next())
                .and_then(|container| container.image)
                .and_then(|image| image_tag(&image));

            summary
        })
        .collect()
}
