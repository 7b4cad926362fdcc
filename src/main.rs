use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;

use deckhand_helm::HelmClient;
use deckhand_kube::KubeClient;
use deckhand_types::FlowOutcome;

mod config;
mod flows;
mod ui;

use config::EnvMapping;

/// Deckhand - an interactive companion for release status and cluster contexts
#[derive(Parser, Debug)]
#[command(name = "deckhand")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Cluster context to switch to before the menu starts (optional)
    #[arg(value_name = "CONTEXT")]
    context: Option<String>,

    /// Environment mapping file (TOML) overriding the built-in fleet naming
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Release manager executable
    #[arg(long, default_value = "helm")]
    helm_bin: String,

    /// Cluster client executable
    #[arg(long, default_value = "kubectl")]
    kubectl_bin: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize tracing for debugging; stderr so prompts stay intact
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    run_app(args).await
}

/// Top-level menu actions
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum MenuAction {
    ServiceStatus,
    SwitchContext,
    Exit,
}

impl MenuAction {
    const ALL: [MenuAction; 3] = [
        MenuAction::ServiceStatus,
        MenuAction::SwitchContext,
        MenuAction::Exit,
    ];

    fn label(&self) -> &'static str {
        match self {
            Self::ServiceStatus => "Service status",
            Self::SwitchContext => "Switch context",
            Self::Exit => "Exit",
        }
    }
}

async fn run_app(args: Args) -> Result<()> {
    let helm = HelmClient::with_bin(&args.helm_bin);
    let kube = KubeClient::with_bin(&args.kubectl_bin);

    let mapping = match &args.config {
        Some(path) => EnvMapping::load(path)?,
        None => EnvMapping::default(),
    };

    // Handle CLI arguments for direct navigation
    if let Some(context) = &args.context {
        let contexts = kube.config_contexts().await?;
        if !contexts.iter().any(|c| c == context) {
            anyhow::bail!("Context '{}' not found in cluster configuration", context);
        }
        kube.use_context(context).await?;
    }

    // Main menu loop; the current context is re-fetched every iteration so
    // a switch is reflected immediately
    loop {
        let current = kube
            .current_context()
            .await
            .context("Failed to read current context")?;
        println!();
        println!("Current context: {}", current.cyan().bold());

        let labels: Vec<&str> = MenuAction::ALL.iter().map(MenuAction::label).collect();
        let Some(idx) = ui::select("What would you like to do?", &labels, 0)? else {
            // Cancelling the top-level prompt is a clean exit
            break;
        };

        let outcome = match MenuAction::ALL[idx] {
            MenuAction::ServiceStatus => flows::service_status(&helm, &kube).await,
            MenuAction::SwitchContext => flows::switch_context(&kube, &mapping).await,
            MenuAction::Exit => {
                println!("{}", "Goodbye!".green());
                break;
            }
        };

        match outcome {
            Ok(FlowOutcome::Completed) => {}
            Ok(FlowOutcome::Cancelled) => {
                tracing::debug!("flow cancelled by operator");
            }
            Err(e) => {
                // A failed flow ends the flow, not the session
                ui::print_error(&format!("{e:#}"));
            }
        }
    }

    Ok(())
}
