//! Prompt and table helpers for the interactive flows

use anyhow::Result;
use colored::Colorize;
use comfy_table::{Cell, Color, ContentArrangement, Table};
use dialoguer::theme::ColorfulTheme;
use dialoguer::{MultiSelect, Select};

use deckhand_types::{PodPhase, PodSummary, ReleaseStatus};

/// Placeholder for attributes the backend did not report
const MISSING: &str = "n/a";

/// Single-select prompt. `None` means the operator cancelled.
pub fn select(prompt: &str, items: &[&str], default: usize) -> Result<Option<usize>> {
    let choice = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .items(items)
        .default(default)
        .interact_opt()?;
    Ok(choice)
}

/// Multi-select prompt. `None` means cancelled; an empty vec is a confirmed
/// empty selection.
pub fn multi_select(prompt: &str, items: &[&str]) -> Result<Option<Vec<usize>>> {
    let choice = MultiSelect::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .items(items)
        .interact_opt()?;
    Ok(choice)
}

pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message.red());
}

pub fn print_info(message: &str) {
    println!("{} {}", "•".blue(), message);
}

/// Build the release status table
pub fn release_table(rows: &[ReleaseStatus]) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("Name").fg(Color::Cyan),
        Cell::new("Image tag").fg(Color::Cyan),
        Cell::new("Status").fg(Color::Cyan),
        Cell::new("Last deployed").fg(Color::Cyan),
    ]);

    for row in rows {
        let status_color = match row.status.as_deref() {
            Some("deployed") => Color::Green,
            Some("failed") => Color::Red,
            Some(_) => Color::Yellow,
            None => Color::DarkGrey,
        };

        table.add_row(vec![
            Cell::new(&row.name),
            Cell::new(row.image_tag.as_deref().unwrap_or(MISSING)),
            Cell::new(row.status.as_deref().unwrap_or(MISSING)).fg(status_color),
            Cell::new(row.last_deployed.as_deref().unwrap_or(MISSING)),
        ]);
    }

    table
}

/// Build the pod summary table
pub fn pod_table(pods: &[PodSummary]) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("Pod").fg(Color::Cyan),
        Cell::new("Status").fg(Color::Cyan),
        Cell::new("Started").fg(Color::Cyan),
        Cell::new("Image tag").fg(Color::Cyan),
    ]);

    for pod in pods {
        let phase_color = match pod.phase {
            PodPhase::Running | PodPhase::Succeeded => Color::Green,
            PodPhase::Pending => Color::Yellow,
            PodPhase::Failed => Color::Red,
            PodPhase::Unknown => Color::DarkGrey,
        };

        table.add_row(vec![
            Cell::new(&pod.name),
            Cell::new(pod.phase.as_str()).fg(phase_color),
            Cell::new(pod.started_at.as_deref().unwrap_or(MISSING)),
            Cell::new(pod.image_tag.as_deref().unwrap_or(MISSING)),
        ]);
    }

    table
}
