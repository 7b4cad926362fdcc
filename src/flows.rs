//! The two interactive workflows behind the entry menu
//!
//! Both flows fetch everything fresh on each run and report a
//! [`FlowOutcome`] so the menu loop treats completion, cancellation, and
//! failure uniformly.

use anyhow::{Context, Result};
use colored::Colorize;

use deckhand_helm::HelmClient;
use deckhand_kube::KubeClient;
use deckhand_types::FlowOutcome;

use crate::config::EnvMapping;
use crate::ui;

/// Inspect release status in a dev/test namespace.
///
/// Namespace single-select, release multi-select, one status table; pods and
/// history are shown only when exactly one release was picked.
pub async fn service_status(helm: &HelmClient, kube: &KubeClient) -> Result<FlowOutcome> {
    let namespaces = kube
        .namespaces()
        .await
        .context("Failed to list namespaces")?;
    if namespaces.is_empty() {
        ui::print_info("No dev or test namespaces found");
        return Ok(FlowOutcome::Completed);
    }

    let items: Vec<&str> = namespaces.iter().map(String::as_str).collect();
    let Some(ns_idx) = ui::select("Namespace", &items, 0)? else {
        return Ok(FlowOutcome::Cancelled);
    };
    let namespace = &namespaces[ns_idx];

    let releases = helm
        .list_releases(namespace)
        .await
        .with_context(|| format!("Failed to list releases in '{namespace}'"))?;
    if releases.is_empty() {
        ui::print_info("No releases in this namespace");
        return Ok(FlowOutcome::Completed);
    }

    let items: Vec<&str> = releases.iter().map(String::as_str).collect();
    let Some(picked) = ui::multi_select("Releases", &items)? else {
        return Ok(FlowOutcome::Cancelled);
    };
    if picked.is_empty() {
        return Ok(FlowOutcome::Cancelled);
    }

    let selected: Vec<String> = picked.iter().map(|&i| releases[i].clone()).collect();

    // Sequential, in selection order
    let mut rows = Vec::with_capacity(selected.len());
    for release in &selected {
        let status = helm
            .release_status(release, namespace)
            .await
            .with_context(|| format!("Failed to fetch status for '{release}'"))?;
        rows.push(status);
    }
    println!("{}", ui::release_table(&rows));

    if let Some(release) = drill_down_target(&selected) {
        let pods = kube
            .pods_info(release, namespace)
            .await
            .with_context(|| format!("Failed to fetch pods for '{release}'"))?;
        println!("{}", ui::pod_table(&pods));

        let history = helm
            .release_history(release, namespace)
            .await
            .with_context(|| format!("Failed to fetch history for '{release}'"))?;
        println!("{}", "History".cyan().bold());
        println!("{history}");
    }

    Ok(FlowOutcome::Completed)
}

/// Switch the active cluster context via the environment mapping
pub async fn switch_context(kube: &KubeClient, mapping: &EnvMapping) -> Result<FlowOutcome> {
    let contexts = kube
        .config_contexts()
        .await
        .context("Failed to list contexts")?;
    let current = kube
        .current_context()
        .await
        .context("Failed to read current context")?;

    let (choices, preselected) = mapping.env_choices(&contexts, &current);
    if choices.is_empty() {
        ui::print_info("No configured environment matches any cluster context");
        return Ok(FlowOutcome::Completed);
    }

    let labels: Vec<String> = choices
        .iter()
        .map(|c| format!("{} ({})", c.name, c.context))
        .collect();
    let label_refs: Vec<&str> = labels.iter().map(String::as_str).collect();

    let Some(idx) = ui::select("Environment", &label_refs, preselected.unwrap_or(0))? else {
        return Ok(FlowOutcome::Cancelled);
    };

    let output = kube
        .use_context(&choices[idx].context)
        .await
        .context("Failed to switch context")?;
    if !output.stdout.is_empty() {
        print!("{}", output.stdout);
    }
    if !output.stderr.is_empty() {
        eprint!("{}", output.stderr);
    }

    Ok(FlowOutcome::Completed)
}

/// Detail drill-down applies only to single-release selections
fn drill_down_target(selected: &[String]) -> Option<&str> {
    match selected {
        [only] => Some(only.as_str()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_drill_down_without_selection() {
        assert_eq!(drill_down_target(&[]), None);
    }

    #[test]
    fn test_drill_down_for_single_selection() {
        let selected = vec!["billing-api".to_string()];
        assert_eq!(drill_down_target(&selected), Some("billing-api"));
    }

    #[test]
    fn test_no_drill_down_for_multiple_selections() {
        let selected = vec!["billing-api".to_string(), "billing-worker".to_string()];
        assert_eq!(drill_down_target(&selected), None);
    }
}
