//! Environment mapping configuration
//!
//! Maps short environment names to the context-name suffix used by the
//! cluster fleet. The shipped defaults match the historical fleet naming; a
//! TOML file can replace them without a code change.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

/// A single environment entry
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct EnvEntry {
    pub name: String,
    pub suffix: String,
}

/// Ordered mapping of environment name to context-name suffix
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct EnvMapping {
    #[serde(rename = "environment")]
    pub entries: Vec<EnvEntry>,
}

/// A selectable environment choice backed by a concrete context
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnvChoice {
    pub name: String,
    pub context: String,
}

impl Default for EnvMapping {
    fn default() -> Self {
        Self {
            entries: vec![
                EnvEntry {
                    name: "dev".to_string(),
                    suffix: "pigeon".to_string(),
                },
                EnvEntry {
                    name: "test".to_string(),
                    suffix: "westeu-001-aks".to_string(),
                },
            ],
        }
    }
}

impl EnvMapping {
    /// Load a mapping from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let mapping = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(mapping)
    }

    /// Resolve each environment to the first context ending in its suffix.
    ///
    /// Returns the resolvable choices in mapping order, plus the index of
    /// the choice whose context is `current` (if any). Environments with no
    /// matching context are skipped.
    pub fn env_choices(
        &self,
        contexts: &[String],
        current: &str,
    ) -> (Vec<EnvChoice>, Option<usize>) {
        let mut choices = Vec::new();
        for entry in &self.entries {
            match contexts.iter().find(|c| c.ends_with(&entry.suffix)) {
                Some(context) => choices.push(EnvChoice {
                    name: entry.name.clone(),
                    context: context.clone(),
                }),
                None => {
                    tracing::warn!(
                        environment = %entry.name,
                        suffix = %entry.suffix,
                        "no cluster context matches this environment"
                    );
                }
            }
        }

        let preselected = choices.iter().position(|c| c.context == current);
        (choices, preselected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contexts() -> Vec<String> {
        vec![
            "admin@k8s-pigeon".to_string(),
            "team-westeu-001-aks".to_string(),
            "prod-westeu-002-aks".to_string(),
        ]
    }

    #[test]
    fn test_default_mapping_resolves_both_environments() {
        let (choices, _) = EnvMapping::default().env_choices(&contexts(), "");

        assert_eq!(choices.len(), 2);
        assert_eq!(choices[0].name, "dev");
        assert_eq!(choices[0].context, "admin@k8s-pigeon");
        assert_eq!(choices[1].name, "test");
        assert_eq!(choices[1].context, "team-westeu-001-aks");
    }

    #[test]
    fn test_preselects_current_context() {
        let (_, preselected) =
            EnvMapping::default().env_choices(&contexts(), "team-westeu-001-aks");
        assert_eq!(preselected, Some(1));
    }

    #[test]
    fn test_no_preselection_when_current_unmatched() {
        let (_, preselected) =
            EnvMapping::default().env_choices(&contexts(), "prod-westeu-002-aks");
        assert_eq!(preselected, None);
    }

    #[test]
    fn test_unmatched_environment_is_skipped() {
        let contexts = vec!["admin@k8s-pigeon".to_string()];
        let (choices, _) = EnvMapping::default().env_choices(&contexts, "");

        assert_eq!(choices.len(), 1);
        assert_eq!(choices[0].name, "dev");
    }

    #[test]
    fn test_load_from_toml() {
        let mapping: EnvMapping = toml::from_str(
            r#"
            [[environment]]
            name = "dev"
            suffix = "sparrow"

            [[environment]]
            name = "staging"
            suffix = "northeu-003-aks"
            "#,
        )
        .unwrap();

        assert_eq!(mapping.entries.len(), 2);
        assert_eq!(mapping.entries[1].name, "staging");
        assert_eq!(mapping.entries[1].suffix, "northeu-003-aks");
    }
}
