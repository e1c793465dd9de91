//! Content factory for loading match data from a data directory.

use std::path::{Path, PathBuf};

use arena_core::MatchRules;

use crate::loaders::{LoadResult, Roster, RosterLoader, RulesLoader, ScenarioLoader};
use crate::scenario::Scenario;

/// Content factory that loads all match content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── rules.toml
/// ├── characters.ron
/// └── scenarios/
///     ├── duel.ron
///     └── rally.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Factory over the data shipped with this crate.
    pub fn bundled() -> Self {
        Self::new(concat!(env!("CARGO_MANIFEST_DIR"), "/data"))
    }

    /// Load match rules from `rules.toml`, or the defaults when it is absent.
    pub fn load_rules(&self) -> LoadResult<MatchRules> {
        let path = self.data_dir.join("rules.toml");
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no rules file, using defaults");
            return Ok(MatchRules::default());
        }
        RulesLoader::load(&path)
    }

    /// Load the character roster from `characters.ron`.
    pub fn load_roster(&self) -> LoadResult<Roster> {
        RosterLoader::load(&self.data_dir.join("characters.ron"))
    }

    /// Load a scenario from `scenarios/{name}.ron`.
    pub fn load_scenario(&self, name: &str) -> LoadResult<Scenario> {
        let path = self.data_dir.join("scenarios").join(format!("{}.ron", name));
        ScenarioLoader::load(&path)
    }

    /// Names of the scenarios in `scenarios/`, sorted.
    pub fn scenario_names(&self) -> LoadResult<Vec<String>> {
        let dir = self.data_dir.join("scenarios");
        let entries = std::fs::read_dir(&dir)
            .map_err(|e| anyhow::anyhow!("Failed to list {}: {}", dir.display(), e))?;

        let mut names = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "ron") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    names.push(stem.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factory_paths() {
        let factory = ContentFactory::new("/tmp/data");
        assert_eq!(factory.data_dir(), Path::new("/tmp/data"));
    }

    #[test]
    fn missing_rules_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let rules = ContentFactory::new(dir.path()).load_rules().unwrap();
        assert_eq!(rules, MatchRules::default());
    }

    #[test]
    fn bundled_content_loads() {
        let factory = ContentFactory::bundled();
        factory.load_rules().unwrap();

        let roster = factory.load_roster().unwrap();
        assert_eq!(roster.get("Prodigy"), Some(&arena_core::CharacterDef::prodigy()));
        assert_eq!(roster.get("Arcanist"), Some(&arena_core::CharacterDef::arcanist()));

        let names = factory.scenario_names().unwrap();
        assert!(!names.is_empty());
        for name in names {
            let scenario = factory.load_scenario(&name).unwrap();
            roster.require(&scenario.p1).unwrap();
            roster.require(&scenario.p2).unwrap();
        }
    }
}
