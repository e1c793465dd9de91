//! Character roster loader.

use std::path::Path;

use anyhow::bail;
use arena_core::CharacterDef;

use crate::loaders::{LoadResult, read_file};

/// Characters available to a match, looked up by name.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Roster {
    characters: Vec<CharacterDef>,
}

impl Roster {
    /// Builds a roster, rejecting invalid definitions and duplicate names.
    pub fn new(characters: Vec<CharacterDef>) -> LoadResult<Self> {
        for (index, def) in characters.iter().enumerate() {
            def.validate()?;
            if characters[..index].iter().any(|other| other.name == def.name) {
                bail!("duplicate character '{}'", def.name);
            }
        }
        Ok(Self { characters })
    }

    /// The two stock characters.
    pub fn stock() -> Self {
        Self {
            characters: vec![CharacterDef::prodigy(), CharacterDef::arcanist()],
        }
    }

    pub fn get(&self, name: &str) -> Option<&CharacterDef> {
        self.characters.iter().find(|def| def.name == name)
    }

    /// Like [`Roster::get`], with an error naming the missing character.
    pub fn require(&self, name: &str) -> LoadResult<&CharacterDef> {
        self.get(name).ok_or_else(|| {
            anyhow::anyhow!(
                "Character '{}' not in roster (have: {})",
                name,
                self.names().collect::<Vec<_>>().join(", ")
            )
        })
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.characters.iter().map(|def| def.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.characters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }
}

/// Loader for character rosters from RON files.
///
/// RON format: `Vec<CharacterDef>`
pub struct RosterLoader;

impl RosterLoader {
    pub fn load(path: &Path) -> LoadResult<Roster> {
        let content = read_file(path)?;
        let roster = Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Invalid roster {}: {}", path.display(), e))?;
        tracing::debug!(path = %path.display(), characters = roster.len(), "roster loaded");
        Ok(roster)
    }

    pub fn parse(content: &str) -> LoadResult<Roster> {
        let characters: Vec<CharacterDef> = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse roster RON: {}", e))?;
        Roster::new(characters)
    }
}
