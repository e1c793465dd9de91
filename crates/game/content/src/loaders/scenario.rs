//! Scenario loader.

use std::path::Path;

use anyhow::ensure;

use crate::loaders::{LoadResult, read_file};
use crate::scenario::Scenario;

/// Loader for scripted scenarios from RON files.
///
/// ```ron
/// (
///     name: "opening",
///     p1: "Prodigy",
///     p2: "Arcanist",
///     length: 10.0,
///     script: [
///         (at: 0.0, combatant: P1, intent: BasicAttack),
///         (at: 0.5, combatant: P2, intent: Cast(slot: Skill(0))),
///     ],
/// )
/// ```
///
/// The script is sorted by time after loading; entries sharing a time keep
/// their file order.
pub struct ScenarioLoader;

impl ScenarioLoader {
    pub fn load(path: &Path) -> LoadResult<Scenario> {
        let content = read_file(path)?;
        let scenario = Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Invalid scenario {}: {}", path.display(), e))?;
        tracing::debug!(
            path = %path.display(),
            name = %scenario.name,
            intents = scenario.script.len(),
            "scenario loaded"
        );
        Ok(scenario)
    }

    pub fn parse(content: &str) -> LoadResult<Scenario> {
        let mut scenario: Scenario = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse scenario RON: {}", e))?;
        ensure!(!scenario.length.is_zero(), "scenario length must be positive");
        scenario.sort_script();
        Ok(scenario)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::time::Duration;

    use arena_core::{CardinalDirection, CombatantId, Position, SlotRef};

    use super::*;
    use crate::scenario::Intent;

    #[test]
    fn loads_and_orders_script() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"(
                name: "skirmish",
                p1: "Prodigy",
                p2: "Arcanist",
                script: [
                    (at: 1.5, combatant: P2, intent: Parry),
                    (at: 0.25, combatant: P1, intent: Hold(Some(East))),
                    (at: 1.0, combatant: P1, intent: Cast(slot: Skill(1), aim: Some((x: 5, y: 2)))),
                    (at: 1.0, combatant: P1, intent: Cast(slot: Ultimate)),
                ],
            )"#
        )
        .unwrap();

        let scenario = ScenarioLoader::load(file.path()).unwrap();
        assert_eq!(scenario.length, Scenario::DEFAULT_LENGTH);
        let times: Vec<_> = scenario.script.iter().map(|s| s.at).collect();
        assert_eq!(
            times,
            vec![
                Duration::from_millis(250),
                Duration::from_secs(1),
                Duration::from_secs(1),
                Duration::from_millis(1500),
            ]
        );
        assert_eq!(
            scenario.script[0].intent,
            Intent::Hold(Some(CardinalDirection::East))
        );
        assert_eq!(
            scenario.script[1].intent,
            Intent::Cast {
                slot: SlotRef::Skill(1),
                aim: Some(Position::new(5, 2)),
            }
        );
        assert_eq!(
            scenario.script[2].intent,
            Intent::Cast {
                slot: SlotRef::Ultimate,
                aim: None,
            }
        );
        assert_eq!(scenario.script[3].combatant, CombatantId::P2);
    }

    #[test]
    fn rejects_zero_length() {
        let err = ScenarioLoader::parse(r#"(name: "x", p1: "a", p2: "b", length: 0.0)"#).unwrap_err();
        assert!(err.to_string().contains("length"));
    }
}
