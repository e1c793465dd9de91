//! Match rules loader.

use std::path::Path;

use anyhow::ensure;
use arena_core::MatchRules;

use crate::loaders::{LoadResult, read_file};

/// Loader for match rules from TOML files.
///
/// Every table and key is optional; anything left out keeps its default.
///
/// ```toml
/// [grid]
/// width = 8
/// height = 4
///
/// [deflect]
/// max_damage = 400
/// ```
pub struct RulesLoader;

impl RulesLoader {
    pub fn load(path: &Path) -> LoadResult<MatchRules> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Invalid rules file {}: {}", path.display(), e))
    }

    pub fn parse(content: &str) -> LoadResult<MatchRules> {
        let rules: MatchRules = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse rules TOML: {}", e))?;
        Self::check(&rules)?;
        Ok(rules)
    }

    /// Rejects values that would make a match meaningless.
    fn check(rules: &MatchRules) -> LoadResult<()> {
        ensure!(rules.grid.width >= 2, "grid.width must be at least 2");
        ensure!(rules.grid.height >= 1, "grid.height must be at least 1");
        ensure!(
            !rules.movement.step_duration.is_zero(),
            "movement.step_duration must be positive"
        );
        ensure!(
            rules.movement.min_speed_multiplier > 0.0,
            "movement.min_speed_multiplier must be positive"
        );
        ensure!(
            rules.ultimate.max_charge > 0.0,
            "ultimate.max_charge must be positive"
        );
        ensure!(
            rules.parry.miss_cost >= 0.0 && rules.parry.success_cost >= 0.0,
            "parry costs must not be negative"
        );
        Ok(())
    }
}
