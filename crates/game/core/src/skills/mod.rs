//! Character definitions: basic attack, skill slots, ultimate and passives.
//!
//! Definitions are plain data. [`CharacterDef::prodigy`] and
//! [`CharacterDef::arcanist`] describe the two stock characters; content files
//! can describe more.
mod passive;
mod takeover;

use std::time::Duration;

pub use passive::{Element, ElementalStack, PassiveKind, PassiveState};
pub use takeover::{
    Claim, ClaimId, ClaimOutcome, TakeoverArbiter, claim_cells, displacement_cell, push_back_cell,
};

use crate::config::MatchRules;
use crate::error::SetupError;

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CharacterDef {
    pub name: String,
    pub max_health: u32,
    pub max_mana: f32,
    /// Mana points per second.
    pub mana_regen: f32,
    pub basic_attack: BasicAttackDef,
    #[cfg_attr(feature = "serde", serde(default))]
    pub skills: Vec<SkillDef>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub ultimate: Option<SkillDef>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub passives: Vec<PassiveKind>,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BasicAttackDef {
    pub damage: u32,
    /// Cells per second.
    pub speed: f32,
    #[cfg_attr(feature = "serde", serde(with = "crate::config::seconds"))]
    pub cooldown: Duration,
}

impl Default for BasicAttackDef {
    fn default() -> Self {
        Self {
            damage: 10,
            speed: 9.0,
            cooldown: Duration::from_millis(500),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillDef {
    pub name: String,
    pub mana_cost: f32,
    #[cfg_attr(feature = "serde", serde(with = "crate::config::seconds"))]
    pub cooldown: Duration,
    /// Time the caster cannot move or attack after casting.
    #[cfg_attr(feature = "serde", serde(with = "crate::config::seconds"))]
    pub cast_lock: Duration,
    pub effect: SkillEffect,
}

/// What a skill does once cast.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SkillEffect {
    /// Lane projectile fired from the caster after `fire_delay`.
    Bolt {
        damage: u32,
        speed: f32,
        #[cfg_attr(feature = "serde", serde(with = "crate::config::seconds"))]
        fire_delay: Duration,
        element: Option<Element>,
    },
    /// Delayed impact on the target cell and `reach - 1` cells beyond it.
    /// Cells holding the opponent take damage and crack; every other cell
    /// breaks, the caster's own included.
    Pulse {
        damage: u32,
        #[cfg_attr(feature = "serde", serde(with = "crate::config::seconds"))]
        impact_delay: Duration,
        reach: u32,
    },
    /// Dash next to the aim column, strike it, then return.
    Dash {
        damage: u32,
        /// Rows struck above and below the aim row.
        half_height: u32,
        #[cfg_attr(feature = "serde", serde(with = "crate::config::seconds"))]
        dash_time: Duration,
        #[cfg_attr(feature = "serde", serde(with = "crate::config::seconds"))]
        return_delay: Duration,
        #[cfg_attr(feature = "serde", serde(with = "crate::config::seconds"))]
        return_time: Duration,
    },
    /// Claim the enemy front column for `lifetime`.
    Takeover {
        #[cfg_attr(feature = "serde", serde(with = "crate::config::seconds"))]
        lifetime: Duration,
    },
}

impl CharacterDef {
    /// Checks slot and passive limits.
    pub fn validate(&self) -> Result<(), SetupError> {
        if self.skills.len() > MatchRules::SKILL_SLOTS {
            return Err(SetupError::TooManySkills {
                name: self.name.clone(),
                count: self.skills.len(),
                max: MatchRules::SKILL_SLOTS,
            });
        }
        if self.passives.len() > MatchRules::MAX_PASSIVES {
            return Err(SetupError::TooManyPassives {
                name: self.name.clone(),
                count: self.passives.len(),
                max: MatchRules::MAX_PASSIVES,
            });
        }
        Ok(())
    }

    /// Lane fighter: bolt, pulse, dash, quick-sync passive.
    pub fn prodigy() -> Self {
        Self {
            name: "Prodigy".to_string(),
            max_health: 200,
            max_mana: 5.0,
            mana_regen: 2.0,
            basic_attack: BasicAttackDef::default(),
            skills: vec![
                SkillDef {
                    name: "Ion Bolt".to_string(),
                    mana_cost: 1.5,
                    cooldown: Duration::from_millis(1500),
                    cast_lock: Duration::from_millis(350),
                    effect: SkillEffect::Bolt {
                        damage: 20,
                        speed: 9.0,
                        fire_delay: Duration::from_millis(100),
                        element: None,
                    },
                },
                SkillDef {
                    name: "Pulse Fall".to_string(),
                    mana_cost: 2.0,
                    cooldown: Duration::from_secs(2),
                    cast_lock: Duration::from_millis(500),
                    effect: SkillEffect::Pulse {
                        damage: 20,
                        impact_delay: Duration::from_millis(150),
                        reach: 2,
                    },
                },
                SkillDef {
                    name: "Swift Strike".to_string(),
                    mana_cost: 3.0,
                    cooldown: Duration::from_secs(3),
                    cast_lock: Duration::from_millis(700),
                    effect: SkillEffect::Dash {
                        damage: 10,
                        half_height: 1,
                        dash_time: Duration::from_millis(250),
                        return_delay: Duration::from_millis(350),
                        return_time: Duration::from_millis(350),
                    },
                },
            ],
            ultimate: Some(Self::takeover()),
            passives: vec![PassiveKind::quick_sync()],
        }
    }

    /// Elemental caster: fire and ice bolts feeding the overload passive.
    pub fn arcanist() -> Self {
        Self {
            name: "Arcanist".to_string(),
            max_health: 200,
            max_mana: 5.0,
            mana_regen: 2.0,
            basic_attack: BasicAttackDef::default(),
            skills: vec![
                SkillDef {
                    name: "Fireball".to_string(),
                    mana_cost: 1.5,
                    cooldown: Duration::from_millis(1500),
                    cast_lock: Duration::from_millis(350),
                    effect: SkillEffect::Bolt {
                        damage: 20,
                        speed: 9.0,
                        fire_delay: Duration::from_millis(100),
                        element: Some(Element::Fire),
                    },
                },
                SkillDef {
                    name: "Frost Shard".to_string(),
                    mana_cost: 1.0,
                    cooldown: Duration::from_secs(1),
                    cast_lock: Duration::from_millis(350),
                    effect: SkillEffect::Bolt {
                        damage: 12,
                        speed: 7.0,
                        fire_delay: Duration::from_millis(100),
                        element: Some(Element::Ice),
                    },
                },
                SkillDef {
                    name: "Pulse Fall".to_string(),
                    mana_cost: 2.0,
                    cooldown: Duration::from_secs(2),
                    cast_lock: Duration::from_millis(500),
                    effect: SkillEffect::Pulse {
                        damage: 20,
                        impact_delay: Duration::from_millis(150),
                        reach: 2,
                    },
                },
            ],
            ultimate: Some(Self::takeover()),
            passives: vec![PassiveKind::Overload],
        }
    }

    fn takeover() -> SkillDef {
        SkillDef {
            name: "Take Over".to_string(),
            mana_cost: 3.0,
            cooldown: Duration::ZERO,
            cast_lock: Duration::from_secs(1),
            effect: SkillEffect::Takeover {
                lifetime: Duration::from_secs(5),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stock_characters_are_valid() {
        assert!(CharacterDef::prodigy().validate().is_ok());
        assert!(CharacterDef::arcanist().validate().is_ok());
    }

    #[test]
    fn too_many_skills_is_rejected() {
        let mut def = CharacterDef::prodigy();
        def.skills.push(def.skills[0].clone());
        assert!(matches!(
            def.validate(),
            Err(SetupError::TooManySkills { count: 4, .. })
        ));
    }
}
