//! Run configuration: JSON deserialization of the data contracts in
//! spec.md section 6, plus the two-step parse-then-validate flow of the
//! teacher's `headless::config::HeadlessMatchConfig`.
//!
//! Loading and validating *syntax* here is an ambient concern this crate
//! owns (every binary needs to parse its own input); on-disk schema
//! *authoring tools* and editors remain the external collaborator spec.md
//! section 1 names as out of scope.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::catalog::{SkillCatalog, SkillTier};
use crate::combatant::{Combatant, CombatantStore, EquippedSkill, Stats};
use crate::engine::{Engine, EngineParams};
use crate::error::{EngineError, EngineResult};
use crate::rng::RandomSource;
use crate::scheduler::AtbScheduler;

fn default_crit_multiplier() -> f64 {
    1.5
}

fn default_max_steps() -> u32 {
    100_000
}

/// Top-level run configuration: the seed/threshold knobs of spec.md section
/// 6 plus the combatant roster and skill catalog needed to actually
/// construct an [`Engine`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    pub rng_seed: u64,
    pub atb_threshold: u32,
    pub atb_tick_scale: f64,
    #[serde(default = "default_crit_multiplier")]
    pub crit_multiplier: f64,
    #[serde(default = "default_max_steps")]
    pub max_steps: u32,
    pub combatants: Vec<CombatantData>,
    pub skills: Vec<SkillTierEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsData {
    pub hp: u32,
    pub max_hp: u32,
    pub qi: u32,
    pub max_qi: u32,
    pub strength: u32,
    pub agility: u32,
    pub defense: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EquippedSkillData {
    pub skill_id: String,
    pub tier: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombatantData {
    pub id: String,
    pub name: String,
    pub faction: String,
    pub stats: StatsData,
    #[serde(default)]
    pub skills: Vec<EquippedSkillData>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillParameters {
    pub base_damage: u32,
    pub power_multiplier: f64,
    pub hit_chance: f64,
    pub critical_chance: f64,
    pub qi_cost: u32,
    pub cooldown: u32,
    #[serde(default)]
    pub defend_chance: Option<f64>,
    #[serde(default)]
    pub defend_reduction: f64,
    #[serde(default)]
    pub partial_evade_chance: f64,
    #[serde(default = "default_partial_evade_multiplier")]
    pub partial_evade_multiplier: f64,
}

fn default_partial_evade_multiplier() -> f64 {
    0.5
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillTierEntry {
    pub skill_id: String,
    pub tier: u32,
    pub tier_name: String,
    pub parameters: SkillParameters,
    pub narrative_template: String,
    #[serde(rename = "type")]
    pub skill_type: String,
}

impl RunConfig {
    pub fn from_json_str(contents: &str) -> EngineResult<Self> {
        let config: RunConfig = serde_json::from_str(contents)
            .map_err(|err| EngineError::InvalidData(format!("failed to parse config JSON: {err}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_from_file(path: &Path) -> EngineResult<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|err| EngineError::InvalidData(format!("failed to read config file: {err}")))?;
        Self::from_json_str(&contents)
    }

    fn validate(&self) -> EngineResult<()> {
        if self.atb_threshold == 0 {
            return Err(EngineError::InvalidData(
                "atb_threshold must be >= 1".to_string(),
            ));
        }
        if self.atb_tick_scale <= 0.0 {
            return Err(EngineError::InvalidData(
                "atb_tick_scale must be > 0".to_string(),
            ));
        }
        if self.crit_multiplier < 1.0 {
            return Err(EngineError::InvalidData(
                "crit_multiplier must be >= 1".to_string(),
            ));
        }
        if self.combatants.is_empty() {
            return Err(EngineError::InvalidData(
                "combatants must not be empty".to_string(),
            ));
        }
        let mut seen_ids = std::collections::HashSet::new();
        for combatant in &self.combatants {
            if !seen_ids.insert(&combatant.id) {
                return Err(EngineError::InvalidData(format!(
                    "duplicate combatant id '{}'",
                    combatant.id
                )));
            }
        }
        Ok(())
    }

    /// Builds the catalog, roster, RNG and scheduler described by this
    /// configuration and assembles them into an [`Engine`].
    pub fn build_engine(&self) -> EngineResult<Engine> {
        let mut catalog = SkillCatalog::new();
        for entry in &self.skills {
            let params = &entry.parameters;
            catalog.insert(
                entry.skill_id.clone(),
                entry.tier,
                SkillTier {
                    base_damage: params.base_damage,
                    power_multiplier: params.power_multiplier,
                    hit_chance: params.hit_chance,
                    critical_chance: params.critical_chance,
                    qi_cost: params.qi_cost,
                    cooldown: params.cooldown,
                    tier_name: entry.tier_name.clone(),
                    narrative_template: entry.narrative_template.clone(),
                    skill_type: entry.skill_type.clone(),
                    defend_chance: params.defend_chance,
                    defend_reduction: params.defend_reduction,
                    partial_evade_chance: params.partial_evade_chance,
                    partial_evade_multiplier: params.partial_evade_multiplier,
                },
            )?;
        }

        let mut store = CombatantStore::new();
        for data in &self.combatants {
            let stats = Stats {
                hp: data.stats.hp,
                max_hp: data.stats.max_hp,
                qi: data.stats.qi,
                max_qi: data.stats.max_qi,
                strength: data.stats.strength,
                agility: data.stats.agility,
                defense: data.stats.defense,
            };
            let equipped: Vec<EquippedSkill> = data
                .skills
                .iter()
                .map(|s| EquippedSkill {
                    skill_id: s.skill_id.clone(),
                    tier: s.tier,
                })
                .collect();
            store.insert(Combatant::new(
                data.id.clone(),
                data.name.clone(),
                data.faction.clone(),
                stats,
                equipped,
            )?)?;
        }

        let rng = RandomSource::from_seed(self.rng_seed);
        let scheduler = AtbScheduler::new(self.atb_threshold, self.atb_tick_scale)?;
        let params = EngineParams {
            crit_multiplier: self.crit_multiplier,
            max_steps: self.max_steps,
        };

        Engine::new(store, catalog, rng, scheduler, params, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_json() -> &'static str {
        r#"{
            "rng_seed": 42,
            "atb_threshold": 100,
            "atb_tick_scale": 1.0,
            "combatants": [
                {
                    "id": "a",
                    "name": "A",
                    "faction": "red",
                    "stats": {"hp": 10, "max_hp": 10, "qi": 0, "max_qi": 0, "strength": 0, "agility": 10, "defense": 0},
                    "skills": [{"skill_id": "basic_strike", "tier": 1}]
                },
                {
                    "id": "b",
                    "name": "B",
                    "faction": "blue",
                    "stats": {"hp": 10, "max_hp": 10, "qi": 0, "max_qi": 0, "strength": 0, "agility": 5, "defense": 0},
                    "skills": [{"skill_id": "basic_strike", "tier": 1}]
                }
            ],
            "skills": [
                {
                    "skill_id": "basic_strike",
                    "tier": 1,
                    "tier_name": "初段",
                    "parameters": {"base_damage": 20, "power_multiplier": 1.0, "hit_chance": 1.0, "critical_chance": 0.0, "qi_cost": 0, "cooldown": 0},
                    "narrative_template": "{actor} strikes {target}",
                    "type": "攻击"
                }
            ]
        }"#
    }

    #[test]
    fn parses_and_builds_engine() {
        let config = RunConfig::from_json_str(sample_json()).unwrap();
        let engine = config.build_engine().unwrap();
        assert!(!engine.is_battle_over());
    }

    #[test]
    fn rejects_empty_roster() {
        let config = RunConfig {
            rng_seed: 1,
            atb_threshold: 100,
            atb_tick_scale: 1.0,
            crit_multiplier: 1.5,
            max_steps: 100,
            combatants: vec![],
            skills: vec![],
        };
        assert!(config.build_engine().is_err() || config.validate().is_err());
    }
}
