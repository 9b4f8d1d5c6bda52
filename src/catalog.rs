//! Skill Catalog (C1): immutable `(skill_id, tier) -> SkillTier` lookup.
//!
//! Grounded in the teacher's `ability_config::AbilityDefinitions` (a static
//! lookup from ability name to parameter block, loaded once and never
//! mutated for the rest of the match) and in spec.md section 6's skill-tier
//! data contract. The teacher indexes by ability name alone; this catalog
//! adds tier because spec.md requires one skill to carry several tiers with
//! independent parameters.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// One tier's worth of parameters for a skill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillTier {
    pub base_damage: u32,
    pub power_multiplier: f64,
    pub hit_chance: f64,
    pub critical_chance: f64,
    pub qi_cost: u32,
    pub cooldown: u32,
    pub tier_name: String,
    pub narrative_template: String,
    /// Skill type, used by stages to decide applicability (e.g. `"movement"`
    /// unlocks evasion, `"defense"` unlocks damage reduction). Free-form per
    /// spec.md section 6's `type: "攻击"|"闪避"|"抵挡"|…`.
    pub skill_type: String,
    /// Present only on `defense`-typed skills that roll a probability rather
    /// than applying unconditionally. Per spec.md section 9's open question:
    /// a defense skill consumes randomness only when this is `Some`.
    #[serde(default)]
    pub defend_chance: Option<f64>,
    /// Damage-reduction coefficient applied when a `defense` skill procs
    /// (or always, if `defend_chance` is `None`). `0.5` means "halve
    /// incoming damage".
    #[serde(default)]
    pub defend_reduction: f64,
    /// Chance a `movement`-typed skill produces a *partial* dodge (a damage
    /// multiplier below 1 rather than a full miss) instead of a full dodge
    /// roll. Per spec.md section 4.6 stage S4.
    #[serde(default)]
    pub partial_evade_chance: f64,
    /// Damage multiplier applied on a partial evade.
    #[serde(default = "default_partial_evade_multiplier")]
    pub partial_evade_multiplier: f64,
}

fn default_partial_evade_multiplier() -> f64 {
    0.5
}

impl SkillTier {
    fn validate(&self, skill_id: &str) -> Result<(), EngineError> {
        let in_unit = |v: f64| (0.0..=1.0).contains(&v);
        if !in_unit(self.hit_chance) {
            return Err(EngineError::InvalidData(format!(
                "skill '{skill_id}' tier '{}': hit_chance {} not in [0,1]",
                self.tier_name, self.hit_chance
            )));
        }
        if !in_unit(self.critical_chance) {
            return Err(EngineError::InvalidData(format!(
                "skill '{skill_id}' tier '{}': critical_chance {} not in [0,1]",
                self.tier_name, self.critical_chance
            )));
        }
        if self.power_multiplier < 0.0 {
            return Err(EngineError::InvalidData(format!(
                "skill '{skill_id}' tier '{}': power_multiplier must be non-negative",
                self.tier_name
            )));
        }
        if let Some(chance) = self.defend_chance {
            if !in_unit(chance) {
                return Err(EngineError::InvalidData(format!(
                    "skill '{skill_id}' tier '{}': defend_chance {} not in [0,1]",
                    self.tier_name, chance
                )));
            }
        }
        Ok(())
    }

    /// `true` when this skill is of the `movement` type referenced by stage
    /// S4 (evasion).
    pub fn is_movement(&self) -> bool {
        self.skill_type == "movement" || self.skill_type == "闪避"
    }

    /// `true` when this skill is of the `defense` type referenced by stage
    /// S5 (damage reduction).
    pub fn is_defense(&self) -> bool {
        self.skill_type == "defense" || self.skill_type == "抵挡"
    }
}

/// A stable key into the catalog: `(skill_id, tier)`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SkillKey {
    pub skill_id: String,
    pub tier: u32,
}

/// Immutable `(skill_id, tier) -> SkillTier` mapping for the duration of a
/// run. Backed by a `BTreeMap` rather than a hash map so that any future
/// catalog-iterating code path (e.g. dumping the full catalog for
/// diagnostics) has a deterministic order — spec.md section 5 forbids
/// hash-based iteration for anything result-affecting.
#[derive(Debug, Clone, Default)]
pub struct SkillCatalog {
    tiers: BTreeMap<SkillKey, SkillTier>,
}

impl SkillCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a tier, validating its parameters. Construction-time failures
    /// are `EngineError::InvalidData` and must be surfaced to the caller
    /// before a run starts (spec.md section 7).
    pub fn insert(&mut self, skill_id: impl Into<String>, tier: u32, params: SkillTier) -> Result<(), EngineError> {
        let skill_id = skill_id.into();
        params.validate(&skill_id)?;
        if tier < 1 {
            return Err(EngineError::InvalidData(format!(
                "skill '{skill_id}': tier must be >= 1, got {tier}"
            )));
        }
        self.tiers.insert(SkillKey { skill_id, tier }, params);
        Ok(())
    }

    pub fn get(&self, skill_id: &str, tier: u32) -> Option<&SkillTier> {
        self.tiers.get(&SkillKey {
            skill_id: skill_id.to_string(),
            tier,
        })
    }

    pub fn len(&self) -> usize {
        self.tiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }
}
