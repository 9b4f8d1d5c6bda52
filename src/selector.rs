//! Action Selector (C5): heuristic policy choosing `(skill, tier, target)`.
//!
//! Grounded in the teacher's `combat_ai::acquire_targets` /
//! `class_ai::decide_action` split (`states/play_match/combat_ai.rs`,
//! `states/play_match/class_ai/mod.rs`): target acquisition and ability
//! choice are two distinct, deterministic passes over a snapshot of visible
//! state, sorted by a stable key before any tie-break decision. This
//! selector keeps that two-pass shape but collapses per-class heuristics
//! into the single data-driven expected-damage score of spec.md section 4.4,
//! since skills here are wholly described by catalog data rather than
//! hardcoded per-class Rust match arms.

use crate::catalog::SkillCatalog;
use crate::combatant::{Combatant, CombatantId, CombatantStore};

/// The chosen action for a scheduled actor, or `None` if nothing was viable.
#[derive(Debug, Clone, PartialEq)]
pub struct ChosenAction {
    pub skill_id: String,
    pub tier: u32,
    pub target_id: CombatantId,
}

/// Stateless heuristic selector. Never consumes randomness (spec.md section
/// 4.4): the same `(actor, store, catalog)` triple always yields the same
/// choice.
#[derive(Debug, Default, Clone, Copy)]
pub struct ActionSelector;

impl ActionSelector {
    pub fn new() -> Self {
        Self
    }

    /// `true` when `actor` can afford and is off cooldown for `(skill_id,
    /// tier)`.
    fn is_viable(actor: &Combatant, catalog: &SkillCatalog, skill_id: &str, tier: u32) -> bool {
        match catalog.get(skill_id, tier) {
            Some(params) => actor.stats.qi >= params.qi_cost && actor.cooldown_of(skill_id) == 0,
            None => false,
        }
    }

    fn score(params: &crate::catalog::SkillTier) -> f64 {
        params.base_damage as f64 * params.power_multiplier * params.hit_chance
            * (1.0 + params.critical_chance)
            / (params.cooldown as f64 + 1.0)
    }

    /// Picks the highest-scoring viable `(skill_id, tier)` the actor has
    /// equipped, ties broken by lower `skill_id` then lower tier.
    fn choose_skill(&self, actor: &Combatant, catalog: &SkillCatalog) -> Option<(String, u32)> {
        let mut best: Option<(String, u32, f64)> = None;
        for equipped in &actor.equipped {
            if !Self::is_viable(actor, catalog, &equipped.skill_id, equipped.tier) {
                continue;
            }
            let params = match catalog.get(&equipped.skill_id, equipped.tier) {
                Some(p) => p,
                None => continue,
            };
            let score = Self::score(params);
            let candidate = (equipped.skill_id.clone(), equipped.tier, score);
            best = Some(match best {
                None => candidate,
                Some(current) => {
                    if candidate.2 > current.2 {
                        candidate
                    } else if candidate.2 < current.2 {
                        current
                    } else if candidate.0 < current.0 {
                        candidate
                    } else if candidate.0 > current.0 {
                        current
                    } else if candidate.1 < current.1 {
                        candidate
                    } else {
                        current
                    }
                }
            });
        }
        best.map(|(skill_id, tier, _)| (skill_id, tier))
    }

    /// Among living opposing-faction combatants, picks lowest current HP,
    /// ties broken by lowest `CombatantId`.
    fn choose_target(actor: &Combatant, store: &CombatantStore) -> Option<CombatantId> {
        store
            .living()
            .filter(|c| c.faction != actor.faction)
            .min_by(|a, b| a.stats.hp.cmp(&b.stats.hp).then_with(|| a.id.cmp(&b.id)))
            .map(|c| c.id.clone())
    }

    /// Produces the full `(skill, tier, target)` choice for `actor_id`, or
    /// `None` if no skill is viable or no opposing combatant remains.
    pub fn select(&self, actor_id: &CombatantId, store: &CombatantStore, catalog: &SkillCatalog) -> Option<ChosenAction> {
        let actor = store.by_id(actor_id)?;
        let (skill_id, tier) = self.choose_skill(actor, catalog)?;
        let target_id = Self::choose_target(actor, store)?;
        Some(ChosenAction {
            skill_id,
            tier,
            target_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::SkillTier;
    use crate::combatant::{EquippedSkill, Stats};

    fn tier(base_damage: u32, qi_cost: u32, cooldown: u32) -> SkillTier {
        SkillTier {
            base_damage,
            power_multiplier: 1.0,
            hit_chance: 1.0,
            critical_chance: 0.0,
            qi_cost,
            cooldown,
            tier_name: "t".to_string(),
            narrative_template: "{actor} hits {target}".to_string(),
            skill_type: "攻击".to_string(),
            defend_chance: None,
            defend_reduction: 0.0,
            partial_evade_chance: 0.0,
            partial_evade_multiplier: 0.5,
        }
    }

    fn stats() -> Stats {
        Stats {
            hp: 10,
            max_hp: 10,
            qi: 10,
            max_qi: 10,
            strength: 0,
            agility: 10,
            defense: 0,
        }
    }

    #[test]
    fn picks_highest_scoring_viable_skill() {
        let mut catalog = SkillCatalog::new();
        catalog.insert("weak", 1, tier(10, 0, 0)).unwrap();
        catalog.insert("strong", 1, tier(50, 0, 0)).unwrap();

        let mut store = CombatantStore::new();
        let actor = Combatant::new(
            "a",
            "A",
            "red",
            stats(),
            vec![
                EquippedSkill { skill_id: "weak".into(), tier: 1 },
                EquippedSkill { skill_id: "strong".into(), tier: 1 },
            ],
        )
        .unwrap();
        store.insert(actor).unwrap();
        store.insert(Combatant::new("b", "B", "blue", stats(), vec![]).unwrap()).unwrap();

        let selector = ActionSelector::new();
        let chosen = selector.select(&CombatantId::from("a"), &store, &catalog).unwrap();
        assert_eq!(chosen.skill_id, "strong");
    }

    #[test]
    fn skips_skills_on_cooldown_or_unaffordable() {
        let mut catalog = SkillCatalog::new();
        catalog.insert("costly", 1, tier(100, 99, 0)).unwrap();
        catalog.insert("cheap", 1, tier(5, 0, 0)).unwrap();

        let mut store = CombatantStore::new();
        let mut actor = Combatant::new(
            "a",
            "A",
            "red",
            stats(),
            vec![
                EquippedSkill { skill_id: "costly".into(), tier: 1 },
                EquippedSkill { skill_id: "cheap".into(), tier: 1 },
            ],
        )
        .unwrap();
        actor.cooldowns.insert("cheap".to_string(), 0);
        store.insert(actor).unwrap();
        store.insert(Combatant::new("b", "B", "blue", stats(), vec![]).unwrap()).unwrap();

        let selector = ActionSelector::new();
        let chosen = selector.select(&CombatantId::from("a"), &store, &catalog).unwrap();
        assert_eq!(chosen.skill_id, "cheap");
    }

    #[test]
    fn no_viable_skill_returns_none() {
        let mut catalog = SkillCatalog::new();
        catalog.insert("costly", 1, tier(100, 99, 0)).unwrap();
        let mut store = CombatantStore::new();
        let actor = Combatant::new(
            "a",
            "A",
            "red",
            stats(),
            vec![EquippedSkill { skill_id: "costly".into(), tier: 1 }],
        )
        .unwrap();
        store.insert(actor).unwrap();
        store.insert(Combatant::new("b", "B", "blue", stats(), vec![]).unwrap()).unwrap();

        let selector = ActionSelector::new();
        assert!(selector.select(&CombatantId::from("a"), &store, &catalog).is_none());
    }

    #[test]
    fn target_picks_lowest_hp_tie_break_by_id() {
        let mut store = CombatantStore::new();
        let mut s1 = stats();
        s1.hp = 5;
        let mut s2 = stats();
        s2.hp = 5;
        store.insert(Combatant::new("actor", "Actor", "red", stats(), vec![]).unwrap()).unwrap();
        store.insert(Combatant::new("z", "Z", "blue", s1, vec![]).unwrap()).unwrap();
        store.insert(Combatant::new("a", "A", "blue", s2, vec![]).unwrap()).unwrap();
        let actor = store.by_id(&CombatantId::from("actor")).unwrap();
        let target = ActionSelector::choose_target(actor, &store).unwrap();
        assert_eq!(target, CombatantId::from("a"));
    }

    #[test]
    fn no_opposing_combatants_returns_none() {
        let catalog = SkillCatalog::new();
        let mut store = CombatantStore::new();
        store.insert(Combatant::new("a", "A", "red", stats(), vec![]).unwrap()).unwrap();
        let selector = ActionSelector::new();
        assert!(selector.select(&CombatantId::from("a"), &store, &catalog).is_none());
    }
}
