//! Combatant State Store (C3) and the combatant-facing entities.
//!
//! The store plays the role the teacher gives its `Query<&mut Combatant>`
//! ECS access: the only way to read or mutate a combatant's state. Since
//! this crate has no ECS world, the store owns a plain `Vec<Combatant>` in
//! insertion order and exposes the same read/write surface spec.md section
//! 4.2 specifies, rather than handing out raw entity queries.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::error::EngineError;

/// Opaque, totally-ordered combatant identifier. Ordering is used for
/// deterministic tie-breaking throughout the engine (spec.md sections 4.3,
/// 4.4, 8.7) — never by insertion order or hash.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CombatantId(pub String);

impl std::fmt::Display for CombatantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CombatantId {
    fn from(s: &str) -> Self {
        CombatantId(s.to_string())
    }
}

impl From<String> for CombatantId {
    fn from(s: String) -> Self {
        CombatantId(s)
    }
}

/// Team affiliation. Any value comparing equal across combatants on the same
/// side works; battle termination depends solely on distinct-faction count
/// (spec.md section 3).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Faction(pub String);

impl std::fmt::Display for Faction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Faction {
    fn from(s: &str) -> Self {
        Faction(s.to_string())
    }
}

/// Non-negative resource/attribute block. `hp <= max_hp` and `qi <= max_qi`
/// are enforced at construction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    pub hp: u32,
    pub max_hp: u32,
    pub qi: u32,
    pub max_qi: u32,
    pub strength: u32,
    pub agility: u32,
    pub defense: u32,
}

impl Stats {
    fn validate(&self) -> Result<(), EngineError> {
        if self.hp > self.max_hp {
            return Err(EngineError::InvalidData(format!(
                "hp {} exceeds max_hp {}",
                self.hp, self.max_hp
            )));
        }
        if self.qi > self.max_qi {
            return Err(EngineError::InvalidData(format!(
                "qi {} exceeds max_qi {}",
                self.qi, self.max_qi
            )));
        }
        Ok(())
    }
}

/// A skill equipped by a combatant at a particular tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquippedSkill {
    pub skill_id: String,
    pub tier: u32,
}

/// A single combatant's full state. Downed (`hp == 0`) combatants stay
/// addressable in the store but are filtered out of scheduling and
/// targeting by every consumer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Combatant {
    pub id: CombatantId,
    pub display_name: String,
    pub faction: Faction,
    pub stats: Stats,
    pub equipped: SmallVec<[EquippedSkill; 4]>,
    #[serde(default)]
    pub cooldowns: HashMap<String, u32>,
    /// Accumulated ATB progress, tracked in fixed-point milli-units (see
    /// `scheduler.rs`) rather than plain integer "time units", so that a
    /// fractional `atb_tick_scale` never drifts between platforms or runs.
    #[serde(default)]
    pub time_units: u64,
}

impl Combatant {
    pub fn new(
        id: impl Into<CombatantId>,
        display_name: impl Into<String>,
        faction: impl Into<Faction>,
        stats: Stats,
        equipped: impl IntoIterator<Item = EquippedSkill>,
    ) -> Result<Self, EngineError> {
        stats.validate()?;
        Ok(Self {
            id: id.into(),
            display_name: display_name.into(),
            faction: faction.into(),
            stats,
            equipped: equipped.into_iter().collect(),
            cooldowns: HashMap::new(),
            time_units: 0,
        })
    }

    pub fn is_alive(&self) -> bool {
        self.stats.hp > 0
    }

    pub fn cooldown_of(&self, skill_id: &str) -> u32 {
        self.cooldowns.get(skill_id).copied().unwrap_or(0)
    }
}

/// Holds all live combatant records for the duration of a run. Stable
/// insertion-order iteration is load-bearing: ATB tick accumulation and
/// several selector tie-breaks depend on iterating in the same order every
/// time (spec.md section 5).
#[derive(Debug, Clone, Default)]
pub struct CombatantStore {
    order: Vec<CombatantId>,
    combatants: HashMap<CombatantId, Combatant>,
}

impl CombatantStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, combatant: Combatant) -> Result<(), EngineError> {
        if self.combatants.contains_key(&combatant.id) {
            return Err(EngineError::InvalidData(format!(
                "duplicate combatant id '{}'",
                combatant.id
            )));
        }
        self.order.push(combatant.id.clone());
        self.combatants.insert(combatant.id.clone(), combatant);
        Ok(())
    }

    /// All combatants in insertion order, regardless of life status.
    pub fn all(&self) -> impl Iterator<Item = &Combatant> {
        self.order.iter().filter_map(move |id| self.combatants.get(id))
    }

    /// Living combatants, insertion order preserved.
    pub fn living(&self) -> impl Iterator<Item = &Combatant> {
        self.all().filter(|c| c.is_alive())
    }

    pub fn by_id(&self, id: &CombatantId) -> Option<&Combatant> {
        self.combatants.get(id)
    }

    pub fn by_id_mut(&mut self, id: &CombatantId) -> Option<&mut Combatant> {
        self.combatants.get_mut(id)
    }

    /// Sets `hp <- max(0, hp - amount)`. Emits no event; the caller (a
    /// stage) is responsible for that.
    pub fn apply_damage(&mut self, id: &CombatantId, amount: u32) {
        if let Some(c) = self.combatants.get_mut(id) {
            c.stats.hp = c.stats.hp.saturating_sub(amount);
        }
    }

    /// Requires `qi >= cost`; fails with `InsufficientResource` otherwise.
    pub fn spend_qi(&mut self, id: &CombatantId, cost: u32) -> Result<(), EngineError> {
        let c = self
            .combatants
            .get_mut(id)
            .ok_or_else(|| EngineError::InvalidData(format!("unknown combatant '{id}'")))?;
        if c.stats.qi < cost {
            return Err(EngineError::InsufficientResource { actor: id.clone() });
        }
        c.stats.qi -= cost;
        Ok(())
    }

    pub fn set_cooldown(&mut self, id: &CombatantId, skill_id: &str, value: u32) {
        if let Some(c) = self.combatants.get_mut(id) {
            c.cooldowns.insert(skill_id.to_string(), value);
        }
    }

    /// Every cooldown entry `max(0, v - 1)`.
    pub fn decrement_cooldowns(&mut self, id: &CombatantId) {
        if let Some(c) = self.combatants.get_mut(id) {
            for v in c.cooldowns.values_mut() {
                *v = v.saturating_sub(1);
            }
        }
    }

    /// Distinct factions with at least one living member, in first-seen
    /// (insertion) order.
    pub fn factions_alive(&self) -> Vec<Faction> {
        let mut seen = Vec::new();
        for c in self.living() {
            if !seen.contains(&c.faction) {
                seen.push(c.faction.clone());
            }
        }
        seen
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(hp: u32, max_hp: u32) -> Stats {
        Stats {
            hp,
            max_hp,
            qi: 0,
            max_qi: 0,
            strength: 0,
            agility: 10,
            defense: 0,
        }
    }

    #[test]
    fn rejects_hp_above_max() {
        let result = Combatant::new("a", "A", "red", stats(20, 10), vec![]);
        assert!(result.is_err());
    }

    #[test]
    fn living_filters_downed_combatants() {
        let mut store = CombatantStore::new();
        store.insert(Combatant::new("a", "A", "red", stats(10, 10), vec![]).unwrap()).unwrap();
        store.insert(Combatant::new("b", "B", "blue", stats(0, 10), vec![]).unwrap()).unwrap();
        let living: Vec<_> = store.living().map(|c| c.id.clone()).collect();
        assert_eq!(living, vec![CombatantId::from("a")]);
    }

    #[test]
    fn apply_damage_floors_at_zero() {
        let mut store = CombatantStore::new();
        store.insert(Combatant::new("a", "A", "red", stats(10, 10), vec![]).unwrap()).unwrap();
        let id = CombatantId::from("a");
        store.apply_damage(&id, 50);
        assert_eq!(store.by_id(&id).unwrap().stats.hp, 0);
    }

    #[test]
    fn spend_qi_fails_when_insufficient() {
        let mut store = CombatantStore::new();
        let mut s = stats(10, 10);
        s.qi = 5;
        s.max_qi = 10;
        store.insert(Combatant::new("a", "A", "red", s, vec![]).unwrap()).unwrap();
        let id = CombatantId::from("a");
        assert!(store.spend_qi(&id, 10).is_err());
        assert!(store.spend_qi(&id, 5).is_ok());
    }

    #[test]
    fn factions_alive_tracks_living_only() {
        let mut store = CombatantStore::new();
        store.insert(Combatant::new("a", "A", "red", stats(10, 10), vec![]).unwrap()).unwrap();
        store.insert(Combatant::new("b", "B", "blue", stats(0, 10), vec![]).unwrap()).unwrap();
        assert_eq!(store.factions_alive(), vec![Faction::from("red")]);
    }

    #[test]
    fn insertion_order_is_stable() {
        let mut store = CombatantStore::new();
        for id in ["c", "a", "b"] {
            store.insert(Combatant::new(id, id, "red", stats(10, 10), vec![]).unwrap()).unwrap();
        }
        let order: Vec<_> = store.all().map(|c| c.id.0.clone()).collect();
        assert_eq!(order, vec!["c", "a", "b"]);
    }
}
