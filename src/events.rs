//! Battle events and the narration-context mapping (part of C9).
//!
//! The event schema is wire-level stable (spec.md section 6). `BattleEvent`
//! plays the role the teacher's `combat::events::DamageEvent` /
//! `CombatantDeathEvent` Bevy `Event`s play, but as a single tagged record
//! rather than one struct per Bevy `EventWriter`, since there is no ECS
//! event bus here — the pipeline appends directly to the engine's event log
//! (see `combat::log::CombatLog::log` for the analogous "push a structured
//! entry" pattern).

use serde::{Deserialize, Serialize};

use crate::combatant::CombatantId;

/// Coarse categorization of damage relative to target max HP, used by
/// downstream narration selection (spec.md section 3, GLOSSARY).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DamageBucket {
    None,
    Low,
    Medium,
    High,
}

impl DamageBucket {
    /// Computes the bucket for `damage` dealt against a target with
    /// `target_max_hp`, per the thresholds of spec.md section 4.6 stage S6:
    /// high >= 30% max hp, medium >= 10% max hp, else low; none when
    /// damage is zero.
    pub fn from_damage(damage: u32, target_max_hp: u32) -> Self {
        if damage == 0 {
            return DamageBucket::None;
        }
        let damage = damage as f64;
        let max_hp = target_max_hp.max(1) as f64;
        if damage >= 0.30 * max_hp {
            DamageBucket::High
        } else if damage >= 0.10 * max_hp {
            DamageBucket::Medium
        } else {
            DamageBucket::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DamageBucket::None => "none",
            DamageBucket::Low => "low",
            DamageBucket::Medium => "medium",
            DamageBucket::High => "high",
        }
    }
}

/// The kind of a `BattleEvent`, per spec.md section 3/6.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventKind {
    Attack,
    Dodge,
    Defend,
    Defeat,
    Noop,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Attack => "ATTACK",
            EventKind::Dodge => "DODGE",
            EventKind::Defend => "DEFEND",
            EventKind::Defeat => "DEFEAT",
            EventKind::Noop => "NOOP",
        }
    }
}

/// A single structured combat event, per spec.md section 6's wire schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BattleEvent {
    pub kind: EventKind,
    pub actor_id: CombatantId,
    pub target_id: Option<CombatantId>,
    pub skill_id: Option<String>,
    pub tier: Option<u32>,
    pub hit: bool,
    pub critical: bool,
    pub damage: u32,
    pub damage_bucket: DamageBucket,
    pub reason: Option<String>,
}

impl BattleEvent {
    pub fn noop(actor_id: CombatantId, reason: impl Into<String>) -> Self {
        Self {
            kind: EventKind::Noop,
            actor_id,
            target_id: None,
            skill_id: None,
            tier: None,
            hit: false,
            critical: false,
            damage: 0,
            damage_bucket: DamageBucket::None,
            reason: Some(reason.into()),
        }
    }
}

/// Plain record handed to an external narration/template layer; produced by
/// `Engine::map_event_for_narration`. This crate does not render text — it
/// only supplies the context a narration collaborator needs, per spec.md
/// section 4.7.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NarrationContext {
    pub narrative_type: &'static str,
    pub actor_name: String,
    pub target_name: Option<String>,
    pub skill_name: Option<String>,
    pub tier_name: Option<String>,
    pub hit: bool,
    pub critical: bool,
    pub damage_amount: u32,
    pub damage_bucket: &'static str,
    pub tier_narrative_template: Option<String>,
}

/// Maps an event kind to its narration type string. `critical` events are
/// further tagged `"暴击"` by the caller (spec.md section 4.7) rather than
/// here, since criticality is a property of the event, not the kind.
pub fn narrative_type_for(kind: EventKind) -> &'static str {
    match kind {
        EventKind::Attack => "攻击",
        EventKind::Dodge => "闪避",
        EventKind::Defend => "抵挡",
        EventKind::Defeat => "攻击",
        EventKind::Noop => "无效",
    }
}
