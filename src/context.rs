//! Step Context (C6): the per-step mutable record flowing through the
//! resolution pipeline.
//!
//! A plain record, not a hidden global — mirrors the teacher's
//! `CombatContext` (`states/play_match/class_ai/mod.rs`'s "context building"
//! phase) generalized from a read-only AI snapshot into a read/write scratch
//! pad stages thread through one `step()` call. It is created fresh at the
//! top of `Engine::step` and dropped at the end; no stage retains a
//! reference past its own invocation (spec.md section 4.5).

use crate::combatant::CombatantId;
use crate::events::{BattleEvent, DamageBucket};

/// Per-step scratch state. Stages mutate only their designated fields.
#[derive(Debug, Default)]
pub struct StepContext {
    pub actor_id: Option<CombatantId>,
    pub target_id: Option<CombatantId>,
    pub skill_id: Option<String>,
    pub tier: Option<u32>,
    pub hit: Option<bool>,
    pub critical: Option<bool>,
    pub final_damage: Option<u32>,
    pub damage_bucket: Option<DamageBucket>,

    /// Damage-reduction coefficient set by the defense stage (S5), applied
    /// multiplicatively to outgoing damage in the damage-calc stage (S6).
    /// `1.0` (no reduction) when no defense skill applies.
    pub defense_coefficient: f64,
    /// Damage multiplier set by the evasion stage (S4) on a *partial* miss.
    /// `1.0` when no partial evasion applies.
    pub evasion_multiplier: f64,
    /// Set by the state-apply stage (S7) when the target's hp reaches zero
    /// this step, so the event-emit stage (S8) can append a `DEFEAT`.
    pub defeat_queued: bool,

    pub events: Vec<BattleEvent>,
    pub log: Vec<String>,
    pub should_continue: bool,
    pub errored: bool,
    /// Set by the scheduling stage when the ATB scheduler exhausts its
    /// progress bound. The facade treats this as terminal: the battle is
    /// over with reason `"stuck"` (spec.md section 7), not merely this one
    /// step failing.
    pub scheduler_stuck: bool,
}

impl StepContext {
    pub fn new() -> Self {
        Self {
            defense_coefficient: 1.0,
            evasion_multiplier: 1.0,
            should_continue: true,
            ..Default::default()
        }
    }

    pub fn abort(&mut self) {
        self.should_continue = false;
    }

    pub fn mark_errored(&mut self) {
        self.should_continue = false;
        self.errored = true;
    }

    pub fn push_log(&mut self, message: impl Into<String>) {
        self.log.push(message.into());
    }
}
