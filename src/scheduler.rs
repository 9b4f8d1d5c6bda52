//! ATB Scheduler (C4): picks the next actor by accumulated time-units.
//!
//! Grounded in the teacher's `MatchCountdown`/turn-gating resources
//! (`states/play_match/components/mod.rs`) generalized from "one countdown
//! gate" to a full Active-Time-Battle accumulator, and in the fixed-point
//! resolution of spec.md section 9's open question: `agility * tick_scale`
//! is accumulated as integer milli-units (`floor(agility * tick_scale *
//! 1000)`) so that no floating-point drift can desync two runs of the same
//! seed on different platforms.

use crate::combatant::{Combatant, CombatantId, CombatantStore};
use crate::error::EngineError;

/// Safety bound on the inner "accumulate ticks" loop. Exceeding it means no
/// living combatant has positive effective agility, which `SchedulerStuck`
/// reports as fatal for the step (spec.md section 4.3).
const MAX_TICKS: u32 = 10_000;

#[derive(Debug, Clone, Copy)]
pub struct AtbScheduler {
    /// Threshold, in whole time-units (spec.md units), a combatant must
    /// cross to become ready. Stored internally as milli-units.
    threshold_milli: u64,
    tick_scale: f64,
}

impl AtbScheduler {
    pub fn new(threshold: u32, tick_scale: f64) -> Result<Self, EngineError> {
        if threshold == 0 {
            return Err(EngineError::InvalidData(
                "atb_threshold must be >= 1".to_string(),
            ));
        }
        if tick_scale <= 0.0 {
            return Err(EngineError::InvalidData(
                "atb_tick_scale must be > 0".to_string(),
            ));
        }
        Ok(Self {
            threshold_milli: (threshold as u64) * 1000,
            tick_scale,
        })
    }

    fn tick_delta_milli(&self, agility: u32) -> u64 {
        (agility as f64 * self.tick_scale * 1000.0).floor() as u64
    }

    /// Runs the accumulate-then-select algorithm of spec.md section 4.3 and
    /// returns the chosen actor's id. Advances `time_units` for every living
    /// combatant each tick and subtracts the threshold (never resets to
    /// zero) from the winner.
    pub fn select_next_actor(&self, store: &mut CombatantStore) -> Result<CombatantId, EngineError> {
        for _ in 0..MAX_TICKS {
            let mut ready: Vec<CombatantId> = Vec::new();
            for combatant in store.living() {
                if combatant.time_units >= self.threshold_milli {
                    ready.push(combatant.id.clone());
                }
            }
            if let Some(winner) = self.pick_highest(&ready, store) {
                if let Some(c) = store.by_id_mut(&winner) {
                    c.time_units -= self.threshold_milli;
                }
                return Ok(winner);
            }

            let living_ids: Vec<CombatantId> = store.living().map(|c| c.id.clone()).collect();
            for id in living_ids {
                if let Some(c) = store.by_id_mut(&id) {
                    c.time_units += self.tick_delta_milli(c.stats.agility);
                }
            }
        }
        Err(EngineError::SchedulerStuck {
            iterations: MAX_TICKS,
        })
    }

    /// Among `ready`, picks the combatant with highest `time_units`,
    /// breaking ties by lowest `CombatantId`.
    fn pick_highest(&self, ready: &[CombatantId], store: &CombatantStore) -> Option<CombatantId> {
        ready
            .iter()
            .filter_map(|id| store.by_id(id).map(|c: &Combatant| (id.clone(), c.time_units)))
            .max_by(|(id_a, tu_a), (id_b, tu_b)| tu_a.cmp(tu_b).then_with(|| id_b.cmp(id_a)))
            .map(|(id, _)| id)
    }
}
