//! Error taxonomy for the engine core.
//!
//! Only [`EngineError::InvalidData`] and [`EngineError::SchedulerStuck`] ever
//! escape the public API as a hard `Err`. `InsufficientResource` is
//! constructed by `CombatantStore::spend_qi` and turned into a `NOOP` event
//! by the resource-check stage. `StageFatal`/`StageRecoverable` are built by
//! `pipeline::StageFailure::into_engine_error` purely for typed, formatted
//! diagnostics — the pipeline logs them and folds their severity into
//! `ctx.should_continue`/`ctx.errored`, but never returns them from `step()`.

use thiserror::Error;

use crate::combatant::CombatantId;

/// Errors surfaced (or modeled internally) by the engine core.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EngineError {
    /// A combatant or skill-tier record violated an invariant at
    /// construction time (e.g. `hp > max_hp`, `hit_chance` outside `[0,1]`).
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// The ATB scheduler exceeded its progress bound without producing a
    /// ready combatant. Fatal for the step; the engine marks the battle over
    /// with reason `"stuck"`.
    #[error("scheduler made no progress after {iterations} ticks")]
    SchedulerStuck { iterations: u32 },

    /// A caller (a stage) tried to spend a resource the combatant does not
    /// have. Converted to a `NOOP` event by the resource-check stage; never
    /// escapes `step()`.
    #[error("combatant {actor} lacks the resources to act")]
    InsufficientResource { actor: CombatantId },

    /// A stage-internal contract violation. Marks the step errored; only the
    /// event-emission stage still runs.
    #[error("stage '{stage}' failed fatally: {reason}")]
    StageFatal { stage: &'static str, reason: String },

    /// Optional stage behavior failed in a way that does not need to abort
    /// the step. Logged to `ctx.log` and the step continues.
    #[error("stage '{stage}' reported a recoverable issue: {reason}")]
    StageRecoverable { stage: &'static str, reason: String },
}

pub type EngineResult<T> = Result<T, EngineError>;
