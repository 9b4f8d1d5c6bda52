//! S8 Event Emit: emits the primary `ATTACK` event (when the pipeline
//! reached damage resolution) followed by a `DEFEAT` event if queued.
//! Always runs, including after an earlier stage aborted — an abort before
//! damage resolution (S2/S3 `NOOP`, S4 `DODGE`) has already pushed its own
//! terminal event, so this stage finds nothing left to do and is a no-op.

use crate::context::StepContext;
use crate::events::{BattleEvent, EventKind};
use crate::pipeline::{EngineWorld, Stage, StageOutcome};

#[derive(Debug)]
pub struct EventEmitStage;

impl Stage for EventEmitStage {
    fn name(&self) -> &'static str {
        "event_emit"
    }

    fn applicable(&self, _ctx: &StepContext) -> bool {
        true
    }

    fn always_runs(&self) -> bool {
        true
    }

    fn run(&self, ctx: &mut StepContext, _world: &mut EngineWorld) -> StageOutcome {
        let (Some(actor_id), Some(hit), Some(damage), Some(bucket)) = (
            ctx.actor_id.clone(),
            ctx.hit,
            ctx.final_damage,
            ctx.damage_bucket,
        ) else {
            return Ok(());
        };

        let critical = ctx.critical.unwrap_or(false);
        ctx.events.push(BattleEvent {
            kind: EventKind::Attack,
            actor_id: actor_id.clone(),
            target_id: ctx.target_id.clone(),
            skill_id: ctx.skill_id.clone(),
            tier: ctx.tier,
            hit,
            critical,
            damage,
            damage_bucket: bucket,
            reason: None,
        });

        if ctx.defeat_queued {
            ctx.events.push(BattleEvent {
                kind: EventKind::Defeat,
                actor_id,
                target_id: ctx.target_id.clone(),
                skill_id: ctx.skill_id.clone(),
                tier: ctx.tier,
                hit: true,
                critical,
                damage,
                damage_bucket: bucket,
                reason: None,
            });
        }
        Ok(())
    }
}
