//! S1 Scheduling: invokes the ATB scheduler, sets `actor_id`, decrements the
//! actor's cooldowns.

use crate::context::StepContext;
use crate::pipeline::{EngineWorld, Stage, StageFailure, StageOutcome};

#[derive(Debug)]
pub struct SchedulingStage;

impl Stage for SchedulingStage {
    fn name(&self) -> &'static str {
        "scheduling"
    }

    fn applicable(&self, ctx: &StepContext) -> bool {
        ctx.actor_id.is_none()
    }

    fn run(&self, ctx: &mut StepContext, world: &mut EngineWorld) -> StageOutcome {
        let actor_id = world.scheduler.select_next_actor(world.store).map_err(|err| {
            ctx.scheduler_stuck = true;
            StageFailure::fatal(err.to_string())
        })?;
        world.store.decrement_cooldowns(&actor_id);
        ctx.actor_id = Some(actor_id);
        ctx.push_log("scheduling: actor selected");
        Ok(())
    }
}
