//! S7 State Apply: spends qi, sets the skill's cooldown, applies damage on
//! a hit, and queues a `DEFEAT` marker if the target's hp reaches zero.

use crate::context::StepContext;
use crate::pipeline::{EngineWorld, Stage, StageFailure, StageOutcome};

#[derive(Debug)]
pub struct StateApplyStage;

impl Stage for StateApplyStage {
    fn name(&self) -> &'static str {
        "state_apply"
    }

    fn applicable(&self, ctx: &StepContext) -> bool {
        ctx.hit.is_some() && ctx.should_continue
    }

    fn run(&self, ctx: &mut StepContext, world: &mut EngineWorld) -> StageOutcome {
        let actor_id = ctx
            .actor_id
            .clone()
            .ok_or_else(|| StageFailure::fatal("state apply ran without an actor"))?;
        let skill_id = ctx
            .skill_id
            .clone()
            .ok_or_else(|| StageFailure::fatal("state apply ran without a chosen skill"))?;
        let tier = ctx
            .tier
            .ok_or_else(|| StageFailure::fatal("state apply ran without a chosen tier"))?;

        let params = world
            .catalog
            .get(&skill_id, tier)
            .ok_or_else(|| StageFailure::fatal(format!("unknown skill '{skill_id}' tier {tier}")))?;
        let qi_cost = params.qi_cost;
        let cooldown = params.cooldown;

        world
            .store
            .spend_qi(&actor_id, qi_cost)
            .map_err(|err| StageFailure::fatal(err.to_string()))?;
        world.store.set_cooldown(&actor_id, &skill_id, cooldown);

        if ctx.hit == Some(true) {
            let target_id = ctx
                .target_id
                .clone()
                .ok_or_else(|| StageFailure::fatal("state apply ran without a target"))?;
            let damage = ctx.final_damage.unwrap_or(0);
            world.store.apply_damage(&target_id, damage);
            let still_alive = world
                .store
                .by_id(&target_id)
                .map(|c| c.is_alive())
                .unwrap_or(false);
            if !still_alive {
                ctx.defeat_queued = true;
            }
        }
        Ok(())
    }
}
