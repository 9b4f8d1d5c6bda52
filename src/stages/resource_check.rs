//! S3 Resource Check: verifies `qi >= qi_cost` and `cooldown == 0` for the
//! chosen skill. This is a final safety net — the selector only ever offers
//! viable skills — guarding against a stage re-entering the pipeline with a
//! stale choice after an extension point mutates state between S2 and S3.

use crate::context::StepContext;
use crate::events::BattleEvent;
use crate::pipeline::{EngineWorld, Stage, StageFailure, StageOutcome};

#[derive(Debug)]
pub struct ResourceCheckStage;

impl Stage for ResourceCheckStage {
    fn name(&self) -> &'static str {
        "resource_check"
    }

    fn applicable(&self, ctx: &StepContext) -> bool {
        ctx.skill_id.is_some()
    }

    fn run(&self, ctx: &mut StepContext, world: &mut EngineWorld) -> StageOutcome {
        let actor_id = ctx
            .actor_id
            .clone()
            .ok_or_else(|| StageFailure::fatal("resource check ran without an actor"))?;
        let skill_id = ctx
            .skill_id
            .clone()
            .ok_or_else(|| StageFailure::fatal("resource check ran without a chosen skill"))?;
        let tier = ctx
            .tier
            .ok_or_else(|| StageFailure::fatal("resource check ran without a chosen tier"))?;

        let params = world
            .catalog
            .get(&skill_id, tier)
            .ok_or_else(|| StageFailure::fatal(format!("unknown skill '{skill_id}' tier {tier}")))?;

        let actor = world
            .store
            .by_id(&actor_id)
            .ok_or_else(|| StageFailure::fatal(format!("unknown actor '{actor_id}'")))?;

        let affordable = actor.stats.qi >= params.qi_cost;
        let off_cooldown = actor.cooldown_of(&skill_id) == 0;

        if !affordable || !off_cooldown {
            ctx.events.push(BattleEvent::noop(actor_id, "resource"));
            ctx.abort();
        }
        Ok(())
    }
}
