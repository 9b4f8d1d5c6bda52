//! S2 Decision: invokes the Action Selector; sets `skill_id`, `tier`,
//! `target_id`, or emits a `NOOP` and aborts if nothing was viable.

use crate::context::StepContext;
use crate::events::BattleEvent;
use crate::pipeline::{EngineWorld, Stage, StageFailure, StageOutcome};
use crate::selector::ActionSelector;

#[derive(Debug)]
pub struct DecisionStage;

impl Stage for DecisionStage {
    fn name(&self) -> &'static str {
        "decision"
    }

    fn applicable(&self, ctx: &StepContext) -> bool {
        ctx.actor_id.is_some() && ctx.skill_id.is_none()
    }

    fn run(&self, ctx: &mut StepContext, world: &mut EngineWorld) -> StageOutcome {
        let actor_id = ctx
            .actor_id
            .clone()
            .ok_or_else(|| StageFailure::fatal("decision ran without a scheduled actor"))?;

        let selector = ActionSelector::new();
        match selector.select(&actor_id, world.store, world.catalog) {
            Some(chosen) => {
                ctx.skill_id = Some(chosen.skill_id);
                ctx.tier = Some(chosen.tier);
                ctx.target_id = Some(chosen.target_id);
                ctx.push_log("decision: action chosen");
            }
            None => {
                ctx.events.push(BattleEvent::noop(actor_id, "no_viable_action"));
                ctx.abort();
            }
        }
        Ok(())
    }
}
