//! S4 Evasion: if the target has a `movement`-typed skill equipped, rolls
//! its own hit_chance as a separate dodge check; a full dodge emits `DODGE`
//! and aborts the step, a partial dodge leaves a damage multiplier in the
//! context for the damage-calc stage to apply.

use crate::catalog::SkillTier;
use crate::context::StepContext;
use crate::events::{BattleEvent, DamageBucket, EventKind};
use crate::pipeline::{EngineWorld, Stage, StageFailure, StageOutcome};

#[derive(Debug)]
pub struct EvasionStage;

impl EvasionStage {
    fn movement_tier<'a>(ctx: &StepContext, world: &'a EngineWorld) -> Option<&'a SkillTier> {
        let target_id = ctx.target_id.as_ref()?;
        let target = world.store.by_id(target_id)?;
        target
            .equipped
            .iter()
            .filter_map(|eq| world.catalog.get(&eq.skill_id, eq.tier))
            .find(|params| params.is_movement())
    }
}

impl Stage for EvasionStage {
    fn name(&self) -> &'static str {
        "evasion"
    }

    fn applicable(&self, ctx: &StepContext) -> bool {
        if ctx.target_id.is_none() {
            return false;
        }
        ctx.should_continue
    }

    fn run(&self, ctx: &mut StepContext, world: &mut EngineWorld) -> StageOutcome {
        let Some(movement) = Self::movement_tier(ctx, world) else {
            return Ok(());
        };
        let hit_chance = movement.hit_chance;
        let partial_chance = movement.partial_evade_chance;
        let partial_multiplier = movement.partial_evade_multiplier;

        let effective_hit = world.rng.gen_bool(hit_chance);
        if !effective_hit {
            let actor_id = ctx
                .actor_id
                .clone()
                .ok_or_else(|| StageFailure::fatal("evasion ran without an actor"))?;
            ctx.hit = Some(false);
            ctx.events.push(BattleEvent {
                kind: EventKind::Dodge,
                actor_id,
                target_id: ctx.target_id.clone(),
                skill_id: ctx.skill_id.clone(),
                tier: ctx.tier,
                hit: false,
                critical: false,
                damage: 0,
                damage_bucket: DamageBucket::None,
                reason: None,
            });
            ctx.abort();
            return Ok(());
        }

        if partial_chance > 0.0 && world.rng.gen_bool(partial_chance) {
            ctx.evasion_multiplier = partial_multiplier;
            ctx.push_log("evasion: partial dodge");
        }
        Ok(())
    }
}
