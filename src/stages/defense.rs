//! S5 Defense: if the target has a `defense`-typed skill, records a
//! damage-reduction coefficient and emits a `DEFEND` event.
//!
//! Per spec.md section 9's open question on whether defense rolls consume
//! randomness: only when the tier defines `defend_chance` does this stage
//! draw from the RNG; an unconditional defense (no probability parameter)
//! always applies its reduction deterministically.

use crate::catalog::SkillTier;
use crate::combatant::EquippedSkill;
use crate::context::StepContext;
use crate::events::{BattleEvent, DamageBucket, EventKind};
use crate::pipeline::{EngineWorld, Stage, StageFailure, StageOutcome};

#[derive(Debug)]
pub struct DefenseStage;

impl DefenseStage {
    fn defense_skill<'a>(ctx: &StepContext, world: &'a EngineWorld) -> Option<(&'a EquippedSkill, &'a SkillTier)> {
        let target_id = ctx.target_id.as_ref()?;
        let target = world.store.by_id(target_id)?;
        target.equipped.iter().find_map(|eq| {
            world
                .catalog
                .get(&eq.skill_id, eq.tier)
                .filter(|params| params.is_defense())
                .map(|params| (eq, params))
        })
    }
}

impl Stage for DefenseStage {
    fn name(&self) -> &'static str {
        "defense"
    }

    fn applicable(&self, ctx: &StepContext) -> bool {
        ctx.target_id.is_some() && ctx.should_continue
    }

    fn run(&self, ctx: &mut StepContext, world: &mut EngineWorld) -> StageOutcome {
        let Some((equipped, params)) = Self::defense_skill(ctx, world) else {
            return Ok(());
        };
        let skill_id = equipped.skill_id.clone();
        let tier = equipped.tier;
        let reduction = params.defend_reduction;

        let procs = match params.defend_chance {
            Some(chance) => world.rng.gen_bool(chance),
            None => true,
        };
        if !procs {
            return Ok(());
        }

        ctx.defense_coefficient = reduction;
        let actor_id = ctx
            .actor_id
            .clone()
            .ok_or_else(|| StageFailure::fatal("defense ran without an actor"))?;
        let target_id = ctx
            .target_id
            .clone()
            .ok_or_else(|| StageFailure::fatal("defense ran without a target"))?;
        ctx.events.push(BattleEvent {
            kind: EventKind::Defend,
            actor_id: target_id,
            target_id: Some(actor_id),
            skill_id: Some(skill_id),
            tier: Some(tier),
            hit: false,
            critical: false,
            damage: 0,
            damage_bucket: DamageBucket::None,
            reason: None,
        });
        Ok(())
    }
}
