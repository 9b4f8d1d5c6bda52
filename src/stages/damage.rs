//! S6 Damage Calc: rolls hit vs. `hit_chance`, then (on hit) applies
//! defense/evasion coefficients, rolls crit vs. `critical_chance`, and
//! buckets the result relative to the target's max HP.

use crate::context::StepContext;
use crate::pipeline::{EngineWorld, Stage, StageFailure, StageOutcome};
use crate::events::DamageBucket;

#[derive(Debug)]
pub struct DamageCalcStage;

impl Stage for DamageCalcStage {
    fn name(&self) -> &'static str {
        "damage_calc"
    }

    fn applicable(&self, ctx: &StepContext) -> bool {
        ctx.skill_id.is_some() && ctx.should_continue
    }

    fn run(&self, ctx: &mut StepContext, world: &mut EngineWorld) -> StageOutcome {
        let skill_id = ctx
            .skill_id
            .clone()
            .ok_or_else(|| StageFailure::fatal("damage calc ran without a chosen skill"))?;
        let tier = ctx
            .tier
            .ok_or_else(|| StageFailure::fatal("damage calc ran without a chosen tier"))?;
        let target_id = ctx
            .target_id
            .clone()
            .ok_or_else(|| StageFailure::fatal("damage calc ran without a target"))?;

        let params = world
            .catalog
            .get(&skill_id, tier)
            .ok_or_else(|| StageFailure::fatal(format!("unknown skill '{skill_id}' tier {tier}")))?;

        let hit = world.rng.gen_bool(params.hit_chance);
        if !hit {
            ctx.hit = Some(false);
            ctx.critical = Some(false);
            ctx.final_damage = Some(0);
            ctx.damage_bucket = Some(DamageBucket::None);
            return Ok(());
        }

        let target_max_hp = world
            .store
            .by_id(&target_id)
            .ok_or_else(|| StageFailure::fatal(format!("unknown target '{target_id}'")))?
            .stats
            .max_hp;

        let base = (params.base_damage as f64 * params.power_multiplier).round();
        let mut raw = base * ctx.defense_coefficient * ctx.evasion_multiplier;

        let critical = world.rng.gen_bool(params.critical_chance);
        if critical {
            raw *= world.crit_multiplier;
        }

        let final_damage = raw.round().max(0.0) as u32;

        ctx.hit = Some(true);
        ctx.critical = Some(critical);
        ctx.final_damage = Some(final_damage);
        ctx.damage_bucket = Some(DamageBucket::from_damage(final_damage, target_max_hp));
        Ok(())
    }
}
