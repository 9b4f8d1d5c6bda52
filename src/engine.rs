//! Engine Facade (C9): drives `step()`/`run_to_completion()`, exposes the
//! event stream, the battle-over predicate, and the narration mapper.
//!
//! Grounded in the teacher's `headless::runner::run_headless_match` +
//! `HeadlessMatchState` (the thin shell that owns match lifecycle state and
//! exposes a `MatchResult`), generalized from "one Bevy `App::run()` call"
//! into an explicit, host-driven `step()`/`run_to_completion()` API with no
//! event loop of its own — spec.md section 5 requires no suspension points
//! and no scheduling model beyond "the host calls `step()`".

use std::collections::HashSet;

use crate::catalog::SkillCatalog;
use crate::combatant::CombatantStore;
use crate::context::StepContext;
use crate::error::{EngineError, EngineResult};
use crate::events::{narrative_type_for, BattleEvent, NarrationContext};
use crate::pipeline::{EngineWorld, ResolutionPipeline, Stage};
use crate::rng::RandomSource;
use crate::scheduler::AtbScheduler;
use crate::stages::default_stages;

const DEFAULT_MAX_STEPS: u32 = 100_000;

/// Configuration knobs beyond the combatant roster and catalog, per spec.md
/// section 6's "Config data" contract.
#[derive(Debug, Clone, Copy)]
pub struct EngineParams {
    pub crit_multiplier: f64,
    pub max_steps: u32,
}

impl Default for EngineParams {
    fn default() -> Self {
        Self {
            crit_multiplier: 1.5,
            max_steps: DEFAULT_MAX_STEPS,
        }
    }
}

/// Why `is_battle_over()` became true, surfaced for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattleOverReason {
    FactionsExhausted,
    Stuck,
    MaxStepsReached,
}

pub struct Engine {
    store: CombatantStore,
    catalog: SkillCatalog,
    rng: RandomSource,
    scheduler: AtbScheduler,
    pipeline: ResolutionPipeline,
    crit_multiplier: f64,
    max_steps: u32,
    step_index: u32,
    events: Vec<BattleEvent>,
    stuck: bool,
}

impl Engine {
    /// Builds an engine from its collaborators. `pipeline` defaults to the
    /// standard S1..S8 order of spec.md section 4.6 when `None`.
    ///
    /// The action selector named in spec.md section 6's constructor
    /// signature is stateless (it carries no configuration of its own) and
    /// is instantiated fresh inside the decision stage rather than threaded
    /// through here — see `DESIGN.md`.
    pub fn new(
        store: CombatantStore,
        catalog: SkillCatalog,
        rng: RandomSource,
        scheduler: AtbScheduler,
        params: EngineParams,
        pipeline: Option<ResolutionPipeline>,
    ) -> EngineResult<Self> {
        let factions: HashSet<_> = store.all().map(|c| c.faction.clone()).collect();
        if factions.len() < 2 {
            return Err(EngineError::InvalidData(
                "at least two distinct factions are required to start a battle".to_string(),
            ));
        }
        Ok(Self {
            store,
            catalog,
            rng,
            scheduler,
            pipeline: pipeline.unwrap_or_else(|| ResolutionPipeline::new(default_stages())),
            crit_multiplier: params.crit_multiplier,
            max_steps: params.max_steps,
            step_index: 0,
            events: Vec::new(),
            stuck: false,
        })
    }

    /// Inserts an additional stage into the pipeline, per spec.md section 6.
    pub fn add_stage(&mut self, stage: Box<dyn Stage>, position: Option<usize>) {
        self.pipeline.add_stage(stage, position);
    }

    /// Removes a stage by name, per spec.md section 6.
    pub fn remove_stage(&mut self, name: &str) {
        self.pipeline.remove_stage(name);
    }

    /// Executes one pipeline pass and returns the events generated by this
    /// step (empty if the battle is already over).
    pub fn step(&mut self) -> &[BattleEvent] {
        if self.is_battle_over() {
            return &[];
        }
        let mut ctx = StepContext::new();
        let mut world = EngineWorld {
            store: &mut self.store,
            catalog: &self.catalog,
            rng: &mut self.rng,
            scheduler: &self.scheduler,
            crit_multiplier: self.crit_multiplier,
        };
        self.pipeline.run(&mut ctx, &mut world);

        if ctx.scheduler_stuck {
            self.stuck = true;
        }
        self.step_index += 1;

        let start = self.events.len();
        self.events.extend(ctx.events);
        &self.events[start..]
    }

    /// `true` when at most one faction retains living members, the
    /// scheduler got stuck, or the configured step bound was reached.
    pub fn is_battle_over(&self) -> bool {
        self.battle_over_reason().is_some()
    }

    pub fn battle_over_reason(&self) -> Option<BattleOverReason> {
        if self.stuck {
            return Some(BattleOverReason::Stuck);
        }
        if self.store.factions_alive().len() <= 1 {
            return Some(BattleOverReason::FactionsExhausted);
        }
        if self.step_index >= self.max_steps {
            return Some(BattleOverReason::MaxStepsReached);
        }
        None
    }

    /// Repeatedly calls `step()` until `is_battle_over()`, returning every
    /// event produced. Idempotent on an already-terminated engine (returns
    /// an empty vector).
    pub fn run_to_completion(&mut self) -> Vec<BattleEvent> {
        let mut produced = Vec::new();
        while !self.is_battle_over() {
            let before = self.events.len();
            self.step();
            produced.extend(self.events[before..].iter().cloned());
        }
        produced
    }

    /// The full event log accumulated so far.
    pub fn events(&self) -> &[BattleEvent] {
        &self.events
    }

    pub fn current_step_index(&self) -> u32 {
        self.step_index
    }

    pub fn store(&self) -> &CombatantStore {
        &self.store
    }

    /// Maps a `BattleEvent` to the plain record a narration collaborator
    /// needs, per spec.md section 4.7. Pure function of `event` and the
    /// catalog/store: calling it twice for the same event yields equal
    /// records.
    pub fn map_event_for_narration(&self, event: &BattleEvent) -> NarrationContext {
        let actor_name = self
            .store
            .by_id(&event.actor_id)
            .map(|c| c.display_name.clone())
            .unwrap_or_else(|| event.actor_id.to_string());
        let target_name = event
            .target_id
            .as_ref()
            .and_then(|id| self.store.by_id(id))
            .map(|c| c.display_name.clone());
        let tier_params = event
            .skill_id
            .as_ref()
            .zip(event.tier)
            .and_then(|(skill_id, tier)| self.catalog.get(skill_id, tier));

        let narrative_type = if event.critical {
            "暴击"
        } else {
            narrative_type_for(event.kind)
        };

        NarrationContext {
            narrative_type,
            actor_name,
            target_name,
            skill_name: event.skill_id.clone(),
            tier_name: tier_params.map(|p| p.tier_name.clone()),
            hit: event.hit,
            critical: event.critical,
            damage_amount: event.damage,
            damage_bucket: event.damage_bucket.as_str(),
            tier_narrative_template: tier_params.map(|p| p.narrative_template.clone()),
        }
    }
}
