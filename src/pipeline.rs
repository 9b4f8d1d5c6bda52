//! Resolution Pipeline (C7): an ordered list of stages, each owning one
//! resolution concern (C8).
//!
//! Grounded in the teacher's `CombatPlugin::build` system chain
//! (`combat/mod.rs`'s `.add_systems(Update, (a, b, c, ...).chain())`):
//! a fixed, explicitly ordered sequence of functions each touching a
//! well-scoped slice of state. Bevy's scheduler enforces that ordering via
//! `.chain()`; here `ResolutionPipeline::run` enforces it directly since
//! there is no ECS scheduler to delegate to.

use crate::catalog::SkillCatalog;
use crate::combatant::CombatantStore;
use crate::context::StepContext;
use crate::error::EngineError;
use crate::rng::RandomSource;
use crate::scheduler::AtbScheduler;

/// Shared mutable state every stage may touch. Bundled so `Stage::run`
/// doesn't need a dozen parameters; analogous to the teacher's ECS systems
/// each taking `Res`/`ResMut`/`Query` parameters for exactly the resources
/// they need.
pub struct EngineWorld<'a> {
    pub store: &'a mut CombatantStore,
    pub catalog: &'a SkillCatalog,
    pub rng: &'a mut RandomSource,
    pub scheduler: &'a AtbScheduler,
    pub crit_multiplier: f64,
}

/// Failure severity, per spec.md section 7.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    Fatal,
    Recoverable,
}

/// A stage-reported failure. Not an `EngineError` directly — stages report
/// in terms of their own severity, and the pipeline decides what that means
/// for `ctx.should_continue`/`ctx.errored`.
#[derive(Debug, Clone)]
pub struct StageFailure {
    pub class: FailureClass,
    pub reason: String,
}

impl StageFailure {
    pub fn fatal(reason: impl Into<String>) -> Self {
        Self {
            class: FailureClass::Fatal,
            reason: reason.into(),
        }
    }

    pub fn recoverable(reason: impl Into<String>) -> Self {
        Self {
            class: FailureClass::Recoverable,
            reason: reason.into(),
        }
    }

    /// Converts this stage-local failure into the typed taxonomy of
    /// `EngineError`, per spec.md section 7's `StageFatal`/`StageRecoverable`
    /// kinds. Used only for diagnostics (logging) — it never escapes
    /// `step()` as a hard `Err`.
    fn into_engine_error(self, stage: &'static str) -> EngineError {
        match self.class {
            FailureClass::Fatal => EngineError::StageFatal {
                stage,
                reason: self.reason,
            },
            FailureClass::Recoverable => EngineError::StageRecoverable {
                stage,
                reason: self.reason,
            },
        }
    }
}

pub type StageOutcome = Result<(), StageFailure>;

/// One resolution concern in the pipeline. A fixed vtable over the known
/// stage kinds (per spec.md section 9's "dynamic dispatch of stages" design
/// note), implemented via a trait object rather than a tagged enum since new
/// stages are an explicit extension point (`add_stage`/`remove_stage`).
pub trait Stage: Send + Sync {
    /// Stable name used for `remove_stage` and diagnostic logging.
    fn name(&self) -> &'static str;

    /// Whether this stage applies to the current context. Not consulted for
    /// a stage where `always_runs()` is `true`.
    fn applicable(&self, ctx: &StepContext) -> bool;

    /// Executes the stage, mutating `ctx` and/or `world`.
    fn run(&self, ctx: &mut StepContext, world: &mut EngineWorld) -> StageOutcome;

    /// `true` only for the event-emission stage (S8), which must run
    /// regardless of a prior abort (spec.md section 4.6).
    fn always_runs(&self) -> bool {
        false
    }
}

/// An ordered list of stages, orchestrating invocation, applicability
/// checks, and failure handling (spec.md section 4.6).
pub struct ResolutionPipeline {
    stages: Vec<Box<dyn Stage>>,
}

impl ResolutionPipeline {
    pub fn new(stages: Vec<Box<dyn Stage>>) -> Self {
        Self { stages }
    }

    /// Inserts a stage at `position` (end of the pipeline if `None`).
    pub fn add_stage(&mut self, stage: Box<dyn Stage>, position: Option<usize>) {
        match position {
            Some(pos) if pos <= self.stages.len() => self.stages.insert(pos, stage),
            _ => self.stages.push(stage),
        }
    }

    /// Removes the first stage matching `name`, if any.
    pub fn remove_stage(&mut self, name: &str) {
        self.stages.retain(|s| s.name() != name);
    }

    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    /// Runs every stage in order against `ctx`/`world`, per spec.md section
    /// 4.6's algorithm: stop on `should_continue == false` except for stages
    /// marked `always_runs`; a fatal failure marks the step errored and lets
    /// only those always-run stages continue; a recoverable failure is
    /// logged and the step continues.
    pub fn run(&self, ctx: &mut StepContext, world: &mut EngineWorld) {
        for stage in &self.stages {
            if !ctx.should_continue && !stage.always_runs() {
                continue;
            }
            if !stage.always_runs() && !stage.applicable(ctx) {
                continue;
            }
            match stage.run(ctx, world) {
                Ok(()) => {}
                Err(failure) => {
                    let class = failure.class;
                    let error = failure.into_engine_error(stage.name());
                    match class {
                        FailureClass::Fatal => {
                            log::warn!("{error}");
                            ctx.mark_errored();
                        }
                        FailureClass::Recoverable => {
                            log::debug!("{error}");
                        }
                    }
                    ctx.push_log(error.to_string());
                }
            }
        }
    }
}
