//! jianghu-engine - deterministic turn scheduling and action resolution
//! for a wuxia tactical combat simulator.
//!
//! The engine owns no event loop: a host repeatedly calls [`engine::Engine::step`]
//! or [`engine::Engine::run_to_completion`] and reads back the event log.

pub mod catalog;
pub mod cli;
pub mod combatant;
pub mod config;
pub mod context;
pub mod engine;
pub mod error;
pub mod events;
pub mod pipeline;
pub mod rng;
pub mod scheduler;
pub mod selector;
pub mod stages;

pub use catalog::{SkillCatalog, SkillKey, SkillTier};
pub use combatant::{Combatant, CombatantId, CombatantStore, EquippedSkill, Faction, Stats};
pub use config::RunConfig;
pub use engine::{BattleOverReason, Engine, EngineParams};
pub use error::{EngineError, EngineResult};
pub use events::{BattleEvent, DamageBucket, EventKind, NarrationContext};
pub use pipeline::{ResolutionPipeline, Stage, StageFailure, StageOutcome};
pub use rng::RandomSource;
pub use scheduler::AtbScheduler;
pub use selector::{ActionSelector, ChosenAction};
