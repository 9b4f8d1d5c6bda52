//! Binary entry point: loads a config file, runs one battle to completion,
//! and prints either the raw event log or a narrated transcript.

use std::process::ExitCode;

use jianghu_engine::cli::{parse_args, Args};
use jianghu_engine::config::RunConfig;
use jianghu_engine::events::EventKind;

fn main() -> ExitCode {
    env_logger::init();
    let args = parse_args();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            log::error!("{message}");
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), String> {
    let config = RunConfig::load_from_file(&args.config).map_err(|err| err.to_string())?;
    let mut engine = config.build_engine().map_err(|err| err.to_string())?;

    let events = engine.run_to_completion();
    log::info!(
        "battle finished after {} steps ({} events), reason: {:?}",
        engine.current_step_index(),
        events.len(),
        engine.battle_over_reason()
    );

    let limit = if args.max_events == 0 {
        events.len()
    } else {
        args.max_events as usize
    };

    for event in events.iter().take(limit) {
        if args.narrate {
            let narration = engine.map_event_for_narration(event);
            println!(
                "[{}] {} -> {}: {} ({})",
                narration.narrative_type,
                narration.actor_name,
                narration.target_name.as_deref().unwrap_or("-"),
                narration.skill_name.as_deref().unwrap_or("-"),
                narration.damage_bucket
            );
        } else {
            let kind = match event.kind {
                EventKind::Attack => "ATTACK",
                EventKind::Dodge => "DODGE",
                EventKind::Defend => "DEFEND",
                EventKind::Defeat => "DEFEAT",
                EventKind::Noop => "NOOP",
            };
            println!(
                "{kind} actor={} target={:?} skill={:?} hit={} crit={} damage={}",
                event.actor_id,
                event.target_id.as_ref().map(|t| t.to_string()),
                event.skill_id,
                event.hit,
                event.critical,
                event.damage
            );
        }
    }

    Ok(())
}
