//! Cross-cutting invariants: determinism, resource non-negativity,
//! termination, faction-count monotonicity and narration purity.

use jianghu_engine::{
    AtbScheduler, Combatant, CombatantStore, EngineParams, EquippedSkill, Engine, RandomSource,
    SkillCatalog, SkillTier, Stats,
};

fn skill(base_damage: u32, hit_chance: f64, critical_chance: f64, qi_cost: u32) -> SkillTier {
    SkillTier {
        base_damage,
        power_multiplier: 1.0,
        hit_chance,
        critical_chance,
        qi_cost,
        cooldown: 1,
        tier_name: "初段".to_string(),
        narrative_template: "{actor} strikes {target}".to_string(),
        skill_type: "攻击".to_string(),
        defend_chance: None,
        defend_reduction: 0.0,
        partial_evade_chance: 0.0,
        partial_evade_multiplier: 0.5,
    }
}

fn make_engine(seed: u64) -> Engine {
    let mut catalog = SkillCatalog::new();
    catalog.insert("strike", 1, skill(7, 0.7, 0.2, 3)).unwrap();

    let mut store = CombatantStore::new();
    let combatants = [
        ("a", "red", 20, 9, 12),
        ("b", "blue", 18, 8, 9),
        ("c", "red", 15, 6, 15),
        ("d", "blue", 22, 10, 7),
    ];
    for (id, faction, hp, qi, agility) in combatants {
        store
            .insert(
                Combatant::new(
                    id,
                    id,
                    faction,
                    Stats {
                        hp,
                        max_hp: hp,
                        qi,
                        max_qi: qi,
                        strength: 0,
                        agility,
                        defense: 0,
                    },
                    vec![EquippedSkill {
                        skill_id: "strike".into(),
                        tier: 1,
                    }],
                )
                .unwrap(),
            )
            .unwrap();
    }

    let rng = RandomSource::from_seed(seed);
    let scheduler = AtbScheduler::new(100, 1.0).unwrap();
    Engine::new(store, catalog, rng, scheduler, EngineParams::default(), None).unwrap()
}

#[test]
fn determinism_same_seed_same_events() {
    let mut engine_a = make_engine(1234);
    let mut engine_b = make_engine(1234);

    let events_a = engine_a.run_to_completion();
    let events_b = engine_b.run_to_completion();

    assert_eq!(events_a.len(), events_b.len());
    for (ea, eb) in events_a.iter().zip(events_b.iter()) {
        assert_eq!(ea.kind, eb.kind);
        assert_eq!(ea.actor_id, eb.actor_id);
        assert_eq!(ea.target_id, eb.target_id);
        assert_eq!(ea.damage, eb.damage);
        assert_eq!(ea.hit, eb.hit);
        assert_eq!(ea.critical, eb.critical);
    }
}

#[test]
fn different_seeds_can_diverge() {
    let mut engine_a = make_engine(1);
    let mut engine_b = make_engine(2);
    let events_a = engine_a.run_to_completion();
    let events_b = engine_b.run_to_completion();
    // Not a strict inequality requirement, just documents that seeds are
    // actually threaded through: at minimum, both runs terminate cleanly.
    assert!(!events_a.is_empty());
    assert!(!events_b.is_empty());
}

#[test]
fn hp_and_qi_never_go_negative() {
    let mut engine = make_engine(77);
    engine.run_to_completion();
    for combatant in engine.store().all() {
        assert!(combatant.stats.hp <= combatant.stats.max_hp);
        assert!(combatant.stats.qi <= combatant.stats.max_qi);
        for cooldown in combatant.cooldowns.values() {
            assert!(*cooldown < u32::MAX);
        }
    }
}

#[test]
fn run_terminates_within_max_steps() {
    let mut engine = make_engine(99);
    engine.run_to_completion();
    assert!(engine.is_battle_over());
}

#[test]
fn factions_alive_is_monotone_non_increasing() {
    let mut engine = make_engine(55);
    let mut previous = engine.store().factions_alive().len();
    while !engine.is_battle_over() {
        engine.step();
        let current = engine.store().factions_alive().len();
        assert!(current <= previous);
        previous = current;
    }
}

#[test]
fn run_to_completion_is_idempotent_once_over() {
    let mut engine = make_engine(10);
    engine.run_to_completion();
    assert!(engine.is_battle_over());
    let extra = engine.run_to_completion();
    assert!(extra.is_empty());
}

#[test]
fn narration_mapping_is_pure_and_stable() {
    let mut engine = make_engine(321);
    let events = engine.run_to_completion();
    let Some(event) = events.first() else {
        return;
    };
    let first = engine.map_event_for_narration(event);
    let second = engine.map_event_for_narration(event);
    assert_eq!(first.narrative_type, second.narrative_type);
    assert_eq!(first.actor_name, second.actor_name);
    assert_eq!(first.damage_amount, second.damage_amount);
    assert_eq!(first.damage_bucket, second.damage_bucket);
}

#[test]
fn zero_hit_chance_never_reports_a_hit() {
    let mut catalog = SkillCatalog::new();
    catalog.insert("strike", 1, skill(10, 0.0, 0.0, 0)).unwrap();
    let mut store = CombatantStore::new();
    for (id, faction, agility) in [("a", "red", 10), ("b", "blue", 5)] {
        store
            .insert(
                Combatant::new(
                    id,
                    id,
                    faction,
                    Stats {
                        hp: 30,
                        max_hp: 30,
                        qi: 0,
                        max_qi: 0,
                        strength: 0,
                        agility,
                        defense: 0,
                    },
                    vec![EquippedSkill {
                        skill_id: "strike".into(),
                        tier: 1,
                    }],
                )
                .unwrap(),
            )
            .unwrap();
    }
    let rng = RandomSource::from_seed(5);
    let scheduler = AtbScheduler::new(100, 1.0).unwrap();
    let mut engine =
        Engine::new(store, catalog, rng, scheduler, EngineParams::default(), None).unwrap();
    for event in engine.run_to_completion() {
        assert!(!event.hit);
    }
}
