//! Turn loop behaviour driven through the public engine API

use battle_core::combat::BattleEvent;
use battle_core::config::OpponentDefinition;
use battle_core::rng::{unit_for_int, ScriptedDice};
use battle_core::skill::{BattleSkillEffects, LearnedSkill, SkillDefinition, SkillEffectKind, SkillType};
use battle_core::status::{StatusApplication, StatusEffectType};
use battle_core::{
    ActionError, ActionId, BattleEngine, BattleError, BattleOutcome, BattleState, CombatantStats,
    OpponentStats, PassiveKind, PlayerLoadout, Rarity, Side,
};

fn dummy() -> OpponentDefinition {
    OpponentDefinition::new("Training Dummy", Rarity::Common, CombatantStats::new(500, 30, 20))
        .in_zone("verdant_outskirts")
}

fn skill(id: &str, skill_type: SkillType, effect_kind: SkillEffectKind) -> LearnedSkill {
    LearnedSkill::new(
        SkillDefinition {
            id: id.to_string(),
            name: id.to_string(),
            description: String::new(),
            skill_type,
            effect_kind,
            base_effect: 20.0,
            effect_per_level: 0.0,
            cooldown: None,
        },
        1,
    )
}

fn start(engine: &BattleEngine, skills: BattleSkillEffects, beast: CombatantStats) -> BattleState {
    let loadout = PlayerLoadout::new("hero", 10, CombatantStats::new(200, 50, 10)).with_skills(skills);
    let mut dice = ScriptedDice::default();
    engine
        .initialize_battle(loadout, &dummy(), Some(OpponentStats::fixed(beast)), &mut dice)
        .unwrap()
}

fn beast_attacks(report: &battle_core::TurnReport) -> usize {
    report
        .events
        .iter()
        .filter(|r| r.actor == Side::Beast && matches!(r.event, BattleEvent::Attack { .. }))
        .count()
}

#[test]
fn initialize_starts_fresh() {
    let engine = BattleEngine::default();
    let state = start(&engine, BattleSkillEffects::default(), CombatantStats::new(500, 30, 20));

    assert_eq!(state.current_round, 1);
    assert_eq!(state.player.hp, 200);
    assert_eq!(state.beast.hp, 500);
    assert_eq!(state.resources.energy, 100);
    assert_eq!(state.resources.ultimate_progress, 0);
    assert!(!state.is_complete());
    assert!(!state.player_won() && !state.beast_won());
    assert_eq!(state.zone_id, "verdant_outskirts");
}

#[test]
fn initialize_rolls_stats_from_zone() {
    let engine = BattleEngine::default();
    let loadout = PlayerLoadout::new("hero", 3, CombatantStats::new(200, 50, 10));
    let mut dice = ScriptedDice::new([0.0]);
    let state = engine
        .initialize_battle(loadout, &dummy(), None, &mut dice)
        .unwrap();

    // (1 + 0.3) × 0.2 = 0.26
    assert_eq!(state.beast.hp, 130);
    assert!(!state.is_sparkling());
    assert_eq!(dice.consumed(), 1);
}

#[test]
fn initialize_unknown_zone_fails_only_when_rolling() {
    let engine = BattleEngine::default();
    let lost = dummy().in_zone("nowhere");
    let loadout = PlayerLoadout::new("hero", 3, CombatantStats::new(200, 50, 10));
    let mut dice = ScriptedDice::default();

    assert_eq!(
        engine
            .initialize_battle(loadout.clone(), &lost, None, &mut dice)
            .unwrap_err(),
        BattleError::UnknownZone("nowhere".to_string())
    );
    assert!(engine
        .initialize_battle(loadout, &lost, Some(OpponentStats::fixed(lost.base)), &mut dice)
        .is_ok());
}

#[test]
fn attack_damage_is_difference_plus_variance() {
    let engine = BattleEngine::default();
    for variance in 1..=3 {
        let mut state = start(&engine, BattleSkillEffects::default(), CombatantStats::new(500, 30, 20));
        // no dodge, variance, no crit; the counter-turn uses the fallback
        let mut dice = ScriptedDice::new([0.5, unit_for_int(1, 3, variance), 0.5]);

        let report = engine
            .submit_action(&mut state, &ActionId::Attack, &mut dice)
            .unwrap();

        assert_eq!(report.action.damage_dealt, 30 + variance);
        assert_eq!(state.beast.hp, 500 - 30 - variance);
        // 30 × 1.05 rage = 31, 31 - 10 + 3
        assert_eq!(state.player.hp, 176);
        assert_eq!(state.current_round, 2);
    }
}

#[test]
fn lethal_attack_skips_counter_turn() {
    let engine = BattleEngine::default();
    let mut state = start(&engine, BattleSkillEffects::default(), CombatantStats::new(10, 30, 20));
    let mut dice = ScriptedDice::new([0.5, 0.5, 0.5]);

    let report = engine
        .submit_action(&mut state, &ActionId::Attack, &mut dice)
        .unwrap();

    assert_eq!(report.outcome, BattleOutcome::PlayerWon);
    assert!(state.player_won());
    assert!(!state.beast_won());
    assert_eq!(state.beast.hp, 0);
    assert_eq!(state.player.hp, 200);
    assert_eq!(state.current_round, 1);
    assert_eq!(beast_attacks(&report), 0);
    assert!(matches!(
        report.events.last().map(|r| &r.event),
        Some(BattleEvent::Victory { winner: Side::Player })
    ));
}

#[test]
fn completed_battle_rejects_actions() {
    let engine = BattleEngine::default();
    let mut state = start(&engine, BattleSkillEffects::default(), CombatantStats::new(10, 30, 20));
    let mut dice = ScriptedDice::new([0.5, 0.5, 0.5]);
    engine
        .submit_action(&mut state, &ActionId::Attack, &mut dice)
        .unwrap();

    let before = state.clone();
    assert_eq!(
        engine.submit_action(&mut state, &ActionId::Attack, &mut dice),
        Err(BattleError::BattleComplete)
    );
    assert_eq!(state, before);
}

#[test]
fn stunned_beast_skips_its_turns() {
    let engine = BattleEngine::default();
    let mut state = start(&engine, BattleSkillEffects::default(), CombatantStats::new(500, 30, 20));

    // defend stun roll succeeds: two skipped opponent turns
    let mut dice = ScriptedDice::new([0.05]);
    let report = engine
        .submit_action(&mut state, &ActionId::Defend, &mut dice)
        .unwrap();
    assert!(report
        .events
        .iter()
        .any(|r| r.event == BattleEvent::Stunned { remaining: 1 }));
    assert_eq!(state.player.hp, 200);

    let mut dice = ScriptedDice::new([0.5, 0.5, 0.5]);
    let report = engine
        .submit_action(&mut state, &ActionId::Attack, &mut dice)
        .unwrap();
    assert_eq!(beast_attacks(&report), 0);
    assert_eq!(state.beast_stunned, 0);
    assert_eq!(state.player.hp, 200);

    let mut dice = ScriptedDice::new([0.5, 0.5, 0.5]);
    let report = engine
        .submit_action(&mut state, &ActionId::Attack, &mut dice)
        .unwrap();
    assert_eq!(beast_attacks(&report), 1);
    assert!(state.player.hp < 200);
}

#[test]
fn second_special_within_cooldown_is_blocked() {
    let engine = BattleEngine::default();
    let mut state = start(&engine, BattleSkillEffects::default(), CombatantStats::new(2000, 30, 20));

    let mut dice = ScriptedDice::new([0.1, 0.5, 0.5]);
    let first = engine
        .submit_action(&mut state, &ActionId::Special, &mut dice)
        .unwrap();
    assert!(first.action.damage_dealt > 0);
    let beast_hp = state.beast.hp;

    let mut dice = ScriptedDice::default();
    let second = engine
        .submit_action(&mut state, &ActionId::Special, &mut dice)
        .unwrap();
    assert_eq!(state.beast.hp, beast_hp);
    assert!(second.events.iter().any(|r| matches!(
        &r.event,
        BattleEvent::Blocked { action, reason, .. } if action == "special" && reason == "cooldown"
    )));
    assert_eq!(beast_attacks(&second), 1);
    assert_eq!(state.stats.blocked_actions, 1);
    assert_eq!(state.current_round, 3);

    let mut dice = ScriptedDice::new([0.1, 0.5, 0.5]);
    let third = engine
        .submit_action(&mut state, &ActionId::Special, &mut dice)
        .unwrap();
    assert!(third.action.damage_dealt > 0);
}

#[test]
fn defend_streak_survives_skills() {
    let engine = BattleEngine::default();
    let skills = BattleSkillEffects::from_learned([skill(
        "second_wind",
        SkillType::Active,
        SkillEffectKind::Heal,
    )]);
    let mut state = start(&engine, skills, CombatantStats::new(500, 30, 20));
    let mut dice = ScriptedDice::default();

    let sequence = [
        ActionId::Defend,
        ActionId::Defend,
        ActionId::skill("second_wind"),
        ActionId::skill("second_wind"),
        ActionId::Defend,
    ];
    let mut factors = Vec::new();
    for action in &sequence {
        let report = engine.submit_action(&mut state, action, &mut dice).unwrap();
        for record in &report.events {
            if let BattleEvent::Defend { damage_factor, .. } = record.event {
                factors.push(damage_factor);
            }
        }
    }

    let expected = [0.7, 0.6, 0.5];
    assert_eq!(factors.len(), expected.len());
    for (got, want) in factors.iter().zip(expected) {
        assert!((got - want).abs() < 1e-9, "{} != {}", got, want);
    }
    assert_eq!(state.resources.consecutive_defends, 3);
    assert_eq!(state.stats.blocked_actions, 1);
}

#[test]
fn attack_breaks_defend_streak() {
    let engine = BattleEngine::default();
    let mut state = start(&engine, BattleSkillEffects::default(), CombatantStats::new(500, 30, 20));
    let mut dice = ScriptedDice::default();

    engine.submit_action(&mut state, &ActionId::Defend, &mut dice).unwrap();
    assert_eq!(state.resources.consecutive_defends, 1);
    engine.submit_action(&mut state, &ActionId::Attack, &mut dice).unwrap();
    assert_eq!(state.resources.consecutive_defends, 0);
}

#[test]
fn every_non_terminal_call_advances_one_round() {
    let engine = BattleEngine::default();
    let skills = BattleSkillEffects::from_learned([skill(
        "keen_eye",
        SkillType::Passive,
        SkillEffectKind::Passive {
            bonus: PassiveKind::CriticalChance,
        },
    )]);
    let mut state = start(&engine, skills, CombatantStats::new(5000, 10, 20));
    let mut dice = ScriptedDice::default();

    let actions = [
        ActionId::Ultimate,
        ActionId::skill("keen_eye"),
        ActionId::skill("unknown"),
        ActionId::Special,
        ActionId::Special,
        ActionId::Defend,
        ActionId::Defend,
        ActionId::Attack,
    ];
    for (index, action) in actions.iter().enumerate() {
        let report = engine.submit_action(&mut state, action, &mut dice).unwrap();
        assert_eq!(report.round, index as u32 + 1);
        assert_eq!(state.current_round, index as u32 + 2);
    }
}

#[test]
fn unknown_skill_falls_back_to_attack() {
    let engine = BattleEngine::default();
    let mut state = start(&engine, BattleSkillEffects::default(), CombatantStats::new(500, 30, 20));
    let mut dice = ScriptedDice::new([0.5, 0.5, 0.5]);

    let report = engine
        .submit_named_action(&mut state, "skill:meteor", &mut dice)
        .unwrap();

    assert_eq!(
        report.events[0].event,
        BattleEvent::Fallback {
            requested: "meteor".to_string()
        }
    );
    assert!(report.action.damage_dealt > 0);
    assert_eq!(state.stats.blocked_actions, 0);
}

#[test]
fn passive_skill_is_blocked() {
    let engine = BattleEngine::default();
    let skills = BattleSkillEffects::from_learned([skill(
        "iron_skin",
        SkillType::Passive,
        SkillEffectKind::Passive {
            bonus: PassiveKind::DamageReduction,
        },
    )]);
    let mut state = start(&engine, skills, CombatantStats::new(500, 30, 20));
    let mut dice = ScriptedDice::default();

    let report = engine
        .submit_action(&mut state, &ActionId::skill("iron_skin"), &mut dice)
        .unwrap();
    assert!(report.events.iter().any(|r| matches!(
        &r.event,
        BattleEvent::Blocked { reason, .. } if reason == "not_usable"
    )));
    assert_eq!(state.beast.hp, 500);
}

#[test]
fn invalid_action_name() {
    let engine = BattleEngine::default();
    let mut state = start(&engine, BattleSkillEffects::default(), CombatantStats::new(500, 30, 20));
    let mut dice = ScriptedDice::default();

    assert!(matches!(
        engine.submit_named_action(&mut state, "dance", &mut dice),
        Err(BattleError::InvalidAction(_))
    ));
    assert_eq!(state.current_round, 1);
}

#[test]
fn status_tick_can_end_battle_before_dispatch() {
    let engine = BattleEngine::default();
    let mut state = start(&engine, BattleSkillEffects::default(), CombatantStats::new(8, 30, 20));
    state
        .beast
        .apply_status(&StatusApplication::dot(StatusEffectType::Burn, 10, 3));
    let mut dice = ScriptedDice::default();

    let report = engine
        .submit_action(&mut state, &ActionId::Attack, &mut dice)
        .unwrap();

    assert!(state.player_won());
    assert_eq!(state.current_round, 1);
    assert_eq!(dice.consumed(), 0);
    assert_eq!(
        report.events[0].event,
        BattleEvent::StatusTick {
            effect: StatusEffectType::Burn,
            damage: 8
        }
    );
    assert_eq!(state.stats.damage_dealt, 8);
}

#[test]
fn ultimate_charges_after_ten_actions() {
    let engine = BattleEngine::default();
    let mut state = start(&engine, BattleSkillEffects::default(), CombatantStats::new(100_000, 10, 20));
    let mut dice = ScriptedDice::default();

    for _ in 0..9 {
        engine.submit_action(&mut state, &ActionId::Attack, &mut dice).unwrap();
        assert!(!state.resources.ultimate_ready);
    }
    assert!(!engine.usable_actions(&state).is_empty());
    assert!(engine.usable_actions(&state).contains(&ActionId::Ultimate));

    let report = engine
        .submit_action(&mut state, &ActionId::Ultimate, &mut dice)
        .unwrap();
    assert!(report.action.damage_dealt > 0);
    assert_eq!(state.resources.ultimate_progress, 0);
}

#[test]
fn usable_actions_track_gates() {
    let engine = BattleEngine::default();
    let mut state = start(&engine, BattleSkillEffects::default(), CombatantStats::new(5000, 30, 20));
    let mut dice = ScriptedDice::new([0.1, 0.5, 0.5]);

    engine.submit_action(&mut state, &ActionId::Special, &mut dice).unwrap();
    let usable = engine.usable_actions(&state);
    assert!(usable.contains(&ActionId::Attack));
    assert!(usable.contains(&ActionId::Defend));
    assert!(!usable.contains(&ActionId::Special));
    assert!(!usable.contains(&ActionId::Ultimate));
}

#[test]
fn list_available_actions_skips_passives() {
    let engine = BattleEngine::default();
    let equipped = [
        engine.skills().learn("cleave", 2).unwrap(),
        engine.skills().learn("iron_skin", 1).unwrap(),
        engine.skills().learn("starfall", 1).unwrap(),
    ];

    let ids: Vec<String> = engine
        .list_available_actions(&equipped)
        .iter()
        .map(|d| d.id.to_string())
        .collect();
    assert_eq!(
        ids,
        vec!["attack", "defend", "special", "ultimate", "skill:cleave", "skill:starfall"]
    );
}

#[test]
fn blocked_actions_keep_resources() {
    let engine = BattleEngine::default();
    let mut state = start(&engine, BattleSkillEffects::default(), CombatantStats::new(5000, 30, 20));
    state.resources.energy = 10;
    let mut dice = ScriptedDice::default();

    let report = engine
        .submit_action(&mut state, &ActionId::Special, &mut dice)
        .unwrap();
    assert_eq!(state.resources.energy, 15);
    assert!(report.events.iter().any(|r| matches!(
        &r.event,
        BattleEvent::Blocked { reason, .. } if reason == ActionError::InsufficientEnergy { required: 30, available: 15 }.reason()
    )));
}

#[test]
fn battle_state_round_trips_through_json() {
    let engine = BattleEngine::default();
    let mut state = start(&engine, BattleSkillEffects::default(), CombatantStats::new(500, 30, 20));
    let mut dice = ScriptedDice::new([0.5, 0.5, 0.5]);
    engine.submit_action(&mut state, &ActionId::Attack, &mut dice).unwrap();

    let json = serde_json::to_string(&state).unwrap();
    let back: BattleState = serde_json::from_str(&json).unwrap();
    assert_eq!(back, state);
}
