//! Player action handlers
//!
//! Each handler validates every requirement before paying any cost, so a
//! refused action leaves resources untouched.

use super::attack::resolve_attack;
use super::record::BattleEvent;
use super::ActionOutcome;
use crate::battle::BattleState;
use crate::config::{BattleConstants, StatusConstants};
use crate::error::ActionError;
use crate::modifier::{self, floor_amount, weapon, PassiveKind};
use crate::rng::Dice;
use crate::skill::{LearnedSkill, SkillEffectKind, SkillType};
use crate::status::{StatusApplication, StatusEffectType};
use crate::types::Side;

/// Basic attack with passive and weapon extras
///
/// Never refused.
pub fn attack(
    state: &mut BattleState,
    constants: &BattleConstants,
    dice: &mut impl Dice,
) -> Result<ActionOutcome, ActionError> {
    let profile = modifier::player_attack_profile(
        state.player.stats.attack,
        state.beast.stats.defense,
        &state.skill_effects.passive_bonuses,
        &state.weapon_effects,
        &constants.attack,
    );
    let roll = resolve_attack(&profile, &constants.attack, dice);

    if roll.dodged {
        state.log(
            Side::Player,
            BattleEvent::Attack {
                damage: 0,
                critical: false,
                dodged: true,
                bonus_damage: 0,
                healed: 0,
                damage_factor: None,
            },
        );
        return Ok(ActionOutcome::default());
    }

    if roll.critical {
        state.stats.critical_hits += 1;
    }

    let passive_bonus = floor_amount(
        state
            .skill_effects
            .passive_bonuses
            .get(PassiveKind::BonusDamage),
    )
    .max(0);
    let hit = roll.damage + passive_bonus;
    let on_hit = weapon::roll_on_hit(&state.weapon_effects, hit, dice);

    let dealt = state.beast.take_damage(hit + on_hit.extra_damage());
    state.stats.damage_dealt += dealt;

    let healed = state.player.heal(on_hit.life_steal);
    state.stats.healing_done += healed;

    state.log(
        Side::Player,
        BattleEvent::Attack {
            damage: dealt,
            critical: roll.critical,
            dodged: false,
            bonus_damage: passive_bonus + on_hit.extra_damage(),
            healed,
            damage_factor: None,
        },
    );

    for application in &on_hit.applications {
        apply_to_beast(state, application);
    }

    Ok(ActionOutcome::damage(dealt))
}

/// Brace for the counter-attack
///
/// Consecutive defends reduce incoming damage further but put defend on a
/// growing cooldown.
pub fn defend(
    state: &mut BattleState,
    constants: &BattleConstants,
    dice: &mut impl Dice,
) -> Result<ActionOutcome, ActionError> {
    state.resources.check_defend()?;

    let streak = state.resources.record_defend(&constants.resources);

    let stunned = dice.chance(constants.defend.stun_chance(streak));
    if stunned {
        state.beast_stunned = state.beast_stunned.max(constants.defend.stun_rounds);
    }

    let heal_percent = state
        .skill_effects
        .passive_bonuses
        .get(PassiveKind::DefendHeal);
    let healed = if heal_percent > 0.0 {
        let amount = floor_amount(state.player.max_hp as f64 * heal_percent / 100.0);
        state.player.heal(amount)
    } else {
        0
    };
    state.stats.healing_done += healed;

    let damage_factor = constants.defend.damage_factor(streak);
    state.log(
        Side::Player,
        BattleEvent::Defend {
            streak,
            damage_factor,
            stunned,
            healed,
        },
    );

    Ok(ActionOutcome {
        damage_dealt: 0,
        damage_factor: Some(damage_factor),
    })
}

/// Energy-costed heavy strike; always lands on a stunned opponent
pub fn special(
    state: &mut BattleState,
    constants: &BattleConstants,
    dice: &mut impl Dice,
) -> Result<ActionOutcome, ActionError> {
    let cost = constants.resources.energy_cost;
    state.resources.check_special()?;
    state.resources.spend_energy(cost)?;
    state.resources.action_cooldowns.special = constants.resources.special_cooldown;

    let hit = state.beast_stunned > 0 || dice.chance(constants.special.accuracy);
    if !hit {
        state.log(Side::Player, BattleEvent::Special { hit: false, damage: 0 });
        return Ok(ActionOutcome::default());
    }

    let diff = clamped_difference(state);
    let multiplier = dice.uniform(constants.special.min_multiplier, constants.special.max_multiplier);
    let bonus = dice.int_inclusive(0, constants.special.max_bonus);
    let damage = floor_amount(diff as f64 * multiplier + bonus as f64);

    let dealt = state.beast.take_damage(damage);
    state.stats.damage_dealt += dealt;
    state.log(Side::Player, BattleEvent::Special { hit: true, damage: dealt });

    Ok(ActionOutcome::damage(dealt))
}

/// Spend the full ultimate charge on a guaranteed hit
pub fn ultimate(
    state: &mut BattleState,
    constants: &BattleConstants,
    dice: &mut impl Dice,
) -> Result<ActionOutcome, ActionError> {
    state.resources.consume_ultimate()?;

    let diff = clamped_difference(state);
    let multiplier = dice.uniform(
        constants.ultimate.min_multiplier,
        constants.ultimate.max_multiplier,
    );
    let bonus = dice.int_inclusive(0, constants.ultimate.max_bonus);
    let damage = floor_amount(diff as f64 * multiplier + bonus as f64);

    let dealt = state.beast.take_damage(damage);
    state.stats.damage_dealt += dealt;
    state.log(Side::Player, BattleEvent::Ultimate { damage: dealt });

    Ok(ActionOutcome::damage(dealt))
}

/// Use an equipped active or ultimate skill
///
/// Unknown ids return [`ActionError::UnknownSkill`] so the turn loop can fall
/// back to a basic attack. Skills never draw from the dice.
pub fn use_skill(
    state: &mut BattleState,
    skill_id: &str,
    constants: &BattleConstants,
) -> Result<ActionOutcome, ActionError> {
    if state.skill_effects.is_passive(skill_id) {
        return Err(ActionError::NotUsable(skill_id.to_string()));
    }
    let learned = state
        .skill_effects
        .find(skill_id)
        .cloned()
        .ok_or_else(|| ActionError::UnknownSkill(skill_id.to_string()))?;
    if matches!(learned.skill.effect_kind, SkillEffectKind::Passive { .. }) {
        return Err(ActionError::NotUsable(skill_id.to_string()));
    }

    // Validate everything before paying
    state.resources.check_skill(skill_id)?;
    match learned.skill.skill_type {
        SkillType::Active => state.resources.check_energy(constants.resources.energy_cost)?,
        SkillType::Ultimate => state.resources.check_ultimate()?,
        SkillType::Passive => return Err(ActionError::NotUsable(skill_id.to_string())),
    }

    match learned.skill.skill_type {
        SkillType::Active => state.resources.spend_energy(constants.resources.energy_cost)?,
        SkillType::Ultimate => state.resources.consume_ultimate()?,
        SkillType::Passive => {}
    }
    let cooldown = learned
        .skill
        .cooldown
        .unwrap_or(constants.resources.default_skill_cooldown);
    state.resources.start_skill_cooldown(skill_id, cooldown);

    resolve_skill_effect(state, &learned, constants)
}

fn resolve_skill_effect(
    state: &mut BattleState,
    learned: &LearnedSkill,
    constants: &BattleConstants,
) -> Result<ActionOutcome, ActionError> {
    let magnitude = learned.magnitude();
    let skill_id = learned.id().to_string();

    match learned.skill.effect_kind {
        SkillEffectKind::Heal => {
            let amount = floor_amount(state.player.max_hp as f64 * magnitude / 100.0);
            let healed = state.player.heal(amount);
            state.stats.healing_done += healed;
            state.log(
                Side::Player,
                BattleEvent::Skill {
                    skill_id,
                    damage: 0,
                    healed,
                    status: None,
                },
            );
            Ok(ActionOutcome::default())
        }
        SkillEffectKind::Status { effect } => {
            let application = skill_status(state, effect, magnitude, constants);
            state.log(
                Side::Player,
                BattleEvent::Skill {
                    skill_id,
                    damage: 0,
                    healed: 0,
                    status: Some(effect),
                },
            );
            if effect.targets_self() {
                state.player.apply_status(&application);
                state.log(
                    Side::Player,
                    BattleEvent::StatusApplied {
                        effect,
                        duration: application.duration,
                        target: Side::Player,
                    },
                );
            } else {
                apply_to_beast(state, &application);
            }
            Ok(ActionOutcome::default())
        }
        SkillEffectKind::Damage => {
            let diff = clamped_difference(state);
            let damage = diff + floor_amount(diff as f64 * magnitude / 100.0);
            let dealt = state.beast.take_damage(damage);
            state.stats.damage_dealt += dealt;
            state.log(
                Side::Player,
                BattleEvent::Skill {
                    skill_id,
                    damage: dealt,
                    healed: 0,
                    status: None,
                },
            );
            Ok(ActionOutcome::damage(dealt))
        }
        SkillEffectKind::Passive { .. } => Err(ActionError::NotUsable(skill_id)),
    }
}

/// Build the ledger entry a status skill places
fn skill_status(
    state: &BattleState,
    effect: StatusEffectType,
    magnitude: f64,
    constants: &BattleConstants,
) -> StatusApplication {
    let durations: &StatusConstants = &constants.status;
    match effect {
        StatusEffectType::Burn | StatusEffectType::Poison | StatusEffectType::Bleed => {
            let attack = modifier::player_attack_value(
                state.player.stats.attack,
                &state.skill_effects.passive_bonuses,
            );
            let damage = floor_amount(attack as f64 * magnitude / 100.0).max(1);
            StatusApplication::dot(effect, damage, durations.dot_duration)
        }
        StatusEffectType::Freeze | StatusEffectType::Stun => {
            StatusApplication::control(effect, durations.control_duration)
        }
        StatusEffectType::Slow => {
            StatusApplication::slow((magnitude / 100.0).min(durations.max_slow), durations.slow_duration)
        }
        StatusEffectType::DefenseBoost => {
            // Refreshing a boost scales from the unboosted defense
            let base_defense = state
                .player
                .status_effects
                .get(StatusEffectType::DefenseBoost)
                .and_then(|s| s.original_defense)
                .unwrap_or(state.player.stats.defense);
            let amount = floor_amount(base_defense as f64 * magnitude / 100.0).max(1);
            StatusApplication::defense_boost(amount, durations.defense_boost_duration)
        }
    }
}

/// Place an effect on the opponent; freeze and stun also cost it turns
pub(crate) fn apply_to_beast(state: &mut BattleState, application: &StatusApplication) {
    if application.duration == 0 {
        return;
    }
    state.beast.apply_status(application);
    if application.effect.skips_turn() {
        state.beast_stunned = state.beast_stunned.max(application.duration);
    }
    state.log(
        Side::Player,
        BattleEvent::StatusApplied {
            effect: application.effect,
            duration: application.duration,
            target: Side::Beast,
        },
    );
}

/// `max(1, effective player attack - opponent defense)`
fn clamped_difference(state: &BattleState) -> i64 {
    let attack = modifier::player_attack_value(
        state.player.stats.attack,
        &state.skill_effects.passive_bonuses,
    );
    modifier::attack_difference(attack, state.beast.stats.defense).max(1)
}
