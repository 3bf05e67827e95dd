//! Opponent spawn scaling and the opponent's counter-turn

use super::attack::resolve_attack;
use super::record::BattleEvent;
use crate::battle::BattleState;
use crate::config::{BattleConstants, ScalingConstants, ZoneDefinition};
use crate::modifier::{self, floor_amount, weapon};
use crate::rng::Dice;
use crate::types::{CombatantStats, Side};
use serde::{Deserialize, Serialize};

/// How an opponent's spawn multiplier was built
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MultiplierTrace {
    pub level_factor: f64,
    pub random_factor: f64,
    pub sparkle_bonus: f64,
    /// level_factor × random_factor + sparkle_bonus
    pub total: f64,
}

/// Opponent stats after spawn scaling
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OpponentStats {
    pub stats: CombatantStats,
    pub is_sparkling: bool,
    pub multiplier: MultiplierTrace,
}

impl OpponentStats {
    /// Unscaled stats with a neutral trace, for callers that scale elsewhere
    pub fn fixed(stats: CombatantStats) -> Self {
        OpponentStats {
            stats,
            is_sparkling: false,
            multiplier: MultiplierTrace {
                level_factor: 1.0,
                random_factor: 1.0,
                sparkle_bonus: 0.0,
                total: 1.0,
            },
        }
    }
}

/// Scale an opponent's base stats for a player of `player_level`
///
/// Draws the random factor first. The sparkle roll is only made when the
/// player is above the zone's middle level.
pub fn roll_opponent_stats(
    base: &CombatantStats,
    player_level: u32,
    zone: &ZoneDefinition,
    scaling: &ScalingConstants,
    dice: &mut impl Dice,
) -> OpponentStats {
    let level_factor = 1.0 + player_level as f64 * scaling.level_step;
    let random_factor = dice.uniform(scaling.min_random, scaling.max_random);

    let is_sparkling =
        player_level > zone.middle_level() && dice.chance(scaling.sparkle_chance);
    let sparkle_bonus = if is_sparkling { scaling.sparkle_bonus } else { 0.0 };

    let total = level_factor * random_factor + sparkle_bonus;

    OpponentStats {
        stats: base.scaled(total),
        is_sparkling,
        multiplier: MultiplierTrace {
            level_factor,
            random_factor,
            sparkle_bonus,
            total,
        },
    }
}

/// Run the opponent's turn
///
/// `damage_factor` is the defend multiplier from the player's action, if
/// any. Draw order: stealth miss (only with stealth equipped), the attack
/// roll, then weapon defenses in equip order.
pub fn counter_turn(
    state: &mut BattleState,
    damage_factor: Option<f64>,
    constants: &BattleConstants,
    dice: &mut impl Dice,
) {
    if state.beast_stunned > 0 {
        state.beast_stunned -= 1;
        let remaining = state.beast_stunned;
        state.log(Side::Beast, BattleEvent::Stunned { remaining });
        return;
    }

    let penalty = weapon::stealth_penalty(&state.weapon_effects);
    if penalty > 0.0 && dice.chance(penalty) {
        state.log(Side::Beast, BattleEvent::Missed);
        return;
    }

    let profile = modifier::beast_attack_profile(
        state.beast.stats.attack,
        state.beast_rage(&constants.rage),
        state.beast.status_effects.slow_value(),
        state.player.stats.defense,
        &state.skill_effects.passive_bonuses,
        &constants.attack,
    );
    let roll = resolve_attack(&profile, &constants.attack, dice);

    if roll.dodged {
        state.stats.dodges += 1;
        state.log(
            Side::Beast,
            BattleEvent::Attack {
                damage: 0,
                critical: false,
                dodged: true,
                bonus_damage: 0,
                healed: 0,
                damage_factor,
            },
        );
        return;
    }

    let mut damage = roll.damage;
    if let Some(factor) = damage_factor {
        damage = floor_amount(damage as f64 * factor);
    }

    if damage > 0 {
        let (after, defense) = weapon::apply_weapon_defense(&state.weapon_effects, damage, dice);
        if let Some(defense) = defense {
            if defense == weapon::WeaponDefense::Evaded {
                state.stats.dodges += 1;
            }
            state.log(
                Side::Player,
                BattleEvent::WeaponDefense {
                    defense,
                    prevented: damage - after,
                },
            );
        }
        damage = after;
    }

    damage = modifier::apply_damage_reduction(damage, &state.skill_effects.passive_bonuses);

    let taken = state.player.take_damage(damage);
    state.stats.damage_taken += taken;
    state.log(
        Side::Beast,
        BattleEvent::Attack {
            damage: taken,
            critical: roll.critical,
            dodged: false,
            bonus_damage: 0,
            healed: 0,
            damage_factor,
        },
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{OpponentDefinition, ResourceConstants};
    use crate::modifier::{PassiveBonuses, PassiveKind, WeaponEffect};
    use crate::rng::{unit_for_int, unit_for_uniform, ScriptedDice};
    use crate::skill::BattleSkillEffects;
    use crate::source::PlayerLoadout;
    use crate::types::Rarity;

    /// Player 200/50/10 against a 300/30/20 opponent; round 1 rage makes its attack 31
    fn battle(passives: PassiveBonuses, weapons: Vec<WeaponEffect>) -> BattleState {
        let opponent = OpponentDefinition::new("Boar", Rarity::Common, CombatantStats::new(300, 30, 20))
            .in_zone("meadow");
        let loadout = PlayerLoadout::new("hero", 10, CombatantStats::new(200, 50, 10))
            .with_skills(BattleSkillEffects {
                passive_bonuses: passives,
                ..BattleSkillEffects::default()
            })
            .with_weapons(weapons);
        BattleState::new(
            loadout,
            &opponent,
            OpponentStats::fixed(opponent.base),
            &ResourceConstants::default(),
        )
    }

    /// No dodge, variance 2, no crit: 31 - 10 + 2 = 23
    fn landed_hit() -> Vec<f64> {
        vec![0.5, unit_for_int(1, 3, 2), 0.5]
    }

    fn zone() -> ZoneDefinition {
        ZoneDefinition {
            id: "meadow".to_string(),
            name: "Meadow".to_string(),
            min_level: 1,
            max_level: 10,
            xp_multiplier: 1.0,
            opponents: Vec::new(),
        }
    }

    #[test]
    fn test_scaling_below_middle_skips_sparkle_roll() {
        let scaling = ScalingConstants::default();
        let mut dice = ScriptedDice::new([unit_for_uniform(0.2, 2.0, 1.0)]);
        let rolled = roll_opponent_stats(&CombatantStats::new(100, 20, 10), 5, &zone(), &scaling, &mut dice);

        assert_eq!(dice.consumed(), 1);
        assert!(!rolled.is_sparkling);
        assert!((rolled.multiplier.level_factor - 1.5).abs() < 1e-9);
        assert!((rolled.multiplier.total - 1.5).abs() < 1e-9);
        assert_eq!(rolled.stats, CombatantStats::new(150, 30, 15));
    }

    #[test]
    fn test_scaling_above_middle_can_sparkle() {
        let scaling = ScalingConstants::default();
        let mut dice = ScriptedDice::new([unit_for_uniform(0.2, 2.0, 1.0), 0.1]);
        let rolled = roll_opponent_stats(&CombatantStats::new(100, 20, 10), 10, &zone(), &scaling, &mut dice);

        assert!(rolled.is_sparkling);
        assert!((rolled.multiplier.sparkle_bonus - 0.5).abs() < 1e-9);
        // 2.0 × 1.0 + 0.5
        assert!((rolled.multiplier.total - 2.5).abs() < 1e-9);
        assert_eq!(rolled.stats.hp, 250);
    }

    #[test]
    fn test_scaled_hp_never_zero() {
        let scaling = ScalingConstants::default();
        let mut dice = ScriptedDice::new([0.0]);
        let rolled = roll_opponent_stats(&CombatantStats::new(1, 1, 1), 0, &zone(), &scaling, &mut dice);
        assert_eq!(rolled.stats.hp, 1);
    }

    #[test]
    fn test_counter_turn_hits_player() {
        let mut state = battle(PassiveBonuses::new(), Vec::new());
        let mut dice = ScriptedDice::new(landed_hit());
        counter_turn(&mut state, None, &BattleConstants::default(), &mut dice);

        assert_eq!(state.player.hp, 177);
        assert_eq!(state.stats.damage_taken, 23);
        assert_eq!(dice.consumed(), 3);
    }

    #[test]
    fn test_defend_factor_reduces_hit() {
        let constants = BattleConstants::default();
        for (streak, expected_hp) in [(1, 184), (2, 187), (3, 189)] {
            let mut state = battle(PassiveBonuses::new(), Vec::new());
            let factor = constants.defend.damage_factor(streak);
            let mut dice = ScriptedDice::new(landed_hit());
            counter_turn(&mut state, Some(factor), &constants, &mut dice);
            assert_eq!(state.player.hp, expected_hp, "streak {}", streak);
        }
    }

    #[test]
    fn test_stunned_opponent_skips_without_drawing() {
        let mut state = battle(PassiveBonuses::new(), Vec::new());
        state.beast_stunned = 1;
        let mut dice = ScriptedDice::default();
        counter_turn(&mut state, None, &BattleConstants::default(), &mut dice);

        assert_eq!(state.player.hp, 200);
        assert_eq!(state.beast_stunned, 0);
        assert_eq!(dice.consumed(), 0);
    }

    #[test]
    fn test_stealth_makes_opponent_miss() {
        let weapons = vec![WeaponEffect::Stealth { accuracy_penalty: 0.5 }];
        let mut state = battle(PassiveBonuses::new(), weapons.clone());
        let mut dice = ScriptedDice::new([0.1]);
        counter_turn(&mut state, None, &BattleConstants::default(), &mut dice);

        assert_eq!(state.player.hp, 200);
        assert_eq!(dice.consumed(), 1);
        assert!(matches!(
            state.battle_log.last().map(|r| &r.event),
            Some(BattleEvent::Missed)
        ));

        // Failed stealth roll, then the normal attack roll
        let mut state = battle(PassiveBonuses::new(), weapons);
        let mut dice = ScriptedDice::new([0.9].into_iter().chain(landed_hit()));
        counter_turn(&mut state, None, &BattleConstants::default(), &mut dice);
        assert_eq!(state.player.hp, 177);
    }

    #[test]
    fn test_weapon_evasion_avoids_hit() {
        let mut state = battle(PassiveBonuses::new(), vec![WeaponEffect::Evasion { chance: 0.2 }]);
        let mut dice = ScriptedDice::new(landed_hit().into_iter().chain([0.1]));
        counter_turn(&mut state, None, &BattleConstants::default(), &mut dice);

        assert_eq!(state.player.hp, 200);
        assert_eq!(state.stats.dodges, 1);
    }

    #[test]
    fn test_weapon_block_shaves_hit() {
        let weapons = vec![WeaponEffect::Block {
            chance: 0.5,
            reduction: 0.4,
        }];
        let mut state = battle(PassiveBonuses::new(), weapons);
        let mut dice = ScriptedDice::new(landed_hit().into_iter().chain([0.1]));
        counter_turn(&mut state, None, &BattleConstants::default(), &mut dice);

        // floor(23 × 0.6) = 13
        assert_eq!(state.player.hp, 187);
        assert_eq!(state.stats.dodges, 0);
        assert!(state.battle_log.iter().any(|r| matches!(
            r.event,
            BattleEvent::WeaponDefense { prevented: 10, .. }
        )));
    }

    #[test]
    fn test_damage_reduction_applies_after_defend() {
        let passives = PassiveBonuses::new().with(PassiveKind::DamageReduction, 20.0);
        let mut state = battle(passives, Vec::new());
        let mut dice = ScriptedDice::new(landed_hit());
        counter_turn(&mut state, Some(0.5), &BattleConstants::default(), &mut dice);

        // floor(23 × 0.5) = 11, then floor(11 × 0.8) = 8
        assert_eq!(state.player.hp, 192);
    }
}
