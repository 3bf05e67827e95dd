//! Battle simulation utilities

use battle_core::rng::Dice;
use battle_core::{
    ActionId, BattleEngine, BattleError, BattleSkillEffects, BattleState, CombatantStats,
    PlayerLoadout, RewardResult, WeaponEffect, ZoneDefinition,
};
use serde::{Deserialize, Serialize};

/// Battles still running after this many rounds are abandoned
const MAX_ROUNDS: u32 = 500;

/// Below this health fraction the policy defends
const DEFEND_THRESHOLD: f64 = 0.3;

/// Skills equipped by the sample character
const SAMPLE_SKILLS: [&str; 6] = [
    "second_wind",
    "ember_brand",
    "cleave",
    "iron_skin",
    "keen_eye",
    "starfall",
];

/// A representative character for `level`
pub fn sample_loadout(engine: &BattleEngine, level: u32) -> PlayerLoadout {
    let level = level.max(1);
    let skill_level = (level / 10).max(1);
    let lvl = level as i64;

    let learned = SAMPLE_SKILLS
        .iter()
        .filter_map(|id| engine.skills().learn(id, skill_level));

    PlayerLoadout::new(
        "simulated",
        level,
        CombatantStats::new(100 + 20 * lvl, 15 + 3 * lvl, 5 + lvl),
    )
    .with_skills(BattleSkillEffects::from_learned(learned))
    .with_weapons(vec![
        WeaponEffect::Critical { chance: 0.05 },
        WeaponEffect::Burn {
            chance: 0.15,
            damage: 3 + lvl / 5,
            duration: 3,
        },
        WeaponEffect::Block {
            chance: 0.10,
            reduction: 0.4,
        },
    ])
}

/// Fixed policy: ultimate, then special, then defend when hurt, else attack
pub fn choose_action(state: &BattleState, usable: &[ActionId]) -> ActionId {
    if usable.contains(&ActionId::Ultimate) {
        return ActionId::Ultimate;
    }
    if usable.contains(&ActionId::Special) {
        return ActionId::Special;
    }
    if state.player.hp_fraction() < DEFEND_THRESHOLD && usable.contains(&ActionId::Defend) {
        return ActionId::Defend;
    }
    ActionId::Attack
}

/// Aggregate results over many battles
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationReport {
    pub zone: String,
    pub level: u32,
    pub seed: u64,
    pub battles: u32,
    pub wins: u32,
    pub losses: u32,
    pub abandoned: u32,
    pub win_rate: f64,
    pub average_rounds: f64,
    pub average_coins: f64,
    pub average_experience: f64,
    pub boss_kills: u32,
    pub sparkling_encounters: u32,
    pub items_dropped: u32,
    pub coins_lost: i64,
}

/// Run a battle series against random opponents from a zone
pub struct BattleSimulation<'a> {
    engine: &'a BattleEngine,
    zone: &'a ZoneDefinition,
    level: u32,
}

impl<'a> BattleSimulation<'a> {
    pub fn new(engine: &'a BattleEngine, zone: &'a ZoneDefinition, level: u32) -> Self {
        BattleSimulation {
            engine,
            zone,
            level,
        }
    }

    /// Coins offered per victory before rarity multipliers
    pub fn base_coins(&self) -> i64 {
        10 + 2 * self.level as i64
    }

    /// Simulate `battles` battles
    pub fn run(&self, battles: u32, seed: u64, dice: &mut impl Dice) -> Result<SimulationReport, BattleError> {
        let mut report = SimulationReport {
            zone: self.zone.id.clone(),
            level: self.level,
            seed,
            battles,
            ..SimulationReport::default()
        };

        if self.zone.opponents.is_empty() {
            return Ok(report);
        }

        let mut total_rounds: u64 = 0;
        let mut total_coins: i64 = 0;
        let mut total_experience: i64 = 0;

        for _ in 0..battles {
            let last = self.zone.opponents.len() as i64 - 1;
            let index = dice.int_inclusive(0, last) as usize;
            let opponent = &self.zone.opponents[index];

            let loadout = sample_loadout(self.engine, self.level);
            let mut state = self.engine.initialize_battle(loadout, opponent, None, dice)?;
            if state.is_sparkling() {
                report.sparkling_encounters += 1;
            }

            while !state.is_complete() && state.current_round <= MAX_ROUNDS {
                let usable = self.engine.usable_actions(&state);
                let action = choose_action(&state, &usable);
                self.engine.submit_action(&mut state, &action, dice)?;
            }
            total_rounds += state.current_round as u64;

            if !state.is_complete() {
                report.abandoned += 1;
                continue;
            }

            match self
                .engine
                .resolve_rewards(&state, opponent, self.base_coins(), dice)?
            {
                RewardResult::Victory(rewards) => {
                    report.wins += 1;
                    total_coins += rewards.coins;
                    total_experience += rewards.experience;
                    report.items_dropped += rewards.item_count();
                    if rewards.boss_notification.is_some() {
                        report.boss_kills += 1;
                    }
                }
                RewardResult::Defeat { coin_penalty } => {
                    report.losses += 1;
                    report.coins_lost += coin_penalty;
                }
            }
        }

        let count = battles.max(1) as f64;
        report.win_rate = report.wins as f64 / count;
        report.average_rounds = total_rounds as f64 / count;
        if report.wins > 0 {
            report.average_coins = total_coins as f64 / report.wins as f64;
            report.average_experience = total_experience as f64 / report.wins as f64;
        }

        Ok(report)
    }
}
