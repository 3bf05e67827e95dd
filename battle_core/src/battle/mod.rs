//! Turn loop - the battle state machine
//!
//! [`BattleEngine`] holds immutable content and drives a caller-owned
//! [`BattleState`] from `Active` to `PlayerWon` or `BeastWon`.

mod state;

pub use state::{BattleOutcome, BattleState, BattleStatistics, Combatant};

use crate::combat::{self, actions, ActionOutcome, BattleEvent, OpponentStats, RoundRecord};
use crate::config::{
    BattleConstants, ConfigError, GameContent, OpponentCatalog, OpponentDefinition, RewardTables,
    SkillCatalog,
};
use crate::error::{ActionError, BattleError};
use crate::loot::{self, RewardResult};
use crate::rng::Dice;
use crate::skill::{LearnedSkill, SkillType};
use crate::source::PlayerLoadout;
use crate::status::LedgerTick;
use crate::types::{ActionId, ParseActionError, Side};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// What one `submit_action` call did
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnReport {
    /// Round the action was taken in
    pub round: u32,
    /// Log entries appended by this call
    pub events: Vec<RoundRecord>,
    pub action: ActionOutcome,
    pub outcome: BattleOutcome,
}

impl TurnReport {
    pub fn summary(&self) -> String {
        self.events
            .iter()
            .map(RoundRecord::summary)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// An action the player can choose, for menus and help text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionDescriptor {
    pub id: ActionId,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub energy_cost: u32,
    /// Cooldown the action starts after use
    #[serde(default)]
    pub cooldown: u32,
    #[serde(default)]
    pub requires_ultimate: bool,
}

/// Battle resolution engine
#[derive(Debug, Clone, Default)]
pub struct BattleEngine {
    content: GameContent,
}

impl BattleEngine {
    pub fn new(content: GameContent) -> Self {
        BattleEngine { content }
    }

    /// Engine over a content directory, bundled defaults for missing files
    pub fn from_dir(dir: &Path) -> Result<Self, ConfigError> {
        Ok(Self::new(GameContent::load_from_dir(dir)?))
    }

    pub fn constants(&self) -> &BattleConstants {
        &self.content.constants
    }

    pub fn catalog(&self) -> &OpponentCatalog {
        &self.content.catalog
    }

    pub fn skills(&self) -> &SkillCatalog {
        &self.content.skills
    }

    pub fn rewards(&self) -> &RewardTables {
        &self.content.rewards
    }

    /// Start a battle
    ///
    /// Opponent stats are rolled unless `precomputed` is given, in which case
    /// no draws are made.
    pub fn initialize_battle(
        &self,
        loadout: PlayerLoadout,
        opponent: &OpponentDefinition,
        precomputed: Option<OpponentStats>,
        dice: &mut impl Dice,
    ) -> Result<BattleState, BattleError> {
        let beast_stats = match precomputed {
            Some(stats) => stats,
            None => {
                let zone = self
                    .catalog()
                    .zone(&opponent.zone)
                    .ok_or_else(|| BattleError::UnknownZone(opponent.zone.clone()))?;
                combat::roll_opponent_stats(
                    &opponent.base,
                    loadout.level,
                    zone,
                    &self.constants().scaling,
                    dice,
                )
            }
        };

        Ok(BattleState::new(
            loadout,
            opponent,
            beast_stats,
            &self.constants().resources,
        ))
    }

    /// Parse an action name (`attack`, `skill:<id>`, ...) and submit it
    pub fn submit_named_action(
        &self,
        state: &mut BattleState,
        action: &str,
        dice: &mut impl Dice,
    ) -> Result<TurnReport, BattleError> {
        let action: ActionId = action
            .parse()
            .map_err(|err: ParseActionError| BattleError::InvalidAction(err.0))?;
        self.submit_action(state, &action, dice)
    }

    /// Resolve one player action and the opponent's reply
    ///
    /// Refused actions are logged as blocked and still cost the round.
    pub fn submit_action(
        &self,
        state: &mut BattleState,
        action: &ActionId,
        dice: &mut impl Dice,
    ) -> Result<TurnReport, BattleError> {
        if state.is_complete() {
            return Err(BattleError::BattleComplete);
        }

        let constants = self.constants();
        let round = state.current_round;
        let log_start = state.battle_log.len();

        // Step 1: Streak only survives defends and skills
        if !action.preserves_defend_streak() {
            state.resources.reset_defend_streak();
        }

        // Step 2: Cooldowns
        state.resources.tick_cooldowns();

        // Step 3: Energy and ultimate charge
        state.resources.regenerate(&constants.resources);

        // Step 4: Status effects on both sides
        let player_tick = state.player.tick_status_effects();
        state.stats.damage_taken += player_tick.total_damage();
        log_tick(state, Side::Player, &player_tick);

        let beast_tick = state.beast.tick_status_effects();
        state.stats.damage_dealt += beast_tick.total_damage();
        log_tick(state, Side::Beast, &beast_tick);

        let mut outcome = ActionOutcome::default();
        if !settle_outcome(state) {
            // Step 5: Dispatch
            outcome = self.dispatch(state, action, dice);

            // Step 6-8: Opponent replies unless the action was lethal
            if !settle_outcome(state) {
                combat::counter_turn(state, outcome.damage_factor, constants, dice);
                if !settle_outcome(state) {
                    // Step 9: Round complete
                    state.current_round += 1;
                }
            }
        }

        Ok(TurnReport {
            round,
            events: state.battle_log[log_start..].to_vec(),
            action: outcome,
            outcome: state.outcome,
        })
    }

    fn dispatch(
        &self,
        state: &mut BattleState,
        action: &ActionId,
        dice: &mut impl Dice,
    ) -> ActionOutcome {
        let constants = self.constants();
        let result = match action {
            ActionId::Attack => actions::attack(state, constants, dice),
            ActionId::Defend => actions::defend(state, constants, dice),
            ActionId::Special => actions::special(state, constants, dice),
            ActionId::Ultimate => actions::ultimate(state, constants, dice),
            ActionId::Skill(skill_id) => match actions::use_skill(state, skill_id, constants) {
                Err(ActionError::UnknownSkill(requested)) => {
                    state.log(Side::Player, BattleEvent::Fallback { requested });
                    actions::attack(state, constants, dice)
                }
                other => other,
            },
        };

        match result {
            Ok(outcome) => outcome,
            Err(err) => {
                state.stats.blocked_actions += 1;
                state.log(
                    Side::Player,
                    BattleEvent::Blocked {
                        action: action.to_string(),
                        reason: err.reason().to_string(),
                        message: err.to_string(),
                    },
                );
                ActionOutcome::default()
            }
        }
    }

    /// Every action a character with `equipped` skills can pick
    ///
    /// Pure projection; passive skills are left out.
    pub fn list_available_actions(&self, equipped: &[LearnedSkill]) -> Vec<ActionDescriptor> {
        let limits = &self.constants().resources;
        let mut descriptors = vec![
            ActionDescriptor {
                id: ActionId::Attack,
                name: "Attack".to_string(),
                description: "Strike with your weapon.".to_string(),
                energy_cost: 0,
                cooldown: 0,
                requires_ultimate: false,
            },
            ActionDescriptor {
                id: ActionId::Defend,
                name: "Defend".to_string(),
                description: "Reduce incoming damage, with a chance to stun. Repeated defends grow stronger but take longer to recover.".to_string(),
                energy_cost: 0,
                cooldown: 1,
                requires_ultimate: false,
            },
            ActionDescriptor {
                id: ActionId::Special,
                name: "Special Attack".to_string(),
                description: "A heavy strike that may miss, unless the opponent is stunned.".to_string(),
                energy_cost: limits.energy_cost,
                cooldown: limits.special_cooldown,
                requires_ultimate: false,
            },
            ActionDescriptor {
                id: ActionId::Ultimate,
                name: "Ultimate".to_string(),
                description: "Spend a full charge on a devastating hit.".to_string(),
                energy_cost: 0,
                cooldown: 0,
                requires_ultimate: true,
            },
        ];

        for learned in equipped {
            let skill = &learned.skill;
            let (energy_cost, requires_ultimate) = match skill.skill_type {
                SkillType::Passive => continue,
                SkillType::Active => (limits.energy_cost, false),
                SkillType::Ultimate => (0, true),
            };
            descriptors.push(ActionDescriptor {
                id: ActionId::skill(skill.id.clone()),
                name: skill.name.clone(),
                description: skill.description.clone(),
                energy_cost,
                cooldown: skill.cooldown.unwrap_or(limits.default_skill_cooldown),
                requires_ultimate,
            });
        }

        descriptors
    }

    /// Actions that will pass their resource checks on the next submission
    pub fn usable_actions(&self, state: &BattleState) -> Vec<ActionId> {
        state.usable_actions(&self.constants().resources)
    }

    /// Loot, coins and experience for a finished battle
    ///
    /// Call once per battle; every call draws fresh loot.
    pub fn resolve_rewards(
        &self,
        state: &BattleState,
        opponent: &OpponentDefinition,
        base_coins: i64,
        dice: &mut impl Dice,
    ) -> Result<RewardResult, BattleError> {
        if !state.is_complete() {
            return Err(BattleError::BattleInProgress);
        }

        let tables = self.rewards();
        if state.beast_won() {
            return Ok(RewardResult::Defeat {
                coin_penalty: loot::defeat_penalty(base_coins, tables),
            });
        }

        let zone = self
            .catalog()
            .zone(&opponent.zone)
            .ok_or_else(|| BattleError::UnknownZone(opponent.zone.clone()))?;

        Ok(RewardResult::Victory(loot::resolve_victory(
            opponent,
            zone,
            state.is_sparkling(),
            state.current_round,
            base_coins,
            tables,
            dice,
        )))
    }
}

fn log_tick(state: &mut BattleState, side: Side, tick: &LedgerTick) {
    for (effect, damage) in &tick.damage {
        state.log(
            side,
            BattleEvent::StatusTick {
                effect: *effect,
                damage: *damage,
            },
        );
    }
    for effect in &tick.expired {
        state.log(side, BattleEvent::StatusExpired { effect: *effect });
    }
}

/// Settle the outcome if either side is down; opponent death wins ties
fn settle_outcome(state: &mut BattleState) -> bool {
    let winner = if state.beast.is_defeated() {
        Side::Player
    } else if state.player.is_defeated() {
        Side::Beast
    } else {
        return false;
    };

    state.outcome = match winner {
        Side::Player => BattleOutcome::PlayerWon,
        Side::Beast => BattleOutcome::BeastWon,
    };
    state.log(winner, BattleEvent::Victory { winner });
    true
}
