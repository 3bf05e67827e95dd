//! BattleState - The single mutable aggregate for one battle

use crate::combat::{BattleEvent, OpponentStats, RoundRecord};
use crate::config::{OpponentDefinition, RageConstants, ResourceConstants};
use crate::modifier::WeaponEffect;
use crate::resource::Resources;
use crate::skill::{BattleSkillEffects, SkillType};
use crate::source::PlayerLoadout;
use crate::status::{ActiveStatus, LedgerTick, StatusApplication, StatusLedger};
use crate::types::{ActionId, CombatantStats, Side};
use serde::{Deserialize, Serialize};

/// One side of the battle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Combatant {
    pub hp: i64,
    pub max_hp: i64,
    /// Current stats; defense reflects any active defense boost
    pub stats: CombatantStats,
    pub status_effects: StatusLedger,
}

impl Combatant {
    /// A combatant at full health
    pub fn new(stats: CombatantStats) -> Self {
        let max_hp = stats.hp.max(1);
        Combatant {
            hp: max_hp,
            max_hp,
            stats,
            status_effects: StatusLedger::new(),
        }
    }

    /// Remove up to `amount` health, returning what was actually lost
    pub fn take_damage(&mut self, amount: i64) -> i64 {
        let dealt = amount.clamp(0, self.hp);
        self.hp -= dealt;
        dealt
    }

    /// Restore up to `amount` health, returning what was actually restored
    pub fn heal(&mut self, amount: i64) -> i64 {
        let healed = amount.clamp(0, self.max_hp - self.hp);
        self.hp += healed;
        healed
    }

    pub fn is_defeated(&self) -> bool {
        self.hp <= 0
    }

    pub fn hp_fraction(&self) -> f64 {
        if self.max_hp <= 0 {
            return 0.0;
        }
        self.hp as f64 / self.max_hp as f64
    }

    pub fn apply_status(&mut self, application: &StatusApplication) -> Option<ActiveStatus> {
        self.status_effects.apply(application, &mut self.stats)
    }

    pub fn tick_status_effects(&mut self) -> LedgerTick {
        self.status_effects.tick(&mut self.hp, &mut self.stats)
    }
}

/// Battle lifecycle state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BattleOutcome {
    #[default]
    Active,
    PlayerWon,
    BeastWon,
}

/// Running totals for post-battle summaries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleStatistics {
    /// Health removed from the opponent, status ticks included
    pub damage_dealt: i64,
    /// Health the player lost, status ticks included
    pub damage_taken: i64,
    pub healing_done: i64,
    /// Player critical hits
    pub critical_hits: u32,
    /// Opponent attacks the player dodged or evaded
    pub dodges: u32,
    pub blocked_actions: u32,
}

/// Everything about one battle in progress
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleState {
    pub character_id: String,
    pub player_level: u32,
    pub player: Combatant,
    pub beast: Combatant,
    pub beast_stats: OpponentStats,
    pub opponent_name: String,
    pub zone_id: String,
    pub is_boss: bool,
    pub current_round: u32,
    pub outcome: BattleOutcome,
    pub resources: Resources,
    /// Opponent turns still to be skipped
    pub beast_stunned: u32,
    pub battle_log: Vec<RoundRecord>,
    pub skill_effects: BattleSkillEffects,
    pub weapon_effects: Vec<WeaponEffect>,
    pub stats: BattleStatistics,
}

impl BattleState {
    /// A fresh battle: full health, round 1, full energy, empty ultimate
    pub fn new(
        loadout: PlayerLoadout,
        opponent: &OpponentDefinition,
        beast_stats: OpponentStats,
        limits: &ResourceConstants,
    ) -> Self {
        BattleState {
            character_id: loadout.character_id,
            player_level: loadout.level,
            player: Combatant::new(loadout.stats),
            beast: Combatant::new(beast_stats.stats),
            beast_stats,
            opponent_name: opponent.name.clone(),
            zone_id: opponent.zone.clone(),
            is_boss: opponent.boss,
            current_round: 1,
            outcome: BattleOutcome::Active,
            resources: Resources::new(limits),
            beast_stunned: 0,
            battle_log: Vec::new(),
            skill_effects: loadout.skill_effects,
            weapon_effects: loadout.weapon_effects,
            stats: BattleStatistics::default(),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.outcome != BattleOutcome::Active
    }

    pub fn player_won(&self) -> bool {
        self.outcome == BattleOutcome::PlayerWon
    }

    pub fn beast_won(&self) -> bool {
        self.outcome == BattleOutcome::BeastWon
    }

    pub fn is_sparkling(&self) -> bool {
        self.beast_stats.is_sparkling
    }

    /// Opponent attack bonus for the current round
    pub fn beast_rage(&self, rage: &RageConstants) -> f64 {
        rage.for_round(self.current_round)
    }

    /// Append a log entry for the current round
    pub fn log(&mut self, actor: Side, event: BattleEvent) {
        self.battle_log
            .push(RoundRecord::new(self.current_round, actor, event));
    }

    /// Actions whose resource gates will pass on the next submission
    ///
    /// Accounts for the cooldown tick and regeneration that happen at the
    /// start of every submission. Empty once the battle is complete.
    pub fn usable_actions(&self, limits: &ResourceConstants) -> Vec<ActionId> {
        if self.is_complete() {
            return Vec::new();
        }

        let mut next = self.resources.clone();
        next.tick_cooldowns();
        next.regenerate(limits);

        let mut actions = vec![ActionId::Attack];
        if next.check_defend().is_ok() {
            actions.push(ActionId::Defend);
        }
        if next.check_special().is_ok() && next.check_energy(limits.energy_cost).is_ok() {
            actions.push(ActionId::Special);
        }
        if next.check_ultimate().is_ok() {
            actions.push(ActionId::Ultimate);
        }

        for skill in self.skill_effects.usable_skills() {
            if next.check_skill(skill.id()).is_err() {
                continue;
            }
            let affordable = match skill.skill.skill_type {
                SkillType::Active => next.check_energy(limits.energy_cost).is_ok(),
                SkillType::Ultimate => next.check_ultimate().is_ok(),
                SkillType::Passive => false,
            };
            if affordable {
                actions.push(ActionId::skill(skill.id()));
            }
        }

        actions
    }
}
