//! RoundRecord - Battle log entries
//!
//! The log is narration only; nothing in the engine reads it back.

use crate::modifier::WeaponDefense;
use crate::status::StatusEffectType;
use crate::types::Side;
use serde::{Deserialize, Serialize};

/// Something that happened during a round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum BattleEvent {
    /// A basic attack by either side
    Attack {
        damage: i64,
        critical: bool,
        dodged: bool,
        /// Passive and weapon damage added on top of the roll
        #[serde(default, skip_serializing_if = "is_zero")]
        bonus_damage: i64,
        /// Health returned by life steal
        #[serde(default, skip_serializing_if = "is_zero")]
        healed: i64,
        /// Defend multiplier applied to an incoming hit
        #[serde(default, skip_serializing_if = "Option::is_none")]
        damage_factor: Option<f64>,
    },
    Defend {
        streak: u32,
        damage_factor: f64,
        stunned: bool,
        #[serde(default, skip_serializing_if = "is_zero")]
        healed: i64,
    },
    Special {
        hit: bool,
        damage: i64,
    },
    Ultimate {
        damage: i64,
    },
    Skill {
        skill_id: String,
        #[serde(default, skip_serializing_if = "is_zero")]
        damage: i64,
        #[serde(default, skip_serializing_if = "is_zero")]
        healed: i64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        status: Option<StatusEffectType>,
    },
    /// A status effect landed on `target`
    StatusApplied {
        effect: StatusEffectType,
        duration: u32,
        target: Side,
    },
    /// A damage-over-time effect ticked on the actor
    StatusTick {
        effect: StatusEffectType,
        damage: i64,
    },
    StatusExpired {
        effect: StatusEffectType,
    },
    /// The requested action was refused; the round still continues
    Blocked {
        action: String,
        reason: String,
        message: String,
    },
    /// An unknown skill was requested and a basic attack was made instead
    Fallback {
        requested: String,
    },
    /// The opponent lost its turn
    Stunned {
        remaining: u32,
    },
    /// The opponent's attack missed because of stealth
    Missed,
    WeaponDefense {
        defense: WeaponDefense,
        prevented: i64,
    },
    Victory {
        winner: Side,
    },
}

fn is_zero(value: &i64) -> bool {
    *value == 0
}

/// One battle log entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundRecord {
    pub round: u32,
    /// Side that acted, or that a status tick affected
    pub actor: Side,
    #[serde(flatten)]
    pub event: BattleEvent,
}

impl RoundRecord {
    pub fn new(round: u32, actor: Side, event: BattleEvent) -> Self {
        RoundRecord { round, actor, event }
    }

    /// Get a summary string
    pub fn summary(&self) -> String {
        let who = match self.actor {
            Side::Player => "Player",
            Side::Beast => "Beast",
        };

        let text = match &self.event {
            BattleEvent::Attack {
                damage,
                critical,
                dodged,
                bonus_damage,
                healed,
                damage_factor,
            } => {
                if *dodged {
                    format!("{} attacks but the blow is dodged", who)
                } else {
                    let mut parts = vec![format!("{} attacks for {} damage", who, damage)];
                    if *critical {
                        parts.push("critical".to_string());
                    }
                    if *bonus_damage > 0 {
                        parts.push(format!("{} bonus", bonus_damage));
                    }
                    if *healed > 0 {
                        parts.push(format!("{} life stolen", healed));
                    }
                    if let Some(factor) = damage_factor {
                        parts.push(format!("defended x{:.1}", factor));
                    }
                    parts.join(", ")
                }
            }
            BattleEvent::Defend {
                streak,
                damage_factor,
                stunned,
                healed,
            } => {
                let mut text = format!(
                    "{} defends (streak {}, incoming x{:.1})",
                    who, streak, damage_factor
                );
                if *stunned {
                    text.push_str(", opponent stunned");
                }
                if *healed > 0 {
                    text.push_str(&format!(", healed {}", healed));
                }
                text
            }
            BattleEvent::Special { hit, damage } => {
                if *hit {
                    format!("{} lands a special attack for {} damage", who, damage)
                } else {
                    format!("{}'s special attack misses", who)
                }
            }
            BattleEvent::Ultimate { damage } => {
                format!("{} unleashes an ultimate for {} damage", who, damage)
            }
            BattleEvent::Skill {
                skill_id,
                damage,
                healed,
                status,
            } => {
                let mut text = format!("{} uses {}", who, skill_id);
                if *damage > 0 {
                    text.push_str(&format!(" for {} damage", damage));
                }
                if *healed > 0 {
                    text.push_str(&format!(", healing {}", healed));
                }
                if let Some(effect) = status {
                    text.push_str(&format!(", applying {}", effect));
                }
                text
            }
            BattleEvent::StatusApplied {
                effect,
                duration,
                target,
            } => format!(
                "{} applies {} to {:?} for {} round(s)",
                who, effect, target, duration
            ),
            BattleEvent::StatusTick { effect, damage } => {
                format!("{} takes {} {} damage", who, damage, effect)
            }
            BattleEvent::StatusExpired { effect } => format!("{} wears off {}", effect, who),
            BattleEvent::Blocked { action, message, .. } => {
                format!("{} cannot {}: {}", who, action, message)
            }
            BattleEvent::Fallback { requested } => {
                format!("{} does not know {}, attacking instead", who, requested)
            }
            BattleEvent::Stunned { remaining } => {
                format!("{} is stunned ({} more)", who, remaining)
            }
            BattleEvent::Missed => format!("{} loses track of its target and misses", who),
            BattleEvent::WeaponDefense { defense, prevented } => match defense {
                WeaponDefense::Evaded => format!("{} evades {} damage", who, prevented),
                WeaponDefense::Blocked => format!("{} blocks {} damage", who, prevented),
            },
            BattleEvent::Victory { winner } => format!("{:?} wins the battle", winner),
        };

        format!("Round {}: {}", self.round, text)
    }
}
