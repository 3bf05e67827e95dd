//! Energy, ultimate charge and cooldown bookkeeping
//!
//! `Resources` gates which actions are legal each round. Checks and spends
//! are separate so a handler can validate every requirement before paying
//! any cost.

use crate::config::ResourceConstants;
use crate::error::ActionError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Cooldowns for the built-in actions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionCooldowns {
    pub special: u32,
    pub defend: u32,
}

/// Per-battle player resources
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resources {
    pub energy: u32,
    pub ultimate_progress: u32,
    pub ultimate_ready: bool,
    pub action_cooldowns: ActionCooldowns,
    pub skill_cooldowns: BTreeMap<String, u32>,
    pub consecutive_defends: u32,
}

impl Resources {
    /// Full energy, empty ultimate, no cooldowns
    pub fn new(limits: &ResourceConstants) -> Self {
        Resources {
            energy: limits.max_energy,
            ultimate_progress: 0,
            ultimate_ready: false,
            action_cooldowns: ActionCooldowns::default(),
            skill_cooldowns: BTreeMap::new(),
            consecutive_defends: 0,
        }
    }

    /// Count every cooldown down by one round
    pub fn tick_cooldowns(&mut self) {
        self.action_cooldowns.special = self.action_cooldowns.special.saturating_sub(1);
        self.action_cooldowns.defend = self.action_cooldowns.defend.saturating_sub(1);
        for remaining in self.skill_cooldowns.values_mut() {
            *remaining = remaining.saturating_sub(1);
        }
    }

    /// Regenerate energy and build ultimate charge for one action
    pub fn regenerate(&mut self, limits: &ResourceConstants) {
        self.energy = (self.energy + limits.energy_regen).min(limits.max_energy);
        self.ultimate_progress =
            (self.ultimate_progress + limits.ultimate_gain).min(limits.max_ultimate);
        if self.ultimate_progress >= limits.max_ultimate {
            self.ultimate_ready = true;
        }
    }

    pub fn check_energy(&self, cost: u32) -> Result<(), ActionError> {
        if self.energy < cost {
            return Err(ActionError::InsufficientEnergy {
                required: cost,
                available: self.energy,
            });
        }
        Ok(())
    }

    pub fn spend_energy(&mut self, cost: u32) -> Result<(), ActionError> {
        self.check_energy(cost)?;
        self.energy -= cost;
        Ok(())
    }

    pub fn check_ultimate(&self) -> Result<(), ActionError> {
        if !self.ultimate_ready {
            return Err(ActionError::UltimateNotReady);
        }
        Ok(())
    }

    /// Spend the full ultimate charge
    pub fn consume_ultimate(&mut self) -> Result<(), ActionError> {
        self.check_ultimate()?;
        self.ultimate_ready = false;
        self.ultimate_progress = 0;
        Ok(())
    }

    pub fn check_special(&self) -> Result<(), ActionError> {
        cooldown_check("special", self.action_cooldowns.special)
    }

    pub fn check_defend(&self) -> Result<(), ActionError> {
        cooldown_check("defend", self.action_cooldowns.defend)
    }

    pub fn check_skill(&self, skill_id: &str) -> Result<(), ActionError> {
        let remaining = self.skill_cooldown(skill_id);
        cooldown_check(skill_id, remaining)
    }

    pub fn skill_cooldown(&self, skill_id: &str) -> u32 {
        self.skill_cooldowns.get(skill_id).copied().unwrap_or(0)
    }

    pub fn start_skill_cooldown(&mut self, skill_id: &str, rounds: u32) {
        self.skill_cooldowns.insert(skill_id.to_string(), rounds);
    }

    /// Extend the defend streak and put defend on cooldown
    ///
    /// Returns the new streak length.
    pub fn record_defend(&mut self, limits: &ResourceConstants) -> u32 {
        self.consecutive_defends += 1;
        self.action_cooldowns.defend = self.consecutive_defends.min(limits.max_defend_cooldown);
        self.consecutive_defends
    }

    pub fn reset_defend_streak(&mut self) {
        self.consecutive_defends = 0;
    }
}

fn cooldown_check(action: &str, remaining: u32) -> Result<(), ActionError> {
    if remaining > 0 {
        return Err(ActionError::OnCooldown {
            action: action.to_string(),
            remaining,
        });
    }
    Ok(())
}
