//! ----- EMERGENCY CALL THROTTLE -----
//! Raises random emergency calls no more often than the cooldown allows.

use std::time::Duration;

use super::dice::Dice;

/// Emergency-call flag of one car. A raised flag stays raised until it is
/// resolved from outside; a new call can only be raised once the cooldown
/// since the previous one has passed.
#[derive(Debug, Clone, Default)]
pub struct EmergencyThrottle {
    active: bool,
    last_triggered: Option<Duration>,
}

impl EmergencyThrottle {
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn last_triggered(&self) -> Option<Duration> {
        self.last_triggered
    }

    pub fn cooled_down(&self, now: Duration, cooldown: Duration) -> bool {
        match self.last_triggered {
            Some(last) => now.saturating_sub(last) >= cooldown,
            None => true,
        }
    }

    /// Rolls for a new emergency call. Returns `true` when one was raised.
    pub fn try_trigger(&mut self, now: Duration, cooldown: Duration, p: f64, dice: &mut impl Dice) -> bool {
        if self.active || !self.cooled_down(now, cooldown) || !dice.chance(p) {
            return false;
        }
        self.active = true;
        self.last_triggered = Some(now);
        true
    }

    /// Clears the flag. The cooldown keeps running from the last trigger.
    pub fn resolve(&mut self) {
        self.active = false;
    }
}
