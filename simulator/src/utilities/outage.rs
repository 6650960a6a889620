//! ----- POWER OUTAGE COORDINATOR -----
//! Tracks when the fleet-wide power outage began and decides whether the
//! emergency car is allowed to leave outage operation yet.

use std::time::Duration;

use log::info;

#[derive(Debug, Clone)]
pub struct OutageCoordinator {
    started: Option<Duration>,
    min_duration: Duration,
}

impl OutageCoordinator {
    pub fn new(min_duration: Duration) -> Self {
        OutageCoordinator {
            started: None,
            min_duration,
        }
    }

    /// Called once per tick with whether any car currently runs on outage power.
    pub fn observe(&mut self, outage_running: bool, now: Duration) {
        match (outage_running, self.started) {
            (true, None) => {
                info!("Fleet entered power outage mode");
                self.started = Some(now);
            }
            (false, Some(_)) => {
                info!("Fleet left power outage mode");
                self.started = None;
            }
            _ => (),
        }
    }

    pub fn started(&self) -> Option<Duration> {
        self.started
    }

    /// `true` while an outage is running and younger than the minimum duration.
    pub fn holds(&self, now: Duration) -> bool {
        match self.started {
            Some(started) => now.saturating_sub(started) < self.min_duration,
            None => false,
        }
    }
}
