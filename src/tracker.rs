//! Downtime state machine: turns probe results into outage events.

use std::time::Duration;

use chrono::{DateTime, Local};

use crate::duration::format_duration;

/// Re-check cadence while an outage is open
pub const DOWN_CHECK_INTERVAL: Duration = Duration::from_secs(1);

/// Accumulated down time between two "still unavailable" heartbeats
pub const HEARTBEAT_THRESHOLD: Duration = Duration::from_secs(60);

/// One probe result and the moment it was taken
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Observation {
    pub reachable: bool,
    pub at: DateTime<Local>,
}

impl Observation {
    pub fn new(reachable: bool, at: DateTime<Local>) -> Self {
        Self { reachable, at }
    }
}

/// The currently open outage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutageRecord {
    pub started_at: DateTime<Local>,
    pub last_heartbeat_at: DateTime<Local>,
    /// Down time accumulated since the last heartbeat (or since onset)
    down_since_heartbeat: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutageEvent {
    Started {
        at: DateTime<Local>,
    },
    StillDown {
        at: DateTime<Local>,
    },
    Ended {
        started_at: DateTime<Local>,
        ended_at: DateTime<Local>,
        /// `H:MM:SS`
        duration: String,
    },
}

/// `Up` is the initial state; `Down` owns the single open outage.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LinkState {
    #[default]
    Up,
    Down(OutageRecord),
}

#[derive(Debug, Default)]
pub struct DowntimeTracker {
    state: LinkState,
}

impl DowntimeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_down(&self) -> bool {
        matches!(self.state, LinkState::Down(_))
    }

    /// The open outage, if any
    pub fn outage(&self) -> Option<&OutageRecord> {
        match &self.state {
            LinkState::Down(record) => Some(record),
            LinkState::Up => None,
        }
    }

    /// Feed one observation and return the event it produces, if any.
    ///
    /// While down, each unreachable observation is assumed to follow a
    /// [`DOWN_CHECK_INTERVAL`] sleep; the heartbeat counter advances by that
    /// amount per check, not by wall-clock time.
    pub fn observe(&mut self, obs: Observation) -> Option<OutageEvent> {
        match (&mut self.state, obs.reachable) {
            (LinkState::Up, true) => None,
            (LinkState::Up, false) => {
                self.state = LinkState::Down(OutageRecord {
                    started_at: obs.at,
                    last_heartbeat_at: obs.at,
                    down_since_heartbeat: Duration::ZERO,
                });
                Some(OutageEvent::Started { at: obs.at })
            }
            (LinkState::Down(record), false) => {
                record.down_since_heartbeat += DOWN_CHECK_INTERVAL;
                if record.down_since_heartbeat >= HEARTBEAT_THRESHOLD {
                    record.down_since_heartbeat = Duration::ZERO;
                    record.last_heartbeat_at = obs.at;
                    Some(OutageEvent::StillDown { at: obs.at })
                } else {
                    None
                }
            }
            (LinkState::Down(record), true) => {
                let started_at = record.started_at;
                self.state = LinkState::Up;
                // ended_at never precedes started_at
                let ended_at = obs.at.max(started_at);
                Some(OutageEvent::Ended {
                    started_at,
                    ended_at,
                    duration: format_duration(&started_at, &ended_at),
                })
            }
        }
    }

    /// Delay before the next probe: the configured interval while up,
    /// [`DOWN_CHECK_INTERVAL`] while an outage is open.
    pub fn next_delay(&self, up_interval: Duration) -> Duration {
        if self.is_down() {
            DOWN_CHECK_INTERVAL
        } else {
            up_interval
        }
    }
}
