//! Monitor configuration, built once at startup

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::network;

/// Default log file name, created in the current working directory
pub const DEFAULT_LOG_FILE: &str = "internet_monitor.log";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid polling interval '{0}': expected one of {allowed:?}", allowed = PollingInterval::ALLOWED)]
    InvalidPollingInterval(String),

    #[error("probe timeout must be at least 1 second")]
    ZeroTimeout,
}

/// Polling interval while the link is up, restricted to a fixed set of seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollingInterval(u64);

impl PollingInterval {
    pub const ALLOWED: [u64; 9] = [1, 2, 3, 4, 5, 10, 20, 30, 60];

    pub fn new(secs: u64) -> Result<Self, ConfigError> {
        if Self::ALLOWED.contains(&secs) {
            Ok(Self(secs))
        } else {
            Err(ConfigError::InvalidPollingInterval(secs.to_string()))
        }
    }

    pub fn secs(self) -> u64 {
        self.0
    }

    pub fn as_duration(self) -> Duration {
        Duration::from_secs(self.0)
    }
}

impl Default for PollingInterval {
    fn default() -> Self {
        Self(1)
    }
}

impl fmt::Display for PollingInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.secs())
    }
}

impl FromStr for PollingInterval {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidPollingInterval(s.to_string()))
            .and_then(Self::new)
    }
}

/// The single endpoint used as a reachability proxy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeTarget {
    pub host: String,
    pub port: u16,
    pub timeout: Duration,
}

impl ProbeTarget {
    pub fn new(host: impl Into<String>, port: u16, timeout_secs: u64) -> Result<Self, ConfigError> {
        if timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(Self {
            host: host.into(),
            port,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

impl Default for ProbeTarget {
    fn default() -> Self {
        Self {
            host: network::DEFAULT_PROBE_HOST.to_string(),
            port: network::DEFAULT_PROBE_PORT,
            timeout: Duration::from_secs(network::DEFAULT_PROBE_TIMEOUT_SECS),
        }
    }
}

impl fmt::Display for ProbeTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorConfig {
    pub polling_interval: PollingInterval,
    /// `None` disables the log file entirely
    pub log_file: Option<PathBuf>,
    pub target: ProbeTarget,
}

impl MonitorConfig {
    pub fn logging_enabled(&self) -> bool {
        self.log_file.is_some()
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            polling_interval: PollingInterval::default(),
            log_file: Some(PathBuf::from(DEFAULT_LOG_FILE)),
            target: ProbeTarget::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowed_intervals_parse() {
        for secs in PollingInterval::ALLOWED {
            let parsed: PollingInterval = secs.to_string().parse().unwrap();
            assert_eq!(parsed.secs(), secs);
        }
    }

    #[test]
    fn test_disallowed_intervals_rejected() {
        for raw in ["0", "6", "15", "61", "-1", "abc", ""] {
            assert_eq!(
                raw.parse::<PollingInterval>(),
                Err(ConfigError::InvalidPollingInterval(raw.to_string()))
            );
        }
    }

    #[test]
    fn test_defaults() {
        let config = MonitorConfig::default();
        assert_eq!(config.polling_interval.as_duration(), Duration::from_secs(1));
        assert!(config.logging_enabled());
        assert_eq!(config.target.to_string(), "8.8.8.8:53");
        assert_eq!(config.target.timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        assert_eq!(ProbeTarget::new("1.1.1.1", 53, 0), Err(ConfigError::ZeroTimeout));
    }
}
