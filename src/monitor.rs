//! Polling loop: probe, feed the tracker, emit, sleep; until shutdown is requested.

use std::future::Future;
use std::io::Write;

use chrono::{DateTime, Local};
use tokio::time::sleep;

use crate::config::MonitorConfig;
use crate::sink::EventSink;
use crate::tracker::{DowntimeTracker, Observation};

/// Time source for event timestamps
pub trait Clock {
    fn now(&self) -> DateTime<Local>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

pub struct Monitor<'a, W: Write, C: Clock> {
    config: &'a MonitorConfig,
    sink: EventSink<W>,
    clock: C,
    tracker: DowntimeTracker,
}

impl<'a, W: Write> Monitor<'a, W, SystemClock> {
    pub fn new(config: &'a MonitorConfig, sink: EventSink<W>) -> Self {
        Self::with_clock(config, sink, SystemClock)
    }
}

impl<'a, W: Write, C: Clock> Monitor<'a, W, C> {
    pub fn with_clock(config: &'a MonitorConfig, sink: EventSink<W>, clock: C) -> Self {
        Self {
            config,
            sink,
            clock,
            tracker: DowntimeTracker::new(),
        }
    }

    /// Run until `shutdown` resolves, then emit the stop line and return the sink.
    ///
    /// Shutdown is observed while probing and while sleeping. An outage still
    /// open at that point is dropped without an "ended" event.
    pub async fn run<F, Fut>(
        mut self,
        mut probe: F,
        shutdown: impl Future<Output = ()>,
    ) -> EventSink<W>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = bool>,
    {
        tokio::pin!(shutdown);

        self.sink
            .commencing(&self.clock.now(), self.config.polling_interval);
        tracing::info!(
            "Probing {} every {} s while up (logfile {})",
            self.config.target,
            self.config.polling_interval,
            if self.config.logging_enabled() { "enabled" } else { "disabled" }
        );

        loop {
            let reachable = tokio::select! {
                biased;
                _ = &mut shutdown => break,
                reachable = probe() => reachable,
            };

            let obs = Observation::new(reachable, self.clock.now());
            if let Some(event) = self.tracker.observe(obs) {
                self.sink.outage(&event);
            }

            let delay = self
                .tracker
                .next_delay(self.config.polling_interval.as_duration());
            tracing::debug!("Sleeping {:?}...", delay);
            tokio::select! {
                biased;
                _ = &mut shutdown => break,
                _ = sleep(delay) => {}
            }
        }

        if let Some(outage) = self.tracker.outage() {
            tracing::info!(
                "Shutdown during outage started at {} (last heartbeat {}), not closing it",
                outage.started_at,
                outage.last_heartbeat_at
            );
        }
        self.sink.stopped(&self.clock.now());
        self.sink
    }
}
