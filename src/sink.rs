//! Event sink: renders monitor events to the console and the append-only log file.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use crate::config::PollingInterval;
use crate::tracker::OutageEvent;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const SEPARATOR: &str = "--------------------------------------------------------------";

#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("cannot open {} for appending: {source}", .path.display())]
    LogFileUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub fn timestamp(at: &DateTime<Local>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// Lines for one outage event, identical on console and in the log file
pub fn render(event: &OutageEvent) -> Vec<String> {
    match event {
        OutageEvent::Started { at } => vec![format!(
            "-------Internet Connection unavailable at : {}",
            timestamp(at)
        )],
        OutageEvent::StillDown { at } => vec![format!(
            "-----------Internet Connection still unavailable at : {}",
            timestamp(at)
        )],
        OutageEvent::Ended {
            ended_at, duration, ..
        } => vec![
            format!("-------Internet Connection restored at    : {}", timestamp(ended_at)),
            format!("-------The duration of the downtime was   :             {}", duration),
        ],
    }
}

fn commencing_line(at: &DateTime<Local>, interval: PollingInterval) -> String {
    format!(
        "Monitoring Internet Connection commencing : {} polling every {} second(s)",
        timestamp(at),
        interval
    )
}

fn stopped_line(at: &DateTime<Local>) -> String {
    format!("Monitoring Internet Connection stopped at : {}", timestamp(at))
}

/// Held-open log file in append mode, flushed after every event
#[derive(Debug)]
pub struct LogFile {
    path: PathBuf,
    file: File,
}

impl LogFile {
    /// Open (creating if needed) for append. Failing here means the path is not writable.
    pub fn open(path: &Path) -> Result<Self, SinkError> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|source| SinkError::LogFileUnavailable {
                path: path.to_path_buf(),
                source,
            })?;
        tracing::debug!("Log file opened: {}", path.display());
        Ok(Self {
            path: path.to_path_buf(),
            file,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn append(&mut self, lines: &[String]) -> io::Result<()> {
        for line in lines {
            writeln!(self.file, "{}", line)?;
        }
        self.file.flush()
    }
}

pub struct EventSink<W: Write> {
    console: W,
    log_file: Option<LogFile>,
}

impl EventSink<io::Stdout> {
    pub fn stdout(log_file: Option<LogFile>) -> Self {
        Self::new(io::stdout(), log_file)
    }
}

impl<W: Write> EventSink<W> {
    pub fn new(console: W, log_file: Option<LogFile>) -> Self {
        Self { console, log_file }
    }

    /// Session banner: two separators (file only) and the commencing line.
    pub fn commencing(&mut self, at: &DateTime<Local>, interval: PollingInterval) {
        let line = commencing_line(at, interval);
        self.print(std::slice::from_ref(&line));
        self.append(&[SEPARATOR.to_string(), SEPARATOR.to_string(), line]);
    }

    pub fn outage(&mut self, event: &OutageEvent) {
        let lines = render(event);
        self.print(&lines);
        self.append(&lines);
    }

    pub fn stopped(&mut self, at: &DateTime<Local>) {
        let lines = [stopped_line(at)];
        self.print(&lines);
        self.append(&lines);
    }

    #[cfg(test)]
    pub fn into_console(self) -> W {
        self.console
    }

    fn print(&mut self, lines: &[String]) {
        let result = lines
            .iter()
            .try_for_each(|line| writeln!(self.console, "{}", line))
            .and_then(|()| self.console.flush());
        if let Err(e) = result {
            tracing::warn!("Failed to write to console: {}", e);
        }
    }

    fn append(&mut self, lines: &[String]) {
        if let Some(log_file) = self.log_file.as_mut() {
            if let Err(e) = log_file.append(lines) {
                tracing::warn!(
                    "Failed to write to log file {}: {}",
                    log_file.path().display(),
                    e
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeDelta, TimeZone};

    fn at(h: u32, m: u32, s: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 9, h, m, s).unwrap()
    }

    #[test]
    fn test_render_outage_lines() {
        let started_at = at(10, 0, 0);
        let ended_at = started_at + TimeDelta::seconds(90);
        assert_eq!(
            render(&OutageEvent::Started { at: started_at }),
            vec!["-------Internet Connection unavailable at : 2024-03-09 10:00:00"]
        );
        assert_eq!(
            render(&OutageEvent::StillDown { at: ended_at }),
            vec!["-----------Internet Connection still unavailable at : 2024-03-09 10:01:30"]
        );
        assert_eq!(
            render(&OutageEvent::Ended {
                started_at,
                ended_at,
                duration: "0:01:30".to_string(),
            }),
            vec![
                "-------Internet Connection restored at    : 2024-03-09 10:01:30",
                "-------The duration of the downtime was   :             0:01:30",
            ]
        );
    }

    #[test]
    fn test_log_file_is_appended_not_truncated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("monitor.log");
        std::fs::write(&path, "previous session\n").unwrap();

        let log_file = LogFile::open(&path).unwrap();
        let mut sink = EventSink::new(Vec::new(), Some(log_file));
        sink.commencing(&at(8, 0, 0), PollingInterval::new(5).unwrap());
        sink.outage(&OutageEvent::Started { at: at(8, 0, 5) });
        sink.stopped(&at(8, 0, 9));

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = contents.lines().collect();
        assert_eq!(
            lines,
            vec![
                "previous session",
                SEPARATOR,
                SEPARATOR,
                "Monitoring Internet Connection commencing : 2024-03-09 08:00:00 polling every 5 second(s)",
                "-------Internet Connection unavailable at : 2024-03-09 08:00:05",
                "Monitoring Internet Connection stopped at : 2024-03-09 08:00:09",
            ]
        );

        // separators are not printed on the console
        let console = String::from_utf8(sink.into_console()).unwrap();
        assert_eq!(console.lines().count(), 3);
        assert!(!console.contains(SEPARATOR));
    }

    #[test]
    fn test_unwritable_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("monitor.log");
        let err = LogFile::open(&path).unwrap_err();
        assert!(matches!(err, SinkError::LogFileUnavailable { ref path, .. } if path.ends_with("monitor.log")));
    }

    #[test]
    fn test_console_only_sink() {
        let mut sink = EventSink::new(Vec::new(), None);
        sink.stopped(&at(23, 59, 59));
        let console = String::from_utf8(sink.into_console()).unwrap();
        assert_eq!(
            console,
            "Monitoring Internet Connection stopped at : 2024-03-09 23:59:59\n"
        );
    }
}
