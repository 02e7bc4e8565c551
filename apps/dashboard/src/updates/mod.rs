//! The update registry: pending refreshes ordered by fire time.
//!
//! This is the cooperative scheduler. Nothing runs in the background:
//! `poll` is called at the start of every request, drains the entries whose
//! fire time has elapsed, and hands them back so the caller executes the
//! refreshes on the request that observed them due. Repeating entries are
//! re-enqueued exactly 24 hours after their previous fire time.

use chrono::{DateTime, Duration, Local, NaiveTime};
use thiserror::Error;
use tracing::info;

/// Which refresh work a pending update carries. Stored as plain data; the
/// request handler maps it to the actual client calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshKind {
    Covid,
    News,
    Both,
}

impl RefreshKind {
    pub fn refreshes_covid(self) -> bool {
        matches!(self, RefreshKind::Covid | RefreshKind::Both)
    }

    pub fn refreshes_news(self) -> bool {
        matches!(self, RefreshKind::News | RefreshKind::Both)
    }

    fn describe(self) -> &'static str {
        match self {
            RefreshKind::Covid => "Covid update at",
            RefreshKind::News => "News update at",
            RefreshKind::Both => "Covid and news update at",
        }
    }
}

/// A scheduled future refresh with a user-visible label.
#[derive(Debug, Clone)]
pub struct PendingUpdate {
    /// Unique key within the registry; duplicates are rejected at creation.
    pub label: String,
    /// Display text fixed at creation time.
    pub content: String,
    pub fire_at: DateTime<Local>,
    pub repeat: bool,
    pub kind: RefreshKind,
}

#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("an update named '{0}' already exists")]
    DuplicateLabel(String),

    #[error("'{input}' is not a valid HH:MM time")]
    InvalidTime { input: String },
}

/// Seconds until the next occurrence of a wall-clock time. If the moment has
/// already passed today the target wraps to tomorrow, so the result is never
/// negative.
pub fn seconds_until(now: DateTime<Local>, time_of_day: NaiveTime) -> i64 {
    let now = now.naive_local();
    let mut target = now.date().and_time(time_of_day);
    if target <= now {
        target = target + Duration::hours(24);
    }
    (target - now).num_seconds()
}

fn format_countdown(total_seconds: i64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    format!("{hours}:{minutes:02}:{seconds:02}")
}

#[derive(Debug, Default)]
pub struct UpdateRegistry {
    /// Kept sorted ascending by fire time after every mutation. The sort is
    /// stable, so equal fire times keep insertion order.
    entries: Vec<PendingUpdate>,
}

impl UpdateRegistry {
    /// Creates a pending update firing at the next occurrence of
    /// `time_input` (HH:MM). A label collision leaves the registry unchanged.
    pub fn schedule(
        &mut self,
        label: &str,
        time_input: &str,
        repeat: bool,
        kind: RefreshKind,
        now: DateTime<Local>,
    ) -> Result<(), ScheduleError> {
        let time_of_day = NaiveTime::parse_from_str(time_input, "%H:%M").map_err(|_| {
            ScheduleError::InvalidTime {
                input: time_input.to_string(),
            }
        })?;

        if self.entries.iter().any(|e| e.label == label) {
            return Err(ScheduleError::DuplicateLabel(label.to_string()));
        }

        let delta = seconds_until(now, time_of_day);
        let content = format!(
            "{}{} {} (in {})",
            if repeat { "Repeated " } else { "" },
            kind.describe(),
            time_input,
            format_countdown(delta),
        );

        info!("queuing update '{label}' in {delta}s");
        self.entries.push(PendingUpdate {
            label: label.to_string(),
            content,
            fire_at: now + Duration::seconds(delta),
            repeat,
            kind,
        });
        self.entries.sort_by_key(|e| e.fire_at);
        Ok(())
    }

    /// Drains every entry whose fire time has elapsed, in fire-time order.
    /// Repeating entries stay registered with their fire time advanced by
    /// 24 hours; one-shot entries are removed.
    pub fn poll(&mut self, now: DateTime<Local>) -> Vec<PendingUpdate> {
        let mut fired = Vec::new();
        let mut remaining = Vec::with_capacity(self.entries.len());

        for mut entry in self.entries.drain(..) {
            if entry.fire_at > now {
                remaining.push(entry);
                continue;
            }
            fired.push(entry.clone());
            if entry.repeat {
                info!("update '{}' will repeat in 24 hours", entry.label);
                entry.fire_at = entry.fire_at + Duration::hours(24);
                remaining.push(entry);
            } else {
                info!("update '{}' has run and been removed", entry.label);
            }
        }

        self.entries = remaining;
        self.entries.sort_by_key(|e| e.fire_at);
        fired
    }

    /// Removes the first entry whose label matches. Unknown labels are a
    /// silent no-op.
    pub fn cancel(&mut self, label: &str) -> bool {
        match self.entries.iter().position(|e| e.label == label) {
            Some(pos) => {
                self.entries.remove(pos);
                info!("update '{label}' cancelled");
                true
            }
            None => false,
        }
    }

    /// Pending entries ascending by time until fire.
    pub fn entries(&self) -> &[PendingUpdate] {
        &self.entries
    }
}
