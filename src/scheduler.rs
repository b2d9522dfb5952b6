//! Shared poll scheduler.
//!
//! One scheduler carries the tick phase for every live plot instead of one
//! timer object per plot: each entry keeps its own interval, next-due
//! deadline, and start origin, all keyed by plot title. The owner drives it
//! from the UI thread by asking [`PollScheduler::due`] once per frame;
//! ticks therefore never interleave and each refresh runs to completion
//! before the next is dispatched.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

/// Per-title tick bookkeeping. A stopped entry keeps its interval but has
/// no deadline and no start origin.
#[derive(Clone, Copy, Debug)]
struct TickEntry {
    interval: Duration,
    next_due: Option<Instant>,
    started_at: Option<Instant>,
}

/// Title-keyed poll phases for all registered plots.
#[derive(Debug, Default)]
pub struct PollScheduler {
    entries: BTreeMap<String, TickEntry>,
}

impl PollScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a title with its poll interval, initially stopped.
    pub fn insert(&mut self, title: &str, interval: Duration) {
        self.entries.insert(
            title.to_string(),
            TickEntry {
                interval,
                next_due: None,
                started_at: None,
            },
        );
    }

    /// Begin ticking `title`. The first tick lands one interval after
    /// `now`. Starting an already-running entry is a no-op and keeps its
    /// existing phase.
    pub fn start(&mut self, title: &str, now: Instant) {
        if let Some(entry) = self.entries.get_mut(title) {
            if entry.next_due.is_none() {
                entry.next_due = Some(now + entry.interval);
                entry.started_at = Some(now);
            }
        }
    }

    /// Halt future ticks for `title`. Stopping a stopped entry is a no-op.
    pub fn stop(&mut self, title: &str) {
        if let Some(entry) = self.entries.get_mut(title) {
            entry.next_due = None;
            entry.started_at = None;
        }
    }

    pub fn is_running(&self, title: &str) -> bool {
        self.entries
            .get(title)
            .is_some_and(|entry| entry.next_due.is_some())
    }

    pub fn interval(&self, title: &str) -> Option<Duration> {
        self.entries.get(title).map(|entry| entry.interval)
    }

    /// Time since `title` was last started, if it is running.
    pub fn elapsed(&self, title: &str, now: Instant) -> Option<Duration> {
        let started = self.entries.get(title)?.started_at?;
        Some(now.saturating_duration_since(started))
    }

    /// Titles whose deadline has passed, re-phased from `now`.
    ///
    /// A backlog of overdue intervals (UI thread stalled) collapses into a
    /// single tick: refreshes replace the whole window wholesale, so
    /// catch-up ticks would only repeat identical work.
    pub fn due(&mut self, now: Instant) -> Vec<String> {
        let mut due = Vec::new();
        for (title, entry) in &mut self.entries {
            if let Some(deadline) = entry.next_due {
                if deadline <= now {
                    entry.next_due = Some(now + entry.interval);
                    due.push(title.clone());
                }
            }
        }
        due
    }

    /// Earliest pending deadline across all running entries, for repaint
    /// pacing.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.entries
            .values()
            .filter_map(|entry| entry.next_due)
            .min()
    }
}
