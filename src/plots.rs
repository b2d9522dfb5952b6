//! Live plot registry.
//!
//! One keyed registry holds every live plot as a single [`PlotEntry`]
//! record (series, buffer size, axes, data source, running flag) so the
//! title key can never diverge across parallel maps. File-backed entries
//! refresh by re-tailing their CSV and re-extracting; derived entries
//! refresh by subtracting two sibling entries' currently drawn series.
//! The embedded [`PollScheduler`] owns per-entry tick phase; `tick(now)`
//! runs every due refresh on the calling (UI) thread.
//!
//! Failures stay local to one entry: a missing source file skips that
//! refresh (previous series stays frozen on screen) and never stops
//! another plot's ticking.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use chrono::Local;
use thiserror::Error;

use crate::extract::{self, Datatype, ExtractError};
use crate::scheduler::PollScheduler;
use crate::series::PlotSeries;
use crate::tail;

/// Axis labeling for a plot: a quantity label plus its unit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Axis {
    pub label: String,
    pub unit: String,
}

impl Axis {
    pub fn new(label: impl Into<String>, unit: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            unit: unit.into(),
        }
    }

    /// Combined axis text, e.g. `Pressure (Torr)`.
    pub fn text(&self) -> String {
        format!("{} ({})", self.label, self.unit)
    }
}

/// Where a plot's data comes from on each refresh.
#[derive(Clone, Debug)]
pub enum PlotSource {
    /// Tail a CSV log and extract one datatype from the window.
    File { path: PathBuf, datatype: Datatype },
    /// Subtract two sibling plots' current series (source2 - source1);
    /// no file backing of its own.
    Derived { source1: String, source2: String },
}

/// One live plot: identity, axes, window state, and source. The title is
/// the primary key across the registry and the scheduler.
#[derive(Clone, Debug)]
pub struct PlotEntry {
    pub title: String,
    pub x_axis: Axis,
    pub y_axis: Axis,
    /// Rows requested per refresh. Mutable at runtime; takes effect at the
    /// next refresh or stop/start cycle, never by in-place resize.
    pub buffer_size: usize,
    pub source: PlotSource,
    pub series: PlotSeries,
    pub running: bool,
    /// Why the latest refresh was skipped, if it was. Cleared on success.
    pub last_error: Option<String>,
}

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("a plot titled {0:?} is already registered")]
    DuplicateTitle(String),
    #[error("no plot titled {0:?} is registered")]
    UnknownTitle(String),
    #[error("derived plot {title:?} references unregistered source plot {missing:?}")]
    UnknownSource { title: String, missing: String },
    #[error(transparent)]
    UnsupportedDatatype(#[from] ExtractError),
}

/// Registry of all live plots plus their shared poll scheduler.
#[derive(Debug, Default)]
pub struct LivePlots {
    entries: Vec<PlotEntry>,
    scheduler: PollScheduler,
}

impl LivePlots {
    pub fn new() -> Self {
        Self::default()
    }

    fn index_of(&self, title: &str) -> Option<usize> {
        self.entries.iter().position(|entry| entry.title == title)
    }

    /// Register a file-backed plot. The datatype tag is resolved here so a
    /// typo fails fast, before any polling starts. The new entry holds an
    /// all-missing series of full buffer length and is not yet running.
    #[allow(clippy::too_many_arguments)]
    pub fn register(
        &mut self,
        title: &str,
        x_axis: Axis,
        y_axis: Axis,
        buffer_size: usize,
        path: impl Into<PathBuf>,
        datatype_tag: &str,
        poll_interval: Duration,
    ) -> Result<(), RegistryError> {
        if self.index_of(title).is_some() {
            return Err(RegistryError::DuplicateTitle(title.to_string()));
        }
        let datatype = Datatype::from_tag(datatype_tag)?;
        let path = path.into();
        tracing::info!(
            "registered plot {:?} ({} from {})",
            title,
            datatype.tag(),
            path.display()
        );
        self.entries.push(PlotEntry {
            title: title.to_string(),
            x_axis,
            y_axis,
            buffer_size,
            source: PlotSource::File { path, datatype },
            series: PlotSeries::all_missing(buffer_size),
            running: false,
            last_error: None,
        });
        self.scheduler.insert(title, poll_interval);
        Ok(())
    }

    /// Register a derived subtraction plot over two already-registered
    /// sources. Registration order enforces the "sources first" rule: a
    /// derived entry can never tick before both sources exist.
    #[allow(clippy::too_many_arguments)]
    pub fn register_derived(
        &mut self,
        title: &str,
        x_axis: Axis,
        y_axis: Axis,
        buffer_size: usize,
        source1: &str,
        source2: &str,
        poll_interval: Duration,
    ) -> Result<(), RegistryError> {
        if self.index_of(title).is_some() {
            return Err(RegistryError::DuplicateTitle(title.to_string()));
        }
        for source in [source1, source2] {
            if self.index_of(source).is_none() {
                return Err(RegistryError::UnknownSource {
                    title: title.to_string(),
                    missing: source.to_string(),
                });
            }
        }
        tracing::info!(
            "registered derived plot {:?} ({} - {})",
            title,
            source2,
            source1
        );
        self.entries.push(PlotEntry {
            title: title.to_string(),
            x_axis,
            y_axis,
            buffer_size,
            source: PlotSource::Derived {
                source1: source1.to_string(),
                source2: source2.to_string(),
            },
            series: PlotSeries::all_missing(buffer_size),
            running: false,
            last_error: None,
        });
        self.scheduler.insert(title, poll_interval);
        Ok(())
    }

    /// Start ticking a plot. A stopped entry comes back with a fresh
    /// all-missing series at the *current* buffer size and a reset elapsed
    /// origin; starting a running entry is a no-op.
    pub fn start(&mut self, title: &str, now: Instant) -> Result<(), RegistryError> {
        let index = self
            .index_of(title)
            .ok_or_else(|| RegistryError::UnknownTitle(title.to_string()))?;
        let entry = &mut self.entries[index];
        if entry.running {
            return Ok(());
        }
        entry.series = PlotSeries::all_missing(entry.buffer_size);
        entry.running = true;
        entry.last_error = None;
        self.scheduler.start(title, now);
        tracing::info!("started plot {:?}", title);
        Ok(())
    }

    /// Stop ticking a plot, leaving its last-drawn series frozen on
    /// screen. Stopping a stopped entry is a no-op.
    pub fn stop(&mut self, title: &str) -> Result<(), RegistryError> {
        let index = self
            .index_of(title)
            .ok_or_else(|| RegistryError::UnknownTitle(title.to_string()))?;
        let entry = &mut self.entries[index];
        if !entry.running {
            return Ok(());
        }
        entry.running = false;
        self.scheduler.stop(title);
        tracing::info!("stopped plot {:?}", title);
        Ok(())
    }

    pub fn is_running(&self, title: &str) -> bool {
        self.index_of(title)
            .map(|index| self.entries[index].running)
            .unwrap_or(false)
    }

    /// Change one plot's buffer size. Lazy by design: the live series is
    /// untouched until the next refresh or stop/start cycle.
    pub fn set_buffer_size(&mut self, title: &str, buffer_size: usize) -> Result<(), RegistryError> {
        let index = self
            .index_of(title)
            .ok_or_else(|| RegistryError::UnknownTitle(title.to_string()))?;
        self.entries[index].buffer_size = buffer_size;
        Ok(())
    }

    /// Change several plots' buffer sizes at once. Validates every title
    /// first so a typo cannot leave the set half-applied.
    pub fn set_buffer_size_all(
        &mut self,
        titles: &[&str],
        buffer_size: usize,
    ) -> Result<(), RegistryError> {
        for title in titles {
            if self.index_of(title).is_none() {
                return Err(RegistryError::UnknownTitle(title.to_string()));
            }
        }
        for title in titles {
            self.set_buffer_size(title, buffer_size)?;
        }
        Ok(())
    }

    /// Time since a plot was last started, if it is running.
    pub fn elapsed(&self, title: &str, now: Instant) -> Option<Duration> {
        self.scheduler.elapsed(title, now)
    }

    pub fn entry(&self, title: &str) -> Option<&PlotEntry> {
        self.index_of(title).map(|index| &self.entries[index])
    }

    pub fn series(&self, title: &str) -> Option<&PlotSeries> {
        self.entry(title).map(|entry| &entry.series)
    }

    /// All entries in registration order (the order the UI lays them out).
    pub fn entries(&self) -> &[PlotEntry] {
        &self.entries
    }

    pub fn titles(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.title.as_str())
    }

    /// Earliest pending poll deadline, for repaint pacing.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.scheduler.next_deadline()
    }

    /// Run every refresh whose deadline has passed. Refreshes execute
    /// sequentially on the calling thread; one entry's failure is recorded
    /// on that entry and the loop moves on.
    pub fn tick(&mut self, now: Instant) {
        for title in self.scheduler.due(now) {
            if let Some(index) = self.index_of(&title) {
                self.refresh(index);
            }
        }
    }

    fn refresh(&mut self, index: usize) {
        let source = self.entries[index].source.clone();
        match source {
            PlotSource::File { path, datatype } => {
                let buffer_size = self.entries[index].buffer_size;
                match tail::tail(&path, buffer_size) {
                    Ok(window) => {
                        // Ages are computed against the instant of this
                        // read; the same row drifts on every poll.
                        let now = Local::now().naive_local();
                        let entry = &mut self.entries[index];
                        entry.series = extract::extract(&window, datatype, now);
                        entry.last_error = None;
                    }
                    Err(e) => {
                        let entry = &mut self.entries[index];
                        tracing::warn!("skipping refresh of {:?}: {}", entry.title, e);
                        entry.last_error = Some(e.to_string());
                    }
                }
            }
            PlotSource::Derived { source1, source2 } => {
                let difference = match (self.series(&source1), self.series(&source2)) {
                    (Some(s1), Some(s2)) => PlotSeries::tail_difference(s1, s2),
                    _ => {
                        let entry = &mut self.entries[index];
                        tracing::warn!(
                            "skipping refresh of derived plot {:?}: source missing",
                            entry.title
                        );
                        entry.last_error = Some("source plot missing".to_string());
                        return;
                    }
                };
                let entry = &mut self.entries[index];
                entry.series = difference;
                entry.last_error = None;
            }
        }
    }
}
