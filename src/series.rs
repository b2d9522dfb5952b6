//! Missing-aware plot series.
//!
//! A [`PlotSeries`] is the rolling window behind one live plot: an ordered
//! run of (seconds-ago, value) points where the value slot is an explicit
//! `Option<f64>`. `None` means "no valid reading" (an instrument fault or
//! an unparseable cell) and is distinct from a valid reading of zero.
//! Arithmetic over series propagates `None` rather than treating it as 0.

/// One plotted point: time on the seconds-ago axis plus an optional value.
pub type SeriesPoint = (f64, Option<f64>);

/// Fixed-window series of (seconds-ago, value) points for a single plot.
///
/// The window is replaced wholesale on every refresh; it is never appended
/// to in place. A freshly registered (or restarted) plot holds an
/// all-missing series of full buffer length so the widget has a stable
/// size before the first poll lands.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlotSeries {
    points: Vec<SeriesPoint>,
}

impl PlotSeries {
    /// Series of `len` slots with every value missing.
    pub fn all_missing(len: usize) -> Self {
        Self {
            points: vec![(0.0, None); len],
        }
    }

    /// Build a series from parallel time/value columns, pairing up to the
    /// shorter of the two.
    pub fn from_columns(times: Vec<f64>, values: Vec<Option<f64>>) -> Self {
        Self {
            points: times.into_iter().zip(values).collect(),
        }
    }

    pub fn from_points(points: Vec<SeriesPoint>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[SeriesPoint] {
        &self.points
    }

    /// True when no slot holds a valid value.
    pub fn is_all_missing(&self) -> bool {
        self.points.iter().all(|(_, v)| v.is_none())
    }

    /// The trailing `n` points (all of them if the series is shorter).
    pub fn tail(&self, n: usize) -> &[SeriesPoint] {
        let start = self.points.len().saturating_sub(n);
        &self.points[start..]
    }

    /// Most recent valid point, if any.
    pub fn latest(&self) -> Option<(f64, f64)> {
        self.points
            .iter()
            .rev()
            .find_map(|&(t, v)| v.map(|v| (t, v)))
    }

    /// Contiguous runs of valid points, ready to draw as line segments.
    /// A missing slot breaks the line, producing a visible gap.
    pub fn segments(&self) -> Vec<Vec<[f64; 2]>> {
        let mut segments = Vec::new();
        let mut run: Vec<[f64; 2]> = Vec::new();
        for &(t, v) in &self.points {
            match v {
                Some(v) => run.push([t, v]),
                None => {
                    if !run.is_empty() {
                        segments.push(std::mem::take(&mut run));
                    }
                }
            }
        }
        if !run.is_empty() {
            segments.push(run);
        }
        segments
    }

    /// Pointwise difference `source2 - source1` over the aligned tails of
    /// two series.
    ///
    /// Both inputs are truncated to the trailing `min(len1, len2)` points
    /// (most recent data kept) and the result takes its time axis from
    /// `source1`'s tail. A slot is missing in the result whenever either
    /// input slot is missing.
    pub fn tail_difference(source1: &PlotSeries, source2: &PlotSeries) -> PlotSeries {
        let n = source1.len().min(source2.len());
        let points = source1
            .tail(n)
            .iter()
            .zip(source2.tail(n))
            .map(|(&(t1, v1), &(_, v2))| match (v1, v2) {
                (Some(a), Some(b)) => (t1, Some(b - a)),
                _ => (t1, None),
            })
            .collect();
        PlotSeries { points }
    }
}
