//! Datatype extraction rules.
//!
//! Turns a tailed CSV window into a plottable series for one named
//! datatype: a seconds-ago time axis derived from the `Time` column, and a
//! value axis built by that datatype's rule (column selection, fault-token
//! mapping, unit normalization). Every supported quantity is one entry in
//! the rules table: adding an instrument means adding a [`Datatype`]
//! variant and its [`DatatypeRule`], never branching in consumer code.
//!
//! Fault handling is strictly per-point: a cell that fails to parse (or an
//! instrument fault token like `Off`/`Bad`) becomes a missing value in that
//! row's slot and nothing else. Rows are never dropped for bad cells, so
//! the window stays aligned with the file.

use std::str::FromStr;

use chrono::NaiveDateTime;
use strum::{EnumString, IntoStaticStr, VariantNames};
use thiserror::Error;

use crate::series::PlotSeries;
use crate::tail::TailWindow;

// ============================================================================
// Constants
// ============================================================================

/// Wall-clock format of the `Time` column (local time, no timezone).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Pascal readings are scaled to Torr-equivalent by this factor.
pub const PASCAL_TO_TORR: f64 = 0.0075006168;

/// Bar readings are scaled to Torr-equivalent by this factor.
pub const BAR_TO_TORR: f64 = 750.06;

/// SCCM flow readings are divided by this to normalize to L/min.
pub const SCCM_PER_LPM: f64 = 1000.0;

/// Literal written by the pressure logger when a gauge reports no reading.
pub const GAUGE_FAULT_TOKEN: &str = "Off";

/// Literal written by the flow logger when the controller reply was bad.
pub const FLOW_FAULT_TOKEN: &str = "Bad";

pub const TIME_COLUMN: &str = "Time";
pub const GAUGE1_COLUMN: &str = "Gauge 1";
pub const GAUGE2_COLUMN: &str = "Gauge 2";
pub const UNITS_COLUMN: &str = "Units";
pub const INNER_PRESSURE_COLUMN: &str = "Alicat_Abs_Press_torr";
pub const FLOW_PERCENT_COLUMN: &str = "FlowPercent";
pub const FLOWRATE_COLUMN: &str = "FlowRate";
pub const FLOW_UNITS_COLUMN: &str = "FlowRateUnits";
pub const TEMPERATURE_COLUMN: &str = "Temperature";

// ============================================================================
// Datatype registry
// ============================================================================

/// Tags for the quantities the extractor knows how to derive from a log.
#[derive(
    Clone, Copy, Debug, EnumString, IntoStaticStr, PartialEq, Eq, VariantNames,
)]
#[strum(serialize_all = "snake_case")]
pub enum Datatype {
    OuterVesselPressure,
    InnerVesselPressure,
    Flowrate,
    Temperature,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractError {
    #[error(
        "unsupported datatype {tag:?}; supported types are: {}",
        Datatype::VARIANTS.join(", ")
    )]
    UnsupportedDatatype { tag: String },
}

impl Datatype {
    /// The snake_case tag used in registration and log tooling.
    pub fn tag(self) -> &'static str {
        self.into()
    }

    /// Resolve a tag string, failing fast on anything unknown so a typo is
    /// caught at registration time instead of producing empty plots.
    pub fn from_tag(tag: &str) -> Result<Self, ExtractError> {
        Self::from_str(tag).map_err(|_| ExtractError::UnsupportedDatatype {
            tag: tag.to_string(),
        })
    }

    /// The extraction rule for this datatype.
    pub fn rule(self) -> &'static DatatypeRule {
        match self {
            Datatype::OuterVesselPressure => &OUTER_VESSEL_PRESSURE_RULE,
            Datatype::InnerVesselPressure => &INNER_VESSEL_PRESSURE_RULE,
            Datatype::Flowrate => &FLOWRATE_RULE,
            Datatype::Temperature => &TEMPERATURE_RULE,
        }
    }
}

/// One entry of the datatype registry: which columns feed the value and
/// how faults and units are handled for rows of this datatype.
pub struct DatatypeRule {
    pub datatype: Datatype,
    /// Plot y-axis (label, unit) for this quantity.
    pub y_axis: (&'static str, &'static str),
    /// Header columns the rule reads, beyond the shared `Time` column.
    pub columns: &'static [&'static str],
    /// Per-row value derivation. `None` is the missing marker.
    value: fn(&TailWindow, usize) -> Option<f64>,
}

const OUTER_VESSEL_PRESSURE_RULE: DatatypeRule = DatatypeRule {
    datatype: Datatype::OuterVesselPressure,
    y_axis: ("Pressure", "Torr"),
    columns: &[GAUGE1_COLUMN, GAUGE2_COLUMN, UNITS_COLUMN],
    value: outer_vessel_pressure,
};

const INNER_VESSEL_PRESSURE_RULE: DatatypeRule = DatatypeRule {
    datatype: Datatype::InnerVesselPressure,
    y_axis: ("Pressure", "Torr"),
    columns: &[INNER_PRESSURE_COLUMN],
    value: inner_vessel_pressure,
};

const FLOWRATE_RULE: DatatypeRule = DatatypeRule {
    datatype: Datatype::Flowrate,
    y_axis: ("Flowrate", "L/min"),
    columns: &[FLOWRATE_COLUMN, FLOW_UNITS_COLUMN],
    value: flowrate,
};

const TEMPERATURE_RULE: DatatypeRule = DatatypeRule {
    datatype: Datatype::Temperature,
    y_axis: ("Temperature", "deg C"),
    columns: &[TEMPERATURE_COLUMN],
    value: temperature,
};

/// All registered rules, in tag order.
pub const RULES: [&DatatypeRule; 4] = [
    &OUTER_VESSEL_PRESSURE_RULE,
    &INNER_VESSEL_PRESSURE_RULE,
    &FLOWRATE_RULE,
    &TEMPERATURE_RULE,
];

// ============================================================================
// Extraction
// ============================================================================

/// Extract the (seconds-ago, value) series for `datatype` from a tailed
/// window, with ages computed against the caller-supplied `now`.
///
/// The result has exactly one point per window row. A row whose timestamp
/// fails to parse keeps its slot with a missing value, so bad rows never
/// shift the window.
pub fn extract(window: &TailWindow, datatype: Datatype, now: NaiveDateTime) -> PlotSeries {
    let rule = datatype.rule();
    for name in rule.columns {
        if window.column(name).is_none() {
            tracing::warn!(
                "column {:?} not found in tailed window for {}; affected points will be missing",
                name,
                datatype.tag()
            );
        }
    }

    let time_col = window.column(TIME_COLUMN);
    let points = (0..window.len())
        .map(|row| {
            let age = time_col
                .and_then(|col| window.cell(row, col))
                .and_then(|cell| seconds_ago(cell, now));
            match age {
                Some(t) => (t, (rule.value)(window, row)),
                None => (0.0, None),
            }
        })
        .collect();
    PlotSeries::from_points(points)
}

/// Signed age of a `Time` cell relative to `now`: most recent rows sit
/// closest to 0, older rows grow more negative. Recomputed on every poll,
/// never cached, so the same row drifts left as it ages.
pub fn seconds_ago(timestamp: &str, now: NaiveDateTime) -> Option<f64> {
    let parsed = NaiveDateTime::parse_from_str(timestamp.trim(), TIMESTAMP_FORMAT).ok()?;
    let elapsed = now.signed_duration_since(parsed);
    Some(-(elapsed.num_milliseconds() as f64 / 1000.0))
}

/// Pick the outer-vessel reading from the two gauges, in priority order:
/// exactly one numeric wins outright; then one positive beats one
/// non-positive; then both positive takes the minimum; anything else is
/// missing. 0.0 counts as non-positive in the sign rules.
pub fn select_gauge(gauge1: Option<f64>, gauge2: Option<f64>) -> Option<f64> {
    match (gauge1, gauge2) {
        (Some(g1), None) => Some(g1),
        (None, Some(g2)) => Some(g2),
        (Some(g1), Some(g2)) => {
            if g1 > 0.0 && g2 <= 0.0 {
                Some(g1)
            } else if g1 <= 0.0 && g2 > 0.0 {
                Some(g2)
            } else if g1 > 0.0 && g2 > 0.0 {
                Some(g1.min(g2))
            } else {
                None
            }
        }
        (None, None) => None,
    }
}

fn numeric_cell(window: &TailWindow, row: usize, column: &str) -> Option<f64> {
    window
        .column(column)
        .and_then(|col| window.cell(row, col))
        .and_then(|cell| cell.parse::<f64>().ok())
}

fn text_cell<'a>(window: &'a TailWindow, row: usize, column: &str) -> Option<&'a str> {
    window.column(column).and_then(|col| window.cell(row, col))
}

fn outer_vessel_pressure(window: &TailWindow, row: usize) -> Option<f64> {
    let units = text_cell(window, row, UNITS_COLUMN)?;
    if units == GAUGE_FAULT_TOKEN {
        // The gauge head itself is off; no selection can rescue the row.
        return None;
    }
    let selected = select_gauge(
        numeric_cell(window, row, GAUGE1_COLUMN),
        numeric_cell(window, row, GAUGE2_COLUMN),
    )?;
    let torr = match units {
        "Pascal" => selected * PASCAL_TO_TORR,
        "Bar" => selected * BAR_TO_TORR,
        _ => selected, // Torr and Arb pass through
    };
    Some(torr)
}

fn inner_vessel_pressure(window: &TailWindow, row: usize) -> Option<f64> {
    numeric_cell(window, row, INNER_PRESSURE_COLUMN)
}

fn flowrate(window: &TailWindow, row: usize) -> Option<f64> {
    let units = text_cell(window, row, FLOW_UNITS_COLUMN)?;
    if units == FLOW_FAULT_TOKEN {
        return None;
    }
    let rate = numeric_cell(window, row, FLOWRATE_COLUMN)?;
    if units == "SCCM" {
        Some(rate / SCCM_PER_LPM)
    } else {
        Some(rate)
    }
}

fn temperature(window: &TailWindow, row: usize) -> Option<f64> {
    numeric_cell(window, row, TEMPERATURE_COLUMN)
}
