//! Pressure logger for the MKS PDR2000 readout.
//!
//! Usage: `log_pressure <log_file.csv> <serial_port> <interval_sec> [duration_sec]`
//!
//! Appends one `Time,Gauge 1,Gauge 2,Units` row per interval until the
//! duration lapses or the process is killed. Numeric gauge fields are
//! canonicalized through f64; a gauge that is switched off (or a garbled
//! reply) is written as the `Off` marker for the monitor to skip.

use std::path::Path;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};

use vessellog::instruments::pdr2000::Pdr2000;
use vessellog::logfile::{self, LogWriter, PRESSURE_HEADER};

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.len() < 3 {
        bail!("usage: log_pressure <log_file.csv> <serial_port> <interval_sec> [duration_sec]");
    }
    let log_path = Path::new(&args[0]);
    let port_name = &args[1];
    let interval_sec: f64 = args[2]
        .parse()
        .with_context(|| format!("bad interval {:?}", args[2]))?;
    let duration_sec: Option<f64> = match args.get(3) {
        Some(raw) => Some(
            raw.parse()
                .with_context(|| format!("bad duration {:?}", raw))?,
        ),
        None => None,
    };

    logfile::create_log_csv(log_path, &PRESSURE_HEADER)
        .with_context(|| format!("could not create {}", log_path.display()))?;
    let mut writer = LogWriter::append(log_path)?;
    let mut readout = Pdr2000::open(port_name)?;

    let interval = Duration::from_secs_f64(interval_sec);
    let started = Instant::now();

    // Loop indefinitely, or until the requested duration is up.
    while duration_sec.map_or(true, |limit| started.elapsed().as_secs_f64() < limit) {
        let (gauge1, gauge2) = readout.read_pressure()?;
        let units = readout.read_units()?;
        let timestamp = logfile::timestamp_now();

        writer.write_row(&[
            timestamp.clone(),
            numeric_or_raw(&gauge1),
            numeric_or_raw(&gauge2),
            units.clone(),
        ])?;
        tracing::info!(
            "{} - Gauge1: {}, Gauge2: {}, Units: {}",
            timestamp,
            gauge1,
            gauge2,
            units
        );
        thread::sleep(interval);
    }
    Ok(())
}

/// Numeric fields round-trip through f64 so the log holds plain floats;
/// anything else (the `Off` marker included) passes through as written.
fn numeric_or_raw(field: &str) -> String {
    match field.parse::<f64>() {
        Ok(value) => value.to_string(),
        Err(_) => field.to_string(),
    }
}
