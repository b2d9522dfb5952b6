//! Gas flow logger for the Brooks GF100 controller.
//!
//! Usage: `log_flow <log_file.csv> <serial_port> <interval_sec> [duration_sec]`
//!
//! Appends one `Time,FlowPercent,FlowRate,FlowRateUnits` row per
//! interval, converting indicated percent of full scale into a flowrate
//! in L/min. A protocol fault (NAK, bad checksum, short reply) writes a
//! `Bad` row and keeps logging; a transport error ends the run.

use std::path::Path;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};

use vessellog::extract::FLOW_FAULT_TOKEN;
use vessellog::instruments::gf100::{Gf100, DEFAULT_MAC_ID};
use vessellog::logfile::{self, LogWriter, FLOW_HEADER};
use vessellog::state::{FLOW_UNITS, MAX_FLOW_LPM};

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.len() < 3 {
        bail!("usage: log_flow <log_file.csv> <serial_port> <interval_sec> [duration_sec]");
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

    logfile::create_log_csv(log_path, &FLOW_HEADER)
        .with_context(|| format!("could not create {}", log_path.display()))?;
    let mut writer = LogWriter::append(log_path)?;
    let mut controller = Gf100::open(port_name, DEFAULT_MAC_ID)?;

    let interval = Duration::from_secs_f64(interval_sec);
    let started = Instant::now();

    // Loop indefinitely, or until the requested duration is up.
    while duration_sec.map_or(true, |limit| started.elapsed().as_secs_f64() < limit) {
        let (percent_field, rate_field) = match controller.indicated_flow() {
            Ok(percent) => {
                let rate = MAX_FLOW_LPM * percent / 100.0;
                (percent.to_string(), rate.to_string())
            }
            Err(e) if e.is_fault() => {
                tracing::warn!("flow read fault: {}", e);
                (FLOW_FAULT_TOKEN.to_string(), FLOW_FAULT_TOKEN.to_string())
            }
            Err(e) => return Err(e.into()),
        };
        let timestamp = logfile::timestamp_now();

        writer.write_row(&[
            timestamp.clone(),
            percent_field.clone(),
            rate_field.clone(),
            FLOW_UNITS.to_string(),
        ])?;
        tracing::info!(
            "{} - Flow Percent: {}%, Flow Rate: {} {}",
            timestamp,
            percent_field,
            rate_field,
            FLOW_UNITS
        );
        thread::sleep(interval);
    }
    Ok(())
}
