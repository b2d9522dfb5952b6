//! MKS PDR2000 pressure readout driver.
//!
//! The readout speaks single-byte ASCII commands over 9600 8N1 and
//! answers with one text line. Replies are never trusted: a line that
//! does not parse reads as the `Off` marker, the same token the
//! instrument itself reports for a gauge that is switched off, so a
//! flaky reply degrades to a fault row instead of ending the run.

use std::io::{self, Write};
use std::thread;
use std::time::Duration;

use serialport::{ClearBuffer, DataBits, Parity, SerialPort, StopBits};

use super::InstrumentError;
use crate::extract::GAUGE_FAULT_TOKEN;

pub const BAUD: u32 = 9_600;
/// Device needs a beat after the port opens before it answers commands.
const SETTLE: Duration = Duration::from_secs(1);
const COMMAND_DELAY: Duration = Duration::from_millis(100);
const READ_TIMEOUT: Duration = Duration::from_secs(1);

/// Unit names the readout can report. Anything else reads as `Off`.
const KNOWN_UNITS: [&str; 4] = ["Pascal", "Torr", "Bar", "Arb"];

pub struct Pdr2000 {
    port: Box<dyn SerialPort>,
}

impl Pdr2000 {
    pub fn open(port_name: &str) -> Result<Self, InstrumentError> {
        let port = serialport::new(port_name, BAUD)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .timeout(READ_TIMEOUT)
            .open()?;
        thread::sleep(SETTLE);
        tracing::info!("opened PDR2000 on {}", port_name);
        Ok(Self { port })
    }

    /// Both gauge pressure fields, as the instrument prints them.
    pub fn read_pressure(&mut self) -> Result<(String, String), InstrumentError> {
        let line = self.command(b'p')?;
        Ok(split_pair(&line))
    }

    /// Current pressure units, validated against the known set.
    pub fn read_units(&mut self) -> Result<String, InstrumentError> {
        let line = self.command(b'u')?;
        Ok(validate_units(&line))
    }

    /// Low and high ends of the gauges' full scale range.
    pub fn read_full_scale(&mut self) -> Result<(String, String), InstrumentError> {
        let line = self.command(b'f')?;
        Ok(split_pair(&line))
    }

    fn command(&mut self, command: u8) -> Result<String, InstrumentError> {
        // Drop stale bytes from earlier replies or line noise.
        self.port.clear(ClearBuffer::Input)?;
        self.port.write_all(&[command])?;
        thread::sleep(COMMAND_DELAY);
        read_line(self.port.as_mut())
    }
}

/// Split a two-field reply. Anything else, including an empty line from a
/// timed-out read, becomes a pair of fault markers.
pub fn split_pair(line: &str) -> (String, String) {
    let mut fields = line.split_whitespace();
    match (fields.next(), fields.next(), fields.next()) {
        (Some(first), Some(second), None) => (first.to_string(), second.to_string()),
        _ => (GAUGE_FAULT_TOKEN.to_string(), GAUGE_FAULT_TOKEN.to_string()),
    }
}

/// Pass a recognized unit name through, anything else becomes `Off`.
pub fn validate_units(line: &str) -> String {
    if KNOWN_UNITS.contains(&line) {
        line.to_string()
    } else {
        GAUGE_FAULT_TOKEN.to_string()
    }
}

/// Read up to one newline-terminated line. A timeout ends the line early;
/// whatever arrived is returned trimmed, possibly empty.
fn read_line(port: &mut dyn SerialPort) -> Result<String, InstrumentError> {
    let mut raw = Vec::new();
    let mut byte = [0u8; 1];
    loop {
        match port.read(&mut byte) {
            Ok(0) => break,
            Ok(_) => {
                if byte[0] == b'\n' {
                    break;
                }
                raw.push(byte[0]);
            }
            Err(e) if e.kind() == io::ErrorKind::TimedOut => break,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(String::from_utf8_lossy(&raw).trim().to_string())
}
