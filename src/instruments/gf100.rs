//! Brooks GF100 mass flow controller driver.
//!
//! The controller speaks a framed binary protocol at 115200 8N1,
//! addressed by a MAC id. Frames carry a trailing modulo-256 checksum
//! over every byte after the address. Two exchanges are implemented:
//! writing a flow setpoint and reading the indicated flow, both
//! expressed as a percentage of the controller's full scale.
//!
//! Flow counts map linearly onto percent: 0x4000 counts is zero flow and
//! 0xC000 is full scale, so readings below zero-flow counts decode to a
//! small negative percentage rather than clamping.

use std::io::{self, Write};
use std::thread;
use std::time::Duration;

use serialport::{ClearBuffer, DataBits, Parity, SerialPort, StopBits};

use super::InstrumentError;

pub const BAUD: u32 = 115_200;
/// Factory MAC id of the rig's controller.
pub const DEFAULT_MAC_ID: u8 = 36;

const READ_TIMEOUT: Duration = Duration::from_secs(5);
const COMMAND_DELAY: Duration = Duration::from_millis(100);

const ACK: u8 = 0x06;
const NAK: u8 = 0x16;

/// Counts reported at zero flow.
const ZERO_FLOW_COUNTS: u16 = 0x4000;
/// Count span between zero flow and full scale (0xC000).
const FULL_SCALE_SPAN: u16 = 0x8000;

/// Length of the indicated-flow reply frame.
pub const FLOW_REPLY_LEN: usize = 12;

/// Modulo-256 sum, the frame checksum.
fn checksum(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0u8, |sum, b| sum.wrapping_add(*b))
}

/// Setpoint counts for a percentage of full scale. Percentages above 100
/// saturate at full scale counts.
pub fn setpoint_counts(percent: u8) -> u16 {
    let percent = u32::from(percent.min(100));
    ((u32::from(FULL_SCALE_SPAN) * percent / 100) + u32::from(ZERO_FLOW_COUNTS)) as u16
}

/// Frame a setpoint write for the given controller address.
pub fn setpoint_packet(mac_id: u8, percent: u8) -> [u8; 11] {
    let counts = setpoint_counts(percent);
    let [lsb, msb] = counts.to_le_bytes();
    let mut packet = [
        mac_id, 0x02, 0x81, 0x05, 0x69, 0x01, 0xA4, lsb, msb, 0x00, 0x00,
    ];
    packet[10] = checksum(&packet[1..10]);
    packet
}

/// Frame an indicated-flow request for the given controller address.
pub fn flow_request(mac_id: u8) -> [u8; 9] {
    let mut packet = [mac_id, 0x02, 0x80, 0x03, 0x6A, 0x01, 0xA9, 0x00, 0x00];
    packet[8] = checksum(&packet[1..8]);
    packet
}

/// Decode the two-byte setpoint acknowledgement. Success requires both
/// bytes to acknowledge: the first says the request was received, the
/// second that the write executed.
pub fn decode_setpoint_ack(reply: &[u8]) -> Result<(), InstrumentError> {
    if reply.len() < 2 {
        return Err(InstrumentError::ShortReply {
            got: reply.len(),
            wanted: 2,
        });
    }
    match (reply[0], reply[1]) {
        (ACK, ACK) => Ok(()),
        (ACK, _) => Err(InstrumentError::WriteFault),
        (NAK, _) => Err(InstrumentError::Nak),
        (status, _) => Err(InstrumentError::UnexpectedStatus(status)),
    }
}

/// Decode an indicated-flow reply into a percentage of full scale.
pub fn decode_flow_reply(reply: &[u8]) -> Result<f64, InstrumentError> {
    if reply.len() < FLOW_REPLY_LEN {
        return Err(InstrumentError::ShortReply {
            got: reply.len(),
            wanted: FLOW_REPLY_LEN,
        });
    }
    match reply[0] {
        ACK => {}
        NAK => return Err(InstrumentError::Nak),
        status => return Err(InstrumentError::UnexpectedStatus(status)),
    }
    let computed = checksum(&reply[2..10]);
    if computed != reply[11] {
        return Err(InstrumentError::Checksum {
            computed,
            reported: reply[11],
        });
    }
    let counts = u16::from_le_bytes([reply[8], reply[9]]);
    Ok((f64::from(counts) - f64::from(ZERO_FLOW_COUNTS)) * 100.0 / f64::from(FULL_SCALE_SPAN))
}

pub struct Gf100 {
    port: Box<dyn SerialPort>,
    mac_id: u8,
}

impl Gf100 {
    pub fn open(port_name: &str, mac_id: u8) -> Result<Self, InstrumentError> {
        let port = serialport::new(port_name, BAUD)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .timeout(READ_TIMEOUT)
            .open()?;
        tracing::info!("opened GF100 on {} (mac id {})", port_name, mac_id);
        Ok(Self { port, mac_id })
    }

    /// Command a new flow setpoint as a percentage of full scale.
    pub fn write_setpoint(&mut self, percent: u8) -> Result<(), InstrumentError> {
        self.port.clear(ClearBuffer::Input)?;
        self.port.write_all(&setpoint_packet(self.mac_id, percent))?;
        thread::sleep(COMMAND_DELAY);
        let mut reply = [0u8; 2];
        let got = read_reply(self.port.as_mut(), &mut reply)?;
        decode_setpoint_ack(&reply[..got])
    }

    /// Read the indicated flow as a percentage of full scale.
    pub fn indicated_flow(&mut self) -> Result<f64, InstrumentError> {
        self.port.clear(ClearBuffer::Input)?;
        self.port.write_all(&flow_request(self.mac_id))?;
        thread::sleep(COMMAND_DELAY);
        let mut reply = [0u8; FLOW_REPLY_LEN];
        let got = read_reply(self.port.as_mut(), &mut reply)?;
        decode_flow_reply(&reply[..got])
    }
}

/// Fill `buf` from the port, stopping early at the read timeout. Returns
/// how many bytes arrived; the decoders turn a short count into a fault.
fn read_reply(port: &mut dyn SerialPort, buf: &mut [u8]) -> Result<usize, InstrumentError> {
    let mut filled = 0;
    while filled < buf.len() {
        match port.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::TimedOut => break,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(filled)
}
