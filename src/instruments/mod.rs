//! Serial instrument drivers for the rig.
//!
//! Two devices hang off the logging side: an MKS PDR2000 pressure readout
//! (plain-text command/reply) and a Brooks GF100 mass flow controller
//! (binary framed packets). Framing and decoding are plain functions so
//! they test without hardware; the structs own the port and the timing.
//!
//! Errors split into two classes. Transport errors (the port vanished,
//! the OS refused the write) end the logging run. Protocol faults (NAK,
//! bad checksum, short or garbled reply) are a property of one exchange;
//! [`InstrumentError::is_fault`] picks them out so the loggers can record
//! a fault row and keep going.

use std::io;

use thiserror::Error;

pub mod gf100;
pub mod pdr2000;

#[derive(Debug, Error)]
pub enum InstrumentError {
    #[error("serial port error: {0}")]
    Port(#[from] serialport::Error),
    #[error("serial I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("controller rejected the request (NAK)")]
    Nak,
    #[error("controller acknowledged the request but the write failed")]
    WriteFault,
    #[error("reply checksum mismatch (computed {computed:#04x}, reported {reported:#04x})")]
    Checksum { computed: u8, reported: u8 },
    #[error("short reply: got {got} of {wanted} bytes")]
    ShortReply { got: usize, wanted: usize },
    #[error("unexpected reply status {0:#04x}")]
    UnexpectedStatus(u8),
}

impl InstrumentError {
    /// True for faults scoped to a single exchange. The loggers log a
    /// fault row for these and keep polling; transport errors are fatal.
    pub fn is_fault(&self) -> bool {
        matches!(
            self,
            Self::Nak
                | Self::WriteFault
                | Self::Checksum { .. }
                | Self::ShortReply { .. }
                | Self::UnexpectedStatus(_)
        )
    }
}
