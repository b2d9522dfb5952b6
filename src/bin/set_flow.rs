//! One-shot setpoint write for the Brooks GF100 controller.
//!
//! Usage: `set_flow <serial_port> <flow_percent>`
//!
//! Sends a single setpoint frame and exits. The controller must
//! double-acknowledge the write or the run fails with the decoded fault.

use anyhow::{bail, Context, Result};

use vessellog::instruments::gf100::{Gf100, DEFAULT_MAC_ID};

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.len() != 2 {
        bail!("usage: set_flow <serial_port> <flow_percent>");
    }
    let port_name = &args[0];
    let percent: u8 = args[1]
        .parse()
        .with_context(|| format!("bad flow percent {:?}", args[1]))?;
    if percent > 100 {
        bail!("flow percent must be 0-100, got {}", percent);
    }

    let mut controller = Gf100::open(port_name, DEFAULT_MAC_ID)?;
    controller.write_setpoint(percent)?;
    tracing::info!("flow setpoint changed to {}%", percent);
    Ok(())
}
