//! Device diagnostic output
//!
//! Plain lines on stdout, separate from tracing. Enabled by default and
//! switched off with `--quiet` or `debug = false`. Output is best effort: a
//! failed write never stops the command from being sent.

use common::DeviceSummary;
use std::io::{self, Write};
use tracing::debug;

pub struct Diagnostics<W> {
    enabled: bool,
    out: W,
}

impl Diagnostics<io::Stdout> {
    pub fn stdout(enabled: bool) -> Self {
        Self::new(enabled, io::stdout())
    }
}

impl<W: Write> Diagnostics<W> {
    pub fn new(enabled: bool, out: W) -> Self {
        Self { enabled, out }
    }

    /// A device is about to be compared against the target
    pub fn checking(&mut self, device: &DeviceSummary) {
        if self.enabled {
            let result = writeln!(self.out, "Checking {}", device.id);
            Self::discard(result);
        }
    }

    /// The command byte is about to be sent
    pub fn sending(&mut self, byte: u8) {
        if self.enabled {
            let result = writeln!(self.out, "Sending 0x{:02x}", byte);
            Self::discard(result);
        }
    }

    fn discard(result: io::Result<()>) {
        if let Err(e) = result {
            debug!("Failed to write diagnostic: {}", e);
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
