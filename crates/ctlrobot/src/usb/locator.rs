//! Device lookup
//!
//! Walks the bus once in platform order and stops at the first device whose
//! descriptor matches. With several identical devices attached the choice
//! depends on that order.

use crate::diagnostics::Diagnostics;
use common::{DeviceSummary, Error, Result, UsbBus, UsbDeviceId};
use std::io::Write;
use tracing::{debug, info, warn};

/// Find the first device matching `target`
pub fn find_device<B: UsbBus, W: Write>(
    bus: &B,
    target: UsbDeviceId,
    diagnostics: &mut Diagnostics<W>,
) -> Result<(B::Device, DeviceSummary)> {
    let devices = bus
        .devices()
        .map_err(|e| Error::Usb(format!("Failed to enumerate devices: {}", e)))?;

    debug!("Enumerated {} devices", devices.len());

    for device in devices {
        let summary = match bus.summary(&device) {
            Ok(summary) => summary,
            Err(e) => {
                warn!("Failed to read device descriptor: {}", e);
                continue;
            }
        };

        diagnostics.checking(&summary);

        if summary.id == target {
            info!(
                "Found {} at bus={}, addr={}",
                target, summary.bus_number, summary.address
            );
            return Ok((device, summary));
        }
    }

    Err(Error::DeviceNotFound(target))
}
