//! USB subsystem
//!
//! Finds the robot on the bus and delivers one command to it:
//! - [`backend`]: libusb implementation of the bus traits
//! - [`locator`]: first-match device search
//! - [`sender`]: scoped interface claim and the control transfer

pub mod backend;
pub mod locator;
pub mod sender;

pub use backend::{LibusbBus, LibusbHandle};
pub use locator::find_device;
pub use sender::{ClaimedRobot, SendOptions, send_command};
