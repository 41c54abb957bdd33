//! Command protocol for the Dream Cheeky USB dancing robot
//!
//! The robot understands a single 8-byte output report. Only the first byte
//! carries information: the low nibble selects the movement speed and the
//! high nibble selects the LED blink pattern. Every other byte is zero.
//!
//! # Example
//!
//! ```
//! use protocol::{LedPattern, Movement, RobotCommand};
//!
//! let command = RobotCommand::new(Movement::Fast, LedPattern::Slow);
//! assert_eq!(command.byte(), 0x12);
//! assert_eq!(command.payload().as_bytes(), &[0x12, 0, 0, 0, 0, 0, 0, 0]);
//! ```
//!
//! Command line arguments are parsed leniently: anything that is not
//! `slow`, `fast` or `off` means off.
//!
//! ```
//! use protocol::{LedPattern, Movement, RobotCommand};
//!
//! let command = RobotCommand::from_args("wobble", "fast");
//! assert_eq!(command.movement, Movement::Off);
//! assert_eq!(command.leds, LedPattern::Fast);
//! ```

pub mod command;
pub mod error;
pub mod types;

pub use command::{LedPattern, Movement, PAYLOAD_LEN, Payload, RobotCommand};
pub use error::{ProtocolError, Result};
pub use types::{
    CONTROL_INTERFACE, ControlRequest, DEFAULT_TIMEOUT, DETACH_INTERFACES, ROBOT_CONFIGURATION,
    ROBOT_PRODUCT_ID, ROBOT_VENDOR_ID,
};
