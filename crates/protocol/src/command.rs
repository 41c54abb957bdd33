//! Robot command encoding
//!
//! ```text
//! bit  7 6 5 4 3 2 1 0
//!          | |     | `-- slow movement
//!          | |     `---- fast movement
//!          | `---------- LED single flash
//!          `------------ LED double flash
//! ```

use crate::error::{ProtocolError, Result};
use std::fmt;
use std::str::FromStr;

/// Length of the output report sent to the robot
pub const PAYLOAD_LEN: usize = 8;

/// Movement speed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Movement {
    #[default]
    Off,
    Slow,
    Fast,
}

impl Movement {
    /// Mask covering every movement bit
    pub const MASK: u8 = 0x03;

    /// Bits contributed to the command byte
    pub const fn bits(self) -> u8 {
        match self {
            Movement::Off => 0x00,
            Movement::Slow => 0x01,
            Movement::Fast => 0x02,
        }
    }

    /// Parse a command line argument, treating anything unrecognized as off
    pub fn from_arg(arg: &str) -> Self {
        arg.parse().unwrap_or_default()
    }
}

impl FromStr for Movement {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "off" => Ok(Movement::Off),
            "slow" => Ok(Movement::Slow),
            "fast" => Ok(Movement::Fast),
            other => Err(ProtocolError::UnknownSpeed {
                field: "movement",
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for Movement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Movement::Off => "off",
            Movement::Slow => "slow",
            Movement::Fast => "fast",
        })
    }
}

/// LED blink pattern
///
/// `Slow` is a single flash, `Fast` a double flash.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum LedPattern {
    #[default]
    Off,
    Slow,
    Fast,
}

impl LedPattern {
    /// Mask covering every LED bit
    pub const MASK: u8 = 0x30;

    /// Bits contributed to the command byte
    pub const fn bits(self) -> u8 {
        match self {
            LedPattern::Off => 0x00,
            LedPattern::Slow => 0x10,
            LedPattern::Fast => 0x20,
        }
    }

    /// Parse a command line argument, treating anything unrecognized as off
    pub fn from_arg(arg: &str) -> Self {
        arg.parse().unwrap_or_default()
    }
}

impl FromStr for LedPattern {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "off" => Ok(LedPattern::Off),
            "slow" => Ok(LedPattern::Slow),
            "fast" => Ok(LedPattern::Fast),
            other => Err(ProtocolError::UnknownSpeed {
                field: "leds",
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for LedPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LedPattern::Off => "off",
            LedPattern::Slow => "slow",
            LedPattern::Fast => "fast",
        })
    }
}

/// A complete robot command
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RobotCommand {
    pub movement: Movement,
    pub leds: LedPattern,
}

impl RobotCommand {
    pub fn new(movement: Movement, leds: LedPattern) -> Self {
        Self { movement, leds }
    }

    /// Build a command from the two positional arguments
    pub fn from_args(movement: &str, leds: &str) -> Self {
        Self::new(Movement::from_arg(movement), LedPattern::from_arg(leds))
    }

    /// Encoded command byte
    pub const fn byte(&self) -> u8 {
        self.movement.bits() | self.leds.bits()
    }

    /// Output report carrying this command
    pub fn payload(&self) -> Payload {
        Payload::from_command_byte(self.byte())
    }
}

impl fmt::Display for RobotCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "movement={} leds={}", self.movement, self.leds)
    }
}

/// Fixed-size output report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Payload([u8; PAYLOAD_LEN]);

impl Payload {
    /// Report with `byte` in position 0 and zero padding
    pub fn from_command_byte(byte: u8) -> Self {
        let mut data = [0u8; PAYLOAD_LEN];
        data[0] = byte;
        Self(data)
    }

    pub fn as_bytes(&self) -> &[u8; PAYLOAD_LEN] {
        &self.0
    }

    pub const fn len(&self) -> usize {
        PAYLOAD_LEN
    }

    pub const fn is_empty(&self) -> bool {
        false
    }
}
