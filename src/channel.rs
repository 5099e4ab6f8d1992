use crate::consts::CHANNEL_COUNT;
use crate::error::{Error, Result};
use std::fmt;

/// Represents a valid Octosonar port (0-7).
/// Use `Channel::new(num)` to create.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Channel(u8);

impl Channel {
    /// Creates a new Channel, returning an error if the number is out of range (0-7).
    pub fn new(num: u8) -> Result<Self> {
        if num < CHANNEL_COUNT {
            Ok(Channel(num))
        } else {
            Err(Error::InvalidChannel(num))
        }
    }

    /// Returns the underlying port number (0-7).
    #[inline]
    pub fn number(&self) -> u8 {
        self.0
    }

    /// Returns the select bit (1 << number) written to the expander.
    #[inline]
    pub fn mask(&self) -> u8 {
        1u8 << self.0
    }

    /// All eight channels in port order.
    pub fn all() -> impl Iterator<Item = Channel> {
        (0..CHANNEL_COUNT).map(Channel)
    }
}

impl TryFrom<u8> for Channel {
    type Error = Error;

    fn try_from(num: u8) -> Result<Self> {
        Channel::new(num)
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "channel {}", self.0)
    }
}
