use thiserror::Error;

/// Errors that can occur when driving an Octosonar board.
///
/// A missing echo is not an error: `read_raw` reports it as
/// [`Reading::Timeout`](crate::Reading::Timeout).
#[derive(Error, Debug)]
pub enum Error {
    /// The I2C bus or device address could not be opened.
    #[error("I2C bus {bus} address 0x{address:02X} unavailable: {message}")]
    TransportUnavailable {
        /// The bus that was requested.
        bus: u8,
        /// The 7-bit device address that was requested.
        address: u8,
        /// Details reported by the transport.
        message: String,
    },
    /// Setting the interrupt pin to input or registering the edge callback failed.
    #[error("GPIO {pin} configuration failed: {message}")]
    GpioConfigurationFailed {
        /// The interrupt pin being configured.
        pin: u8,
        /// Details reported by the edge notifier.
        message: String,
    },
    /// Channel number is outside 0-7.
    #[error("Channel {0} out of range (0-7)")]
    InvalidChannel(u8),
    /// A write or transaction failed on an open bus.
    #[error("I2C transport error: {0}")]
    Transport(String),
    /// An edge notifier operation failed after setup.
    #[error("GPIO error: {0}")]
    Gpio(String),
    /// The driver was cancelled; its device handle is gone.
    #[error("Device handle is closed")]
    HandleClosed,
    /// A configuration value is outside its valid range.
    #[error("Argument out of range: {0}")]
    ArgumentOutOfRange(String),
    /// Error from the rppal I2C layer.
    #[cfg(feature = "rpi")]
    #[error("rppal I2C error: {0}")]
    I2c(#[from] rppal::i2c::Error),
    /// Error from the rppal GPIO layer.
    #[cfg(feature = "rpi")]
    #[error("rppal GPIO error: {0}")]
    RppalGpio(#[from] rppal::gpio::Error),
}

/// Result type alias for Octosonar operations.
pub type Result<T> = std::result::Result<T, Error>;
