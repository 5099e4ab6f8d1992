//! # octosonar
//!
//! A Rust driver for the Octosonar, an I²C board that multiplexes eight
//! HC-SR04 class ultrasonic sensors onto one PCF8574 expander and a single
//! shared interrupt (INT) line.
//!
//! Each measurement selects one channel over I²C, which fires that sensor's
//! trigger; the board then raises INT for as long as the echo takes to come
//! back. The driver times the pulse from GPIO edge notifications and turns
//! the width into a distance.
//!
//! ## Features
//!
//! *   Hardware independent core: bring any [`Transport`] (I²C) and
//!     [`EdgeNotifier`] (GPIO edge callbacks with microsecond ticks).
//! *   Raw reads (`read_raw`) returning the pulse width or [`Reading::Timeout`].
//! *   Distance reads in centimetres (`read_cm`) and inches (`read_inch`).
//! *   Full sweep of all eight channels (`sweep_cm`).
//! *   Echo timeout derived from the configured maximum range.
//! *   Deterministic teardown: `cancel()` is idempotent and runs on drop.
//! *   Raspberry Pi backend on top of `rppal` (feature `rpi`).
//!
//! ## Installation
//!
//! ```toml
//! [dependencies]
//! octosonar = { version = "0.1.0", features = ["rpi"] }
//! log = "0.4"          # Optional, for logging
//! ```
//!
//! ## Basic Usage
//!
//! ```ignore
//! use octosonar::{rpi, OctosonarConfig, Result};
//!
//! fn main() -> Result<()> {
//!     env_logger::init();
//!
//!     // Bus 1, INT on GPIO 25, board at the default 0x3D, 400 cm range
//!     let mut sonar = rpi::setup(OctosonarConfig::new(1, 25))?;
//!
//!     match sonar.read_cm(0)? {
//!         Some(cm) => println!("Channel 0: {:.1} cm", cm),
//!         None => println!("Channel 0: timed out"),
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Timing model
//!
//! The first INT edge after a trigger starts the pulse and the second ends
//! it; polarity is ignored. Edges beyond the second are dropped until the
//! next trigger. The wait for the second edge polls every `poll_interval`
//! (1 ms by default) and gives up after the round-trip time of sound over
//! `max_range_cm`.
//!
//! Only one ping can be in flight because all sensors share INT. The driver
//! enforces this by taking `&mut self` for every read.
//!
//! ## Hardware Setup Notes
//!
//! *   Enable I²C (`raspi-config`) and make sure the user can open `/dev/i2c-1`
//!     and `/dev/gpiomem`.
//! *   INT is 5 V on some board revisions; level shift it before the Pi's GPIO.
//!
//! ## License
//!
//! MIT.

mod consts;
mod error;
pub mod channel;
pub mod config;
pub mod convert;
pub mod edge;
pub mod notifier;
pub mod sonar;
pub mod transport;

#[cfg(feature = "rpi")]
pub mod rpi;

pub use channel::Channel;
pub use config::OctosonarConfig;
pub use convert::{micros_to_cm, micros_to_inch, Reading};
pub use error::{Error, Result};
pub use notifier::{EdgeCallback, EdgeEvent, EdgeNotifier, Level, Registration, Tick};
pub use sonar::Octosonar;
pub use transport::{trigger_sequence, DeviceHandle, Transport, ZipStep};
// Re-export only essential public constants
pub use consts::{
    CHANNEL_COUNT, DEFAULT_ADDRESS, DEFAULT_BUS, DEFAULT_MAX_RANGE_CM, SPEED_OF_SOUND_IN_PER_S,
    SPEED_OF_SOUND_M_PER_S,
};
