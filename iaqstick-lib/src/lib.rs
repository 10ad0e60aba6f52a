//! Driver for the AppliedSensor iAQ Stick indoor air quality sensor.
//!
//! The stick reports a CO2/VOC concentration over a small framed
//! request/response protocol carried on a USB bulk endpoint pair. Commands
//! use one of two incompatible framing conventions with separate sequence
//! counters; measurement responses are decoded from a little-endian binary
//! record. [`IaqStick`] drives the device end to end, and the
//! [`Transport`](transport::Transport) trait abstracts the byte exchange so
//! the protocol can be exercised without hardware.

pub mod constants;
pub mod device;
pub mod error;
pub mod measurement;
pub mod protocol;
pub mod transport;

// Re-export the main entry points for easy access
pub use device::IaqStick;
pub use error::StickError;
pub use measurement::Measurement;
pub use transport::{Transport, UsbTransport};
