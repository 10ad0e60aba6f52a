use nusb::transfer::TransferError;
use thiserror::Error;

/// The primary error type for the `iaqstick` library.
#[derive(Error, Debug)]
pub enum StickError {
    #[error("iAQ Stick not found. Is the sensor plugged in?")]
    DeviceNotFound,

    #[error("USB error: {0}")]
    Usb(#[from] nusb::Error),

    #[error("claiming interface failed: {0}")]
    Claim(#[source] nusb::Error),

    #[error("USB transfer error: {0}")]
    Transfer(#[from] TransferError),

    #[error("timeout during USB operation: {0}")]
    Timeout(#[from] tokio::time::error::Elapsed),

    #[error("response did not terminate within {packets} packets")]
    ResponseOverrun { packets: usize },

    #[error("measurement response too short: expected at least {expected} bytes, got {actual}")]
    TruncatedResponse { expected: usize, actual: usize },

    #[error("device initialization failed: {0}")]
    Init(#[source] Box<StickError>),

    #[error("interface already released")]
    Released,
}
