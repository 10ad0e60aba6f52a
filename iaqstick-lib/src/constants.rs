// Protocol constants for the iAQ Stick

use std::time::Duration;

/// USB vendor ID (AppliedSensor)
pub const VID: u16 = 0x03EB;

/// USB product ID (iAQ Stick)
pub const PID: u16 = 0x2013;

/// Interface carrying the bulk endpoint pair
pub const INTERFACE: u8 = 0;

/// Bulk-out endpoint for command frames
pub const ENDPOINT_OUT: u8 = 0x02;

/// Bulk-in endpoint for response packets
pub const ENDPOINT_IN: u8 = 0x81;

/// Configuration value selected at claim time
pub const CONFIGURATION: u8 = 1;

/// Alternate setting selected after claiming
pub const ALT_SETTING: u8 = 0;

/// Size of an outgoing command frame (bytes)
pub const FRAME_SIZE: usize = 16;

/// Size of a single response packet read (bytes)
pub const PACKET_SIZE: usize = 16;

/// Filler byte used for frame padding and the sync frame
pub const FILLER: u8 = b'@';

/// Initial value of the type 1 (16-bit hex) sequence counter
pub const TYPE1_SEQ_START: u16 = 0x0001;

/// Initial value of the type 2 (raw byte) sequence counter
pub const TYPE2_SEQ_START: u8 = 0x67;

/// Per-transaction timeout for bulk transfers
pub const IO_TIMEOUT: Duration = Duration::from_millis(1000);

/// Cap on packets drained per response. The device terminates a response
/// with a zero-length packet; a stream that runs past this cap is broken.
pub const MAX_RESPONSE_PACKETS: usize = 64;

/// Largest CO2/VOC reading the sensor can produce (ppm)
pub const MAX_PPM: u16 = 5000;
