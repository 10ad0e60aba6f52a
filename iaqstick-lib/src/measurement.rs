use serde::Serialize;
use std::fmt;
use zerocopy::byteorder::little_endian::{U16, U32};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

use crate::constants::MAX_PPM;
use crate::error::StickError;

/// Wire layout of a `*TR` measurement response.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, KnownLayout, Immutable, Unaligned)]
#[repr(C)]
pub struct MeasurementRaw {
    pub status: U16,         // leading bytes, meaning unknown
    pub co2_ppm: U16,        // CO2/VOC level in ppm
    pub debug_code: U16,     // firmware debug channel
    pub pwm: u8,             // heater PWM duty
    pub rh_raw: u8,          // relative humidity, 0.01 % units
    pub resistance_ohm: U32, // sensor element resistance
}

/// A decoded measurement.
///
/// Only the CO2/VOC level is guaranteed; the remaining channels are filled
/// when the device returns the full record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Measurement {
    pub co2_ppm: u16,
    pub debug_code: Option<u16>,
    pub pwm: Option<u8>,
    pub humidity_pct: Option<f64>,
    pub resistance_ohm: Option<u32>,
}

impl Measurement {
    /// Unit of the primary reading.
    pub const UNIT: &'static str = "ppm";

    /// Decode a measurement from a raw `*TR` response.
    pub fn from_response(bytes: &[u8]) -> Result<Self, StickError> {
        if let Ok((raw, _rest)) = MeasurementRaw::ref_from_prefix(bytes) {
            return Ok(Measurement {
                co2_ppm: raw.co2_ppm.get(),
                debug_code: Some(raw.debug_code.get()),
                pwm: Some(raw.pwm),
                humidity_pct: Some(raw.rh_raw as f64 * 0.01),
                resistance_ohm: Some(raw.resistance_ohm.get()),
            });
        }

        // Short responses still carry the ppm field at offset 2.
        if bytes.len() < 4 {
            return Err(StickError::TruncatedResponse {
                expected: 4,
                actual: bytes.len(),
            });
        }
        Ok(Measurement {
            co2_ppm: u16::from_le_bytes([bytes[2], bytes[3]]),
            debug_code: None,
            pwm: None,
            humidity_pct: None,
            resistance_ohm: None,
        })
    }

    /// Whether the reading is inside the range the sensor can produce.
    /// Values above [`MAX_PPM`] are glitches and must not be stored.
    pub fn in_range(&self) -> bool {
        self.co2_ppm <= MAX_PPM
    }
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CO2/VOC: {} {}", self.co2_ppm, Self::UNIT)?;
        if let Some(rh) = self.humidity_pct {
            write!(f, ", Rh: {rh:.2} %")?;
        }
        if let Some(rs) = self.resistance_ohm {
            write!(f, ", Rs: {rs} Ohm")?;
        }
        Ok(())
    }
}
