//! Shared transport stubs for exercising the protocol without hardware.

// Not every test file uses every helper here.
#![allow(dead_code)]

use std::collections::VecDeque;

use iaqstick_lib::constants::FRAME_SIZE;
use iaqstick_lib::error::StickError;
use iaqstick_lib::transport::Transport;

/// Transport fed from a fixed script of read packets. Reads past the end of
/// the script return empty packets, which a draining loop treats as the end
/// of a response.
pub struct ScriptedTransport {
    pub reads: VecDeque<Vec<u8>>,
    pub writes: Vec<[u8; FRAME_SIZE]>,
    pub fail_release: bool,
    pub released: bool,
}

impl ScriptedTransport {
    pub fn new(reads: Vec<Vec<u8>>) -> Self {
        Self {
            reads: reads.into(),
            writes: Vec::new(),
            fail_release: false,
            released: false,
        }
    }
}

impl Transport for ScriptedTransport {
    async fn write_frame(&mut self, frame: &[u8; FRAME_SIZE]) -> Result<usize, StickError> {
        self.writes.push(*frame);
        Ok(FRAME_SIZE)
    }

    async fn read_packet(&mut self) -> Result<Vec<u8>, StickError> {
        Ok(self.reads.pop_front().unwrap_or_default())
    }

    fn manufacturer(&self) -> Option<&str> {
        Some("AppliedSensor")
    }

    fn product(&self) -> Option<&str> {
        Some("iAQ Stick")
    }

    async fn release(&mut self) -> Result<(), StickError> {
        self.released = true;
        if self.fail_release {
            Err(StickError::Released)
        } else {
            Ok(())
        }
    }
}

/// Transport that answers each `*TR` request with the next scripted
/// measurement record (the last record repeats once the script runs out)
/// and every other request with an empty response.
pub struct MeasurementTransport {
    responses: Vec<Vec<u8>>,
    next: usize,
    pending: Option<Vec<u8>>,
    pub writes: Vec<[u8; FRAME_SIZE]>,
}

impl MeasurementTransport {
    pub fn new(responses: Vec<Vec<u8>>) -> Self {
        assert!(!responses.is_empty());
        Self {
            responses,
            next: 0,
            pending: None,
            writes: Vec::new(),
        }
    }
}

impl Transport for MeasurementTransport {
    async fn write_frame(&mut self, frame: &[u8; FRAME_SIZE]) -> Result<usize, StickError> {
        self.writes.push(*frame);
        if frame.windows(3).any(|w| w == b"*TR") {
            let i = self.next.min(self.responses.len() - 1);
            self.pending = Some(self.responses[i].clone());
            self.next += 1;
        }
        Ok(FRAME_SIZE)
    }

    async fn read_packet(&mut self) -> Result<Vec<u8>, StickError> {
        Ok(self.pending.take().unwrap_or_default())
    }

    fn manufacturer(&self) -> Option<&str> {
        Some("AppliedSensor")
    }

    fn product(&self) -> Option<&str> {
        Some("iAQ Stick")
    }

    async fn release(&mut self) -> Result<(), StickError> {
        Ok(())
    }
}

/// A 12-byte measurement record with the given ppm in the CO2/VOC field.
pub fn measurement_record(ppm: u16) -> Vec<u8> {
    let mut record = vec![0u8; 12];
    record[2..4].copy_from_slice(&ppm.to_le_bytes());
    record
}
