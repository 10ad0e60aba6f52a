//! Raw bulk transport to the stick.
//!
//! Frames go out in fixed 16-byte writes; responses come back as a train of
//! 16-byte packets terminated by a zero-length read. [`UsbTransport`] is the
//! real device implementation; tests substitute their own [`Transport`].

use bytes::{Bytes, BytesMut};
use nusb::Interface;
use nusb::transfer::RequestBuffer;
use tokio::time::timeout;
use tracing::{debug, info};

use crate::constants::{
    ALT_SETTING, CONFIGURATION, ENDPOINT_IN, ENDPOINT_OUT, FRAME_SIZE, INTERFACE, IO_TIMEOUT,
    MAX_RESPONSE_PACKETS, PACKET_SIZE, PID, VID,
};
use crate::error::StickError;

/// Byte exchange with the device: 16-byte frames out, 16-byte packets in.
#[allow(async_fn_in_trait)]
pub trait Transport {
    /// Write one frame to the bulk-out endpoint, returning bytes written.
    async fn write_frame(&mut self, frame: &[u8; FRAME_SIZE]) -> Result<usize, StickError>;

    /// Read one packet of up to 16 bytes from the bulk-in endpoint. An
    /// empty packet marks the end of a response.
    async fn read_packet(&mut self) -> Result<Vec<u8>, StickError>;

    /// Manufacturer string, if the descriptor was available.
    fn manufacturer(&self) -> Option<&str>;

    /// Product string, if the descriptor was available.
    fn product(&self) -> Option<&str>;

    /// Release the claimed interface. Further I/O fails with
    /// [`StickError::Released`].
    async fn release(&mut self) -> Result<(), StickError>;
}

/// Drain one response: read packets until the device sends an empty one,
/// concatenating the data. An immediately-empty first read yields an empty
/// response. The packet cap guards against a device that never terminates
/// the stream.
pub async fn read_until_empty<T: Transport>(transport: &mut T) -> Result<Bytes, StickError> {
    let mut data = BytesMut::new();
    for _ in 0..MAX_RESPONSE_PACKETS {
        let packet = transport.read_packet().await?;
        if packet.is_empty() {
            return Ok(data.freeze());
        }
        data.extend_from_slice(&packet);
    }
    Err(StickError::ResponseOverrun {
        packets: MAX_RESPONSE_PACKETS,
    })
}

/// Bulk transport over a claimed nusb interface.
pub struct UsbTransport {
    interface: Option<Interface>,
    manufacturer: Option<String>,
    product: Option<String>,
}

impl UsbTransport {
    /// Find the stick by vendor/product ID, select configuration 1, detach
    /// any kernel driver and claim interface 0, then select alternate
    /// setting 0.
    pub async fn open() -> Result<Self, StickError> {
        info!("searching for iAQ Stick...");
        let device_info = nusb::list_devices()?
            .find(|d| d.vendor_id() == VID && d.product_id() == PID)
            .ok_or(StickError::DeviceNotFound)?;

        info!(
            "found device on bus {} addr {}",
            device_info.bus_number(),
            device_info.device_address()
        );
        let manufacturer = device_info.manufacturer_string().map(str::to_owned);
        let product = device_info.product_string().map(str::to_owned);

        let device = device_info.open()?;
        device
            .set_configuration(CONFIGURATION)
            .map_err(StickError::Claim)?;
        let interface = device
            .detach_and_claim_interface(INTERFACE)
            .map_err(StickError::Claim)?;
        interface
            .set_alt_setting(ALT_SETTING)
            .map_err(StickError::Claim)?;
        info!("interface claimed");

        Ok(Self {
            interface: Some(interface),
            manufacturer,
            product,
        })
    }

    fn interface(&self) -> Result<&Interface, StickError> {
        self.interface.as_ref().ok_or(StickError::Released)
    }
}

impl Transport for UsbTransport {
    async fn write_frame(&mut self, frame: &[u8; FRAME_SIZE]) -> Result<usize, StickError> {
        let interface = self.interface()?;
        debug!(bytes = hex::encode(frame), "bulk write");
        let transfer = interface.bulk_out(ENDPOINT_OUT, frame.to_vec());
        let completion = timeout(IO_TIMEOUT, transfer).await?;
        let written = completion.into_result()?;
        Ok(written.actual_length())
    }

    async fn read_packet(&mut self) -> Result<Vec<u8>, StickError> {
        let interface = self.interface()?;
        let transfer = interface.bulk_in(ENDPOINT_IN, RequestBuffer::new(PACKET_SIZE));
        let completion = timeout(IO_TIMEOUT, transfer).await?;
        let data = completion.into_result()?;
        if !data.is_empty() {
            debug!(bytes = hex::encode(&data), "bulk read");
        }
        Ok(data)
    }

    fn manufacturer(&self) -> Option<&str> {
        self.manufacturer.as_deref()
    }

    fn product(&self) -> Option<&str> {
        self.product.as_deref()
    }

    async fn release(&mut self) -> Result<(), StickError> {
        // nusb releases the interface when the handle drops.
        self.interface.take();
        Ok(())
    }
}
