//! High-level sensor facade: setup handshake, polled measurement updates,
//! teardown.

use bytes::Bytes;
use tracing::{debug, info, warn};

use crate::constants::MAX_PPM;
use crate::error::StickError;
use crate::measurement::Measurement;
use crate::protocol::{self, Type1Command, Type1Counter, Type2Command, Type2Counter};
use crate::transport::{Transport, UsbTransport, read_until_empty};

/// Represents a connection to an iAQ Stick sensor.
///
/// Generic over the [`Transport`] so the protocol can run against stubs in
/// tests. Callers must run [`setup`](Self::setup) once before the first
/// [`update`](Self::update), and must serialize calls — the device supports
/// one transaction in flight at a time.
pub struct IaqStick<T: Transport> {
    transport: T,
    type1_seq: Type1Counter,
    type2_seq: Type2Counter,
    reading: Option<Measurement>,
}

impl IaqStick<UsbTransport> {
    /// Open the device and run the initialization handshake.
    pub async fn new() -> Result<Self, StickError> {
        let transport = UsbTransport::open().await?;
        let mut stick = Self::with_transport(transport);
        stick.setup().await?;
        Ok(stick)
    }
}

impl<T: Transport> IaqStick<T> {
    /// Wrap an already-open transport. [`setup`](Self::setup) must still run
    /// before the first update.
    pub fn with_transport(transport: T) -> Self {
        Self {
            transport,
            type1_seq: Type1Counter::new(),
            type2_seq: Type2Counter::new(),
            reading: None,
        }
    }

    /// Run the initialization handshake: query the identity, write the sync
    /// frame, then run the diagnostic queries. A failure anywhere in the
    /// sequence surfaces as [`StickError::Init`]; the stick is not usable
    /// for updates after a failed setup.
    pub async fn setup(&mut self) -> Result<(), StickError> {
        self.type1_seq = Type1Counter::new();
        self.type2_seq = Type2Counter::new();
        self.handshake()
            .await
            .map_err(|e| StickError::Init(Box::new(e)))
    }

    async fn handshake(&mut self) -> Result<(), StickError> {
        match (self.transport.manufacturer(), self.transport.product()) {
            (Some(manufacturer), Some(product)) => {
                info!("manufacturer: {manufacturer} - product: {product}");
            }
            _ => debug!("device string descriptors not available"),
        }

        let identity = self.exchange_type1(Type1Command::Identify).await?;
        info!(identity = identity.trim(), "device identity");

        // The stick wants one all-filler frame after *IDN? before it will
        // answer further queries. No response follows.
        self.transport.write_frame(&protocol::SYNC_FRAME).await?;

        for command in [
            Type1Command::KnobPresets,
            Type1Command::WaveformPreamble,
            Type1Command::Flags,
        ] {
            let response = self.exchange_type1(command).await?;
            debug!(?command, response = response.trim(), "handshake query");
        }

        info!("init successful");
        Ok(())
    }

    /// Poll the device once. I/O and decode failures are logged and leave
    /// the stored reading unchanged; the next scheduled update proceeds
    /// normally.
    pub async fn update(&mut self) {
        if let Err(e) = self.try_update().await {
            warn!("update failed - {e}");
        }
    }

    async fn try_update(&mut self) -> Result<(), StickError> {
        // Only checked for transport errors; the flag contents are unused.
        self.exchange_type1(Type1Command::FlagGet).await?;

        let response = self.exchange_type2(Type2Command::TriggerRead).await?;
        let measurement = Measurement::from_response(&response)?;
        if measurement.in_range() {
            debug!(ppm = measurement.co2_ppm, "ppm");
            self.reading = Some(measurement);
        } else {
            debug!(
                ppm = measurement.co2_ppm,
                max = MAX_PPM,
                "reading out of range, discarded"
            );
        }
        Ok(())
    }

    /// Release the interface. Problems are logged; teardown always
    /// completes.
    pub async fn stop(&mut self) {
        if let Err(e) = self.transport.release().await {
            warn!("releasing interface failed - {e}");
        }
    }

    /// Last accepted CO2/VOC level in ppm, if any update has succeeded.
    pub fn current_ppm(&self) -> Option<u16> {
        self.reading.map(|m| m.co2_ppm)
    }

    /// Last accepted measurement with all decoded channels.
    pub fn last_measurement(&self) -> Option<&Measurement> {
        self.reading.as_ref()
    }

    /// Access the underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    async fn exchange_type1(&mut self, command: Type1Command) -> Result<String, StickError> {
        let frame = protocol::type1_frame(self.type1_seq.next(), command.text());
        self.transport.write_frame(&frame).await?;
        let raw = read_until_empty(&mut self.transport).await?;
        Ok(protocol::decode_latin1(&raw))
    }

    async fn exchange_type2(&mut self, command: Type2Command) -> Result<Bytes, StickError> {
        let frame = protocol::type2_frame(self.type2_seq.next(), command.text());
        self.transport.write_frame(&frame).await?;
        read_until_empty(&mut self.transport).await
    }
}
