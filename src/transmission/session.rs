use super::buffer::SampleBuffer;
use crate::error::EncodeError;
use crate::phy::{Frame, PhyEncoder, PulseWidthEncoder};
use crate::protocol::{Command, CommandRepeater, DeviceAddress};
use crate::utils::consts::{BAUD_RATE, PAD_SAMPLES, SAMPLE_RATE};
use num_complex::Complex32;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Configuration for the encoding side of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxConfig {
    pub sample_rate: u32,
    pub baud_rate: u32,
}

impl Default for TxConfig {
    fn default() -> Self {
        Self {
            sample_rate: SAMPLE_RATE,
            baud_rate: BAUD_RATE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SessionState {
    /// No address yet
    Unbound,
    /// Address bound, nothing pending
    Bound,
    /// An encoded buffer waits for [`TransmitSession::take_buffer`]
    Ready,
}

/// Binds one device address and turns commands into sample buffers, one at
/// a time.
///
/// A buffer must be taken before the next command is encoded. A failed
/// `encode` leaves the session exactly as it was.
pub struct TransmitSession {
    config: TxConfig,
    address: Option<DeviceAddress>,
    pending: Option<SampleBuffer>,
    repeater: CommandRepeater,
    phy: PhyEncoder,
}

impl TransmitSession {
    pub fn new(config: TxConfig) -> Result<Self, EncodeError> {
        let phy = PhyEncoder::new(config.sample_rate, config.baud_rate)?;
        Ok(Self {
            config,
            address: None,
            pending: None,
            repeater: CommandRepeater::new(),
            phy,
        })
    }

    pub fn new_default() -> Result<Self, EncodeError> {
        Self::new(TxConfig::default())
    }

    pub fn state(&self) -> SessionState {
        match (&self.address, &self.pending) {
            (None, _) => SessionState::Unbound,
            (Some(_), None) => SessionState::Bound,
            (Some(_), Some(_)) => SessionState::Ready,
        }
    }

    pub fn config(&self) -> &TxConfig {
        &self.config
    }

    pub fn address(&self) -> Option<&DeviceAddress> {
        self.address.as_ref()
    }

    pub fn samples_per_symbol(&self) -> usize {
        self.phy.samples_per_symbol()
    }

    /// Bind the device address. Write-once.
    pub fn bind_address(&mut self, address: DeviceAddress) -> Result<(), EncodeError> {
        if self.address.is_some() {
            return Err(EncodeError::AlreadyBound);
        }
        info!("Bound device address {} ({} bits)", address, address.len());
        self.address = Some(address);
        Ok(())
    }

    /// Point an already bound session at another receiver. Refused while a
    /// buffer is pending.
    pub fn rebind_address(&mut self, address: DeviceAddress) -> Result<(), EncodeError> {
        if self.pending.is_some() {
            return Err(EncodeError::TransmissionInProgress);
        }
        if self.address.is_none() {
            return Err(EncodeError::MissingAddress);
        }
        info!("Rebound device address {} ({} bits)", address, address.len());
        self.address = Some(address);
        Ok(())
    }

    /// Frames `command` would be sent as, without encoding samples.
    pub fn frame_plan(&self, command: Command) -> Result<Vec<Frame>, EncodeError> {
        self.repeater
            .frames(self.address.as_ref(), command)
    }

    /// Encode `command` into a new pending buffer.
    pub fn encode(&mut self, command: Command) -> Result<&SampleBuffer, EncodeError> {
        if !command.is_supported() {
            return Err(EncodeError::UnsupportedCommand(command));
        }
        if self.pending.is_some() {
            return Err(EncodeError::TransmissionInProgress);
        }

        let frames = self.frame_plan(command)?;
        let mut samples = self.phy.encode_frames(&frames)?;
        samples.extend(std::iter::repeat_n(Complex32::new(0.0, 0.0), PAD_SAMPLES));

        let bits: usize = frames.iter().map(Frame::len).sum();
        let buffer = SampleBuffer::new(
            samples,
            command,
            self.config.sample_rate,
            frames.len(),
            PulseWidthEncoder::chips_for_bits(bits),
            PAD_SAMPLES,
        );

        info!(
            "Encoded {}: {} frames, {} chips, {} samples ({:.3} s)",
            command,
            buffer.frame_count(),
            buffer.chip_count(),
            buffer.len(),
            buffer.duration_secs()
        );

        let buffer = self.pending.insert(buffer);
        Ok(&*buffer)
    }

    /// Hand the pending buffer over, returning the session to `Bound`.
    pub fn take_buffer(&mut self) -> Result<SampleBuffer, EncodeError> {
        let buffer = self
            .pending
            .take()
            .ok_or(EncodeError::NoPendingTransmission)?;
        debug!("Buffer for {} handed off", buffer.command());
        Ok(buffer)
    }
}
