//! Device Adapter
//!
//! Presents the current-generation device table over the vendor's legacy
//! device. Device-level configuration and lifecycle calls forward
//! directly; device masks and parameter blobs are translated wherever
//! they cross the boundary. Streams opened here are owned by the adapter,
//! keyed by the host-assigned io handle, and released only by the
//! matching close call - after the close has been forwarded to the
//! vendor.

use std::collections::HashMap;
use std::io;

use tracing::{debug, warn};

use viaduct_codec::{rewrite_parameters, ConversionDirection, DeviceMaskCodec};

use crate::config::ShimConfig;
use crate::error::{HalError, HalResult};
use crate::legacy::LegacyAudioDevice;
use crate::stream::{InputStreamAdapter, OutputStreamAdapter};
use crate::traits::{AudioDevice, InputStream, OutputStream};
use crate::types::{
    output_flags, AcousticsFlags, AudioConfig, AudioMode, DeviceMask, IoHandle, OutputFlags,
};

/// Current-generation device surface over a legacy vendor device.
pub struct DeviceAdapter {
    vendor: Box<dyn LegacyAudioDevice>,
    codec: DeviceMaskCodec,
    rewrite_capture_parameters: bool,
    outputs: HashMap<IoHandle, OutputStreamAdapter>,
    inputs: HashMap<IoHandle, InputStreamAdapter>,
}

impl std::fmt::Debug for DeviceAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceAdapter")
            .field("rewrite_capture_parameters", &self.rewrite_capture_parameters)
            .field("outputs", &self.outputs.len())
            .field("inputs", &self.inputs.len())
            .finish_non_exhaustive()
    }
}

impl DeviceAdapter {
    pub fn new(vendor: Box<dyn LegacyAudioDevice>, config: &ShimConfig) -> Self {
        Self {
            vendor,
            codec: config.codec(),
            rewrite_capture_parameters: config.rewrite_capture_parameters,
            outputs: HashMap::new(),
            inputs: HashMap::new(),
        }
    }

    /// Number of streams currently owned by this device.
    pub fn open_stream_count(&self) -> usize {
        self.outputs.len() + self.inputs.len()
    }

    /// Shut the vendor device down and release the adapter.
    ///
    /// Streams still open at this point are dropped without individual
    /// close forwards; the vendor tears its own streams down with the
    /// device.
    pub fn close(mut self) -> HalResult<()> {
        if !self.outputs.is_empty() || !self.inputs.is_empty() {
            warn!(
                "closing device with {} streams still open",
                self.outputs.len() + self.inputs.len()
            );
        }
        self.vendor.close()
    }
}

impl AudioDevice for DeviceAdapter {
    fn supported_devices(&self) -> DeviceMask {
        self.codec.to_current(self.vendor.supported_devices())
    }

    fn init_check(&self) -> HalResult<()> {
        self.vendor.init_check()
    }

    fn set_voice_volume(&mut self, volume: f32) -> HalResult<()> {
        self.vendor.set_voice_volume(volume)
    }

    fn set_master_volume(&mut self, volume: f32) -> HalResult<()> {
        self.vendor.set_master_volume(volume)
    }

    fn master_volume(&self) -> HalResult<f32> {
        // Current-generation only; the wrapper leaves the slot vacant.
        Err(HalError::NotSupported)
    }

    fn set_master_mute(&mut self, _muted: bool) -> HalResult<()> {
        Err(HalError::NotSupported)
    }

    fn master_mute(&self) -> HalResult<bool> {
        Err(HalError::NotSupported)
    }

    fn set_mode(&mut self, mode: AudioMode) -> HalResult<()> {
        self.vendor.set_mode(mode)
    }

    fn set_mic_mute(&mut self, muted: bool) -> HalResult<()> {
        self.vendor.set_mic_mute(muted)
    }

    fn mic_mute(&self) -> HalResult<bool> {
        self.vendor.mic_mute()
    }

    fn set_parameters(&mut self, kv_pairs: &str) -> HalResult<()> {
        let fixed = rewrite_parameters(&self.codec, kv_pairs, ConversionDirection::CurrentToLegacy);
        debug!("device set_parameters: {kv_pairs:?} -> {fixed:?}");
        self.vendor.set_parameters(&fixed)
    }

    fn get_parameters(&self, keys: &str) -> String {
        let values = self.vendor.get_parameters(keys);
        let fixed = rewrite_parameters(&self.codec, &values, ConversionDirection::LegacyToCurrent);
        debug!("device get_parameters: keys {keys:?}, values {values:?} -> {fixed:?}");
        fixed
    }

    fn input_buffer_size(&self, config: &AudioConfig) -> HalResult<usize> {
        // The legacy slot takes a channel count, not a mask.
        self.vendor.input_buffer_size(
            config.sample_rate,
            config.format,
            config.channel_mask.count_ones(),
        )
    }

    fn open_output_stream(
        &mut self,
        handle: IoHandle,
        devices: DeviceMask,
        flags: OutputFlags,
        config: &mut AudioConfig,
    ) -> HalResult<()> {
        debug!("open_output_stream: handle {handle}, devices {devices:#x}, flags {flags:#x}");
        if self.outputs.contains_key(&handle) {
            return Err(HalError::InvalidArgument(format!(
                "output handle {handle} already open"
            )));
        }

        let vendor_devices = self.codec.to_legacy(devices);
        // The vendor's policy predates the explicit primary designation
        // and never marks an output primary on its own.
        let flags = flags | output_flags::PRIMARY;

        let vendor_stream = self.vendor.open_output_stream(vendor_devices, flags, config)?;
        self.outputs
            .insert(handle, OutputStreamAdapter::new(vendor_stream, self.codec));
        Ok(())
    }

    fn output_stream(&mut self, handle: IoHandle) -> Option<&mut dyn OutputStream> {
        self.outputs
            .get_mut(&handle)
            .map(|stream| stream as &mut dyn OutputStream)
    }

    fn close_output_stream(&mut self, handle: IoHandle) -> HalResult<()> {
        debug!("close_output_stream: handle {handle}");
        let adapter = self.outputs.remove(&handle).ok_or_else(|| {
            HalError::InvalidArgument(format!("no open output stream for handle {handle}"))
        })?;
        // The vendor releases its stream; the adapter is dropped after.
        self.vendor.close_output_stream(adapter.into_vendor());
        Ok(())
    }

    fn open_input_stream(
        &mut self,
        handle: IoHandle,
        devices: DeviceMask,
        config: &mut AudioConfig,
        acoustics: AcousticsFlags,
    ) -> HalResult<()> {
        debug!("open_input_stream: handle {handle}, devices {devices:#x}");
        if self.inputs.contains_key(&handle) {
            return Err(HalError::InvalidArgument(format!(
                "input handle {handle} already open"
            )));
        }

        let vendor_devices = self.codec.to_legacy(devices);
        let vendor_stream = self
            .vendor
            .open_input_stream(vendor_devices, config, acoustics)?;
        self.inputs.insert(
            handle,
            InputStreamAdapter::new(vendor_stream, self.codec, self.rewrite_capture_parameters),
        );
        Ok(())
    }

    fn input_stream(&mut self, handle: IoHandle) -> Option<&mut dyn InputStream> {
        self.inputs
            .get_mut(&handle)
            .map(|stream| stream as &mut dyn InputStream)
    }

    fn close_input_stream(&mut self, handle: IoHandle) -> HalResult<()> {
        debug!("close_input_stream: handle {handle}");
        let adapter = self.inputs.remove(&handle).ok_or_else(|| {
            HalError::InvalidArgument(format!("no open input stream for handle {handle}"))
        })?;
        self.vendor.close_input_stream(adapter.into_vendor());
        Ok(())
    }

    fn dump(&self, out: &mut dyn io::Write) -> HalResult<()> {
        self.vendor.dump(out)
    }
}
