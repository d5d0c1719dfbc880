//! Stream Adapters
//!
//! One adapter per direction, each presenting the current-generation
//! stream table over a vendor stream of the legacy generation. Every
//! operation is a direct forward; the exceptions are the parameter
//! get/set paths, which route the blob through the parameter codec, and
//! the next-write-timestamp query, which the wrapped generation predates.
//!
//! The raw and rewritten parameter blobs are logged at every crossing.
//! Field diagnostics rely on these events; they are the trace hook for
//! routing issues.

use std::io;

use tracing::{debug, trace};

use viaduct_codec::{rewrite_parameters, ConversionDirection, DeviceMaskCodec};

use crate::error::{HalError, HalResult};
use crate::legacy::{LegacyInputStream, LegacyOutputStream};
use crate::traits::{InputStream, OutputStream, Stream};
use crate::types::{AudioFormat, ChannelMask, EffectHandle};

/// Playback stream adapter.
pub struct OutputStreamAdapter {
    vendor: Box<dyn LegacyOutputStream>,
    codec: DeviceMaskCodec,
}

impl OutputStreamAdapter {
    pub(crate) fn new(vendor: Box<dyn LegacyOutputStream>, codec: DeviceMaskCodec) -> Self {
        Self { vendor, codec }
    }

    /// Surrender the vendor stream so it can be handed back to the
    /// vendor's close slot.
    pub(crate) fn into_vendor(self) -> Box<dyn LegacyOutputStream> {
        self.vendor
    }
}

impl Stream for OutputStreamAdapter {
    fn sample_rate(&self) -> u32 {
        self.vendor.sample_rate()
    }

    fn set_sample_rate(&mut self, rate: u32) -> HalResult<()> {
        self.vendor.set_sample_rate(rate)
    }

    fn buffer_size(&self) -> usize {
        self.vendor.buffer_size()
    }

    fn channels(&self) -> ChannelMask {
        self.vendor.channels()
    }

    fn format(&self) -> AudioFormat {
        self.vendor.format()
    }

    fn set_format(&mut self, format: AudioFormat) -> HalResult<()> {
        self.vendor.set_format(format)
    }

    fn standby(&mut self) -> HalResult<()> {
        self.vendor.standby()
    }

    fn dump(&self, out: &mut dyn io::Write) -> HalResult<()> {
        self.vendor.dump(out)
    }

    fn set_parameters(&mut self, kv_pairs: &str) -> HalResult<()> {
        let fixed = rewrite_parameters(&self.codec, kv_pairs, ConversionDirection::CurrentToLegacy);
        debug!("output set_parameters: {kv_pairs:?} -> {fixed:?}");
        self.vendor.set_parameters(&fixed)
    }

    fn get_parameters(&self, keys: &str) -> String {
        let values = self.vendor.get_parameters(keys);
        let fixed = rewrite_parameters(&self.codec, &values, ConversionDirection::LegacyToCurrent);
        debug!("output get_parameters: keys {keys:?}, values {values:?} -> {fixed:?}");
        fixed
    }

    fn add_audio_effect(&mut self, effect: EffectHandle) -> HalResult<()> {
        self.vendor.add_audio_effect(effect)
    }

    fn remove_audio_effect(&mut self, effect: EffectHandle) -> HalResult<()> {
        self.vendor.remove_audio_effect(effect)
    }
}

impl OutputStream for OutputStreamAdapter {
    fn latency(&self) -> u32 {
        self.vendor.latency()
    }

    fn set_volume(&mut self, left: f32, right: f32) -> HalResult<()> {
        self.vendor.set_volume(left, right)
    }

    fn write(&mut self, buffer: &[u8]) -> HalResult<usize> {
        trace!("output write: {} bytes", buffer.len());
        self.vendor.write(buffer)
    }

    fn render_position(&self) -> HalResult<u32> {
        self.vendor.render_position()
    }

    fn next_write_timestamp(&self) -> HalResult<i64> {
        // The wrapped generation predates this query.
        Err(HalError::NotSupported)
    }
}

/// Capture stream adapter.
pub struct InputStreamAdapter {
    vendor: Box<dyn LegacyInputStream>,
    codec: DeviceMaskCodec,
    /// Whether the rewritten blob is forwarded on `set_parameters`.
    /// Historically the capture path forwarded the caller's original
    /// string; see `ShimConfig::rewrite_capture_parameters`.
    forward_rewritten: bool,
}

impl InputStreamAdapter {
    pub(crate) fn new(
        vendor: Box<dyn LegacyInputStream>,
        codec: DeviceMaskCodec,
        forward_rewritten: bool,
    ) -> Self {
        Self {
            vendor,
            codec,
            forward_rewritten,
        }
    }

    pub(crate) fn into_vendor(self) -> Box<dyn LegacyInputStream> {
        self.vendor
    }
}

impl Stream for InputStreamAdapter {
    fn sample_rate(&self) -> u32 {
        self.vendor.sample_rate()
    }

    fn set_sample_rate(&mut self, rate: u32) -> HalResult<()> {
        self.vendor.set_sample_rate(rate)
    }

    fn buffer_size(&self) -> usize {
        self.vendor.buffer_size()
    }

    fn channels(&self) -> ChannelMask {
        self.vendor.channels()
    }

    fn format(&self) -> AudioFormat {
        self.vendor.format()
    }

    fn set_format(&mut self, format: AudioFormat) -> HalResult<()> {
        self.vendor.set_format(format)
    }

    fn standby(&mut self) -> HalResult<()> {
        self.vendor.standby()
    }

    fn dump(&self, out: &mut dyn io::Write) -> HalResult<()> {
        self.vendor.dump(out)
    }

    fn set_parameters(&mut self, kv_pairs: &str) -> HalResult<()> {
        let fixed = rewrite_parameters(&self.codec, kv_pairs, ConversionDirection::CurrentToLegacy);
        debug!("input set_parameters: {kv_pairs:?} -> {fixed:?}");
        if self.forward_rewritten {
            self.vendor.set_parameters(&fixed)
        } else {
            self.vendor.set_parameters(kv_pairs)
        }
    }

    fn get_parameters(&self, keys: &str) -> String {
        let values = self.vendor.get_parameters(keys);
        let fixed = rewrite_parameters(&self.codec, &values, ConversionDirection::LegacyToCurrent);
        debug!("input get_parameters: keys {keys:?}, values {values:?} -> {fixed:?}");
        fixed
    }

    fn add_audio_effect(&mut self, effect: EffectHandle) -> HalResult<()> {
        self.vendor.add_audio_effect(effect)
    }

    fn remove_audio_effect(&mut self, effect: EffectHandle) -> HalResult<()> {
        self.vendor.remove_audio_effect(effect)
    }
}

impl InputStream for InputStreamAdapter {
    fn set_gain(&mut self, gain: f32) -> HalResult<()> {
        self.vendor.set_gain(gain)
    }

    fn read(&mut self, buffer: &mut [u8]) -> HalResult<usize> {
        trace!("input read: {} bytes requested", buffer.len());
        self.vendor.read(buffer)
    }

    fn input_frames_lost(&mut self) -> u32 {
        self.vendor.input_frames_lost()
    }
}
