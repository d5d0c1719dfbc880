//! Legacy Interface Generation
//!
//! Operation tables of the interface generation the vendor module was
//! compiled against. Real implementations live inside the vendor binary
//! behind the module loader; this crate only consumes them. Everything
//! here is expressed in the legacy conventions: device masks use the
//! legacy bit layout, parameter blobs carry legacy-encoded routing
//! values.

use std::io;

use crate::error::HalResult;
use crate::types::{
    AcousticsFlags, AudioConfig, AudioFormat, AudioMode, ChannelMask, DeviceMask, EffectHandle,
    OutputFlags,
};

/// Operations shared by both stream directions.
pub trait LegacyStream: Send {
    fn sample_rate(&self) -> u32;
    fn set_sample_rate(&mut self, rate: u32) -> HalResult<()>;
    fn buffer_size(&self) -> usize;
    fn channels(&self) -> ChannelMask;
    fn format(&self) -> AudioFormat;
    fn set_format(&mut self, format: AudioFormat) -> HalResult<()>;
    fn standby(&mut self) -> HalResult<()>;
    fn dump(&self, out: &mut dyn io::Write) -> HalResult<()>;
    /// `kv_pairs` carries legacy-encoded routing values.
    fn set_parameters(&mut self, kv_pairs: &str) -> HalResult<()>;
    /// Returned blob is an owned copy; routing values are legacy-encoded.
    fn get_parameters(&self, keys: &str) -> String;
    fn add_audio_effect(&mut self, effect: EffectHandle) -> HalResult<()>;
    fn remove_audio_effect(&mut self, effect: EffectHandle) -> HalResult<()>;
}

/// Playback stream as the vendor implements it.
pub trait LegacyOutputStream: LegacyStream {
    fn latency(&self) -> u32;
    fn set_volume(&mut self, left: f32, right: f32) -> HalResult<()>;
    fn write(&mut self, buffer: &[u8]) -> HalResult<usize>;
    fn render_position(&self) -> HalResult<u32>;
}

/// Capture stream as the vendor implements it.
pub trait LegacyInputStream: LegacyStream {
    fn set_gain(&mut self, gain: f32) -> HalResult<()>;
    fn read(&mut self, buffer: &mut [u8]) -> HalResult<usize>;
    fn input_frames_lost(&mut self) -> u32;
}

/// Device-level operation table of the legacy generation.
pub trait LegacyAudioDevice: Send {
    /// Returns the devices the vendor can route to, in the legacy layout.
    fn supported_devices(&self) -> DeviceMask;
    fn init_check(&self) -> HalResult<()>;
    fn set_voice_volume(&mut self, volume: f32) -> HalResult<()>;
    fn set_master_volume(&mut self, volume: f32) -> HalResult<()>;
    fn set_mode(&mut self, mode: AudioMode) -> HalResult<()>;
    fn set_mic_mute(&mut self, muted: bool) -> HalResult<()>;
    fn mic_mute(&self) -> HalResult<bool>;
    fn set_parameters(&mut self, kv_pairs: &str) -> HalResult<()>;
    fn get_parameters(&self, keys: &str) -> String;
    fn input_buffer_size(
        &self,
        sample_rate: u32,
        format: AudioFormat,
        channel_count: u32,
    ) -> HalResult<usize>;
    /// `devices` is in the legacy layout; the vendor may adjust `config`.
    fn open_output_stream(
        &mut self,
        devices: DeviceMask,
        flags: OutputFlags,
        config: &mut AudioConfig,
    ) -> HalResult<Box<dyn LegacyOutputStream>>;
    fn close_output_stream(&mut self, stream: Box<dyn LegacyOutputStream>);
    fn open_input_stream(
        &mut self,
        devices: DeviceMask,
        config: &mut AudioConfig,
        acoustics: AcousticsFlags,
    ) -> HalResult<Box<dyn LegacyInputStream>>;
    fn close_input_stream(&mut self, stream: Box<dyn LegacyInputStream>);
    fn dump(&self, out: &mut dyn io::Write) -> HalResult<()>;
    /// Shut the vendor device down. Called once, from the shim's own
    /// close path.
    fn close(&mut self) -> HalResult<()>;
}
