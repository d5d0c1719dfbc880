//! Current Interface Generation
//!
//! Operation tables the shim presents to the host. These are the
//! current-generation counterparts of the tables in [`crate::legacy`]:
//! device masks use the current bit layout, parameter blobs carry
//! current-encoded routing values, and a handful of operations exist
//! here that the legacy generation never defined.

use std::io;

use crate::error::HalResult;
use crate::types::{
    AcousticsFlags, AudioConfig, AudioFormat, AudioMode, ChannelMask, DeviceMask, EffectHandle,
    IoHandle, OutputFlags,
};

/// Operations shared by both stream directions.
pub trait Stream: Send {
    fn sample_rate(&self) -> u32;
    fn set_sample_rate(&mut self, rate: u32) -> HalResult<()>;
    fn buffer_size(&self) -> usize;
    fn channels(&self) -> ChannelMask;
    fn format(&self) -> AudioFormat;
    fn set_format(&mut self, format: AudioFormat) -> HalResult<()>;
    fn standby(&mut self) -> HalResult<()>;
    fn dump(&self, out: &mut dyn io::Write) -> HalResult<()>;
    /// `kv_pairs` carries current-encoded routing values.
    fn set_parameters(&mut self, kv_pairs: &str) -> HalResult<()>;
    /// Returned blob is an owned copy; routing values are
    /// current-encoded.
    fn get_parameters(&self, keys: &str) -> String;
    fn add_audio_effect(&mut self, effect: EffectHandle) -> HalResult<()>;
    fn remove_audio_effect(&mut self, effect: EffectHandle) -> HalResult<()>;
}

/// Playback stream surface presented to the host.
pub trait OutputStream: Stream {
    fn latency(&self) -> u32;
    fn set_volume(&mut self, left: f32, right: f32) -> HalResult<()>;
    fn write(&mut self, buffer: &[u8]) -> HalResult<usize>;
    fn render_position(&self) -> HalResult<u32>;
    /// Current-generation only; the wrapped module predates it and the
    /// shim reports it unsupported without forwarding.
    fn next_write_timestamp(&self) -> HalResult<i64>;
}

/// Capture stream surface presented to the host.
pub trait InputStream: Stream {
    fn set_gain(&mut self, gain: f32) -> HalResult<()>;
    fn read(&mut self, buffer: &mut [u8]) -> HalResult<usize>;
    fn input_frames_lost(&mut self) -> u32;
}

/// Device-level operation table presented to the host.
///
/// Streams opened through this table are owned by the device object and
/// live until the matching close call; there is no other destroyer.
pub trait AudioDevice: Send {
    /// Devices the wrapped module can route to, in the current layout.
    fn supported_devices(&self) -> DeviceMask;
    fn init_check(&self) -> HalResult<()>;
    fn set_voice_volume(&mut self, volume: f32) -> HalResult<()>;
    fn set_master_volume(&mut self, volume: f32) -> HalResult<()>;
    fn master_volume(&self) -> HalResult<f32>;
    fn set_master_mute(&mut self, muted: bool) -> HalResult<()>;
    fn master_mute(&self) -> HalResult<bool>;
    fn set_mode(&mut self, mode: AudioMode) -> HalResult<()>;
    fn set_mic_mute(&mut self, muted: bool) -> HalResult<()>;
    fn mic_mute(&self) -> HalResult<bool>;
    fn set_parameters(&mut self, kv_pairs: &str) -> HalResult<()>;
    fn get_parameters(&self, keys: &str) -> String;
    fn input_buffer_size(&self, config: &AudioConfig) -> HalResult<usize>;
    fn open_output_stream(
        &mut self,
        handle: IoHandle,
        devices: DeviceMask,
        flags: OutputFlags,
        config: &mut AudioConfig,
    ) -> HalResult<()>;
    fn output_stream(&mut self, handle: IoHandle) -> Option<&mut dyn OutputStream>;
    fn close_output_stream(&mut self, handle: IoHandle) -> HalResult<()>;
    fn open_input_stream(
        &mut self,
        handle: IoHandle,
        devices: DeviceMask,
        config: &mut AudioConfig,
        acoustics: AcousticsFlags,
    ) -> HalResult<()>;
    fn input_stream(&mut self, handle: IoHandle) -> Option<&mut dyn InputStream>;
    fn close_input_stream(&mut self, handle: IoHandle) -> HalResult<()>;
    fn dump(&self, out: &mut dyn io::Write) -> HalResult<()>;
}
