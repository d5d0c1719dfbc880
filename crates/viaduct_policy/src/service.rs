//! Policy Service Adapter
//!
//! The reverse-direction half of the shim: the vendor's policy logic
//! calls back into the host through this adapter. It presents the legacy
//! callback table and forwards onto the host's current-generation
//! service, translating device masks and parameter blobs on the way up -
//! the vendor always speaks the legacy layout, so outbound values must be
//! corrected before the host sees them.

use std::sync::Arc;

use tracing::debug;

use viaduct_codec::{rewrite_parameters, ConversionDirection, DeviceMaskCodec};
use viaduct_hal::{
    output_flags, AcousticsFlags, AudioFormat, ChannelMask, DeviceMask, HalResult, IoHandle,
    ModuleHandle, OutputFlags, SessionId,
};

use crate::legacy::LegacyPolicyService;
use crate::traits::PolicyService;
use crate::types::{StreamType, Tone};

/// Presents the legacy service callback table over the host's
/// current-generation service.
pub struct PolicyServiceAdapter {
    host: Arc<dyn PolicyService>,
    codec: DeviceMaskCodec,
}

impl PolicyServiceAdapter {
    pub fn new(host: Arc<dyn PolicyService>, codec: DeviceMaskCodec) -> Self {
        Self { host, codec }
    }
}

impl LegacyPolicyService for PolicyServiceAdapter {
    fn load_module(&self, name: &str) -> ModuleHandle {
        debug!("load_module: {name}");
        self.host.load_module(name)
    }

    fn open_output(
        &self,
        devices: &mut DeviceMask,
        sample_rate: &mut u32,
        format: &mut AudioFormat,
        channel_mask: &mut ChannelMask,
        latency_ms: &mut u32,
        flags: OutputFlags,
    ) -> IoHandle {
        debug!("open_output: devices {:#x}, flags {flags:#x}", *devices);
        let mut converted = self.codec.to_current(*devices);
        // The legacy policy manager never asks for the primary
        // designation on the first output it opens; without it the host
        // would end up with no primary output at all.
        let flags = flags | output_flags::PRIMARY;
        self.host.open_output(
            &mut converted,
            sample_rate,
            format,
            channel_mask,
            latency_ms,
            flags,
        )
    }

    fn open_output_on_module(
        &self,
        module: ModuleHandle,
        devices: &mut DeviceMask,
        sample_rate: &mut u32,
        format: &mut AudioFormat,
        channel_mask: &mut ChannelMask,
        latency_ms: &mut u32,
        flags: OutputFlags,
    ) -> IoHandle {
        debug!(
            "open_output_on_module: module {module}, devices {:#x}, flags {flags:#x}",
            *devices
        );
        let mut converted = self.codec.to_current(*devices);
        self.host.open_output_on_module(
            module,
            &mut converted,
            sample_rate,
            format,
            channel_mask,
            latency_ms,
            flags,
        )
    }

    fn open_duplicate_output(&self, output1: IoHandle, output2: IoHandle) -> IoHandle {
        self.host.open_duplicate_output(output1, output2)
    }

    fn close_output(&self, output: IoHandle) -> HalResult<()> {
        self.host.close_output(output)
    }

    fn suspend_output(&self, output: IoHandle) -> HalResult<()> {
        self.host.suspend_output(output)
    }

    fn restore_output(&self, output: IoHandle) -> HalResult<()> {
        self.host.restore_output(output)
    }

    fn open_input(
        &self,
        devices: &mut DeviceMask,
        sample_rate: &mut u32,
        format: &mut AudioFormat,
        channel_mask: &mut ChannelMask,
        acoustics: AcousticsFlags,
    ) -> IoHandle {
        debug!("open_input: devices {:#x}", *devices);
        let mut converted = self.codec.to_current(*devices);
        self.host
            .open_input(&mut converted, sample_rate, format, channel_mask, acoustics)
    }

    fn open_input_on_module(
        &self,
        module: ModuleHandle,
        devices: &mut DeviceMask,
        sample_rate: &mut u32,
        format: &mut AudioFormat,
        channel_mask: &mut ChannelMask,
    ) -> IoHandle {
        debug!("open_input_on_module: module {module}, devices {:#x}", *devices);
        let mut converted = self.codec.to_current(*devices);
        self.host
            .open_input_on_module(module, &mut converted, sample_rate, format, channel_mask)
    }

    fn close_input(&self, input: IoHandle) -> HalResult<()> {
        self.host.close_input(input)
    }

    fn set_stream_volume(
        &self,
        stream: StreamType,
        volume: f32,
        output: IoHandle,
        delay_ms: i32,
    ) -> HalResult<()> {
        debug!("set_stream_volume: stream {stream:?}, volume {volume}, output {output}");
        self.host.set_stream_volume(stream, volume, output, delay_ms)
    }

    fn set_stream_output(&self, stream: StreamType, output: IoHandle) -> HalResult<()> {
        self.host.set_stream_output(stream, output)
    }

    fn set_parameters(&self, io_handle: IoHandle, kv_pairs: &str, delay_ms: i32) {
        let fixed = rewrite_parameters(&self.codec, kv_pairs, ConversionDirection::LegacyToCurrent);
        debug!("service set_parameters: {kv_pairs:?} -> {fixed:?}");
        self.host.set_parameters(io_handle, &fixed, delay_ms);
    }

    fn get_parameters(&self, io_handle: IoHandle, keys: &str) -> String {
        self.host.get_parameters(io_handle, keys)
    }

    fn start_tone(&self, tone: Tone, stream: StreamType) -> HalResult<()> {
        self.host.start_tone(tone, stream)
    }

    fn stop_tone(&self) -> HalResult<()> {
        self.host.stop_tone()
    }

    fn set_voice_volume(&self, volume: f32, delay_ms: i32) -> HalResult<()> {
        debug!("set_voice_volume: {volume}, delay {delay_ms}ms");
        self.host.set_voice_volume(volume, delay_ms)
    }

    fn move_effects(
        &self,
        session: SessionId,
        src_output: IoHandle,
        dst_output: IoHandle,
    ) -> HalResult<()> {
        self.host.move_effects(session, src_output, dst_output)
    }
}
