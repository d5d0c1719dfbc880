//! Policy Adapter
//!
//! Presents the current-generation policy table over the vendor's legacy
//! policy object. Device-valued arguments and results pass through the
//! mask codec in the appropriate direction; operations the legacy
//! generation never defined report fixed defaults without forwarding.

use std::io;
use std::sync::Arc;

use tracing::debug;

use viaduct_codec::DeviceMaskCodec;
use viaduct_hal::{
    AcousticsFlags, AudioFormat, AudioMode, ChannelMask, DeviceMask, EffectDescriptor, EffectId,
    HalResult, IoHandle, OutputFlags, SessionId,
};

use crate::legacy::LegacyAudioPolicy;
use crate::service::PolicyServiceAdapter;
use crate::traits::AudioPolicy;
use crate::types::{
    AudioSource, DeviceConnectionState, ForceUse, ForcedConfig, RingerMode, Strategy, StreamType,
};

/// Current-generation policy surface over a legacy vendor policy.
///
/// Owns the service callback adapter constructed at creation time; the
/// vendor keeps calling through it until the policy is destroyed, so both
/// are released together.
pub struct PolicyAdapter {
    vendor: Box<dyn LegacyAudioPolicy>,
    service: Arc<PolicyServiceAdapter>,
    codec: DeviceMaskCodec,
}

impl PolicyAdapter {
    pub(crate) fn new(
        vendor: Box<dyn LegacyAudioPolicy>,
        service: Arc<PolicyServiceAdapter>,
        codec: DeviceMaskCodec,
    ) -> Self {
        Self {
            vendor,
            service,
            codec,
        }
    }

    /// Surrender the vendor policy for destruction; the service adapter
    /// is released with the returned parts.
    pub(crate) fn into_parts(self) -> (Box<dyn LegacyAudioPolicy>, Arc<PolicyServiceAdapter>) {
        (self.vendor, self.service)
    }
}

impl AudioPolicy for PolicyAdapter {
    fn set_device_connection_state(
        &mut self,
        device: DeviceMask,
        state: DeviceConnectionState,
        device_address: &str,
    ) -> HalResult<()> {
        debug!("set_device_connection_state: {device:#x} -> {state:?}");
        let device = self.codec.to_legacy(device);
        self.vendor
            .set_device_connection_state(device, state, device_address)
    }

    fn device_connection_state(
        &self,
        device: DeviceMask,
        device_address: &str,
    ) -> DeviceConnectionState {
        let device = self.codec.to_legacy(device);
        self.vendor.device_connection_state(device, device_address)
    }

    fn set_phone_state(&mut self, state: AudioMode) {
        debug!("set_phone_state: {state:?}");
        self.vendor.set_phone_state(state);
    }

    fn set_ringer_mode(&mut self, mode: RingerMode, mask: RingerMode) {
        self.vendor.set_ringer_mode(mode, mask);
    }

    fn set_force_use(&mut self, usage: ForceUse, config: ForcedConfig) {
        debug!("set_force_use: {usage:?} -> {config:?}");
        self.vendor.set_force_use(usage, config);
    }

    fn force_use(&self, usage: ForceUse) -> ForcedConfig {
        self.vendor.force_use(usage)
    }

    fn set_can_mute_enforced_audible(&mut self, can_mute: bool) {
        self.vendor.set_can_mute_enforced_audible(can_mute);
    }

    fn init_check(&self) -> HalResult<()> {
        self.vendor.init_check()
    }

    fn output_for(
        &mut self,
        stream: StreamType,
        sample_rate: u32,
        format: AudioFormat,
        channel_mask: ChannelMask,
        flags: OutputFlags,
    ) -> IoHandle {
        self.vendor
            .output_for(stream, sample_rate, format, channel_mask, flags)
    }

    fn start_output(
        &mut self,
        output: IoHandle,
        stream: StreamType,
        session: SessionId,
    ) -> HalResult<()> {
        self.vendor.start_output(output, stream, session)
    }

    fn stop_output(
        &mut self,
        output: IoHandle,
        stream: StreamType,
        session: SessionId,
    ) -> HalResult<()> {
        self.vendor.stop_output(output, stream, session)
    }

    fn release_output(&mut self, output: IoHandle) {
        self.vendor.release_output(output);
    }

    fn input_for(
        &mut self,
        source: AudioSource,
        sample_rate: u32,
        format: AudioFormat,
        channel_mask: ChannelMask,
        acoustics: AcousticsFlags,
    ) -> IoHandle {
        self.vendor
            .input_for(source, sample_rate, format, channel_mask, acoustics)
    }

    fn start_input(&mut self, input: IoHandle) -> HalResult<()> {
        self.vendor.start_input(input)
    }

    fn stop_input(&mut self, input: IoHandle) -> HalResult<()> {
        self.vendor.stop_input(input)
    }

    fn release_input(&mut self, input: IoHandle) {
        self.vendor.release_input(input);
    }

    fn init_stream_volume(&mut self, stream: StreamType, index_min: i32, index_max: i32) {
        debug!("init_stream_volume: {stream:?}, {index_min}..{index_max}");
        self.vendor.init_stream_volume(stream, index_min, index_max);
    }

    fn set_stream_volume_index(&mut self, stream: StreamType, index: i32) -> HalResult<()> {
        self.vendor.set_stream_volume_index(stream, index)
    }

    fn stream_volume_index(&self, stream: StreamType) -> HalResult<i32> {
        self.vendor.stream_volume_index(stream)
    }

    fn set_stream_volume_index_for_device(
        &mut self,
        stream: StreamType,
        index: i32,
        device: DeviceMask,
    ) -> HalResult<()> {
        // The legacy generation keeps one index per stream; the device
        // argument is translated for the log and then dropped.
        let device = self.codec.to_legacy(device);
        debug!("set_stream_volume_index_for_device: {stream:?}, {index}, device {device:#x}");
        self.vendor.set_stream_volume_index(stream, index)
    }

    fn stream_volume_index_for_device(
        &self,
        stream: StreamType,
        device: DeviceMask,
    ) -> HalResult<i32> {
        let device = self.codec.to_legacy(device);
        debug!("stream_volume_index_for_device: {stream:?}, device {device:#x}");
        self.vendor.stream_volume_index(stream)
    }

    fn strategy_for_stream(&self, stream: StreamType) -> Strategy {
        self.vendor.strategy_for_stream(stream)
    }

    fn devices_for_stream(&self, stream: StreamType) -> DeviceMask {
        self.codec.to_current(self.vendor.devices_for_stream(stream))
    }

    fn output_for_effect(&mut self, desc: &EffectDescriptor) -> IoHandle {
        self.vendor.output_for_effect(desc)
    }

    fn register_effect(
        &mut self,
        desc: &EffectDescriptor,
        output: IoHandle,
        strategy: Strategy,
        session: SessionId,
        id: EffectId,
    ) -> HalResult<()> {
        self.vendor
            .register_effect(desc, output, strategy, session, id)
    }

    fn unregister_effect(&mut self, id: EffectId) -> HalResult<()> {
        self.vendor.unregister_effect(id)
    }

    fn set_effect_enabled(&mut self, id: EffectId, enabled: bool) -> HalResult<()> {
        self.vendor.set_effect_enabled(id, enabled)
    }

    fn is_stream_active(&self, stream: StreamType, in_past_ms: u32) -> bool {
        self.vendor.is_stream_active(stream, in_past_ms)
    }

    fn is_stream_active_remotely(&self, _stream: StreamType, _in_past_ms: u32) -> bool {
        // The wrapped generation has no notion of remote activity.
        false
    }

    fn is_source_active(&self, _source: AudioSource) -> bool {
        false
    }

    fn dump(&self, out: &mut dyn io::Write) -> HalResult<()> {
        self.vendor.dump(out)
    }
}
