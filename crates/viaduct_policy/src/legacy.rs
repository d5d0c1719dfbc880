//! Legacy Policy Interface Generation
//!
//! Operation tables of the policy surface as the vendor module knows
//! them. The vendor implements [`LegacyAudioPolicy`] and
//! [`LegacyPolicyDevice`]; it *consumes* [`LegacyPolicyService`], the
//! callback table through which its policy logic reaches back into the
//! host. Device masks on every one of these tables use the legacy bit
//! layout.

use std::io;
use std::sync::Arc;

use viaduct_hal::{
    AcousticsFlags, AudioFormat, AudioMode, ChannelMask, DeviceMask, EffectDescriptor, EffectId,
    HalResult, IoHandle, ModuleHandle, OutputFlags, SessionId,
};

use crate::types::{
    AudioSource, DeviceConnectionState, ForceUse, ForcedConfig, RingerMode, Strategy, StreamType,
    Tone,
};

/// Host services as the vendor's policy logic invokes them (legacy
/// signatures, legacy mask layout).
///
/// The open slots hand the host mutable stream parameters; the host may
/// adjust them to what it actually provisioned.
pub trait LegacyPolicyService: Send + Sync {
    fn load_module(&self, name: &str) -> ModuleHandle;

    /// Deprecated open retained for vendors that predate module-qualified
    /// opens.
    #[allow(clippy::too_many_arguments)]
    fn open_output(
        &self,
        devices: &mut DeviceMask,
        sample_rate: &mut u32,
        format: &mut AudioFormat,
        channel_mask: &mut ChannelMask,
        latency_ms: &mut u32,
        flags: OutputFlags,
    ) -> IoHandle;

    #[allow(clippy::too_many_arguments)]
    fn open_output_on_module(
        &self,
        module: ModuleHandle,
        devices: &mut DeviceMask,
        sample_rate: &mut u32,
        format: &mut AudioFormat,
        channel_mask: &mut ChannelMask,
        latency_ms: &mut u32,
        flags: OutputFlags,
    ) -> IoHandle;

    fn open_duplicate_output(&self, output1: IoHandle, output2: IoHandle) -> IoHandle;
    fn close_output(&self, output: IoHandle) -> HalResult<()>;
    fn suspend_output(&self, output: IoHandle) -> HalResult<()>;
    fn restore_output(&self, output: IoHandle) -> HalResult<()>;

    /// Deprecated open retained for vendors that predate module-qualified
    /// opens; the acoustics word is forwarded but ignored by current
    /// hosts.
    fn open_input(
        &self,
        devices: &mut DeviceMask,
        sample_rate: &mut u32,
        format: &mut AudioFormat,
        channel_mask: &mut ChannelMask,
        acoustics: AcousticsFlags,
    ) -> IoHandle;

    fn open_input_on_module(
        &self,
        module: ModuleHandle,
        devices: &mut DeviceMask,
        sample_rate: &mut u32,
        format: &mut AudioFormat,
        channel_mask: &mut ChannelMask,
    ) -> IoHandle;

    fn close_input(&self, input: IoHandle) -> HalResult<()>;

    fn set_stream_volume(
        &self,
        stream: StreamType,
        volume: f32,
        output: IoHandle,
        delay_ms: i32,
    ) -> HalResult<()>;

    fn set_stream_output(&self, stream: StreamType, output: IoHandle) -> HalResult<()>;

    /// `kv_pairs` carries legacy-encoded routing values.
    fn set_parameters(&self, io_handle: IoHandle, kv_pairs: &str, delay_ms: i32);
    fn get_parameters(&self, io_handle: IoHandle, keys: &str) -> String;

    fn start_tone(&self, tone: Tone, stream: StreamType) -> HalResult<()>;
    fn stop_tone(&self) -> HalResult<()>;
    fn set_voice_volume(&self, volume: f32, delay_ms: i32) -> HalResult<()>;
    fn move_effects(
        &self,
        session: SessionId,
        src_output: IoHandle,
        dst_output: IoHandle,
    ) -> HalResult<()>;
}

/// Policy object as the vendor implements it.
pub trait LegacyAudioPolicy: Send {
    fn set_device_connection_state(
        &mut self,
        device: DeviceMask,
        state: DeviceConnectionState,
        device_address: &str,
    ) -> HalResult<()>;

    fn device_connection_state(
        &self,
        device: DeviceMask,
        device_address: &str,
    ) -> DeviceConnectionState;

    fn set_phone_state(&mut self, state: AudioMode);

    /// Deprecated, never called by current hosts; still forwarded.
    fn set_ringer_mode(&mut self, mode: RingerMode, mask: RingerMode);

    fn set_force_use(&mut self, usage: ForceUse, config: ForcedConfig);
    fn force_use(&self, usage: ForceUse) -> ForcedConfig;
    fn set_can_mute_enforced_audible(&mut self, can_mute: bool);
    fn init_check(&self) -> HalResult<()>;

    fn output_for(
        &mut self,
        stream: StreamType,
        sample_rate: u32,
        format: AudioFormat,
        channel_mask: ChannelMask,
        flags: OutputFlags,
    ) -> IoHandle;

    fn start_output(
        &mut self,
        output: IoHandle,
        stream: StreamType,
        session: SessionId,
    ) -> HalResult<()>;
    fn stop_output(
        &mut self,
        output: IoHandle,
        stream: StreamType,
        session: SessionId,
    ) -> HalResult<()>;
    fn release_output(&mut self, output: IoHandle);

    fn input_for(
        &mut self,
        source: AudioSource,
        sample_rate: u32,
        format: AudioFormat,
        channel_mask: ChannelMask,
        acoustics: AcousticsFlags,
    ) -> IoHandle;

    fn start_input(&mut self, input: IoHandle) -> HalResult<()>;
    fn stop_input(&mut self, input: IoHandle) -> HalResult<()>;
    fn release_input(&mut self, input: IoHandle);

    fn init_stream_volume(&mut self, stream: StreamType, index_min: i32, index_max: i32);
    fn set_stream_volume_index(&mut self, stream: StreamType, index: i32) -> HalResult<()>;
    fn stream_volume_index(&self, stream: StreamType) -> HalResult<i32>;

    fn strategy_for_stream(&self, stream: StreamType) -> Strategy;
    /// Returned mask is in the legacy layout.
    fn devices_for_stream(&self, stream: StreamType) -> DeviceMask;

    fn output_for_effect(&mut self, desc: &EffectDescriptor) -> IoHandle;
    fn register_effect(
        &mut self,
        desc: &EffectDescriptor,
        output: IoHandle,
        strategy: Strategy,
        session: SessionId,
        id: EffectId,
    ) -> HalResult<()>;
    fn unregister_effect(&mut self, id: EffectId) -> HalResult<()>;
    fn set_effect_enabled(&mut self, id: EffectId, enabled: bool) -> HalResult<()>;

    fn is_stream_active(&self, stream: StreamType, in_past_ms: u32) -> bool;

    fn dump(&self, out: &mut dyn io::Write) -> HalResult<()>;
}

/// Policy device of the legacy generation: the factory for vendor policy
/// objects.
pub trait LegacyPolicyDevice: Send {
    /// Create a vendor policy. `service` is the callback table the
    /// vendor's policy logic uses to reach back into the host for the
    /// lifetime of the returned policy.
    fn create_policy(
        &mut self,
        service: Arc<dyn LegacyPolicyService>,
    ) -> HalResult<Box<dyn LegacyAudioPolicy>>;

    fn destroy_policy(&mut self, policy: Box<dyn LegacyAudioPolicy>) -> HalResult<()>;

    /// Shut the vendor policy device down. Called once, from the shim's
    /// own close path.
    fn close(&mut self) -> HalResult<()>;
}
