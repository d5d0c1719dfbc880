//! Recording fakes for both ends of the policy boundary.
//!
//! `FakeHostService` stands in for the host's callback table so tests can
//! observe what the vendor's calls look like after translation;
//! `FakeVendorPolicy` and friends stand in for the vendor side.

use std::io;
use std::sync::{Arc, Mutex};

use viaduct_hal::{
    AcousticsFlags, AudioFormat, AudioMode, ChannelMask, DeviceMask, EffectDescriptor, EffectId,
    HalResult, IoHandle, ModuleHandle, OutputFlags, SessionId,
};

use crate::device::{PolicyModuleLoader, VendorPolicyModule};
use crate::legacy::{LegacyAudioPolicy, LegacyPolicyDevice, LegacyPolicyService};
use crate::traits::PolicyService;
use crate::types::{
    AudioSource, DeviceConnectionState, ForceUse, ForcedConfig, RingerMode, Strategy, StreamType,
    Tone,
};

type Calls = Arc<Mutex<Vec<String>>>;

/// Install a subscriber so `RUST_LOG=debug cargo test` shows the shim's
/// boundary traces.
pub(crate) fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Host-side service recording every call the shim forwards up.
#[derive(Default)]
pub(crate) struct FakeHostService {
    pub(crate) calls: Calls,
    pub(crate) opened_outputs: Arc<Mutex<Vec<(DeviceMask, OutputFlags)>>>,
    pub(crate) opened_inputs: Arc<Mutex<Vec<DeviceMask>>>,
    pub(crate) seen_parameters: Arc<Mutex<Option<(IoHandle, String)>>>,
    parameter_reply: String,
}

impl FakeHostService {
    pub(crate) fn with_parameter_reply(mut self, reply: String) -> Self {
        self.parameter_reply = reply;
        self
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }
}

impl PolicyService for FakeHostService {
    fn load_module(&self, name: &str) -> ModuleHandle {
        self.record(format!("load_module({name})"));
        1
    }

    fn open_output(
        &self,
        devices: &mut DeviceMask,
        _sample_rate: &mut u32,
        _format: &mut AudioFormat,
        _channel_mask: &mut ChannelMask,
        _latency_ms: &mut u32,
        flags: OutputFlags,
    ) -> IoHandle {
        self.opened_outputs.lock().unwrap().push((*devices, flags));
        10
    }

    fn open_output_on_module(
        &self,
        _module: ModuleHandle,
        devices: &mut DeviceMask,
        _sample_rate: &mut u32,
        _format: &mut AudioFormat,
        _channel_mask: &mut ChannelMask,
        _latency_ms: &mut u32,
        flags: OutputFlags,
    ) -> IoHandle {
        self.opened_outputs.lock().unwrap().push((*devices, flags));
        11
    }

    fn open_duplicate_output(&self, output1: IoHandle, output2: IoHandle) -> IoHandle {
        self.record(format!("open_duplicate_output({output1}, {output2})"));
        12
    }

    fn close_output(&self, output: IoHandle) -> HalResult<()> {
        self.record(format!("close_output({output})"));
        Ok(())
    }

    fn suspend_output(&self, output: IoHandle) -> HalResult<()> {
        self.record(format!("suspend_output({output})"));
        Ok(())
    }

    fn restore_output(&self, output: IoHandle) -> HalResult<()> {
        self.record(format!("restore_output({output})"));
        Ok(())
    }

    fn open_input(
        &self,
        devices: &mut DeviceMask,
        _sample_rate: &mut u32,
        _format: &mut AudioFormat,
        _channel_mask: &mut ChannelMask,
        _acoustics: AcousticsFlags,
    ) -> IoHandle {
        self.opened_inputs.lock().unwrap().push(*devices);
        20
    }

    fn open_input_on_module(
        &self,
        _module: ModuleHandle,
        devices: &mut DeviceMask,
        _sample_rate: &mut u32,
        _format: &mut AudioFormat,
        _channel_mask: &mut ChannelMask,
    ) -> IoHandle {
        self.opened_inputs.lock().unwrap().push(*devices);
        21
    }

    fn close_input(&self, input: IoHandle) -> HalResult<()> {
        self.record(format!("close_input({input})"));
        Ok(())
    }

    fn set_stream_volume(
        &self,
        stream: StreamType,
        volume: f32,
        output: IoHandle,
        _delay_ms: i32,
    ) -> HalResult<()> {
        self.record(format!("set_stream_volume({stream:?}, {volume}, {output})"));
        Ok(())
    }

    fn set_stream_output(&self, stream: StreamType, output: IoHandle) -> HalResult<()> {
        self.record(format!("set_stream_output({stream:?}, {output})"));
        Ok(())
    }

    fn set_parameters(&self, io_handle: IoHandle, kv_pairs: &str, _delay_ms: i32) {
        *self.seen_parameters.lock().unwrap() = Some((io_handle, kv_pairs.to_owned()));
    }

    fn get_parameters(&self, _io_handle: IoHandle, _keys: &str) -> String {
        self.parameter_reply.clone()
    }

    fn start_tone(&self, _tone: Tone, _stream: StreamType) -> HalResult<()> {
        self.record("start_tone");
        Ok(())
    }

    fn stop_tone(&self) -> HalResult<()> {
        self.record("stop_tone");
        Ok(())
    }

    fn set_voice_volume(&self, volume: f32, _delay_ms: i32) -> HalResult<()> {
        self.record(format!("set_voice_volume({volume})"));
        Ok(())
    }

    fn move_effects(
        &self,
        session: SessionId,
        src_output: IoHandle,
        dst_output: IoHandle,
    ) -> HalResult<()> {
        self.record(format!("move_effects({session}, {src_output}, {dst_output})"));
        Ok(())
    }
}

/// Vendor policy recording every forwarded call.
pub(crate) struct FakeVendorPolicy {
    pub(crate) calls: Calls,
    pub(crate) seen_devices: Arc<Mutex<Vec<DeviceMask>>>,
    forced: Mutex<ForcedConfig>,
    stream_devices: DeviceMask,
}

impl Default for FakeVendorPolicy {
    fn default() -> Self {
        Self {
            calls: Calls::default(),
            seen_devices: Arc::default(),
            forced: Mutex::new(ForcedConfig::None),
            stream_devices: 0x2,
        }
    }
}

impl FakeVendorPolicy {
    pub(crate) fn with_stream_devices(mut self, devices: DeviceMask) -> Self {
        self.stream_devices = devices;
        self
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }
}

impl LegacyAudioPolicy for FakeVendorPolicy {
    fn set_device_connection_state(
        &mut self,
        device: DeviceMask,
        _state: DeviceConnectionState,
        _device_address: &str,
    ) -> HalResult<()> {
        self.seen_devices.lock().unwrap().push(device);
        Ok(())
    }

    fn device_connection_state(
        &self,
        device: DeviceMask,
        _device_address: &str,
    ) -> DeviceConnectionState {
        self.seen_devices.lock().unwrap().push(device);
        DeviceConnectionState::Unavailable
    }

    fn set_phone_state(&mut self, state: AudioMode) {
        self.record(format!("set_phone_state({state:?})"));
    }

    fn set_ringer_mode(&mut self, mode: RingerMode, mask: RingerMode) {
        self.record(format!("set_ringer_mode({mode}, {mask})"));
    }

    fn set_force_use(&mut self, usage: ForceUse, config: ForcedConfig) {
        self.record(format!("set_force_use({usage:?}, {config:?})"));
        *self.forced.lock().unwrap() = config;
    }

    fn force_use(&self, _usage: ForceUse) -> ForcedConfig {
        *self.forced.lock().unwrap()
    }

    fn set_can_mute_enforced_audible(&mut self, can_mute: bool) {
        self.record(format!("set_can_mute_enforced_audible({can_mute})"));
    }

    fn init_check(&self) -> HalResult<()> {
        Ok(())
    }

    fn output_for(
        &mut self,
        stream: StreamType,
        _sample_rate: u32,
        _format: AudioFormat,
        _channel_mask: ChannelMask,
        _flags: OutputFlags,
    ) -> IoHandle {
        self.record(format!("output_for({stream:?})"));
        5
    }

    fn start_output(
        &mut self,
        output: IoHandle,
        _stream: StreamType,
        _session: SessionId,
    ) -> HalResult<()> {
        self.record(format!("start_output({output})"));
        Ok(())
    }

    fn stop_output(
        &mut self,
        output: IoHandle,
        _stream: StreamType,
        _session: SessionId,
    ) -> HalResult<()> {
        self.record(format!("stop_output({output})"));
        Ok(())
    }

    fn release_output(&mut self, output: IoHandle) {
        self.record(format!("release_output({output})"));
    }

    fn input_for(
        &mut self,
        source: AudioSource,
        _sample_rate: u32,
        _format: AudioFormat,
        _channel_mask: ChannelMask,
        _acoustics: AcousticsFlags,
    ) -> IoHandle {
        self.record(format!("input_for({source:?})"));
        6
    }

    fn start_input(&mut self, input: IoHandle) -> HalResult<()> {
        self.record(format!("start_input({input})"));
        Ok(())
    }

    fn stop_input(&mut self, input: IoHandle) -> HalResult<()> {
        self.record(format!("stop_input({input})"));
        Ok(())
    }

    fn release_input(&mut self, input: IoHandle) {
        self.record(format!("release_input({input})"));
    }

    fn init_stream_volume(&mut self, stream: StreamType, index_min: i32, index_max: i32) {
        self.record(format!("init_stream_volume({stream:?}, {index_min}, {index_max})"));
    }

    fn set_stream_volume_index(&mut self, stream: StreamType, index: i32) -> HalResult<()> {
        self.record(format!("set_stream_volume_index({stream:?}, {index})"));
        Ok(())
    }

    fn stream_volume_index(&self, stream: StreamType) -> HalResult<i32> {
        self.record(format!("stream_volume_index({stream:?})"));
        Ok(3)
    }

    fn strategy_for_stream(&self, _stream: StreamType) -> Strategy {
        0
    }

    fn devices_for_stream(&self, _stream: StreamType) -> DeviceMask {
        self.stream_devices
    }

    fn output_for_effect(&mut self, desc: &EffectDescriptor) -> IoHandle {
        self.record(format!("output_for_effect({})", desc.name));
        7
    }

    fn register_effect(
        &mut self,
        desc: &EffectDescriptor,
        _output: IoHandle,
        _strategy: Strategy,
        _session: SessionId,
        id: EffectId,
    ) -> HalResult<()> {
        self.record(format!("register_effect({}, {id})", desc.name));
        Ok(())
    }

    fn unregister_effect(&mut self, id: EffectId) -> HalResult<()> {
        self.record(format!("unregister_effect({id})"));
        Ok(())
    }

    fn set_effect_enabled(&mut self, id: EffectId, enabled: bool) -> HalResult<()> {
        self.record(format!("set_effect_enabled({id}, {enabled})"));
        Ok(())
    }

    fn is_stream_active(&self, _stream: StreamType, _in_past_ms: u32) -> bool {
        true
    }

    fn dump(&self, out: &mut dyn io::Write) -> HalResult<()> {
        out.write_all(b"fake vendor policy\n")
            .map_err(|_| viaduct_hal::HalError::Vendor(-5))
    }
}

/// Vendor policy device keeping hold of the service tables it was given.
#[derive(Default)]
pub(crate) struct FakeVendorPolicyDevice {
    pub(crate) created_services: Arc<Mutex<Vec<Arc<dyn LegacyPolicyService>>>>,
    pub(crate) destroyed: Arc<Mutex<usize>>,
    pub(crate) closed: Arc<Mutex<bool>>,
}

impl LegacyPolicyDevice for FakeVendorPolicyDevice {
    fn create_policy(
        &mut self,
        service: Arc<dyn LegacyPolicyService>,
    ) -> HalResult<Box<dyn LegacyAudioPolicy>> {
        self.created_services.lock().unwrap().push(service);
        Ok(Box::new(FakeVendorPolicy::default()))
    }

    fn destroy_policy(&mut self, _policy: Box<dyn LegacyAudioPolicy>) -> HalResult<()> {
        *self.destroyed.lock().unwrap() += 1;
        Ok(())
    }

    fn close(&mut self) -> HalResult<()> {
        *self.closed.lock().unwrap() = true;
        Ok(())
    }
}

struct FakeVendorPolicyModule;

impl VendorPolicyModule for FakeVendorPolicyModule {
    fn open_policy_device(&self, _interface: &str) -> HalResult<Box<dyn LegacyPolicyDevice>> {
        Ok(Box::new(FakeVendorPolicyDevice::default()))
    }
}

/// Loader that counts load attempts.
#[derive(Default)]
pub(crate) struct FakePolicyLoader {
    load_count: Mutex<usize>,
    last_module_id: Mutex<Option<String>>,
}

impl FakePolicyLoader {
    pub(crate) fn load_count(&self) -> usize {
        *self.load_count.lock().unwrap()
    }

    pub(crate) fn last_module_id(&self) -> Option<String> {
        self.last_module_id.lock().unwrap().clone()
    }
}

impl PolicyModuleLoader for FakePolicyLoader {
    fn load(&self, module_id: &str) -> HalResult<Arc<dyn VendorPolicyModule>> {
        *self.load_count.lock().unwrap() += 1;
        *self.last_module_id.lock().unwrap() = Some(module_id.to_owned());
        Ok(Arc::new(FakeVendorPolicyModule))
    }
}
