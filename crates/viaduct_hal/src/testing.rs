//! Recording fakes for the vendor side of the boundary.
//!
//! Every fake notes what the shim forwarded to it so tests can assert on
//! the exact masks, flags and blobs the vendor would have observed.

use std::io;
use std::sync::{Arc, Mutex};

use crate::error::{HalError, HalResult};
use crate::legacy::{LegacyAudioDevice, LegacyInputStream, LegacyOutputStream, LegacyStream};
use crate::module::{AudioModuleLoader, VendorAudioModule};
use crate::types::{
    AcousticsFlags, AudioConfig, AudioFormat, AudioMode, ChannelMask, DeviceMask, EffectHandle,
    OutputFlags,
};

type Calls = Arc<Mutex<Vec<String>>>;
type SeenParameters = Arc<Mutex<Option<String>>>;

/// Install a subscriber so `RUST_LOG=debug cargo test` shows the shim's
/// boundary traces.
pub(crate) fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[derive(Default)]
pub(crate) struct FakeOutputStream {
    calls: Calls,
    seen_parameters: SeenParameters,
    parameter_reply: String,
}

impl FakeOutputStream {
    pub(crate) fn calls(&self) -> Calls {
        self.calls.clone()
    }

    pub(crate) fn parameters(&self) -> SeenParameters {
        self.seen_parameters.clone()
    }

    pub(crate) fn with_parameter_reply(mut self, reply: String) -> Self {
        self.parameter_reply = reply;
        self
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }
}

impl LegacyStream for FakeOutputStream {
    fn sample_rate(&self) -> u32 {
        44100
    }

    fn set_sample_rate(&mut self, rate: u32) -> HalResult<()> {
        self.record(format!("set_sample_rate({rate})"));
        Ok(())
    }

    fn buffer_size(&self) -> usize {
        4096
    }

    fn channels(&self) -> ChannelMask {
        0x3
    }

    fn format(&self) -> AudioFormat {
        0x1
    }

    fn set_format(&mut self, format: AudioFormat) -> HalResult<()> {
        self.record(format!("set_format({format})"));
        Ok(())
    }

    fn standby(&mut self) -> HalResult<()> {
        self.record("standby");
        Ok(())
    }

    fn dump(&self, out: &mut dyn io::Write) -> HalResult<()> {
        out.write_all(b"fake output stream\n")
            .map_err(|_| HalError::Vendor(-5))
    }

    fn set_parameters(&mut self, kv_pairs: &str) -> HalResult<()> {
        *self.seen_parameters.lock().unwrap() = Some(kv_pairs.to_owned());
        Ok(())
    }

    fn get_parameters(&self, _keys: &str) -> String {
        self.parameter_reply.clone()
    }

    fn add_audio_effect(&mut self, effect: EffectHandle) -> HalResult<()> {
        self.record(format!("add_audio_effect({})", effect.0));
        Ok(())
    }

    fn remove_audio_effect(&mut self, effect: EffectHandle) -> HalResult<()> {
        self.record(format!("remove_audio_effect({})", effect.0));
        Ok(())
    }
}

impl LegacyOutputStream for FakeOutputStream {
    fn latency(&self) -> u32 {
        13
    }

    fn set_volume(&mut self, left: f32, right: f32) -> HalResult<()> {
        self.record(format!("set_volume({left}, {right})"));
        Ok(())
    }

    fn write(&mut self, buffer: &[u8]) -> HalResult<usize> {
        self.record(format!("write({})", buffer.len()));
        Ok(buffer.len())
    }

    fn render_position(&self) -> HalResult<u32> {
        Ok(0)
    }
}

#[derive(Default)]
pub(crate) struct FakeInputStream {
    calls: Calls,
    seen_parameters: SeenParameters,
    parameter_reply: String,
}

impl FakeInputStream {
    pub(crate) fn calls(&self) -> Calls {
        self.calls.clone()
    }

    pub(crate) fn parameters(&self) -> SeenParameters {
        self.seen_parameters.clone()
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }
}

impl LegacyStream for FakeInputStream {
    fn sample_rate(&self) -> u32 {
        8000
    }

    fn set_sample_rate(&mut self, rate: u32) -> HalResult<()> {
        self.record(format!("set_sample_rate({rate})"));
        Ok(())
    }

    fn buffer_size(&self) -> usize {
        320
    }

    fn channels(&self) -> ChannelMask {
        0x1
    }

    fn format(&self) -> AudioFormat {
        0x1
    }

    fn set_format(&mut self, format: AudioFormat) -> HalResult<()> {
        self.record(format!("set_format({format})"));
        Ok(())
    }

    fn standby(&mut self) -> HalResult<()> {
        self.record("standby");
        Ok(())
    }

    fn dump(&self, out: &mut dyn io::Write) -> HalResult<()> {
        out.write_all(b"fake input stream\n")
            .map_err(|_| HalError::Vendor(-5))
    }

    fn set_parameters(&mut self, kv_pairs: &str) -> HalResult<()> {
        *self.seen_parameters.lock().unwrap() = Some(kv_pairs.to_owned());
        Ok(())
    }

    fn get_parameters(&self, _keys: &str) -> String {
        self.parameter_reply.clone()
    }

    fn add_audio_effect(&mut self, effect: EffectHandle) -> HalResult<()> {
        self.record(format!("add_audio_effect({})", effect.0));
        Ok(())
    }

    fn remove_audio_effect(&mut self, effect: EffectHandle) -> HalResult<()> {
        self.record(format!("remove_audio_effect({})", effect.0));
        Ok(())
    }
}

impl LegacyInputStream for FakeInputStream {
    fn set_gain(&mut self, gain: f32) -> HalResult<()> {
        self.record(format!("set_gain({gain})"));
        Ok(())
    }

    fn read(&mut self, buffer: &mut [u8]) -> HalResult<usize> {
        self.record(format!("read({})", buffer.len()));
        buffer.fill(0);
        Ok(buffer.len())
    }

    fn input_frames_lost(&mut self) -> u32 {
        0
    }
}

/// Vendor device recording every forwarded call.
pub(crate) struct FakeVendorDevice {
    pub(crate) calls: Calls,
    pub(crate) opened_outputs: Arc<Mutex<Vec<(DeviceMask, OutputFlags)>>>,
    pub(crate) opened_inputs: Arc<Mutex<Vec<DeviceMask>>>,
    pub(crate) closed_outputs: Arc<Mutex<usize>>,
    pub(crate) closed_inputs: Arc<Mutex<usize>>,
    pub(crate) seen_parameters: SeenParameters,
    pub(crate) buffer_size_queries: Arc<Mutex<Vec<(u32, AudioFormat, u32)>>>,
    supported: DeviceMask,
    open_failure: Option<i32>,
    parameter_reply: String,
}

impl Default for FakeVendorDevice {
    fn default() -> Self {
        Self {
            calls: Calls::default(),
            opened_outputs: Arc::default(),
            opened_inputs: Arc::default(),
            closed_outputs: Arc::default(),
            closed_inputs: Arc::default(),
            seen_parameters: SeenParameters::default(),
            buffer_size_queries: Arc::default(),
            supported: 0x3,
            open_failure: None,
            parameter_reply: String::new(),
        }
    }
}

impl FakeVendorDevice {
    pub(crate) fn with_supported(mut self, supported: DeviceMask) -> Self {
        self.supported = supported;
        self
    }

    pub(crate) fn with_open_failure(mut self, code: i32) -> Self {
        self.open_failure = Some(code);
        self
    }

    pub(crate) fn with_parameter_reply(mut self, reply: String) -> Self {
        self.parameter_reply = reply;
        self
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }
}

impl LegacyAudioDevice for FakeVendorDevice {
    fn supported_devices(&self) -> DeviceMask {
        self.supported
    }

    fn init_check(&self) -> HalResult<()> {
        Ok(())
    }

    fn set_voice_volume(&mut self, volume: f32) -> HalResult<()> {
        self.record(format!("set_voice_volume({volume})"));
        Ok(())
    }

    fn set_master_volume(&mut self, volume: f32) -> HalResult<()> {
        self.record(format!("set_master_volume({volume})"));
        Ok(())
    }

    fn set_mode(&mut self, mode: AudioMode) -> HalResult<()> {
        self.record(format!("set_mode({mode:?})"));
        Ok(())
    }

    fn set_mic_mute(&mut self, muted: bool) -> HalResult<()> {
        self.record(format!("set_mic_mute({muted})"));
        Ok(())
    }

    fn mic_mute(&self) -> HalResult<bool> {
        Ok(false)
    }

    fn set_parameters(&mut self, kv_pairs: &str) -> HalResult<()> {
        *self.seen_parameters.lock().unwrap() = Some(kv_pairs.to_owned());
        Ok(())
    }

    fn get_parameters(&self, _keys: &str) -> String {
        self.parameter_reply.clone()
    }

    fn input_buffer_size(
        &self,
        sample_rate: u32,
        format: AudioFormat,
        channel_count: u32,
    ) -> HalResult<usize> {
        self.buffer_size_queries
            .lock()
            .unwrap()
            .push((sample_rate, format, channel_count));
        Ok((sample_rate / 100 * channel_count * 2) as usize)
    }

    fn open_output_stream(
        &mut self,
        devices: DeviceMask,
        flags: OutputFlags,
        _config: &mut AudioConfig,
    ) -> HalResult<Box<dyn LegacyOutputStream>> {
        self.opened_outputs.lock().unwrap().push((devices, flags));
        if let Some(code) = self.open_failure {
            return Err(HalError::Vendor(code));
        }
        Ok(Box::new(FakeOutputStream::default()))
    }

    fn close_output_stream(&mut self, _stream: Box<dyn LegacyOutputStream>) {
        *self.closed_outputs.lock().unwrap() += 1;
    }

    fn open_input_stream(
        &mut self,
        devices: DeviceMask,
        _config: &mut AudioConfig,
        _acoustics: AcousticsFlags,
    ) -> HalResult<Box<dyn LegacyInputStream>> {
        self.opened_inputs.lock().unwrap().push(devices);
        if let Some(code) = self.open_failure {
            return Err(HalError::Vendor(code));
        }
        Ok(Box::new(FakeInputStream::default()))
    }

    fn close_input_stream(&mut self, _stream: Box<dyn LegacyInputStream>) {
        *self.closed_inputs.lock().unwrap() += 1;
    }

    fn dump(&self, out: &mut dyn io::Write) -> HalResult<()> {
        out.write_all(b"fake vendor device\n")
            .map_err(|_| HalError::Vendor(-5))
    }

    fn close(&mut self) -> HalResult<()> {
        self.record("close");
        Ok(())
    }
}

struct FakeVendorModule;

impl VendorAudioModule for FakeVendorModule {
    fn open_device(&self, _interface: &str) -> HalResult<Box<dyn LegacyAudioDevice>> {
        Ok(Box::new(FakeVendorDevice::default()))
    }
}

/// Loader that counts load attempts and can fail the first one.
#[derive(Default)]
pub(crate) struct FakeLoader {
    load_count: Mutex<usize>,
    last_module_id: Mutex<Option<String>>,
    fail_first: bool,
}

impl FakeLoader {
    pub(crate) fn failing_first_load(mut self) -> Self {
        self.fail_first = true;
        self
    }

    pub(crate) fn load_count(&self) -> usize {
        *self.load_count.lock().unwrap()
    }

    pub(crate) fn last_module_id(&self) -> Option<String> {
        self.last_module_id.lock().unwrap().clone()
    }
}

impl AudioModuleLoader for FakeLoader {
    fn load(&self, module_id: &str) -> HalResult<Arc<dyn VendorAudioModule>> {
        let mut count = self.load_count.lock().unwrap();
        *count += 1;
        *self.last_module_id.lock().unwrap() = Some(module_id.to_owned());

        if self.fail_first && *count == 1 {
            return Err(HalError::ModuleLoad {
                module: module_id.to_owned(),
                reason: "not found".into(),
            });
        }
        Ok(Arc::new(FakeVendorModule))
    }
}
