//! Viaduct HAL - Device and Stream Compatibility Shims
//!
//! This crate lets a host that speaks the current audio HAL interface
//! generation drive a vendor module compiled against the previous
//! generation. Neither side is modified: the shim intercepts every call
//! crossing the boundary and repairs its data representation.
//!
//! # Architecture
//!
//! ```text
//! host (current generation)
//!   │  AudioDevice / OutputStream / InputStream
//!   ▼
//! DeviceAdapter ── owns ──▶ OutputStreamAdapter / InputStreamAdapter
//!   │                           │
//!   │  LegacyAudioDevice        │  LegacyOutputStream / LegacyInputStream
//!   ▼                           ▼
//! vendor module (legacy generation, loaded via AudioModuleLoader)
//! ```
//!
//! Device masks pass through the mask codec and parameter blobs through
//! the parameter codec (both from `viaduct_codec`) wherever a device
//! value crosses the boundary. Everything else is a direct synchronous
//! forward; the shim adds no locking, no timeouts and no failure modes of
//! its own beyond the vendor-module load path.

mod config;
mod device;
mod error;
mod legacy;
mod module;
mod stream;
mod traits;
mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use config::ShimConfig;
pub use device::DeviceAdapter;
pub use error::{HalError, HalResult};
pub use legacy::{LegacyAudioDevice, LegacyInputStream, LegacyOutputStream, LegacyStream};
pub use module::{
    vendor_module_id, AudioModuleLoader, AudioShimModule, ModuleCache, VendorAudioModule,
    AUDIO_DEVICE_INTERFACE, AUDIO_MODULE_ID,
};
pub use stream::{InputStreamAdapter, OutputStreamAdapter};
pub use traits::{AudioDevice, InputStream, OutputStream, Stream};
pub use types::{
    output_flags, AcousticsFlags, AudioConfig, AudioFormat, AudioMode, ChannelMask, DeviceMask,
    EffectDescriptor, EffectHandle, EffectId, IoHandle, ModuleHandle, OutputFlags, SessionId,
};
