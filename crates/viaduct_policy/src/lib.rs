//! Viaduct Policy - Policy Compatibility Shim
//!
//! Wraps a vendor policy module of the legacy interface generation so a
//! current-generation host can drive it. Unlike the device shim, the
//! boundary here is crossed in both directions: the host calls down into
//! the vendor policy through [`PolicyAdapter`], and the vendor's policy
//! logic calls back up into the host through [`PolicyServiceAdapter`].
//!
//! # Architecture
//!
//! ```text
//! host (current generation)
//!   │  AudioPolicy                       ▲  PolicyService
//!   ▼                                    │
//! PolicyAdapter ── owns ──▶ PolicyServiceAdapter
//!   │                                    ▲
//!   │  LegacyAudioPolicy                 │  LegacyPolicyService
//!   ▼                                    │
//! vendor policy module (legacy generation)
//! ```
//!
//! Device masks pass through the mask codec in the direction appropriate
//! to each crossing; parameter blobs travelling vendor-to-host are
//! rewritten on `set_parameters`, the one slot that carries routing
//! values upward.

mod device;
mod legacy;
mod policy;
mod service;
mod traits;
mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use device::{
    PolicyDeviceAdapter, PolicyModuleLoader, PolicyShimModule, VendorPolicyModule,
    POLICY_INTERFACE, POLICY_MODULE_ID,
};
pub use legacy::{LegacyAudioPolicy, LegacyPolicyDevice, LegacyPolicyService};
pub use policy::PolicyAdapter;
pub use service::PolicyServiceAdapter;
pub use traits::{AudioPolicy, PolicyService};
pub use types::{
    AudioSource, DeviceConnectionState, ForceUse, ForcedConfig, RingerMode, Strategy, StreamType,
    Tone,
};

// Re-export the pieces of the device shim the policy surface shares.
pub use viaduct_hal::{HalError, HalResult, ShimConfig};
