//! Shim Configuration

use serde::{Deserialize, Serialize};

use viaduct_codec::{ConversionMode, DeviceMaskCodec};

/// Behavior switches for the compatibility shim.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ShimConfig {
    /// Whether device masks are translated between bit layouts or passed
    /// through untouched. Passthrough leaves every call site active while
    /// disabling the translation itself, which narrows a routing bug to
    /// one side of the boundary.
    pub conversion: ConversionMode,

    /// Forward the rewritten parameter blob to the vendor on capture
    /// streams.
    ///
    /// The shim has always rewritten the blob on the capture path but
    /// handed the vendor the original string, unlike the playback path
    /// which forwards the rewritten one. Off keeps that behavior; on
    /// makes both paths forward the rewritten blob.
    pub rewrite_capture_parameters: bool,
}

impl ShimConfig {
    /// Mask codec configured for this shim.
    pub fn codec(&self) -> DeviceMaskCodec {
        DeviceMaskCodec::new(self.conversion)
    }
}
