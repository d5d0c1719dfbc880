//! Device Mask Layout Conversion
//!
//! A device mask is a 32-bit value selecting one or more physical audio
//! routing endpoints. The two interface generations encode it differently:
//!
//! - **Legacy**: output flags in bits 0-14 with the default marker at
//!   bit 15; input flags in bits 16-23 with the default marker at bit 31.
//!   Direction is implied by which bit range is populated.
//! - **Current**: bit 31 is an explicit "is input" marker, bit 30 is the
//!   default marker for either direction, and both flag sets share the
//!   low bits (outputs gained flags the legacy layout cannot express).
//!
//! A single wrong bit silently selects the wrong physical route, so the
//! conversions here must match the layouts bit for bit.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Bit assignments of the legacy interface generation.
pub mod legacy {
    /* output devices */
    pub const OUT_EARPIECE: u32 = 0x1;
    pub const OUT_SPEAKER: u32 = 0x2;
    pub const OUT_WIRED_HEADSET: u32 = 0x4;
    pub const OUT_WIRED_HEADPHONE: u32 = 0x8;
    pub const OUT_BLUETOOTH_SCO: u32 = 0x10;
    pub const OUT_BLUETOOTH_SCO_HEADSET: u32 = 0x20;
    pub const OUT_BLUETOOTH_SCO_CARKIT: u32 = 0x40;
    pub const OUT_BLUETOOTH_A2DP: u32 = 0x80;
    pub const OUT_BLUETOOTH_A2DP_HEADPHONES: u32 = 0x100;
    pub const OUT_BLUETOOTH_A2DP_SPEAKER: u32 = 0x200;
    pub const OUT_AUX_DIGITAL: u32 = 0x400;
    pub const OUT_ANLG_DOCK_HEADSET: u32 = 0x800;
    pub const OUT_DGTL_DOCK_HEADSET: u32 = 0x1000;
    pub const OUT_USB_ACCESSORY: u32 = 0x2000;
    pub const OUT_USB_DEVICE: u32 = 0x4000;
    pub const OUT_DEFAULT: u32 = 0x8000;
    /// Every bit a legal legacy output mask may carry.
    pub const OUT_ALL: u32 = 0xFFFF;

    /* input devices */
    pub const IN_COMMUNICATION: u32 = 0x10000;
    pub const IN_AMBIENT: u32 = 0x20000;
    pub const IN_BUILTIN_MIC: u32 = 0x40000;
    pub const IN_BLUETOOTH_SCO_HEADSET: u32 = 0x80000;
    pub const IN_WIRED_HEADSET: u32 = 0x100000;
    pub const IN_AUX_DIGITAL: u32 = 0x200000;
    pub const IN_VOICE_CALL: u32 = 0x400000;
    pub const IN_BACK_MIC: u32 = 0x800000;
    pub const IN_DEFAULT: u32 = 0x8000_0000;
    /// Every bit a legal legacy input mask may carry.
    pub const IN_ALL: u32 = 0x80FF_0000;
}

/// Bit assignments of the current interface generation.
pub mod current {
    /// Direction marker: set on every input mask, clear on outputs.
    pub const BIT_IN: u32 = 0x8000_0000;
    /// Default-route marker, valid for either direction.
    pub const BIT_DEFAULT: u32 = 0x4000_0000;

    /* output devices; the low 15 bits are positionally identical to the
     * legacy layout */
    pub const OUT_EARPIECE: u32 = 0x1;
    pub const OUT_SPEAKER: u32 = 0x2;
    pub const OUT_WIRED_HEADSET: u32 = 0x4;
    pub const OUT_WIRED_HEADPHONE: u32 = 0x8;
    pub const OUT_BLUETOOTH_SCO: u32 = 0x10;
    pub const OUT_BLUETOOTH_SCO_HEADSET: u32 = 0x20;
    pub const OUT_BLUETOOTH_SCO_CARKIT: u32 = 0x40;
    pub const OUT_BLUETOOTH_A2DP: u32 = 0x80;
    pub const OUT_BLUETOOTH_A2DP_HEADPHONES: u32 = 0x100;
    pub const OUT_BLUETOOTH_A2DP_SPEAKER: u32 = 0x200;
    pub const OUT_AUX_DIGITAL: u32 = 0x400;
    pub const OUT_ANLG_DOCK_HEADSET: u32 = 0x800;
    pub const OUT_DGTL_DOCK_HEADSET: u32 = 0x1000;
    pub const OUT_USB_ACCESSORY: u32 = 0x2000;
    pub const OUT_USB_DEVICE: u32 = 0x4000;
    /// Introduced after the legacy generation; has no legacy encoding.
    pub const OUT_REMOTE_SUBMIX: u32 = 0x8000;
    pub const OUT_DEFAULT: u32 = BIT_DEFAULT;
    /// Every bit a legal current output mask may carry.
    pub const OUT_ALL: u32 = 0xFFFF | OUT_DEFAULT;

    /* input devices */
    pub const IN_COMMUNICATION: u32 = BIT_IN | 0x1;
    pub const IN_AMBIENT: u32 = BIT_IN | 0x2;
    pub const IN_BUILTIN_MIC: u32 = BIT_IN | 0x4;
    pub const IN_BLUETOOTH_SCO_HEADSET: u32 = BIT_IN | 0x8;
    pub const IN_WIRED_HEADSET: u32 = BIT_IN | 0x10;
    pub const IN_AUX_DIGITAL: u32 = BIT_IN | 0x20;
    pub const IN_VOICE_CALL: u32 = BIT_IN | 0x40;
    pub const IN_BACK_MIC: u32 = BIT_IN | 0x80;
    /// Inputs below were introduced after the legacy generation.
    pub const IN_REMOTE_SUBMIX: u32 = BIT_IN | 0x100;
    pub const IN_ANLG_DOCK_HEADSET: u32 = BIT_IN | 0x200;
    pub const IN_DGTL_DOCK_HEADSET: u32 = BIT_IN | 0x400;
    pub const IN_USB_ACCESSORY: u32 = BIT_IN | 0x800;
    pub const IN_USB_DEVICE: u32 = BIT_IN | 0x1000;
    pub const IN_DEFAULT: u32 = BIT_IN | BIT_DEFAULT;
}

/// Subset of current output bits that the legacy layout can express
/// (bits 0-14). Remote submix has no legacy encoding and is dropped.
const LEGACY_REPRESENTABLE_OUT: u32 = 0x7FFF;

/// Subset of current input bits (after removing the direction marker)
/// that the legacy layout can express. Dock and USB inputs are dropped.
const LEGACY_REPRESENTABLE_IN: u32 = 0xFF;

/// Which way a value is being translated across the version boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionDirection {
    LegacyToCurrent,
    CurrentToLegacy,
}

/// Whether the codec translates masks or leaves them untouched.
///
/// `Passthrough` keeps every call site in place while disabling the bit
/// translation itself, so a routing bug can be bisected to either side of
/// the boundary by flipping this mode. The would-be conversion is still
/// computed and logged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversionMode {
    #[default]
    Translate,
    Passthrough,
}

/// Converts device masks between the legacy and current bit layouts.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeviceMaskCodec {
    mode: ConversionMode,
}

impl DeviceMaskCodec {
    pub fn new(mode: ConversionMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> ConversionMode {
        self.mode
    }

    /// Convert a legacy-layout mask to the current layout.
    ///
    /// Masks fitting neither the output nor the input profile are passed
    /// through unchanged with a warning; there is no error channel at
    /// this layer and callers never produce such masks on purpose.
    pub fn to_current(&self, mask: u32) -> u32 {
        let converted = if mask & !legacy::OUT_ALL == 0 {
            /* The low output bits are positionally identical; only the
             * default marker moves. */
            let mut out = mask & !legacy::OUT_DEFAULT;
            if mask & legacy::OUT_DEFAULT != 0 {
                out |= current::OUT_DEFAULT;
            }
            out
        } else if mask & !legacy::IN_ALL == 0 {
            /* Input bits move down 16 positions and gain the explicit
             * direction marker. */
            let mut input = ((mask & !legacy::IN_DEFAULT) >> 16) | current::BIT_IN;
            if mask & legacy::IN_DEFAULT == legacy::IN_DEFAULT {
                input |= current::IN_DEFAULT;
            }
            input
        } else {
            warn!("legacy device mask is neither input nor output: {mask:#x}");
            mask
        };

        self.apply(mask, converted)
    }

    /// Convert a current-layout mask to the legacy layout.
    ///
    /// Lossy on purpose: flags introduced after the legacy generation
    /// (remote submix, dock/USB inputs) have no legacy encoding and are
    /// silently dropped rather than reported.
    pub fn to_legacy(&self, mask: u32) -> u32 {
        let converted = if mask & !current::OUT_ALL == 0 {
            let mut out = mask & LEGACY_REPRESENTABLE_OUT;
            if mask & current::OUT_DEFAULT != 0 {
                out |= legacy::OUT_DEFAULT;
            }
            out
        } else if mask & current::BIT_IN == current::BIT_IN {
            let mut input = (mask & LEGACY_REPRESENTABLE_IN) << 16;
            if mask & current::IN_DEFAULT == current::IN_DEFAULT {
                input |= legacy::IN_DEFAULT;
            }
            input
        } else {
            warn!("current device mask is neither input nor output: {mask:#x}");
            mask
        };

        self.apply(mask, converted)
    }

    /// Convert `mask` in the requested direction.
    pub fn convert(&self, mask: u32, direction: ConversionDirection) -> u32 {
        match direction {
            ConversionDirection::LegacyToCurrent => self.to_current(mask),
            ConversionDirection::CurrentToLegacy => self.to_legacy(mask),
        }
    }

    fn apply(&self, original: u32, converted: u32) -> u32 {
        match self.mode {
            ConversionMode::Translate => {
                debug!("device mask {original:#x} -> {converted:#x}");
                converted
            }
            ConversionMode::Passthrough => {
                debug!("device mask translation disabled: keeping {original:#x} (would be {converted:#x})");
                original
            }
        }
    }
}
