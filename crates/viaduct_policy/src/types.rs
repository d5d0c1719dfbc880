//! Policy-Side Types
//!
//! Values the policy shim forwards between host and vendor. None of these
//! change representation between interface generations; only device masks
//! do, and those are translated at the adapter seams.

/// Identifier of a routing strategy, opaque to the shim.
pub type Strategy = u32;

/// Identifier of a signalling tone, opaque to the shim.
pub type Tone = i32;

/// Legacy ringer mode word, forwarded verbatim on the deprecated slot.
pub type RingerMode = u32;

/// Connection state reported for a device endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum DeviceConnectionState {
    Unavailable = 0,
    Available = 1,
}

/// Stream categories the policy routes independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum StreamType {
    Default = -1,
    VoiceCall = 0,
    System = 1,
    Ring = 2,
    Music = 3,
    Alarm = 4,
    Notification = 5,
    BluetoothSco = 6,
    EnforcedAudible = 7,
    Dtmf = 8,
    Tts = 9,
}

/// Usages whose routing can be forced to a device category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ForceUse {
    Communication = 0,
    Media = 1,
    Record = 2,
    Dock = 3,
}

/// Device category a usage can be forced to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ForcedConfig {
    None = 0,
    Speaker = 1,
    Headphones = 2,
    BtSco = 3,
    BtA2dp = 4,
    WiredAccessory = 5,
    BtCarDock = 6,
    BtDeskDock = 7,
    AnalogDock = 8,
    DigitalDock = 9,
    NoBtA2dp = 10,
}

/// Source of a capture stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum AudioSource {
    Default = 0,
    Mic = 1,
    VoiceUplink = 2,
    VoiceDownlink = 3,
    VoiceCall = 4,
    Camcorder = 5,
    VoiceRecognition = 6,
    VoiceCommunication = 7,
}
