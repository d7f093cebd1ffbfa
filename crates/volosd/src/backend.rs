//! The audio backend seam and the value types that cross it.
//!
//! Everything on this side of the trait is typed; the textual protocol of a
//! concrete backend lives in its adapter (see [`crate::pactl`]).

use std::{fmt, str::FromStr};

use crate::error::{Error, Result};

/// Which class of device a command targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeviceKind {
    /// Audio output (a sink: speakers, headphones).
    #[default]
    Output,
    /// Audio input (a source: microphone).
    Input,
}

impl DeviceKind {
    /// Stable lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Output => "output",
            Self::Input => "input",
        }
    }
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeviceKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "output" | "sink" => Ok(Self::Output),
            "input" | "source" => Ok(Self::Input),
            _ => Err(Error::UnknownStreamType(s.to_string())),
        }
    }
}

/// Which concrete device of a [`DeviceKind`] to address.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DeviceTarget {
    /// The backend's currently selected default device.
    #[default]
    Default,
    /// A device identified by its backend name.
    Named(String),
}

/// A volume mutation, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeChange {
    /// Relative increase.
    Raise(u32),
    /// Relative decrease.
    Lower(u32),
    /// Absolute level.
    Set(u32),
}

impl VolumeChange {
    /// Volume resulting from applying this change to `current`.
    ///
    /// Volume never drops below zero; there is no upper bound here.
    pub fn apply(self, current: u32) -> u32 {
        match self {
            Self::Raise(n) => current.saturating_add(n),
            Self::Lower(n) => current.saturating_sub(n),
            Self::Set(n) => n,
        }
    }
}

/// A mute mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MuteChange {
    /// Force the mute state.
    Set(bool),
    /// Flip the current mute state.
    Toggle,
}

impl MuteChange {
    /// Mute state resulting from applying this change to `current`.
    pub fn apply(self, current: bool) -> bool {
        match self {
            Self::Set(muted) => muted,
            Self::Toggle => !current,
        }
    }
}

/// Device state as read back after a mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceState {
    /// Whether the device is muted.
    pub muted: bool,
    /// Volume in percent; may exceed 100 when boosted.
    pub volume: u32,
}

/// Control surface of an audio server.
///
/// Every call blocks until the backend has answered. Implementations report
/// failed backend invocations as errors and never substitute defaults.
pub trait AudioBackend {
    /// Name of the first device of `kind` the backend reports as running.
    fn query_running_device(&self, kind: DeviceKind) -> Result<Option<String>>;

    /// Change the volume of a device.
    fn set_volume(&self, kind: DeviceKind, target: &DeviceTarget, change: VolumeChange)
    -> Result<()>;

    /// Change the mute state of a device.
    fn set_mute(&self, kind: DeviceKind, target: &DeviceTarget, change: MuteChange) -> Result<()>;

    /// Current volume of a device, in percent.
    fn get_volume(&self, kind: DeviceKind, target: &DeviceTarget) -> Result<u32>;

    /// Current mute state of a device.
    fn get_mute(&self, kind: DeviceKind, target: &DeviceTarget) -> Result<bool>;

    /// Read mute state, then volume.
    fn state(&self, kind: DeviceKind, target: &DeviceTarget) -> Result<DeviceState> {
        let muted = self.get_mute(kind, target)?;
        let volume = self.get_volume(kind, target)?;
        Ok(DeviceState { muted, volume })
    }
}
