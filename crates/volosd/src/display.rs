//! Mapping device state to an indicator icon and a progress fraction.

use std::fmt;

use crate::backend::{DeviceKind, DeviceState};

/// Indicator icon shown by the notifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Icon {
    /// Output volume at or below 33%.
    Low,
    /// Output volume at or below 66%.
    Medium,
    /// Output volume above 66%.
    High,
    /// Output muted.
    Muted,
    /// Input muted.
    MicMuted,
    /// Input live.
    MicUnmuted,
}

impl Icon {
    /// Choose the icon for a device of `kind` in `state`.
    pub fn select(kind: DeviceKind, state: DeviceState) -> Self {
        match kind {
            DeviceKind::Output if state.muted => Self::Muted,
            DeviceKind::Output => match state.volume {
                0..=33 => Self::Low,
                34..=66 => Self::Medium,
                _ => Self::High,
            },
            DeviceKind::Input if state.muted => Self::MicMuted,
            DeviceKind::Input => Self::MicUnmuted,
        }
    }

    /// Short selector name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Muted => "muted",
            Self::MicMuted => "mic_muted",
            Self::MicUnmuted => "mic_unmuted",
        }
    }
}

impl fmt::Display for Icon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fill level of the indicator bar, in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Progress(f64);

impl Progress {
    /// Fraction for a volume percentage; anything over 100 shows a full bar.
    pub fn from_volume(volume: u32) -> Self {
        if volume > 100 {
            Self(1.0)
        } else {
            Self(f64::from(volume) / 100.0)
        }
    }

    /// Raw fraction.
    pub fn value(self) -> f64 {
        self.0
    }

    /// Whole percent, for notifiers that take integer hints.
    pub fn percent(self) -> u32 {
        // Bounded to 0..=100 by construction.
        (self.0 * 100.0).round() as u32
    }
}

impl fmt::Display for Progress {
    /// Two-decimal rendering, e.g. `0.50`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}
