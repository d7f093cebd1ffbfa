//! Executes a parsed [`Command`] against an audio backend and reports the
//! result to a notifier.
//!
//! The sequence is strictly linear: optional unmute, the primary mutation,
//! a state re-query, an optional clamp, then the notification. Any backend
//! failure aborts the rest of the sequence; earlier mutations are not rolled
//! back.

use tracing::{debug, warn};

use crate::{
    backend::{AudioBackend, DeviceKind, DeviceState, DeviceTarget, MuteChange, VolumeChange},
    command::Command,
    display::{Icon, Progress},
    error::Result,
    notify::Notifier,
};

/// Volume ceiling enforced when boosting is not allowed.
pub const MAX_UNBOOSTED_VOLUME: u32 = 100;

/// How the concrete device is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TargetMode {
    /// Always address the backend's default device.
    #[default]
    Default,
    /// Address the first running device, falling back to the default.
    Running,
}

/// Invocation options, fixed once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Options {
    /// Permit volume above 100%.
    pub allow_boost: bool,
    /// Output or input device.
    pub kind: DeviceKind,
    /// Unmute before any volume change.
    pub unmute_on_change: bool,
    /// Device selection strategy.
    pub target: TargetMode,
}

/// What an invocation ended up showing.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    /// Device the commands were sent to.
    pub target: DeviceTarget,
    /// State used for display.
    pub state: DeviceState,
    /// Icon that was sent to the notifier.
    pub icon: Icon,
    /// Progress that was sent to the notifier.
    pub progress: Progress,
    /// Whether a corrective clamp to 100% was issued.
    pub clamped: bool,
}

/// Pick the device to address for this invocation.
pub fn resolve_target<B>(backend: &B, options: &Options) -> Result<DeviceTarget>
where
    B: AudioBackend + ?Sized,
{
    match options.target {
        TargetMode::Default => Ok(DeviceTarget::Default),
        TargetMode::Running => match backend.query_running_device(options.kind)? {
            Some(name) => Ok(DeviceTarget::Named(name)),
            None => {
                warn!(kind = %options.kind, "no running device; using default");
                Ok(DeviceTarget::Default)
            }
        },
    }
}

/// Run `command` to completion.
///
/// Notification failures are logged and do not fail the invocation: the
/// device has already changed by then.
pub fn execute<B, N>(
    command: Command,
    options: &Options,
    backend: &B,
    notifier: &N,
) -> Result<Outcome>
where
    B: AudioBackend + ?Sized,
    N: Notifier + ?Sized,
{
    let kind = options.kind;
    let target = resolve_target(backend, options)?;
    debug!(?command, ?options, ?target, "execute");

    if let Some(change) = command.volume_change() {
        if options.unmute_on_change {
            backend.set_mute(kind, &target, MuteChange::Set(false))?;
        }
        backend.set_volume(kind, &target, change)?;
    } else if let Some(change) = command.mute_change() {
        backend.set_mute(kind, &target, change)?;
    }

    let mut state = backend.state(kind, &target)?;
    debug!(muted = state.muted, volume = state.volume, "state");

    let clamped =
        !options.allow_boost && command.is_volume() && state.volume > MAX_UNBOOSTED_VOLUME;
    if clamped {
        debug!(volume = state.volume, "clamping to {MAX_UNBOOSTED_VOLUME}%");
        backend.set_volume(kind, &target, VolumeChange::Set(MAX_UNBOOSTED_VOLUME))?;
        state.volume = MAX_UNBOOSTED_VOLUME;
    }

    let icon = Icon::select(kind, state);
    let progress = Progress::from_volume(state.volume);
    if let Err(err) = notifier.notify(icon, progress) {
        warn!(%err, "notification failed");
    }

    Ok(Outcome {
        target,
        state,
        icon,
        progress,
        clamped,
    })
}
