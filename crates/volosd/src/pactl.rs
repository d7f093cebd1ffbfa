//! [`AudioBackend`] adapter that drives PulseAudio/PipeWire through `pactl`.
//!
//! All of the textual protocol (`@DEFAULT_SINK@`, `+5%`, `toggle`,
//! `Mute: yes`) is produced and parsed here.

use std::result;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::{
    backend::{AudioBackend, DeviceKind, DeviceTarget, MuteChange, VolumeChange},
    error::{Error, Result},
    process::{CommandRunner, SystemRunner},
};

/// Default name of the control binary.
pub const DEFAULT_PROGRAM: &str = "pactl";

/// First `N%` figure in a `get-*-volume` answer (the front-left channel).
static VOLUME_PERCENT: Lazy<result::Result<Regex, regex::Error>> =
    Lazy::new(|| Regex::new(r"(\d+)%"));

/// Environment for every pactl child: its answers (`Mute: yes`) are
/// translated under other locales.
const PACTL_ENV: &[(&str, &str)] = &[("LC_ALL", "C")];

/// pactl object name for a device kind.
fn object(kind: DeviceKind) -> &'static str {
    match kind {
        DeviceKind::Output => "sink",
        DeviceKind::Input => "source",
    }
}

/// Textual device argument for a target.
fn device_arg(kind: DeviceKind, target: &DeviceTarget) -> String {
    match (target, kind) {
        (DeviceTarget::Named(name), _) => name.clone(),
        (DeviceTarget::Default, DeviceKind::Output) => "@DEFAULT_SINK@".to_string(),
        (DeviceTarget::Default, DeviceKind::Input) => "@DEFAULT_SOURCE@".to_string(),
    }
}

/// Encode a volume change as a pactl volume argument.
fn volume_arg(change: VolumeChange) -> String {
    match change {
        VolumeChange::Raise(n) => format!("+{n}%"),
        VolumeChange::Lower(n) => format!("-{n}%"),
        VolumeChange::Set(n) => format!("{n}%"),
    }
}

/// Encode a mute change as a pactl mute argument.
fn mute_arg(change: MuteChange) -> &'static str {
    match change {
        MuteChange::Set(true) => "true",
        MuteChange::Set(false) => "false",
        MuteChange::Toggle => "toggle",
    }
}

/// Extract the volume percentage from `pactl get-sink-volume` output.
pub fn parse_volume(output: &str) -> Result<u32> {
    let re = VOLUME_PERCENT
        .as_ref()
        .map_err(|e| Error::backend(e.to_string()))?;
    let caps = re
        .captures(output)
        .ok_or_else(|| Error::backend(format!("no volume in {:?}", output.trim())))?;
    caps[1]
        .parse::<u32>()
        .map_err(|_| Error::backend(format!("volume out of range: {}%", &caps[1])))
}

/// Extract the mute flag from `pactl get-sink-mute` output by looking for
/// the `Mute:` attribute.
pub fn parse_mute(output: &str) -> Result<bool> {
    let value = output
        .lines()
        .find_map(|line| line.trim().strip_prefix("Mute:"))
        .map(str::trim)
        .ok_or_else(|| Error::backend(format!("no mute state in {:?}", output.trim())))?;
    match value {
        "yes" | "true" => Ok(true),
        "no" | "false" => Ok(false),
        other => Err(Error::backend(format!("unrecognized mute state {other:?}"))),
    }
}

/// Pick the first RUNNING device from `pactl list short sinks|sources`.
///
/// Monitor sources are skipped: they mirror a sink rather than capture input.
pub fn parse_running(output: &str) -> Option<String> {
    output.lines().find_map(|line| {
        let fields: Vec<&str> = line.split('\t').collect();
        let name = fields.get(1)?;
        let state = fields.last()?;
        (fields.len() >= 3 && state.trim() == "RUNNING" && !name.ends_with(".monitor"))
            .then(|| (*name).to_string())
    })
}

/// Backend that shells out to `pactl` for every operation.
#[derive(Debug, Clone)]
pub struct PactlBackend<R = SystemRunner> {
    /// Binary to invoke.
    program: String,
    /// Executes the binary.
    runner: R,
}

impl PactlBackend<SystemRunner> {
    /// Backend invoking `program` as a real child process.
    pub fn new(program: impl Into<String>) -> Self {
        Self::with_runner(program, SystemRunner)
    }
}

impl<R: CommandRunner> PactlBackend<R> {
    /// Backend invoking `program` through a custom runner.
    pub fn with_runner(program: impl Into<String>, runner: R) -> Self {
        Self {
            program: program.into(),
            runner,
        }
    }

    /// Access the runner, mainly for inspection in tests.
    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Run a pactl subcommand. `--` keeps `-5%` from being read as an option.
    fn pactl(&self, args: &[&str]) -> Result<String> {
        let mut argv = Vec::with_capacity(args.len() + 1);
        argv.push("--".to_string());
        argv.extend(args.iter().map(|a| a.to_string()));
        self.runner.run(&self.program, &argv, PACTL_ENV)
    }
}

impl<R: CommandRunner> AudioBackend for PactlBackend<R> {
    fn query_running_device(&self, kind: DeviceKind) -> Result<Option<String>> {
        let list = format!("{}s", object(kind));
        let out = self.pactl(&["list", "short", &list])?;
        let running = parse_running(&out);
        debug!(%kind, ?running, "running_device");
        Ok(running)
    }

    fn set_volume(
        &self,
        kind: DeviceKind,
        target: &DeviceTarget,
        change: VolumeChange,
    ) -> Result<()> {
        let cmd = format!("set-{}-volume", object(kind));
        self.pactl(&[&cmd, &device_arg(kind, target), &volume_arg(change)])
            .map(drop)
    }

    fn set_mute(&self, kind: DeviceKind, target: &DeviceTarget, change: MuteChange) -> Result<()> {
        let cmd = format!("set-{}-mute", object(kind));
        self.pactl(&[&cmd, &device_arg(kind, target), mute_arg(change)])
            .map(drop)
    }

    fn get_volume(&self, kind: DeviceKind, target: &DeviceTarget) -> Result<u32> {
        let cmd = format!("get-{}-volume", object(kind));
        parse_volume(&self.pactl(&[&cmd, &device_arg(kind, target)])?)
    }

    fn get_mute(&self, kind: DeviceKind, target: &DeviceTarget) -> Result<bool> {
        let cmd = format!("get-{}-mute", object(kind));
        parse_mute(&self.pactl(&[&cmd, &device_arg(kind, target)])?)
    }
}
