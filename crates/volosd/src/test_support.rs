//! Test doubles for the backend, command runner, and notifier seams.
//! These helpers are public so integration tests can use them; they never
//! touch the real audio server.

use std::{
    collections::{HashMap, HashSet},
    os::unix::process::ExitStatusExt,
    process::ExitStatus,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use parking_lot::Mutex;

use crate::{
    backend::{AudioBackend, DeviceKind, DeviceState, DeviceTarget, MuteChange, VolumeChange},
    display::{Icon, Progress},
    error::{Error, Result},
    notify::Notifier,
    process::CommandRunner,
};

/// Exit status reported for scripted failures (exit code 1).
fn failed_status() -> ExitStatus {
    ExitStatus::from_raw(1 << 8)
}

/// [`CommandRunner`] that records invocations and replies from a script.
///
/// Replies are keyed by the first argument that is not a bare `--`
/// (the pactl subcommand, for example). Unscripted calls succeed with empty
/// output.
#[derive(Clone, Default)]
pub struct ScriptedRunner {
    /// Rendered command lines, oldest first.
    calls: Arc<Mutex<Vec<String>>>,
    /// Environment overrides passed with each call, parallel to `calls`.
    envs: Arc<Mutex<Vec<Vec<(String, String)>>>>,
    /// Stdout per key.
    replies: Arc<Mutex<HashMap<String, String>>>,
    /// Keys that exit unsuccessfully.
    failures: Arc<Mutex<HashSet<String>>>,
}

impl ScriptedRunner {
    /// Runner with an empty script.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reply to `key` with `stdout`.
    pub fn respond(self, key: &str, stdout: &str) -> Self {
        self.replies.lock().insert(key.to_string(), stdout.to_string());
        self
    }

    /// Make `key` exit unsuccessfully.
    pub fn fail(self, key: &str) -> Self {
        self.failures.lock().insert(key.to_string());
        self
    }

    /// Every invocation so far, rendered as `program arg arg ...`.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    /// Environment overrides of every invocation so far, oldest first.
    pub fn envs(&self) -> Vec<Vec<(String, String)>> {
        self.envs.lock().clone()
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(&self, program: &str, args: &[String], env: &[(&str, &str)]) -> Result<String> {
        let mut line = program.to_string();
        for arg in args {
            line.push(' ');
            line.push_str(arg);
        }
        self.calls.lock().push(line);
        self.envs.lock().push(
            env.iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        );
        let key = args
            .iter()
            .find(|a| a.as_str() != "--")
            .cloned()
            .unwrap_or_default();
        if self.failures.lock().contains(&key) {
            return Err(Error::CommandFailed {
                program: program.to_string(),
                status: failed_status(),
                stderr: format!("scripted failure for {key}"),
            });
        }
        Ok(self.replies.lock().get(&key).cloned().unwrap_or_default())
    }
}

/// In-memory audio server holding one device per [`DeviceKind`].
///
/// Calls are recorded as short strings such as `set_volume(output, +10%)`
/// so tests can assert on ordering.
#[derive(Clone)]
pub struct MockBackend {
    /// Recorded calls, oldest first.
    calls: Arc<Mutex<Vec<String>>>,
    /// Default output device.
    output: Arc<Mutex<DeviceState>>,
    /// Default input device.
    input: Arc<Mutex<DeviceState>>,
    /// Name answered by `query_running_device`.
    running: Arc<Mutex<Option<String>>>,
    /// Fail `set_mute` calls.
    fail_set_mute: Arc<AtomicBool>,
    /// Fail `set_volume` calls.
    fail_set_volume: Arc<AtomicBool>,
}

impl Default for MockBackend {
    fn default() -> Self {
        let idle = DeviceState {
            muted: false,
            volume: 50,
        };
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            output: Arc::new(Mutex::new(idle)),
            input: Arc::new(Mutex::new(idle)),
            running: Arc::new(Mutex::new(None)),
            fail_set_mute: Arc::new(AtomicBool::new(false)),
            fail_set_volume: Arc::new(AtomicBool::new(false)),
        }
    }
}

impl MockBackend {
    /// Backend with both devices unmuted at 50%.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the state of the `kind` device.
    pub fn set_state(&self, kind: DeviceKind, state: DeviceState) {
        *self.device(kind).lock() = state;
    }

    /// Current state of the `kind` device, without recording a call.
    pub fn peek(&self, kind: DeviceKind) -> DeviceState {
        *self.device(kind).lock()
    }

    /// Name reported by [`AudioBackend::query_running_device`].
    pub fn set_running(&self, name: Option<&str>) {
        *self.running.lock() = name.map(str::to_string);
    }

    /// Make every `set_mute` call fail.
    pub fn set_fail_set_mute(&self, v: bool) {
        self.fail_set_mute.store(v, Ordering::SeqCst);
    }

    /// Make every `set_volume` call fail.
    pub fn set_fail_set_volume(&self, v: bool) {
        self.fail_set_volume.store(v, Ordering::SeqCst);
    }

    /// Recorded calls, oldest first.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    /// Whether a recorded call starts with `prefix`.
    pub fn calls_contains(&self, prefix: &str) -> bool {
        self.calls.lock().iter().any(|c| c.starts_with(prefix))
    }

    /// Storage for the `kind` device.
    fn device(&self, kind: DeviceKind) -> &Arc<Mutex<DeviceState>> {
        match kind {
            DeviceKind::Output => &self.output,
            DeviceKind::Input => &self.input,
        }
    }

    /// Append to the call log.
    fn note(&self, call: String) {
        self.calls.lock().push(call);
    }

    /// Error returned by a switched-off mutation.
    fn failure(call: &str) -> Error {
        Error::CommandFailed {
            program: "mock".to_string(),
            status: failed_status(),
            stderr: format!("{call} failed"),
        }
    }
}

/// Render a target for call logs.
fn target_label(target: &DeviceTarget) -> &str {
    match target {
        DeviceTarget::Default => "default",
        DeviceTarget::Named(name) => name,
    }
}

impl AudioBackend for MockBackend {
    fn query_running_device(&self, kind: DeviceKind) -> Result<Option<String>> {
        self.note(format!("query_running({kind})"));
        Ok(self.running.lock().clone())
    }

    fn set_volume(
        &self,
        kind: DeviceKind,
        target: &DeviceTarget,
        change: VolumeChange,
    ) -> Result<()> {
        let arg = match change {
            VolumeChange::Raise(n) => format!("+{n}%"),
            VolumeChange::Lower(n) => format!("-{n}%"),
            VolumeChange::Set(n) => format!("{n}%"),
        };
        self.note(format!("set_volume({kind}, {}, {arg})", target_label(target)));
        if self.fail_set_volume.load(Ordering::SeqCst) {
            return Err(Self::failure("set_volume"));
        }
        let mut dev = self.device(kind).lock();
        dev.volume = change.apply(dev.volume);
        Ok(())
    }

    fn set_mute(&self, kind: DeviceKind, target: &DeviceTarget, change: MuteChange) -> Result<()> {
        let arg = match change {
            MuteChange::Set(v) => v.to_string(),
            MuteChange::Toggle => "toggle".to_string(),
        };
        self.note(format!("set_mute({kind}, {}, {arg})", target_label(target)));
        if self.fail_set_mute.load(Ordering::SeqCst) {
            return Err(Self::failure("set_mute"));
        }
        let mut dev = self.device(kind).lock();
        dev.muted = change.apply(dev.muted);
        Ok(())
    }

    fn get_volume(&self, kind: DeviceKind, target: &DeviceTarget) -> Result<u32> {
        self.note(format!("get_volume({kind}, {})", target_label(target)));
        Ok(self.device(kind).lock().volume)
    }

    fn get_mute(&self, kind: DeviceKind, target: &DeviceTarget) -> Result<bool> {
        self.note(format!("get_mute({kind}, {})", target_label(target)));
        Ok(self.device(kind).lock().muted)
    }
}

/// [`Notifier`] that remembers what it was asked to show.
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    /// Notifications so far, oldest first.
    shown: Arc<Mutex<Vec<(Icon, Progress)>>>,
    /// Fail every `notify` call.
    fail: Arc<AtomicBool>,
}

impl RecordingNotifier {
    /// Empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `notify` return an error (after recording the call).
    pub fn set_fail(&self, v: bool) {
        self.fail.store(v, Ordering::SeqCst);
    }

    /// Notifications so far, oldest first.
    pub fn shown(&self) -> Vec<(Icon, Progress)> {
        self.shown.lock().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, icon: Icon, progress: Progress) -> Result<()> {
        self.shown.lock().push((icon, progress));
        if self.fail.load(Ordering::SeqCst) {
            return Err(Error::Notify("recording notifier told to fail".into()));
        }
        Ok(())
    }
}
