//! On-screen feedback after a volume or mute change.

use clap::ValueEnum;
use notify_rust::{Hint, Notification, Timeout};
use tracing::info;

use crate::{
    display::{Icon, Progress},
    error::{Error, Result},
    process::{CommandRunner, SystemRunner},
};

/// Default name of the avizo client binary.
pub const DEFAULT_AVIZO_CLIENT: &str = "avizo-client";

/// Selectable notification clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum NotifierKind {
    /// The avizo overlay, through `avizo-client`.
    #[default]
    Avizo,
    /// A freedesktop desktop notification.
    Desktop,
    /// No feedback at all.
    None,
}

impl NotifierKind {
    /// Construct the notifier; `avizo_client` is only used by [`Self::Avizo`].
    pub fn build(self, avizo_client: &str) -> Box<dyn Notifier> {
        match self {
            Self::Avizo => Box::new(AvizoNotifier::new(avizo_client)),
            Self::Desktop => Box::new(DesktopNotifier::default()),
            Self::None => Box::new(NullNotifier),
        }
    }
}

/// Receives the final indicator state of an invocation.
pub trait Notifier {
    /// Show `icon` with a bar filled to `progress`.
    fn notify(&self, icon: Icon, progress: Progress) -> Result<()>;
}

/// Discards every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&self, icon: Icon, progress: Progress) -> Result<()> {
        info!(%icon, %progress, "notification_suppressed");
        Ok(())
    }
}

/// Image resource name understood by avizo for an icon.
pub fn avizo_resource(icon: Icon) -> &'static str {
    match icon {
        Icon::Low => "volume_low",
        Icon::Medium => "volume_medium",
        Icon::High => "volume_high",
        Icon::Muted => "volume_muted",
        Icon::MicMuted => "mic_muted",
        Icon::MicUnmuted => "mic_unmuted",
    }
}

/// Drives the avizo overlay through its client binary.
#[derive(Debug, Clone)]
pub struct AvizoNotifier<R = SystemRunner> {
    /// Client binary to invoke.
    program: String,
    /// Executes the client.
    runner: R,
}

impl AvizoNotifier<SystemRunner> {
    /// Notifier invoking `program` as a real child process.
    pub fn new(program: impl Into<String>) -> Self {
        Self::with_runner(program, SystemRunner)
    }
}

impl<R: CommandRunner> AvizoNotifier<R> {
    /// Notifier invoking `program` through a custom runner.
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
}

impl<R: CommandRunner> Notifier for AvizoNotifier<R> {
    fn notify(&self, icon: Icon, progress: Progress) -> Result<()> {
        info!(%icon, %progress, "notification_display");
        let args = [
            format!("--image-resource={}", avizo_resource(icon)),
            format!("--progress={progress}"),
        ];
        self.runner.run(&self.program, &args, &[]).map(drop)
    }
}

/// Freedesktop icon name for an icon.
pub fn desktop_icon(icon: Icon) -> &'static str {
    match icon {
        Icon::Low => "audio-volume-low",
        Icon::Medium => "audio-volume-medium",
        Icon::High => "audio-volume-high",
        Icon::Muted => "audio-volume-muted",
        Icon::MicMuted => "microphone-sensitivity-muted",
        Icon::MicUnmuted => "microphone-sensitivity-high",
    }
}

/// Sends a freedesktop desktop notification over D-Bus.
///
/// Consecutive notifications replace each other on servers that honour the
/// synchronous hint, so holding a volume key does not stack bubbles.
#[derive(Debug, Clone)]
pub struct DesktopNotifier {
    /// Display duration in milliseconds.
    timeout_ms: u32,
}

impl Default for DesktopNotifier {
    fn default() -> Self {
        Self { timeout_ms: 1500 }
    }
}

impl Notifier for DesktopNotifier {
    fn notify(&self, icon: Icon, progress: Progress) -> Result<()> {
        info!(%icon, %progress, "notification_display");
        let summary = match icon {
            Icon::MicMuted | Icon::MicUnmuted => "Microphone",
            _ => "Volume",
        };
        let body = match icon {
            Icon::Muted | Icon::MicMuted => "Muted".to_string(),
            _ => format!("{}%", progress.percent()),
        };
        Notification::new()
            .appname("volosd")
            .summary(summary)
            .body(&body)
            .icon(desktop_icon(icon))
            .hint(Hint::CustomInt("value".into(), progress.percent() as i32))
            .hint(Hint::Custom(
                "x-canonical-private-synchronous".into(),
                "volosd".into(),
            ))
            .hint(Hint::Transient(true))
            .timeout(Timeout::Milliseconds(self.timeout_ms))
            .show()
            .map_err(|e| Error::Notify(e.to_string()))?;
        Ok(())
    }
}
