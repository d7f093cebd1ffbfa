//! Command-line interface definitions for volosd.

use std::{env, ffi::OsString};

use clap::{CommandFactory, Parser, error::ErrorKind};
use logging::LogArgs;

use crate::{
    backend::DeviceKind,
    error::{Error, Result},
    interpreter::{Options, TargetMode},
    notify::{self, NotifierKind},
    pactl,
};

/// Positional grammar appended to `--help`.
const COMMANDS_HELP: &str = "\
Commands:
  +N% | -N% | =N% | N%    raise, lower, or set the volume by N percent
  up | raise | + [N]      raise the volume by N (default 5)
  down | lower | - [N]    lower the volume by N (default 5)
  set | = [N]             set the volume to N (default 5)
  mute | x                mute
  unmute | u              unmute
  toggle-mute | %         toggle mute

Examples:
  volosd +5%         volosd -u up 10        volosd -m toggle-mute";

/// Command-line interface for the `volosd` binary.
#[derive(Parser, Debug)]
#[command(
    name = "volosd",
    about = "Change volume or mute state and show an on-screen indicator",
    version,
    after_help = COMMANDS_HELP
)]
pub struct Cli {
    /// Logging controls.
    #[command(flatten)]
    pub log: LogArgs,

    /// Allow volume above 100%
    #[arg(short = 'b', long = "boost")]
    pub boost: bool,

    /// Target the input device (microphone) instead of the output
    #[arg(short = 'm', long = "mic", conflicts_with = "stream")]
    pub mic: bool,

    /// Device type to target (output|input)
    #[arg(long, value_name = "TYPE")]
    pub stream: Option<DeviceKind>,

    /// Unmute before changing the volume
    #[arg(short = 'u', long = "unmute")]
    pub unmute: bool,

    /// Target the running device instead of the default one
    #[arg(short = 'r', long = "running")]
    pub running: bool,

    /// Notification client to use
    #[arg(long, value_enum, env = "VOLOSD_NOTIFIER", default_value_t = NotifierKind::Avizo)]
    pub notifier: NotifierKind,

    /// Audio control binary
    #[arg(long, env = "VOLOSD_PACTL", default_value = pactl::DEFAULT_PROGRAM, value_name = "PATH")]
    pub pactl: String,

    /// avizo client binary
    #[arg(
        long,
        env = "VOLOSD_AVIZO_CLIENT",
        default_value = notify::DEFAULT_AVIZO_CLIENT,
        value_name = "PATH"
    )]
    pub avizo_client: String,

    /// Command and optional value (see below)
    #[arg(value_name = "COMMAND")]
    pub args: Vec<String>,
}

impl Cli {
    /// Parse the process arguments. `Ok(None)` means help or version was
    /// printed and there is nothing left to do.
    pub fn parse_env() -> Result<Option<Self>> {
        Self::parse_args(env::args_os())
    }

    /// Parse an argv-style list, the first element being the program name.
    pub fn parse_args<I, T>(args: I) -> Result<Option<Self>>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        match Self::try_parse_from(normalize_args(args)) {
            Ok(cli) => Ok(Some(cli)),
            Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
                err.print()?;
                Ok(None)
            }
            Err(err) => Err(invalid_arguments(&err)),
        }
    }

    /// Invocation options derived from the flags.
    pub fn options(&self) -> Options {
        let kind = if self.mic {
            DeviceKind::Input
        } else {
            self.stream.unwrap_or_default()
        };
        Options {
            allow_boost: self.boost,
            kind,
            unmute_on_change: self.unmute,
            target: if self.running {
                TargetMode::Running
            } else {
                TargetMode::Default
            },
        }
    }
}

/// Reduce a clap error to its one-line description.
fn invalid_arguments(err: &clap::Error) -> Error {
    let rendered = err.to_string();
    let line = rendered.lines().next().unwrap_or_default();
    Error::invalid(line.strip_prefix("error: ").unwrap_or(line).trim())
}

/// Whether `token` ends option parsing and begins the positional command.
///
/// A lone `-` is the decrease keyword, and `-` followed by a digit is a
/// shorthand such as `-5%` rather than a flag.
fn starts_command(token: &str) -> bool {
    !token.starts_with('-')
        || token == "-"
        || token.as_bytes().get(1).is_some_and(u8::is_ascii_digit)
}

/// Whether `token` is a long option whose value is the next argument.
fn takes_separate_value(cmd: &clap::Command, token: &str) -> bool {
    let Some(long) = token.strip_prefix("--") else {
        return false;
    };
    !long.contains('=')
        && cmd
            .get_arguments()
            .any(|a| a.get_long() == Some(long) && a.get_action().takes_values())
}

/// Apply getopts semantics to an argv list before clap sees it.
///
/// Option parsing stops at the first token that starts the command; a `--`
/// is inserted there so clap treats everything after it as positional.
pub fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let cmd = Cli::command();
    let mut iter = args.into_iter().map(Into::into);
    let mut out: Vec<OsString> = iter.next().into_iter().collect();
    let mut expect_value = false;
    for arg in iter.by_ref() {
        let token = arg.to_string_lossy().into_owned();
        if expect_value {
            expect_value = false;
        } else if token == "--" {
            out.push(arg);
            break;
        } else if starts_command(&token) {
            out.push("--".into());
            out.push(arg);
            break;
        } else {
            expect_value = takes_separate_value(&cmd, &token);
        }
        out.push(arg);
    }
    out.extend(iter);
    out
}
