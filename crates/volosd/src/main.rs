//! Entry point for the `volosd` binary.

use std::{io, process};

use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, registry};
use volosd::{Result, cli::Cli, command::Command, interpreter, pactl::PactlBackend};

/// Run once; report any error on stderr and exit 1.
fn main() {
    if let Err(err) = run() {
        debug!(?err, "invocation failed");
        eprintln!("{}: {err}", env!("CARGO_BIN_NAME"));
        process::exit(1);
    }
}

/// Parse arguments, install logging, and run the command.
fn run() -> Result<()> {
    let Some(cli) = Cli::parse_env()? else {
        return Ok(());
    };
    let env_filter = logging::env_filter_from_spec(&cli.log.spec());
    registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(io::stderr).without_time())
        .try_init()
        .ok();

    let command = Command::parse(cli.args.as_slice())?;
    let options = cli.options();
    let backend = PactlBackend::new(cli.pactl.as_str());
    let notifier = cli.notifier.build(&cli.avizo_client);
    interpreter::execute(command, &options, &backend, notifier.as_ref())?;
    Ok(())
}
