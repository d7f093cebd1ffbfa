//! Blocking execution of external commands.

use std::process::{Command, Stdio};

use tracing::{debug, trace};

use crate::error::{Error, Result};

/// Runs an external program to completion and returns its stdout.
///
/// A non-zero exit status is an error; callers never see partial output from
/// a failed command.
pub trait CommandRunner {
    /// Run `program` with `args` and extra `env` variables, wait for it, and
    /// return captured stdout.
    fn run(&self, program: &str, args: &[String], env: &[(&str, &str)]) -> Result<String>;
}

/// Production runner backed by [`std::process::Command`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[String], env: &[(&str, &str)]) -> Result<String> {
        debug!(program, ?args, ?env, "exec");
        let output = Command::new(program)
            .args(args)
            .envs(env.iter().copied())
            .stdin(Stdio::null())
            .output()
            .map_err(|source| Error::Spawn {
                program: program.to_string(),
                source,
            })?;
        if !output.status.success() {
            return Err(Error::CommandFailed {
                program: program.to_string(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        trace!(program, stdout = %stdout.trim_end(), "exec_done");
        Ok(stdout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn captures_stdout() {
        let out = SystemRunner
            .run("sh", &args(&["-c", "echo hello"]), &[])
            .unwrap();
        assert_eq!(out, "hello\n");
    }

    #[test]
    fn env_overrides_reach_the_child() {
        let out = SystemRunner
            .run(
                "sh",
                &args(&["-c", "echo \"$LC_ALL\""]),
                &[("LC_ALL", "C")],
            )
            .unwrap();
        assert_eq!(out, "C\n");
    }

    #[test]
    fn non_zero_exit_is_an_error() {
        let err = SystemRunner
            .run("sh", &args(&["-c", "echo oops >&2; exit 3"]), &[])
            .unwrap_err();
        match err {
            Error::CommandFailed {
                program,
                status,
                stderr,
            } => {
                assert_eq!(program, "sh");
                assert_eq!(status.code(), Some(3));
                assert_eq!(stderr, "oops");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn missing_binary_is_a_spawn_error() {
        let err = SystemRunner
            .run("volosd-definitely-not-installed", &[], &[])
            .unwrap_err();
        assert!(matches!(err, Error::Spawn { .. }));
    }
}
