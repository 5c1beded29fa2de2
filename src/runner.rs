//! Run external commands and report their outcome.

use std::io;
use std::process::Command;

use anyhow::{Context, Result};
use tracing::{debug, error};

use crate::error::Error;

/// Outcome of a finished command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code of the command, `-1` if it was killed by a signal.
    pub code: i32,
    /// Lines written to stdout, followed by those written to stderr.
    pub lines: Vec<String>,
}

/// Something able to run a shell command line to completion.
pub trait ProcessRunner {
    /// Run `command_line`, blocking until it exits.
    fn run(&self, command_line: &str) -> io::Result<CommandOutput>;
}

/// Runs command lines through `sh -c`.
pub struct ShellRunner;

impl ProcessRunner for ShellRunner {
    fn run(&self, command_line: &str) -> io::Result<CommandOutput> {
        let output = Command::new("sh").arg("-c").arg(command_line).output()?;
        let lines = String::from_utf8_lossy(&output.stdout)
            .lines()
            .chain(String::from_utf8_lossy(&output.stderr).lines())
            .map(str::to_owned)
            .collect();
        Ok(CommandOutput {
            code: output.status.code().unwrap_or(-1),
            lines,
        })
    }
}

/// Quote `arg` so `sh` passes it through as a single literal word.
pub fn shell_quote(arg: &str) -> String {
    format!("'{}'", arg.replace('\'', r"'\''"))
}

/// Run `command_line` with `runner`, failing with
/// [`Error::CommandFailed`] if it exits with a non-zero code.
pub fn execute<R: ProcessRunner>(runner: &R, command_line: &str) -> Result<()> {
    debug!("Running '{command_line}'");
    let CommandOutput { code, lines } = runner
        .run(command_line)
        .with_context(|| format!("Failed to spawn '{command_line}'"))?;
    if code != 0 {
        error!("Command returned exit code '{code}'");
    }
    for line in &lines {
        debug!("{line}");
    }
    if code != 0 {
        return Err(Error::CommandFailed {
            code,
            output: lines,
        }
        .into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    struct FakeRunner {
        result: fn() -> io::Result<CommandOutput>,
        calls: RefCell<Vec<String>>,
    }

    impl FakeRunner {
        fn new(result: fn() -> io::Result<CommandOutput>) -> Self {
            Self {
                result,
                calls: RefCell::new(Vec::new()),
            }
        }
    }

    impl ProcessRunner for FakeRunner {
        fn run(&self, command_line: &str) -> io::Result<CommandOutput> {
            self.calls.borrow_mut().push(command_line.to_owned());
            (self.result)()
        }
    }

    #[test]
    fn test_shell_quote() {
        assert_eq!(shell_quote("registry.axl8.xyz/a/db:v1"), "'registry.axl8.xyz/a/db:v1'");
        assert_eq!(shell_quote("dev;touch${IFS}x"), "'dev;touch${IFS}x'");
        assert_eq!(shell_quote("it's"), r"'it'\''s'");
        assert_eq!(shell_quote(""), "''");
    }

    #[cfg(unix)]
    #[test]
    fn test_shell_quote_keeps_metacharacters_literal() {
        let arg = "db:dev;echo injected$(echo x)'`id`'";
        let output = ShellRunner
            .run(&format!("printf '%s\\n' {}", shell_quote(arg)))
            .unwrap();
        assert_eq!(output.code, 0);
        assert_eq!(output.lines, [arg]);
    }

    #[test]
    fn test_success() {
        let runner = FakeRunner::new(|| {
            Ok(CommandOutput {
                code: 0,
                lines: vec!["latest: Pulling from team/proj/db".into()],
            })
        });
        execute(&runner, "docker pull registry.axl8.xyz/team/proj/db:latest").unwrap();
        assert_eq!(
            *runner.calls.borrow(),
            ["docker pull registry.axl8.xyz/team/proj/db:latest"]
        );
    }

    #[test]
    fn test_failure_carries_code_and_output() {
        let runner = FakeRunner::new(|| {
            Ok(CommandOutput {
                code: 1,
                lines: vec!["error: not found".into()],
            })
        });
        let err = execute(&runner, "docker pull x").unwrap_err();
        match err.downcast_ref::<Error>() {
            Some(Error::CommandFailed { code, output }) => {
                assert_eq!(*code, 1);
                assert_eq!(output, &["error: not found"]);
            }
            other => panic!("expected CommandFailed, got {other:?}"),
        }
        assert!(err.to_string().contains("error: not found"));
    }

    #[test]
    fn test_spawn_failure() {
        let runner = FakeRunner::new(|| Err(io::Error::from(io::ErrorKind::NotFound)));
        let err = execute(&runner, "docker pull x").unwrap_err();
        assert!(err.downcast_ref::<Error>().is_none());
        assert!(err.to_string().contains("docker pull x"));
    }

    #[cfg(unix)]
    #[test]
    fn test_shell_runner_collects_output() {
        let output = ShellRunner
            .run("echo out; echo err >&2; exit 3")
            .unwrap();
        assert_eq!(output.code, 3);
        assert_eq!(output.lines, ["out", "err"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_shell_runner_success() {
        let output = ShellRunner.run("true").unwrap();
        assert_eq!(
            output,
            CommandOutput {
                code: 0,
                lines: vec![],
            }
        );
    }
}
