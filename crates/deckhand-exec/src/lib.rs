//! Subprocess execution for deckhand
//!
//! Every external operation deckhand performs goes through [`run`]: spawn
//! the program, wait for completion, capture both output streams. A non-zero
//! exit is an error carrying the full command line and the captured stderr.

use thiserror::Error;
use tokio::process::Command;

#[derive(Debug, Error)]
pub enum ExecError {
    #[error("failed to spawn `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("command `{command}` exited with code {code}: {stderr}")]
    CommandFailure {
        command: String,
        code: i32,
        stderr: String,
    },
}

/// Captured result of a finished subprocess
#[derive(Clone, Debug)]
pub struct CmdOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

impl CmdOutput {
    /// Non-empty lines of stdout, in order
    pub fn lines(&self) -> Vec<String> {
        self.stdout
            .lines()
            .map(str::trim_end)
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect()
    }
}

/// Run `program` with `args` and wait for it to finish.
///
/// Both streams are captured and decoded as UTF-8 (lossy). There are no
/// retries and no timeout; the call either fails or returns fully-captured
/// output.
pub async fn run(program: &str, args: &[&str]) -> Result<CmdOutput, ExecError> {
    let command = render_command(program, args);
    tracing::debug!(%command, "running subprocess");

    let output = Command::new(program)
        .args(args)
        .output()
        .await
        .map_err(|source| ExecError::Spawn {
            command: command.clone(),
            source,
        })?;

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
    // Processes killed by a signal have no exit code
    let exit_code = output.status.code().unwrap_or(-1);

    if !output.status.success() {
        tracing::warn!(%command, exit_code, "subprocess failed");
        return Err(ExecError::CommandFailure {
            command,
            code: exit_code,
            stderr,
        });
    }

    Ok(CmdOutput {
        stdout,
        stderr,
        exit_code,
    })
}

/// Render the full command line for error messages and traces
pub fn render_command(program: &str, args: &[&str]) -> String {
    let mut rendered = String::from(program);
    for arg in args {
        rendered.push(' ');
        rendered.push_str(arg);
    }
    rendered
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_run_captures_stdout() {
        let out = run("sh", &["-c", "echo hello"]).await.unwrap();
        assert_eq!(out.stdout.trim(), "hello");
        assert_eq!(out.exit_code, 0);
    }

    #[tokio::test]
    async fn test_failure_carries_command_line_and_stderr() {
        let err = run("sh", &["-c", "echo boom >&2; exit 3"])
            .await
            .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("sh -c echo boom >&2; exit 3"));
        assert!(message.contains("boom"));
        match err {
            ExecError::CommandFailure { code, stderr, .. } => {
                assert_eq!(code, 3);
                assert_eq!(stderr.trim(), "boom");
            }
            other => panic!("expected CommandFailure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_missing_binary_is_spawn_error() {
        let err = run("deckhand-no-such-binary", &["--version"])
            .await
            .unwrap_err();
        assert!(matches!(err, ExecError::Spawn { .. }));
    }

    #[test]
    fn test_lines_drops_blanks() {
        let out = CmdOutput {
            stdout: "one\n\ntwo\n".to_string(),
            stderr: String::new(),
            exit_code: 0,
        };
        assert_eq!(out.lines(), vec!["one".to_string(), "two".to_string()]);
    }

    #[test]
    fn test_lines_empty_stdout() {
        let out = CmdOutput {
            stdout: "\n".to_string(),
            stderr: String::new(),
            exit_code: 0,
        };
        assert!(out.lines().is_empty());
    }
}
