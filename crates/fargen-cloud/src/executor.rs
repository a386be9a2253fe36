use std::path::Path;

use crate::command::CommandError;

/// Abstraction over shell command execution for testability.
///
/// Production code uses [`RealExecutor`], tests use mockall-generated mocks.
#[allow(async_fn_in_trait)]
pub trait ShellExecutor: Send + Sync {
    /// Execute a command in `cwd` and capture stdout.
    async fn run(&self, program: &str, args: &[String], cwd: &Path)
    -> Result<String, CommandError>;

    /// Execute a command in `cwd`, streaming output to the terminal. Used
    /// for the long-running build and provision steps whose progress the
    /// user wants to watch.
    async fn run_streaming(
        &self,
        program: &str,
        args: &[String],
        cwd: &Path,
    ) -> Result<(), CommandError>;
}

/// Real shell executor.
pub struct RealExecutor;

impl ShellExecutor for RealExecutor {
    async fn run(
        &self,
        program: &str,
        args: &[String],
        cwd: &Path,
    ) -> Result<String, CommandError> {
        use std::process::Stdio;

        let output = tokio::process::Command::new(program)
            .args(args)
            .current_dir(cwd)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| CommandError::NotFound {
                program: program.to_owned(),
                source: e,
            })?;

        if output.status.success() {
            String::from_utf8(output.stdout).map_err(|e| CommandError::InvalidUtf8 {
                program: program.to_owned(),
                source: e,
            })
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr).to_string();
            Err(CommandError::Failed {
                program: program.to_owned(),
                args: args.to_vec(),
                stderr,
            })
        }
    }

    async fn run_streaming(
        &self,
        program: &str,
        args: &[String],
        cwd: &Path,
    ) -> Result<(), CommandError> {
        use std::process::Stdio;

        let status = tokio::process::Command::new(program)
            .args(args)
            .current_dir(cwd)
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|e| CommandError::NotFound {
                program: program.to_owned(),
                source: e,
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(CommandError::Failed {
                program: program.to_owned(),
                args: args.to_vec(),
                stderr: format!("exit code: {status}"),
            })
        }
    }
}
