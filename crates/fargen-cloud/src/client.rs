use std::path::Path;

use crate::command::CommandError;
use crate::executor::{RealExecutor, ShellExecutor};

/// Toolchain operations client, parameterized over the executor for
/// testability.
pub struct ToolchainClient<E: ShellExecutor = RealExecutor> {
    executor: E,
}

impl ToolchainClient<RealExecutor> {
    pub fn new() -> Self {
        Self {
            executor: RealExecutor,
        }
    }
}

impl Default for ToolchainClient<RealExecutor> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: ShellExecutor> ToolchainClient<E> {
    pub fn with_executor(executor: E) -> Self {
        Self { executor }
    }

    // ── Dependencies ──

    /// Lock per-container python dependencies via the generated Makefile.
    pub async fn lock_dependencies(&self, project_dir: &Path) -> Result<(), CommandError> {
        tracing::info!("locking container dependencies");
        self.executor
            .run_streaming("make", &args(["lock_dependencies"]), project_dir)
            .await
    }

    // ── Docker ──

    /// Build every image referenced by a task's compose file.
    pub async fn compose_build(
        &self,
        project_dir: &Path,
        compose_file: &str,
    ) -> Result<(), CommandError> {
        tracing::info!(compose_file, "building images");
        self.executor
            .run_streaming(
                "docker-compose",
                &args(["-f", compose_file, "build"]),
                project_dir,
            )
            .await
    }

    /// Push a task's images to the registry.
    pub async fn compose_push(
        &self,
        project_dir: &Path,
        compose_file: &str,
    ) -> Result<(), CommandError> {
        tracing::info!(compose_file, "pushing images");
        self.executor
            .run_streaming(
                "docker-compose",
                &args(["-f", compose_file, "push"]),
                project_dir,
            )
            .await
    }

    // ── Terraform ──

    /// `terraform init` in the generated terraform directory.
    pub async fn terraform_init(&self, terraform_dir: &Path) -> Result<(), CommandError> {
        tracing::info!(dir = %terraform_dir.display(), "terraform init");
        self.executor
            .run_streaming("terraform", &args(["init"]), terraform_dir)
            .await
    }

    /// `terraform apply` in the generated terraform directory.
    pub async fn terraform_apply(&self, terraform_dir: &Path) -> Result<(), CommandError> {
        tracing::info!(dir = %terraform_dir.display(), "terraform apply");
        self.executor
            .run_streaming("terraform", &args(["apply"]), terraform_dir)
            .await
    }

    /// Terraform version string, used by preflight checks.
    pub async fn terraform_version(&self) -> Result<String, CommandError> {
        let output = self
            .executor
            .run("terraform", &args(["version"]), Path::new("."))
            .await?;
        Ok(output.lines().next().unwrap_or_default().to_owned())
    }
}

fn args<const N: usize>(values: [&str; N]) -> Vec<String> {
    values.iter().map(|s| (*s).to_owned()).collect()
}
