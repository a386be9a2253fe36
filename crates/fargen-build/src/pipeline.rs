//! The generation pipeline: plan the full artifact set from the topology,
//! execute the writes, report per-artifact outcomes.

use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};

use fargen_core::{EcsTask, ProjectConfig};

use crate::artifact::{Artifact, RenderError};
use crate::buildspec::{BuildspecFile, UnittestBuildspecFile};
use crate::compose::ComposeFile;
use crate::container_definitions::ContainerDefinitionsFile;
use crate::dockerfile::DockerFile;
use crate::makefile::MakeFile;
use crate::scaffold::{ModulesInit, PipFile, ScriptFile};
use crate::terraform::TerraformScheduledTaskFile;
use crate::writer::{self, WriteOutcome};

/// A project specifies where tasks are deployed and owns the full
/// deployment topology. One generation run walks project → tasks →
/// deployments and emits every artifact.
#[derive(Debug, Clone)]
pub struct Project {
    pub config: ProjectConfig,
    pub tasks: Vec<EcsTask>,
}

#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    #[error(transparent)]
    Invalid(#[from] fargen_core::Error),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("two planned artifacts resolve to the same output path {path}")]
    PathCollision { path: PathBuf },
}

/// Result of writing one planned artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Written,
    SkippedExists,
    Failed(String),
}

/// Per-artifact outcomes of one generation run, in planning order.
#[derive(Debug, Default)]
pub struct RunReport {
    pub outcomes: Vec<(PathBuf, Outcome)>,
}

impl RunReport {
    pub fn written(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Written))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, Outcome::SkippedExists))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Failed(_)))
    }

    /// True when any artifact failed; the run is then a partial failure
    /// and the caller should exit non-zero.
    pub fn has_failures(&self) -> bool {
        self.failed() > 0
    }

    fn count(&self, pred: impl Fn(&Outcome) -> bool) -> usize {
        self.outcomes.iter().filter(|(_, o)| pred(o)).count()
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (path, outcome) in &self.outcomes {
            match outcome {
                Outcome::Written => writeln!(f, "  written  {}", path.display())?,
                Outcome::SkippedExists => writeln!(f, "  exists   {}", path.display())?,
                Outcome::Failed(detail) => {
                    writeln!(f, "  FAILED   {} ({detail})", path.display())?
                }
            }
        }
        write!(
            f,
            "{} written, {} skipped, {} failed",
            self.written(),
            self.skipped(),
            self.failed()
        )
    }
}

impl Project {
    pub fn new(config: ProjectConfig, tasks: Vec<EcsTask>) -> Self {
        Self { config, tasks }
    }

    /// Plan the full artifact set.
    ///
    /// Validates every task before rendering anything, renders in
    /// dependency order (the container-definitions path is captured
    /// before the Terraform module consuming it), and rejects plans in
    /// which two artifacts target the same output path.
    pub fn plan(&self) -> Result<Vec<Artifact>, PlanError> {
        for task in &self.tasks {
            task.validate()?;
        }

        let mut artifacts = vec![MakeFile::new(&self.tasks).artifact()];

        // Every Dockerfile copies the shared modules package into its image.
        if self.tasks.iter().any(|t| !t.deployments.is_empty()) {
            artifacts.push(ModulesInit.artifact());
        }

        // The unittest buildspec is shared across a task's environments,
        // so it is planned once per task name.
        let mut unittest_planned = HashSet::new();

        for task in &self.tasks {
            tracing::debug!(task = %task.name, scheduled = task.is_scheduled(), "planning task artifacts");

            artifacts.push(ComposeFile::new(task).artifact()?);
            artifacts.push(BuildspecFile::new(task).artifact()?);
            if task.pipeline.is_some() && unittest_planned.insert(task.name.clone()) {
                artifacts.push(UnittestBuildspecFile::new(task).artifact()?);
            }

            let container_definitions = ContainerDefinitionsFile::new(task);
            let container_definitions_path = container_definitions.path();
            artifacts.push(container_definitions.artifact()?);

            for deployment in &task.deployments {
                artifacts.push(DockerFile::new(&deployment.image).artifact());
                artifacts.push(PipFile::new(&deployment.image).artifact());
                artifacts.push(ScriptFile::new(&deployment.image).artifact());
            }

            if task.is_scheduled() {
                let terraform = TerraformScheduledTaskFile::new(
                    task,
                    &self.config,
                    &container_definitions_path,
                )?;
                artifacts.push(terraform.artifact()?);
            }
        }

        let mut seen = HashSet::new();
        for artifact in &artifacts {
            if !seen.insert(artifact.path.clone()) {
                return Err(PlanError::PathCollision {
                    path: artifact.path.clone(),
                });
            }
        }

        Ok(artifacts)
    }

    /// Plan, then write every artifact under `root` in planning order.
    ///
    /// A write failure is recorded in the report and does not stop the
    /// remaining artifacts; plan-time errors abort before any write.
    pub fn generate(&self, root: &Path) -> Result<RunReport, PlanError> {
        let artifacts = self.plan()?;
        let mut report = RunReport::default();

        for artifact in &artifacts {
            let outcome = match writer::write_artifact(root, artifact) {
                Ok(WriteOutcome::Written) => {
                    tracing::info!(path = %artifact.path.display(), "written");
                    Outcome::Written
                }
                Ok(WriteOutcome::SkippedExists) => {
                    tracing::info!(path = %artifact.path.display(), "already exists, skipped");
                    Outcome::SkippedExists
                }
                Err(e) => {
                    tracing::error!(path = %artifact.path.display(), error = %e, "write failed");
                    Outcome::Failed(e.to_string())
                }
            };
            report.outcomes.push((artifact.path.clone(), outcome));
        }

        Ok(report)
    }
}
