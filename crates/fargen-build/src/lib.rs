//! Artifact rendering and the file-generation pipeline for fargen.
//!
//! # Generation pipeline
//!
//! ```text
//! fargen generate
//!   1. Load      ── fargen.toml → (ProjectConfig, Vec<EcsTask>)
//!   2. Plan      ── Project::plan() → Vec<Artifact>
//!                    per task: compose, buildspec (plus the unittest
//!                    buildspec when a pipeline is configured), container
//!                    definitions, Dockerfile/Pipfile/script per
//!                    deployment, Terraform module for scheduled tasks;
//!                    one Makefile and one shared-modules scaffold
//!                    over all tasks
//!   3. Execute   ── writer::write_artifact() per artifact, in plan order
//!   4. Report    ── RunReport { written / skipped / failed }
//! ```
//!
//! # Ordering
//!
//! Artifact contents never depend on another artifact's *content*, only on
//! one path: the Terraform module references the container-definitions JSON
//! file. The plan step therefore captures [`ContainerDefinitionsFile`]'s
//! path before constructing [`TerraformScheduledTaskFile`] for the same
//! task; everything else is order-independent.
//!
//! # Overwrite policy
//!
//! Generated build artifacts are always rewritten. Scaffolding (`Pipfile`,
//! the entry-point script, the shared `modules` package, the unittest
//! buildspec) is written once and then left alone, since users edit those
//! after bootstrapping.

pub mod artifact;
pub mod buildspec;
pub mod compose;
pub mod container_definitions;
pub mod dockerfile;
pub mod makefile;
pub mod pipeline;
pub mod scaffold;
pub mod shell;
pub mod terraform;
pub mod writer;

pub use artifact::{Artifact, DocumentBody, OverwritePolicy, RenderError};
pub use buildspec::{BuildspecFile, UnittestBuildspecFile};
pub use compose::ComposeFile;
pub use container_definitions::ContainerDefinitionsFile;
pub use dockerfile::DockerFile;
pub use makefile::MakeFile;
pub use pipeline::{Outcome, PlanError, Project, RunReport};
pub use scaffold::{ModulesInit, PipFile, ScriptFile};
pub use terraform::TerraformScheduledTaskFile;
pub use writer::{WriteError, WriteOutcome, write_artifact};
