//! AWS CodeBuild buildspec renderer.
//!
//! The generated buildspec logs into ECR, builds and pushes every image in
//! the task via the task's compose file, and writes the image-definitions
//! JSON consumed by CodePipeline's ECS deploy action.

use std::path::PathBuf;

use fargen_core::EcsTask;
use serde::Serialize;

use crate::artifact::{Artifact, DocumentBody, OverwritePolicy, RenderError};
use crate::compose::ComposeFile;
use crate::shell;

const BUILDSPEC_VERSION: &str = "0.2";

#[derive(Debug, Serialize)]
pub struct BuildspecDoc {
    pub version: String,
    pub phases: Phases,
    pub artifacts: ArtifactsSection,
}

#[derive(Debug, Serialize)]
pub struct Phases {
    pub pre_build: Commands,
    pub build: Commands,
    /// Bare command list, matching the shape the downstream pipeline
    /// already consumes.
    pub post_build: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct Commands {
    pub commands: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ArtifactsSection {
    pub files: String,
}

/// One entry per deployment in the image-definitions JSON.
#[derive(Debug, Serialize)]
pub struct ImageDefinition {
    pub name: String,
    #[serde(rename = "imageUri")]
    pub image_uri: String,
}

pub struct BuildspecFile<'a> {
    task: &'a EcsTask,
}

impl<'a> BuildspecFile<'a> {
    pub fn new(task: &'a EcsTask) -> Self {
        Self { task }
    }

    /// Buildspec path for a task; the Terraform CI/CD module block points
    /// CodeBuild at this path.
    pub fn file_path(task: &EcsTask) -> PathBuf {
        PathBuf::from(format!(
            "buildspec/buildspec-dockerbuild-{}-{}.yml",
            task.name, task.environment
        ))
    }

    pub fn path(&self) -> PathBuf {
        Self::file_path(self.task)
    }

    fn imagedefinitions_file_name(&self) -> String {
        format!(
            "imagedefinitions_{}-{}.json",
            self.task.name, self.task.environment
        )
    }

    pub fn image_definitions(&self) -> Vec<ImageDefinition> {
        self.task
            .deployments
            .iter()
            .map(|d| ImageDefinition {
                name: d.image.name.clone(),
                image_uri: d.image.uri(),
            })
            .collect()
    }

    pub fn document(&self) -> Result<BuildspecDoc, RenderError> {
        let compose_file = ComposeFile::file_name(self.task);
        let imagedefinitions_file = self.imagedefinitions_file_name();

        // The JSON payload travels inside a shell word; quote it properly
        // instead of patching the serialized YAML afterwards.
        let json = serde_json::to_string(&self.image_definitions()).map_err(|e| {
            RenderError::Json {
                path: self.path(),
                source: e,
            }
        })?;
        let write_imagedefinitions = format!(
            "printf '%s' {} > {}",
            shell::single_quoted(&json),
            imagedefinitions_file
        );

        Ok(BuildspecDoc {
            version: BUILDSPEC_VERSION.to_owned(),
            phases: Phases {
                pre_build: Commands {
                    commands: vec![format!(
                        "$(aws ecr get-login --no-include-email --region {})",
                        self.task.region
                    )],
                },
                build: Commands {
                    commands: vec![format!("docker-compose -f {compose_file} build")],
                },
                post_build: vec![
                    format!("docker-compose -f {compose_file} push"),
                    write_imagedefinitions,
                ],
            },
            artifacts: ArtifactsSection {
                files: imagedefinitions_file,
            },
        })
    }

    pub fn artifact(&self) -> Result<Artifact, RenderError> {
        let value = serde_yaml_ng::to_value(self.document()?).map_err(|e| RenderError::Yaml {
            path: self.path(),
            source: e,
        })?;
        Ok(Artifact {
            path: self.path(),
            body: DocumentBody::Yaml(value),
            overwrite: OverwritePolicy::Always,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct UnittestBuildspecDoc {
    pub version: String,
    pub phases: UnittestPhases,
}

#[derive(Debug, Serialize)]
pub struct UnittestPhases {
    pub install: Commands,
    pub build: Commands,
}

/// Buildspec for the CI/CD pipeline's unit-test stage. The Terraform
/// CI/CD module block points CodeBuild at this path, so one is generated
/// for every task with pipeline settings. Written once; users replace the
/// stub commands with their real test invocations.
pub struct UnittestBuildspecFile<'a> {
    task: &'a EcsTask,
}

impl<'a> UnittestBuildspecFile<'a> {
    pub fn new(task: &'a EcsTask) -> Self {
        Self { task }
    }

    /// One buildspec per task, shared across environments.
    pub fn file_path(task: &EcsTask) -> PathBuf {
        PathBuf::from(format!(
            "buildspec/buildspec-unittest-{}-allenvs.yml",
            task.name
        ))
    }

    pub fn path(&self) -> PathBuf {
        Self::file_path(self.task)
    }

    pub fn document(&self) -> UnittestBuildspecDoc {
        let commands = self
            .task
            .deployments
            .iter()
            .map(|d| {
                format!(
                    "(cd containers/{name} && pipenv install --dev && pipenv run python -m unittest discover)",
                    name = d.image.name
                )
            })
            .collect();

        UnittestBuildspecDoc {
            version: BUILDSPEC_VERSION.to_owned(),
            phases: UnittestPhases {
                install: Commands {
                    commands: vec!["pip install --upgrade pipenv".to_owned()],
                },
                build: Commands { commands },
            },
        }
    }

    pub fn artifact(&self) -> Result<Artifact, RenderError> {
        let value = serde_yaml_ng::to_value(self.document()).map_err(|e| RenderError::Yaml {
            path: self.path(),
            source: e,
        })?;
        Ok(Artifact {
            path: self.path(),
            body: DocumentBody::Yaml(value),
            overwrite: OverwritePolicy::KeepExisting,
        })
    }
}
