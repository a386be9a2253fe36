//! ECS container-definitions JSON renderer.
//!
//! The JSON array is consumed verbatim by the Terraform scheduled-task
//! module via `file(...)`, so element order must equal the task's
//! deployment order and the schema must match what ECS expects.

use std::path::PathBuf;

use fargen_core::EcsTask;
use serde::{Deserialize, Serialize};

use crate::artifact::{Artifact, DocumentBody, OverwritePolicy, RenderError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainerDefinition {
    pub name: String,
    pub image: String,
    pub environment: Vec<EnvVar>,
    pub essential: bool,
    #[serde(rename = "dockerLabels")]
    pub docker_labels: DockerLabels,
    #[serde(rename = "logConfiguration")]
    pub log_configuration: LogConfiguration,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvVar {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DockerLabels {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogConfiguration {
    #[serde(rename = "logDriver")]
    pub log_driver: String,
    pub options: LogOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogOptions {
    #[serde(rename = "awslogs-group")]
    pub group: String,
    #[serde(rename = "awslogs-region")]
    pub region: String,
    #[serde(rename = "awslogs-stream-prefix")]
    pub stream_prefix: String,
}

pub struct ContainerDefinitionsFile<'a> {
    task: &'a EcsTask,
}

impl<'a> ContainerDefinitionsFile<'a> {
    pub fn new(task: &'a EcsTask) -> Self {
        Self { task }
    }

    pub fn path(&self) -> PathBuf {
        PathBuf::from(format!(
            "terraform/container_definitions/container_definitions-{}-{}.json",
            self.task.name, self.task.environment
        ))
    }

    /// One definition per deployment, in deployment order.
    pub fn document(&self) -> Vec<ContainerDefinition> {
        self.task
            .deployments
            .iter()
            .map(|deployment| {
                let image = &deployment.image;
                ContainerDefinition {
                    name: image.name.clone(),
                    image: image.uri(),
                    environment: vec![EnvVar {
                        name: "RUNTIME_ENVIRONMENT".to_owned(),
                        value: image.environment.clone(),
                    }],
                    essential: deployment.essential,
                    docker_labels: DockerLabels {
                        name: image.name.clone(),
                        description: image.description.clone(),
                    },
                    log_configuration: LogConfiguration {
                        log_driver: "awslogs".to_owned(),
                        options: LogOptions {
                            group: deployment.log_group(&self.task.name),
                            region: self.task.region.clone(),
                            stream_prefix: "ecs".to_owned(),
                        },
                    },
                }
            })
            .collect()
    }

    pub fn artifact(&self) -> Result<Artifact, RenderError> {
        let value = serde_json::to_value(self.document()).map_err(|e| RenderError::Json {
            path: self.path(),
            source: e,
        })?;
        Ok(Artifact {
            path: self.path(),
            body: DocumentBody::Json(value),
            overwrite: OverwritePolicy::Always,
        })
    }
}
