//! Docker Compose file renderer.
//!
//! The compose file exists for the buildspec: CodeBuild runs
//! `docker-compose build` / `push` against it, one service per container
//! deployment in the task.

use std::path::PathBuf;

use fargen_core::EcsTask;
use serde::Serialize;
use serde_yaml_ng::{Mapping, Value};

use crate::artifact::{Artifact, DocumentBody, OverwritePolicy, RenderError};

const COMPOSE_VERSION: &str = "3.2";
const BUILD_CONTEXT: &str = "containers/";

#[derive(Debug, Serialize)]
pub struct ComposeDoc {
    pub version: String,
    pub services: Mapping,
}

#[derive(Debug, Serialize)]
pub struct ComposeService {
    pub build: ComposeBuild,
    pub image: String,
    pub environment: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ComposeBuild {
    pub context: String,
    pub dockerfile: String,
}

pub struct ComposeFile<'a> {
    task: &'a EcsTask,
}

impl<'a> ComposeFile<'a> {
    pub fn new(task: &'a EcsTask) -> Self {
        Self { task }
    }

    /// Compose filename for a task; also referenced by the buildspec and
    /// Makefile renderers, which must agree with the written file.
    pub fn file_name(task: &EcsTask) -> String {
        format!("docker-compose-{}-{}.yml", task.name, task.environment)
    }

    pub fn path(&self) -> PathBuf {
        PathBuf::from(Self::file_name(self.task))
    }

    /// One service entry per deployment, keyed by image name.
    /// A task with zero deployments yields an empty service map.
    pub fn document(&self) -> Result<ComposeDoc, RenderError> {
        let mut services = Mapping::new();
        for deployment in &self.task.deployments {
            let image = &deployment.image;
            let service = ComposeService {
                build: ComposeBuild {
                    context: BUILD_CONTEXT.to_owned(),
                    dockerfile: image.dockerfile_name(),
                },
                image: image.uri(),
                environment: vec![format!("RUNTIME_ENVIRONMENT={}", image.environment)],
            };
            let value = serde_yaml_ng::to_value(&service).map_err(|e| RenderError::Yaml {
                path: self.path(),
                source: e,
            })?;
            services.insert(Value::String(image.name.clone()), value);
        }
        Ok(ComposeDoc {
            version: COMPOSE_VERSION.to_owned(),
            services,
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
