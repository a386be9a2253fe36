//! `fargen.toml` manifest schema and conversion into the domain model.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::model::{
    CicdPipeline, ContainerDeployment, DockerImage, EcsTask, ProjectConfig, TaskKind,
};

/// fargen.toml configuration.
///
/// The manifest is the single input to generation; renderers never read
/// process environment or any other ambient state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    pub project: ProjectManifest,
    #[serde(default, rename = "task")]
    pub tasks: Vec<TaskManifest>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectManifest {
    /// AWS account id, e.g. `211367837384`
    pub account_id: String,
    /// AWS region, e.g. `ap-northeast-1`
    pub region: String,
    /// VPC the tasks run in
    pub vpc_name: String,
    /// Name of the persistent ECS cluster
    pub ecs_cluster_name: String,
    /// GitHub repository watched by the CI/CD pipeline
    pub git_repo: String,
    /// Branch the pipeline builds from
    #[serde(default = "default_branch")]
    pub git_branch: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskManifest {
    pub name: String,
    /// Deployment environment, typically `production` or `staging`
    #[serde(default = "default_environment")]
    pub environment: String,
    pub cpu: u32,
    pub memory: u32,
    /// Cron/rate expression; presence makes this a scheduled task
    pub schedule: Option<String>,
    #[serde(default)]
    pub subnets: Vec<String>,
    #[serde(default)]
    pub security_groups: Vec<String>,
    #[serde(default, rename = "container")]
    pub containers: Vec<ContainerManifest>,
    pub pipeline: Option<PipelineManifest>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContainerManifest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Entry script module name
    #[serde(default = "default_script")]
    pub script: String,
    #[serde(default = "default_true")]
    pub essential: bool,
    #[serde(default = "default_tag")]
    pub tag: String,
    #[serde(default = "default_python_version")]
    pub python: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineManifest {
    #[serde(default)]
    pub unittest_subnets: Vec<String>,
    #[serde(default)]
    pub unittest_security_groups: Vec<String>,
}

impl Manifest {
    /// Load `fargen.toml` from the given directory.
    ///
    /// Unlike optional tool configuration there is no default fallback:
    /// an absent manifest means an empty topology, which cannot be what
    /// the caller wants.
    pub fn load(project_dir: &Path) -> crate::Result<Self> {
        let config_path = project_dir.join("fargen.toml");
        tracing::debug!(path = %config_path.display(), "loading manifest");

        if !config_path.exists() {
            return Err(crate::Error::ManifestNotFound { path: config_path });
        }
        let content =
            std::fs::read_to_string(&config_path).map_err(|e| crate::Error::ManifestRead {
                path: config_path.clone(),
                source: e,
            })?;
        toml::from_str(&content).map_err(|e| crate::Error::ManifestParse {
            path: config_path,
            source: e,
        })
    }

    /// Convert the manifest into a validated deployment topology.
    ///
    /// Image registry endpoints are copied from the project so that every
    /// image URI is derivable from the image record alone.
    pub fn into_topology(self) -> crate::Result<(ProjectConfig, Vec<EcsTask>)> {
        let config = ProjectConfig {
            account_id: self.project.account_id,
            region: self.project.region,
            vpc_name: self.project.vpc_name,
            ecs_cluster_name: self.project.ecs_cluster_name,
            git_repo_name: self.project.git_repo,
            git_repo_branch: self.project.git_branch,
        };

        let mut tasks = Vec::with_capacity(self.tasks.len());
        for task in self.tasks {
            let deployments = task
                .containers
                .into_iter()
                .map(|c| ContainerDeployment {
                    image: DockerImage {
                        name: c.name,
                        environment: task.environment.clone(),
                        description: c.description,
                        script_name: c.script,
                        ecr_endpoint: config.ecr_endpoint(),
                        python_version: c.python,
                        tag: c.tag,
                    },
                    essential: c.essential,
                })
                .collect();

            let kind = match task.schedule {
                Some(schedule_expression) => TaskKind::Scheduled {
                    schedule_expression,
                },
                None => TaskKind::Service,
            };

            let task = EcsTask {
                name: task.name,
                environment: task.environment,
                cpu: task.cpu,
                memory: task.memory,
                region: config.region.clone(),
                deployments,
                subnets: task.subnets,
                security_groups: task.security_groups,
                kind,
                pipeline: task.pipeline.map(|p| CicdPipeline {
                    unittest_subnets: p.unittest_subnets,
                    unittest_security_groups: p.unittest_security_groups,
                }),
            };
            task.validate()?;
            tasks.push(task);
        }

        tracing::debug!(tasks = tasks.len(), "manifest converted to topology");
        Ok((config, tasks))
    }
}

fn default_branch() -> String {
    "master".to_owned()
}

fn default_environment() -> String {
    "production".to_owned()
}

fn default_script() -> String {
    "main".to_owned()
}

fn default_tag() -> String {
    "latest".to_owned()
}

fn default_python_version() -> String {
    "3.7.4".to_owned()
}

fn default_true() -> bool {
    true
}
