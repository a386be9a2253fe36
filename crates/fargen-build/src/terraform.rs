//! Terraform module renderer for scheduled Fargate tasks.
//!
//! Emits the log-groups variable and the scheduled-task module block, plus
//! the CodePipeline CI/CD module when the task carries pipeline settings.
//! The module reads the container-definitions JSON through `file(...)`,
//! which is why construction takes that renderer's already-computed path.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use fargen_core::{EcsTask, ProjectConfig};

use crate::artifact::{Artifact, DocumentBody, OverwritePolicy, RenderError};
use crate::buildspec::{BuildspecFile, UnittestBuildspecFile};

const SCHEDULED_TASK_MODULE: &str = "halfdanrump/fargate-scheduled-task-multicontainer/aws";
const SCHEDULED_TASK_MODULE_VERSION: &str = "12.6.1";
const CICD_MODULE: &str = "halfdanrump/codepipeline-dockerbuild/aws";
const CICD_MODULE_VERSION: &str = "12.6.3";

pub struct TerraformScheduledTaskFile<'a> {
    task: &'a EcsTask,
    config: &'a ProjectConfig,
    container_definitions_path: PathBuf,
}

impl<'a> TerraformScheduledTaskFile<'a> {
    /// Binds the renderer to a scheduled task and the output path of the
    /// task's container-definitions file.
    ///
    /// # Errors
    ///
    /// [`fargen_core::Error::NotScheduled`] when the task has no schedule
    /// expression; no partial file is ever produced for such a task.
    pub fn new(
        task: &'a EcsTask,
        config: &'a ProjectConfig,
        container_definitions_path: &Path,
    ) -> fargen_core::Result<Self> {
        if !task.is_scheduled() {
            return Err(fargen_core::Error::NotScheduled {
                task: task.name.clone(),
            });
        }
        Ok(Self {
            task,
            config,
            container_definitions_path: container_definitions_path.to_path_buf(),
        })
    }

    pub fn path(&self) -> PathBuf {
        PathBuf::from(format!(
            "terraform/{}-{}.tf",
            self.task.name, self.task.environment
        ))
    }

    /// The container-definitions path as Terraform sees it: relative to
    /// the `terraform/` directory the module file lives in.
    fn relative_container_definitions_path(&self) -> PathBuf {
        self.container_definitions_path
            .strip_prefix("terraform")
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| self.container_definitions_path.clone())
    }

    pub fn render(&self) -> Result<String, RenderError> {
        let task = self.task;
        let config = self.config;
        let json_err = |e| RenderError::Json {
            path: self.path(),
            source: e,
        };

        let mut log_groups = String::new();
        for deployment in &task.deployments {
            let _ = writeln!(
                log_groups,
                "    \"{}\" = \"{}\"",
                deployment.image.name,
                deployment.log_group(&task.name)
            );
        }

        // validated in new()
        let schedule = task.schedule_expression().unwrap_or_default();
        let subnets = serde_json::to_string(&task.subnets).map_err(json_err)?;
        let security_groups = serde_json::to_string(&task.security_groups).map_err(json_err)?;

        let mut out = format!(
            r#"variable "{name}_{env}_log_groups" {{
  description = "Map from service name to log group name"
  default = {{
{log_groups}  }}
}}

module "fargate-scheduled-{name}-{env}" {{
  source                = "{module}"
  version               = "{module_version}"
  account_id            = "{account_id}"
  name                  = "{name}"
  environment           = "{env}"
  log_groups            = var.{name}_{env}_log_groups
  network_mode          = "awsvpc"
  assign_public_ip      = true
  launch_type           = "FARGATE"
  container_definitions = "${{file("{container_definitions}")}}"
  schedule_expression   = "{schedule}"
  cluster_arn           = "{cluster_arn}"
  memory                = "{memory}"
  cpu                   = "{cpu}"
  subnets               = {subnets}
  security_groups       = {security_groups}
}}
"#,
            name = task.name,
            env = task.environment,
            log_groups = log_groups,
            module = SCHEDULED_TASK_MODULE,
            module_version = SCHEDULED_TASK_MODULE_VERSION,
            account_id = config.account_id,
            container_definitions = self.relative_container_definitions_path().display(),
            schedule = schedule,
            cluster_arn = config.ecs_cluster_arn(),
            memory = task.memory,
            cpu = task.cpu,
            subnets = subnets,
            security_groups = security_groups,
        );

        if let Some(pipeline) = &task.pipeline {
            let unittest_subnets =
                serde_json::to_string(&pipeline.unittest_subnets).map_err(json_err)?;
            let unittest_security_groups =
                serde_json::to_string(&pipeline.unittest_security_groups).map_err(json_err)?;
            let _ = write!(
                out,
                r#"
module "{name}-{env}-cicd" {{
  source                     = "{module}"
  version                    = "{module_version}"
  name                       = "{name}"
  account_id                 = "{account_id}"
  environment                = "{env}"
  github_webhook_token       = "${{var.github_webhook_token}}"
  git_repo                   = "{git_repo}"
  git_branch                 = "{git_branch}"
  dockerbuild_image          = "aws/codebuild/docker:18.09.0"
  dockerbuild_timeout        = "15"
  dockerbuild_buildspec_path = "{dockerbuild_buildspec}"
  unittest_buildspec_path    = "{unittest_buildspec}"
  unittest_security_groups   = {unittest_security_groups}
  unittest_subnets           = {unittest_subnets}
  unittest_vpc               = "{vpc}"
  unittest_image             = "aws/codebuild/python:3.6.5"
  unittest_timeout           = 15
}}
"#,
                name = task.name,
                env = task.environment,
                module = CICD_MODULE,
                module_version = CICD_MODULE_VERSION,
                account_id = config.account_id,
                git_repo = config.git_repo_name,
                git_branch = config.git_repo_branch,
                dockerbuild_buildspec = BuildspecFile::file_path(task).display(),
                unittest_buildspec = UnittestBuildspecFile::file_path(task).display(),
                unittest_security_groups = unittest_security_groups,
                unittest_subnets = unittest_subnets,
                vpc = config.vpc_name,
            );
        }

        Ok(out)
    }

    pub fn artifact(&self) -> Result<Artifact, RenderError> {
        Ok(Artifact {
            path: self.path(),
            body: DocumentBody::Text(self.render()?),
            overwrite: OverwritePolicy::Always,
        })
    }
}
