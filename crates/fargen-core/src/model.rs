//! Deployment topology: project, Docker images, deployments, ECS tasks.
//!
//! All derived values (`ecr_endpoint`, image URIs, log group paths, the
//! cluster ARN) are pure functions of the owning record's fields. Several
//! renderers recompute the same derived value independently and rely on
//! the results agreeing, so nothing here reads ambient state.

/// Where tasks are deployed: one AWS account/region/VPC/cluster plus the
/// git repository the CI/CD pipeline watches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectConfig {
    pub account_id: String,
    pub region: String,
    pub vpc_name: String,
    pub ecs_cluster_name: String,
    pub git_repo_name: String,
    pub git_repo_branch: String,
}

impl ProjectConfig {
    /// ECR registry endpoint for this account/region.
    pub fn ecr_endpoint(&self) -> String {
        format!("{}.dkr.ecr.{}.amazonaws.com", self.account_id, self.region)
    }

    /// ARN of the ECS cluster tasks run on.
    pub fn ecs_cluster_arn(&self) -> String {
        format!(
            "arn:aws:ecs:{}:{}:cluster/{}",
            self.region, self.account_id, self.ecs_cluster_name
        )
    }
}

/// A single Docker image to be built and pushed to ECR.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DockerImage {
    /// Image name; also the compose service key and the per-container
    /// source directory under `containers/`. Must satisfy
    /// [`is_valid_name`].
    pub name: String,
    /// Deployment environment, typically `production` or `staging`.
    pub environment: String,
    pub description: String,
    /// Entry script module name, run as `python -m services.<name>.<script>`.
    pub script_name: String,
    /// Registry endpoint, copied from [`ProjectConfig::ecr_endpoint`].
    pub ecr_endpoint: String,
    pub python_version: String,
    pub tag: String,
}

impl DockerImage {
    /// Fully qualified image URI pushed to and pulled from ECR.
    pub fn uri(&self) -> String {
        format!(
            "{}/{}_{}:{}",
            self.ecr_endpoint, self.name, self.environment, self.tag
        )
    }

    /// Canonical Dockerfile name for this image.
    pub fn dockerfile_name(&self) -> String {
        format!("Dockerfile-{}", self.name)
    }
}

/// Checks that a name is safe as a Docker repository name component and
/// as a path segment: lowercase letters, digits, `.`, `_`, `-`, starting
/// with a letter or digit. Task names and environments are held to the
/// same character set, since both are interpolated into artifact paths,
/// Makefile targets, and Terraform identifiers.
pub fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !first.is_ascii_lowercase() && !first.is_ascii_digit() {
        return false;
    }
    chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '.' | '_' | '-'))
}

/// Binds one Docker image into a task.
///
/// The owning [`EcsTask`] holds its deployments; there is no back-pointer.
/// Anything that needs the task name (the CloudWatch log group) takes it
/// as an argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerDeployment {
    pub image: DockerImage,
    pub essential: bool,
}

impl ContainerDeployment {
    /// CloudWatch Logs group this container logs to.
    pub fn log_group(&self, task_name: &str) -> String {
        format!(
            "/aws/ecs/{}/{}/{}",
            task_name, self.image.name, self.image.environment
        )
    }
}

/// Distinguishes long-running service tasks from cron/rate scheduled ones.
///
/// Only the Terraform renderer cares about the distinction, so renderers
/// match on this explicitly instead of going through a trait.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskKind {
    Service,
    Scheduled { schedule_expression: String },
}

/// Unit-test subnets/security-groups for the optional CodePipeline CI/CD
/// module attached to a task's Terraform file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CicdPipeline {
    pub unittest_subnets: Vec<String>,
    pub unittest_security_groups: Vec<String>,
}

/// A named group of container deployments sharing network placement and,
/// for scheduled tasks, a run schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EcsTask {
    pub name: String,
    pub environment: String,
    pub cpu: u32,
    pub memory: u32,
    pub region: String,
    pub deployments: Vec<ContainerDeployment>,
    pub subnets: Vec<String>,
    pub security_groups: Vec<String>,
    pub kind: TaskKind,
    pub pipeline: Option<CicdPipeline>,
}

impl EcsTask {
    pub fn is_scheduled(&self) -> bool {
        matches!(self.kind, TaskKind::Scheduled { .. })
    }

    /// The cron/rate expression for scheduled tasks.
    pub fn schedule_expression(&self) -> Option<&str> {
        match &self.kind {
            TaskKind::Scheduled {
                schedule_expression,
            } => Some(schedule_expression),
            TaskKind::Service => None,
        }
    }

    /// Validates the task before any artifact is planned. The task name
    /// and environment feed artifact paths and Terraform identifiers, so
    /// they are held to the same character set as image names.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidTaskName`] / [`Error::InvalidEnvironment`] for a
    ///   task name or environment outside the allowed character set
    /// - [`Error::InvalidImageName`] for names outside the Docker
    ///   repository character set
    /// - [`Error::DuplicateImageName`] when two deployments in this task
    ///   share an image name
    ///
    /// [`Error::InvalidTaskName`]: crate::Error::InvalidTaskName
    /// [`Error::InvalidEnvironment`]: crate::Error::InvalidEnvironment
    /// [`Error::InvalidImageName`]: crate::Error::InvalidImageName
    /// [`Error::DuplicateImageName`]: crate::Error::DuplicateImageName
    pub fn validate(&self) -> crate::Result<()> {
        if !is_valid_name(&self.name) {
            return Err(crate::Error::InvalidTaskName {
                name: self.name.clone(),
            });
        }
        if !is_valid_name(&self.environment) {
            return Err(crate::Error::InvalidEnvironment {
                task: self.name.clone(),
                environment: self.environment.clone(),
            });
        }
        let mut seen = std::collections::HashSet::new();
        for deployment in &self.deployments {
            let name = &deployment.image.name;
            if !is_valid_name(name) {
                return Err(crate::Error::InvalidImageName {
                    task: self.name.clone(),
                    name: name.clone(),
                });
            }
            if !seen.insert(name.as_str()) {
                return Err(crate::Error::DuplicateImageName {
                    task: self.name.clone(),
                    name: name.clone(),
                });
            }
        }
        Ok(())
    }
}
