use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("fargen.toml not found at {path} — run `fargen init` to create one")]
    ManifestNotFound { path: PathBuf },

    #[error("failed to read manifest at {path}")]
    ManifestRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse manifest at {path}")]
    ManifestParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    // ── Topology validation ──
    #[error(
        "invalid task name '{name}' — \
         use lowercase letters, digits, '.', '_' or '-', starting with a letter or digit"
    )]
    InvalidTaskName { name: String },

    #[error(
        "invalid environment '{environment}' in task '{task}' — \
         use lowercase letters, digits, '.', '_' or '-', starting with a letter or digit"
    )]
    InvalidEnvironment { task: String, environment: String },

    #[error(
        "invalid image name '{name}' in task '{task}' — \
         use lowercase letters, digits, '.', '_' or '-', starting with a letter or digit"
    )]
    InvalidImageName { task: String, name: String },

    #[error(
        "duplicate image name '{name}' in task '{task}' — \
         compose service keys and Makefile run targets would collide"
    )]
    DuplicateImageName { task: String, name: String },

    #[error("task '{task}' has no schedule expression — a Terraform scheduled-task module can only be generated for scheduled tasks")]
    NotScheduled { task: String },
}
