//! Serializes and persists artifacts, honoring each artifact's overwrite
//! policy. Writes go through a temp file in the destination directory and
//! a rename, so a crashed run never leaves a partially written artifact.

use std::io::Write as _;
use std::path::{Path, PathBuf};

use crate::artifact::{Artifact, DocumentBody, OverwritePolicy};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Written,
    /// The file existed and the artifact's policy keeps existing files.
    SkippedExists,
}

#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    #[error("failed to create parent directory for {path}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to serialize YAML document for {path}")]
    SerializeYaml {
        path: PathBuf,
        source: serde_yaml_ng::Error,
    },
    #[error("failed to serialize JSON document for {path}")]
    SerializeJson {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("failed to write {path}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to move {path} into place")]
    Persist {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Serialize `artifact` and persist it under `root`.
pub fn write_artifact(root: &Path, artifact: &Artifact) -> Result<WriteOutcome, WriteError> {
    let destination = root.join(&artifact.path);

    if artifact.overwrite == OverwritePolicy::KeepExisting && destination.exists() {
        tracing::debug!(path = %artifact.path.display(), "file exists, keeping");
        return Ok(WriteOutcome::SkippedExists);
    }

    let parent = destination.parent().unwrap_or(root);
    std::fs::create_dir_all(parent).map_err(|e| WriteError::CreateDir {
        path: artifact.path.clone(),
        source: e,
    })?;

    let serialized = serialize(&artifact.path, &artifact.body)?;

    let mut tmp = tempfile::NamedTempFile::new_in(parent).map_err(|e| WriteError::Write {
        path: artifact.path.clone(),
        source: e,
    })?;
    tmp.write_all(serialized.as_bytes())
        .map_err(|e| WriteError::Write {
            path: artifact.path.clone(),
            source: e,
        })?;
    tmp.persist(&destination).map_err(|e| WriteError::Persist {
        path: artifact.path.clone(),
        source: e.error,
    })?;

    tracing::debug!(path = %artifact.path.display(), "artifact written");
    Ok(WriteOutcome::Written)
}

fn serialize(path: &Path, body: &DocumentBody) -> Result<String, WriteError> {
    match body {
        DocumentBody::Yaml(value) => {
            serde_yaml_ng::to_string(value).map_err(|e| WriteError::SerializeYaml {
                path: path.to_path_buf(),
                source: e,
            })
        }
        DocumentBody::Json(value) => {
            serde_json::to_string(value).map_err(|e| WriteError::SerializeJson {
                path: path.to_path_buf(),
                source: e,
            })
        }
        DocumentBody::Text(text) => Ok(text.clone()),
    }
}
