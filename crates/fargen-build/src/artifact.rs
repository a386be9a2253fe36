//! The value every renderer produces: a relative output path, a document
//! body, and an overwrite policy.

use std::path::PathBuf;

/// Whether re-running generation replaces an existing file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverwritePolicy {
    /// Regenerate on every run.
    Always,
    /// Write once; an existing file is reported as skipped, not an error.
    KeepExisting,
}

/// Document content, tagged with its serialization format.
///
/// Structured bodies hold already-ordered value trees (struct field order
/// and mapping insertion order survive into the serialized output);
/// text bodies are final bytes passed through verbatim.
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentBody {
    Yaml(serde_yaml_ng::Value),
    Json(serde_json::Value),
    Text(String),
}

/// One planned output file, relative to the generation root.
#[derive(Debug, Clone)]
pub struct Artifact {
    pub path: PathBuf,
    pub body: DocumentBody,
    pub overwrite: OverwritePolicy,
}

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("failed to build YAML document for {path}")]
    Yaml {
        path: PathBuf,
        source: serde_yaml_ng::Error,
    },
    #[error("failed to build JSON document for {path}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}
