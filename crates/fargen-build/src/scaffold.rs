//! Scaffolding written once at bootstrap: the per-container Pipfile and
//! entry-point script stub, and the shared `modules` package every
//! Dockerfile copies into its image. All of it is user-owned after the
//! first run, so the overwrite policy keeps existing files.

use std::path::PathBuf;

use fargen_core::DockerImage;

use crate::artifact::{Artifact, DocumentBody, OverwritePolicy};

pub struct PipFile<'a> {
    image: &'a DockerImage,
}

impl<'a> PipFile<'a> {
    pub fn new(image: &'a DockerImage) -> Self {
        Self { image }
    }

    pub fn path(&self) -> PathBuf {
        PathBuf::from(format!("containers/{}/Pipfile", self.image.name))
    }

    pub fn render(&self) -> String {
        // Pipenv wants major.minor, the Docker base image wants the full
        // version; both come from the same field.
        let python_minor = self
            .image
            .python_version
            .splitn(3, '.')
            .take(2)
            .collect::<Vec<_>>()
            .join(".");
        format!(
            r#"[[source]]
url = "https://pypi.org/simple"
verify_ssl = true
name = "pypi"

[packages]
PyYAML = "*"

[requires]
python_version = "{python_minor}"
"#
        )
    }

    pub fn artifact(&self) -> Artifact {
        Artifact {
            path: self.path(),
            body: DocumentBody::Text(self.render()),
            overwrite: OverwritePolicy::KeepExisting,
        }
    }
}

/// Placeholder for the shared `modules` package. Every generated
/// Dockerfile runs `COPY modules services/modules`, so the directory must
/// exist in the build context from the first `docker build` on.
pub struct ModulesInit;

impl ModulesInit {
    pub fn path(&self) -> PathBuf {
        PathBuf::from("containers/modules/__init__.py")
    }

    pub fn render(&self) -> String {
        "\"\"\"Code shared between containers, importable as `services.modules`.\"\"\"\n".to_owned()
    }

    pub fn artifact(&self) -> Artifact {
        Artifact {
            path: self.path(),
            body: DocumentBody::Text(self.render()),
            overwrite: OverwritePolicy::KeepExisting,
        }
    }
}

/// Stub entry point matching the Dockerfile's
/// `python -m services.<image>.<script>` run command.
pub struct ScriptFile<'a> {
    image: &'a DockerImage,
}

impl<'a> ScriptFile<'a> {
    pub fn new(image: &'a DockerImage) -> Self {
        Self { image }
    }

    pub fn path(&self) -> PathBuf {
        PathBuf::from(format!(
            "containers/{}/{}.py",
            self.image.name, self.image.script_name
        ))
    }

    pub fn render(&self) -> String {
        format!(
            r#"def main():
    raise NotImplementedError("implement the {name} entry point")


if __name__ == "__main__":
    main()
"#,
            name = self.image.name,
        )
    }

    pub fn artifact(&self) -> Artifact {
        Artifact {
            path: self.path(),
            body: DocumentBody::Text(self.render()),
            overwrite: OverwritePolicy::KeepExisting,
        }
    }
}
