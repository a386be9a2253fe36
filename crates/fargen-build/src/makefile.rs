use std::fmt::Write as _;
use std::path::PathBuf;

use fargen_core::EcsTask;

use crate::artifact::{Artifact, DocumentBody, OverwritePolicy};
use crate::compose::ComposeFile;

/// Generates the project Makefile: dependency locking, docker builds, one
/// run target per deployment across all tasks, and terraform shortcuts.
///
/// Run-target uniqueness follows from image-name uniqueness, which the
/// pipeline enforces at plan time.
pub struct MakeFile<'a> {
    tasks: &'a [EcsTask],
}

impl<'a> MakeFile<'a> {
    pub fn new(tasks: &'a [EcsTask]) -> Self {
        Self { tasks }
    }

    pub fn path(&self) -> PathBuf {
        PathBuf::from("Makefile")
    }

    pub fn render(&self) -> String {
        let mut out = String::new();

        out.push_str("lock_dependencies:\n");
        for task in self.tasks {
            for deployment in &task.deployments {
                let _ = writeln!(
                    out,
                    "\tcd containers/{} && pipenv install",
                    deployment.image.name
                );
            }
        }

        out.push_str("\nbuild_docker:\n");
        for task in self.tasks {
            let _ = writeln!(
                out,
                "\tdocker-compose -f {} build",
                ComposeFile::file_name(task)
            );
        }

        for task in self.tasks {
            for deployment in &task.deployments {
                let image = &deployment.image;
                let _ = write!(
                    out,
                    "\nrun_{name}:\n\tpython -m containers.{name}.{script}\n",
                    name = image.name,
                    script = image.script_name,
                );
            }
        }

        out.push_str("\ntfinit:\n\tcd terraform && terraform init\n");
        out.push_str("\ntfapply:\n\tcd terraform && terraform apply\n");
        out
    }

    pub fn artifact(&self) -> Artifact {
        Artifact {
            path: self.path(),
            body: DocumentBody::Text(self.render()),
            overwrite: OverwritePolicy::Always,
        }
    }
}
