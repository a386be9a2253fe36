use std::path::PathBuf;

use fargen_core::DockerImage;

use crate::artifact::{Artifact, DocumentBody, OverwritePolicy};

/// Generates the per-image Dockerfile: python base, pipenv-installed
/// dependencies, the image's source files plus the shared `modules`
/// directory, and the module entry point as CMD.
pub struct DockerFile<'a> {
    image: &'a DockerImage,
}

impl<'a> DockerFile<'a> {
    pub fn new(image: &'a DockerImage) -> Self {
        Self { image }
    }

    pub fn path(&self) -> PathBuf {
        PathBuf::from(format!("containers/{}", self.image.dockerfile_name()))
    }

    pub fn render(&self) -> String {
        format!(
            r#"FROM python:{python}

RUN apt-get update

RUN mkdir -p /workdir
WORKDIR /workdir

RUN mkdir -p data/

# upgrade pip and install python requirements
RUN pip install --upgrade pip
RUN pip install --upgrade pipenv

COPY {name}/Pipfile /workdir/
COPY {name}/Pipfile.lock /workdir/

RUN pipenv install --ignore-pipfile --deploy --system

RUN mkdir -p services/{name}

# copy app files
COPY {name}/*.py services/{name}/
COPY modules services/modules

LABEL org.label-schema.description = "{description}"
LABEL org.label-schema.name = "{name}"

CMD python -m services.{name}.{script}
"#,
            python = self.image.python_version,
            name = self.image.name,
            description = self.image.description,
            script = self.image.script_name,
        )
    }

    pub fn artifact(&self) -> Artifact {
        Artifact {
            path: self.path(),
            body: DocumentBody::Text(self.render()),
            overwrite: OverwritePolicy::Always,
        }
    }
}
