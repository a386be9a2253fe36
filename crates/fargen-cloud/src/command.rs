#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("`{program}` not found — is it installed and on PATH?")]
    NotFound {
        program: String,
        source: std::io::Error,
    },

    #[error("{program} {args:?} failed:\n{stderr}")]
    Failed {
        program: String,
        args: Vec<String>,
        stderr: String,
    },

    #[error("{program} output was not valid UTF-8")]
    InvalidUtf8 {
        program: String,
        source: std::string::FromUtf8Error,
    },
}
