mod build;
mod generate;
mod init;
mod provision;

/// Directory the Terraform renderer writes into, relative to the
/// project root.
pub(crate) const TERRAFORM_DIR: &str = "terraform";

pub use build::build;
pub use generate::generate;
pub use init::init_manifest;
pub use provision::provision;
