use std::path::Path;

use fargen_cloud::ToolchainClient;

use super::TERRAFORM_DIR;

/// Initialize the generated Terraform configuration, and apply it when
/// requested.
pub async fn provision(apply: bool) -> anyhow::Result<()> {
    let terraform_dir = Path::new(TERRAFORM_DIR);
    if !terraform_dir.exists() {
        anyhow::bail!("terraform/ not found — run `fargen generate` first");
    }

    let client = ToolchainClient::new();

    let version = client.terraform_version().await?;
    println!("Using {version}");

    println!("Initializing terraform...");
    client.terraform_init(terraform_dir).await?;

    if apply {
        println!("Applying terraform...");
        client.terraform_apply(terraform_dir).await?;
    } else {
        println!("Skipping apply — re-run with --apply to provision.");
    }

    Ok(())
}
