use std::path::Path;

use fargen_build::ComposeFile;
use fargen_cloud::ToolchainClient;
use fargen_core::Manifest;

/// Lock container dependencies, then build every task's images through
/// its generated compose file. With `push`, also push them to ECR.
pub async fn build(push: bool) -> anyhow::Result<()> {
    let project_dir = Path::new(".");
    let (_, tasks) = Manifest::load(project_dir)?.into_topology()?;
    let client = ToolchainClient::new();

    println!("Locking dependencies...");
    client.lock_dependencies(project_dir).await?;

    for task in &tasks {
        let compose_file = ComposeFile::file_name(task);
        println!("Building images for task '{}'...", task.name);
        client.compose_build(project_dir, &compose_file).await?;

        if push {
            println!("Pushing images for task '{}'...", task.name);
            client.compose_push(project_dir, &compose_file).await?;
        }
    }

    Ok(())
}
