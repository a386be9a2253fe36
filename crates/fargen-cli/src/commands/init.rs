use std::path::Path;

/// Write a starter fargen.toml into the current directory.
pub fn init_manifest() -> anyhow::Result<()> {
    let manifest_path = Path::new("fargen.toml");
    if manifest_path.exists() {
        eprintln!("fargen.toml already exists, skipping");
        return Ok(());
    }

    let template = r#"[project]
account_id = "123456789012"
region = "ap-northeast-1"
vpc_name = "vpc_central"
ecs_cluster_name = "persistent-cluster"
git_repo = "my-repo"
# git_branch = "master"

[[task]]
name = "my-task"
cpu = 512
memory = 2048
# environment = "production"
# schedule = "rate(1 day)"        # presence makes this a scheduled task
subnets = ["subnet-xxxx"]
security_groups = ["sg-xxxx"]

[[task.container]]
name = "my-image"
description = "Describe what this container does"
# script = "main"
# essential = true
# tag = "latest"

# [task.pipeline]
# unittest_subnets = ["subnet-xxxx"]
# unittest_security_groups = ["sg-xxxx"]
"#;
    std::fs::write(manifest_path, template)?;
    println!("Created fargen.toml");

    println!();
    println!("Next steps:");
    println!();
    println!("  1. Fill in your AWS account, network, and task settings");
    println!();
    println!("  2. Generate the deployment artifacts:");
    println!("     fargen generate");
    println!();
    println!("  3. Build and push the images:");
    println!("     fargen build");
    println!();
    println!("  4. Provision the infrastructure:");
    println!("     fargen provision --apply");

    Ok(())
}
