mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "fargen", about = "Generate AWS Fargate deployment artifacts")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a starter fargen.toml
    Init,
    /// Generate all deployment artifacts from fargen.toml
    Generate {
        /// Directory holding fargen.toml and receiving the artifacts
        /// (defaults to the current directory)
        #[arg(long)]
        root: Option<PathBuf>,
    },
    /// Lock dependencies and build every task's Docker images
    Build {
        /// Also push the built images to ECR
        #[arg(long)]
        push: bool,
    },
    /// Initialize the generated Terraform configuration
    Provision {
        /// Also run `terraform apply`
        #[arg(long)]
        apply: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init => commands::init_manifest()?,
        Commands::Generate { root } => commands::generate(root)?,
        Commands::Build { push } => commands::build(push).await?,
        Commands::Provision { apply } => commands::provision(apply).await?,
    }

    Ok(())
}
