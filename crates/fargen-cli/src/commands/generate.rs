use std::path::PathBuf;

use fargen_build::Project;
use fargen_core::Manifest;

/// Run the full generation pipeline: load the manifest, plan every
/// artifact, write them, and report per-artifact outcomes.
pub fn generate(root: Option<PathBuf>) -> anyhow::Result<()> {
    let project_dir = root.unwrap_or_else(|| PathBuf::from("."));

    let manifest = Manifest::load(&project_dir)?;
    let (config, tasks) = manifest.into_topology()?;
    tracing::info!(root = %project_dir.display(), tasks = tasks.len(), "manifest loaded");

    println!(
        "Generating artifacts for {} task(s) in {}...",
        tasks.len(),
        config.region
    );

    let project = Project::new(config, tasks);
    let report = project.generate(&project_dir)?;
    println!("{report}");

    if report.has_failures() {
        anyhow::bail!("generation finished with failed artifacts");
    }
    Ok(())
}
