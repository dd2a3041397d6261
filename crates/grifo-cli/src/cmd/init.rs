use anyhow::Context;
use grifo_core::paths;
use std::path::Path;

pub fn run(root: &Path, name: Option<&str>) -> anyhow::Result<()> {
    let project_name = match name {
        Some(n) => n.to_string(),
        None => root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "obra".to_string()),
    };

    println!("Initializing GrifoBoard in: {}", root.display());

    let created =
        grifo_core::state::init(root, &project_name).context("failed to initialize project")?;

    if created {
        println!("  created: {}", paths::CONFIG_FILE);
        println!("  created: {}", paths::STATE_FILE);
    } else {
        println!("  exists:  {}", paths::STATE_FILE);
    }
    println!("Done. Create an obra with `grifo obra create <slug> --name <name>`.");
    Ok(())
}
