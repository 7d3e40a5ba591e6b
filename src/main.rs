use std::path::Path;

use anyhow::Result;
use clap::Parser;

use tokei_release::version::BumpTarget;
use tokei_release::{config, patch, repo, ui};

#[derive(clap::Parser)]
#[command(
    name = "bump_version",
    about = "Propagate a new version across the Tokei release files"
)]
struct Args {
    #[arg(help = "patch, minor, major, or an explicit x.y.z version")]
    target: String,

    #[arg(long, help = "Preview what would change without writing anything")]
    dry_run: bool,

    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Resolve the repository root; every target path hangs off it
    let root = match repo::resolve_repo_root(Path::new(".")) {
        Ok(root) => root,
        Err(e) => {
            ui::display_error(&e.to_string());
            std::process::exit(1);
        }
    };

    let config = match config::load_config(args.config.as_deref(), &root) {
        Ok(cfg) => cfg,
        Err(e) => {
            ui::display_error(&format!("Error loading config: {}", e));
            std::process::exit(1);
        }
    };

    // Current version comes from the manifest's version field
    let manifest_path = config.resolve(&root, &config.targets.manifest);
    let current = match patch::read_manifest_version(&manifest_path) {
        Ok(version) => version,
        Err(e) => {
            ui::display_error(&e.to_string());
            std::process::exit(1);
        }
    };

    let target = match BumpTarget::parse(&args.target) {
        Some(target) => target,
        None => {
            ui::display_error(&format!(
                "Invalid target '{}': expected patch, minor, major, or x.y.z",
                args.target
            ));
            std::process::exit(1);
        }
    };
    let next = target.resolve(current);

    // Plan everything before touching anything
    let changes = patch::plan_changes(&root, &config);

    if args.dry_run {
        ui::display_dry_run_plan(&current, &next, &changes);
        return Ok(());
    }

    for change in &changes {
        if let Err(e) = change.apply(&next) {
            ui::display_error(&format!(
                "Failed to update {} '{}': {}",
                change.label(),
                change.path.display(),
                e
            ));
            std::process::exit(1);
        }
        ui::display_success(&format!("Updated {}", change.path.display()));
    }

    ui::display_success(&format!("Bumped version {} -> {}", current, next));

    Ok(())
}
