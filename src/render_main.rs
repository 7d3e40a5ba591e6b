use std::path::{Path, PathBuf};

use clap::Parser;

use tokei_release::{render, repo, ui};

#[derive(clap::Parser)]
#[command(
    name = "render_dashboard",
    about = "Render the dashboard HTML for a single report"
)]
struct Args {
    #[arg(help = "Path to the stats JSON produced by the report generator")]
    stats: PathBuf,

    #[arg(help = "Path of the HTML file to write")]
    output: PathBuf,

    #[arg(long, help = "Template directory (default: <repo>/design/templates)")]
    templates: Option<PathBuf>,
}

fn main() {
    // Usage errors exit 10 like every other configuration error; help and
    // version output keep clap's success exit.
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let code = if e.use_stderr() { 10 } else { 0 };
            let _ = e.print();
            std::process::exit(code);
        }
    };

    let templates_dir = match args.templates {
        Some(dir) => dir,
        None => match repo::resolve_repo_root(Path::new(".")) {
            Ok(root) => root.join("design").join("templates"),
            Err(e) => {
                ui::display_error(&e.to_string());
                std::process::exit(e.exit_code());
            }
        },
    };

    if let Err(e) = render::render_dashboard(&args.stats, &args.output, &templates_dir) {
        ui::display_error(&e.to_string());
        std::process::exit(e.exit_code());
    }
}
