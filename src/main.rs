use anyhow::Result;
use clap::Parser;

use magikarp::config;
use magikarp::git::Git2Repository;
use magikarp::ui;
use magikarp::{IncrementTarget, PackageProcessor};

#[derive(clap::Parser)]
#[command(
    name = "magikarp",
    about = "Increment the project version and propagate it into other files"
)]
struct Args {
    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(short, long, help = "Manifest file holding the version")]
    manifest: Option<String>,

    #[arg(short, long, help = "Component to increment: major, minor or build")]
    increment: Option<IncrementTarget>,

    #[arg(long, help = "Read the current version from the highest git tag")]
    git_tags: bool,

    #[arg(long, help = "Don't fetch tags from the remote before reading them")]
    no_fetch: bool,

    #[arg(long, help = "Keep components right of the incremented one")]
    no_zero_right: bool,

    #[arg(long, help = "Preview what would happen without writing files")]
    dry_run: bool,

    #[arg(long, help = "Log level or filter (e.g. debug, magikarp=trace)")]
    log_level: Option<String>,

    #[arg(short, long, help = "Print version information")]
    version: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.version {
        println!("magikarp {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    ui::init_logging(args.log_level.as_deref())?;

    // Load configuration, then let flags override it
    let mut config = match config::load_config(args.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            ui::display_error(&format!("Error loading config: {}", e));
            std::process::exit(1);
        }
    };

    if let Some(manifest) = args.manifest {
        config.manifest = manifest;
    }
    if let Some(increment) = args.increment {
        config.increment = increment;
    }
    if args.git_tags {
        config.git_tags = true;
    }
    if args.no_fetch {
        config.git.fetch = false;
    }
    if args.no_zero_right {
        config.zero_right = false;
    }
    if args.dry_run {
        config.dry_run = true;
    }

    let repo = if config.git_tags {
        match Git2Repository::open(&config.git.project_directory, config.git.remote.as_str()) {
            Ok(repo) => Some(repo),
            Err(e) => {
                ui::display_error(&format!("Git repository error: {}", e));
                std::process::exit(1);
            }
        }
    } else {
        None
    };

    if config.git_tags && config.git.fetch {
        ui::display_status(&format!("Fetching tags from '{}'...", config.git.remote));
    }
    ui::display_status(&format!(
        "Incrementing {} version of {}",
        config.increment, config.manifest
    ));

    let mut processor = PackageProcessor::new(&config);
    if let Some(repo) = repo.as_ref() {
        processor = processor.with_tag_source(repo);
    }

    let report = match processor.process(&config.manifest) {
        Ok(report) => report,
        Err(e) => {
            ui::display_error(&format!("Version bump failed: {}", e));
            std::process::exit(1);
        }
    };

    for warning in &report.warnings {
        ui::display_boundary_warning(warning);
    }

    ui::display_version_change(&report);
    ui::display_replacements(&report);

    if report.dry_run {
        ui::display_status("Dry run: no files were written");
    } else {
        println!();
        ui::display_success(&format!(
            "Version {} written to {}",
            report.version, config.manifest
        ));
    }

    Ok(())
}
