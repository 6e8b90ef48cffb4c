use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use release_pack::cli::{ReleaseArgs, ReleasePackager};
use release_pack::config;
use release_pack::steps::SystemSteps;
use release_pack::{ui, ReleaseError};

#[derive(clap::Parser)]
#[command(
    name = "release-pack",
    version,
    about = "Package a versioned tar release and bump the version file"
)]
struct Args {
    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<PathBuf>,

    #[arg(short, long, help = "Name the release files are derived from")]
    name: Option<String>,

    #[arg(long, help = "Source tree to package")]
    source: Option<PathBuf>,

    #[arg(long, help = "Directory the source tree is staged and archived in")]
    work_dir: Option<PathBuf>,

    #[arg(long, help = "Directory the finished archive is copied to")]
    release_dir: Option<PathBuf>,

    #[arg(long, help = "Version file holding the version and date declarations")]
    version_file: Option<PathBuf>,

    #[arg(short, long, help = "Overwrite an existing release archive without asking")]
    force: bool,

    #[arg(long, help = "Preview what would happen without making changes")]
    dry_run: bool,

    #[arg(long, help = "Only increment the version, skip packaging")]
    bump_only: bool,

    #[arg(short, long, help = "Print debug logs")]
    verbose: bool,
}

impl Args {
    fn release_args(&self) -> ReleaseArgs {
        ReleaseArgs {
            ai_name: self.name.clone(),
            source_dir: self.source.clone(),
            work_dir: self.work_dir.clone(),
            release_dir: self.release_dir.clone(),
            version_file: self.version_file.clone(),
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    // Load configuration
    let mut config = match config::load_config(args.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            ui::display_error(&format!("Error loading config: {}", e));
            std::process::exit(1);
        }
    };
    args.release_args().apply_to(&mut config);

    let ai_name = config.package.ai_name.clone();
    let steps = SystemSteps::new(config.archive.tar_command.clone());
    let packager = match ReleasePackager::new(config, steps) {
        Ok(packager) => packager,
        Err(e) => exit_with(&e, &ai_name),
    };

    if args.bump_only {
        match packager.bump_only() {
            Ok(record) => {
                let version = record.version.unwrap_or_default();
                ui::display_success(&format!(
                    "Version bumped from {} to {}",
                    version,
                    version.saturating_add(1)
                ));
                return Ok(());
            }
            Err(e) => exit_with(&e, &ai_name),
        }
    }

    // Reads the version file without writing, so a missing version stops here
    let plan = match packager.plan() {
        Ok(plan) => plan,
        Err(e) => exit_with(&e, &ai_name),
    };

    if args.dry_run {
        ui::display_release_plan(&plan);
        return Ok(());
    }

    let existing = plan.descriptor.release_archive();
    if existing.exists() && !args.force {
        if !ui::is_interactive() {
            ui::display_error(&format!(
                "{} already exists; rerun with --force to overwrite it",
                existing.display()
            ));
            std::process::exit(1);
        }
        if !ui::confirm_action(&format!("{} already exists. Overwrite?", existing.display()))? {
            println!("Release cancelled by user.");
            return Ok(());
        }
    }

    ui::display_status(&format!("Releasing {}", plan.descriptor.base_name));
    match packager.run() {
        Ok(report) => ui::display_run_report(&report),
        Err(e) => exit_with(&e, &ai_name),
    }

    Ok(())
}

fn exit_with(err: &ReleaseError, ai_name: &str) -> ! {
    if err.is_version_not_found() {
        ui::display_error(&format!("Couldn't find {} version: {}", ai_name, err));
    } else {
        ui::display_error(&err.to_string());
    }
    std::process::exit(1);
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "release_pack=debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
