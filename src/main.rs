//! Headless entry point: open a project and report annotation progress.

use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use poseedit::project::{LayoutKind, ProjectSummary};
use poseedit::workspace::ProjectLoad;
use poseedit::{AppConfig, FlatLayoutChoice, Workspace, WorkspaceOptions};

/// Open a pose annotation project and print how far along it is
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Project root directory
    #[arg(value_name = "ROOT")]
    root: PathBuf,

    /// Move a flat directory of images into images/ and annotations/
    #[arg(long)]
    migrate: bool,

    /// Log at debug level regardless of the configured level
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();
    let config = AppConfig::load_from_default_path().unwrap_or_default();

    let level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        config.preferences.log_level.to_level_filter()
    };
    env_logger::Builder::new().filter_level(level).init();

    match run(&args, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            let mut source = e.source();
            while let Some(cause) = source {
                eprintln!("  caused by: {cause}");
                source = cause.source();
            }
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args, config: &AppConfig) -> Result<(), Box<dyn Error>> {
    let layout = poseedit::ProjectStore::detect_layout(&args.root)?;
    let choice = if args.migrate {
        FlatLayoutChoice::Migrate
    } else {
        if layout == LayoutKind::FlatWithImages {
            log::info!("Flat directory detected; opening in place (use --migrate to restructure)");
        }
        FlatLayoutChoice::Legacy
    };

    let mut workspace = Workspace::new(WorkspaceOptions::from_config(config));
    match workspace.load_project(&args.root, choice)? {
        ProjectLoad::AwaitingContent { images_dir } => {
            println!("No images found. Add images to {} and run again.", images_dir.display());
            return Ok(());
        }
        ProjectLoad::NoImages => {
            println!("No loadable images in {}.", args.root.display());
            return Ok(());
        }
        ProjectLoad::Loaded { .. } => {}
    }

    let Some(store) = workspace.project() else {
        return Ok(());
    };
    print_summary(&store.summary()?);

    let next = workspace
        .images()
        .iter()
        .find(|image| store.load_annotation(image).pose.needs_work());
    match next {
        Some(image) => println!("Next image needing work: {}", image.display()),
        None => println!("All images are scored or triaged."),
    }
    Ok(())
}

fn print_summary(summary: &ProjectSummary) {
    println!("Images:      {}", summary.total);
    println!("Scored:      {}", summary.scored);
    println!("Triaged:     {}", summary.triaged);
    println!("Needs work:  {}", summary.needs_work);
}
