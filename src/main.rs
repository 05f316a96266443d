use clap::{Parser, Subcommand};
use log::LevelFilter;
use newsfold::{config, output, pipeline};
use simple_logger::SimpleLogger;
use std::path::PathBuf;
use std::process::ExitCode;

fn version_string() -> &'static str {
    let on_tag = env!("NEWSFOLD_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("NEWSFOLD_GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup, called exactly once
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "newsfold")]
#[command(about = "Turn folders of programme news into a static site")]
#[command(long_about = "\
Turn folders of programme news into a static site

Every folder under the content root is one entry. newsfold renders an entry
page next to each folder and a listing page with a year/month filter. The
home page, stylesheet and logo are yours; newsfold only links to them.

Site structure:

  site/
  ├── config.toml                  # Optional, see 'newsfold gen-config'
  ├── index.html                   # Hand-authored home page (never written)
  ├── css/style.css                # Theme stylesheet (never written)
  ├── images/logo.png              # Nav bar logo and favicon
  ├── news.html                    # GENERATED listing page
  └── news/
      ├── youth-leadership-camp/
      │   ├── info.json            # {\"title\", \"date\": \"2024-12-15\", \"summary\"}
      │   ├── article.md           # Body (or description.txt for plain text)
      │   ├── thumbnail.jpg        # Listing card background (optional)
      │   ├── 01-arrival.jpg       # Gallery images and videos
      │   └── index.html           # GENERATED entry page
      └── .drafts/                 # Hidden folders are skipped

Metadata resolution (first available wins):
  Title:   info.json title → folder name (beach-cleanup → \"Beach Cleanup\")
  Summary: info.json summary → start of the body
  Date:    info.json date → none (listed last, hidden by filters)

Exits non-zero when any entry had to be skipped.")]
#[command(version = version_string())]
struct Cli {
    /// Site root holding config.toml and the content folder
    #[arg(long, default_value = ".", global = true)]
    root: PathBuf,

    /// Output directory (defaults to the site root)
    #[arg(long, global = true)]
    output: Option<PathBuf>,

    /// Log every file decision
    #[arg(long, short, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only report skipped entries
    #[arg(long, short, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Clone, Copy, PartialEq, Eq)]
enum Command {
    /// Run the full pipeline (default)
    Build,
    /// Scan and parse content, write nothing
    Check,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    let command = cli.command.unwrap_or(Command::Build);
    if command == Command::GenConfig {
        print!("{}", config::stock_config_toml());
        return Ok(ExitCode::SUCCESS);
    }

    let site_config = config::load_config(&cli.root)?;
    let output_root = cli.output.clone().unwrap_or_else(|| cli.root.clone());
    let mode = match command {
        Command::Check => pipeline::Mode::Check,
        _ => pipeline::Mode::Build,
    };

    let report = pipeline::build(&cli.root, &output_root, &site_config, mode)?;
    output::print_build_report(&report, cli.quiet);

    Ok(if report.succeeded() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Warnings by default, everything with `--verbose`, nothing with `--quiet`.
fn init_logging(cli: &Cli) -> Result<(), log::SetLoggerError> {
    let level = if cli.quiet {
        LevelFilter::Off
    } else if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    SimpleLogger::new().with_level(level).init()
}
