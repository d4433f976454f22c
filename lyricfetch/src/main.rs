//! lyricfetch - Main entry point
//!
//! Collects the requested songs, resolves their lyrics and stores them in
//! the audio files' tags (or prints them for songs given by name).

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{ArgAction, ArgGroup, Parser};
use lyricfetch::input::{collect_songs, Input};
use lyricfetch::stats::format_hms;
use lyricfetch::{configured_providers, FetchError, ProviderContext, StandardSink};
use lyricfetch_common::config::split_list;
use lyricfetch_common::Config;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Command-line arguments for lyricfetch
#[derive(Parser, Debug)]
#[command(name = "lyricfetch")]
#[command(about = "Find lyrics for music files and store them in their tags")]
#[command(version)]
#[command(group(ArgGroup::new("source").args(["recursive", "by_name", "from_file"])))]
struct Args {
    /// Audio files to process
    #[arg(conflicts_with = "source")]
    files: Vec<PathBuf>,

    /// Process every audio file below a directory
    #[arg(short, long, num_args = 0..=1, default_missing_value = ".", value_name = "DIR")]
    recursive: Option<PathBuf>,

    /// Songs given as "Artist - Title"
    #[arg(short = 'n', long, num_args = 1.., value_name = "NAME")]
    by_name: Option<Vec<String>>,

    /// Text file listing one audio file per line
    #[arg(long, value_name = "FILE")]
    from_file: Option<PathBuf>,

    /// Number of songs resolved in parallel
    #[arg(short, long)]
    jobs: Option<usize>,

    /// Replace lyrics already stored in the files
    #[arg(short, long)]
    overwrite: bool,

    /// Print provider statistics after a batch
    #[arg(short, long)]
    stats: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Write found/notfound log files (see `debug_dir`)
    #[arg(short, long)]
    debug: bool,

    /// Configuration file (default: <config dir>/lyricfetch/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Providers to use, in order (comma separated)
    #[arg(long, value_name = "LIST")]
    sources: Option<String>,

    /// Providers to leave out (comma separated)
    #[arg(long, value_name = "LIST")]
    exclude: Option<String>,
}

impl Args {
    fn input(&self) -> Input {
        if let Some(dir) = &self.recursive {
            Input::Recursive(dir.clone())
        } else if let Some(names) = &self.by_name {
            Input::ByName(names.clone())
        } else if let Some(list) = &self.from_file {
            Input::ListFile(list.clone())
        } else {
            Input::Files(self.files.clone())
        }
    }

    /// Command-line values win over file and environment settings
    fn apply_to(&self, config: &mut Config) {
        if let Some(jobs) = self.jobs {
            config.jobcount = jobs;
        }
        config.overwrite |= self.overwrite;
        config.print_stats |= self.stats;
        config.debug |= self.debug;
        if let Some(sources) = &self.sources {
            config.sources = split_list(sources);
        }
        if let Some(exclude) = &self.exclude {
            config.exclude = split_list(exclude);
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    match try_main(args).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn try_main(args: Args) -> Result<ExitCode> {
    let mut config = Config::load(args.config.as_deref()).context("Failed to load configuration")?;
    args.apply_to(&mut config);
    init_tracing(args.verbose, &config.logging.level);
    config.validate()?;
    debug!(jobs = config.jobcount, overwrite = config.overwrite, "Configuration");

    let ctx = ProviderContext::new(&config.lastfm_key)?;
    let providers = configured_providers(&config, &ctx);
    info!(providers = ?providers, "Providers selected");

    let songs = collect_songs(&args.input())?;
    let order = providers.names();

    let cancel = CancellationToken::new();
    let interrupt = cancel.clone();
    tokio::spawn(async move {
        if signal::ctrl_c().await.is_ok() {
            info!("Received Ctrl+C, stopping");
            interrupt.cancel();
        }
    });

    let mut sink = StandardSink::stdout();
    match lyricfetch::run(songs, &config, providers, &mut sink, cancel).await {
        Ok(Some(report)) => {
            if config.print_stats {
                print!("{}", report.stats.report(&order, report.elapsed));
            }
            println!("Total time: {}", format_hms(report.elapsed));
            Ok(ExitCode::SUCCESS)
        }
        Ok(None) => Ok(ExitCode::SUCCESS),
        Err(FetchError::Interrupted(report)) => {
            println!("Interrupted");
            if config.print_stats && report.resolved > 0 {
                print!("{}", report.stats.report(&order, report.elapsed));
            }
            Ok(ExitCode::FAILURE)
        }
        Err(e) => Err(e.into()),
    }
}

/// Install the tracing subscriber; `RUST_LOG` wins over the flags
fn init_tracing(verbose: u8, configured: &str) {
    let level = match verbose {
        0 => configured,
        1 => "info",
        _ => "debug",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
