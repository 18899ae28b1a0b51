use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use tracing_subscriber::EnvFilter;

use hashsweep::config::Config;
use hashsweep::hash::{ExtensionFilter, HashSession, ReportTargets, RunSummary, Selection, SelectionMode};

/// Compute MD5 hashes for files or folders in parallel.
#[derive(Debug, Parser)]
#[command(name = "hashsweep", version, about)]
struct Cli {
    /// Files to hash, or folders with --folders
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// Treat every path as a folder and hash the files inside it
    #[arg(short, long)]
    folders: bool,

    /// Include files in subfolders (folder mode only)
    #[arg(short, long, requires = "folders")]
    recurse: bool,

    /// Only hash these extensions, comma separated (e.g. ".txt,.py")
    #[arg(short, long, value_name = "LIST", requires = "folders")]
    ext: Option<String>,

    /// Write the text report to this file
    #[arg(long, value_name = "PATH")]
    txt: Option<PathBuf>,

    /// Write the CSV report to this file
    #[arg(long, value_name = "PATH")]
    csv: Option<PathBuf>,

    /// Number of hash workers (defaults to the CPU count)
    #[arg(short, long)]
    workers: Option<usize>,

    /// Sort CSV rows by path
    #[arg(long)]
    sort: bool,

    /// Print the run summary as JSON instead of text
    #[arg(long)]
    json: bool,

    /// Hide the progress bar and live result lines
    #[arg(short, long)]
    quiet: bool,

    /// Configuration file (defaults to the user config dir)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{} {:#}", "Error:".red().bold(), err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let mut config = Config::load(cli.config.as_deref()).context("loading configuration")?;
    if let Some(workers) = cli.workers {
        config.workers = workers;
    }
    if cli.sort {
        config.sort_reports = true;
    }
    config
        .validate()
        .map_err(|message| hashsweep::hash::HashUtilityError::InvalidArguments { message })?;

    let mode = if cli.folders { SelectionMode::Folders } else { SelectionMode::Files };
    let selection = Selection {
        paths: cli.paths,
        mode,
        recurse: cli.recurse,
        filter: cli.ext.as_deref().and_then(ExtensionFilter::parse),
    };
    let targets = ReportTargets { text: cli.txt, csv: cli.csv };

    let show_live = !cli.quiet && !cli.json;
    let pb = if show_live {
        ProgressBar::new(100)
    } else {
        ProgressBar::with_draw_target(Some(100), ProgressDrawTarget::hidden())
    };
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos:>3}% | {msg}")
            .context("building progress style")?
            .progress_chars("=>-"),
    );

    let pb_progress = pb.clone();
    let pb_lines = pb.clone();
    let stdout_is_terminal = std::io::stdout().is_terminal();
    let session = HashSession::from_config(&config)
        .with_progress_callback(move |update| {
            pb_progress.set_position(update.percent.round() as u64);
            pb_progress.set_message(update.eta.to_string());
        })
        .with_line_callback(move |result, line| {
            if !show_live {
                return;
            }
            let line = line.trim_end();
            let line = if result.is_success() {
                line.to_string()
            } else {
                line.red().to_string()
            };
            // Result lines belong on stdout; the bar only owns stderr
            if stdout_is_terminal {
                pb_lines.suspend(|| println!("{}", line));
            } else {
                println!("{}", line);
            }
        });

    let summary = match session.run(&selection, &targets) {
        Ok(summary) => summary,
        Err(err) if err.is_informational() => {
            pb.finish_and_clear();
            println!("{}", err.to_string().lines().next().unwrap_or_default());
            return Ok(ExitCode::SUCCESS);
        }
        Err(err) => return Err(err.into()),
    };
    pb.finish_and_clear();

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&summary).context("serializing summary")?);
    } else {
        print_summary(&summary, &targets);
    }

    for err in &summary.report_errors {
        eprintln!("{} {}", "Report error:".red().bold(), err);
    }

    Ok(if summary.report_errors.is_empty() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn print_summary(summary: &RunSummary, targets: &ReportTargets) {
    println!("\nHashing complete!");
    println!("Files hashed: {}", summary.files_hashed);
    if summary.files_failed > 0 {
        println!("Files failed: {}", summary.files_failed.to_string().red());
    } else {
        println!("Files failed: 0");
    }
    println!(
        "Total size: {}",
        humansize::format_size(summary.total_size, humansize::BINARY)
    );
    println!("Duration: {:.2}s", summary.duration.as_secs_f64());

    let secs = summary.duration.as_secs_f64();
    if secs > 0.0 {
        let throughput = (summary.bytes_processed as f64 / secs) as u64;
        println!(
            "Throughput: {}/s",
            humansize::format_size(throughput, humansize::BINARY)
        );
    }

    if let Some(path) = &targets.text {
        println!("Text report: {}", path.display());
    }
    if let Some(path) = &targets.csv {
        println!("CSV report: {}", path.display());
    }
}
