use crate::config::AppConfig;
use crate::import::create_importer;
use crate::render::render_candidate;
use crate::repl::ReverseSearch;
use anyhow::Result;
use clap::{Parser, Subcommand};
use dsh_hsearch::HistorySearch;
use std::io::{IsTerminal, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

mod config;
mod import;
mod render;
mod repl;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Config file (defaults to $XDG_CONFIG_HOME/hsearch/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// History file to search
    #[arg(long, global = true)]
    history_file: Option<PathBuf>,

    /// History format: plain, bash, zsh or fish
    #[arg(long, global = true)]
    shell: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print every match for FILTER, best first
    Query {
        filter: String,

        /// Print lines without highlighting
        #[arg(long)]
        plain: bool,

        /// Prefix each line with the tier that matched it
        #[arg(long)]
        show_tier: bool,

        /// Stop after this many matches
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Search interactively and print the accepted line
    Interactive {
        #[arg(default_value = "")]
        filter: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(err) = init_tracing() {
        eprintln!("hsearch: logging disabled: {err:#}");
    }

    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            error!("{err:#}");
            eprintln!("hsearch: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() -> Result<()> {
    let log_path = config::get_state_file("hsearch.log")?;
    let log_file = std::sync::Arc::new(std::fs::File::create(log_path)?);
    let filter =
        EnvFilter::try_from_env("HSEARCH_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_ansi(false)
        .with_env_filter(filter)
        .with_file(true)
        .with_line_number(true)
        .with_writer(log_file)
        .try_init()
        .map_err(|err| anyhow::anyhow!(err))
}

fn load_history(cli: &Cli, config: &AppConfig) -> Result<HistorySearch> {
    let mut search = HistorySearch::with_config(&config.search)?;
    let shell = cli.shell.as_deref().unwrap_or(&config.shell);
    let path = cli.history_file.as_deref().or(config.history_file.as_deref());
    let importer = create_importer(shell, path)?;
    let count = importer.import(&mut search)?;
    debug!("loaded {count} history lines");
    Ok(search)
}

fn run(cli: Cli) -> Result<ExitCode> {
    let config = AppConfig::load(cli.config.as_deref())?;
    let mut search = load_history(&cli, &config)?;
    let color = config.highlight();

    match cli.command {
        Command::Query {
            filter,
            plain,
            show_tier,
            limit,
        } => {
            let stdout = std::io::stdout();
            let highlight = !plain && stdout.is_terminal();
            let mut out = stdout.lock();
            search.start(&filter);

            let mut printed = 0;
            while limit.is_none_or(|limit| printed < limit) && search.up() {
                let candidate = search.current();
                if show_tier && let Some(tier) = candidate.tier() {
                    write!(out, "{tier}\t")?;
                }
                if highlight {
                    render_candidate(&mut out, candidate, color)?;
                } else {
                    write!(out, "{}", candidate.line())?;
                }
                writeln!(out)?;
                printed += 1;
            }
            out.flush()?;

            Ok(if printed > 0 {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(1)
            })
        }
        Command::Interactive { filter } => {
            // The prompt goes to stderr so the accepted line can be captured from stdout.
            let mut editor = ReverseSearch::new(search, &filter);
            let mut prompt = std::io::stderr();
            match editor.run(&mut prompt, color)? {
                Some(line) => {
                    println!("{line}");
                    Ok(ExitCode::SUCCESS)
                }
                None => Ok(ExitCode::from(130)),
            }
        }
    }
}
