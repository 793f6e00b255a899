use std::{
    fs::File,
    io::{self, BufReader},
    path::{Path, PathBuf},
};

use clap::{Args, Parser, Subcommand, ValueEnum};
use engine::ledger::{self, LoadReport};

use error::{AppError, Result};
use settings::{OutputFormat, Settings};

mod error;
mod report;
mod settings;

#[derive(Parser, Debug)]
#[command(name = "kinbank")]
#[command(about = "Balances and history of family bank accounts from a ledger export")]
struct Cli {
    /// Optional config file path (TOML).
    #[arg(long, env = "KINBANK_CONFIG")]
    config: Option<String>,
    /// Override the log level (e.g. `debug`).
    #[arg(long)]
    level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Categorical totals and balance per account.
    Summary(SummaryArgs),
    /// Running balance of one account, oldest record first.
    History(HistoryArgs),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum InputFormat {
    Json,
    Csv,
}

#[derive(Args, Debug)]
struct InputArgs {
    /// Ledger export (JSON array of documents, or CSV with a header row).
    #[arg(long)]
    input: PathBuf,
    /// Input format; guessed from the file extension when omitted.
    #[arg(long, value_enum)]
    input_format: Option<InputFormat>,
    /// Output format; defaults to the configured one.
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,
}

#[derive(Args, Debug)]
struct SummaryArgs {
    #[command(flatten)]
    input: InputArgs,
    /// Only this account (all accounts when omitted).
    #[arg(long)]
    account: Option<String>,
}

#[derive(Args, Debug)]
struct HistoryArgs {
    #[command(flatten)]
    input: InputArgs,
    /// Account to replay; defaults to `default_account` from the settings.
    #[arg(long)]
    account: Option<String>,
}

fn main() -> std::result::Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cli = Cli::parse();
    let mut settings = Settings::new(cli.config.as_deref())?;
    if let Some(level) = &cli.level {
        settings.level = level.clone();
    }

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "kinbank={level},engine={level}",
            level = settings.level
        ))
        .with_writer(io::stderr)
        .init();

    if let Err(err) = run(cli.command, &settings) {
        tracing::error!("{err}");
        return Err(err.into());
    }
    Ok(())
}

fn run(command: Command, settings: &Settings) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match command {
        Command::Summary(args) => {
            let report = load(&args.input)?;
            let response = report::summaries(&report, args.account.as_deref());
            match args.input.format.unwrap_or(settings.format) {
                OutputFormat::Text => report::write_summary_text(&mut out, &response),
                OutputFormat::Json => report::write_json(&mut out, &response),
            }
        }
        Command::History(args) => {
            let account = args
                .account
                .or_else(|| settings.default_account.clone())
                .ok_or(AppError::MissingAccount)?;
            let report = load(&args.input)?;
            let response = report::history(&report, &account);
            match args.input.format.unwrap_or(settings.format) {
                OutputFormat::Text => report::write_history_text(&mut out, &response),
                OutputFormat::Json => report::write_json(&mut out, &response),
            }
        }
    }
}

fn load(args: &InputArgs) -> Result<LoadReport> {
    let format = args
        .input_format
        .unwrap_or_else(|| guess_format(&args.input));
    tracing::debug!(path = %args.input.display(), ?format, "loading ledger export");

    let file = File::open(&args.input).map_err(|source| AppError::Input {
        path: args.input.display().to_string(),
        source,
    })?;
    let reader = BufReader::new(file);
    let report = match format {
        InputFormat::Json => ledger::load_json(reader)?,
        InputFormat::Csv => ledger::load_csv(reader)?,
    };
    Ok(report)
}

fn guess_format(path: &Path) -> InputFormat {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("csv") => InputFormat::Csv,
        _ => InputFormat::Json,
    }
}
