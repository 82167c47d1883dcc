use std::path::PathBuf;

use clap::{Parser, Subcommand};
use hackathon_teams::pipeline::{self, RunOptions};
use hackathon_teams::report::ReportLabels;
use hackathon_teams::settings::Settings;
use hackathon_teams::{HackathonError, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    if let Err(error) = init_tracing().and_then(|()| run(cli)) {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

fn init_tracing() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| HackathonError::Logging(error.to_string()))
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Assign(args) => execute_assign(args),
        Command::Emails(args) => execute_emails(args),
    }
}

fn load_settings(path: Option<&PathBuf>) -> Result<Settings> {
    match path {
        Some(path) => Settings::load(path),
        None => Ok(Settings::default()),
    }
}

fn execute_assign(args: AssignArgs) -> Result<()> {
    let mut settings = load_settings(args.settings.as_ref())?;
    if let Some(max_teams) = args.max_teams {
        settings.assignment.max_teams = max_teams;
    }
    if let Some(team_size) = args.team_size {
        settings.assignment.team_size = team_size;
    }
    settings.validate()?;

    let options = RunOptions {
        seed: args.seed,
        labels: labels(args.french),
    };
    let outcome = pipeline::assign_file(&args.input, &args.output, &settings, &options)?;
    info!(
        teams = outcome.assignment.teams.len(),
        unassigned = outcome.assignment.unassigned().count(),
        report = %args.output.display(),
        "report written"
    );

    if let Some(path) = &args.assignment {
        std::fs::write(path, serde_json::to_string_pretty(&outcome.assignment)?)?;
    }
    Ok(())
}

fn execute_emails(args: EmailArgs) -> Result<()> {
    let settings = load_settings(args.settings.as_ref())?;
    let (messages, report) =
        pipeline::preview_emails(&args.input, &settings, args.sender.as_deref())?;
    info!(
        composed = messages.len(),
        skipped = report.total - report.success - report.errors,
        "confirmation emails composed"
    );
    std::fs::write(&args.output, serde_json::to_string_pretty(&messages)?)?;
    Ok(())
}

fn labels(french: bool) -> ReportLabels {
    if french {
        ReportLabels::french()
    } else {
        ReportLabels::default()
    }
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Split hackathon participants into balanced teams and export the report."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Assign the uploaded participants to teams and write the report workbook.
    Assign(AssignArgs),
    /// Compose confirmation emails for the uploaded participants.
    Emails(EmailArgs),
}

#[derive(clap::Args)]
struct AssignArgs {
    /// Participant upload (.xlsx).
    #[arg(long)]
    input: PathBuf,

    /// Report workbook to write.
    #[arg(long)]
    output: PathBuf,

    /// JSON settings file with team sizes, names and mentors.
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Seed for the shuffle, for reproducible assignments.
    #[arg(long)]
    seed: Option<u64>,

    /// Overrides the maximum number of teams.
    #[arg(long)]
    max_teams: Option<usize>,

    /// Overrides the maximum team size.
    #[arg(long)]
    team_size: Option<usize>,

    /// Also write the assignment as JSON to this path.
    #[arg(long)]
    assignment: Option<PathBuf>,

    /// Use French report labels.
    #[arg(long)]
    french: bool,
}

#[derive(clap::Args)]
struct EmailArgs {
    /// Participant upload (.xlsx).
    #[arg(long)]
    input: PathBuf,

    /// JSON file receiving the composed messages.
    #[arg(long)]
    output: PathBuf,

    /// JSON settings file holding the sender addresses.
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Sender address; must be listed in the settings' allowed senders.
    #[arg(long)]
    sender: Option<String>,
}
