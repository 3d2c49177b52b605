//! Argument parsing and command dispatch for the `hdrstage` binary.

use std::path::PathBuf;

use anyhow::anyhow;
use clap::{Args, Parser, Subcommand, ValueEnum};
use hdrstage_fsops::{StageError, StageLayout, StageReport, base_dir_from_module, plan};
use hdrstage_telemetry::{DEFAULT_LOG_LEVEL, LogFormat, LoggingConfig, TelemetryError};
use tracing::debug;

use crate::output::render_report;

const EXIT_OK: i32 = 0;
const EXIT_STALE: i32 = 1;

/// Parses CLI arguments, installs logging, and executes the requested command.
/// Returns the process exit code.
#[must_use]
pub fn run() -> i32 {
    execute(Cli::parse())
}

fn execute(cli: Cli) -> i32 {
    let logging = LoggingConfig {
        level: &cli.log_level,
        format: cli.log_format.map_or_else(LogFormat::infer, Into::into),
    };
    if let Err(err) = hdrstage_telemetry::init_logging(&logging) {
        let err = logging_failure(err);
        eprintln!("error: {}", err.display_message());
        return err.exit_code();
    }

    match dispatch(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {}", err.display_message());
            err.exit_code()
        }
    }
}

fn dispatch(cli: Cli) -> CliResult<i32> {
    debug!(command = command_label(&cli.command), "dispatching command");
    match cli.command {
        Command::Stage(args) => handle_stage(&args, cli.output),
        Command::Check(args) => handle_check(&args, cli.output),
    }
}

fn handle_stage(args: &StageArgs, format: OutputFormat) -> CliResult<i32> {
    let report = hdrstage_fsops::run(&args.module_path, args.global_path.as_deref(), &args.args)
        .map_err(stage_failure)?;
    render_report(&report, format)?;
    Ok(EXIT_OK)
}

fn handle_check(args: &CheckArgs, format: OutputFormat) -> CliResult<i32> {
    let report = check_report(args)?;
    render_report(&report, format)?;
    Ok(if report.is_up_to_date() {
        EXIT_OK
    } else {
        EXIT_STALE
    })
}

fn check_report(args: &CheckArgs) -> CliResult<StageReport> {
    let base_dir = base_dir_from_module(&args.module_path).map_err(stage_failure)?;
    plan(&StageLayout::curl().tasks(&base_dir)).map_err(stage_failure)
}

#[derive(Parser)]
#[command(
    name = "hdrstage",
    about = "Stage configuration headers into a vendored upstream tree"
)]
struct Cli {
    #[arg(
        long = "output",
        alias = "format",
        global = true,
        value_enum,
        env = "HDRSTAGE_OUTPUT",
        default_value_t = OutputFormat::Text,
        help = "Select how staging results are printed"
    )]
    output: OutputFormat,
    #[arg(
        long,
        global = true,
        env = "HDRSTAGE_LOG_LEVEL",
        default_value = DEFAULT_LOG_LEVEL,
        help = "Log filter used when RUST_LOG is unset"
    )]
    log_level: String,
    #[arg(long, global = true, value_enum, env = "HDRSTAGE_LOG_FORMAT")]
    log_format: Option<LogFormatArg>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Copy headers whose upstream copy is missing or differs.
    Stage(StageArgs),
    /// Report pending copies without writing; exits 1 when any are pending.
    Check(CheckArgs),
}

#[derive(Args)]
struct StageArgs {
    #[arg(help = "Path of the module file; its directory holds the headers")]
    module_path: PathBuf,
    #[arg(long, help = "Global build path supplied by the orchestrator (unused)")]
    global_path: Option<PathBuf>,
    #[arg(
        num_args = 1..,
        trailing_var_arg = true,
        help = "Extra orchestrator arguments (unused)"
    )]
    args: Vec<String>,
}

#[derive(Args)]
struct CheckArgs {
    #[arg(help = "Path of the module file; its directory holds the headers")]
    module_path: PathBuf,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum LogFormatArg {
    Json,
    Pretty,
}

impl From<LogFormatArg> for LogFormat {
    fn from(value: LogFormatArg) -> Self {
        match value {
            LogFormatArg::Json => Self::Json,
            LogFormatArg::Pretty => Self::Pretty,
        }
    }
}

const fn command_label(command: &Command) -> &'static str {
    match command {
        Command::Stage(_) => "stage",
        Command::Check(_) => "check",
    }
}

#[derive(Debug)]
pub(crate) enum CliError {
    Validation(String),
    Failure(anyhow::Error),
}

pub(crate) type CliResult<T> = Result<T, CliError>;

impl CliError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub(crate) fn failure(error: impl Into<anyhow::Error>) -> Self {
        Self::Failure(error.into())
    }

    pub(crate) const fn exit_code(&self) -> i32 {
        match self {
            Self::Validation(_) => 2,
            Self::Failure(_) => 3,
        }
    }

    pub(crate) fn display_message(&self) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            Self::Failure(error) => format!("{error:#}"),
        }
    }
}

fn stage_failure(err: StageError) -> CliError {
    match err {
        StageError::InvalidModulePath { path } => CliError::validation(format!(
            "module path {} has no parent directory",
            path.display()
        )),
        other => {
            let path = other.path().display().to_string();
            CliError::failure(anyhow::Error::new(other).context(format!("staging {path}")))
        }
    }
}

fn logging_failure(err: TelemetryError) -> CliError {
    match err {
        TelemetryError::InvalidFilter { directive, .. } => {
            CliError::validation(format!("invalid log level '{directive}'"))
        }
        other @ TelemetryError::SubscriberInstall { .. } => {
            CliError::failure(anyhow!("failed to initialise logging: {other}"))
        }
    }
}
