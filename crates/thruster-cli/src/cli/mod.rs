mod commands;
mod dispatch;
mod helpers;

use clap::Parser;
use thruster_core::ThrusterError;

pub fn run_from_env() -> i32 {
    let args: Vec<String> = std::env::args().skip(1).collect();

    match run(args) {
        Ok(code) => code,
        Err(error) => {
            let diagnostic = error.as_thruster_error();
            eprintln!("{}", diagnostic.diagnostic_line());
            eprintln!("{}", diagnostic.fatal_exit_line());
            diagnostic.exit_code()
        }
    }
}

pub fn run<I, S>(args: I) -> Result<i32, CliError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let full_args = std::iter::once("thruster-calc".to_string())
        .chain(args.into_iter().map(Into::into))
        .collect::<Vec<_>>();
    parse_and_dispatch(full_args)
}

fn parse_and_dispatch(args: Vec<String>) -> Result<i32, CliError> {
    match Cli::try_parse_from(&args) {
        Ok(cli) => {
            helpers::init_logging(cli.verbose);
            let context = helpers::CliContext::load(cli.gas_table)?;
            dispatch_parsed(cli.command, &context)
        }
        Err(err) => match err.kind() {
            clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => {
                print!("{}", err);
                Ok(0)
            }
            _ => Err(CliError::Usage(err.to_string())),
        },
    }
}

#[derive(Parser)]
#[command(
    name = "thruster-calc",
    version,
    about = "RF ion thruster performance calculator"
)]
struct Cli {
    /// Raise log verbosity (repeatable); THRUSTER_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// JSON file with extra propellant gases (default: $THRUSTER_GAS_TABLE)
    #[arg(long, value_name = "path", global = true)]
    gas_table: Option<std::path::PathBuf>,

    #[command(subcommand)]
    command: CliCommand,
}

#[derive(clap::Subcommand)]
enum CliCommand {
    /// Derive every performance quantity from one input vector
    Derive(commands::DeriveArgs),
    /// Convert between gas flow and equivalent current
    Reconcile(commands::ReconcileArgs),
    /// List the configured propellant gases
    Gases(commands::GasesArgs),
}

fn dispatch_parsed(command: CliCommand, context: &helpers::CliContext) -> Result<i32, CliError> {
    match command {
        CliCommand::Derive(args) => commands::run_derive_command(args, context),
        CliCommand::Reconcile(args) => commands::run_reconcile_command(args, context),
        CliCommand::Gases(args) => commands::run_gases_command(args, context),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),
    #[error("{0}")]
    Compute(ThrusterError),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<ThrusterError> for CliError {
    fn from(error: ThrusterError) -> Self {
        Self::Compute(error)
    }
}

impl CliError {
    fn as_thruster_error(&self) -> ThrusterError {
        match self {
            Self::Usage(message) => {
                ThrusterError::input_validation("INPUT.CLI_USAGE", message.clone())
            }
            Self::Compute(error) => error.clone(),
            Self::Internal(error) => ThrusterError::internal("SYS.CLI", format!("{error:#}")),
        }
    }
}
