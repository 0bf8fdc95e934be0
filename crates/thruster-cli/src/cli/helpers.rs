use super::CliError;
use anyhow::Context;
use std::fs;
use std::path::{Path, PathBuf};
use thruster_core::{GasTable, InputVector, ThrusterError};
use tracing_subscriber::EnvFilter;

pub(super) const LOG_ENV: &str = "THRUSTER_LOG";
pub(super) const GAS_TABLE_ENV: &str = "THRUSTER_GAS_TABLE";

#[derive(Debug, Clone)]
pub(super) struct CliContext {
    pub(super) gases: GasTable,
}

impl CliContext {
    /// The explicit path wins over `THRUSTER_GAS_TABLE`; with neither, only
    /// the built-in gases are configured.
    pub(super) fn load(gas_table: Option<PathBuf>) -> Result<Self, CliError> {
        let gas_table_path = gas_table.or_else(|| {
            std::env::var_os(GAS_TABLE_ENV)
                .filter(|value| !value.is_empty())
                .map(PathBuf::from)
        });

        let gases = match &gas_table_path {
            Some(path) => GasTable::load_extension(path).map_err(ThrusterError::from)?,
            None => GasTable::builtin(),
        };
        tracing::debug!(
            source = %gas_table_path
                .as_deref()
                .map_or_else(|| "built-in".to_string(), |path| path.display().to_string()),
            gases = gases.len(),
            "configured gas table"
        );
        Ok(Self { gases })
    }
}

pub(super) fn log_level_for_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Logs go to stderr so stdout stays parseable.
pub(super) fn init_logging(verbose: u8) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(log_level_for_verbosity(verbose)));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

pub(super) fn load_input_file(path: &Path) -> Result<InputVector, CliError> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read input vector '{}'", path.display()))?;
    serde_json::from_str(&content).map_err(|source| {
        CliError::Compute(ThrusterError::input_validation(
            "INPUT.FILE_PARSE",
            format!("failed to parse input vector '{}': {}", path.display(), source),
        ))
    })
}
