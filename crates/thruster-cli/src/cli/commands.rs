use super::CliError;
use super::dispatch::{InputOverrides, apply_overrides, input_field_for, reconcile_edited};
use super::helpers::{CliContext, load_input_file};
use serde::Serialize;
use std::path::PathBuf;
use thruster_core::modules::serialization::{render_output_table, write_text_artifact};
use thruster_core::{
    EditedField, GasSpec, InputField, InputVector, InvalidResultError, OutputVector,
    ThrusterError, coerce_numeric, derive, reconcile,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub(super) enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(clap::Args)]
pub(super) struct DeriveArgs {
    /// JSON input vector (camelCase fields, missing fields are 0)
    #[arg(long, value_name = "path")]
    input: Option<PathBuf>,

    /// Propellant gas id
    #[arg(long)]
    gas: Option<String>,

    /// Gas flow, mg/s
    #[arg(long, value_name = "mg/s", allow_hyphen_values = true)]
    gas_flow: Option<String>,

    /// Equivalent current, A
    #[arg(long, value_name = "A", allow_hyphen_values = true)]
    equivalent_current: Option<String>,

    /// Gas utilization, %
    #[arg(long, value_name = "%", allow_hyphen_values = true)]
    gas_usage: Option<String>,

    /// Mean ion energy, eV
    #[arg(long, value_name = "eV", allow_hyphen_values = true)]
    particle_energy: Option<String>,

    /// Thrust, mN
    #[arg(long, value_name = "mN", allow_hyphen_values = true)]
    thrust: Option<String>,

    /// RF generator power, kW
    #[arg(long = "power-hfg", value_name = "kW", allow_hyphen_values = true)]
    power_hfg: Option<String>,

    /// Linked field the user just edited; its partner is recomputed from it
    #[arg(long, value_name = "flow|current")]
    edited: Option<String>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    /// Fail with the computation exit code when any output is undefined
    #[arg(long)]
    strict: bool,

    /// Also write the rendered result to this file
    #[arg(long, value_name = "path")]
    output: Option<PathBuf>,
}

impl DeriveArgs {
    fn overrides(&self) -> InputOverrides {
        let mut overrides = InputOverrides {
            gas: self.gas.clone(),
            ..InputOverrides::default()
        };
        overrides.push(InputField::GasFlow, self.gas_flow.clone());
        overrides.push(InputField::EquivalentCurrent, self.equivalent_current.clone());
        overrides.push(InputField::GasUsage, self.gas_usage.clone());
        overrides.push(InputField::ParticleEnergy, self.particle_energy.clone());
        overrides.push(InputField::Thrust, self.thrust.clone());
        overrides.push(InputField::PowerHfg, self.power_hfg.clone());
        overrides
    }
}

#[derive(clap::Args)]
pub(super) struct ReconcileArgs {
    /// Field that was edited
    #[arg(long, value_name = "flow|current")]
    edited: String,

    /// Edited value (mg/s for flow, A for current)
    #[arg(long, allow_hyphen_values = true)]
    value: String,

    /// Propellant gas id
    #[arg(long, default_value = "helium")]
    gas: String,
}

#[derive(clap::Args)]
pub(super) struct GasesArgs {
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DeriveReport<'a> {
    gas: &'a GasSpec,
    inputs: &'a InputVector,
    outputs: &'a OutputVector,
    undefined: Vec<&'static str>,
}

fn parse_edited(token: &str) -> Result<EditedField, CliError> {
    token.parse::<EditedField>().map_err(CliError::Compute)
}

pub(super) fn run_derive_command(args: DeriveArgs, context: &CliContext) -> Result<i32, CliError> {
    let edited = args.edited.as_deref().map(parse_edited).transpose()?;
    let base = match &args.input {
        Some(path) => load_input_file(path)?,
        None => InputVector::default(),
    };

    let inputs = apply_overrides(base, &args.overrides()).sanitized();
    inputs.validate()?;
    let gas = context
        .gases
        .lookup(&inputs.selected_gas)
        .map_err(ThrusterError::from)?;
    let inputs = reconcile_edited(inputs, edited, gas);

    let outputs = derive(&inputs, gas);
    let undefined = outputs.undefined_fields();
    let rendered = match args.format {
        OutputFormat::Table => format!(
            "Gas: {} ({})\n{}",
            gas.display_name,
            gas.id,
            render_output_table(&outputs)
        ),
        OutputFormat::Json => {
            let report = DeriveReport {
                gas,
                inputs: &inputs,
                outputs: &outputs,
                undefined: undefined.iter().map(|field| field.as_str()).collect(),
            };
            serde_json::to_string_pretty(&report).map_err(anyhow::Error::from)?
        }
    };
    print!("{}", rendered);
    if args.format == OutputFormat::Json {
        println!();
    }

    if let Some(path) = &args.output {
        write_text_artifact(path, &rendered).map_err(|source| {
            CliError::Compute(ThrusterError::internal(
                "SYS.CLI_OUTPUT",
                format!("failed to write '{}': {}", path.display(), source),
            ))
        })?;
    }

    if args.strict && !undefined.is_empty() {
        return Err(CliError::Compute(
            InvalidResultError { fields: undefined }.into(),
        ));
    }
    if !undefined.is_empty() {
        tracing::warn!(count = undefined.len(), "some outputs are undefined");
    }
    Ok(0)
}

pub(super) fn run_reconcile_command(
    args: ReconcileArgs,
    context: &CliContext,
) -> Result<i32, CliError> {
    let edited = parse_edited(&args.edited)?;
    let gas = context
        .gases
        .lookup(&args.gas)
        .map_err(ThrusterError::from)?;
    let value = coerce_numeric(&args.value);
    let paired = reconcile(edited, value, gas);

    let paired_field = input_field_for(edited.paired());
    let precision = match edited.paired() {
        EditedField::Current => 6,
        EditedField::Flow => 4,
    };
    println!(
        "{} {:.precision$} {}",
        paired_field,
        paired,
        paired_field.unit(),
        precision = precision
    );
    Ok(0)
}

pub(super) fn run_gases_command(args: GasesArgs, context: &CliContext) -> Result<i32, CliError> {
    match args.format {
        OutputFormat::Table => {
            println!(
                "{:<12} {:<16} {:>12} {:>12}",
                "id", "name", "mass g/mol", "Ei eV"
            );
            for gas in context.gases.iter() {
                println!(
                    "{:<12} {:<16} {:>12.3} {:>12.3}",
                    gas.id,
                    gas.display_name,
                    gas.atomic_mass_grams_per_mole,
                    gas.ionization_energy_ev
                );
            }
        }
        OutputFormat::Json => {
            let gases: Vec<&GasSpec> = context.gases.iter().collect();
            let rendered = serde_json::to_string_pretty(&gases).map_err(anyhow::Error::from)?;
            println!("{}", rendered);
        }
    }
    Ok(0)
}
