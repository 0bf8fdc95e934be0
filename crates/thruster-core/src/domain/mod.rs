pub mod errors;

pub use errors::{ThrusterError, ThrusterErrorCategory, ThrusterResult};

use crate::common::gas::{BuiltinGas, GasSpec};
use crate::modules::reconcile::{EditedField, reconcile};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Parses one raw text field the way the input shell does: surrounding
/// whitespace is ignored, a decimal comma is accepted, and anything that does
/// not parse to a finite number becomes 0.
pub fn coerce_numeric(raw: &str) -> f64 {
    let trimmed = raw.trim();
    let parsed = trimmed
        .parse::<f64>()
        .or_else(|_| trimmed.replace(',', ".").parse::<f64>());
    match parsed {
        Ok(value) if value.is_finite() => value,
        _ => 0.0,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputField {
    GasFlow,
    EquivalentCurrent,
    GasUsage,
    ParticleEnergy,
    Thrust,
    PowerHfg,
}

impl InputField {
    pub const ALL: [InputField; 6] = [
        Self::GasFlow,
        Self::EquivalentCurrent,
        Self::GasUsage,
        Self::ParticleEnergy,
        Self::Thrust,
        Self::PowerHfg,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::GasFlow => "gasFlow",
            Self::EquivalentCurrent => "equivalentCurrent",
            Self::GasUsage => "gasUsage",
            Self::ParticleEnergy => "particleEnergy",
            Self::Thrust => "thrust",
            Self::PowerHfg => "powerHFG",
        }
    }

    pub const fn unit(self) -> &'static str {
        match self {
            Self::GasFlow => "mg/s",
            Self::EquivalentCurrent => "A",
            Self::GasUsage => "%",
            Self::ParticleEnergy => "eV",
            Self::Thrust => "mN",
            Self::PowerHfg => "kW",
        }
    }

    /// The reconciler direction when this field is the one just edited.
    pub const fn reconciled_as(self) -> Option<EditedField> {
        match self {
            Self::GasFlow => Some(EditedField::Flow),
            Self::EquivalentCurrent => Some(EditedField::Current),
            _ => None,
        }
    }
}

impl Display for InputField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str((*self).as_str())
    }
}

impl FromStr for InputField {
    type Err = ThrusterError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let normalized: String = token
            .trim()
            .chars()
            .filter(|ch| *ch != '_' && *ch != '-')
            .collect();
        Self::ALL
            .into_iter()
            .find(|field| field.as_str().eq_ignore_ascii_case(&normalized))
            .ok_or_else(|| {
                ThrusterError::input_validation(
                    "INPUT.UNKNOWN_FIELD",
                    format!("unknown input field '{}'", token.trim()),
                )
            })
    }
}

/// Snapshot of the interactively set quantities. Built fresh by the shell for
/// every recompute; the engine never keeps one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InputVector {
    /// mg/s
    pub gas_flow: f64,
    /// A
    pub equivalent_current: f64,
    /// percent, 0..=100
    pub gas_usage: f64,
    /// eV
    pub particle_energy: f64,
    /// mN
    pub thrust: f64,
    /// kW
    #[serde(rename = "powerHFG", alias = "powerHfg")]
    pub power_hfg: f64,
    pub selected_gas: String,
}

impl Default for InputVector {
    fn default() -> Self {
        Self::new(BuiltinGas::Helium.id())
    }
}

impl InputVector {
    pub fn new(selected_gas: impl Into<String>) -> Self {
        Self {
            gas_flow: 0.0,
            equivalent_current: 0.0,
            gas_usage: 0.0,
            particle_energy: 0.0,
            thrust: 0.0,
            power_hfg: 0.0,
            selected_gas: selected_gas.into(),
        }
    }

    pub fn get(&self, field: InputField) -> f64 {
        match field {
            InputField::GasFlow => self.gas_flow,
            InputField::EquivalentCurrent => self.equivalent_current,
            InputField::GasUsage => self.gas_usage,
            InputField::ParticleEnergy => self.particle_energy,
            InputField::Thrust => self.thrust,
            InputField::PowerHfg => self.power_hfg,
        }
    }

    pub fn with_value(mut self, field: InputField, value: f64) -> Self {
        let slot = match field {
            InputField::GasFlow => &mut self.gas_flow,
            InputField::EquivalentCurrent => &mut self.equivalent_current,
            InputField::GasUsage => &mut self.gas_usage,
            InputField::ParticleEnergy => &mut self.particle_energy,
            InputField::Thrust => &mut self.thrust,
            InputField::PowerHfg => &mut self.power_hfg,
        };
        *slot = value;
        self
    }

    /// Replaces every non-finite numeric field with 0.
    pub fn sanitized(self) -> Self {
        InputField::ALL.into_iter().fold(self, |inputs, field| {
            let value = inputs.get(field);
            if value.is_finite() {
                inputs
            } else {
                inputs.with_value(field, 0.0)
            }
        })
    }

    pub fn validate(&self) -> ThrusterResult<()> {
        for field in InputField::ALL {
            let value = self.get(field);
            if !value.is_finite() || value < 0.0 {
                return Err(ThrusterError::input_validation(
                    "INPUT.NEGATIVE_FIELD",
                    format!(
                        "input '{}' must be finite and >= 0 {}, got {}",
                        field,
                        field.unit(),
                        value
                    ),
                ));
            }
        }

        if self.gas_usage > 100.0 {
            return Err(ThrusterError::input_validation(
                "INPUT.GAS_USAGE_RANGE",
                format!("input 'gasUsage' must be within 0..=100 %, got {}", self.gas_usage),
            ));
        }
        Ok(())
    }

    /// Applies one edit and, for the two linked fields, recomputes the paired
    /// field through the reconciler so both describe the same flux.
    pub fn with_edit(self, edit: InputEdit, gas: &GasSpec) -> Self {
        match edit {
            InputEdit::Gas(id) => Self {
                selected_gas: id,
                ..self
            },
            InputEdit::Value { field, value } => {
                let edited = self.with_value(field, value);
                match field.reconciled_as() {
                    Some(direction) => {
                        let paired = reconcile(direction, value, gas);
                        edited.with_value(paired_input(direction), paired)
                    }
                    None => edited,
                }
            }
        }
    }
}

fn paired_input(edited: EditedField) -> InputField {
    match edited.paired() {
        EditedField::Flow => InputField::GasFlow,
        EditedField::Current => InputField::EquivalentCurrent,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum InputEdit {
    Value { field: InputField, value: f64 },
    Gas(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputField {
    SpecificImpulse,
    IonCost,
    JetPower,
    ThrustEfficiency,
    EnergyFlow,
    EnergyEfficiency,
    IonVelocity,
    NeutralVelocity,
    IonEnergy,
    NeutralEnergy,
    IonMassFlow,
    NeutralMassFlow,
    IonCurrent,
    NeutralCurrent,
    IonEnergyFlow,
    NeutralEnergyFlow,
}

impl OutputField {
    pub const ALL: [OutputField; 16] = [
        Self::SpecificImpulse,
        Self::IonCost,
        Self::JetPower,
        Self::ThrustEfficiency,
        Self::EnergyFlow,
        Self::EnergyEfficiency,
        Self::IonVelocity,
        Self::NeutralVelocity,
        Self::IonEnergy,
        Self::NeutralEnergy,
        Self::IonMassFlow,
        Self::NeutralMassFlow,
        Self::IonCurrent,
        Self::NeutralCurrent,
        Self::IonEnergyFlow,
        Self::NeutralEnergyFlow,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SpecificImpulse => "specificImpulse",
            Self::IonCost => "ionCost",
            Self::JetPower => "jetPower",
            Self::ThrustEfficiency => "thrustEfficiency",
            Self::EnergyFlow => "energyFlow",
            Self::EnergyEfficiency => "energyEfficiency",
            Self::IonVelocity => "ionVelocity",
            Self::NeutralVelocity => "neutralVelocity",
            Self::IonEnergy => "ionEnergy",
            Self::NeutralEnergy => "neutralEnergy",
            Self::IonMassFlow => "ionMassFlow",
            Self::NeutralMassFlow => "neutralMassFlow",
            Self::IonCurrent => "ionCurrent",
            Self::NeutralCurrent => "neutralCurrent",
            Self::IonEnergyFlow => "ionEnergyFlow",
            Self::NeutralEnergyFlow => "neutralEnergyFlow",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::SpecificImpulse => "Specific impulse",
            Self::IonCost => "Ion cost",
            Self::JetPower => "Jet power",
            Self::ThrustEfficiency => "Thrust efficiency",
            Self::EnergyFlow => "Energy flow",
            Self::EnergyEfficiency => "Energy efficiency",
            Self::IonVelocity => "Ion velocity",
            Self::NeutralVelocity => "Neutral velocity",
            Self::IonEnergy => "Ion energy",
            Self::NeutralEnergy => "Neutral energy",
            Self::IonMassFlow => "Ion mass flow",
            Self::NeutralMassFlow => "Neutral mass flow",
            Self::IonCurrent => "Ion current",
            Self::NeutralCurrent => "Neutral current",
            Self::IonEnergyFlow => "Ion energy flow",
            Self::NeutralEnergyFlow => "Neutral energy flow",
        }
    }

    pub const fn unit(self) -> &'static str {
        match self {
            Self::SpecificImpulse => "s",
            Self::IonCost => "eV",
            Self::JetPower | Self::EnergyFlow | Self::IonEnergyFlow | Self::NeutralEnergyFlow => {
                "kW"
            }
            Self::ThrustEfficiency | Self::EnergyEfficiency => "%",
            Self::IonVelocity | Self::NeutralVelocity => "km/s",
            Self::IonEnergy | Self::NeutralEnergy => "eV",
            Self::IonMassFlow | Self::NeutralMassFlow => "mg/s",
            Self::IonCurrent | Self::NeutralCurrent => "A",
        }
    }

    /// Decimal places used when the shell renders this field.
    pub const fn display_precision(self) -> usize {
        match self {
            Self::JetPower
            | Self::EnergyFlow
            | Self::IonMassFlow
            | Self::NeutralMassFlow
            | Self::IonEnergyFlow
            | Self::NeutralEnergyFlow => 4,
            Self::IonCurrent | Self::NeutralCurrent => 6,
            _ => 2,
        }
    }
}

impl Display for OutputField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str((*self).as_str())
    }
}

/// A derived value as the shell should see it: a guarded zero is a plain
/// `Value(0.0)`, a physically inconsistent input yields `Undefined`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Quantity {
    Value(f64),
    Undefined,
}

impl Quantity {
    pub fn from_raw(value: f64) -> Self {
        if value.is_finite() {
            Self::Value(value)
        } else {
            Self::Undefined
        }
    }

    pub fn value(self) -> Option<f64> {
        match self {
            Self::Value(value) => Some(value),
            Self::Undefined => None,
        }
    }

    pub fn is_undefined(self) -> bool {
        matches!(self, Self::Undefined)
    }
}

/// Complete derived state for one input vector. Undefined results are stored
/// as NaN and serialize as `null`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputVector {
    pub specific_impulse: f64,
    pub ion_cost: f64,
    pub jet_power: f64,
    pub thrust_efficiency: f64,
    pub energy_flow: f64,
    pub energy_efficiency: f64,
    pub ion_velocity: f64,
    pub neutral_velocity: f64,
    pub ion_energy: f64,
    pub neutral_energy: f64,
    pub ion_mass_flow: f64,
    pub neutral_mass_flow: f64,
    pub ion_current: f64,
    pub neutral_current: f64,
    pub ion_energy_flow: f64,
    pub neutral_energy_flow: f64,
}

impl OutputVector {
    pub fn raw(&self, field: OutputField) -> f64 {
        match field {
            OutputField::SpecificImpulse => self.specific_impulse,
            OutputField::IonCost => self.ion_cost,
            OutputField::JetPower => self.jet_power,
            OutputField::ThrustEfficiency => self.thrust_efficiency,
            OutputField::EnergyFlow => self.energy_flow,
            OutputField::EnergyEfficiency => self.energy_efficiency,
            OutputField::IonVelocity => self.ion_velocity,
            OutputField::NeutralVelocity => self.neutral_velocity,
            OutputField::IonEnergy => self.ion_energy,
            OutputField::NeutralEnergy => self.neutral_energy,
            OutputField::IonMassFlow => self.ion_mass_flow,
            OutputField::NeutralMassFlow => self.neutral_mass_flow,
            OutputField::IonCurrent => self.ion_current,
            OutputField::NeutralCurrent => self.neutral_current,
            OutputField::IonEnergyFlow => self.ion_energy_flow,
            OutputField::NeutralEnergyFlow => self.neutral_energy_flow,
        }
    }

    pub fn get(&self, field: OutputField) -> Quantity {
        Quantity::from_raw(self.raw(field))
    }

    pub fn undefined_fields(&self) -> Vec<OutputField> {
        OutputField::ALL
            .into_iter()
            .filter(|field| self.get(*field).is_undefined())
            .collect()
    }

    pub fn is_fully_defined(&self) -> bool {
        self.undefined_fields().is_empty()
    }
}
