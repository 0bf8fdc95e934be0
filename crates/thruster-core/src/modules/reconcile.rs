//! Gas flow and equivalent current describe the same atom flux in two unit
//! systems. Whichever field the user edited is authoritative; the other one is
//! recomputed from it.

use crate::common::constants::{FARADAY_C_PER_MOL, KG_PER_G, KG_PER_MG, MG_PER_KG};
use crate::common::gas::GasSpec;
use crate::domain::ThrusterError;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditedField {
    Flow,
    Current,
}

impl EditedField {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Flow => "flow",
            Self::Current => "current",
        }
    }

    pub const fn paired(self) -> Self {
        match self {
            Self::Flow => Self::Current,
            Self::Current => Self::Flow,
        }
    }
}

impl Display for EditedField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str((*self).as_str())
    }
}

impl FromStr for EditedField {
    type Err = ThrusterError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        match token.trim().to_ascii_lowercase().as_str() {
            "flow" | "gas-flow" | "gas_flow" | "gasflow" => Ok(Self::Flow),
            "current" | "equivalent-current" | "equivalent_current" | "equivalentcurrent" => {
                Ok(Self::Current)
            }
            other => Err(ThrusterError::input_validation(
                "INPUT.EDITED_FIELD",
                format!("edited field must be 'flow' or 'current', got '{}'", other),
            )),
        }
    }
}

/// Equivalent current in A for a gas flow in mg/s.
pub fn flow_to_current(flow_mg_s: f64, gas: &GasSpec) -> f64 {
    if !(flow_mg_s.is_finite() && flow_mg_s > 0.0) {
        return 0.0;
    }
    let moles_per_second = flow_mg_s * KG_PER_MG / (gas.atomic_mass_grams_per_mole * KG_PER_G);
    moles_per_second * FARADAY_C_PER_MOL
}

/// Gas flow in mg/s for an equivalent current in A.
pub fn current_to_flow(current_a: f64, gas: &GasSpec) -> f64 {
    if !(current_a.is_finite() && current_a > 0.0) {
        return 0.0;
    }
    current_a * gas.atomic_mass_grams_per_mole * KG_PER_G / FARADAY_C_PER_MOL * MG_PER_KG
}

/// Returns the value of the field that was *not* edited.
pub fn reconcile(edited: EditedField, value: f64, gas: &GasSpec) -> f64 {
    let paired = match edited {
        EditedField::Flow => flow_to_current(value, gas),
        EditedField::Current => current_to_flow(value, gas),
    };
    tracing::debug!(
        gas = %gas.id,
        edited = %edited,
        value,
        paired,
        "reconciled linked field"
    );
    paired
}
