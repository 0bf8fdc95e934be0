//! Derivation engine: the full output vector from one input vector and one gas.
//!
//! Units follow the input shell: mg/s, A, %, eV, mN, kW. Outputs are in s,
//! eV, kW, %, km/s, mg/s and A.
//!
//! Degenerate inputs (a guarded denominator or precondition `<= 0`) define the
//! dependent output as exactly 0. Physically inconsistent inputs produce NaN,
//! and every guard passes a NaN precondition through unchanged so an undefined
//! result is never masked as a zero further down the chain.

use super::traits::GasLookup;
use crate::common::constants::{
    JOULES_PER_EV, KG_PER_MG, M_PER_KM, PERCENT, STANDARD_GRAVITY_MPS2, W_PER_KW,
};
use crate::common::gas::GasSpec;
use crate::domain::{InputVector, OutputField, OutputVector, ThrusterError, ThrusterResult};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("inputs are physically inconsistent; undefined outputs: {}", field_list(.fields))]
pub struct InvalidResultError {
    pub fields: Vec<OutputField>,
}

impl From<InvalidResultError> for ThrusterError {
    fn from(error: InvalidResultError) -> Self {
        ThrusterError::computation("RUN.INVALID_RESULT", error.to_string())
    }
}

fn field_list(fields: &[OutputField]) -> String {
    fields
        .iter()
        .map(|field| field.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn guarded(output: &'static str, precondition: f64, formula: impl FnOnce() -> f64) -> f64 {
    if precondition.is_nan() {
        return f64::NAN;
    }
    if precondition > 0.0 {
        formula()
    } else {
        tracing::debug!(output, precondition, "degenerate input, output defined as 0");
        0.0
    }
}

fn usage_fraction(gas_usage_pct: f64) -> f64 {
    gas_usage_pct / PERCENT
}

/// Specific impulse in s.
pub fn specific_impulse(thrust_mn: f64, gas_flow_mg_s: f64) -> f64 {
    guarded("specificImpulse", gas_flow_mg_s, || {
        thrust_mn / (gas_flow_mg_s * STANDARD_GRAVITY_MPS2) * 1.0e3
    })
}

/// Jet power in kW: `T^2 / (2 mdot)`.
pub fn jet_power(thrust_mn: f64, gas_flow_mg_s: f64) -> f64 {
    guarded("jetPower", gas_flow_mg_s, || {
        thrust_mn * thrust_mn / (2.0 * gas_flow_mg_s * KG_PER_MG) * 1.0e-9
    })
}

pub fn thrust_efficiency(jet_power_kw: f64, power_hfg_kw: f64) -> f64 {
    guarded("thrustEfficiency", power_hfg_kw, || {
        jet_power_kw / power_hfg_kw * PERCENT
    })
}

pub fn ion_mass_flow(gas_flow_mg_s: f64, gas_usage_pct: f64) -> f64 {
    gas_flow_mg_s * usage_fraction(gas_usage_pct)
}

pub fn neutral_mass_flow(gas_flow_mg_s: f64, gas_usage_pct: f64) -> f64 {
    gas_flow_mg_s * (1.0 - usage_fraction(gas_usage_pct))
}

pub fn ion_current(equivalent_current_a: f64, gas_usage_pct: f64) -> f64 {
    equivalent_current_a * usage_fraction(gas_usage_pct)
}

pub fn neutral_current(equivalent_current_a: f64, gas_usage_pct: f64) -> f64 {
    equivalent_current_a * (1.0 - usage_fraction(gas_usage_pct))
}

/// Velocity in km/s of a particle of `gas` carrying `energy_ev`. A negative
/// energy has no real velocity and yields NaN.
pub fn particle_velocity(energy_ev: f64, gas: &GasSpec) -> f64 {
    (2.0 * energy_ev * JOULES_PER_EV / gas.atom_mass_kg()).sqrt() / M_PER_KM
}

/// Energy flow in kW carried by a beam of `current_a` at `energy_ev` per particle.
pub fn energy_flow_kw(current_a: f64, energy_ev: f64) -> f64 {
    current_a * energy_ev / W_PER_KW
}

/// Generator energy per produced ion above the gas's ionization energy, in eV.
pub fn ion_cost(
    power_hfg_kw: f64,
    gas_flow_mg_s: f64,
    gas_usage_pct: f64,
    ion_current_a: f64,
    gas: &GasSpec,
) -> f64 {
    guarded("ionCost", gas_flow_mg_s * gas_usage_pct, || {
        guarded("ionCost", ion_current_a, || {
            power_hfg_kw * W_PER_KW / ion_current_a - gas.ionization_energy_ev
        })
    })
}

pub fn energy_efficiency(energy_flow_kw: f64, power_hfg_kw: f64) -> f64 {
    guarded("energyEfficiency", energy_flow_kw, || {
        guarded("energyEfficiency", power_hfg_kw, || {
            energy_flow_kw / power_hfg_kw * PERCENT
        })
    })
}

/// Energy balance between jet power and the ion and neutral beams, written as
/// a quadratic `a t^2 + b t + c = 0` in `t = sqrt(neutral energy)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnergyBalance {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl EnergyBalance {
    pub fn new(
        gas_usage_pct: f64,
        equivalent_current_a: f64,
        ion_current_a: f64,
        neutral_current_a: f64,
        ion_energy_ev: f64,
        jet_power_kw: f64,
    ) -> Self {
        let eta = usage_fraction(gas_usage_pct);
        Self {
            a: (1.0 - eta) * neutral_current_a,
            b: (eta * (1.0 - eta) * ion_energy_ev).sqrt() * equivalent_current_a,
            c: eta * ion_current_a * ion_energy_ev - jet_power_kw * W_PER_KW,
        }
    }

    pub fn discriminant(&self) -> f64 {
        self.b * self.b - 4.0 * self.a * self.c
    }

    /// The `+sqrt` root in `t`. `None` when `a == 0` or there is no real root.
    pub fn solve_root(&self) -> Option<f64> {
        if self.a == 0.0 || !self.a.is_finite() {
            return None;
        }
        let discriminant = self.discriminant();
        if discriminant.is_nan() || discriminant < 0.0 {
            return None;
        }
        let root = (-self.b + discriminant.sqrt()) / (2.0 * self.a);
        root.is_finite().then_some(root)
    }

    /// Neutral energy in eV, the square of [`Self::solve_root`].
    pub fn solve(&self) -> Option<f64> {
        self.solve_root().map(|root| root * root)
    }

    pub fn residual(&self, root: f64) -> f64 {
        (self.a * root + self.b) * root + self.c
    }
}

/// Neutral energy in eV, or NaN when the balance has no usable root.
pub fn neutral_energy(balance: &EnergyBalance) -> f64 {
    match balance.solve() {
        Some(energy) => energy,
        None => {
            tracing::warn!(
                a = balance.a,
                b = balance.b,
                c = balance.c,
                discriminant = balance.discriminant(),
                "energy balance has no real solution, neutral energy undefined"
            );
            f64::NAN
        }
    }
}

/// Computes every output from scratch. Never fails: undefined results are
/// NaN entries in the returned vector.
pub fn derive(inputs: &InputVector, gas: &GasSpec) -> OutputVector {
    tracing::debug!(
        gas = %gas.id,
        gas_flow = inputs.gas_flow,
        equivalent_current = inputs.equivalent_current,
        gas_usage = inputs.gas_usage,
        particle_energy = inputs.particle_energy,
        thrust = inputs.thrust,
        power_hfg = inputs.power_hfg,
        "deriving thruster state"
    );

    let specific_impulse = specific_impulse(inputs.thrust, inputs.gas_flow);
    let jet_power = jet_power(inputs.thrust, inputs.gas_flow);
    let thrust_efficiency = thrust_efficiency(jet_power, inputs.power_hfg);

    let ion_mass_flow = ion_mass_flow(inputs.gas_flow, inputs.gas_usage);
    let neutral_mass_flow = neutral_mass_flow(inputs.gas_flow, inputs.gas_usage);
    let ion_current = ion_current(inputs.equivalent_current, inputs.gas_usage);
    let neutral_current = neutral_current(inputs.equivalent_current, inputs.gas_usage);

    let ion_energy = inputs.particle_energy;
    let ion_velocity = particle_velocity(ion_energy, gas);
    let ion_energy_flow = energy_flow_kw(ion_current, ion_energy);
    let ion_cost = ion_cost(
        inputs.power_hfg,
        inputs.gas_flow,
        inputs.gas_usage,
        ion_current,
        gas,
    );

    let balance = EnergyBalance::new(
        inputs.gas_usage,
        inputs.equivalent_current,
        ion_current,
        neutral_current,
        ion_energy,
        jet_power,
    );
    let neutral_energy = neutral_energy(&balance);
    let neutral_velocity = particle_velocity(neutral_energy, gas);
    let neutral_energy_flow = energy_flow_kw(neutral_current, neutral_energy);

    let energy_flow = neutral_energy_flow + ion_energy_flow;
    let energy_efficiency = energy_efficiency(energy_flow, inputs.power_hfg);

    OutputVector {
        specific_impulse,
        ion_cost,
        jet_power,
        thrust_efficiency,
        energy_flow,
        energy_efficiency,
        ion_velocity,
        neutral_velocity,
        ion_energy,
        neutral_energy,
        ion_mass_flow,
        neutral_mass_flow,
        ion_current,
        neutral_current,
        ion_energy_flow,
        neutral_energy_flow,
    }
}

/// Like [`derive`], but any undefined output is an error naming the fields.
pub fn derive_checked(inputs: &InputVector, gas: &GasSpec) -> ThrusterResult<OutputVector> {
    let outputs = derive(inputs, gas);
    if outputs.is_fully_defined() {
        Ok(outputs)
    } else {
        Err(InvalidResultError {
            fields: outputs.undefined_fields(),
        }
        .into())
    }
}

/// Resolves the selected gas, then derives. An unknown gas id is fatal.
pub fn recompute<G>(inputs: &InputVector, gases: &G) -> ThrusterResult<OutputVector>
where
    G: GasLookup + ?Sized,
{
    let gas = gases.lookup_gas(&inputs.selected_gas)?;
    Ok(derive(inputs, gas))
}
