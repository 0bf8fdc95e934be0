//! Physical constants and unit factors shared by the reconciler and the
//! derivation engine.
//!
//! The flow/current relation uses the CODATA-2014 elementary charge, while the
//! velocity formulas use the rounded eV-to-joule factor. Do not merge them.

pub const AVOGADRO_PER_MOL: f64 = 6.022_140_76e23;
pub const ELEMENTARY_CHARGE_C: f64 = 1.602_176_62e-19;

pub const JOULES_PER_EV: f64 = 1.602e-19;
pub const ATOMIC_MASS_UNIT_KG: f64 = 1.6605e-27;
pub const STANDARD_GRAVITY_MPS2: f64 = 9.81;

pub const KG_PER_MG: f64 = 1.0e-6;
pub const KG_PER_G: f64 = 1.0e-3;
pub const MG_PER_KG: f64 = 1.0e6;
pub const W_PER_KW: f64 = 1.0e3;
pub const M_PER_KM: f64 = 1.0e3;
pub const PERCENT: f64 = 100.0;

/// Faraday constant in C/mol as seen by the reconciler.
pub const FARADAY_C_PER_MOL: f64 = AVOGADRO_PER_MOL * ELEMENTARY_CHARGE_C;
