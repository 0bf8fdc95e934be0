//! Derivation engine for an RF ion thruster: propellant property table,
//! gas flow / equivalent current reconciliation and the derived performance
//! quantities.

pub mod common;
pub mod domain;
pub mod modules;

pub use common::gas::{
    BuiltinGas, GasSpec, GasTable, GasTableError, UnknownGasError, builtin_gas_table, lookup_gas,
};
pub use domain::{
    InputEdit, InputField, InputVector, OutputField, OutputVector, Quantity, ThrusterError,
    ThrusterErrorCategory, ThrusterResult, coerce_numeric,
};
pub use modules::{
    EditedField, GasLookup, InvalidResultError, derive, derive_checked, recompute, reconcile,
};
