//! Propellant property table.
//!
//! The three built-in gases are a closed enum; a table may be extended from a
//! JSON file at configuration time, after which it is never mutated. Ids are
//! matched case-insensitively after trimming.

use crate::domain::ThrusterError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GasSpec {
    pub id: String,
    #[serde(default)]
    pub display_name: String,
    pub atomic_mass_grams_per_mole: f64,
    pub ionization_energy_ev: f64,
}

impl GasSpec {
    pub fn new(
        id: impl Into<String>,
        display_name: impl Into<String>,
        atomic_mass_grams_per_mole: f64,
        ionization_energy_ev: f64,
    ) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            atomic_mass_grams_per_mole,
            ionization_energy_ev,
        }
    }

    /// Mass of one atom in kilograms.
    pub fn atom_mass_kg(&self) -> f64 {
        self.atomic_mass_grams_per_mole * crate::common::constants::ATOMIC_MASS_UNIT_KG
    }

    fn matches_id(&self, id: &str) -> bool {
        self.id.eq_ignore_ascii_case(id.trim())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinGas {
    Helium,
    Neon,
    Argon,
}

impl BuiltinGas {
    pub const ALL: [BuiltinGas; 3] = [Self::Helium, Self::Neon, Self::Argon];

    pub const fn id(self) -> &'static str {
        match self {
            Self::Helium => "helium",
            Self::Neon => "neon",
            Self::Argon => "argon",
        }
    }

    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Helium => "Helium",
            Self::Neon => "Neon",
            Self::Argon => "Argon",
        }
    }

    const fn properties(self) -> (f64, f64) {
        match self {
            Self::Helium => (4.0, 24.587),
            Self::Neon => (20.0, 21.564),
            Self::Argon => (40.0, 15.759),
        }
    }

    pub fn spec(self) -> GasSpec {
        let (atomic_mass, ionization_energy) = self.properties();
        GasSpec::new(self.id(), self.display_name(), atomic_mass, ionization_energy)
    }

    pub fn from_id(id: &str) -> Option<Self> {
        let normalized = id.trim();
        Self::ALL
            .into_iter()
            .find(|gas| gas.id().eq_ignore_ascii_case(normalized))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown gas '{id}'; configured gases: {}", .known.join(", "))]
pub struct UnknownGasError {
    pub id: String,
    pub known: Vec<String>,
}

impl From<UnknownGasError> for ThrusterError {
    fn from(error: UnknownGasError) -> Self {
        ThrusterError::configuration("CONFIG.UNKNOWN_GAS", error.to_string())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GasTableError {
    #[error("failed to read gas table '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse gas table '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("gas table must contain at least one gas")]
    Empty,
    #[error("gas id must not be empty")]
    EmptyId,
    #[error("gas id '{id}' is defined more than once")]
    DuplicateId { id: String },
    #[error("gas id '{id}' shadows a built-in gas")]
    ShadowsBuiltin { id: String },
    #[error("gas '{id}' property '{field}' must be finite and > 0, got {value}")]
    InvalidProperty {
        id: String,
        field: &'static str,
        value: f64,
    },
}

impl From<GasTableError> for ThrusterError {
    fn from(error: GasTableError) -> Self {
        ThrusterError::configuration("CONFIG.GAS_TABLE", error.to_string())
    }
}

#[derive(Debug, Deserialize)]
struct GasTableDocument {
    gases: Vec<GasSpec>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GasTable {
    gases: Vec<GasSpec>,
}

impl GasTable {
    pub fn builtin() -> Self {
        Self {
            gases: BuiltinGas::ALL.into_iter().map(BuiltinGas::spec).collect(),
        }
    }

    pub fn from_specs(specs: impl IntoIterator<Item = GasSpec>) -> Result<Self, GasTableError> {
        let mut gases: Vec<GasSpec> = Vec::new();
        for mut spec in specs {
            validate_spec(&spec)?;
            spec.id = spec.id.trim().to_string();
            if gases.iter().any(|existing| existing.matches_id(&spec.id)) {
                return Err(GasTableError::DuplicateId { id: spec.id });
            }
            if spec.display_name.trim().is_empty() {
                spec.display_name = spec.id.clone();
            }
            gases.push(spec);
        }

        if gases.is_empty() {
            return Err(GasTableError::Empty);
        }
        Ok(Self { gases })
    }

    /// Built-in gases followed by the entries of a `{ "gases": [...] }` file.
    pub fn load_extension(path: impl AsRef<Path>) -> Result<Self, GasTableError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| GasTableError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let document: GasTableDocument =
            serde_json::from_str(&source).map_err(|source| GasTableError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        if let Some(shadowing) = document
            .gases
            .iter()
            .find(|spec| BuiltinGas::from_id(&spec.id).is_some())
        {
            return Err(GasTableError::ShadowsBuiltin {
                id: shadowing.id.trim().to_string(),
            });
        }

        let table = Self::from_specs(Self::builtin().gases.into_iter().chain(document.gases))?;
        tracing::debug!(
            path = %path.display(),
            gases = table.gases.len(),
            "loaded gas table extension"
        );
        Ok(table)
    }

    pub fn lookup(&self, id: &str) -> Result<&GasSpec, UnknownGasError> {
        self.gases
            .iter()
            .find(|spec| spec.matches_id(id))
            .ok_or_else(|| UnknownGasError {
                id: id.trim().to_string(),
                known: self.ids().map(str::to_string).collect(),
            })
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.gases.iter().map(|spec| spec.id.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &GasSpec> {
        self.gases.iter()
    }

    pub fn len(&self) -> usize {
        self.gases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gases.is_empty()
    }
}

impl Default for GasTable {
    fn default() -> Self {
        Self::builtin()
    }
}

pub fn builtin_gas_table() -> &'static GasTable {
    static TABLE: OnceLock<GasTable> = OnceLock::new();
    TABLE.get_or_init(GasTable::builtin)
}

pub fn lookup_gas(id: &str) -> Result<&'static GasSpec, UnknownGasError> {
    builtin_gas_table().lookup(id)
}

fn validate_spec(spec: &GasSpec) -> Result<(), GasTableError> {
    let id = spec.id.trim();
    if id.is_empty() {
        return Err(GasTableError::EmptyId);
    }

    for (field, value) in [
        ("atomicMassGramsPerMole", spec.atomic_mass_grams_per_mole),
        ("ionizationEnergyEv", spec.ionization_energy_ev),
    ] {
        if !value.is_finite() || value <= 0.0 {
            return Err(GasTableError::InvalidProperty {
                id: id.to_string(),
                field,
                value,
            });
        }
    }
    Ok(())
}
