use crate::common::gas::{GasSpec, GasTable, UnknownGasError};

/// Source of gas properties for a recompute. The shell decides which table
/// backs it; the engine only needs id resolution.
pub trait GasLookup {
    fn lookup_gas(&self, id: &str) -> Result<&GasSpec, UnknownGasError>;
}

impl GasLookup for GasTable {
    fn lookup_gas(&self, id: &str) -> Result<&GasSpec, UnknownGasError> {
        self.lookup(id)
    }
}

impl GasLookup for GasSpec {
    fn lookup_gas(&self, id: &str) -> Result<&GasSpec, UnknownGasError> {
        if self.id.eq_ignore_ascii_case(id.trim()) {
            Ok(self)
        } else {
            Err(UnknownGasError {
                id: id.trim().to_string(),
                known: vec![self.id.clone()],
            })
        }
    }
}
