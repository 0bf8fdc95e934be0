pub mod derive;
pub mod reconcile;
pub mod serialization;

mod traits;

pub use derive::{InvalidResultError, derive, derive_checked, recompute};
pub use reconcile::{EditedField, reconcile};
pub use traits::GasLookup;
