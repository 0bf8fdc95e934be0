pub mod constants;
pub mod gas;
