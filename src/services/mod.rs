// Unloading reconciliation
pub mod unloading;
