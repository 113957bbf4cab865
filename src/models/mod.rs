pub mod unloading;
pub mod unloading_stage;
