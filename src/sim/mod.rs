/// Time-index alignment checks and calendar pre-steps.
pub mod align;
pub mod assembler;
pub mod engine;
/// Fleet scaling and sizing.
pub mod fleet;
pub mod kpi;
pub mod market;
pub mod scenario;
pub mod surplus;
pub mod types;
