//! CSV plumbing between external collaborators and the simulation core.

pub mod export;
pub mod import;
