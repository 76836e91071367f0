//! High-level commands for frontends.

pub mod deploy;

pub use deploy::{DeployCommand, DeployReport, DeployStage};
