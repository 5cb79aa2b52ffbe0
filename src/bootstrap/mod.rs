//! Dependency-ordered startup
//!
//! The sequencer connects every backing subsystem in a fixed order before
//! the HTTP listener is bound. Mandatory subsystems abort startup on
//! failure; optional ones degrade.

/// Bootstrap sequencer
pub mod sequencer;
/// Subsystem contract
pub mod subsystem;

pub use sequencer::{BootstrapOutcome, BootstrapSequencer};
pub use subsystem::{Criticality, Status, Subsystem};
