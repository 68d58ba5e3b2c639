//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod clock;
pub mod eligibility;
pub mod notifier;
pub mod partition_registry;
pub mod scheduler;
pub mod settings;
