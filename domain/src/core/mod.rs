//! Core domain concepts shared across all subdomains.
//!
//! - [`id::PartitionId`] / [`id::ParticipantId`]: world and player identifiers
//! - [`error::DomainError`]: domain-level errors

pub mod error;
pub mod id;
