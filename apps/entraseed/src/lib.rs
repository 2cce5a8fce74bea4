//! Synthetic Entra ID load-test data: generation, cleanup, and tag
//! listing.
//!
//! The binary in this crate drives [`entraseed_graph`] to seed a tenant
//! with tagged users, a nested group hierarchy, and random memberships,
//! and to remove it all again afterwards.

pub mod commands;
pub mod error;
pub mod hierarchy;
pub mod membership;
pub mod naming;
pub mod output;
pub mod tag;
