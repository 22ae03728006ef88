//! Core types for Flotilla: entity records, teams, and the steering math
//! shared by the simulation passes.
//!
//! This crate holds plain data and pure functions. It knows nothing about
//! ticks, buffers, or events; those live in `flotilla-sim`.

/// Entity records, identifiers, and base stats.
pub mod entity;
/// Error types used throughout the crate.
pub mod error;
/// Vector helpers for turn-limited steering.
pub mod kinematics;
/// Team configuration and spawn points.
pub mod team;

/// Re-export core entity types.
pub use entity::{Entity, EntityId, EntityStats, TeamId};
/// Re-export error types.
pub use error::{CoreError, CoreResult};
/// Re-export team types.
pub use team::{SpawnPoint, TeamConfig, TeamRoster};

/// Re-export of the vector type used for all kinematic state.
pub use glam::Vec3;
