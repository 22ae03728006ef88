//! Tick-based flocking and combat simulation for Flotilla.
//!
//! A [`Simulation`] owns a fixed population of entities split into teams.
//! Each call to [`Simulation::tick`] runs the spawn scheduler, the damage and
//! respawn pass, and the flocking and combat pass against a double-buffered
//! entity store, then publishes the result as an immutable [`Snapshot`] that
//! queries and presentation code read from.

/// Simulation clock for tracking ticks and elapsed time.
pub mod clock;
/// Configuration types for simulation runs.
pub mod config;
/// Mutable context passed to each pass during a tick.
pub mod context;
/// Damage aggregation and respawn pass.
pub mod damage;
/// Error types for the simulation crate.
pub mod error;
/// Simulation event types and the event log.
pub mod event;
/// Flocking, targeting, and weapon-fire pass.
pub mod flocking;
/// Player designation.
pub mod focus;
/// Thread-safe inbox for externally sourced damage and reset requests.
pub mod inbox;
/// Per-slot render state derived from published snapshots.
pub mod presentation;
/// Top-level simulation orchestrator.
pub mod simulation;
/// Read-only published entity state and its queries.
pub mod snapshot;
/// Rate-limited activation of inactive slots.
pub mod spawn;
/// Double-buffered entity arena.
pub mod store;
/// The trait that all simulation passes implement.
pub mod system;

/// Re-export of [`clock::SimClock`].
pub use clock::SimClock;
/// Re-exports of [`config::SimConfig`] and [`config::SteeringConfig`].
pub use config::{SimConfig, SteeringConfig};
/// Re-export of [`context::SimContext`].
pub use context::SimContext;
/// Re-exports of [`error::SimError`] and [`error::SimResult`].
pub use error::{SimError, SimResult};
/// Re-exports of [`event::EventLog`], [`event::SimEvent`], and [`event::SimEventKind`].
pub use event::{EventLog, SimEvent, SimEventKind};
/// Re-export of [`inbox::Inbox`].
pub use inbox::Inbox;
/// Re-exports of [`presentation::RenderBuffer`] and [`presentation::RenderState`].
pub use presentation::{RenderBuffer, RenderState};
/// Re-export of [`simulation::Simulation`].
pub use simulation::Simulation;
/// Re-export of [`snapshot::Snapshot`].
pub use snapshot::Snapshot;
/// Re-export of [`system::System`].
pub use system::System;

#[cfg(test)]
mod test_support;
