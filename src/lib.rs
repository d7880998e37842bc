//! Particle Bridge - Simulation Core
//!
//! A deterministic, fixed-timestep bridge between host channel streams and a
//! 2D world of static boundaries, dynamic circles and particles.
//! Uses `bevy_ecs` for the entity-component-system architecture.

pub mod api;
pub mod channels;
pub mod components;
pub mod config;
pub mod error;
pub mod particles;
pub mod profiler;
pub mod spatial;
pub mod spawn;
pub mod systems;
pub mod world;

pub use api::{Pulse, TickController, TickInput, TickState, WallParams};
pub use channels::{ChannelBatch, InfoChannel, OutputChannels};
pub use components::*;
pub use config::{BoxLayout, SeedLayout, SimConfig, SimRate};
pub use error::SimError;
pub use particles::{ParticleBuffers, ParticleSystem, ParticleSystemDef};
pub use profiler::{PhaseProfiler, TickPhase};
pub use spatial::{SpatialEntry, SpatialGrid};
pub use spawn::{ingest_batch, IngestReport, SpawnRequest};
pub use systems::*;
pub use world::{BodySnapshot, BoundarySnapshot, ParticleSnapshot, PhysicsWorld, WorldSnapshot};
