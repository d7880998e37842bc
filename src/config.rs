//! Simulation configuration.
//!
//! Every constant the bridge uses lives in `SimConfig`. The defaults reproduce
//! the stock scene: a zero-gravity box with a ground slab, two side walls, a
//! ceiling and ten seed particles.

use crate::error::SimError;
use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

/// Preset tick rates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimRate {
    Slow30Hz,
    Normal60Hz,
    Fast120Hz,
}

impl SimRate {
    pub fn hz(self) -> f32 {
        match self {
            SimRate::Slow30Hz => 30.0,
            SimRate::Normal60Hz => 60.0,
            SimRate::Fast120Hz => 120.0,
        }
    }

    pub fn timestep(self) -> f32 {
        1.0 / self.hz()
    }
}

/// Center and half-extents of a static box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoxLayout {
    pub position: (f32, f32),
    pub half_extents: (f32, f32),
}

impl BoxLayout {
    pub const fn new(x: f32, y: f32, half_width: f32, half_height: f32) -> Self {
        Self {
            position: (x, y),
            half_extents: (half_width, half_height),
        }
    }
}

/// Grid layout of the initial particle batch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeedLayout {
    /// Number of particles; identities run `0..count`.
    pub count: u32,
    pub columns: u32,
    pub spacing: f32,
    /// Position of particle 0.
    pub origin: (f32, f32),
    /// Per-index x offset so no two particles sit on exact lattice points.
    pub jitter: f32,
}

impl SeedLayout {
    /// Position of seed particle `index`.
    pub fn position(&self, index: u32) -> (f32, f32) {
        let columns = self.columns.max(1);
        let col = (index % columns) as f32;
        let row = (index / columns) as f32;
        (
            self.origin.0 + col * self.spacing + index as f32 * self.jitter,
            self.origin.1 + row * self.spacing,
        )
    }
}

impl Default for SeedLayout {
    fn default() -> Self {
        Self {
            count: 10,
            columns: 10,
            spacing: 2.0,
            origin: (-10.0, 5.0),
            jitter: 0.001,
        }
    }
}

/// Configuration for the world, the solver and the tick controller.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Fixed timestep in seconds. Never derived from wall-clock time.
    pub fixed_timestep: f32,
    pub velocity_iterations: u32,
    pub position_iterations: u32,
    pub particle_iterations: u32,
    pub gravity: (f32, f32),
    /// Radius shared by every particle.
    pub particle_radius: f32,
    pub particle_restitution: f32,
    /// Particle capacity, 0 = unlimited.
    pub max_particles: u32,
    pub body_density: f32,
    pub body_friction: f32,
    pub body_restitution: f32,
    /// Spawn size meaning "particle with the system radius".
    pub default_size_sentinel: f32,
    pub ground: BoxLayout,
    pub left_wall: BoxLayout,
    pub right_wall: BoxLayout,
    pub top_wall: BoxLayout,
    pub seed: SeedLayout,
    /// Walls follow the host parameters once the execute count exceeds this.
    pub wall_sync_after: u64,
    /// Rate reported to the host for the output channels.
    pub output_sample_rate: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            fixed_timestep: 1.0 / 60.0, // 60 Hz
            velocity_iterations: 6,
            position_iterations: 2,
            particle_iterations: 2,
            gravity: (0.0, 0.0),
            particle_radius: 1.0,
            particle_restitution: 0.5,
            max_particles: 0,
            body_density: 1.0,
            body_friction: 0.2,
            body_restitution: 0.0,
            default_size_sentinel: 1.0,
            ground: BoxLayout::new(0.0, -10.0, 200.0, 10.0),
            left_wall: BoxLayout::new(-50.0, 0.0, 10.0, 200.0),
            right_wall: BoxLayout::new(50.0, 0.0, 10.0, 200.0),
            top_wall: BoxLayout::new(0.0, 50.0, 200.0, 10.0),
            seed: SeedLayout::default(),
            wall_sync_after: 2,
            output_sample_rate: 60.0,
        }
    }
}

impl SimConfig {
    /// Default configuration ticking at a preset rate.
    pub fn with_rate(rate: SimRate) -> Self {
        Self {
            fixed_timestep: rate.timestep(),
            output_sample_rate: rate.hz(),
            ..Default::default()
        }
    }

    /// Parse a JSON document; missing keys fall back to the defaults.
    pub fn from_json_str(data: &str) -> Result<Self, SimError> {
        let config: SimConfig = serde_json::from_str(data)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn validate(&self) -> Result<(), SimError> {
        if !(self.fixed_timestep.is_finite() && self.fixed_timestep > 0.0) {
            return Err(SimError::InvalidConfig(format!(
                "fixed_timestep must be positive, got {}",
                self.fixed_timestep
            )));
        }
        if !(self.particle_radius.is_finite() && self.particle_radius > 0.0) {
            return Err(SimError::InvalidConfig(format!(
                "particle_radius must be positive, got {}",
                self.particle_radius
            )));
        }
        if !self.default_size_sentinel.is_finite() {
            return Err(SimError::InvalidConfig(
                "default_size_sentinel must be finite".to_string(),
            ));
        }
        if self.seed.columns == 0 {
            return Err(SimError::InvalidConfig(
                "seed.columns must be at least 1".to_string(),
            ));
        }
        if self.max_particles != 0 && self.seed.count > self.max_particles {
            return Err(SimError::InvalidConfig(format!(
                "seed.count ({}) exceeds max_particles ({})",
                self.seed.count, self.max_particles
            )));
        }
        Ok(())
    }
}
