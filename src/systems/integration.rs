//! Integration resources and the gravity system.

use crate::components::*;
use crate::config::SimConfig;
use bevy_ecs::prelude::*;

/// Resource holding the fixed step and solver iteration counts for the
/// current step.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct StepParams {
    pub dt: f32,
    pub velocity_iterations: u32,
    pub position_iterations: u32,
    pub particle_iterations: u32,
}

impl StepParams {
    pub fn new(dt: f32, velocity_iterations: u32, position_iterations: u32, particle_iterations: u32) -> Self {
        Self {
            dt,
            velocity_iterations,
            position_iterations,
            particle_iterations,
        }
    }

    pub fn from_config(config: &SimConfig) -> Self {
        Self::new(
            config.fixed_timestep,
            config.velocity_iterations,
            config.position_iterations,
            config.particle_iterations,
        )
    }
}

impl Default for StepParams {
    fn default() -> Self {
        Self::from_config(&SimConfig::default())
    }
}

/// World gravity in units per second squared.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct Gravity {
    pub x: f32,
    pub y: f32,
}

impl Gravity {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }
}

/// Number of completed steps in this world.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct StepCount(pub u64);

impl StepCount {
    pub fn increment(&mut self) {
        self.0 = self.0.wrapping_add(1);
    }
}

/// Applies gravity to every moving entity. Boundaries carry no `Velocity`
/// and are never affected.
pub fn gravity_system(
    params: Res<StepParams>,
    gravity: Res<Gravity>,
    mut query: Query<&mut Velocity, Without<Boundary>>,
) {
    if gravity.is_zero() {
        return;
    }
    let dx = gravity.x * params.dt;
    let dy = gravity.y * params.dt;
    for mut vel in query.iter_mut() {
        vel.vx += dx;
        vel.vy += dy;
    }
}
