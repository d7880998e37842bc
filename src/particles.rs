//! Particle system resource and read-back buffers.
//!
//! The particle system is a world resource rather than an entity: there is
//! exactly one per world, and it owns the properties every particle shares
//! (radius, restitution, capacity). Its slot list fixes the particle index
//! order used by the solver and by the host output.

use crate::config::SimConfig;
use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

/// Construction parameters for a particle system.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParticleSystemDef {
    pub radius: f32,
    pub restitution: f32,
    /// 0 = unlimited.
    pub max_count: usize,
}

impl ParticleSystemDef {
    pub fn from_config(config: &SimConfig) -> Self {
        Self {
            radius: config.particle_radius,
            restitution: config.particle_restitution,
            max_count: config.max_particles as usize,
        }
    }
}

impl Default for ParticleSystemDef {
    fn default() -> Self {
        Self::from_config(&SimConfig::default())
    }
}

/// The world's particle system.
#[derive(Resource, Debug, Clone)]
pub struct ParticleSystem {
    def: ParticleSystemDef,
    /// Particle entities in creation order. Index = particle index.
    slots: Vec<Entity>,
}

impl ParticleSystem {
    pub fn new(def: ParticleSystemDef) -> Self {
        Self {
            def,
            slots: Vec::new(),
        }
    }

    pub fn def(&self) -> &ParticleSystemDef {
        &self.def
    }

    pub fn radius(&self) -> f32 {
        self.def.radius
    }

    pub fn restitution(&self) -> f32 {
        self.def.restitution
    }

    pub fn count(&self) -> usize {
        self.slots.len()
    }

    pub fn is_full(&self) -> bool {
        self.def.max_count != 0 && self.slots.len() >= self.def.max_count
    }

    pub fn slots(&self) -> &[Entity] {
        &self.slots
    }

    /// Append a particle entity, returning its index.
    pub(crate) fn push(&mut self, entity: Entity) -> usize {
        self.slots.push(entity);
        self.slots.len() - 1
    }
}

/// Parallel per-particle buffers, all indexed by the same particle index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParticleBuffers {
    pub ids: Vec<i32>,
    pub positions: Vec<(f32, f32)>,
    pub velocities: Vec<(f32, f32)>,
    /// Radius shared by the whole system.
    pub radius: f32,
}

impl ParticleBuffers {
    pub fn with_capacity(capacity: usize, radius: f32) -> Self {
        Self {
            ids: Vec::with_capacity(capacity),
            positions: Vec::with_capacity(capacity),
            velocities: Vec::with_capacity(capacity),
            radius,
        }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub(crate) fn push(&mut self, id: i32, position: (f32, f32), velocity: (f32, f32)) {
        self.ids.push(id);
        self.positions.push(position);
        self.velocities.push(velocity);
    }
}
