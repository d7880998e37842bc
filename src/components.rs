//! ECS Components for the particle bridge.
//!
//! Components are pure data containers attached to entities.
//! All physics lives in systems that query these components.

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

// ============================================================================
// SPATIAL COMPONENTS
// ============================================================================

/// 2D position in world units (y up).
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Position) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// 2D velocity vector in world units per second.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Velocity {
    pub vx: f32,
    pub vy: f32,
}

impl Velocity {
    pub fn new(vx: f32, vy: f32) -> Self {
        Self { vx, vy }
    }
}

// ============================================================================
// IDENTITY COMPONENTS
// ============================================================================

/// External identity supplied by the host, carried verbatim to the output.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityId(pub i32);

/// Role of a static boundary box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BoundaryKind {
    Ground,
    LeftWall,
    RightWall,
    TopWall,
    Custom,
}

// ============================================================================
// BODY COMPONENTS
// ============================================================================

/// Static axis-aligned box. Size is fixed at creation; only the
/// `Position` of a boundary is ever moved.
#[derive(Component, Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Boundary {
    pub kind: BoundaryKind,
    pub half_width: f32,
    pub half_height: f32,
}

impl Boundary {
    pub fn new(kind: BoundaryKind, half_width: f32, half_height: f32) -> Self {
        Self {
            kind,
            half_width,
            half_height,
        }
    }

    pub fn half_extents(&self) -> (f32, f32) {
        (self.half_width, self.half_height)
    }
}

/// Dynamic circular rigid body.
#[derive(Component, Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DynamicBody {
    pub radius: f32,
    pub density: f32,
    pub friction: f32,
    pub restitution: f32,
}

impl DynamicBody {
    pub fn mass(&self) -> f32 {
        self.density * std::f32::consts::PI * self.radius * self.radius
    }

    /// Zero for massless bodies, which the solver then treats as immovable.
    pub fn inverse_mass(&self) -> f32 {
        let mass = self.mass();
        if mass > f32::EPSILON {
            1.0 / mass
        } else {
            0.0
        }
    }
}

// ============================================================================
// PARTICLE COMPONENTS
// ============================================================================

/// Particle behaviour flags (bit layout follows the usual particle-engine
/// convention; only `ELASTIC` changes solver behaviour here).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParticleFlags(pub u32);

impl ParticleFlags {
    pub const WATER: ParticleFlags = ParticleFlags(0);
    pub const ELASTIC: ParticleFlags = ParticleFlags(1 << 4);

    pub fn contains(self, other: ParticleFlags) -> bool {
        self.0 & other.0 == other.0
    }
}

/// RGBA tag used by renderers. Never part of the numeric output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParticleColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl ParticleColor {
    /// Colour of the initial seed batch.
    pub const SEED: ParticleColor = ParticleColor::rgba(0, 0, 255, 255);
    /// Colour of particles created from host spawn rows.
    pub const SPAWNED: ParticleColor = ParticleColor::rgba(255, 140, 0, 255);

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

/// Marks an entity as a member of the particle system.
#[derive(Component, Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Particle {
    pub flags: ParticleFlags,
    pub color: ParticleColor,
}

impl Particle {
    pub fn elastic(color: ParticleColor) -> Self {
        Self {
            flags: ParticleFlags::ELASTIC,
            color,
        }
    }

    pub fn is_elastic(&self) -> bool {
        self.flags.contains(ParticleFlags::ELASTIC)
    }
}

// ============================================================================
// BUNDLES
// ============================================================================

/// Bundle for spawning a static boundary.
#[derive(Bundle)]
pub struct BoundaryBundle {
    pub position: Position,
    pub boundary: Boundary,
}

/// Bundle for spawning a dynamic circle.
#[derive(Bundle)]
pub struct DynamicBodyBundle {
    pub id: EntityId,
    pub position: Position,
    pub velocity: Velocity,
    pub body: DynamicBody,
}

/// Bundle for spawning a particle.
#[derive(Bundle)]
pub struct ParticleBundle {
    pub id: EntityId,
    pub position: Position,
    pub velocity: Velocity,
    pub particle: Particle,
}
