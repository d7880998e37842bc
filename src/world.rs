//! Physics world container and snapshot types.
//!
//! `PhysicsWorld` owns the ECS world, its step schedule and the bookkeeping
//! needed to find boundaries and bodies again. It exposes the creation
//! primitives the tick controller needs, the fixed-step advance, particle
//! read-back, and wholesale reset.
//!
//! The `*Snapshot` types are serializable views for debugging and for hosts
//! that prefer JSON over channel data.

use crate::components::*;
use crate::config::SimConfig;
use crate::particles::{ParticleBuffers, ParticleSystem, ParticleSystemDef};
use crate::spatial::{spatial_grid_update_system, SpatialGrid};
use crate::systems::*;
use bevy_ecs::prelude::*;
use bevy_ecs::schedule::ExecutorKind;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Snapshot of one particle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticleSnapshot {
    pub index: usize,
    pub id: i32,
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub color: ParticleColor,
}

/// Snapshot of one dynamic body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodySnapshot {
    pub id: i32,
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub radius: f32,
}

/// Snapshot of one static boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundarySnapshot {
    pub kind: BoundaryKind,
    pub x: f32,
    pub y: f32,
    pub half_width: f32,
    pub half_height: f32,
}

/// Complete world state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    /// Completed steps since construction or the last reset.
    pub step: u64,
    /// Simulated time in seconds.
    pub time: f64,
    pub particle_radius: f32,
    /// Particles in index order.
    pub particles: Vec<ParticleSnapshot>,
    /// Dynamic bodies in creation order.
    pub bodies: Vec<BodySnapshot>,
    pub boundaries: Vec<BoundarySnapshot>,
}

impl WorldSnapshot {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(data: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(data)
    }
}

/// The physics world: boundaries, dynamic bodies and one particle system.
pub struct PhysicsWorld {
    world: World,
    schedule: Schedule,
    config: SimConfig,
    /// Boundaries in creation order, tagged with their role.
    boundaries: Vec<(BoundaryKind, Entity)>,
    /// Dynamic bodies in creation order.
    bodies: Vec<Entity>,
    time: f64,
}

impl PhysicsWorld {
    /// Create an empty world: no boundaries, no bodies, an empty particle
    /// system.
    pub fn new(config: &SimConfig) -> Self {
        let (world, schedule) = Self::build(config);
        Self {
            world,
            schedule,
            config: config.clone(),
            boundaries: Vec::new(),
            bodies: Vec::new(),
            time: 0.0,
        }
    }

    fn build(config: &SimConfig) -> (World, Schedule) {
        let mut world = World::new();
        world.insert_resource(StepParams::from_config(config));
        world.insert_resource(Gravity::new(config.gravity.0, config.gravity.1));
        world.insert_resource(StepCount::default());
        world.insert_resource(ParticleSystem::new(ParticleSystemDef::from_config(config)));
        // Two diameters per cell keeps neighbor queries to a 3x3 block.
        world.insert_resource(SpatialGrid::new(config.particle_radius * 4.0));

        let mut schedule = Schedule::default();
        schedule.set_executor_kind(ExecutorKind::SingleThreaded);
        schedule.add_systems(
            (
                gravity_system,
                body_solver_system,
                spatial_grid_update_system,
                particle_solver_system,
            )
                .chain(),
        );

        (world, schedule)
    }

    // ========================================================================
    // CONSTRUCTION
    // ========================================================================

    /// Create the ground slab from the configured layout.
    ///
    /// Not guarded: calling twice creates two ground boundaries.
    pub fn create_ground_plane(&mut self) -> Entity {
        let layout = self.config.ground;
        self.create_static_boundary(
            BoundaryKind::Ground,
            Position::new(layout.position.0, layout.position.1),
            layout.half_extents,
        )
    }

    /// Create a static box at `position` with the given half-extents.
    pub fn create_static_boundary(
        &mut self,
        kind: BoundaryKind,
        position: Position,
        half_extents: (f32, f32),
    ) -> Entity {
        let entity = self
            .world
            .spawn(BoundaryBundle {
                position,
                boundary: Boundary::new(kind, half_extents.0, half_extents.1),
            })
            .id();
        self.boundaries.push((kind, entity));
        debug!(?kind, x = position.x, y = position.y, "created boundary");
        entity
    }

    /// Create a dynamic circle tagged with `id`.
    ///
    /// The radius is taken as a magnitude; a zero radius gives a massless
    /// body that the solver never moves.
    pub fn create_dynamic_entity(
        &mut self,
        id: EntityId,
        position: Position,
        velocity: Velocity,
        radius: f32,
    ) -> Entity {
        let body = DynamicBody {
            radius: radius.abs(),
            density: self.config.body_density,
            friction: self.config.body_friction,
            restitution: self.config.body_restitution,
        };
        let entity = self
            .world
            .spawn(DynamicBodyBundle {
                id,
                position,
                velocity,
                body,
            })
            .id();
        self.bodies.push(entity);
        entity
    }

    /// Create a particle tagged with `id`, returning its particle index, or
    /// `None` when the particle system is at capacity.
    pub fn spawn_particle(
        &mut self,
        id: EntityId,
        position: Position,
        velocity: Velocity,
        color: ParticleColor,
    ) -> Option<usize> {
        if self.world.resource::<ParticleSystem>().is_full() {
            warn!(id = id.0, "particle system full, particle not created");
            return None;
        }

        let entity = self
            .world
            .spawn(ParticleBundle {
                id,
                position,
                velocity,
                particle: Particle::elastic(color),
            })
            .id();
        Some(self.world.resource_mut::<ParticleSystem>().push(entity))
    }

    // ========================================================================
    // SIMULATION
    // ========================================================================

    /// Advance by exactly one fixed step.
    pub fn step(&mut self, params: StepParams) {
        self.world.insert_resource(params);
        self.schedule.run(&mut self.world);
        self.world.resource_mut::<StepCount>().increment();
        self.time += f64::from(params.dt);
    }

    /// Discard every boundary, body and particle. The world is left as if
    /// freshly constructed.
    pub fn reset(&mut self) {
        let (world, schedule) = Self::build(&self.config);
        self.world = world;
        self.schedule = schedule;
        self.boundaries.clear();
        self.bodies.clear();
        self.time = 0.0;
        info!("physics world reset");
    }

    // ========================================================================
    // MUTATION
    // ========================================================================

    /// Move the first boundary with role `kind`. Size is unchanged.
    /// Returns `false` when no such boundary exists.
    pub fn set_boundary_position(&mut self, kind: BoundaryKind, position: Position) -> bool {
        let Some(entity) = self.boundary_entity(kind) else {
            return false;
        };
        match self.world.get_mut::<Position>(entity) {
            Some(mut pos) => {
                *pos = position;
                true
            }
            None => false,
        }
    }

    // ========================================================================
    // QUERIES
    // ========================================================================

    pub fn particle_count(&self) -> usize {
        self.world.resource::<ParticleSystem>().count()
    }

    pub fn particle_radius(&self) -> f32 {
        self.world.resource::<ParticleSystem>().radius()
    }

    /// Identity, position and velocity of every particle in index order,
    /// plus the shared radius.
    pub fn read_particle_buffers(&self) -> ParticleBuffers {
        let system = self.world.resource::<ParticleSystem>();
        let mut buffers = ParticleBuffers::with_capacity(system.count(), system.radius());
        for &entity in system.slots() {
            let (Some(id), Some(pos), Some(vel)) = (
                self.world.get::<EntityId>(entity),
                self.world.get::<Position>(entity),
                self.world.get::<Velocity>(entity),
            ) else {
                continue;
            };
            buffers.push(id.0, (pos.x, pos.y), (vel.vx, vel.vy));
        }
        buffers
    }

    /// Snapshot of the particle at `index`.
    pub fn particle(&self, index: usize) -> Option<ParticleSnapshot> {
        let entity = *self.world.resource::<ParticleSystem>().slots().get(index)?;
        self.particle_snapshot(index, entity)
    }

    /// Neighbor grid as rebuilt by the last step.
    pub fn spatial_grid(&self) -> &SpatialGrid {
        self.world.resource::<SpatialGrid>()
    }

    fn particle_snapshot(&self, index: usize, entity: Entity) -> Option<ParticleSnapshot> {
        let id = self.world.get::<EntityId>(entity)?;
        let pos = self.world.get::<Position>(entity)?;
        let vel = self.world.get::<Velocity>(entity)?;
        let particle = self.world.get::<Particle>(entity)?;
        Some(ParticleSnapshot {
            index,
            id: id.0,
            x: pos.x,
            y: pos.y,
            vx: vel.vx,
            vy: vel.vy,
            color: particle.color,
        })
    }

    pub fn dynamic_body_count(&self) -> usize {
        self.bodies.len()
    }

    /// All dynamic bodies in creation order.
    pub fn dynamic_bodies(&self) -> Vec<BodySnapshot> {
        self.bodies
            .iter()
            .filter_map(|&entity| self.body_snapshot(entity))
            .collect()
    }

    /// First dynamic body carrying identity `id`.
    pub fn find_dynamic_body(&self, id: EntityId) -> Option<BodySnapshot> {
        self.bodies
            .iter()
            .find(|&&entity| self.world.get::<EntityId>(entity) == Some(&id))
            .and_then(|&entity| self.body_snapshot(entity))
    }

    fn body_snapshot(&self, entity: Entity) -> Option<BodySnapshot> {
        let id = self.world.get::<EntityId>(entity)?;
        let pos = self.world.get::<Position>(entity)?;
        let vel = self.world.get::<Velocity>(entity)?;
        let body = self.world.get::<DynamicBody>(entity)?;
        Some(BodySnapshot {
            id: id.0,
            x: pos.x,
            y: pos.y,
            vx: vel.vx,
            vy: vel.vy,
            radius: body.radius,
        })
    }

    fn boundary_entity(&self, kind: BoundaryKind) -> Option<Entity> {
        self.boundaries
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, entity)| *entity)
    }

    pub fn boundary_count(&self) -> usize {
        self.boundaries.len()
    }

    /// First boundary with role `kind`.
    pub fn boundary(&self, kind: BoundaryKind) -> Option<BoundarySnapshot> {
        self.boundary_entity(kind)
            .and_then(|entity| self.boundary_snapshot(entity))
    }

    /// All boundaries in creation order.
    pub fn boundaries(&self) -> Vec<BoundarySnapshot> {
        self.boundaries
            .iter()
            .filter_map(|&(_, entity)| self.boundary_snapshot(entity))
            .collect()
    }

    fn boundary_snapshot(&self, entity: Entity) -> Option<BoundarySnapshot> {
        let pos = self.world.get::<Position>(entity)?;
        let boundary = self.world.get::<Boundary>(entity)?;
        Some(BoundarySnapshot {
            kind: boundary.kind,
            x: pos.x,
            y: pos.y,
            half_width: boundary.half_width,
            half_height: boundary.half_height,
        })
    }

    /// Completed steps since construction or the last reset.
    pub fn current_step(&self) -> u64 {
        self.world.resource::<StepCount>().0
    }

    /// Simulated seconds since construction or the last reset.
    pub fn current_time(&self) -> f64 {
        self.time
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Full state snapshot.
    pub fn snapshot(&self) -> WorldSnapshot {
        let particles = self
            .world
            .resource::<ParticleSystem>()
            .slots()
            .iter()
            .enumerate()
            .filter_map(|(index, &entity)| self.particle_snapshot(index, entity))
            .collect();

        WorldSnapshot {
            step: self.current_step(),
            time: self.time,
            particle_radius: self.particle_radius(),
            particles,
            bodies: self.dynamic_bodies(),
            boundaries: self.boundaries(),
        }
    }

    /// Direct access to the ECS world (for advanced usage).
    pub fn world(&self) -> &World {
        &self.world
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spawn_row(world: &mut PhysicsWorld, n: i32) {
        for i in 0..n {
            world.spawn_particle(
                EntityId(i),
                Position::new(i as f32 * 2.5, 5.0),
                Velocity::new(0.0, -1.0),
                ParticleColor::SEED,
            );
        }
    }

    #[test]
    fn test_new_world_is_empty() {
        let world = PhysicsWorld::new(&SimConfig::default());
        assert_eq!(world.particle_count(), 0);
        assert_eq!(world.boundary_count(), 0);
        assert_eq!(world.dynamic_body_count(), 0);
        assert_eq!(world.current_step(), 0);
        assert!(world.read_particle_buffers().is_empty());
    }

    #[test]
    fn test_ground_plane_is_not_deduplicated() {
        let mut world = PhysicsWorld::new(&SimConfig::default());
        world.create_ground_plane();
        world.create_ground_plane();
        assert_eq!(world.boundary_count(), 2);

        let ground = world.boundary(BoundaryKind::Ground).unwrap();
        assert_eq!((ground.x, ground.y), (0.0, -10.0));
        assert_eq!((ground.half_width, ground.half_height), (200.0, 10.0));
    }

    #[test]
    fn test_particle_buffers_in_index_order() {
        let mut world = PhysicsWorld::new(&SimConfig::default());
        spawn_row(&mut world, 4);

        let buffers = world.read_particle_buffers();
        assert_eq!(buffers.len(), 4);
        assert_eq!(buffers.ids, vec![0, 1, 2, 3]);
        assert_eq!(buffers.positions[2], (5.0, 5.0));
        assert_eq!(buffers.velocities[3], (0.0, -1.0));
        assert_eq!(buffers.radius, 1.0);
    }

    #[test]
    fn test_particle_capacity_refuses_extra() {
        let config = SimConfig {
            max_particles: 2,
            ..Default::default()
        };
        let mut world = PhysicsWorld::new(&config);
        let id = EntityId(1);
        assert_eq!(world.spawn_particle(id, Position::default(), Velocity::default(), ParticleColor::SEED), Some(0));
        assert_eq!(world.spawn_particle(id, Position::new(3.0, 0.0), Velocity::default(), ParticleColor::SEED), Some(1));
        assert_eq!(world.spawn_particle(id, Position::new(6.0, 0.0), Velocity::default(), ParticleColor::SEED), None);
        assert_eq!(world.particle_count(), 2);
    }

    #[test]
    fn test_dynamic_body_lookup() {
        let mut world = PhysicsWorld::new(&SimConfig::default());
        world.create_dynamic_entity(EntityId(42), Position::new(1.0, 2.0), Velocity::new(3.0, 0.0), 2.5);
        world.create_dynamic_entity(EntityId(7), Position::new(10.0, 2.0), Velocity::default(), -0.5);

        assert_eq!(world.dynamic_body_count(), 2);
        assert_eq!(world.particle_count(), 0);

        let body = world.find_dynamic_body(EntityId(42)).unwrap();
        assert_eq!((body.x, body.y, body.vx, body.radius), (1.0, 2.0, 3.0, 2.5));

        let body = world.find_dynamic_body(EntityId(7)).unwrap();
        assert_eq!(body.radius, 0.5);

        assert!(world.find_dynamic_body(EntityId(99)).is_none());
        assert_eq!(world.dynamic_bodies().len(), 2);
    }

    #[test]
    fn test_massless_body_never_moves() {
        for gravity in [(0.0, 0.0), (0.0, -10.0)] {
            let config = SimConfig {
                gravity,
                ..SimConfig::default()
            };
            let mut world = PhysicsWorld::new(&config);
            world.create_dynamic_entity(EntityId(1), Position::new(0.0, 0.0), Velocity::new(6.0, 0.0), 0.0);

            for _ in 0..60 {
                world.step(StepParams::default());
            }

            let body = world.find_dynamic_body(EntityId(1)).unwrap();
            assert_eq!((body.x, body.y), (0.0, 0.0));
            assert_eq!((body.vx, body.vy), (0.0, 0.0));
        }
    }

    #[test]
    fn test_set_boundary_position_keeps_size() {
        let mut world = PhysicsWorld::new(&SimConfig::default());
        world.create_static_boundary(BoundaryKind::LeftWall, Position::new(-50.0, 0.0), (10.0, 200.0));

        assert!(world.set_boundary_position(BoundaryKind::LeftWall, Position::new(-20.0, 3.0)));
        let wall = world.boundary(BoundaryKind::LeftWall).unwrap();
        assert_eq!((wall.x, wall.y), (-20.0, 3.0));
        assert_eq!((wall.half_width, wall.half_height), (10.0, 200.0));

        assert!(!world.set_boundary_position(BoundaryKind::RightWall, Position::new(0.0, 0.0)));
    }

    #[test]
    fn test_step_advances_counters() {
        let mut world = PhysicsWorld::new(&SimConfig::default());
        spawn_row(&mut world, 2);
        world.step(StepParams::default());
        world.step(StepParams::default());
        assert_eq!(world.current_step(), 2);
        assert!((world.current_time() - 2.0 / 60.0).abs() < 1e-6);

        let p = world.particle(0).unwrap();
        assert!(p.y < 5.0);
    }

    #[test]
    fn test_reset_discards_everything() {
        let mut world = PhysicsWorld::new(&SimConfig::default());
        world.create_ground_plane();
        world.create_dynamic_entity(EntityId(3), Position::new(0.0, 5.0), Velocity::default(), 2.0);
        spawn_row(&mut world, 3);
        world.step(StepParams::default());

        world.reset();

        assert_eq!(world.particle_count(), 0);
        assert_eq!(world.boundary_count(), 0);
        assert_eq!(world.dynamic_body_count(), 0);
        assert!(world.find_dynamic_body(EntityId(3)).is_none());
        assert_eq!(world.current_step(), 0);
        assert_eq!(world.current_time(), 0.0);

        // Usable again after reset.
        world.create_ground_plane();
        spawn_row(&mut world, 1);
        world.step(StepParams::default());
        assert_eq!(world.particle_count(), 1);
    }

    #[test]
    fn test_step_is_deterministic() {
        let config = SimConfig {
            gravity: (0.0, -10.0),
            ..Default::default()
        };

        let run = || {
            let mut world = PhysicsWorld::new(&config);
            world.create_ground_plane();
            world.create_dynamic_entity(EntityId(100), Position::new(0.5, 12.0), Velocity::new(0.0, -2.0), 1.5);
            for i in 0..30 {
                world.spawn_particle(
                    EntityId(i),
                    Position::new((i % 6) as f32 * 1.9 - 5.0, (i / 6) as f32 * 1.9 + 1.0),
                    Velocity::new(0.3, 0.0),
                    ParticleColor::SEED,
                );
            }
            for _ in 0..120 {
                world.step(StepParams::from_config(&config));
            }
            (world.read_particle_buffers(), world.dynamic_bodies())
        };

        let (buffers_a, bodies_a) = run();
        let (buffers_b, bodies_b) = run();
        assert_eq!(buffers_a, buffers_b);
        assert_eq!(bodies_a, bodies_b);
    }

    #[test]
    fn test_snapshot_json_roundtrip() {
        let mut world = PhysicsWorld::new(&SimConfig::default());
        world.create_ground_plane();
        world.create_dynamic_entity(EntityId(5), Position::new(0.0, 5.0), Velocity::default(), 2.0);
        spawn_row(&mut world, 2);

        let snapshot = world.snapshot();
        assert_eq!(snapshot.particles.len(), 2);
        assert_eq!(snapshot.bodies.len(), 1);
        assert_eq!(snapshot.boundaries[0].kind, BoundaryKind::Ground);

        let json = snapshot.to_json().unwrap();
        let restored = WorldSnapshot::from_json(&json).unwrap();
        assert_eq!(restored, snapshot);
    }
}
