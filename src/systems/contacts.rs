//! Contact solving systems for dynamic bodies and particles.
//!
//! Both systems follow the same gather/solve/apply shape:
//!
//! 1. **Gather** - copy component data into flat `Disc` arrays in a fixed
//!    order (bodies by entity, particles by slot index).
//! 2. **Solve** - velocity iterations, position integration, then position
//!    iterations, all on the local arrays.
//! 3. **Apply** - write positions and velocities back to the components.
//!
//! Every loop runs in a fixed order so that identical inputs produce
//! bit-identical outputs.
//!
//! ## Parallel Feature
//!
//! When compiled with `--features parallel`, the particle candidate-pair
//! gather uses rayon. Pairs are collected in index order, so the result is
//! the same as the sequential path. Solving is always sequential.
//!
//! Particles collide with each other, with boundaries and with dynamic
//! bodies. Bodies collide with each other and with boundaries; particles do
//! not push bodies back.

use crate::components::*;
use crate::particles::ParticleSystem;
use crate::spatial::SpatialGrid;
use crate::systems::integration::StepParams;
use crate::systems::solver::*;
use bevy_ecs::prelude::*;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Gathered state of one dynamic body.
#[derive(Debug, Clone, Copy)]
struct BodyState {
    entity: Entity,
    disc: Disc,
    friction: f32,
    restitution: f32,
}

/// Static boxes in entity order.
fn collect_boxes(query: &Query<(Entity, &Position, &Boundary)>) -> Vec<Aabb> {
    let mut boxes: Vec<(Entity, Aabb)> = query
        .iter()
        .map(|(entity, pos, boundary)| {
            (
                entity,
                Aabb {
                    cx: pos.x,
                    cy: pos.y,
                    hx: boundary.half_width,
                    hy: boundary.half_height,
                },
            )
        })
        .collect();
    boxes.sort_by_key(|(entity, _)| *entity);
    boxes.into_iter().map(|(_, aabb)| aabb).collect()
}

// ============================================================================
// RIGID BODIES
// ============================================================================

/// Solves contacts between dynamic bodies and against boundaries, and
/// integrates body positions.
///
/// Massless bodies are pinned: their velocity is cleared on gather, so they
/// keep their position no matter what velocity they were created with.
pub fn body_solver_system(
    params: Res<StepParams>,
    boundaries: Query<(Entity, &Position, &Boundary)>,
    mut bodies: Query<(Entity, &mut Position, &mut Velocity, &DynamicBody), Without<Boundary>>,
) {
    let mut states: Vec<BodyState> = bodies
        .iter()
        .map(|(entity, pos, vel, body)| {
            let inv_mass = body.inverse_mass();
            let (vx, vy) = if inv_mass > 0.0 { (vel.vx, vel.vy) } else { (0.0, 0.0) };
            BodyState {
                entity,
                disc: Disc {
                    x: pos.x,
                    y: pos.y,
                    vx,
                    vy,
                    radius: body.radius,
                    inv_mass,
                },
                friction: body.friction,
                restitution: body.restitution,
            }
        })
        .collect();

    if states.is_empty() {
        return;
    }
    states.sort_by_key(|s| s.entity);

    let boxes = collect_boxes(&boundaries);

    for _ in 0..params.velocity_iterations {
        solve_body_velocities(&mut states, &boxes);
    }
    for state in states.iter_mut() {
        state.disc.integrate(params.dt);
    }
    for _ in 0..params.position_iterations {
        solve_body_positions(&mut states, &boxes);
    }

    for state in &states {
        if let Ok((_, mut pos, mut vel, _)) = bodies.get_mut(state.entity) {
            pos.x = state.disc.x;
            pos.y = state.disc.y;
            vel.vx = state.disc.vx;
            vel.vy = state.disc.vy;
        }
    }
}

/// Mixed friction of two bodies.
#[inline]
fn mix_friction(a: f32, b: f32) -> f32 {
    (a * b).sqrt()
}

fn solve_body_velocities(states: &mut [BodyState], boxes: &[Aabb]) {
    let n = states.len();
    for i in 0..n {
        {
            let state = &mut states[i];
            for aabb in boxes {
                if let Some(contact) = disc_box_contact(&state.disc, aabb) {
                    resolve_velocity_static(&mut state.disc, &contact, state.restitution, state.friction);
                }
            }
        }
        for j in (i + 1)..n {
            let (a, b) = pair_mut(states, i, j);
            if let Some(contact) = disc_disc_contact(&a.disc, &b.disc) {
                resolve_velocity(
                    &mut a.disc,
                    &mut b.disc,
                    &contact,
                    a.restitution.max(b.restitution),
                    mix_friction(a.friction, b.friction),
                );
            }
        }
    }
}

fn solve_body_positions(states: &mut [BodyState], boxes: &[Aabb]) {
    let n = states.len();
    for i in 0..n {
        {
            let state = &mut states[i];
            for aabb in boxes {
                if let Some(contact) = disc_box_contact(&state.disc, aabb) {
                    correct_position_static(&mut state.disc, &contact);
                }
            }
        }
        for j in (i + 1)..n {
            let (a, b) = pair_mut(states, i, j);
            if let Some(contact) = disc_disc_contact(&a.disc, &b.disc) {
                correct_position(&mut a.disc, &mut b.disc, &contact);
            }
        }
    }
}

// ============================================================================
// PARTICLES
// ============================================================================

/// Solves particle contacts (particle-particle, particle-boundary,
/// particle-body) and integrates particle positions.
///
/// Expects `SpatialGrid` to have been rebuilt from the current particle
/// positions earlier in the same step.
pub fn particle_solver_system(
    params: Res<StepParams>,
    system: Res<ParticleSystem>,
    grid: Res<SpatialGrid>,
    boundaries: Query<(Entity, &Position, &Boundary)>,
    bodies: Query<(Entity, &Position, &Velocity, &DynamicBody), Without<Particle>>,
    mut particles: Query<
        (&mut Position, &mut Velocity, &Particle),
        (Without<Boundary>, Without<DynamicBody>),
    >,
) {
    let radius = system.radius();
    let restitution = system.restitution();

    // GATHER: slot order defines the particle index.
    let mut entities = Vec::with_capacity(system.count());
    let mut discs = Vec::with_capacity(system.count());
    let mut elastic = Vec::with_capacity(system.count());
    for &entity in system.slots() {
        if let Ok((pos, vel, particle)) = particles.get(entity) {
            entities.push(entity);
            discs.push(Disc {
                x: pos.x,
                y: pos.y,
                vx: vel.vx,
                vy: vel.vy,
                radius,
                inv_mass: 1.0,
            });
            elastic.push(particle.is_elastic());
        }
    }

    if discs.is_empty() {
        return;
    }

    let max_speed = discs
        .iter()
        .map(|d| (d.vx * d.vx + d.vy * d.vy).sqrt())
        .fold(0.0_f32, f32::max);
    let reach = 2.0 * radius + 2.0 * max_speed * params.dt;
    let pairs = gather_candidate_pairs(&grid, &discs, reach);

    let boxes = collect_boxes(&boundaries);
    let mut obstacles: Vec<(Entity, Disc)> = bodies
        .iter()
        .map(|(entity, pos, vel, body)| {
            (
                entity,
                Disc {
                    x: pos.x,
                    y: pos.y,
                    vx: vel.vx,
                    vy: vel.vy,
                    radius: body.radius,
                    inv_mass: 0.0,
                },
            )
        })
        .collect();
    obstacles.sort_by_key(|(entity, _)| *entity);
    let obstacles: Vec<Disc> = obstacles.into_iter().map(|(_, disc)| disc).collect();

    let pair_restitution = |i: usize, j: usize| {
        if elastic[i] && elastic[j] {
            restitution
        } else {
            0.0
        }
    };

    // SOLVE: velocities
    for _ in 0..params.particle_iterations {
        for &(i, j) in &pairs {
            let e = pair_restitution(i, j);
            let (a, b) = pair_mut(&mut discs, i, j);
            if let Some(contact) = disc_disc_contact(a, b) {
                resolve_velocity(a, b, &contact, e, 0.0);
            }
        }
        for (i, disc) in discs.iter_mut().enumerate() {
            let e = if elastic[i] { restitution } else { 0.0 };
            for aabb in &boxes {
                if let Some(contact) = disc_box_contact(disc, aabb) {
                    resolve_velocity_static(disc, &contact, e, 0.0);
                }
            }
            for obstacle in &obstacles {
                let mut obstacle = *obstacle;
                if let Some(contact) = disc_disc_contact(disc, &obstacle) {
                    resolve_velocity(disc, &mut obstacle, &contact, e, 0.0);
                }
            }
        }
    }

    for disc in discs.iter_mut() {
        disc.integrate(params.dt);
    }

    // SOLVE: positions
    for _ in 0..params.particle_iterations {
        for &(i, j) in &pairs {
            let (a, b) = pair_mut(&mut discs, i, j);
            if let Some(contact) = disc_disc_contact(a, b) {
                correct_position(a, b, &contact);
            }
        }
        for disc in discs.iter_mut() {
            for aabb in &boxes {
                if let Some(contact) = disc_box_contact(disc, aabb) {
                    correct_position_static(disc, &contact);
                }
            }
            for obstacle in &obstacles {
                let mut obstacle = *obstacle;
                if let Some(contact) = disc_disc_contact(disc, &obstacle) {
                    correct_position(disc, &mut obstacle, &contact);
                }
            }
        }
    }

    // APPLY
    for (entity, disc) in entities.iter().zip(&discs) {
        if let Ok((mut pos, mut vel, _)) = particles.get_mut(*entity) {
            pos.x = disc.x;
            pos.y = disc.y;
            vel.vx = disc.vx;
            vel.vy = disc.vy;
        }
    }
}

/// Candidate pairs `(i, j)` with `i < j`, sorted by `i` then `j`.
fn gather_candidate_pairs(grid: &SpatialGrid, discs: &[Disc], reach: f32) -> Vec<(usize, usize)> {
    #[cfg(feature = "parallel")]
    let neighbors: Vec<Vec<usize>> = (0..discs.len())
        .into_par_iter()
        .map(|i| grid.query_higher_neighbors(i, discs[i].x, discs[i].y, reach))
        .collect();

    #[cfg(not(feature = "parallel"))]
    let neighbors: Vec<Vec<usize>> = (0..discs.len())
        .map(|i| grid.query_higher_neighbors(i, discs[i].x, discs[i].y, reach))
        .collect();

    neighbors
        .into_iter()
        .enumerate()
        .flat_map(|(i, js)| js.into_iter().map(move |j| (i, j)))
        .collect()
}
