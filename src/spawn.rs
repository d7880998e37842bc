//! Spawn batch ingestion.
//!
//! Each batch row becomes either a particle or a dynamic body. The choice is
//! an exact comparison of the size field against the configured sentinel:
//! `1.0` makes a particle that takes the shared system radius, any other value
//! (including `0.999999`) makes a body with that value as its radius.

use crate::channels::{ChannelBatch, IN_ID, IN_SIZE, IN_VX, IN_VY, IN_X, IN_Y, SPAWN_FIELDS, SPAWN_FIELD_NAMES};
use crate::components::{EntityId, ParticleColor, Position, Velocity};
use crate::error::SimError;
use crate::world::PhysicsWorld;
use tracing::{debug, warn};

/// Exclusive upper bound of identities representable as `i32`.
const IDENTITY_LIMIT: f32 = 2_147_483_648.0;

/// One validated spawn row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpawnRequest {
    Particle {
        id: EntityId,
        position: Position,
        velocity: Velocity,
    },
    Body {
        id: EntityId,
        position: Position,
        velocity: Velocity,
        radius: f32,
    },
}

impl SpawnRequest {
    /// Validate and classify row `row`.
    pub fn from_row(row: usize, fields: [f32; SPAWN_FIELDS], sentinel: f32) -> Result<Self, SimError> {
        for (field, &value) in fields.iter().enumerate() {
            if !value.is_finite() {
                return Err(SimError::NonFinite {
                    row,
                    field: SPAWN_FIELD_NAMES[field],
                    value,
                });
            }
        }

        let raw_id = fields[IN_ID];
        if !(-IDENTITY_LIMIT..IDENTITY_LIMIT).contains(&raw_id) {
            return Err(SimError::IdentityOutOfRange { row, value: raw_id });
        }
        let id = EntityId(raw_id as i32);
        let position = Position::new(fields[IN_X], fields[IN_Y]);
        let velocity = Velocity::new(fields[IN_VX], fields[IN_VY]);
        let size = fields[IN_SIZE];

        if size == sentinel {
            Ok(SpawnRequest::Particle { id, position, velocity })
        } else {
            Ok(SpawnRequest::Body {
                id,
                position,
                velocity,
                radius: size,
            })
        }
    }

    pub fn id(&self) -> EntityId {
        match self {
            SpawnRequest::Particle { id, .. } | SpawnRequest::Body { id, .. } => *id,
        }
    }

    pub fn is_particle(&self) -> bool {
        matches!(self, SpawnRequest::Particle { .. })
    }
}

/// Outcome of one ingestion pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestReport {
    /// Rows read from the batch.
    pub rows: usize,
    pub particles: usize,
    pub bodies: usize,
    /// Malformed rows skipped.
    pub rejected: usize,
    /// Valid particle rows refused because the system was full.
    pub dropped: usize,
}

impl IngestReport {
    pub fn created(&self) -> usize {
        self.particles + self.bodies
    }
}

/// Create one entity per valid row of `batch`.
///
/// Malformed rows are logged, counted and skipped; they never abort the
/// batch.
pub fn ingest_batch(world: &mut PhysicsWorld, batch: &ChannelBatch, sentinel: f32) -> IngestReport {
    let mut report = IngestReport {
        rows: batch.num_samples(),
        ..Default::default()
    };

    for row in 0..report.rows {
        let request = match batch
            .row(row)
            .and_then(|fields| SpawnRequest::from_row(row, fields, sentinel))
        {
            Ok(request) => request,
            Err(err) => {
                warn!(row, error = %err, "rejected spawn row");
                report.rejected += 1;
                continue;
            }
        };

        match request {
            SpawnRequest::Particle { id, position, velocity } => {
                match world.spawn_particle(id, position, velocity, ParticleColor::SPAWNED) {
                    Some(_) => report.particles += 1,
                    None => report.dropped += 1,
                }
            }
            SpawnRequest::Body {
                id,
                position,
                velocity,
                radius,
            } => {
                world.create_dynamic_entity(id, position, velocity, radius);
                report.bodies += 1;
            }
        }
    }

    debug!(
        rows = report.rows,
        particles = report.particles,
        bodies = report.bodies,
        rejected = report.rejected,
        dropped = report.dropped,
        "ingested spawn batch"
    );
    report
}
