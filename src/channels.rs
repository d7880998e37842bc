//! Channel marshalling between the host and the physics world.
//!
//! Hosts deliver and accept data as parallel `f32` channels: one array per
//! field, one sample per row. This module defines both directions.
//!
//! # Input layout
//!
//! A spawn batch has six required channels, in order:
//!
//! ```text
//! [0] id    - identity tag (truncated to i32)
//! [1] tx    - X position
//! [2] ty    - Y position
//! [3] vx    - X velocity
//! [4] vy    - Y velocity
//! [5] size  - 1.0 = particle, anything else = body radius
//! ```
//!
//! Extra channels are ignored. The sample count is the longest channel.
//!
//! # Output layout
//!
//! Seven channels, one sample per live particle in index order:
//!
//! ```text
//! [0] id      - identity tag
//! [1] tx      - X position
//! [2] ty      - Y position
//! [3] vx      - X velocity
//! [4] vy      - Y velocity
//! [5] radius  - shared particle radius
//! [6] count   - live particle count (same in every row)
//! ```
//!
//! With zero particles every output channel is empty, never zero-filled.
//!
//! # Flat buffer
//!
//! `OutputChannels::to_flatbuffer` interleaves the same data for hosts that
//! want one contiguous block:
//!
//! ```text
//! [0]                  row count
//! [1 + j * STRIDE + k] field k of row j
//! ```

use crate::error::SimError;
use crate::particles::ParticleBuffers;

// ============================================================================
// INPUT CONTRACT
// ============================================================================

/// Number of required channels in a spawn batch.
pub const SPAWN_FIELDS: usize = 6;

/// Names of the spawn batch channels, in order.
pub const SPAWN_FIELD_NAMES: [&str; SPAWN_FIELDS] = ["id", "tx", "ty", "vx", "vy", "size"];

pub const IN_ID: usize = 0;
pub const IN_X: usize = 1;
pub const IN_Y: usize = 2;
pub const IN_VX: usize = 3;
pub const IN_VY: usize = 4;
pub const IN_SIZE: usize = 5;

// ============================================================================
// OUTPUT CONTRACT
// ============================================================================

/// Number of output channels, and the per-row stride of the flat buffer.
pub const STRIDE: usize = 7;

/// Number of f32 values in the flat buffer header (the row count).
pub const HEADER_SIZE: usize = 1;

/// Names of the output channels, in order.
pub const CHANNEL_NAMES: [&str; STRIDE] = ["id", "tx", "ty", "vx", "vy", "radius", "count"];

pub const FIELD_ID: usize = 0;
pub const FIELD_X: usize = 1;
pub const FIELD_Y: usize = 2;
pub const FIELD_VX: usize = 3;
pub const FIELD_VY: usize = 4;
pub const FIELD_RADIUS: usize = 5;
pub const FIELD_COUNT: usize = 6;

/// Flat buffer length for `rows` particles.
#[inline]
pub fn calculate_buffer_size(rows: usize) -> usize {
    HEADER_SIZE + rows * STRIDE
}

/// Flat buffer offset of row `row`.
#[inline]
pub const fn row_offset(row: usize) -> usize {
    HEADER_SIZE + row * STRIDE
}

/// Row count from a flat buffer header. `None` for an empty buffer.
#[inline]
pub fn parse_row_count(buffer: &[f32]) -> Option<usize> {
    buffer.first().map(|&count| count as usize)
}

// ============================================================================
// INPUT BATCH
// ============================================================================

/// Column-major batch of host input channels.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChannelBatch {
    channels: Vec<Vec<f32>>,
}

impl ChannelBatch {
    pub fn new(channels: Vec<Vec<f32>>) -> Self {
        Self { channels }
    }

    /// Build a batch from spawn rows `{id, tx, ty, vx, vy, size}`.
    pub fn from_rows(rows: &[[f32; SPAWN_FIELDS]]) -> Self {
        let channels = (0..SPAWN_FIELDS)
            .map(|field| rows.iter().map(|row| row[field]).collect())
            .collect();
        Self { channels }
    }

    pub fn num_channels(&self) -> usize {
        self.channels.len()
    }

    /// Longest channel length.
    pub fn num_samples(&self) -> usize {
        self.channels.iter().map(Vec::len).max().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.num_samples() == 0
    }

    pub fn channel(&self, index: usize) -> Option<&[f32]> {
        self.channels.get(index).map(Vec::as_slice)
    }

    /// Value of `field` in `row`, or `MissingField` when the channel is
    /// absent or too short.
    pub fn sample(&self, row: usize, field: usize) -> Result<f32, SimError> {
        self.channels
            .get(field)
            .and_then(|channel| channel.get(row))
            .copied()
            .ok_or(SimError::MissingField {
                row,
                field,
                channels: self.channels.len(),
            })
    }

    /// The six spawn fields of `row`.
    pub fn row(&self, row: usize) -> Result<[f32; SPAWN_FIELDS], SimError> {
        let mut fields = [0.0; SPAWN_FIELDS];
        for (field, slot) in fields.iter_mut().enumerate() {
            *slot = self.sample(row, field)?;
        }
        Ok(fields)
    }
}

// ============================================================================
// OUTPUT CHANNELS
// ============================================================================

/// The seven output channels for one tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OutputChannels {
    channels: [Vec<f32>; STRIDE],
    sample_rate: f32,
}

impl OutputChannels {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            channels: Default::default(),
            sample_rate,
        }
    }

    /// Replace the contents with one row per particle.
    pub fn fill(&mut self, buffers: &ParticleBuffers) {
        self.clear();
        let count = buffers.len() as f32;
        for channel in self.channels.iter_mut() {
            channel.reserve(buffers.len());
        }

        for ((&id, &(x, y)), &(vx, vy)) in buffers
            .ids
            .iter()
            .zip(&buffers.positions)
            .zip(&buffers.velocities)
        {
            self.channels[FIELD_ID].push(id as f32);
            self.channels[FIELD_X].push(x);
            self.channels[FIELD_Y].push(y);
            self.channels[FIELD_VX].push(vx);
            self.channels[FIELD_VY].push(vy);
            self.channels[FIELD_RADIUS].push(buffers.radius);
            self.channels[FIELD_COUNT].push(count);
        }
    }

    pub fn clear(&mut self) {
        for channel in self.channels.iter_mut() {
            channel.clear();
        }
    }

    /// Rows written this tick.
    pub fn num_samples(&self) -> usize {
        self.channels[FIELD_ID].len()
    }

    pub fn is_empty(&self) -> bool {
        self.num_samples() == 0
    }

    pub fn num_channels(&self) -> usize {
        STRIDE
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    pub fn channel(&self, index: usize) -> Option<&[f32]> {
        self.channels.get(index).map(Vec::as_slice)
    }

    /// Channel by name (see `CHANNEL_NAMES`).
    pub fn channel_by_name(&self, name: &str) -> Option<&[f32]> {
        CHANNEL_NAMES
            .iter()
            .position(|&n| n == name)
            .and_then(|index| self.channel(index))
    }

    /// One row across all seven channels.
    pub fn row(&self, row: usize) -> Option<[f32; STRIDE]> {
        if row >= self.num_samples() {
            return None;
        }
        let mut values = [0.0; STRIDE];
        for (field, value) in values.iter_mut().enumerate() {
            *value = self.channels[field][row];
        }
        Some(values)
    }

    /// Interleaved copy: header then `STRIDE` values per row.
    pub fn to_flatbuffer(&self) -> Vec<f32> {
        let rows = self.num_samples();
        let mut buffer = Vec::with_capacity(calculate_buffer_size(rows));
        buffer.push(rows as f32);
        for row in 0..rows {
            for channel in &self.channels {
                buffer.push(channel[row]);
            }
        }
        debug_assert_eq!(buffer.len(), calculate_buffer_size(rows));
        buffer
    }
}

/// A named read-only diagnostic value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InfoChannel {
    pub name: &'static str,
    pub value: f64,
}
