//! Public API for the bridge.
//!
//! `TickController` is the single per-frame entry point a host drives. Each
//! `tick` call runs, in order:
//!
//! 1. construction (first tick only) or wall sync (once the execute count
//!    passes `wall_sync_after`)
//! 2. reset, if a reset pulse is pending
//! 3. spawn ingestion, if a spawn pulse is pending and a batch is connected
//! 4. exactly one fixed step
//! 5. output marshalling, one row per live particle
//!
//! ## Fixed Timestep
//!
//! The step size comes from `SimConfig::fixed_timestep` and never from wall
//! time, so identical input sequences give bit-identical output.
//!
//! ## Pulses
//!
//! `Spawn` and `Reset` arm flags that the next `tick` consumes. Pressing a
//! pulse again before it is serviced has no further effect. A spawn pulse
//! stays armed across ticks until a batch is connected.

use crate::channels::{ChannelBatch, InfoChannel, OutputChannels, CHANNEL_NAMES};
use crate::components::{BoundaryKind, EntityId, ParticleColor, Position, Velocity};
use crate::config::SimConfig;
use crate::error::SimError;
use crate::profiler::{PhaseProfiler, TickPhase};
use crate::spawn::{ingest_batch, IngestReport};
use crate::systems::StepParams;
use crate::world::{BodySnapshot, BoundarySnapshot, PhysicsWorld, WorldSnapshot};
use std::str::FromStr;
use tracing::{debug, info};

/// Host wall parameters: centers of the left and right walls.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallParams {
    pub left: (f32, f32),
    pub right: (f32, f32),
}

impl WallParams {
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self {
            left: (x1, y1),
            right: (x2, y2),
        }
    }
}

impl Default for WallParams {
    fn default() -> Self {
        Self::new(-20.0, 0.0, 20.0, 0.0)
    }
}

/// Everything the host supplies for one tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput<'a> {
    pub walls: WallParams,
    /// Connected spawn input, if any.
    pub batch: Option<&'a ChannelBatch>,
}

impl<'a> TickInput<'a> {
    pub fn new(walls: WallParams) -> Self {
        Self { walls, batch: None }
    }

    pub fn with_batch(mut self, batch: &'a ChannelBatch) -> Self {
        self.batch = Some(batch);
        self
    }
}

/// Host pulse buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pulse {
    Spawn,
    Reset,
}

impl Pulse {
    pub fn name(self) -> &'static str {
        match self {
            Pulse::Spawn => "Spawn",
            Pulse::Reset => "Reset",
        }
    }
}

impl FromStr for Pulse {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Spawn" => Ok(Pulse::Spawn),
            "Reset" => Ok(Pulse::Reset),
            other => Err(SimError::UnknownPulse(other.to_string())),
        }
    }
}

/// Counters and flags that persist across ticks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickState {
    pub execute_count: u64,
    pub reset_requested: bool,
    pub spawn_requested: bool,
    pub initialized: bool,
}

/// Owns the physics world and drives it one tick at a time.
pub struct TickController {
    config: SimConfig,
    /// Built on the first tick.
    world: Option<PhysicsWorld>,
    state: TickState,
    particle_count: usize,
    /// Reported on the info channels; never written.
    offset: f64,
    output: OutputChannels,
    last_ingest: Option<IngestReport>,
    rejected_rows: u64,
    dropped_particles: u64,
    profiler: Option<PhaseProfiler>,
}

impl TickController {
    pub fn new() -> Self {
        Self::with_config(SimConfig::default())
    }

    pub fn with_config(config: SimConfig) -> Self {
        let output = OutputChannels::new(config.output_sample_rate);
        Self {
            config,
            world: None,
            state: TickState::default(),
            particle_count: 0,
            offset: 0.0,
            output,
            last_ingest: None,
            rejected_rows: 0,
            dropped_particles: 0,
            profiler: cfg!(feature = "profile").then(PhaseProfiler::new),
        }
    }

    /// Run one tick and return this tick's output channels.
    pub fn tick(&mut self, input: &TickInput<'_>) -> &OutputChannels {
        self.state.execute_count += 1;

        if !self.state.initialized {
            self.begin_phase(TickPhase::Construct);
            let world = self
                .world
                .get_or_insert_with(|| PhysicsWorld::new(&self.config));
            populate(world, &self.config);
            self.state.initialized = true;
            self.end_phase();
            info!(
                particles = self.config.seed.count,
                "physics world constructed"
            );
        } else if self.state.execute_count > self.config.wall_sync_after {
            self.begin_phase(TickPhase::BoundarySync);
            if let Some(world) = self.world.as_mut() {
                sync_walls(world, &input.walls);
            }
            self.end_phase();
        }

        if self.state.reset_requested {
            self.begin_phase(TickPhase::Reset);
            if let Some(world) = self.world.as_mut() {
                world.reset();
                populate(world, &self.config);
            }
            self.particle_count = 0;
            self.state.spawn_requested = false;
            self.state.reset_requested = false;
            self.end_phase();
            info!(tick = self.state.execute_count, "world reset by pulse");
        }

        if self.state.spawn_requested {
            if let Some(batch) = input.batch {
                self.begin_phase(TickPhase::Ingest);
                if let Some(world) = self.world.as_mut() {
                    let report = ingest_batch(world, batch, self.config.default_size_sentinel);
                    self.rejected_rows += report.rejected as u64;
                    self.dropped_particles += report.dropped as u64;
                    self.last_ingest = Some(report);
                }
                self.state.spawn_requested = false;
                self.end_phase();
            }
        }

        self.begin_phase(TickPhase::Step);
        if let Some(world) = self.world.as_mut() {
            world.step(StepParams::from_config(&self.config));
            self.particle_count = world.particle_count();
        }
        self.end_phase();

        self.begin_phase(TickPhase::Marshal);
        match self.world.as_ref() {
            Some(world) if self.particle_count > 0 => {
                self.output.fill(&world.read_particle_buffers());
            }
            _ => self.output.clear(),
        }
        self.end_phase();

        if let Some(profiler) = self.profiler.as_mut() {
            profiler.tick();
        }
        debug!(
            tick = self.state.execute_count,
            particles = self.particle_count,
            "tick complete"
        );

        &self.output
    }

    fn begin_phase(&mut self, phase: TickPhase) {
        if let Some(profiler) = self.profiler.as_mut() {
            profiler.begin(phase);
        }
    }

    fn end_phase(&mut self) {
        if let Some(profiler) = self.profiler.as_mut() {
            profiler.end();
        }
    }

    // ========================================================================
    // PULSES
    // ========================================================================

    /// Arm `pulse` for the next tick.
    pub fn pulse(&mut self, pulse: Pulse) {
        match pulse {
            Pulse::Spawn => self.state.spawn_requested = true,
            Pulse::Reset => self.state.reset_requested = true,
        }
        debug!(pulse = pulse.name(), "pulse armed");
    }

    /// Host callback by parameter name.
    pub fn pulse_pressed(&mut self, name: &str) -> Result<(), SimError> {
        let pulse = name.parse::<Pulse>()?;
        self.pulse(pulse);
        Ok(())
    }

    // ========================================================================
    // HOST INFO
    // ========================================================================

    /// Diagnostic channels: `executeCount` and `offset`.
    pub fn info_channels(&self) -> [InfoChannel; 2] {
        [
            InfoChannel {
                name: "executeCount",
                value: self.state.execute_count as f64,
            },
            InfoChannel {
                name: "offset",
                value: self.offset,
            },
        ]
    }

    /// Diagnostic table rows as `(name, value)` text pairs.
    pub fn info_entries(&self) -> Vec<(String, String)> {
        vec![
            ("executeCount".to_string(), self.state.execute_count.to_string()),
            ("offset".to_string(), self.offset.to_string()),
        ]
    }

    pub fn output_channel_names(&self) -> &'static [&'static str] {
        &CHANNEL_NAMES
    }

    pub fn output_sample_rate(&self) -> f32 {
        self.config.output_sample_rate
    }

    // ========================================================================
    // QUERIES
    // ========================================================================

    pub fn output(&self) -> &OutputChannels {
        &self.output
    }

    pub fn execute_count(&self) -> u64 {
        self.state.execute_count
    }

    pub fn state(&self) -> TickState {
        self.state
    }

    /// Live particles after the last step.
    pub fn particle_count(&self) -> usize {
        self.particle_count
    }

    pub fn is_initialized(&self) -> bool {
        self.state.initialized
    }

    /// Report from the most recent ingestion pass.
    pub fn last_ingest(&self) -> Option<IngestReport> {
        self.last_ingest
    }

    /// Malformed spawn rows skipped since construction.
    pub fn rejected_rows(&self) -> u64 {
        self.rejected_rows
    }

    /// Particle spawns refused at capacity since construction.
    pub fn dropped_particles(&self) -> u64 {
        self.dropped_particles
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn world(&self) -> Option<&PhysicsWorld> {
        self.world.as_ref()
    }

    /// Dynamic bodies in creation order. They are never part of the output
    /// channels.
    pub fn dynamic_bodies(&self) -> Vec<BodySnapshot> {
        self.world
            .as_ref()
            .map(PhysicsWorld::dynamic_bodies)
            .unwrap_or_default()
    }

    pub fn find_dynamic_body(&self, id: i32) -> Option<BodySnapshot> {
        self.world.as_ref()?.find_dynamic_body(EntityId(id))
    }

    pub fn boundary(&self, kind: BoundaryKind) -> Option<BoundarySnapshot> {
        self.world.as_ref()?.boundary(kind)
    }

    pub fn snapshot(&self) -> Option<WorldSnapshot> {
        self.world.as_ref().map(PhysicsWorld::snapshot)
    }

    /// Get the snapshot as a JSON string.
    pub fn snapshot_json(&self) -> String {
        self.snapshot()
            .unwrap_or_default()
            .to_json()
            .unwrap_or_else(|_| "{}".to_string())
    }

    // ========================================================================
    // PROFILING
    // ========================================================================

    pub fn enable_profiling(&mut self) {
        if self.profiler.is_none() {
            self.profiler = Some(PhaseProfiler::new());
        }
    }

    pub fn profiler(&self) -> Option<&PhaseProfiler> {
        self.profiler.as_ref()
    }
}

impl Default for TickController {
    fn default() -> Self {
        Self::new()
    }
}

/// Ground, three walls and the seed particles.
fn populate(world: &mut PhysicsWorld, config: &SimConfig) {
    world.create_ground_plane();
    for (kind, layout) in [
        (BoundaryKind::LeftWall, config.left_wall),
        (BoundaryKind::RightWall, config.right_wall),
        (BoundaryKind::TopWall, config.top_wall),
    ] {
        world.create_static_boundary(
            kind,
            Position::new(layout.position.0, layout.position.1),
            layout.half_extents,
        );
    }

    for i in 0..config.seed.count {
        let (x, y) = config.seed.position(i);
        world.spawn_particle(
            EntityId(i as i32),
            Position::new(x, y),
            Velocity::default(),
            ParticleColor::SEED,
        );
    }
}

fn sync_walls(world: &mut PhysicsWorld, walls: &WallParams) {
    world.set_boundary_position(
        BoundaryKind::LeftWall,
        Position::new(walls.left.0, walls.left.1),
    );
    world.set_boundary_position(
        BoundaryKind::RightWall,
        Position::new(walls.right.0, walls.right.1),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channels::{FIELD_COUNT, FIELD_ID, STRIDE};

    fn run_ticks(controller: &mut TickController, n: usize) {
        let input = TickInput::default();
        for _ in 0..n {
            controller.tick(&input);
        }
    }

    #[test]
    fn test_third_tick_outputs_seed_particles() {
        let mut controller = TickController::new();
        run_ticks(&mut controller, 3);

        assert_eq!(controller.execute_count(), 3);
        assert_eq!(controller.particle_count(), 10);

        let out = controller.output();
        assert_eq!(out.num_samples(), 10);
        for i in 0..STRIDE {
            assert_eq!(out.channel(i).unwrap().len(), 10);
        }
        assert!(out.channel(FIELD_COUNT).unwrap().iter().all(|&c| c == 10.0));
        assert_eq!(out.channel(FIELD_ID).unwrap()[9], 9.0);
    }

    #[test]
    fn test_construct_once() {
        let mut controller = TickController::new();
        run_ticks(&mut controller, 2);

        let world = controller.world().unwrap();
        assert_eq!(world.boundary_count(), 4);
        assert_eq!(world.particle_count(), 10);
        assert!(controller.is_initialized());
    }

    #[test]
    fn test_output_rows_match_particle_count() {
        let mut controller = TickController::new();
        let batch = ChannelBatch::from_rows(&[
            [100.0, -4.0, 20.0, 0.0, 0.0, 1.0],
            [101.0, 4.0, 20.0, 0.0, 0.0, 1.0],
            [102.0, 0.0, 30.0, 0.0, 0.0, 3.0],
        ]);
        let input = TickInput::default().with_batch(&batch);

        for tick in 0..40 {
            if tick % 10 == 5 {
                controller.pulse(Pulse::Spawn);
            }
            let rows = controller.tick(&input).num_samples();
            assert_eq!(rows, controller.particle_count());
            assert_eq!(rows, controller.world().unwrap().particle_count());
        }
        assert_eq!(controller.particle_count(), 10 + 4 * 2);
        assert_eq!(controller.dynamic_bodies().len(), 4);
    }

    #[test]
    fn test_spawned_identity_round_trips() {
        let mut controller = TickController::new();
        run_ticks(&mut controller, 3);
        let before = controller.particle_count();

        let batch = ChannelBatch::from_rows(&[[5.0, 0.0, 0.0, 1.0, 0.0, 1.0]]);
        controller.pulse(Pulse::Spawn);
        controller.tick(&TickInput::default().with_batch(&batch));
        assert_eq!(controller.particle_count(), before + 1);

        let out = controller.tick(&TickInput::default().with_batch(&batch));
        assert_eq!(out.num_samples(), before + 1);
        assert_eq!(out.channel(FIELD_ID).unwrap()[before], 5.0);
    }

    #[test]
    fn test_far_spawns_keep_ticking() {
        let mut controller = TickController::new();
        run_ticks(&mut controller, 3);

        let batch = ChannelBatch::from_rows(&[
            [77.0, 1.0e12, 0.0, 0.0, 0.0, 1.0],
            [78.0, -1.0e12, -1.0e12, 0.0, 0.0, 1.0],
        ]);
        controller.pulse(Pulse::Spawn);
        let input = TickInput::default().with_batch(&batch);
        for _ in 0..5 {
            let rows = controller.tick(&input).num_samples();
            assert_eq!(rows, controller.particle_count());
        }

        assert_eq!(controller.particle_count(), 12);
        let ids = controller.output().channel(FIELD_ID).unwrap();
        assert_eq!(&ids[10..], &[77.0, 78.0]);
    }

    #[test]
    fn test_fast_spawn_scans_occupied_cells_only() {
        let mut controller = TickController::new();
        run_ticks(&mut controller, 3);

        let batch = ChannelBatch::from_rows(&[[90.0, 0.0, 5.0, 3.0e6, 0.0, 1.0]]);
        controller.pulse(Pulse::Spawn);
        let input = TickInput::default().with_batch(&batch);
        controller.tick(&input);

        let config = controller.config();
        let world = controller.world().unwrap();
        let grid = world.spatial_grid();
        let reach = 2.0 * config.particle_radius + 2.0 * 3.0e6 * config.fixed_timestep;
        assert!(grid.scan_cost(0.0, 5.0, reach) <= grid.occupied_cells());

        for _ in 0..5 {
            let rows = controller.tick(&input).num_samples();
            assert_eq!(rows, controller.particle_count());
        }
        assert_eq!(controller.particle_count(), 11);
    }

    #[test]
    fn test_sentinel_routing() {
        let mut controller = TickController::new();
        run_ticks(&mut controller, 3);

        let batch = ChannelBatch::from_rows(&[
            [1.0, 0.0, 20.0, 0.0, 0.0, 1.0],
            [2.0, 10.0, 20.0, 0.0, 0.0, 0.999_999],
        ]);
        controller.pulse(Pulse::Spawn);
        controller.tick(&TickInput::default().with_batch(&batch));

        assert_eq!(controller.particle_count(), 11);
        assert_eq!(controller.dynamic_bodies().len(), 1);
        assert!(controller.find_dynamic_body(2).is_some());
        assert!(controller.find_dynamic_body(1).is_none());
        assert_eq!(
            controller.last_ingest(),
            Some(IngestReport {
                rows: 2,
                particles: 1,
                bodies: 1,
                rejected: 0,
                dropped: 0,
            })
        );
    }

    #[test]
    fn test_spawn_batch_consumed_once() {
        let mut controller = TickController::new();
        run_ticks(&mut controller, 3);

        let batch = ChannelBatch::from_rows(&[[9.0, 0.0, 20.0, 0.0, 0.0, 1.0]]);
        let input = TickInput::default().with_batch(&batch);
        controller.pulse(Pulse::Spawn);
        controller.pulse(Pulse::Spawn);
        controller.tick(&input);
        controller.tick(&input);
        controller.tick(&input);

        assert_eq!(controller.particle_count(), 11);
        assert!(!controller.state().spawn_requested);
    }

    #[test]
    fn test_spawn_waits_for_connected_input() {
        let mut controller = TickController::new();
        run_ticks(&mut controller, 3);

        controller.pulse(Pulse::Spawn);
        run_ticks(&mut controller, 2);
        assert!(controller.state().spawn_requested);
        assert_eq!(controller.particle_count(), 10);

        let batch = ChannelBatch::from_rows(&[[9.0, 0.0, 20.0, 0.0, 0.0, 1.0]]);
        controller.tick(&TickInput::default().with_batch(&batch));
        assert_eq!(controller.particle_count(), 11);
    }

    #[test]
    fn test_malformed_rows_counted_and_flag_cleared() {
        let mut controller = TickController::new();
        run_ticks(&mut controller, 3);

        let batch = ChannelBatch::from_rows(&[
            [f32::NAN, 0.0, 20.0, 0.0, 0.0, 1.0],
            [4.0e10, 0.0, 20.0, 0.0, 0.0, 1.0],
        ]);
        controller.pulse(Pulse::Spawn);
        controller.tick(&TickInput::default().with_batch(&batch));

        assert_eq!(controller.rejected_rows(), 2);
        assert_eq!(controller.particle_count(), 10);
        assert!(!controller.state().spawn_requested);
    }

    #[test]
    fn test_reset_reseeds_and_removes_bodies() {
        let mut controller = TickController::new();
        run_ticks(&mut controller, 3);

        let batch = ChannelBatch::from_rows(&[
            [42.0, 0.0, 20.0, 0.0, 0.0, 2.0],
            [43.0, 5.0, 20.0, 0.0, 0.0, 1.0],
        ]);
        controller.pulse(Pulse::Spawn);
        controller.tick(&TickInput::default().with_batch(&batch));
        assert!(controller.find_dynamic_body(42).is_some());
        assert_eq!(controller.particle_count(), 11);

        controller.pulse(Pulse::Reset);
        let rows = controller.tick(&TickInput::default()).num_samples();

        assert_eq!(rows, 10);
        assert_eq!(controller.particle_count(), 10);
        assert!(controller.find_dynamic_body(42).is_none());
        assert!(controller.dynamic_bodies().is_empty());
        assert_eq!(controller.world().unwrap().boundary_count(), 4);
        assert!(!controller.state().reset_requested);
    }

    #[test]
    fn test_reset_clears_pending_spawn() {
        let mut controller = TickController::new();
        run_ticks(&mut controller, 3);

        let batch = ChannelBatch::from_rows(&[[1.0, 0.0, 20.0, 0.0, 0.0, 1.0]]);
        controller.pulse(Pulse::Spawn);
        controller.pulse(Pulse::Reset);
        controller.pulse(Pulse::Reset);
        controller.tick(&TickInput::default().with_batch(&batch));

        assert_eq!(controller.particle_count(), 10);
        assert!(!controller.state().spawn_requested);
    }

    #[test]
    fn test_wall_sync_after_second_tick() {
        let mut controller = TickController::new();
        let walls = WallParams::new(-25.0, 1.0, 25.0, 2.0);
        let input = TickInput::new(walls);

        controller.tick(&input);
        controller.tick(&input);
        let left = controller.boundary(BoundaryKind::LeftWall).unwrap();
        assert_eq!((left.x, left.y), (-50.0, 0.0));

        controller.tick(&input);
        let left = controller.boundary(BoundaryKind::LeftWall).unwrap();
        let right = controller.boundary(BoundaryKind::RightWall).unwrap();
        assert_eq!((left.x, left.y), (-25.0, 1.0));
        assert_eq!((right.x, right.y), (25.0, 2.0));
        assert_eq!((left.half_width, left.half_height), (10.0, 200.0));
        assert_eq!((right.half_width, right.half_height), (10.0, 200.0));

        let top = controller.boundary(BoundaryKind::TopWall).unwrap();
        assert_eq!((top.x, top.y), (0.0, 50.0));
    }

    #[test]
    fn test_identical_inputs_identical_outputs() {
        let config = SimConfig {
            gravity: (0.0, -10.0),
            ..Default::default()
        };
        let batch = ChannelBatch::from_rows(&[
            [20.0, -3.0, 15.0, 1.0, 0.0, 1.0],
            [21.0, 3.0, 15.0, -1.0, 0.0, 1.0],
            [22.0, 0.0, 25.0, 0.0, -4.0, 2.0],
        ]);

        let run = || {
            let mut controller = TickController::with_config(config.clone());
            let mut outputs = Vec::new();
            for tick in 0..90u32 {
                if tick == 10 || tick == 40 {
                    controller.pulse(Pulse::Spawn);
                }
                let walls = WallParams::new(-20.0 - (tick % 7) as f32, 0.0, 20.0, 0.0);
                let input = TickInput::new(walls).with_batch(&batch);
                outputs.push(controller.tick(&input).to_flatbuffer());
            }
            outputs
        };

        assert_eq!(run(), run());
    }

    #[test]
    fn test_pulse_by_name() {
        let mut controller = TickController::new();
        assert!(controller.pulse_pressed("Reset").is_ok());
        assert!(controller.state().reset_requested);
        assert!(controller.pulse_pressed("Spawn").is_ok());
        assert!(controller.state().spawn_requested);

        let err = controller.pulse_pressed("Explode").unwrap_err();
        assert!(matches!(err, SimError::UnknownPulse(ref name) if name == "Explode"));
    }

    #[test]
    fn test_info_channels() {
        let mut controller = TickController::new();
        run_ticks(&mut controller, 4);

        let info = controller.info_channels();
        assert_eq!(info[0].name, "executeCount");
        assert_eq!(info[0].value, 4.0);
        assert_eq!(info[1].name, "offset");
        assert_eq!(info[1].value, 0.0);

        let entries = controller.info_entries();
        assert_eq!(entries[0], ("executeCount".to_string(), "4".to_string()));
        assert_eq!(entries[1], ("offset".to_string(), "0".to_string()));
        assert_eq!(controller.output_channel_names().len(), STRIDE);
        assert_eq!(controller.output_sample_rate(), 60.0);
    }

    #[test]
    fn test_snapshot_json() {
        let mut controller = TickController::new();
        let empty = WorldSnapshot::from_json(&controller.snapshot_json()).unwrap();
        assert!(empty.particles.is_empty());

        run_ticks(&mut controller, 2);
        let snapshot = WorldSnapshot::from_json(&controller.snapshot_json()).unwrap();
        assert_eq!(snapshot.particles.len(), 10);
        assert_eq!(snapshot.boundaries.len(), 4);
        assert_eq!(snapshot.step, 2);
    }

    #[test]
    fn test_profiling_records_phases() {
        let mut controller = TickController::new();
        controller.enable_profiling();
        run_ticks(&mut controller, 3);

        let profiler = controller.profiler().unwrap();
        assert_eq!(profiler.tick_count(), 3);
        assert_eq!(profiler.phase(TickPhase::Construct).call_count, 1);
        assert_eq!(profiler.phase(TickPhase::BoundarySync).call_count, 1);
        assert_eq!(profiler.phase(TickPhase::Step).call_count, 3);
        assert_eq!(profiler.phase(TickPhase::Marshal).call_count, 3);
        assert_eq!(profiler.phase(TickPhase::Reset).call_count, 0);
    }

    #[test]
    fn test_custom_seed_count() {
        let mut config = SimConfig::default();
        config.seed.count = 25;
        let mut controller = TickController::with_config(config);
        run_ticks(&mut controller, 3);
        assert_eq!(controller.particle_count(), 25);
        assert_eq!(controller.output().num_samples(), 25);
    }
}
