//! Per-phase timing for the tick controller.
//!
//! Every tick passes through a fixed set of phases. The profiler keeps
//! running statistics per phase and reports them through `tracing`.
//!
//! ## Usage
//!
//! Enabled on every controller with the `profile` feature:
//! ```bash
//! cargo test --release --features profile
//! ```
//!
//! Or per controller with `TickController::enable_profiling`.

use std::time::{Duration, Instant};
use tracing::info;

/// Phases of one tick, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TickPhase {
    Construct,
    BoundarySync,
    Reset,
    Ingest,
    Step,
    Marshal,
}

impl TickPhase {
    pub const ALL: [TickPhase; 6] = [
        TickPhase::Construct,
        TickPhase::BoundarySync,
        TickPhase::Reset,
        TickPhase::Ingest,
        TickPhase::Step,
        TickPhase::Marshal,
    ];

    pub fn name(self) -> &'static str {
        match self {
            TickPhase::Construct => "construct",
            TickPhase::BoundarySync => "boundary_sync",
            TickPhase::Reset => "reset",
            TickPhase::Ingest => "ingest",
            TickPhase::Step => "step",
            TickPhase::Marshal => "marshal",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Statistics for one phase
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct PhaseStats {
    pub total_time: Duration,
    pub call_count: u64,
    pub min_time: Option<Duration>,
    pub max_time: Option<Duration>,
}

impl PhaseStats {
    pub fn avg_time(&self) -> Duration {
        if self.call_count == 0 {
            Duration::ZERO
        } else {
            self.total_time / self.call_count as u32
        }
    }

    fn record(&mut self, elapsed: Duration) {
        self.total_time += elapsed;
        self.call_count += 1;
        self.min_time = Some(self.min_time.map_or(elapsed, |m| m.min(elapsed)));
        self.max_time = Some(self.max_time.map_or(elapsed, |m| m.max(elapsed)));
    }
}

/// Accumulates timings per `TickPhase`.
#[derive(Debug, Default, Clone)]
pub struct PhaseProfiler {
    phases: [PhaseStats; 6],
    current: Option<(TickPhase, Instant)>,
    tick_count: u64,
}

impl PhaseProfiler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start timing `phase`. A phase still open is closed first.
    pub fn begin(&mut self, phase: TickPhase) {
        self.end();
        self.current = Some((phase, Instant::now()));
    }

    /// Close the open phase, if any.
    pub fn end(&mut self) {
        if let Some((phase, start)) = self.current.take() {
            self.record(phase, start.elapsed());
        }
    }

    /// Add one measured duration for `phase`.
    pub fn record(&mut self, phase: TickPhase, elapsed: Duration) {
        self.phases[phase.index()].record(elapsed);
    }

    /// Time a closure as `phase`.
    pub fn time_phase<F, R>(&mut self, phase: TickPhase, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        self.begin(phase);
        let result = f();
        self.end();
        result
    }

    pub fn tick(&mut self) {
        self.tick_count += 1;
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn phase(&self, phase: TickPhase) -> &PhaseStats {
        &self.phases[phase.index()]
    }

    /// Sum over all phases.
    pub fn total_time(&self) -> Duration {
        self.phases.iter().map(|s| s.total_time).sum()
    }

    /// Emit one `info` event per phase that ran, slowest first.
    pub fn log_summary(&self) {
        let total = self.total_time();
        let mut phases: Vec<_> = TickPhase::ALL
            .iter()
            .map(|&p| (p, self.phase(p)))
            .filter(|(_, s)| s.call_count > 0)
            .collect();
        phases.sort_by(|a, b| b.1.total_time.cmp(&a.1.total_time));

        info!(ticks = self.tick_count, total = ?total, "profiler summary");
        for (phase, stats) in phases {
            let pct = if total.as_nanos() > 0 {
                (stats.total_time.as_nanos() as f64 / total.as_nanos() as f64) * 100.0
            } else {
                0.0
            };
            info!(
                phase = phase.name(),
                calls = stats.call_count,
                total = ?stats.total_time,
                avg = ?stats.avg_time(),
                min = ?stats.min_time.unwrap_or(Duration::ZERO),
                max = ?stats.max_time.unwrap_or(Duration::ZERO),
                pct,
                "phase timing"
            );
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
