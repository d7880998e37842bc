//! Basic demonstration of the particle bridge.
//!
//! Run with: cargo run --example basic_demo

use particle_bridge::{ChannelBatch, Pulse, TickController, TickInput, WallParams};

fn main() {
    tracing_subscriber::fmt::init();

    println!("=== Particle Bridge - Demo ===\n");

    let mut controller = TickController::new();
    controller.enable_profiling();
    let mut walls = WallParams::default();

    // Ticks 1-2 build the world and seed ten particles.
    for _ in 0..2 {
        controller.tick(&TickInput::new(walls));
    }
    println!("Initial state:");
    print_output(&controller);

    // One batch: three particles and one body.
    let batch = ChannelBatch::from_rows(&[
        [100.0, -4.0, 20.0, 0.0, -2.0, 1.0],
        [101.0, 0.0, 20.0, 0.0, -2.0, 1.0],
        [102.0, 4.0, 20.0, 0.0, -2.0, 1.0],
        [200.0, 0.0, 30.0, 0.0, -5.0, 3.0],
    ]);
    println!("\n--- Spawning 3 particles and 1 body ---\n");
    controller.pulse(Pulse::Spawn);

    // Walls close in over 120 ticks.
    for tick in 0..120 {
        let t = tick as f32 / 120.0;
        walls = WallParams::new(-20.0 + 8.0 * t, 0.0, 20.0 - 8.0 * t, 0.0);
        controller.tick(&TickInput::new(walls).with_batch(&batch));

        if (tick + 1) % 30 == 0 {
            println!("--- Tick {} ---", controller.execute_count());
            print_output(&controller);
        }
    }

    for body in controller.dynamic_bodies() {
        println!(
            "  Body {}: pos=({:.2}, {:.2}) vel=({:.2}, {:.2}) r={:.1}",
            body.id, body.x, body.y, body.vx, body.vy, body.radius
        );
    }

    println!("\n--- Reset ---\n");
    controller.pulse(Pulse::Reset);
    controller.tick(&TickInput::new(walls));
    print_output(&controller);

    for (name, value) in controller.info_entries() {
        println!("  {}: {}", name, value);
    }

    if let Some(profiler) = controller.profiler() {
        profiler.log_summary();
    }
}

fn print_output(controller: &TickController) {
    let out = controller.output();
    println!("  {} particles", out.num_samples());
    for row in 0..out.num_samples().min(5) {
        if let Some(r) = out.row(row) {
            println!(
                "    id={:>4} pos=({:>7.2}, {:>7.2}) vel=({:>6.2}, {:>6.2})",
                r[0], r[1], r[2], r[3], r[4]
            );
        }
    }
}
