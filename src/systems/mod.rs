//! ECS systems for the physics world.
//!
//! One world step runs these in a fixed chain:
//!
//! 1. `gravity_system` - adds gravity to every moving entity
//! 2. `body_solver_system` - rigid-body contacts and integration
//! 3. `spatial_grid_update_system` - rebuilds the particle grid
//! 4. `particle_solver_system` - particle contacts and integration
//!
//! The chain is single-threaded; the only optional parallelism is the
//! particle pair gather inside step 4 (`parallel` feature).

pub mod contacts;
pub mod integration;
pub mod solver;

pub use contacts::*;
pub use integration::*;
