//! Diffusion-Limited Aggregation on a square lattice.
//!
//! Particles enter on a circle around the growing cluster, random walk over
//! the 8-connected lattice, and stick on first contact. The circle follows
//! the cluster outward until it reaches the edge of the field.
//!
//! ```no_run
//! let grid = dla_generator::generate_aggregate_grid(100, 42)?;
//! println!("{} cells occupied", grid.occupied_count());
//! # Ok::<(), dla_generator::Error>(())
//! ```

pub mod braille;
pub mod config;
pub mod error;
pub mod grid;
pub mod render;
pub mod sampler;
pub mod settings;
pub mod simulation;
pub mod walker;

pub use error::Error;
pub use grid::{Direction, Grid, Position};
pub use simulation::{
    generate_aggregate_grid, generate_with, AggregationEngine, Attachment, ParticleOutcome,
    RunStats, Termination,
};
