//! Particle-assembly reveal
//!
//! - Sampling a rendered symbol into particles with per-module delays
//! - Sequencing the assemble/settle cycle on a generation-keyed timer
//! - Per-particle fly-in motion and frame compositing

pub mod motion;
pub mod orchestrator;
pub mod sampler;

pub use motion::{MotionPlan, ParticleFrame, compose_frame};
pub use orchestrator::{RevealOrchestrator, RevealState, SettleTimer};
pub use sampler::{DARK_THRESHOLD, GRID_SIZE_V3, MAX_DELAY_SECONDS, sample_particles};
