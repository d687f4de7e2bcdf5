//! Built-in record types
//!
//! The standard simulation records carried in event streams. Each one has a
//! fixed little-endian layout; see the type docs for field order.

pub mod mc_particle;
pub mod sim_tracker_hit;

pub use mc_particle::{McParticle, McParticleCollection};
pub use sim_tracker_hit::{SimTrackerHit, SimTrackerHitCollection};
