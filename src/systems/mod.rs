//! Bevy ECS Systems - Thin adapters from the schedule to the architect and grid

mod architect;
mod parts;

pub use architect::*;
pub use parts::*;
