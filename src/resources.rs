//! ECS Resources - Shared state outside the grid and pipeline

use bevy::prelude::*;

/// The player's builder avatar as the architect sees it. Hosts write
/// `position`, `cursor` and `sprinting`; the builder writes `facing`.
#[derive(Resource, Default, Clone, Debug)]
pub struct BuildAgent {
    pub position: Vec2,
    /// Cursor in world space.
    pub cursor: Vec2,
    pub sprinting: bool,
    /// Point the agent should look at (last build site), if any.
    pub facing: Option<Vec2>,
}
