//! Blockwright - Grid block placement core: slot pool, occupancy grid and the
//! selection → design → builder construction pipeline, driven by Bevy ECS.

// ============================================================================
// MODULES
// ============================================================================

pub mod architect;
pub mod constants;
pub mod messages;
pub mod pool;
pub mod resources;
pub mod settings;
pub mod systems;
pub mod world;

#[cfg(test)]
mod tests;

// ============================================================================
// IMPORTS
// ============================================================================

use bevy::prelude::*;

use architect::ConstructionPipeline;
use messages::*;
use pool::SlotPool;
use resources::BuildAgent;
use settings::ArchitectSettings;
use systems::*;
use world::{BlockGrid, TileMap};

// ============================================================================
// BEVY APP
// ============================================================================

/// System execution phases. Chained so the builder sees this frame's designs
/// and animation sees this frame's blocks.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    Input,   // Commands → selection / design
    Build,   // Builder: at most one order per interval
    Animate, // Part angles and effect timers
}

/// Wire messages, resources and systems. Uses an `ArchitectSettings` resource
/// if the host inserted one, defaults otherwise. A host-provided `TileMap`
/// replaces the default walled map.
pub fn build_app(app: &mut App) {
    let settings = app
        .world()
        .get_resource::<ArchitectSettings>()
        .cloned()
        .unwrap_or_default()
        .sanitized();

    // Tiles first: the grid and pipeline take their size from them.
    let tiles = app
        .world_mut()
        .remove_resource::<TileMap>()
        .unwrap_or_else(|| TileMap::with_outline(settings.map_width, settings.map_height, settings.outline_wall));
    let shape = tiles.shape();
    let grid = BlockGrid::new(
        shape.width,
        shape.height,
        SlotPool::with_ceiling(settings.pool_capacity, settings.pool_ceiling),
    );
    let pipeline = ConstructionPipeline::new(shape, &settings);

    app.add_message::<ArchitectCommand>()
        .add_message::<BlockBuiltMsg>()
        .add_message::<BlockDestroyedMsg>()
        .insert_resource(settings)
        .insert_resource(tiles)
        .insert_resource(grid)
        .insert_resource(pipeline)
        .init_resource::<BuildAgent>()
        .configure_sets(Update, (Step::Input, Step::Build, Step::Animate).chain())
        .add_systems(Update, architect_command_system.in_set(Step::Input))
        .add_systems(Update, builder_system.in_set(Step::Build))
        .add_systems(Update, block_parts_system.in_set(Step::Animate));
}
