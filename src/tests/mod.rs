//! Test Framework - Shared fixtures for grid, pipeline and app tests.
//!
//! Pure data structures are tested directly; `app` drives a headless Bevy app.

mod parts;
mod pool;

use bevy::prelude::*;

use crate::architect::ConstructionPipeline;
use crate::pool::SlotPool;
use crate::settings::ArchitectSettings;
use crate::world::{BlockGrid, TileMap, TileType};

// ============================================================================
// FIXTURES
// ============================================================================

/// All-ground map with no walls.
pub(crate) fn flat_tiles(width: usize, height: usize) -> TileMap {
    TileMap::new(width, height, TileType::Ground)
}

pub(crate) fn empty_grid(width: usize, height: usize) -> BlockGrid {
    BlockGrid::new(width, height, SlotPool::new(16))
}

/// Settings for a small map: huge build range, builder acts every tick.
pub(crate) fn small_settings(width: usize, height: usize) -> ArchitectSettings {
    ArchitectSettings {
        map_width: width,
        map_height: height,
        outline_wall: 0,
        build_range: 100.0,
        build_interval: 0.0,
        ..Default::default()
    }
}

pub(crate) fn pipeline_for(grid: &BlockGrid, settings: &ArchitectSettings) -> ConstructionPipeline {
    ConstructionPipeline::new(grid.shape(), settings)
}

/// World-space centre of cell `(x, y)`.
pub(crate) fn cell_centre(x: i32, y: i32) -> Vec2 {
    Vec2::new(x as f32 + 0.5, y as f32 + 0.5)
}

/// Cells currently holding `address`, sorted.
pub(crate) fn cells_of(grid: &BlockGrid, address: crate::pool::Address) -> Vec<usize> {
    (0..grid.shape().len()).filter(|&i| grid.address_at(i) == Some(address)).collect()
}
