//! Architect - Player construction pipeline: selection → design orders → builder.
//!
//! Selection ghosts follow the cursor. Committing turns them into Build orders
//! on the design layer; demolishing adds Destroy orders or cancels Build ones.
//! The builder then applies one nearby order per interval to the real grid.

pub mod builder;
pub mod design;
pub mod selection;

use bevy::prelude::*;

pub use builder::{BuildEffect, BuildOutcome, BuilderState};
pub use design::{DesignOrder, DesignState, OrderKind};
pub use selection::{DragMode, SelectionEntry, SelectionState};

use crate::settings::ArchitectSettings;
use crate::world::{BlockGrid, BlockKind, GridShape, Rotation, TileSource};

#[derive(Resource)]
pub struct ConstructionPipeline {
    shape: GridShape,
    selection: SelectionState,
    design: DesignState,
    builder: BuilderState,
    scratch: Vec<usize>,
}

impl ConstructionPipeline {
    pub fn new(shape: GridShape, settings: &ArchitectSettings) -> Self {
        Self {
            shape,
            selection: SelectionState::new(settings.rotate_interval),
            design: DesignState::new(shape),
            builder: BuilderState::new(settings.build_range, settings.build_interval, settings.sprint_multiplier),
            scratch: Vec::new(),
        }
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn selection_mut(&mut self) -> &mut SelectionState {
        &mut self.selection
    }

    pub fn designs(&self) -> &DesignState {
        &self.design
    }

    pub fn builder(&self) -> &BuilderState {
        &self.builder
    }

    pub fn builder_mut(&mut self) -> &mut BuilderState {
        &mut self.builder
    }

    // ========================================================================
    // SELECTION
    // ========================================================================

    pub fn select(&mut self, kind: BlockKind, rotation: Rotation) {
        self.selection.begin(kind, rotation);
    }

    pub fn rotate_selection(&mut self, clockwise: bool, now: f64) -> bool {
        self.selection.rotate(clockwise, now)
    }

    pub fn stretch(&mut self, start: Vec2, end: Vec2) -> bool {
        self.selection.stretch(start, end, self.shape)
    }

    /// Commit the tiled stretch at its drag start, then go back to the single block.
    pub fn finish_stretch<T: TileSource + ?Sized>(&mut self, grid: &BlockGrid, tiles: &T) -> usize {
        let Some(start) = self.selection.finish_stretch() else { return 0 };
        let accepted = self.commit(start, grid, tiles);
        self.selection.restore_original();
        accepted
    }

    pub fn copy_at(&mut self, cursor: Vec2, grid: &BlockGrid) -> bool {
        match self.shape.world_to_index(cursor) {
            Some(index) => self.selection.copy_at(index, grid),
            None => false,
        }
    }

    pub fn copy_rect(&mut self, start: Vec2, end: Vec2, grid: &BlockGrid) -> usize {
        self.selection.copy_rect(start, end, grid)
    }

    pub fn cancel_selection(&mut self) {
        self.selection.cancel();
    }

    // ========================================================================
    // DESIGN
    // ========================================================================

    /// Stage every selection entry as a Build order around `cursor`. Entries that
    /// land off-grid, on occupied cells or off ground are skipped; overlapping
    /// orders are replaced. Returns the number of orders accepted.
    pub fn commit<T: TileSource + ?Sized>(&mut self, cursor: Vec2, grid: &BlockGrid, tiles: &T) -> usize {
        let mut accepted = 0;
        for entry in self.selection.entries() {
            let Some(anchor) = self.shape.world_to_index(cursor + entry.offset) else { continue };
            if grid.is_occupied(anchor) || !grid.can_place(anchor, entry.kind, entry.rotation, tiles) {
                continue;
            }
            self.design.insert(DesignOrder {
                anchor,
                order: OrderKind::Build,
                kind: entry.kind,
                rotation: entry.rotation,
                size: crate::constants::block_size(entry.kind),
            });
            accepted += 1;
        }
        accepted
    }

    /// Cancel the Build order claiming `index`, or mark the real block there for
    /// destruction. Repeating the call changes nothing.
    pub fn demolish_at(&mut self, index: usize, grid: &BlockGrid) {
        if let Some(order) = self.design.order_at(index) {
            if order.order == OrderKind::Build {
                let anchor = order.anchor;
                self.design.remove(anchor);
            }
            return;
        }
        let Some(record) = grid.block_at(index) else { return };
        self.design.insert(DesignOrder {
            anchor: record.anchor,
            order: OrderKind::Destroy,
            kind: record.kind,
            rotation: record.rotation,
            size: record.size,
        });
    }

    /// `demolish_at` over every cell of the rectangle, row by row.
    pub fn demolish_rect(&mut self, start: Vec2, end: Vec2, grid: &BlockGrid) {
        let (min, max) = self.shape.cell_rect(start, end);
        let Some((min, max)) = self.shape.clamp_rect(min, max) else { return };
        for y in min.y..=max.y {
            for x in min.x..=max.x {
                self.demolish_at(self.shape.index(IVec2::new(x, y)), grid);
            }
        }
    }

    pub fn clear_designs(&mut self) {
        self.design.clear();
    }

    /// Footprint cells the selection would cover at `cursor` (ghost rendering).
    pub fn ghost_cells(&mut self, cursor: Vec2) -> &[usize] {
        let mut cells = std::mem::take(&mut self.scratch);
        cells.clear();
        let mut buf = Vec::new();
        for entry in self.selection.entries() {
            let cell = self.shape.world_to_cell(cursor + entry.offset);
            self.shape
                .footprint(cell, crate::constants::block_size(entry.kind), entry.rotation, &mut buf);
            cells.extend_from_slice(&buf);
        }
        self.scratch = cells;
        &self.scratch
    }

    // ========================================================================
    // BUILDER
    // ========================================================================

    pub fn tick<T: TileSource + ?Sized>(
        &mut self,
        dt: f32,
        agent: Vec2,
        sprinting: bool,
        grid: &mut BlockGrid,
        tiles: &T,
    ) -> Option<BuildOutcome> {
        self.builder.tick(dt, agent, sprinting, &mut self.design, grid, tiles)
    }
}
