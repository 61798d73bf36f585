//! Selection - Ghost blocks following the cursor before they become design orders.

use bevy::prelude::*;
use hashbrown::HashSet;

use crate::constants::block_size;
use crate::world::{BlockGrid, BlockKind, GridShape, Rotation};

/// One ghost block, positioned relative to the selection pivot.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SelectionEntry {
    pub offset: Vec2,
    pub kind: BlockKind,
    pub rotation: Rotation,
}

/// Active drag gesture.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum DragMode {
    #[default]
    None,
    /// Tiling the stretch original across the rectangle from `start`.
    Stretch { start: Vec2, last_cell: IVec2 },
}

#[derive(Default)]
pub struct SelectionState {
    entries: Vec<SelectionEntry>,
    stretch_original: Option<SelectionEntry>,
    drag: DragMode,
    rotate_interval: f32,
    last_rotate: Option<f64>,
}

impl SelectionState {
    pub fn new(rotate_interval: f32) -> Self {
        Self { rotate_interval, ..Default::default() }
    }

    pub fn entries(&self) -> &[SelectionEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn drag(&self) -> DragMode {
        self.drag
    }

    pub fn stretch_original(&self) -> Option<&SelectionEntry> {
        self.stretch_original.as_ref()
    }

    /// Replace the selection with a single block at the pivot.
    pub fn begin(&mut self, kind: BlockKind, rotation: Rotation) {
        self.cancel();
        self.entries.push(SelectionEntry { offset: Vec2::ZERO, kind, rotation });
    }

    pub fn add(&mut self, offset: Vec2, kind: BlockKind, rotation: Rotation) {
        self.entries.push(SelectionEntry { offset, kind, rotation });
    }

    /// Quarter-turn every entry about the pivot. `now` is unscaled seconds;
    /// calls closer than the rotate interval to the last accepted one are ignored.
    pub fn rotate(&mut self, clockwise: bool, now: f64) -> bool {
        if self.entries.is_empty() && self.stretch_original.is_none() {
            return false;
        }
        if let Some(last) = self.last_rotate
            && now - last < self.rotate_interval as f64
        {
            return false;
        }
        self.last_rotate = Some(now);

        let sin = if clockwise { 1.0 } else { -1.0 };
        let turn = |e: &mut SelectionEntry| {
            let (x, y) = (e.offset.x, e.offset.y);
            e.offset = Vec2::new(-y * sin, x * sin);
            e.rotation = if clockwise { e.rotation.cw() } else { e.rotation.ccw() };
        };
        self.entries.iter_mut().for_each(turn);
        if let Some(original) = self.stretch_original.as_mut() {
            turn(original);
            original.offset = Vec2::ZERO;
        }
        true
    }

    /// Tile the first entry across the cell rectangle `start..end`. The entry
    /// list is rebuilt on every call whose cursor cell changed.
    pub fn stretch(&mut self, start: Vec2, end: Vec2, shape: GridShape) -> bool {
        let cursor = shape.world_to_cell(end);
        if let DragMode::Stretch { last_cell, start: s } = self.drag
            && last_cell == cursor
            && s == start
        {
            return false;
        }
        let original = match self.stretch_original {
            Some(original) => original,
            None => {
                let Some(first) = self.entries.first().copied() else { return false };
                let original = SelectionEntry { offset: Vec2::ZERO, ..first };
                self.stretch_original = Some(original);
                original
            }
        };
        self.drag = DragMode::Stretch { start, last_cell: cursor };

        let stride = original
            .rotation
            .oriented(block_size(original.kind))
            .as_ivec2()
            .max(IVec2::ONE);
        let pivot = shape.world_to_cell(start).as_vec2();
        let (min, max) = shape.cell_rect(start, end);
        // Walk only the on-grid part of the lattice anchored at `min`.
        let first = IVec2::new(first_on_stride(min.x, stride.x), first_on_stride(min.y, stride.y));
        let last = max.min(IVec2::new(shape.width as i32 - 1, shape.height as i32 - 1));

        self.entries.clear();
        let mut y = first.y;
        while y <= last.y {
            let mut x = first.x;
            while x <= last.x {
                self.entries.push(SelectionEntry {
                    offset: IVec2::new(x, y).as_vec2() - pivot,
                    ..original
                });
                x += stride.x;
            }
            y += stride.y;
        }
        true
    }

    /// Finish a stretch: returns the drag start (the pivot the tiled entries are
    /// relative to) and leaves the entries for the caller to commit.
    pub fn finish_stretch(&mut self) -> Option<Vec2> {
        match std::mem::take(&mut self.drag) {
            DragMode::Stretch { start, .. } => Some(start),
            DragMode::None => None,
        }
    }

    /// Return to the single-block selection the stretch started from.
    pub fn restore_original(&mut self) {
        if let Some(original) = self.stretch_original.take() {
            self.entries.clear();
            self.entries.push(original);
        }
        self.drag = DragMode::None;
    }

    /// Pick up the block under `index` as a fresh single-block selection.
    pub fn copy_at(&mut self, index: usize, grid: &BlockGrid) -> bool {
        let Some(record) = grid.block_at(index) else { return false };
        let (kind, rotation) = (record.kind, record.rotation);
        self.begin(kind, rotation);
        true
    }

    /// Copy every block touching the rectangle, each once, relative to its centre.
    pub fn copy_rect(&mut self, start: Vec2, end: Vec2, grid: &BlockGrid) -> usize {
        let shape = grid.shape();
        let (min, max) = shape.cell_rect(start, end);
        let Some((min, max)) = shape.clamp_rect(min, max) else { return 0 };
        let centre = (min + max) / 2;

        let mut seen = HashSet::new();
        let mut copied = Vec::new();
        for y in min.y..=max.y {
            for x in min.x..=max.x {
                let Some(address) = grid.address_at(shape.index(IVec2::new(x, y))) else { continue };
                if !seen.insert(address) {
                    continue;
                }
                let record = grid.read(address);
                copied.push(SelectionEntry {
                    offset: (shape.coords(record.anchor) - centre).as_vec2(),
                    kind: record.kind,
                    rotation: record.rotation,
                });
            }
        }
        if copied.is_empty() {
            return 0;
        }
        self.cancel();
        self.entries = copied;
        self.entries.len()
    }

    pub fn cancel(&mut self) {
        self.entries.clear();
        self.stretch_original = None;
        self.drag = DragMode::None;
    }
}

/// First coordinate `>= 0` on the lattice `from + k * stride`.
fn first_on_stride(from: i32, stride: i32) -> i32 {
    if from >= 0 {
        return from;
    }
    let stride = i64::from(stride);
    let steps = (-i64::from(from) + stride - 1) / stride;
    (i64::from(from) + steps * stride) as i32
}
