//! World - Block kinds, rotations, terrain tiles and the block occupancy grid.
//!
//! Cells are addressed by linear index `y * width + x`, one cell per world unit,
//! origin at the bottom-left corner of the map.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{block_size, MAX_FOOTPRINT_CELLS};
use crate::pool::{Address, PoolError, SlotPool};

// ============================================================================
// BLOCK KINDS
// ============================================================================

/// Every placeable block. Declaration order matches `BLOCK_REGISTRY`.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum BlockKind {
    #[default]
    CoreShard,
    CoreFoundation,
    CoreNucleus,
    MechanicalDrill,
    PneumaticDrill,
    LaserDrill,
    AirblastDrill,
    Conduit,
    LiquidRouter,
    LiquidTank,
    BridgeConduit,
    Duo,
    Scatter,
    Lancer,
    Ripple,
    Meltdown,
    GraphitePress,
    SiliconSmelter,
    Separator,
    Kiln,
    CopperWall,
    LargeCopperWall,
    Door,
    LargeDoor,
    Thruster,
}

impl BlockKind {
    pub const ALL: [BlockKind; 25] = [
        BlockKind::CoreShard, BlockKind::CoreFoundation, BlockKind::CoreNucleus,
        BlockKind::MechanicalDrill, BlockKind::PneumaticDrill, BlockKind::LaserDrill, BlockKind::AirblastDrill,
        BlockKind::Conduit, BlockKind::LiquidRouter, BlockKind::LiquidTank, BlockKind::BridgeConduit,
        BlockKind::Duo, BlockKind::Scatter, BlockKind::Lancer, BlockKind::Ripple, BlockKind::Meltdown,
        BlockKind::GraphitePress, BlockKind::SiliconSmelter, BlockKind::Separator, BlockKind::Kiln,
        BlockKind::CopperWall, BlockKind::LargeCopperWall, BlockKind::Door, BlockKind::LargeDoor,
        BlockKind::Thruster,
    ];
}

// ============================================================================
// ROTATION
// ============================================================================

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RotationError {
    #[error("invalid rotation value {0} (expected 1..=4)")]
    Invalid(u8),
}

/// Quarter-turn orientation. Raw values 1..=4 (0 is reserved for "none").
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum Rotation {
    #[default]
    Up = 1,
    Right = 2,
    Down = 3,
    Left = 4,
}

impl TryFrom<u8> for Rotation {
    type Error = RotationError;

    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        match raw {
            1 => Ok(Rotation::Up),
            2 => Ok(Rotation::Right),
            3 => Ok(Rotation::Down),
            4 => Ok(Rotation::Left),
            _ => Err(RotationError::Invalid(raw)),
        }
    }
}

impl Rotation {
    /// Decode a raw value. Anything outside 1..=4 is a logic error and falls back to `Up`.
    pub fn from_raw(raw: u8) -> Rotation {
        match Rotation::try_from(raw) {
            Ok(rotation) => rotation,
            Err(e) => {
                debug_assert!(false, "{}", e);
                error!("{}, using Up", e);
                Rotation::Up
            }
        }
    }

    pub fn cw(self) -> Rotation {
        match self {
            Rotation::Up => Rotation::Right,
            Rotation::Right => Rotation::Down,
            Rotation::Down => Rotation::Left,
            Rotation::Left => Rotation::Up,
        }
    }

    pub fn ccw(self) -> Rotation {
        match self {
            Rotation::Up => Rotation::Left,
            Rotation::Left => Rotation::Down,
            Rotation::Down => Rotation::Right,
            Rotation::Right => Rotation::Up,
        }
    }

    /// Render angle in degrees (counter-clockwise positive).
    pub fn angle_degrees(self) -> f32 {
        match self {
            Rotation::Up => 0.0,
            Rotation::Right => -90.0,
            Rotation::Down => 180.0,
            Rotation::Left => 90.0,
        }
    }

    /// Right and Left swap a footprint's width and height.
    pub fn is_sideways(self) -> bool {
        matches!(self, Rotation::Right | Rotation::Left)
    }

    /// Per-axis walk direction away from the anchor.
    pub fn step(self) -> IVec2 {
        match self {
            Rotation::Up => IVec2::new(1, 1),
            Rotation::Right => IVec2::new(1, -1),
            Rotation::Down => IVec2::new(-1, -1),
            Rotation::Left => IVec2::new(-1, 1),
        }
    }

    /// Grid extent of a base `size` at this rotation.
    pub fn oriented(self, size: UVec2) -> UVec2 {
        if self.is_sideways() { UVec2::new(size.y, size.x) } else { size }
    }
}

// ============================================================================
// GRID GEOMETRY
// ============================================================================

/// Dimensions of a cell grid plus index/world conversions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridShape {
    pub width: usize,
    pub height: usize,
}

impl GridShape {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    pub fn len(&self) -> usize {
        self.width * self.height
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn contains(&self, cell: IVec2) -> bool {
        cell.x >= 0 && cell.y >= 0 && (cell.x as usize) < self.width && (cell.y as usize) < self.height
    }

    #[inline]
    pub fn contains_index(&self, index: usize) -> bool {
        index < self.len()
    }

    /// Linear index of an in-bounds cell.
    #[inline]
    pub fn index(&self, cell: IVec2) -> usize {
        cell.y as usize * self.width + cell.x as usize
    }

    pub fn checked_index(&self, cell: IVec2) -> Option<usize> {
        self.contains(cell).then(|| self.index(cell))
    }

    #[inline]
    pub fn coords(&self, index: usize) -> IVec2 {
        IVec2::new((index % self.width) as i32, (index / self.width) as i32)
    }

    /// Cell containing a world position (floor, unclamped).
    pub fn world_to_cell(&self, pos: Vec2) -> IVec2 {
        pos.floor().as_ivec2()
    }

    pub fn world_to_index(&self, pos: Vec2) -> Option<usize> {
        self.checked_index(self.world_to_cell(pos))
    }

    /// Sorted (min, max) cell rectangle spanned by two world points, unclamped.
    pub fn cell_rect(&self, a: Vec2, b: Vec2) -> (IVec2, IVec2) {
        let a = self.world_to_cell(a);
        let b = self.world_to_cell(b);
        (a.min(b), a.max(b))
    }

    /// Clamp an inclusive cell rectangle to the grid. `None` when they don't overlap.
    pub fn clamp_rect(&self, min: IVec2, max: IVec2) -> Option<(IVec2, IVec2)> {
        if self.is_empty() {
            return None;
        }
        let limit = IVec2::new(self.width as i32 - 1, self.height as i32 - 1);
        let lo = min.max(IVec2::ZERO);
        let hi = max.min(limit);
        (lo.x <= hi.x && lo.y <= hi.y).then_some((lo, hi))
    }

    /// Every footprint coordinate of `size` at `rotation`, row by row, including
    /// coordinates that fall outside the grid.
    pub fn footprint_coords(
        anchor: IVec2,
        size: UVec2,
        rotation: Rotation,
    ) -> impl Iterator<Item = IVec2> {
        let dir = rotation.step();
        let span = rotation.oriented(size).as_ivec2();
        (0..span.y).flat_map(move |y| {
            (0..span.x).map(move |x| IVec2::new(anchor.x + x * dir.x, anchor.y + y * dir.y))
        })
    }

    /// Write the in-grid footprint indices into `out` (cleared first). Returns the count.
    /// Cells outside the grid are dropped silently.
    pub fn footprint(&self, anchor: IVec2, size: UVec2, rotation: Rotation, out: &mut Vec<usize>) -> usize {
        out.clear();
        out.extend(Self::footprint_coords(anchor, size, rotation).filter_map(|c| self.checked_index(c)));
        out.len()
    }

    /// World-space centre of the footprint rectangle.
    pub fn render_pos(&self, anchor: IVec2, size: UVec2, rotation: Rotation) -> Vec2 {
        let span = rotation.oriented(size).as_ivec2().max(IVec2::ONE);
        let far = anchor + (span - IVec2::ONE) * rotation.step();
        let lo = anchor.min(far).as_vec2();
        let hi = anchor.max(far).as_vec2() + Vec2::ONE;
        (lo + hi) * 0.5
    }
}

// ============================================================================
// TERRAIN TILES
// ============================================================================

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub enum TileType {
    Air,
    #[default]
    Ground,
    Wall,
}

/// Terrain queries the grid needs. Cells are the same linear indices as `BlockGrid`.
pub trait TileSource {
    fn in_bounds(&self, index: usize) -> bool;
    fn is_ground(&self, index: usize) -> bool;
}

/// Flat terrain map. Terrain generation is out of scope; hosts fill it directly.
#[derive(Resource, Clone)]
pub struct TileMap {
    shape: GridShape,
    tiles: Vec<TileType>,
}

impl TileMap {
    pub fn new(width: usize, height: usize, fill: TileType) -> Self {
        Self { shape: GridShape::new(width, height), tiles: vec![fill; width * height] }
    }

    /// Ground map ringed by a wall `thickness` cells deep.
    pub fn with_outline(width: usize, height: usize, thickness: usize) -> Self {
        let mut map = Self::new(width, height, TileType::Ground);
        if width == 0 || height == 0 {
            return map;
        }
        for y in 0..height {
            for x in 0..width {
                let edge = x.min(y).min(width - 1 - x).min(height - 1 - y);
                if edge < thickness {
                    map.tiles[y * width + x] = TileType::Wall;
                }
            }
        }
        map
    }

    pub fn shape(&self) -> GridShape {
        self.shape
    }

    pub fn get(&self, index: usize) -> Option<TileType> {
        self.tiles.get(index).copied()
    }

    pub fn set(&mut self, index: usize, tile: TileType) {
        if let Some(t) = self.tiles.get_mut(index) {
            *t = tile;
        }
    }
}

impl TileSource for TileMap {
    fn in_bounds(&self, index: usize) -> bool {
        index < self.tiles.len()
    }

    fn is_ground(&self, index: usize) -> bool {
        self.get(index) == Some(TileType::Ground)
    }
}

// ============================================================================
// BLOCK RECORDS
// ============================================================================

/// One cell of the occupancy grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CellEntry {
    pub block: Option<Address>,
}

/// Placed block. Anchor + size + rotation define the footprint; the angles and
/// effect timer are animated state owned by the part animator.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BlockRecord {
    pub kind: BlockKind,
    pub rotation: Rotation,
    pub anchor: usize,
    /// Base size at rotation `Up`.
    pub size: UVec2,
    pub body_angle: f32,
    pub turret_angle: f32,
    pub spin_angle: f32,
    pub effect_timer: f32,
}

#[derive(Debug, Error)]
pub enum PlaceError {
    #[error("footprint is blocked, clipped or off solid ground")]
    Blocked,
    #[error(transparent)]
    Pool(#[from] PoolError),
}

// ============================================================================
// BLOCK GRID
// ============================================================================

/// Dense cell → block map. Owns the record pool; every footprint cell of a
/// record holds that record's address and nothing else does.
#[derive(Resource)]
pub struct BlockGrid {
    shape: GridShape,
    cells: Vec<CellEntry>,
    pool: SlotPool<BlockRecord>,
    scratch: Vec<usize>,
}

impl BlockGrid {
    pub fn new(width: usize, height: usize, pool: SlotPool<BlockRecord>) -> Self {
        Self {
            shape: GridShape::new(width, height),
            cells: vec![CellEntry::default(); width * height],
            pool,
            scratch: Vec::with_capacity(MAX_FOOTPRINT_CELLS),
        }
    }

    pub fn shape(&self) -> GridShape {
        self.shape
    }

    pub fn width(&self) -> usize {
        self.shape.width
    }

    pub fn height(&self) -> usize {
        self.shape.height
    }

    #[inline]
    pub fn in_bounds(&self, index: usize) -> bool {
        index < self.cells.len()
    }

    /// True for out-of-bounds indices too: nothing can be placed there.
    pub fn is_empty(&self, index: usize) -> bool {
        self.address_at(index).is_none()
    }

    pub fn is_occupied(&self, index: usize) -> bool {
        self.address_at(index).is_some()
    }

    pub fn address_at(&self, index: usize) -> Option<Address> {
        self.cells.get(index).and_then(|c| c.block)
    }

    pub fn block_at(&self, index: usize) -> Option<&BlockRecord> {
        self.address_at(index).and_then(|a| self.pool.get(a))
    }

    pub fn read(&self, address: Address) -> &BlockRecord {
        self.pool.read(address)
    }

    pub fn read_mut(&mut self, address: Address) -> &mut BlockRecord {
        self.pool.read_mut(address)
    }

    pub fn pool(&self) -> &SlotPool<BlockRecord> {
        &self.pool
    }

    /// Live blocks in address order.
    pub fn blocks(&self) -> impl Iterator<Item = (Address, &BlockRecord)> + '_ {
        self.pool.iter()
    }

    pub fn blocks_mut(&mut self) -> impl Iterator<Item = (Address, &mut BlockRecord)> + '_ {
        self.pool.iter_mut()
    }

    /// In-grid footprint cells of a hypothetical placement.
    pub fn footprint_cells(&self, anchor: usize, size: UVec2, rotation: Rotation, out: &mut Vec<usize>) -> usize {
        if !self.in_bounds(anchor) {
            out.clear();
            return 0;
        }
        self.shape.footprint(self.shape.coords(anchor), size, rotation, out)
    }

    pub fn can_place<T: TileSource + ?Sized>(&self, anchor: usize, kind: BlockKind, rotation: Rotation, tiles: &T) -> bool {
        self.can_place_size(anchor, block_size(kind), rotation, tiles)
    }

    /// Anchor in bounds, footprint fully inside the grid, every cell empty and on ground.
    pub fn can_place_size<T: TileSource + ?Sized>(&self, anchor: usize, size: UVec2, rotation: Rotation, tiles: &T) -> bool {
        if !self.in_bounds(anchor) {
            return false;
        }
        let origin = self.shape.coords(anchor);
        GridShape::footprint_coords(origin, size, rotation).all(|cell| {
            self.shape
                .checked_index(cell)
                .is_some_and(|i| self.cells[i].block.is_none() && tiles.is_ground(i))
        })
    }

    /// Allocate a record and stamp its footprint. Callers check `can_place` first.
    pub fn place(&mut self, anchor: usize, kind: BlockKind, rotation: Rotation) -> Result<Address, PoolError> {
        let size = block_size(kind);
        let record = BlockRecord { kind, rotation, anchor, size, ..Default::default() };
        let address = match self.pool.create(record) {
            Ok(address) => address,
            Err(e) => {
                warn!("place {:?} at {} failed: {}", kind, anchor, e);
                return Err(e);
            }
        };

        let mut cells = std::mem::take(&mut self.scratch);
        self.footprint_cells(anchor, size, rotation, &mut cells);
        for &i in &cells {
            self.cells[i].block = Some(address);
        }
        self.scratch = cells;
        Ok(address)
    }

    /// Checked placement used by the builder.
    pub fn try_place<T: TileSource + ?Sized>(
        &mut self,
        anchor: usize,
        kind: BlockKind,
        rotation: Rotation,
        tiles: &T,
    ) -> Result<Address, PlaceError> {
        if !self.can_place(anchor, kind, rotation, tiles) {
            return Err(PlaceError::Blocked);
        }
        Ok(self.place(anchor, kind, rotation)?)
    }

    /// Remove whatever block covers `index` (any footprint cell works).
    pub fn remove(&mut self, index: usize) -> Option<BlockRecord> {
        let address = self.address_at(index)?;
        self.remove_by_address(address)
    }

    pub fn remove_by_address(&mut self, address: Address) -> Option<BlockRecord> {
        let record = self.pool.get(address)?.clone();
        let mut cells = std::mem::take(&mut self.scratch);
        self.footprint_cells(record.anchor, record.size, record.rotation, &mut cells);
        for &i in &cells {
            if self.cells[i].block == Some(address) {
                self.cells[i].block = None;
            }
        }
        self.scratch = cells;
        self.pool.destroy(address);
        Some(record)
    }

    /// World-space centre of a footprint anchored at cell index `anchor`.
    pub fn render_pos(&self, anchor: usize, size: UVec2, rotation: Rotation) -> Vec2 {
        self.shape.render_pos(self.shape.coords(anchor), size, rotation)
    }

    /// Drop every block. Pool slots become reusable.
    pub fn clear(&mut self) {
        self.cells.iter_mut().for_each(|c| *c = CellEntry::default());
        self.pool.clear();
    }
}
