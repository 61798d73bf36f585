//! Constants - Tuning parameters and the block registry

use bevy::math::UVec2;

use crate::world::BlockKind;

// ============================================================================
// POOL CONSTANTS
// ============================================================================

/// Highest number of virgin slots a block pool may hand out.
/// Keeps every address representable in 15 bits.
pub const POOL_ADDRESS_CEILING: usize = i16::MAX as usize;

/// Initial backing length of a block pool.
pub const DEFAULT_POOL_CAPACITY: usize = u8::MAX as usize;

/// Backing arrays grow by this factor when the pool runs out of virgin slots.
pub const POOL_GROWTH_FACTOR: f64 = 1.5;

// ============================================================================
// GRID CONSTANTS
// ============================================================================

/// Largest footprint any registered block may have (6x6).
pub const MAX_FOOTPRINT_CELLS: usize = 36;

/// Default map size in cells.
pub const DEFAULT_MAP_WIDTH: usize = 128;
pub const DEFAULT_MAP_HEIGHT: usize = 128;

/// Wall thickness around the default map.
pub const DEFAULT_OUTLINE_WALL: usize = 2;

// ============================================================================
// ARCHITECT CONSTANTS
// ============================================================================

/// Side length (in cells) of the square the builder scans around the agent.
pub const DEFAULT_BUILD_RANGE: f32 = 20.0;

/// Seconds between two committed design orders.
pub const DEFAULT_BUILD_INTERVAL: f32 = 0.06;

/// Builder speed-up while the agent sprints.
pub const DEFAULT_SPRINT_MULTIPLIER: f32 = 3.0;

/// Minimum seconds (unscaled) between two selection rotations.
pub const DEFAULT_ROTATE_INTERVAL: f32 = 0.1;

// ============================================================================
// BLOCK REGISTRY
// ============================================================================

/// Static description of one block kind.
pub struct BlockDef {
    pub kind: BlockKind,
    pub label: &'static str,
    /// Footprint at rotation `Up` (x = width, y = height).
    pub size: UVec2,
    /// Exponential easing rate of the body toward the agent (1/s).
    pub body_rotate_speed: f32,
    /// Constant turret turn rate (deg/s).
    pub turret_rotate_speed: f32,
    /// Spin rate of free-rotating parts (deg/s).
    pub spin_speed: f32,
    /// Half period of the effect pulse (s). 0 = no effect.
    pub effect_cycle: f32,
}

const fn def(
    kind: BlockKind,
    label: &'static str,
    w: u32,
    h: u32,
    body: f32,
    turret: f32,
    spin: f32,
    effect: f32,
) -> BlockDef {
    BlockDef {
        kind,
        label,
        size: UVec2::new(w, h),
        body_rotate_speed: body,
        turret_rotate_speed: turret,
        spin_speed: spin,
        effect_cycle: effect,
    }
}

/// One entry per `BlockKind`, in declaration order.
pub const BLOCK_REGISTRY: &[BlockDef] = &[
    // core
    def(BlockKind::CoreShard,        "Core: Shard",        3, 3, 0.0, 0.0,   0.0, 1.2),
    def(BlockKind::CoreFoundation,   "Core: Foundation",   4, 4, 0.0, 0.0,   0.0, 1.2),
    def(BlockKind::CoreNucleus,      "Core: Nucleus",      5, 5, 0.0, 0.0,   0.0, 1.2),
    // drills
    def(BlockKind::MechanicalDrill,  "Mechanical Drill",   2, 2, 0.0, 0.0,  90.0, 0.0),
    def(BlockKind::PneumaticDrill,   "Pneumatic Drill",    2, 2, 0.0, 0.0, 140.0, 0.0),
    def(BlockKind::LaserDrill,       "Laser Drill",        3, 3, 0.0, 0.0, 220.0, 0.8),
    def(BlockKind::AirblastDrill,    "Airblast Drill",     4, 4, 0.0, 0.0, 300.0, 0.6),
    // liquids
    def(BlockKind::Conduit,          "Conduit",            1, 1, 0.0, 0.0,   0.0, 0.0),
    def(BlockKind::LiquidRouter,     "Liquid Router",      1, 1, 0.0, 0.0,   0.0, 0.0),
    def(BlockKind::LiquidTank,       "Liquid Tank",        3, 3, 0.0, 0.0,   0.0, 2.0),
    def(BlockKind::BridgeConduit,    "Bridge Conduit",     1, 3, 0.0, 0.0,   0.0, 0.5),
    // turrets
    def(BlockKind::Duo,              "Duo",                1, 1, 0.0, 180.0, 0.0, 0.0),
    def(BlockKind::Scatter,          "Scatter",            2, 2, 0.0, 240.0, 0.0, 0.0),
    def(BlockKind::Lancer,           "Lancer",             2, 2, 4.0, 120.0, 0.0, 0.4),
    def(BlockKind::Ripple,           "Ripple",             3, 3, 3.0,  90.0, 0.0, 0.0),
    def(BlockKind::Meltdown,         "Meltdown",           4, 4, 2.0,  45.0, 0.0, 0.3),
    // factories
    def(BlockKind::GraphitePress,    "Graphite Press",     2, 2, 0.0, 0.0,   0.0, 0.0),
    def(BlockKind::SiliconSmelter,   "Silicon Smelter",    2, 2, 0.0, 0.0,   0.0, 0.7),
    def(BlockKind::Separator,        "Separator",          2, 3, 0.0, 0.0,  60.0, 0.0),
    def(BlockKind::Kiln,             "Kiln",               2, 2, 0.0, 0.0,   0.0, 1.0),
    // walls
    def(BlockKind::CopperWall,       "Copper Wall",        1, 1, 0.0, 0.0,   0.0, 0.0),
    def(BlockKind::LargeCopperWall,  "Large Copper Wall",  2, 2, 0.0, 0.0,   0.0, 0.0),
    def(BlockKind::Door,             "Door",               1, 1, 0.0, 0.0,   0.0, 0.0),
    def(BlockKind::LargeDoor,        "Large Door",         2, 2, 0.0, 0.0,   0.0, 0.0),
    def(BlockKind::Thruster,         "Thruster",           4, 4, 0.0, 0.0,   0.0, 0.25),
];

/// Look up a block definition. Registry order matches `BlockKind` declaration order.
pub fn block_def(kind: BlockKind) -> &'static BlockDef {
    let def = &BLOCK_REGISTRY[kind as usize];
    debug_assert!(def.kind == kind, "BLOCK_REGISTRY out of order at {:?}", kind);
    def
}

/// Footprint size of a block kind at rotation `Up`.
pub fn block_size(kind: BlockKind) -> UVec2 {
    block_def(kind).size
}
