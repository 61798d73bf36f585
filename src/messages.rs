//! ECS Messages - Player commands into the architect, build effects out of it.

use bevy::prelude::*;

use crate::architect::BuildEffect;
use crate::world::{BlockKind, Rotation};

// ============================================================================
// COMMANDS (input → architect)
// ============================================================================

/// Cursor-relative commands read the cursor from `BuildAgent`.
#[derive(Message, Clone, Debug, PartialEq)]
pub enum ArchitectCommand {
    /// Start a fresh single-block selection.
    Select { kind: BlockKind, rotation: Rotation },
    Rotate { clockwise: bool },
    /// Stage the selection as Build orders at the cursor.
    Commit,
    Cancel,
    /// Drag update: tile the selection from `start` to `end`.
    Stretch { start: Vec2, end: Vec2 },
    StretchEnd,
    CopyAt,
    CopyRect { start: Vec2, end: Vec2 },
    DemolishAt,
    DemolishRect { start: Vec2, end: Vec2 },
    ClearDesigns,
}

// ============================================================================
// EFFECTS (builder → audio / particles)
// ============================================================================

#[derive(Message, Clone, Debug)]
pub struct BlockBuiltMsg {
    pub effect: BuildEffect,
}

#[derive(Message, Clone, Debug)]
pub struct BlockDestroyedMsg {
    pub effect: BuildEffect,
}
