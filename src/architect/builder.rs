//! Builder - Throttled scheduler that turns nearby design orders into real blocks.

use bevy::prelude::*;

use super::design::{DesignState, OrderKind};
use crate::world::{BlockGrid, BlockKind, TileSource};

/// What a committed order looked like, for effects and audio.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BuildEffect {
    pub kind: BlockKind,
    pub anchor: usize,
    /// World-space centre of the footprint.
    pub position: Vec2,
    pub size_x: u32,
    pub size_y: u32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BuildOutcome {
    Built(BuildEffect),
    Destroyed(BuildEffect),
}

impl BuildOutcome {
    pub fn effect(&self) -> &BuildEffect {
        match self {
            BuildOutcome::Built(e) | BuildOutcome::Destroyed(e) => e,
        }
    }
}

pub struct BuilderState {
    pub build_range: f32,
    pub build_interval: f32,
    pub sprint_multiplier: f32,
    timer: f32,
    focus: Option<Vec2>,
    focus_timer: f32,
}

impl BuilderState {
    pub fn new(build_range: f32, build_interval: f32, sprint_multiplier: f32) -> Self {
        Self {
            build_range,
            build_interval,
            sprint_multiplier,
            timer: 0.0,
            focus: None,
            focus_timer: 0.0,
        }
    }

    pub fn timer(&self) -> f32 {
        self.timer
    }

    /// Where the agent should look: the last thing built, for one interval.
    pub fn focus(&self) -> Option<Vec2> {
        self.focus
    }

    /// Advance the countdown and, when it expires, act on the first claimed
    /// cell in range. At most one order is consumed per call.
    pub fn tick<T: TileSource + ?Sized>(
        &mut self,
        dt: f32,
        agent: Vec2,
        sprinting: bool,
        design: &mut DesignState,
        grid: &mut BlockGrid,
        tiles: &T,
    ) -> Option<BuildOutcome> {
        if self.focus.is_some() {
            self.focus_timer -= dt;
            if self.focus_timer <= 0.0 {
                self.focus = None;
            }
        }
        if design.is_empty() {
            return None;
        }

        let scale = if sprinting { self.sprint_multiplier } else { 1.0 };
        self.timer -= dt * scale;
        if self.timer > 0.0 {
            return None;
        }
        self.timer = self.build_interval;

        let shape = grid.shape();
        let half = Vec2::splat(self.build_range * 0.5);
        let min = (agent - half).floor().as_ivec2();
        let max = (agent + half).floor().as_ivec2();
        let (min, max) = shape.clamp_rect(min, max)?;

        let anchor = (min.y..=max.y)
            .flat_map(|y| (min.x..=max.x).map(move |x| IVec2::new(x, y)))
            .find_map(|cell| design.claim(shape.index(cell)))?;
        let order = *design.get(anchor)?;

        let outcome = match order.order {
            OrderKind::Build => {
                if !grid.can_place(anchor, order.kind, order.rotation, tiles) {
                    debug!("dropped stale build order {:?} at {}", order.kind, anchor);
                    design.remove(anchor);
                    return None;
                }
                design.remove(anchor);
                if let Err(e) = grid.place(anchor, order.kind, order.rotation) {
                    warn!("build order {:?} at {} aborted: {}", order.kind, anchor, e);
                    return None;
                }
                BuildOutcome::Built(effect_of(grid, anchor, order.kind, order.size, order.rotation))
            }
            OrderKind::Destroy => {
                design.remove(anchor);
                let Some(record) = grid.remove(anchor) else {
                    debug!("dropped stale destroy order at {}", anchor);
                    return None;
                };
                BuildOutcome::Destroyed(effect_of(grid, record.anchor, record.kind, record.size, record.rotation))
            }
        };

        self.focus = Some(outcome.effect().position);
        self.focus_timer = self.build_interval;
        Some(outcome)
    }
}

fn effect_of(
    grid: &BlockGrid,
    anchor: usize,
    kind: BlockKind,
    size: UVec2,
    rotation: crate::world::Rotation,
) -> BuildEffect {
    let span = rotation.oriented(size);
    BuildEffect {
        kind,
        anchor,
        position: grid.render_pos(anchor, size, rotation),
        size_x: span.x,
        size_y: span.y,
    }
}
