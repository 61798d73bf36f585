//! Part animation - Bodies and turrets track the agent, spinners spin, effects pulse

use bevy::prelude::*;

use crate::constants::block_def;
use crate::resources::BuildAgent;
use crate::world::BlockGrid;

/// Signed shortest turn from `from` to `to`, in (-180, 180].
pub fn delta_angle(from: f32, to: f32) -> f32 {
    let mut d = (to - from).rem_euclid(360.0);
    if d > 180.0 {
        d -= 360.0;
    }
    d
}

/// Exponential approach: covers `clamp01(speed * dt)` of the remaining turn.
pub fn ease_angle(current: f32, target: f32, speed: f32, dt: f32) -> f32 {
    current + delta_angle(current, target) * (speed * dt).clamp(0.0, 1.0)
}

/// Constant-rate turn along the shortest arc, never overshooting.
pub fn turn_angle(current: f32, target: f32, speed: f32, dt: f32) -> f32 {
    let d = delta_angle(current, target);
    let step = speed * dt;
    if d.abs() <= step { current + d } else { current + step * d.signum() }
}

/// Free spin, kept inside (-360, 360).
pub fn spin_angle(current: f32, speed: f32, dt: f32) -> f32 {
    (current + speed * dt) % 360.0
}

/// Effect pulse timer, modulo two cycles. Zero cycle disables it.
pub fn advance_effect(timer: f32, cycle: f32, dt: f32) -> f32 {
    if cycle <= 0.0 {
        return 0.0;
    }
    (timer + dt) % (cycle * 2.0)
}

/// Heading from `from` to `to` with 0° = +y, counter-clockwise positive.
pub fn heading(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    d.y.atan2(d.x).to_degrees() - 90.0
}

pub fn block_parts_system(time: Res<Time>, agent: Res<BuildAgent>, mut grid: ResMut<BlockGrid>) {
    let dt = time.delta_secs();
    if dt <= 0.0 {
        return;
    }
    let shape = grid.shape();
    for (_, block) in grid.blocks_mut() {
        let def = block_def(block.kind);
        let centre = shape.render_pos(shape.coords(block.anchor), block.size, block.rotation);
        let target = heading(centre, agent.position);

        if def.body_rotate_speed > 0.0 {
            block.body_angle = ease_angle(block.body_angle, target, def.body_rotate_speed, dt);
        }
        if def.turret_rotate_speed > 0.0 {
            block.turret_angle = turn_angle(block.turret_angle, target, def.turret_rotate_speed, dt);
        }
        if def.spin_speed != 0.0 {
            block.spin_angle = spin_angle(block.spin_angle, def.spin_speed, dt);
        }
        block.effect_timer = advance_effect(block.effect_timer, def.effect_cycle, dt);
    }
}
