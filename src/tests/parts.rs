//! Part animation maths.

use bevy::prelude::*;

use crate::systems::{advance_effect, delta_angle, ease_angle, heading, spin_angle, turn_angle};

fn close(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-4
}

#[test]
fn delta_angle_takes_the_short_way() {
    assert!(close(delta_angle(350.0, 10.0), 20.0));
    assert!(close(delta_angle(10.0, 350.0), -20.0));
    assert!(close(delta_angle(0.0, 180.0), 180.0));
    assert!(close(delta_angle(-90.0, 540.0), -90.0));
}

#[test]
fn body_eases_exponentially() {
    assert!(close(ease_angle(0.0, 90.0, 2.0, 0.25), 45.0));
    assert!(close(ease_angle(0.0, 90.0, 10.0, 1.0), 90.0));
    assert!(close(ease_angle(10.0, 350.0, 1.0, 0.5), 0.0));
}

#[test]
fn turret_turns_at_constant_speed_without_overshoot() {
    assert!(close(turn_angle(0.0, 90.0, 45.0, 1.0), 45.0));
    assert!(close(turn_angle(0.0, 10.0, 45.0, 1.0), 10.0));
    assert!(close(turn_angle(10.0, 350.0, 45.0, 1.0), -10.0));
}

#[test]
fn spin_wraps_inside_a_full_turn() {
    assert!(close(spin_angle(350.0, 20.0, 1.0), 10.0));
    assert!(close(spin_angle(-350.0, -20.0, 1.0), -10.0));
}

#[test]
fn effect_timer_cycles() {
    assert!(close(advance_effect(1.0, 0.6, 0.5), 0.3));
    assert_eq!(advance_effect(3.0, 0.0, 0.5), 0.0);
}

#[test]
fn heading_matches_rotation_angles() {
    assert!(close(heading(Vec2::ZERO, Vec2::Y), 0.0));
    assert!(close(heading(Vec2::ZERO, Vec2::X), -90.0));
    assert!(close(delta_angle(0.0, heading(Vec2::ZERO, -Vec2::X)), 90.0));
}
