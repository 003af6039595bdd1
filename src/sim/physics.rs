//! Gravity integration and jump impulses
//!
//! Only the player is dynamic. Static bodies are moved by scrolling, not
//! by forces.

use glam::Vec2;

use super::body::PlayerBody;

/// Semi-implicit Euler step under constant downward gravity
pub fn integrate(player: &mut PlayerBody, gravity: f32, dt: f32) {
    if !player.physics_enabled {
        return;
    }
    player.vel.y -= gravity * dt;
    player.pos += player.vel * dt;
}

/// Apply an upward jump impulse. Prior vertical velocity is discarded so
/// jumps never stack.
pub fn apply_jump(player: &mut PlayerBody, impulse: f32) {
    if !player.physics_enabled {
        return;
    }
    player.vel.y = 0.0;
    player.vel += Vec2::new(0.0, impulse);
}

/// Stop all motion (game over freeze)
pub fn freeze(player: &mut PlayerBody) {
    player.vel = Vec2::ZERO;
}
