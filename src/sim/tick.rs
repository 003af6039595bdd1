//! Per-frame controller
//!
//! Drains input, re-centers the player, runs the time-gated terrain tick,
//! steps physics and reacts to contacts, then advances the death animation.

use std::f32::consts::TAU;

use super::body::PlayerPose;
use super::collision::{ContactKind, resolve_contacts};
use super::jump::{JumpKind, JumpState};
use super::physics;
use super::snapshot::RenderSnapshot;
use super::state::{DeathCause, GameEvent, GameWorld, RunState};
use crate::consts::{MAX_SUBSTEPS, SIM_DT};
use crate::highscores::Scoreboard;
use crate::lerp;

/// Seconds of scrolling the autopilot looks ahead for obstacles
const AUTOPILOT_LEAD: f32 = 0.3;
/// Autopilot double-jumps when falling this close above an obstacle top
const AUTOPILOT_CLEARANCE: f32 = 4.0;

/// Input gathered by the host since the previous frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Primary-action taps, processed in arrival order
    pub taps: u32,
    /// Host wall clock (unix ms), stamped on saved scores
    pub timestamp_ms: u64,
    /// Idle/demo mode - autopilot plays the game
    pub idle_mode: bool,
}

/// Advance the world by one host frame
pub fn tick(
    world: &mut GameWorld,
    input: &TickInput,
    dt: f32,
    scores: &mut dyn Scoreboard,
) -> RenderSnapshot {
    let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
    world.clock += dt as f64;
    let last = *world.last_generation.get_or_insert(world.clock);

    let mut taps = input.taps;
    if input.idle_mode && world.is_playing() && autopilot_wants_jump(world) {
        taps += 1;
    }
    for _ in 0..taps {
        match world.run_state {
            RunState::Playing => handle_tap(world),
            RunState::GameOver => {
                world.restart();
                return RenderSnapshot::capture(world);
            }
            RunState::Dying { .. } => {}
        }
    }

    if world.is_playing() {
        recenter(world);
    }

    // Terrain tick: faster scrolling spawns sooner so density stays constant
    if !world.frozen {
        let interval = world.settings.generation_interval(world.world_speed()) as f64;
        if world.clock - last >= interval {
            world.spawn_segment();
            if world.is_playing() {
                world.progress.score_up();
                if world.progress.speed_up() {
                    world.events.push(GameEvent::SpeedUp {
                        speed: world.world_speed(),
                    });
                }
            }
            world.last_generation = Some(world.clock);
        }
    }

    let was_dying = matches!(world.run_state, RunState::Dying { .. });
    step_physics(world, dt, scores, input.timestamp_ms);
    world.segments.retain(|s| !s.expired());

    if was_dying {
        advance_death(world, dt);
    } else if world.is_playing() {
        animate_run(world, dt);
    }

    RenderSnapshot::capture(world)
}

/// Feed one tap through the jump state machine
fn handle_tap(world: &mut GameWorld) {
    match world.jump.tap() {
        Some(JumpKind::First) => {
            physics::apply_jump(&mut world.player, world.settings.jump_impulse);
            world.events.push(GameEvent::Jumped);
        }
        Some(JumpKind::Double) => {
            physics::apply_jump(&mut world.player, world.settings.double_jump_impulse);
            world.events.push(GameEvent::DoubleJumped);
        }
        None => {}
    }
}

/// Nudge the player back to its column when it drifts out of the band.
/// Position only; velocity is left to physics.
fn recenter(world: &mut GameWorld) {
    let (lo, hi) = world.settings.recenter_band;
    let ratio = world.player.pos.x / world.frame.width;
    if !(lo..=hi).contains(&ratio) {
        world.player.pos.x = world.player.recenter_x;
        world.player.pos.y += world.settings.recenter_lift;
    }
}

/// Scroll terrain, integrate the player and resolve contacts in substeps
fn step_physics(world: &mut GameWorld, dt: f32, scores: &mut dyn Scoreboard, timestamp: u64) {
    if dt <= 0.0 || world.frozen {
        return;
    }
    let substeps = ((dt / SIM_DT - 1e-4).ceil() as u32).clamp(1, MAX_SUBSTEPS);
    let h = dt / substeps as f32;

    for _ in 0..substeps {
        let distance = world.scroll_velocity() * h;
        for segment in &mut world.segments {
            segment.scroll(distance);
        }

        if !world.is_playing() {
            continue;
        }

        physics::integrate(&mut world.player, world.settings.gravity, h);
        let contacts = resolve_contacts(
            &mut world.player,
            world.segments.iter().flat_map(|s| s.bodies()),
            &mut world.contacts,
        );

        for contact in contacts {
            // Contacts after the first fatal one are ignored
            if !world.is_playing() {
                break;
            }
            match contact.kind() {
                Some(ContactKind::Landing) => {
                    world.jump.land();
                    world.events.push(GameEvent::Landed);
                }
                Some(ContactKind::Fatal) => {
                    world.begin_dying(DeathCause::Wall, scores, timestamp);
                }
                None => {}
            }
        }

        if world.is_playing() && world.player.rect().max().y < 0.0 {
            world.begin_dying(DeathCause::Fell, scores, timestamp);
        }
    }
}

/// Dead sprite spins, grows and drifts to the frame centre
fn advance_death(world: &mut GameWorld, dt: f32) {
    let RunState::Dying { elapsed, duration } = &mut world.run_state else {
        return;
    };
    *elapsed += dt;
    let done = *elapsed >= *duration;
    let t = (*elapsed / *duration).min(1.0);

    let target = world.frame.center();
    world.player.pos = world.death_start.lerp(target, t);
    world.player.rotation = -TAU * t;
    world.player.scale = lerp(1.0, world.settings.death_scale, t);

    if done {
        world.finish_dying();
    }
}

fn animate_run(world: &mut GameWorld, dt: f32) {
    world.anim_time += dt;
    let frame = (world.anim_time / world.settings.run_frame_time) as u32;
    world.player.pose = PlayerPose::Running {
        frame: frame % world.settings.run_frame_count,
    };
}

/// Demo-mode heuristic: jump when a taller segment is about to arrive
fn autopilot_wants_jump(world: &GameWorld) -> bool {
    let p = world.player.rect();
    let lookahead = world.scroll_velocity() * AUTOPILOT_LEAD;
    let obstacle = world
        .segments
        .iter()
        .filter(|s| s.left() >= p.min().x && s.left() - p.max().x <= lookahead)
        .filter(|s| s.top() > p.min().y + 1.0)
        .min_by(|a, b| a.left().total_cmp(&b.left()));
    let Some(obstacle) = obstacle else {
        return false;
    };

    match world.jump {
        JumpState::Ground => true,
        JumpState::Air => {
            world.player.vel.y < 0.0 && p.min().y < obstacle.top() + AUTOPILOT_CLEARANCE
        }
        JumpState::Jumped => false,
    }
}
