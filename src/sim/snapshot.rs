//! Read-only view of a world for the rendering sink

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::{Aabb, PlayerPose};
use super::state::{GameEvent, GameWorld, RunState};

/// Player sprite placement
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerSprite {
    pub pos: Vec2,
    pub rotation: f32,
    pub scale: f32,
    pub pose: PlayerPose,
}

/// Visual parts of one segment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentSprite {
    pub id: u32,
    pub surface: Aabb,
    pub fill: Vec<Vec2>,
    pub wall: Option<Aabb>,
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderSnapshot {
    pub player: PlayerSprite,
    pub segments: Vec<SegmentSprite>,
    pub score: u64,
    pub score_label: String,
    pub run_state: RunState,
    pub world_speed: f32,
    /// Events produced during the tick
    pub events: Vec<GameEvent>,
}

impl RenderSnapshot {
    /// Capture the world, draining its pending events
    pub fn capture(world: &mut GameWorld) -> Self {
        let segments = world
            .segments
            .iter()
            .map(|s| SegmentSprite {
                id: s.id,
                surface: s.surface.rect,
                fill: s.fill.clone(),
                wall: s.wall.as_ref().map(|w| w.rect),
            })
            .collect();
        Self {
            player: PlayerSprite {
                pos: world.player.pos,
                rotation: world.player.rotation,
                scale: world.player.scale,
                pose: world.player.pose,
            },
            segments,
            score: world.score(),
            score_label: world.progress.label(),
            run_state: world.run_state,
            world_speed: world.world_speed(),
            events: std::mem::take(&mut world.events),
        }
    }
}
