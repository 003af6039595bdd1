//! Bodies and axis-aligned geometry
//!
//! The world is y-up. Every collidable is an axis-aligned box; only the
//! player is dynamic.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{CATEGORY_GROUND, CATEGORY_PLAYER, CATEGORY_WALL};

/// Stable identifier for a static body
pub type BodyId = u32;

/// Monotonic id source for static bodies and segments
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdAllocator {
    next: u32,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl IdAllocator {
    /// Allocate a new entity ID
    pub fn next_id(&mut self) -> u32 {
        let id = self.next;
        self.next += 1;
        id
    }
}

/// Collision category of a body
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    Player,
    Ground,
    Wall,
}

impl Category {
    /// Bitmask for this category
    #[inline]
    pub fn bits(self) -> u32 {
        match self {
            Category::Player => CATEGORY_PLAYER,
            Category::Ground => CATEGORY_GROUND,
            Category::Wall => CATEGORY_WALL,
        }
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub center: Vec2,
    pub half: Vec2,
}

impl Aabb {
    pub fn new(center: Vec2, size: Vec2) -> Self {
        Self {
            center,
            half: size / 2.0,
        }
    }

    #[inline]
    pub fn min(&self) -> Vec2 {
        self.center - self.half
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.center + self.half
    }

    /// Per-axis overlap with another box (negative = separated by that much)
    pub fn overlap(&self, other: &Aabb) -> Vec2 {
        (self.half + other.half) - (self.center - other.center).abs()
    }

    /// True if the boxes overlap or are within `slop` of touching
    pub fn touches(&self, other: &Aabb, slop: f32) -> bool {
        let o = self.overlap(other);
        o.x > -slop && o.y > -slop
    }

    /// True if the boxes strictly overlap on both axes
    pub fn intersects(&self, other: &Aabb) -> bool {
        let o = self.overlap(other);
        o.x > 0.0 && o.y > 0.0
    }
}

/// A static collidable (ground surface or obstacle wall)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaticBody {
    pub id: BodyId,
    pub category: Category,
    pub rect: Aabb,
    /// Categories this body reports contacts with
    pub contact_mask: u32,
}

impl StaticBody {
    pub fn new(id: BodyId, category: Category, rect: Aabb) -> Self {
        Self {
            id,
            category,
            rect,
            contact_mask: CATEGORY_PLAYER,
        }
    }

    /// Move horizontally (scrolling)
    #[inline]
    pub fn shift_x(&mut self, dx: f32) {
        self.rect.center.x += dx;
    }
}

/// Presentation state of the player sprite
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PlayerPose {
    /// Running animation frame
    Running { frame: u32 },
    /// Dead sprite replacing the runner
    Dead,
}

/// The player's dynamic body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerBody {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    /// Horizontal position the player is nudged back to
    pub recenter_x: f32,
    /// Categories that block movement
    pub collision_mask: u32,
    /// Categories that produce contact events
    pub contact_mask: u32,
    /// False once the body is swapped for the dead visual
    pub physics_enabled: bool,
    pub rotation: f32,
    pub scale: f32,
    pub pose: PlayerPose,
}

impl PlayerBody {
    pub fn new(pos: Vec2, size: Vec2, recenter_x: f32) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            size,
            recenter_x,
            collision_mask: CATEGORY_GROUND | CATEGORY_WALL,
            contact_mask: CATEGORY_GROUND | CATEGORY_WALL,
            physics_enabled: true,
            rotation: 0.0,
            scale: 1.0,
            pose: PlayerPose::Running { frame: 0 },
        }
    }

    /// Collision box at the current position
    #[inline]
    pub fn rect(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }

    /// Replace the runner with the dead visual: no physics from here on
    pub fn kill(&mut self) {
        self.physics_enabled = false;
        self.vel = Vec2::ZERO;
        self.pose = PlayerPose::Dead;
    }
}
