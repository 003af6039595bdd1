//! Contact detection and response
//!
//! The player is resolved against every static body each substep. Contacts
//! are edge-triggered: a body that stays in contact does not re-fire until
//! the player separates from it.

use std::collections::BTreeSet;

use glam::Vec2;

use super::body::{Aabb, BodyId, Category, PlayerBody, StaticBody};
use crate::consts::{
    CATEGORY_GROUND, CATEGORY_PLAYER, CATEGORY_WALL, CONTACT_EPSILON, CONTACT_SLOP,
};

/// What a contact between two categories means to the game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactKind {
    /// Player touched a ground surface
    Landing,
    /// Player touched an obstacle wall
    Fatal,
}

/// Collision-pair table keyed by the union of both categories' bits
const PAIR_TABLE: [(u32, ContactKind); 2] = [
    (CATEGORY_PLAYER | CATEGORY_GROUND, ContactKind::Landing),
    (CATEGORY_PLAYER | CATEGORY_WALL, ContactKind::Fatal),
];

/// Look up the meaning of a category pair (order-insensitive)
pub fn pair_kind(a: Category, b: Category) -> Option<ContactKind> {
    let key = a.bits() | b.bits();
    PAIR_TABLE
        .iter()
        .find(|(pair, _)| *pair == key)
        .map(|(_, kind)| *kind)
}

/// A new contact between two bodies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContactEvent {
    pub a: Category,
    pub b: Category,
    /// The static body involved
    pub body: BodyId,
}

impl ContactEvent {
    /// True if either side is the given category
    pub fn involves(&self, category: Category) -> bool {
        self.a == category || self.b == category
    }

    pub fn kind(&self) -> Option<ContactKind> {
        pair_kind(self.a, self.b)
    }
}

/// Bodies the player was touching after the previous substep
#[derive(Debug, Clone, Default)]
pub struct ContactTracker {
    touching: BTreeSet<BodyId>,
}

impl ContactTracker {
    pub fn is_touching(&self, id: BodyId) -> bool {
        self.touching.contains(&id)
    }

    pub fn clear(&mut self) {
        self.touching.clear();
    }
}

/// Result of a box-box collision check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether the boxes strictly overlap
    pub hit: bool,
    /// Direction to push the player out (unit axis)
    pub normal: Vec2,
    /// Penetration depth along `normal`
    pub penetration: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            normal: Vec2::ZERO,
            penetration: 0.0,
        }
    }
}

/// Check the player box against a static box and find the shallowest way out
pub fn box_collision(player: &Aabb, body: &Aabb) -> CollisionResult {
    let overlap = player.overlap(body);
    if overlap.x <= CONTACT_EPSILON || overlap.y <= CONTACT_EPSILON {
        return CollisionResult::miss();
    }

    let delta = player.center - body.center;
    if overlap.y <= overlap.x {
        // Ties go vertical so landing on a corner lands
        let dir = if delta.y >= 0.0 { 1.0 } else { -1.0 };
        CollisionResult {
            hit: true,
            normal: Vec2::new(0.0, dir),
            penetration: overlap.y,
        }
    } else {
        let dir = if delta.x >= 0.0 { 1.0 } else { -1.0 };
        CollisionResult {
            hit: true,
            normal: Vec2::new(dir, 0.0),
            penetration: overlap.x,
        }
    }
}

/// Push the player out of solid bodies and report new contacts.
///
/// Ground is resolved before walls, so a player resting on a surface is
/// lifted clear of the wall flush with that surface's top.
pub fn resolve_contacts<'a>(
    player: &mut PlayerBody,
    bodies: impl IntoIterator<Item = &'a StaticBody>,
    tracker: &mut ContactTracker,
) -> Vec<ContactEvent> {
    let mut events = Vec::new();
    if !player.physics_enabled {
        tracker.clear();
        return events;
    }

    let mut bodies: Vec<&StaticBody> = bodies.into_iter().collect();
    bodies.sort_by_key(|b| (b.category != Category::Ground, b.id));

    let mut touching = BTreeSet::new();
    for body in bodies {
        let bits = body.category.bits();
        let reports =
            player.contact_mask & bits != 0 || body.contact_mask & CATEGORY_PLAYER != 0;
        let solid = player.collision_mask & bits != 0;

        let result = box_collision(&player.rect(), &body.rect);
        if result.hit && solid {
            player.pos += result.normal * result.penetration;
            // Cancel velocity into the surface
            let into = player.vel.dot(result.normal);
            if into < 0.0 {
                player.vel -= result.normal * into;
            }
        }

        if !reports {
            continue;
        }
        let was_touching = tracker.is_touching(body.id);
        if result.hit && !was_touching {
            events.push(ContactEvent {
                a: Category::Player,
                b: body.category,
                body: body.id,
            });
        }
        if result.hit || (was_touching && player.rect().touches(&body.rect, CONTACT_SLOP)) {
            touching.insert(body.id);
        }
    }
    tracker.touching = touching;
    events
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player_at(x: f32, y: f32) -> PlayerBody {
        PlayerBody::new(Vec2::new(x, y), Vec2::splat(32.0), x)
    }

    fn ground(id: BodyId, x: f32, top: f32) -> StaticBody {
        StaticBody::new(
            id,
            Category::Ground,
            Aabb::new(Vec2::new(x, top - 12.0), Vec2::new(60.0, 24.0)),
        )
    }

    fn wall(id: BodyId, x: f32, top: f32) -> StaticBody {
        StaticBody::new(
            id,
            Category::Wall,
            Aabb::new(Vec2::new(x, top / 2.0), Vec2::new(2.0, top)),
        )
    }

    #[test]
    fn test_pair_table() {
        assert_eq!(
            pair_kind(Category::Player, Category::Ground),
            Some(ContactKind::Landing)
        );
        assert_eq!(
            pair_kind(Category::Wall, Category::Player),
            Some(ContactKind::Fatal)
        );
        assert_eq!(pair_kind(Category::Ground, Category::Wall), None);
    }

    #[test]
    fn test_landing_pushes_up_and_fires_once() {
        let floor = ground(1, 100.0, 100.0);
        let mut tracker = ContactTracker::default();

        // Player bottom 4px into the surface, falling
        let mut player = player_at(100.0, 112.0);
        player.vel.y = -200.0;
        let events = resolve_contacts(&mut player, [&floor], &mut tracker);
        assert_eq!(events.len(), 1);
        assert!(events[0].involves(Category::Ground));
        assert!((player.pos.y - 116.0).abs() < 1e-4);
        assert_eq!(player.vel.y, 0.0);

        // Resting contact: sinks slightly again, no new event
        player.pos.y -= 0.05;
        let events = resolve_contacts(&mut player, [&floor], &mut tracker);
        assert!(events.is_empty());
        assert!(tracker.is_touching(1));
    }

    #[test]
    fn test_relanding_fires_again() {
        let floor = ground(1, 100.0, 100.0);
        let mut tracker = ContactTracker::default();
        let mut player = player_at(100.0, 114.0);
        assert_eq!(resolve_contacts(&mut player, [&floor], &mut tracker).len(), 1);

        // Jump clear of the surface
        player.pos.y = 160.0;
        assert!(resolve_contacts(&mut player, [&floor], &mut tracker).is_empty());
        assert!(!tracker.is_touching(1));

        player.pos.y = 115.0;
        assert_eq!(resolve_contacts(&mut player, [&floor], &mut tracker).len(), 1);
    }

    #[test]
    fn test_flush_wall_does_not_fire_when_running_flat() {
        // Two equal-height segments; the second one's wall sits flush with its top
        let a = ground(1, 70.0, 100.0);
        let b = ground(2, 130.0, 100.0);
        let w = wall(3, 99.0, 100.0);
        let mut tracker = ContactTracker::default();
        let mut player = player_at(100.0, 115.5);
        let events = resolve_contacts(&mut player, [&w, &a, &b], &mut tracker);
        assert!(events.iter().all(|e| !e.involves(Category::Wall)));
    }

    #[test]
    fn test_running_into_wall_is_fatal() {
        let tall = ground(1, 130.0, 200.0);
        let w = wall(2, 99.0, 200.0);
        let mut tracker = ContactTracker::default();
        // Player low, overlapping the side of the tall segment
        let mut player = player_at(88.0, 60.0);
        let events = resolve_contacts(&mut player, [&tall, &w], &mut tracker);
        assert!(
            events
                .iter()
                .any(|e| e.kind() == Some(ContactKind::Fatal))
        );
        // Pushed back to the left
        assert!(player.pos.x < 88.0);
    }

    #[test]
    fn test_dead_player_has_no_contacts() {
        let floor = ground(1, 100.0, 100.0);
        let mut tracker = ContactTracker::default();
        let mut player = player_at(100.0, 110.0);
        player.kill();
        assert!(resolve_contacts(&mut player, [&floor], &mut tracker).is_empty());
        assert_eq!(player.pos.y, 110.0);
    }
}
