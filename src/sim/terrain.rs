//! Procedural terrain
//!
//! Each generation tick spawns one segment past the right edge of the frame:
//! a ground surface, undercroft fill beneath it, and an obstacle wall on its
//! leading edge. Heights either repeat the previous segment's ("escape
//! height") or are redrawn, so the terrain comes in learnable runs.

use std::ops::Range;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::body::{Aabb, Category, IdAllocator, StaticBody};
use crate::consts::HEIGHT_RANGE_FACTOR;
use crate::settings::{Frame, Settings};

/// Obstacle wall thickness (px)
pub const WALL_WIDTH: f32 = 2.0;
/// Gap between the wall and the surface's left edge (px)
pub const WALL_GAP: f32 = 0.01;

/// Randomness consumed by terrain generation
pub trait HeightSource {
    /// Whether the next segment gets a freshly drawn height
    fn reroll(&mut self) -> bool;

    /// Uniform draw from `range`
    fn draw(&mut self, range: Range<u32>) -> u32;
}

/// Seeded PCG source (the default)
#[derive(Debug, Clone)]
pub struct SeededRandom {
    rng: Pcg32,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
        }
    }
}

impl HeightSource for SeededRandom {
    fn reroll(&mut self) -> bool {
        self.rng.random_bool(0.5)
    }

    fn draw(&mut self, range: Range<u32>) -> u32 {
        if range.is_empty() {
            return range.start;
        }
        self.rng.random_range(range)
    }
}

/// One spawned unit of terrain
#[derive(Debug, Clone)]
pub struct Segment {
    pub id: u32,
    /// Surface centre height
    pub height: f32,
    pub surface: StaticBody,
    /// Centres of the undercroft fill tiles (visual only)
    pub fill: Vec<Vec2>,
    /// Runway tiles carry no wall
    pub wall: Option<StaticBody>,
    /// Distance scrolled so far
    pub travelled: f32,
    /// Distance after which the segment despawns
    pub travel_limit: f32,
}

impl Segment {
    /// Current horizontal centre
    #[inline]
    pub fn x(&self) -> f32 {
        self.surface.rect.center.x
    }

    /// Top of the ground surface
    #[inline]
    pub fn top(&self) -> f32 {
        self.surface.rect.max().y
    }

    /// Left edge of the surface
    #[inline]
    pub fn left(&self) -> f32 {
        self.surface.rect.min().x
    }

    /// Move left by `distance`
    pub fn scroll(&mut self, distance: f32) {
        self.surface.shift_x(-distance);
        if let Some(wall) = &mut self.wall {
            wall.shift_x(-distance);
        }
        for tile in &mut self.fill {
            tile.x -= distance;
        }
        self.travelled += distance;
    }

    /// True once the segment has covered its travel distance
    pub fn expired(&self) -> bool {
        self.travelled >= self.travel_limit
    }

    /// Collidable bodies of this segment
    pub fn bodies(&self) -> impl Iterator<Item = &StaticBody> {
        std::iter::once(&self.surface).chain(self.wall.iter())
    }
}

/// Number of runway tiles needed to cover the frame at start
pub fn runway_tile_count(frame: &Frame, settings: &Settings) -> usize {
    (settings.runway_margin_tiles + frame.width / settings.ground_tile.x).floor() as usize
}

/// Flat, wall-less ground laid along the bottom of the frame at start
pub fn runway(frame: &Frame, settings: &Settings, ids: &mut IdAllocator) -> Vec<Segment> {
    let tile = settings.ground_tile;
    (0..runway_tile_count(frame, settings))
        .map(|i| {
            let x = i as f32 * tile.x;
            let height = tile.y / 2.0;
            let id = ids.next_id();
            Segment {
                id,
                height,
                surface: StaticBody::new(
                    ids.next_id(),
                    Category::Ground,
                    Aabb::new(Vec2::new(x, height), tile),
                ),
                fill: Vec::new(),
                wall: None,
                travelled: 0.0,
                // Fully past the left boundary
                travel_limit: x + tile.x,
            }
        })
        .collect()
}

/// Spawns segments with bounded local height variation
pub struct TerrainGenerator {
    source: Box<dyn HeightSource>,
    escape_height: Option<u32>,
}

impl std::fmt::Debug for TerrainGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TerrainGenerator")
            .field("escape_height", &self.escape_height)
            .finish_non_exhaustive()
    }
}

impl TerrainGenerator {
    pub fn new(source: Box<dyn HeightSource>) -> Self {
        Self {
            source,
            escape_height: None,
        }
    }

    /// Height of the previously generated segment
    pub fn escape_height(&self) -> Option<u32> {
        self.escape_height
    }

    /// Pick the next segment height from [base, 4 * base)
    pub fn next_height(&mut self, base: u32) -> u32 {
        let base = base.max(1);
        let upper = base * HEIGHT_RANGE_FACTOR;
        let reroll = self.source.reroll();
        let height = match self.escape_height {
            Some(previous) if !reroll => previous,
            // No previous segment: always draw
            _ => self.source.draw(base..upper),
        };
        let height = height.clamp(base, upper - 1);
        self.escape_height = Some(height);
        height
    }

    /// Build the next segment just past the right edge of the frame
    pub fn generate(&mut self, frame: &Frame, settings: &Settings, ids: &mut IdAllocator) -> Segment {
        let tile = settings.ground_tile;
        let height = self.next_height(frame.base_height()) as f32;
        let x = frame.width + tile.x * settings.spawn_margin_tiles;

        let surface = StaticBody::new(
            ids.next_id(),
            Category::Ground,
            Aabb::new(Vec2::new(x, height), tile),
        );

        let fill_h = settings.fill_tile_height;
        let fill_count = (1.0 + height / fill_h).floor() as usize;
        let fill = (0..fill_count)
            .map(|i| Vec2::new(x, height - tile.y * 0.5 - (i as f32 + 0.5) * fill_h))
            .collect();

        let wall = StaticBody::new(
            ids.next_id(),
            Category::Wall,
            Aabb::new(
                Vec2::new(
                    x - tile.x / 2.0 - WALL_GAP,
                    height / 2.0 + tile.y / 2.0,
                ),
                Vec2::new(WALL_WIDTH, height),
            ),
        );

        let id = ids.next_id();
        log::debug!("Spawned segment {} at height {}", id, height);
        Segment {
            id,
            height,
            surface,
            fill,
            wall: Some(wall),
            travelled: 0.0,
            travel_limit: frame.width + tile.x * settings.travel_margin_tiles,
        }
    }
}
