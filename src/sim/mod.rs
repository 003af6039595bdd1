//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Host-supplied time only
//! - Seeded (or injected) randomness only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod body;
pub mod collision;
pub mod jump;
pub mod physics;
pub mod progress;
pub mod snapshot;
pub mod state;
pub mod terrain;
pub mod tick;

pub use body::{Aabb, BodyId, Category, PlayerBody, PlayerPose, StaticBody};
pub use collision::{ContactEvent, ContactKind, ContactTracker, pair_kind, resolve_contacts};
pub use jump::{JumpKind, JumpState};
pub use progress::Progression;
pub use snapshot::{PlayerSprite, RenderSnapshot, SegmentSprite};
pub use state::{DeathCause, GameEvent, GameWorld, RunState};
pub use terrain::{HeightSource, SeededRandom, Segment, TerrainGenerator};
pub use tick::{TickInput, tick};
