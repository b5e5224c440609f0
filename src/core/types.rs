//! Core type definitions used throughout the codebase

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for actors
///
/// Drawn from the world's seeded RNG so that a seeded run hands out the
/// same ids every time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActorId(pub Uuid);

impl ActorId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Build an id from an RNG (version 4 layout)
    pub fn from_rng<R: Rng>(rng: &mut R) -> Self {
        Self(uuid::Builder::from_random_bytes(rng.gen()).into_uuid())
    }

    /// Key used by the persistence store
    pub fn key(&self) -> String {
        self.0.to_string()
    }
}

impl Default for ActorId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Simulation tick counter
pub type Tick = u64;

/// Integer position in the arena
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Self) -> f64 {
        let dx = f64::from(self.x) - f64::from(other.x);
        let dy = f64::from(self.y) - f64::from(other.y);
        (dx * dx + dy * dy).sqrt()
    }

    /// True when both axes are within `reach` of `other`
    ///
    /// This is a square catchment, not a circle.
    pub fn near(&self, other: &Self, reach: i32) -> bool {
        (self.x - other.x).abs() <= reach && (self.y - other.y).abs() <= reach
    }

    pub fn offset(&self, step: Step) -> Self {
        Self {
            x: self.x + i32::from(step.dx()),
            y: self.y + i32::from(step.dy()),
        }
    }
}

/// Occupancy cells are unit points
pub type Cell = Point;

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// One unit step in one of the eight directions (or none)
///
/// Both components are always in `{-1, 0, 1}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Step {
    dx: i8,
    dy: i8,
}

impl Step {
    pub const NONE: Step = Step { dx: 0, dy: 0 };

    /// Returns `None` unless both components are in `{-1, 0, 1}`
    pub fn new(dx: i64, dy: i64) -> Option<Self> {
        if (-1..=1).contains(&dx) && (-1..=1).contains(&dy) {
            Some(Self {
                dx: dx as i8,
                dy: dy as i8,
            })
        } else {
            None
        }
    }

    pub fn dx(&self) -> i8 {
        self.dx
    }

    pub fn dy(&self) -> i8 {
        self.dy
    }

    pub fn is_none(&self) -> bool {
        self.dx == 0 && self.dy == 0
    }
}

/// Actor kind, used by the renderer to pick sprites and layers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActorKind {
    Zombie,
    Human,
}

impl fmt::Display for ActorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActorKind::Zombie => f.write_str("zombie"),
            ActorKind::Human => f.write_str("human"),
        }
    }
}

/// Life status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActorStatus {
    Alive,
    Dead,
}

/// What an actor was doing on its last tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActorMode {
    #[default]
    Idle,
    Wandering,
    Targeting,
    Attacking,
    Dead,
}
