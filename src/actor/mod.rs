//! Actors - the things that live, think and die in the arena
//!
//! An actor never changes itself. Each tick its [`Brain`] looks at a
//! [`ThinkContext`] and returns an [`ActorRequest`]; the world decides what
//! that request actually does.

pub mod human;
pub mod zombie;

use crate::core::config::{KindProfile, SteeringConfig};
use crate::core::error::Result;
use crate::core::types::{ActorId, ActorKind, ActorMode, ActorStatus, Point, Step};
use serde::{Deserialize, Serialize};

pub use human::HumanBrain;
pub use zombie::ZombieBrain;

/// What an actor chases
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Target {
    Actor(ActorId),
    Point(Point),
}

/// The one thing an actor asks the world to do this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ActorRequest {
    /// Relative unit step
    Move(Step),
    /// Absolute heading in degrees
    Turn(f64),
    Attack(ActorId),
    NoOp,
}

/// Read-only picture of an actor, as seen by others
///
/// This is also the shape sent to the decision service.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActorView {
    pub id: ActorId,
    pub kind: ActorKind,
    pub x: i32,
    pub y: i32,
    pub heading: f64,
    pub health: u32,
    pub status: ActorStatus,
}

impl ActorView {
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn is_alive(&self) -> bool {
        self.status == ActorStatus::Alive
    }

    pub fn distance_to(&self, other: &ActorView) -> f64 {
        self.position().distance(&other.position())
    }
}

/// Source of wander destinations
pub trait PointSource {
    fn pick_point(&mut self) -> Point;
}

/// Everything a brain may look at while deciding
pub struct ThinkContext<'a> {
    pub me: ActorView,
    /// Other actors within perception range, in world order
    pub visible: &'a [ActorView],
    /// Every actor in the world, in world order
    pub roster: &'a [ActorView],
    pub profile: &'a KindProfile,
    pub steering: &'a SteeringConfig,
    /// Decision gathered from the decision service for this actor, if any
    pub remote: Option<ActorRequest>,
}

impl ThinkContext<'_> {
    pub fn lookup(&self, id: ActorId) -> Option<&ActorView> {
        self.roster.iter().find(|view| view.id == id)
    }
}

/// The decision capability every actor variant implements
pub trait Think {
    /// Called at most once per tick, and never for a dead actor
    fn think(&mut self, ctx: &ThinkContext<'_>, points: &mut dyn PointSource) -> Result<ActorRequest>;

    /// Mode after the last call to `think`
    fn mode(&self) -> ActorMode;
}

/// Tagged actor variants
#[derive(Debug, Clone)]
pub enum Brain {
    Zombie(ZombieBrain),
    Human(HumanBrain),
}

impl Brain {
    pub fn for_kind(kind: ActorKind) -> Self {
        match kind {
            ActorKind::Zombie => Brain::Zombie(ZombieBrain::new()),
            ActorKind::Human => Brain::Human(HumanBrain::new()),
        }
    }

    pub fn kind(&self) -> ActorKind {
        match self {
            Brain::Zombie(_) => ActorKind::Zombie,
            Brain::Human(_) => ActorKind::Human,
        }
    }

    pub fn target(&self) -> Option<Target> {
        match self {
            Brain::Zombie(brain) => brain.target(),
            Brain::Human(_) => None,
        }
    }
}

impl Think for Brain {
    fn think(&mut self, ctx: &ThinkContext<'_>, points: &mut dyn PointSource) -> Result<ActorRequest> {
        match self {
            Brain::Zombie(brain) => brain.think(ctx, points),
            Brain::Human(brain) => brain.think(ctx, points),
        }
    }

    fn mode(&self) -> ActorMode {
        match self {
            Brain::Zombie(brain) => brain.mode(),
            Brain::Human(brain) => brain.mode(),
        }
    }
}

/// Description of an actor to be added to the world
#[derive(Debug, Clone)]
pub struct ActorSpec {
    pub kind: ActorKind,
    pub name: Option<String>,
    /// Requested starting cell. `None` lets the world pick a free one.
    pub position: Option<Point>,
    pub heading: f64,
}

impl ActorSpec {
    pub fn zombie() -> Self {
        Self {
            kind: ActorKind::Zombie,
            name: None,
            position: None,
            heading: 0.0,
        }
    }

    pub fn human(name: impl Into<String>) -> Self {
        Self {
            kind: ActorKind::Human,
            name: Some(name.into()),
            position: None,
            heading: 0.0,
        }
    }

    pub fn at(mut self, position: Point) -> Self {
        self.position = Some(position);
        self
    }

    pub fn facing(mut self, heading: f64) -> Self {
        self.heading = heading;
        self
    }
}

/// An actor owned by the world
///
/// Fields are only writable inside the crate; the world is the sole
/// mutator.
#[derive(Debug, Clone)]
pub struct Actor {
    pub(crate) id: ActorId,
    pub(crate) position: Point,
    pub(crate) heading: f64,
    pub(crate) health: u32,
    pub(crate) status: ActorStatus,
    pub(crate) name: Option<String>,
    pub(crate) brain: Brain,
}

impl Actor {
    pub(crate) fn new(id: ActorId, spec: ActorSpec, position: Point, health: u32) -> Self {
        Self {
            id,
            position,
            heading: crate::core::geometry::normalize_heading(spec.heading),
            health,
            status: ActorStatus::Alive,
            name: spec.name,
            brain: Brain::for_kind(spec.kind),
        }
    }

    pub fn id(&self) -> ActorId {
        self.id
    }

    pub fn kind(&self) -> ActorKind {
        self.brain.kind()
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn heading(&self) -> f64 {
        self.heading
    }

    pub fn health(&self) -> u32 {
        self.health
    }

    pub fn status(&self) -> ActorStatus {
        self.status
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn is_alive(&self) -> bool {
        self.status == ActorStatus::Alive
    }

    pub fn target(&self) -> Option<Target> {
        self.brain.target()
    }

    pub fn mode(&self) -> ActorMode {
        if self.is_alive() {
            self.brain.mode()
        } else {
            ActorMode::Dead
        }
    }

    pub fn view(&self) -> ActorView {
        ActorView {
            id: self.id,
            kind: self.kind(),
            x: self.position.x,
            y: self.position.y,
            heading: self.heading,
            health: self.health,
            status: self.status,
        }
    }
}
