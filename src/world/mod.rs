//! World - owns every actor and arbitrates what their requests do
//!
//! Actors are processed in insertion order each tick. Whoever moves into a
//! cell first claims it; later contenders in the same tick are blocked and
//! rest. Attacks that cannot land are silent misses.

pub mod events;
pub mod occupancy;

pub use events::{AttackOutcome, BlockReason, MoveOutcome, TickEvent, TickSummary};
pub use occupancy::Occupancy;

use crate::actor::{Actor, ActorRequest, ActorSpec, ActorView, PointSource, Think, ThinkContext};
use crate::core::config::ArenaConfig;
use crate::core::error::{BrainsError, Result};
use crate::core::geometry::normalize_heading;
use crate::core::types::{ActorId, ActorKind, ActorStatus, Cell, Point, Step, Tick};
use crate::decision::protocol::{DecisionRequest, RemoteDecisions};
use crate::persistence::{self, SnapshotStore};
use ahash::AHashMap;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Random picks tried before scanning for a free spawn cell
const SPAWN_ATTEMPTS: usize = 64;

/// Arena extent; valid cells are `[0, width) x [0, height)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub width: i32,
    pub height: i32,
}

impl Bounds {
    pub fn contains(&self, cell: Cell) -> bool {
        (0..self.width).contains(&cell.x) && (0..self.height).contains(&cell.y)
    }

    pub fn random_point<R: Rng>(&self, rng: &mut R) -> Point {
        Point::new(rng.gen_range(0..self.width), rng.gen_range(0..self.height))
    }
}

/// Wander destinations drawn from the world's RNG
struct Wander<'a> {
    bounds: Bounds,
    rng: &'a mut ChaCha8Rng,
}

impl PointSource for Wander<'_> {
    fn pick_point(&mut self) -> Point {
        self.bounds.random_point(&mut *self.rng)
    }
}

/// The arena
pub struct World {
    pub current_tick: Tick,
    bounds: Bounds,
    config: ArenaConfig,
    actors: AHashMap<ActorId, Actor>,
    /// Insertion order, used for every iteration
    order: Vec<ActorId>,
    occupancy: Occupancy,
    rng: ChaCha8Rng,
}

impl World {
    pub fn new(config: ArenaConfig) -> Self {
        let rng = match config.world.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self {
            current_tick: 0,
            bounds: Bounds {
                width: config.world.width,
                height: config.world.height,
            },
            config,
            actors: AHashMap::new(),
            order: Vec::new(),
            occupancy: Occupancy::new(),
            rng,
        }
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn config(&self) -> &ArenaConfig {
        &self.config
    }

    /// Add an actor and return its fresh id
    ///
    /// Fails if the requested cell is outside the arena or held by a live
    /// actor. Without a requested cell a random free one is used.
    pub fn add(&mut self, spec: ActorSpec) -> Result<ActorId> {
        let cell = match spec.position {
            Some(cell) => {
                if !self.bounds.contains(cell) {
                    return Err(BrainsError::OutOfBounds(cell));
                }
                if let Some(occupant) = self.occupancy.occupant(cell) {
                    return Err(BrainsError::CellOccupied { cell, occupant });
                }
                cell
            }
            None => self.free_cell()?,
        };

        let mut id = ActorId::from_rng(&mut self.rng);
        while self.actors.contains_key(&id) {
            id = ActorId::from_rng(&mut self.rng);
        }

        let kind = spec.kind;
        let health = self.config.profile(kind).max_health;
        self.occupancy.claim(cell, id)?;
        self.actors.insert(id, Actor::new(id, spec, cell, health));
        self.order.push(id);

        tracing::debug!("Added {} {} at {}", kind, id, cell);
        Ok(id)
    }

    /// Administrative removal; never happens during a tick
    pub fn remove(&mut self, id: ActorId) -> Option<Actor> {
        let actor = self.actors.remove(&id)?;
        self.order.retain(|other| *other != id);
        self.occupancy.release(actor.position, id);
        Some(actor)
    }

    fn free_cell(&mut self) -> Result<Cell> {
        for _ in 0..SPAWN_ATTEMPTS {
            let cell = self.bounds.random_point(&mut self.rng);
            if self.occupancy.is_free(cell) {
                return Ok(cell);
            }
        }
        (0..self.bounds.height)
            .flat_map(|y| (0..self.bounds.width).map(move |x| Point::new(x, y)))
            .find(|cell| self.occupancy.is_free(*cell))
            .ok_or(BrainsError::ArenaFull)
    }

    pub fn actor(&self, id: ActorId) -> Option<&Actor> {
        self.actors.get(&id)
    }

    /// Every actor, live or dead, in insertion order
    pub fn actors(&self) -> impl Iterator<Item = &Actor> + '_ {
        self.order.iter().filter_map(|id| self.actors.get(id))
    }

    pub fn actor_count(&self) -> usize {
        self.order.len()
    }

    pub fn living_count(&self) -> usize {
        self.actors().filter(|actor| actor.is_alive()).count()
    }

    pub fn occupant(&self, cell: Cell) -> Option<ActorId> {
        self.occupancy.occupant(cell)
    }

    pub fn occupancy(&self) -> &Occupancy {
        &self.occupancy
    }

    /// Uniformly random point inside the arena
    pub fn pick_point(&mut self) -> Point {
        self.bounds.random_point(&mut self.rng)
    }

    fn roster(&self) -> Vec<ActorView> {
        self.actors().map(Actor::view).collect()
    }

    /// Other actors (live or dead) within `viewer`'s perception radius
    fn visible_in(&self, viewer: &ActorView, roster: &[ActorView]) -> Vec<ActorView> {
        let radius = self.config.profile(viewer.kind).perception_radius;
        roster
            .iter()
            .filter(|other| other.id != viewer.id && viewer.distance_to(other) <= radius)
            .copied()
            .collect()
    }

    /// Visibility snapshot for one actor, in world order
    pub fn visible_to(&self, id: ActorId) -> Vec<ActorView> {
        let Some(actor) = self.actors.get(&id) else {
            return Vec::new();
        };
        self.visible_in(&actor.view(), &self.roster())
    }

    /// Decision requests for every live human-controlled actor
    ///
    /// Built from the state at the start of the tick.
    pub fn decision_requests(&self) -> Vec<DecisionRequest> {
        let roster = self.roster();
        roster
            .iter()
            .filter(|view| view.kind == ActorKind::Human && view.is_alive())
            .map(|view| DecisionRequest {
                tick: self.current_tick,
                actor: *view,
                visible: self.visible_in(view, &roster),
            })
            .collect()
    }

    /// Run one tick
    ///
    /// Each live actor, in insertion order, sees a fresh snapshot, thinks
    /// once, and has its request applied before the next actor thinks. A
    /// failing actor is logged and skipped; the others still run.
    pub fn update(&mut self, remote: &RemoteDecisions) -> Vec<TickEvent> {
        let mut events = Vec::with_capacity(self.order.len());
        let order = self.order.clone();

        for id in order {
            match self.step_actor(id, remote) {
                Ok(Some(event)) => {
                    tracing::trace!("{:?}", event);
                    events.push(event);
                }
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!("Actor {} skipped this tick: {}", id, e);
                    events.push(TickEvent::Fault {
                        actor: id,
                        reason: e.to_string(),
                    });
                }
            }
        }

        self.current_tick += 1;
        events
    }

    fn step_actor(&mut self, id: ActorId, remote: &RemoteDecisions) -> Result<Option<TickEvent>> {
        let roster = self.roster();
        let Some(me) = roster.iter().find(|view| view.id == id).copied() else {
            return Ok(None);
        };
        // Killed earlier this tick, or long ago
        if !me.is_alive() {
            return Ok(None);
        }
        let visible = self.visible_in(&me, &roster);

        let request = {
            let World {
                actors,
                config,
                bounds,
                rng,
                ..
            } = self;
            let actor = actors.get_mut(&id).ok_or(BrainsError::ActorNotFound(id))?;
            let ctx = ThinkContext {
                me,
                visible: &visible,
                roster: &roster,
                profile: config.profile(me.kind),
                steering: &config.steering,
                remote: remote.get(id),
            };
            let mut points = Wander {
                bounds: *bounds,
                rng,
            };
            actor.brain.think(&ctx, &mut points)?
        };

        self.apply(id, request).map(Some)
    }

    fn apply(&mut self, id: ActorId, request: ActorRequest) -> Result<TickEvent> {
        let event = match request {
            ActorRequest::Move(step) if step.is_none() => TickEvent::Rested { actor: id },
            ActorRequest::Move(step) => match self.move_actor(id, step)? {
                MoveOutcome::Moved { from, to } => TickEvent::Moved { actor: id, from, to },
                MoveOutcome::Blocked(reason) => {
                    let cell = self.actors.get(&id).map(Actor::position).unwrap_or_default();
                    TickEvent::Blocked {
                        actor: id,
                        cell: cell.offset(step),
                        reason,
                    }
                }
            },
            ActorRequest::Turn(heading) => TickEvent::Turned {
                actor: id,
                heading: self.turn_actor(id, heading)?,
            },
            ActorRequest::Attack(target) => match self.try_to_attack(id, target)? {
                AttackOutcome::Hit { damage, killed, .. } => TickEvent::Attacked {
                    attacker: id,
                    target,
                    damage,
                    killed,
                },
                AttackOutcome::Missed => TickEvent::Missed {
                    attacker: id,
                    target,
                },
            },
            ActorRequest::NoOp => TickEvent::Rested { actor: id },
        };
        Ok(event)
    }

    /// Move an actor one unit step
    ///
    /// A destination held by another live actor, or outside the arena, is
    /// not an error: the move is refused and nothing changes.
    pub fn move_actor(&mut self, id: ActorId, step: Step) -> Result<MoveOutcome> {
        let actor = self.actors.get(&id).ok_or(BrainsError::ActorNotFound(id))?;
        if !actor.is_alive() {
            return Err(BrainsError::ActorFault {
                actor: id,
                reason: "dead actors cannot move".into(),
            });
        }

        let from = actor.position;
        let to = from.offset(step);

        if !self.bounds.contains(to) {
            return Ok(MoveOutcome::Blocked(BlockReason::OutOfBounds));
        }
        if let Some(occupant) = self.occupancy.occupant(to) {
            if occupant != id {
                return Ok(MoveOutcome::Blocked(BlockReason::Occupied(occupant)));
            }
        }

        self.occupancy.relocate(id, from, to)?;
        if let Some(actor) = self.actors.get_mut(&id) {
            actor.position = to;
        }
        Ok(MoveOutcome::Moved { from, to })
    }

    /// Set an actor's heading; returns the normalized value
    pub fn turn_actor(&mut self, id: ActorId, heading: f64) -> Result<f64> {
        let actor = self.actors.get_mut(&id).ok_or(BrainsError::ActorNotFound(id))?;
        if !actor.is_alive() {
            return Err(BrainsError::ActorFault {
                actor: id,
                reason: "dead actors cannot turn".into(),
            });
        }
        actor.heading = normalize_heading(heading);
        Ok(actor.heading)
    }

    /// Attack `target` with the attacker's kind profile
    ///
    /// Lands only on a live target within range. Anything else is a miss,
    /// which changes nothing. Unknown ids are errors.
    pub fn try_to_attack(&mut self, attacker: ActorId, target: ActorId) -> Result<AttackOutcome> {
        let (from, kind, alive) = {
            let actor = self.actors.get(&attacker).ok_or(BrainsError::ActorNotFound(attacker))?;
            (actor.position, actor.kind(), actor.is_alive())
        };
        let profile = self.config.profile(kind);
        let (range, damage) = (profile.attack_range, profile.damage);

        let victim = self.actors.get_mut(&target).ok_or(BrainsError::ActorNotFound(target))?;
        if !alive || attacker == target || !victim.is_alive() || from.distance(&victim.position) > range {
            return Ok(AttackOutcome::Missed);
        }

        victim.health = victim.health.saturating_sub(damage);
        let killed = victim.health == 0;
        let cell = victim.position;
        let remaining = victim.health;
        if killed {
            victim.status = ActorStatus::Dead;
            // Corpses stay for rendering but no longer hold their cell
            self.occupancy.release(cell, target);
            tracing::info!("{} killed {}", attacker, target);
        }

        Ok(AttackOutcome::Hit {
            damage,
            remaining,
            killed,
        })
    }

    /// Push every actor's record to the store
    pub fn save<S: SnapshotStore + ?Sized>(&self, store: &mut S) -> Result<usize> {
        persistence::save_actors(self.actors(), store)
    }
}
