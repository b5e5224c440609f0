//! Events generated during a world update
//!
//! Returned by [`World::update`](crate::world::World::update) for logging
//! and tests. Nothing in the simulation reacts to them.

use crate::core::types::{ActorId, Cell, Tick};

/// Result of a move request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    Moved { from: Cell, to: Cell },
    /// Contention or the arena edge; the actor stays put this tick
    Blocked(BlockReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockReason {
    Occupied(ActorId),
    OutOfBounds,
}

/// Result of an attack attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttackOutcome {
    Hit { damage: u32, remaining: u32, killed: bool },
    /// Target dead or out of range. Not an error.
    Missed,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TickEvent {
    Moved {
        actor: ActorId,
        from: Cell,
        to: Cell,
    },
    /// The move was refused; the actor rested
    Blocked {
        actor: ActorId,
        cell: Cell,
        reason: BlockReason,
    },
    Turned {
        actor: ActorId,
        heading: f64,
    },
    Attacked {
        attacker: ActorId,
        target: ActorId,
        damage: u32,
        killed: bool,
    },
    Missed {
        attacker: ActorId,
        target: ActorId,
    },
    Rested {
        actor: ActorId,
    },
    /// The actor's step failed and it was skipped this tick
    Fault {
        actor: ActorId,
        reason: String,
    },
}

impl TickEvent {
    pub fn actor(&self) -> ActorId {
        match self {
            TickEvent::Moved { actor, .. }
            | TickEvent::Blocked { actor, .. }
            | TickEvent::Turned { actor, .. }
            | TickEvent::Rested { actor }
            | TickEvent::Fault { actor, .. } => *actor,
            TickEvent::Attacked { attacker, .. } | TickEvent::Missed { attacker, .. } => *attacker,
        }
    }
}

/// Per-tick counts, logged by the loop
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickSummary {
    pub tick: Tick,
    pub moved: usize,
    pub blocked: usize,
    pub turned: usize,
    pub rested: usize,
    pub hits: usize,
    pub misses: usize,
    pub kills: usize,
    pub faults: usize,
    pub decision_failures: usize,
    pub saved: usize,
}

impl TickSummary {
    pub fn from_events(tick: Tick, events: &[TickEvent]) -> Self {
        let mut summary = Self {
            tick,
            ..Self::default()
        };
        for event in events {
            match event {
                TickEvent::Moved { .. } => summary.moved += 1,
                TickEvent::Blocked { .. } => summary.blocked += 1,
                TickEvent::Turned { .. } => summary.turned += 1,
                TickEvent::Rested { .. } => summary.rested += 1,
                TickEvent::Attacked { killed, .. } => {
                    summary.hits += 1;
                    if *killed {
                        summary.kills += 1;
                    }
                }
                TickEvent::Missed { .. } => summary.misses += 1,
                TickEvent::Fault { .. } => summary.faults += 1,
            }
        }
        summary
    }
}
