//! Wire format for the decision service
//!
//! One POST per externally driven actor per tick, carrying what the actor
//! can see. The service answers with a single action.

use crate::actor::{ActorRequest, ActorView};
use crate::core::error::{BrainsError, Result};
use crate::core::types::{ActorId, Step, Tick};
use ahash::AHashMap;
use serde::{Deserialize, Serialize};

/// Body sent to the decision service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionRequest {
    pub tick: Tick,
    /// The actor being driven
    pub actor: ActorView,
    /// Other actors within its perception radius, in world order
    pub visible: Vec<ActorView>,
}

/// Body returned by the decision service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Decision {
    Move { dx: i64, dy: i64 },
    Turn { heading: f64 },
    Attack { target: ActorId },
    #[serde(rename = "noop")]
    NoOp,
}

impl Decision {
    /// Check the decision against the request domain
    pub fn into_request(self) -> Result<ActorRequest> {
        match self {
            Decision::Move { dx, dy } => Step::new(dx, dy)
                .map(ActorRequest::Move)
                .ok_or_else(|| BrainsError::Decision(format!("step ({}, {}) is not a unit step", dx, dy))),
            Decision::Turn { heading } if heading.is_finite() => Ok(ActorRequest::Turn(heading)),
            Decision::Turn { heading } => Err(BrainsError::Decision(format!("heading {} is not finite", heading))),
            Decision::Attack { target } => Ok(ActorRequest::Attack(target)),
            Decision::NoOp => Ok(ActorRequest::NoOp),
        }
    }
}

/// Requests gathered for one tick, keyed by actor
///
/// Actors without an entry rest.
#[derive(Debug, Clone, Default)]
pub struct RemoteDecisions {
    requests: AHashMap<ActorId, ActorRequest>,
    failures: usize,
}

impl RemoteDecisions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, actor: ActorId, request: ActorRequest) {
        self.requests.insert(actor, request);
    }

    /// Record that an actor's call failed; it rests this tick
    pub fn record_failure(&mut self, actor: ActorId) {
        self.requests.insert(actor, ActorRequest::NoOp);
        self.failures += 1;
    }

    pub fn get(&self, actor: ActorId) -> Option<ActorRequest> {
        self.requests.get(&actor).copied()
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    pub fn failures(&self) -> usize {
        self.failures
    }
}
