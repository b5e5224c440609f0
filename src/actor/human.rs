//! Externally driven actors
//!
//! The decision itself is made off-process. By the time `think` runs, the
//! simulation loop has already gathered this tick's answer into the context;
//! a missing answer (timeout, transport failure) means rest.

use crate::actor::{ActorRequest, PointSource, Think, ThinkContext};
use crate::core::error::Result;
use crate::core::types::ActorMode;

#[derive(Debug, Clone, Default)]
pub struct HumanBrain {
    mode: ActorMode,
}

impl HumanBrain {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Think for HumanBrain {
    fn think(&mut self, ctx: &ThinkContext<'_>, _points: &mut dyn PointSource) -> Result<ActorRequest> {
        let request = ctx.remote.unwrap_or(ActorRequest::NoOp);
        self.mode = match request {
            ActorRequest::Attack(_) => ActorMode::Attacking,
            ActorRequest::Move(_) | ActorRequest::Turn(_) => ActorMode::Targeting,
            ActorRequest::NoOp => ActorMode::Idle,
        };
        Ok(request)
    }

    fn mode(&self) -> ActorMode {
        self.mode
    }
}
