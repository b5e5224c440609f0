//! Persisted actor record
//!
//! This is the whole contract with the renderer. Field names and value
//! domains must not change without the renderer changing too.

use crate::actor::Actor;
use crate::core::error::Result;
use crate::core::types::{ActorId, ActorKind, ActorMode, ActorStatus};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ActorRecord {
    pub id: ActorId,
    pub kind: ActorKind,
    pub status: ActorStatus,
    pub x: i32,
    pub y: i32,
    /// Degrees in `[0, 360)`
    pub heading: f64,
    pub health: u32,
    #[serde(default)]
    pub name: Option<String>,
    /// Pose hint for the renderer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<ActorMode>,
}

impl ActorRecord {
    pub fn key(&self) -> String {
        self.id.key()
    }

    pub fn encode(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn decode(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }
}

impl From<&Actor> for ActorRecord {
    fn from(actor: &Actor) -> Self {
        let position = actor.position();
        Self {
            id: actor.id(),
            kind: actor.kind(),
            status: actor.status(),
            x: position.x,
            y: position.y,
            heading: actor.heading(),
            health: actor.health(),
            name: actor.name().map(str::to_owned),
            mode: Some(actor.mode()),
        }
    }
}
