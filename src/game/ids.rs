//! Identity types and id allocation

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Player id, allocated per WebSocket connection
pub type PlayerId = Uuid;

/// Id of a server-spawned entity (bullet or police unit)
pub type EntityId = Uuid;

/// Who owns a bullet or dealt damage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum ActorId {
    Player(PlayerId),
    Police(EntityId),
}

impl ActorId {
    pub fn player(&self) -> Option<PlayerId> {
        match self {
            ActorId::Player(id) => Some(*id),
            ActorId::Police(_) => None,
        }
    }

    pub fn is_police(&self) -> bool {
        matches!(self, ActorId::Police(_))
    }
}

/// Source of ids for bullets and police units
pub trait IdSource: Send {
    fn next_id(&mut self) -> EntityId;
}

/// Random v4 UUIDs
#[derive(Debug, Default)]
pub struct RandomIds;

impl IdSource for RandomIds {
    fn next_id(&mut self) -> EntityId {
        Uuid::new_v4()
    }
}

/// Monotonic counter rendered as a UUID, for reproducible runs
#[derive(Debug, Default)]
pub struct SequentialIds {
    next: u128,
}

impl IdSource for SequentialIds {
    fn next_id(&mut self) -> EntityId {
        self.next += 1;
        Uuid::from_u128(self.next)
    }
}
