//! Game simulation modules

pub mod combat;
pub mod constants;
pub mod ids;
pub mod physics;
pub mod player;
pub mod police;
pub mod server;
pub mod snapshot;
pub mod wanted;
pub mod world;

pub use server::{GameServer, ServerHandle};
pub use world::World;

use crate::ws::protocol::{ClientMsg, ServerMsg};
use ids::PlayerId;

/// Session activity forwarded from a WebSocket to the simulation loop
#[derive(Debug, Clone)]
pub struct PlayerInput {
    pub player_id: PlayerId,
    pub event: SessionEvent,
}

#[derive(Debug, Clone)]
pub enum SessionEvent {
    Connected,
    Message(ClientMsg),
    Disconnected,
}

/// Who should receive an outbound message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Audience {
    All,
    AllExcept(PlayerId),
    Only(PlayerId),
}

impl Audience {
    pub fn includes(&self, player_id: PlayerId) -> bool {
        match *self {
            Audience::All => true,
            Audience::AllExcept(excluded) => excluded != player_id,
            Audience::Only(target) => target == player_id,
        }
    }
}

/// A server message addressed to a set of sessions
#[derive(Debug, Clone)]
pub struct Outbound {
    pub audience: Audience,
    pub msg: ServerMsg,
}

impl Outbound {
    pub fn all(msg: ServerMsg) -> Self {
        Self {
            audience: Audience::All,
            msg,
        }
    }

    pub fn all_except(player_id: PlayerId, msg: ServerMsg) -> Self {
        Self {
            audience: Audience::AllExcept(player_id),
            msg,
        }
    }

    pub fn only(player_id: PlayerId, msg: ServerMsg) -> Self {
        Self {
            audience: Audience::Only(player_id),
            msg,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn audience_filtering() {
        let a = Uuid::from_u128(1);
        let b = Uuid::from_u128(2);

        assert!(Audience::All.includes(a));
        assert!(!Audience::AllExcept(a).includes(a));
        assert!(Audience::AllExcept(a).includes(b));
        assert!(Audience::Only(a).includes(a));
        assert!(!Audience::Only(a).includes(b));
    }
}
