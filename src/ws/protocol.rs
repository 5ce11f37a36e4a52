//! WebSocket protocol message definitions
//! These are the wire types for client-server communication

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::game::ids::{ActorId, EntityId, PlayerId};

/// Messages sent from client to server
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientMsg {
    /// Client-side movement result for this frame
    PlayerMove {
        x: f64,
        y: f64,
        /// Facing in radians
        angle: f64,
        speed: f64,
    },

    /// Fire the equipped weapon
    PlayerShoot {
        /// Aim direction in radians
        angle: f64,
    },

    /// Chat line
    ChatMessage { message: String },
}

impl ClientMsg {
    /// Reject payloads carrying NaN or infinite numbers
    pub fn is_well_formed(&self) -> bool {
        match self {
            ClientMsg::PlayerMove { x, y, angle, speed } => {
                [x, y, angle, speed].iter().all(|v| v.is_finite())
            }
            ClientMsg::PlayerShoot { angle } => angle.is_finite(),
            ClientMsg::ChatMessage { .. } => true,
        }
    }
}

/// Messages sent from server to client
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ServerMsg {
    /// Welcome message after connection
    #[serde(rename_all = "camelCase")]
    Welcome { player_id: PlayerId, server_time: u64 },

    /// Full world tables, sent once to a newly joined player
    #[serde(rename_all = "camelCase")]
    GameState {
        players: BTreeMap<PlayerId, PlayerView>,
        bullets: Vec<BulletView>,
        police: Vec<PoliceView>,
        game_time: u64,
    },

    PlayerJoined { player: PlayerView },

    #[serde(rename_all = "camelCase")]
    PlayerLeft { player_id: PlayerId },

    /// Movement relayed to the other players
    PlayerUpdate(PlayerUpdate),

    BulletFired(BulletView),

    #[serde(rename_all = "camelCase")]
    BulletRemoved { bullet_id: EntityId },

    #[serde(rename_all = "camelCase")]
    PlayerHit {
        player_id: PlayerId,
        attacker_id: ActorId,
        damage: f64,
        /// Health after the hit
        health: f64,
        died: bool,
    },

    #[serde(rename_all = "camelCase")]
    PlayerDied {
        player_id: PlayerId,
        killer_id: ActorId,
        /// Killer's kill count after this death (0 for police)
        kills: u32,
    },

    #[serde(rename_all = "camelCase")]
    PoliceKilled { police_id: EntityId, killer_id: PlayerId },

    #[serde(rename_all = "camelCase")]
    WantedLevelChanged { player_id: PlayerId, wanted_level: u8 },

    #[serde(rename_all = "camelCase")]
    ChatMessage {
        player_id: PlayerId,
        message: String,
        /// Server time (unix ms)
        timestamp: u64,
    },

    /// Throttled aggregate of all players and police
    #[serde(rename_all = "camelCase")]
    GameUpdate {
        /// Simulation tick the aggregate was taken at
        tick: u64,
        players: BTreeMap<PlayerId, PlayerView>,
        police: Vec<PoliceView>,
        bullet_count: usize,
    },
}

/// Player as seen by clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerView {
    pub id: PlayerId,
    pub x: f64,
    pub y: f64,
    pub angle: f64,
    pub speed: f64,
    pub health: f64,
    pub max_health: f64,
    pub is_alive: bool,
    pub money: u64,
    pub wanted: u8,
    pub kills: u32,
    pub deaths: u32,
}

/// Movement relay payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerUpdate {
    pub id: PlayerId,
    pub x: f64,
    pub y: f64,
    pub angle: f64,
    pub speed: f64,
    pub health: f64,
    pub is_alive: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulletView {
    pub id: EntityId,
    pub owner: ActorId,
    pub x: f64,
    pub y: f64,
    pub angle: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoliceView {
    pub id: EntityId,
    pub x: f64,
    pub y: f64,
    pub angle: f64,
    pub health: f64,
    pub is_alive: bool,
    pub target_id: PlayerId,
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn parses_client_messages() {
        let msg: ClientMsg =
            serde_json::from_str(r#"{"type":"playerMove","x":1.5,"y":2,"angle":0.3,"speed":4}"#)
                .unwrap();
        assert!(matches!(msg, ClientMsg::PlayerMove { x, .. } if x == 1.5));

        let msg: ClientMsg = serde_json::from_str(r#"{"type":"playerShoot","angle":1}"#).unwrap();
        assert!(matches!(msg, ClientMsg::PlayerShoot { .. }));

        let msg: ClientMsg =
            serde_json::from_str(r#"{"type":"chatMessage","message":"hi"}"#).unwrap();
        assert!(matches!(msg, ClientMsg::ChatMessage { message } if message == "hi"));
    }

    #[test]
    fn rejects_unknown_or_malformed() {
        assert!(serde_json::from_str::<ClientMsg>(r#"{"type":"teleport"}"#).is_err());
        assert!(serde_json::from_str::<ClientMsg>(r#"{"type":"playerShoot"}"#).is_err());
    }

    #[test]
    fn non_finite_numbers_are_not_well_formed() {
        let msg = ClientMsg::PlayerMove {
            x: f64::NAN,
            y: 0.0,
            angle: 0.0,
            speed: 0.0,
        };
        assert!(!msg.is_well_formed());
        assert!(!ClientMsg::PlayerShoot { angle: f64::INFINITY }.is_well_formed());
        assert!(ClientMsg::PlayerShoot { angle: 0.5 }.is_well_formed());
    }

    #[test]
    fn server_messages_use_camel_case_tags_and_fields() {
        let msg = ServerMsg::PlayerHit {
            player_id: Uuid::from_u128(1),
            attacker_id: ActorId::Player(Uuid::from_u128(2)),
            damage: 25.0,
            health: 75.0,
            died: false,
        };
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["type"], "playerHit");
        assert_eq!(json["playerId"], Uuid::from_u128(1).to_string());
        assert_eq!(json["attackerId"]["kind"], "player");

        let json = serde_json::to_value(ServerMsg::GameUpdate {
            tick: 42,
            players: BTreeMap::new(),
            police: Vec::new(),
            bullet_count: 3,
        })
        .unwrap();
        assert_eq!(json["type"], "gameUpdate");
        assert_eq!(json["bulletCount"], 3);
        assert_eq!(json["tick"], 42);
    }
}
