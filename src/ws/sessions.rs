//! Registry of open WebSocket sessions

use dashmap::DashMap;

use crate::game::ids::PlayerId;
use crate::util::time::unix_millis;

#[derive(Debug, Clone, Copy)]
pub struct SessionInfo {
    pub connected_at: u64,
}

impl SessionInfo {
    /// Milliseconds the session has been open at `now`
    pub fn duration_ms(&self, now: u64) -> u64 {
        now.saturating_sub(self.connected_at)
    }
}

/// Open sessions keyed by player id
#[derive(Default)]
pub struct SessionRegistry {
    sessions: DashMap<PlayerId, SessionInfo>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, player_id: PlayerId) {
        self.sessions.insert(
            player_id,
            SessionInfo {
                connected_at: unix_millis(),
            },
        );
    }

    pub fn unregister(&self, player_id: &PlayerId) -> Option<SessionInfo> {
        self.sessions.remove(player_id).map(|(_, info)| info)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn register_and_unregister() {
        let registry = SessionRegistry::new();
        let id = Uuid::from_u128(1);

        registry.register(id);
        assert_eq!(registry.len(), 1);

        let info = registry.unregister(&id).unwrap();
        assert!(info.connected_at > 0);
        assert_eq!(registry.len(), 0);
        assert!(registry.unregister(&id).is_none());
    }

    #[test]
    fn duration_saturates_on_clock_skew() {
        let info = SessionInfo { connected_at: 5_000 };
        assert_eq!(info.duration_ms(7_500), 2_500);
        assert_eq!(info.duration_ms(1_000), 0);
    }
}
