//! Broadcast snapshots and aggregate throttling

use std::collections::BTreeMap;

use crate::ws::protocol::{BulletView, PlayerUpdate, PlayerView, PoliceView, ServerMsg};

use super::combat::Bullet;
use super::ids::PlayerId;
use super::player::Player;
use super::police::PoliceUnit;

impl From<&Player> for PlayerView {
    fn from(p: &Player) -> Self {
        Self {
            id: p.id,
            x: p.x,
            y: p.y,
            angle: p.angle,
            speed: p.speed,
            health: p.health,
            max_health: p.max_health,
            is_alive: p.alive,
            money: p.money,
            wanted: p.wanted.level(),
            kills: p.kills,
            deaths: p.deaths,
        }
    }
}

impl From<&Player> for PlayerUpdate {
    fn from(p: &Player) -> Self {
        Self {
            id: p.id,
            x: p.x,
            y: p.y,
            angle: p.angle,
            speed: p.speed,
            health: p.health,
            is_alive: p.alive,
        }
    }
}

impl From<&Bullet> for BulletView {
    fn from(b: &Bullet) -> Self {
        Self {
            id: b.id,
            owner: b.owner,
            x: b.x,
            y: b.y,
            angle: b.angle,
        }
    }
}

impl From<&PoliceUnit> for PoliceView {
    fn from(u: &PoliceUnit) -> Self {
        Self {
            id: u.id,
            x: u.x,
            y: u.y,
            angle: u.angle,
            health: u.health,
            is_alive: u.alive,
            target_id: u.target,
        }
    }
}

/// Read-only view of the world at the end of a tick
#[derive(Debug, Clone, Default)]
pub struct GameSnapshot {
    pub tick: u64,
    pub game_time: u64,
    pub players: BTreeMap<PlayerId, PlayerView>,
    pub bullets: Vec<BulletView>,
    pub police: Vec<PoliceView>,
}

impl GameSnapshot {
    pub fn capture<'a>(
        tick: u64,
        game_time: u64,
        players: impl IntoIterator<Item = &'a Player>,
        bullets: &[Bullet],
        police: &[PoliceUnit],
    ) -> Self {
        Self {
            tick,
            game_time,
            players: players.into_iter().map(|p| (p.id, PlayerView::from(p))).collect(),
            bullets: bullets.iter().map(BulletView::from).collect(),
            police: police.iter().map(PoliceView::from).collect(),
        }
    }

    /// Full tables for a joining client
    pub fn to_game_state(&self) -> ServerMsg {
        ServerMsg::GameState {
            players: self.players.clone(),
            bullets: self.bullets.clone(),
            police: self.police.clone(),
            game_time: self.game_time,
        }
    }

    /// Throttled aggregate for all clients
    pub fn to_aggregate(&self) -> ServerMsg {
        ServerMsg::GameUpdate {
            tick: self.tick,
            players: self.players.clone(),
            police: self.police.clone(),
            bullet_count: self.bullets.len(),
        }
    }
}

/// Decides which ticks carry an aggregate update
pub struct AggregateThrottle {
    /// Tick counter since last aggregate
    ticks_since_send: u32,
    /// Aggregate interval in ticks
    interval: u32,
}

impl AggregateThrottle {
    pub fn new(interval: u32) -> Self {
        Self {
            ticks_since_send: 0,
            interval: interval.max(1),
        }
    }

    /// Count a tick; true on every Nth call
    pub fn should_send(&mut self) -> bool {
        self.ticks_since_send += 1;
        if self.ticks_since_send >= self.interval {
            self.ticks_since_send = 0;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::ids::ActorId;
    use uuid::Uuid;

    #[test]
    fn throttle_fires_every_nth_tick() {
        let mut throttle = AggregateThrottle::new(10);
        let fired: Vec<u32> = (1..=30).filter(|_| throttle.should_send()).collect();
        assert_eq!(fired, vec![10, 20, 30]);
    }

    #[test]
    fn zero_interval_means_every_tick() {
        let mut throttle = AggregateThrottle::new(0);
        assert!(throttle.should_send());
        assert!(throttle.should_send());
    }

    #[test]
    fn aggregate_reports_bullet_count() {
        let player = Player::new(Uuid::from_u128(1), 100.0, 100.0, 0);
        let bullets = vec![
            Bullet::player_shot(Uuid::from_u128(10), player.id, 0.0, 0.0, 0.0),
            Bullet::player_shot(Uuid::from_u128(11), player.id, 0.0, 0.0, 0.0),
        ];
        let snapshot = GameSnapshot::capture(7, 1234, [&player], &bullets, &[]);

        match snapshot.to_aggregate() {
            ServerMsg::GameUpdate { tick, players, police, bullet_count } => {
                assert_eq!(tick, 7);
                assert_eq!(players.len(), 1);
                assert!(police.is_empty());
                assert_eq!(bullet_count, 2);
            }
            other => panic!("unexpected {:?}", other),
        }

        match snapshot.to_game_state() {
            ServerMsg::GameState { bullets, game_time, .. } => {
                assert_eq!(game_time, 1234);
                assert_eq!(bullets[0].owner, ActorId::Player(player.id));
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
