//! Combat system - bullets, hit detection, player push-apart

use std::collections::BTreeMap;

use super::constants::{BULLET_LIFETIME_TICKS, BULLET_RADIUS, BULLET_SPEED};
use super::ids::{ActorId, EntityId, PlayerId};
use super::physics::PhysicsSystem;
use super::player::Player;
use super::police::PoliceUnit;

/// Outcome of applying damage to a player or police unit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Target was already dead, nothing changed
    Ignored,
    Survived,
    Died,
}

impl DamageOutcome {
    pub fn died(&self) -> bool {
        matches!(self, DamageOutcome::Died)
    }
}

/// Active bullet in the world
#[derive(Debug, Clone)]
pub struct Bullet {
    pub id: EntityId,
    pub owner: ActorId,
    pub x: f64,
    pub y: f64,
    pub angle: f64,
    pub speed: f64,
    pub damage: f64,
    pub radius: f64,
    /// Ticks left before the bullet expires
    pub life: u32,
}

impl Bullet {
    pub fn new(id: EntityId, owner: ActorId, x: f64, y: f64, angle: f64, damage: f64) -> Self {
        Self {
            id,
            owner,
            x,
            y,
            angle,
            speed: BULLET_SPEED,
            damage,
            radius: BULLET_RADIUS,
            life: BULLET_LIFETIME_TICKS,
        }
    }

    /// Move one step and burn one tick of lifetime.
    /// Returns false once the bullet has expired or is outside the world.
    pub fn advance(&mut self) -> bool {
        let was_inside = PhysicsSystem::in_world(self.x, self.y);

        self.x += self.angle.cos() * self.speed;
        self.y += self.angle.sin() * self.speed;
        self.life = self.life.saturating_sub(1);

        was_inside && PhysicsSystem::in_world(self.x, self.y) && self.life > 0
    }

    /// Find the player this bullet hits, if any.
    ///
    /// Any alive player other than the shooter can be hit, whether the bullet
    /// came from a player or from police.
    pub fn find_player_hit(&self, players: &BTreeMap<PlayerId, Player>) -> Option<PlayerId> {
        players
            .values()
            .filter(|p| p.alive && ActorId::Player(p.id) != self.owner)
            .find(|p| self.touches(p.x, p.y, p.radius))
            .map(|p| p.id)
    }

    /// Find the police unit this bullet hits. Police bullets never hit police.
    pub fn find_police_hit(&self, police: &[PoliceUnit]) -> Option<usize> {
        if self.owner.is_police() {
            return None;
        }

        police
            .iter()
            .position(|unit| unit.alive && self.touches(unit.x, unit.y, unit.radius))
    }

    fn touches(&self, x: f64, y: f64, radius: f64) -> bool {
        PhysicsSystem::check_collision(self.x, self.y, self.radius, x, y, radius)
    }
}

/// Push apart every overlapping pair of alive players, then re-clamp both to
/// the world. Returns the number of pairs moved.
pub fn resolve_player_collisions(players: &mut BTreeMap<PlayerId, Player>) -> usize {
    let ids: Vec<PlayerId> = players
        .values()
        .filter(|p| p.alive)
        .map(|p| p.id)
        .collect();

    let mut resolved = 0;
    for i in 0..ids.len() {
        for j in (i + 1)..ids.len() {
            let (Some(a), Some(b)) = (players.get(&ids[i]), players.get(&ids[j])) else {
                continue;
            };
            if !PhysicsSystem::check_collision(a.x, a.y, a.radius, b.x, b.y, b.radius) {
                continue;
            }

            let Some(((x1, y1), (x2, y2))) =
                PhysicsSystem::resolve_collision(a.x, a.y, a.radius, b.x, b.y, b.radius)
            else {
                continue;
            };

            if let Some(a) = players.get_mut(&ids[i]) {
                (a.x, a.y) = PhysicsSystem::clamp_to_world(x1, y1, a.radius);
            }
            if let Some(b) = players.get_mut(&ids[j]) {
                (b.x, b.y) = PhysicsSystem::clamp_to_world(x2, y2, b.radius);
            }
            resolved += 1;
        }
    }

    resolved
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::constants::{BULLET_DAMAGE, POLICE_DAMAGE, WORLD_WIDTH};
    use std::f64::consts::PI;
    use uuid::Uuid;

    impl Bullet {
        /// A bullet fired by a player, with the standard weapon damage
        pub(crate) fn player_shot(
            id: EntityId,
            owner: PlayerId,
            x: f64,
            y: f64,
            angle: f64,
        ) -> Self {
            Self::new(id, ActorId::Player(owner), x, y, angle, BULLET_DAMAGE)
        }
    }

    fn id(n: u128) -> Uuid {
        Uuid::from_u128(n)
    }

    fn players_at(positions: &[(u128, f64, f64)]) -> BTreeMap<PlayerId, Player> {
        positions
            .iter()
            .map(|&(n, x, y)| (id(n), Player::new(id(n), x, y, 0)))
            .collect()
    }

    #[test]
    fn inward_bullet_lives_exactly_its_lifetime() {
        let mut bullet = Bullet::player_shot(id(1), id(2), 200.0, 600.0, 0.0);
        for step in 1..BULLET_LIFETIME_TICKS {
            assert!(bullet.advance(), "expired early at step {}", step);
        }
        assert!(!bullet.advance());
        assert_eq!(bullet.life, 0);
    }

    #[test]
    fn out_of_bounds_bullet_removed_regardless_of_lifetime() {
        let mut bullet = Bullet::player_shot(id(1), id(2), 1601.0, 600.0, PI);
        assert_eq!(bullet.life, BULLET_LIFETIME_TICKS);
        assert!(!bullet.advance());

        let mut bullet = Bullet::player_shot(id(1), id(2), WORLD_WIDTH - 5.0, 600.0, 0.0);
        assert!(!bullet.advance());
    }

    #[test]
    fn bullet_skips_its_owner() {
        let players = players_at(&[(2, 100.0, 100.0)]);
        let bullet = Bullet::player_shot(id(1), id(2), 100.0, 100.0, 0.0);
        assert_eq!(bullet.find_player_hit(&players), None);
    }

    #[test]
    fn bullet_hits_other_alive_player() {
        let mut players = players_at(&[(2, 100.0, 100.0), (3, 110.0, 100.0)]);
        let bullet = Bullet::player_shot(id(1), id(2), 105.0, 100.0, 0.0);
        assert_eq!(bullet.find_player_hit(&players), Some(id(3)));

        players.get_mut(&id(3)).unwrap().die(0);
        assert_eq!(bullet.find_player_hit(&players), None);
    }

    #[test]
    fn police_bullets_hit_players_not_police() {
        let players = players_at(&[(2, 100.0, 100.0)]);
        let unit = PoliceUnit::new(id(9), id(2), 100.0, 100.0);
        let bullet = Bullet::new(id(1), ActorId::Police(id(8)), 100.0, 100.0, 0.0, POLICE_DAMAGE);

        assert_eq!(bullet.find_player_hit(&players), Some(id(2)));
        assert_eq!(bullet.find_police_hit(&[unit]), None);
    }

    #[test]
    fn player_bullets_hit_police() {
        let unit = PoliceUnit::new(id(9), id(2), 300.0, 300.0);
        let bullet = Bullet::player_shot(id(1), id(2), 310.0, 300.0, 0.0);
        assert_eq!(bullet.find_police_hit(&[unit]), Some(0));
    }

    #[test]
    fn push_apart_is_idempotent() {
        let mut players = players_at(&[(1, 100.0, 100.0), (2, 110.0, 100.0), (3, 500.0, 500.0)]);

        assert_eq!(resolve_player_collisions(&mut players), 1);
        assert_eq!((players[&id(1)].x, players[&id(2)].x), (90.0, 120.0));

        let before: Vec<(f64, f64)> = players.values().map(|p| (p.x, p.y)).collect();
        assert_eq!(resolve_player_collisions(&mut players), 0);
        let after: Vec<(f64, f64)> = players.values().map(|p| (p.x, p.y)).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn dead_players_are_not_pushed() {
        let mut players = players_at(&[(1, 100.0, 100.0), (2, 110.0, 100.0)]);
        players.get_mut(&id(2)).unwrap().die(0);
        assert_eq!(resolve_player_collisions(&mut players), 0);
        assert_eq!(players[&id(1)].x, 100.0);
    }

    #[test]
    fn push_apart_respects_world_edge() {
        let mut players = players_at(&[(1, 15.0, 600.0), (2, 20.0, 600.0)]);
        resolve_player_collisions(&mut players);
        assert!(players[&id(1)].x >= 15.0);
        assert!(players[&id(2)].x <= WORLD_WIDTH - 15.0);
    }
}
