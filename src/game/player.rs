//! Player entity

use rand::Rng;

use super::combat::DamageOutcome;
use super::constants::{
    KILL_BOUNTY, MUZZLE_OFFSET, PLAYER_MAX_HEALTH, PLAYER_RADIUS, POLICE_BOUNTY,
    RESPAWN_DELAY_MS, SPAWN_MARGIN, WANTED_ON_KILL, WANTED_ON_POLICE_KILL, WORLD_HEIGHT,
    WORLD_WIDTH,
};
use super::ids::PlayerId;
use super::physics::PhysicsSystem;
use super::wanted::{Escalation, WantedLevel};

/// Player state (authoritative)
#[derive(Debug, Clone)]
pub struct Player {
    pub id: PlayerId,

    // Position and movement
    pub x: f64,
    pub y: f64,
    pub angle: f64,
    pub speed: f64,
    pub radius: f64,

    // Combat
    pub health: f64,
    pub max_health: f64,
    pub alive: bool,
    /// Unix ms after which a dead player comes back
    pub respawn_ready_at: u64,

    // Progression
    pub money: u64,
    pub wanted: WantedLevel,
    pub kills: u32,
    pub deaths: u32,
}

/// What a tick did to a player
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayerTick {
    pub respawned: bool,
    pub wanted_decayed: bool,
}

impl Player {
    pub fn new(id: PlayerId, x: f64, y: f64, now: u64) -> Self {
        let (x, y) = PhysicsSystem::clamp_to_world(x, y, PLAYER_RADIUS);
        Self {
            id,
            x,
            y,
            angle: 0.0,
            speed: 0.0,
            radius: PLAYER_RADIUS,
            health: PLAYER_MAX_HEALTH,
            max_health: PLAYER_MAX_HEALTH,
            alive: true,
            respawn_ready_at: 0,
            money: 0,
            wanted: WantedLevel::new(now),
            kills: 0,
            deaths: 0,
        }
    }

    /// Pick a uniformly random point inside the spawn inset
    pub fn random_spawn_point<R: Rng>(rng: &mut R) -> (f64, f64) {
        (
            rng.gen_range(SPAWN_MARGIN..WORLD_WIDTH - SPAWN_MARGIN),
            rng.gen_range(SPAWN_MARGIN..WORLD_HEIGHT - SPAWN_MARGIN),
        )
    }

    /// Respawn when the timer has run out, then let the wanted level decay
    pub fn update_tick<R: Rng>(&mut self, now: u64, rng: &mut R) -> PlayerTick {
        let mut tick = PlayerTick::default();

        if !self.alive && now >= self.respawn_ready_at {
            self.respawn(rng);
            tick.respawned = true;
        }

        tick.wanted_decayed = self.wanted.decay(now);
        tick
    }

    /// Apply damage to this player. Attacker bookkeeping (wanted escalation,
    /// kill credit) is done by the world, which can see both parties.
    pub fn take_damage(&mut self, amount: f64, now: u64) -> DamageOutcome {
        if !self.alive {
            return DamageOutcome::Ignored;
        }

        self.health = (self.health - amount).max(0.0);
        if self.health <= 0.0 {
            self.die(now);
            DamageOutcome::Died
        } else {
            DamageOutcome::Survived
        }
    }

    /// Death transition. Returns true if this cleared a non-zero wanted level.
    pub fn die(&mut self, now: u64) -> bool {
        self.alive = false;
        self.health = 0.0;
        self.deaths += 1;
        self.respawn_ready_at = now + RESPAWN_DELAY_MS;
        self.wanted.reset(now)
    }

    /// Reward for killing another player
    pub fn credit_kill(&mut self, now: u64) -> Escalation {
        self.kills += 1;
        self.money += KILL_BOUNTY;
        self.wanted.escalate(WANTED_ON_KILL, now)
    }

    /// Reward for killing a police unit
    pub fn credit_police_kill(&mut self, now: u64) -> Escalation {
        self.money += POLICE_BOUNTY;
        self.wanted.escalate(WANTED_ON_POLICE_KILL, now)
    }

    pub fn respawn<R: Rng>(&mut self, rng: &mut R) {
        let (x, y) = Self::random_spawn_point(rng);
        self.alive = true;
        self.health = self.max_health;
        self.speed = 0.0;
        self.x = x;
        self.y = y;
    }

    /// Accept a client-reported position, clamped to the world
    pub fn apply_move(&mut self, x: f64, y: f64, angle: f64, speed: f64) {
        let (x, y) = PhysicsSystem::clamp_to_world(x, y, self.radius);
        self.x = x;
        self.y = y;
        self.angle = angle;
        self.speed = speed;
    }

    /// Where a bullet fired along `angle` appears
    pub fn muzzle(&self, angle: f64) -> (f64, f64) {
        (
            self.x + angle.cos() * MUZZLE_OFFSET,
            self.y + angle.sin() * MUZZLE_OFFSET,
        )
    }
}
