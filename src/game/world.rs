//! Authoritative world state and the per-tick simulation steps

use std::collections::BTreeMap;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use crate::ws::protocol::{BulletView, ClientMsg, PlayerUpdate, PlayerView, ServerMsg};

use super::combat::{resolve_player_collisions, Bullet, DamageOutcome};
use super::constants::{
    BULLET_DAMAGE, CHAT_MAX_CHARS, POLICE_PER_WANTED_LEVEL, POLICE_SPAWN_BATCH, WANTED_ON_HIT,
};
use super::ids::{ActorId, EntityId, IdSource, PlayerId};
use super::player::Player;
use super::police::{PoliceAction, PoliceUnit};
use super::snapshot::GameSnapshot;
use super::wanted::Escalation;
use super::Outbound;

/// All players, bullets and police, plus the messages their changes produce.
///
/// Only the simulation loop holds a `World`; every mutation goes through the
/// methods below and every observable change is queued in the outbox.
pub struct World {
    players: BTreeMap<PlayerId, Player>,
    bullets: Vec<Bullet>,
    police: Vec<PoliceUnit>,
    rng: ChaCha8Rng,
    ids: Box<dyn IdSource>,
    tick: u64,
    outbox: Vec<Outbound>,
}

impl World {
    pub fn new(seed: u64, ids: Box<dyn IdSource>) -> Self {
        Self {
            players: BTreeMap::new(),
            bullets: Vec::new(),
            police: Vec::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
            ids,
            tick: 0,
            outbox: Vec::new(),
        }
    }

    pub fn players(&self) -> &BTreeMap<PlayerId, Player> {
        &self.players
    }

    pub fn player(&self, id: &PlayerId) -> Option<&Player> {
        self.players.get(id)
    }

    pub fn bullets(&self) -> &[Bullet] {
        &self.bullets
    }

    pub fn police(&self) -> &[PoliceUnit] {
        &self.police
    }

    /// Take every message queued since the last drain, in emission order
    pub fn drain_outbox(&mut self) -> Vec<Outbound> {
        std::mem::take(&mut self.outbox)
    }

    pub fn snapshot(&self, now: u64) -> GameSnapshot {
        GameSnapshot::capture(self.tick, now, self.players.values(), &self.bullets, &self.police)
    }

    // ------------------------------------------------------------------
    // Session handling
    // ------------------------------------------------------------------

    /// Create a player for a new connection
    pub fn add_player(&mut self, id: PlayerId, now: u64) -> bool {
        if self.players.contains_key(&id) {
            debug!(player_id = %id, "Player already in world");
            return false;
        }

        let (x, y) = Player::random_spawn_point(&mut self.rng);
        let player = Player::new(id, x, y, now);
        let view = PlayerView::from(&player);
        self.players.insert(id, player);

        let state = self.snapshot(now).to_game_state();
        self.outbox.push(Outbound::only(id, state));
        self.outbox
            .push(Outbound::all_except(id, ServerMsg::PlayerJoined { player: view }));

        info!(player_id = %id, player_count = self.players.len(), "Player joined");
        true
    }

    /// Remove a disconnected player. Police chasing them stand down next tick.
    pub fn remove_player(&mut self, id: PlayerId) -> bool {
        if self.players.remove(&id).is_none() {
            return false;
        }

        self.outbox
            .push(Outbound::all(ServerMsg::PlayerLeft { player_id: id }));

        info!(player_id = %id, player_count = self.players.len(), "Player left");
        true
    }

    /// Apply one inbound client message. Invalid input is dropped.
    pub fn handle_message(&mut self, id: PlayerId, msg: ClientMsg, now: u64) {
        if !msg.is_well_formed() {
            debug!(player_id = %id, "Dropping malformed message");
            return;
        }

        let accepted = match msg {
            ClientMsg::PlayerMove { x, y, angle, speed } => {
                self.move_player(id, x, y, angle, speed)
            }
            ClientMsg::PlayerShoot { angle } => self.shoot(id, angle).is_some(),
            ClientMsg::ChatMessage { message } => self.chat(id, &message, now),
        };

        if !accepted {
            debug!(player_id = %id, "Ignored message for missing or dead player");
        }
    }

    pub fn move_player(&mut self, id: PlayerId, x: f64, y: f64, angle: f64, speed: f64) -> bool {
        let Some(player) = self.players.get_mut(&id).filter(|p| p.alive) else {
            return false;
        };

        player.apply_move(x, y, angle, speed);
        let update = PlayerUpdate::from(&*player);
        self.outbox
            .push(Outbound::all_except(id, ServerMsg::PlayerUpdate(update)));
        true
    }

    pub fn shoot(&mut self, id: PlayerId, angle: f64) -> Option<EntityId> {
        let (x, y) = self
            .players
            .get(&id)
            .filter(|p| p.alive)
            .map(|p| p.muzzle(angle))?;

        Some(self.spawn_bullet(ActorId::Player(id), x, y, angle, BULLET_DAMAGE))
    }

    pub fn chat(&mut self, id: PlayerId, message: &str, now: u64) -> bool {
        if !self.players.contains_key(&id) {
            return false;
        }

        let message: String = message.trim().chars().take(CHAT_MAX_CHARS).collect();
        if message.is_empty() {
            return false;
        }

        self.outbox.push(Outbound::all(ServerMsg::ChatMessage {
            player_id: id,
            message,
            timestamp: now,
        }));
        true
    }

    // ------------------------------------------------------------------
    // Tick
    // ------------------------------------------------------------------

    /// Advance the world by one tick and return the resulting snapshot.
    ///
    /// Bullets move before any hit test so a fresh bullet travels its full
    /// step first, and players are pushed apart before bullets are tested so
    /// hits use final positions.
    pub fn tick(&mut self, now: u64) -> GameSnapshot {
        self.tick += 1;

        self.update_players(now);
        self.update_police(now);
        self.advance_bullets();
        resolve_player_collisions(&mut self.players);
        self.resolve_bullet_hits(now);

        self.snapshot(now)
    }

    fn update_players(&mut self, now: u64) {
        let mut decayed = Vec::new();

        for player in self.players.values_mut() {
            let outcome = player.update_tick(now, &mut self.rng);
            if outcome.respawned {
                debug!(player_id = %player.id, x = player.x, y = player.y, "Player respawned");
            }
            if outcome.wanted_decayed {
                decayed.push((player.id, player.wanted.level()));
            }
        }

        for (id, level) in decayed {
            self.push_wanted_changed(id, level);
        }
    }

    fn update_police(&mut self, now: u64) {
        let players = &self.players;
        let mut shots = Vec::new();

        self.police.retain_mut(|unit| match unit.advance(players, now) {
            PoliceAction::Deactivated => {
                debug!(police_id = %unit.id, target = %unit.target, "Police unit stood down");
                false
            }
            PoliceAction::Hold => true,
            PoliceAction::Fire(shot) => {
                shots.push((unit.id, shot));
                true
            }
        });

        for (police_id, shot) in shots {
            self.spawn_bullet(ActorId::Police(police_id), shot.x, shot.y, shot.angle, shot.damage);
        }
    }

    fn advance_bullets(&mut self) {
        let mut expired = Vec::new();

        self.bullets.retain_mut(|bullet| {
            let alive = bullet.advance();
            if !alive {
                expired.push(bullet.id);
            }
            alive
        });

        for bullet_id in expired {
            self.outbox
                .push(Outbound::all(ServerMsg::BulletRemoved { bullet_id }));
        }
    }

    fn resolve_bullet_hits(&mut self, now: u64) {
        let mut index = 0;
        while index < self.bullets.len() {
            if self.resolve_bullet(index, now) {
                let bullet = self.bullets.remove(index);
                self.outbox.push(Outbound::all(ServerMsg::BulletRemoved {
                    bullet_id: bullet.id,
                }));
            } else {
                index += 1;
            }
        }

        self.police.retain(|unit| unit.alive);
    }

    /// Test one bullet against players, then police. Returns true on a hit.
    fn resolve_bullet(&mut self, index: usize, now: u64) -> bool {
        let bullet = &self.bullets[index];
        let (owner, damage) = (bullet.owner, bullet.damage);

        if let Some(victim) = bullet.find_player_hit(&self.players) {
            self.damage_player(victim, owner, damage, now);
            return true;
        }

        if let ActorId::Player(shooter) = owner {
            if let Some(unit_index) = bullet.find_police_hit(&self.police) {
                self.damage_police(unit_index, shooter, damage, now);
                return true;
            }
        }

        false
    }

    fn spawn_bullet(
        &mut self,
        owner: ActorId,
        x: f64,
        y: f64,
        angle: f64,
        damage: f64,
    ) -> EntityId {
        let id = self.ids.next_id();
        let bullet = Bullet::new(id, owner, x, y, angle, damage);

        self.outbox
            .push(Outbound::all(ServerMsg::BulletFired(BulletView::from(&bullet))));
        self.bullets.push(bullet);
        id
    }

    // ------------------------------------------------------------------
    // Combat and wanted level
    // ------------------------------------------------------------------

    /// Apply damage to a player and settle the consequences for the attacker.
    ///
    /// A non-lethal hit by another player raises that player's wanted level by
    /// one; a kill credits a living killer (kills, bounty, +2 wanted) instead.
    pub fn damage_player(
        &mut self,
        victim_id: PlayerId,
        attacker: ActorId,
        amount: f64,
        now: u64,
    ) -> DamageOutcome {
        let Some(victim) = self.players.get_mut(&victim_id) else {
            return DamageOutcome::Ignored;
        };

        let wanted_before = victim.wanted.level();
        let outcome = victim.take_damage(amount, now);
        if outcome == DamageOutcome::Ignored {
            return outcome;
        }
        let health = victim.health;

        self.outbox.push(Outbound::all(ServerMsg::PlayerHit {
            player_id: victim_id,
            attacker_id: attacker,
            damage: amount,
            health,
            died: outcome.died(),
        }));

        // Any other connected player is blamed for a hit, even if a bullet
        // outlived its shooter; kill credit needs the shooter alive
        let culprit = attacker
            .player()
            .filter(|id| *id != victim_id && self.players.contains_key(id));

        if !outcome.died() {
            if let Some(culprit) = culprit {
                self.escalate(culprit, WANTED_ON_HIT, now);
            }
            return outcome;
        }

        // A kill replaces the hit escalation: the killer gets +2, not +1 and +2
        let credit = culprit.and_then(|id| {
            self.players
                .get_mut(&id)
                .filter(|killer| killer.alive)
                .map(|killer| (id, killer.credit_kill(now), killer.kills))
        });

        self.outbox.push(Outbound::all(ServerMsg::PlayerDied {
            player_id: victim_id,
            killer_id: attacker,
            kills: credit.map(|(_, _, kills)| kills).unwrap_or(0),
        }));

        info!(victim = %victim_id, killer = ?attacker, "Player killed");

        if wanted_before > 0 {
            self.push_wanted_changed(victim_id, 0);
        }
        if let Some((killer_id, escalation, _)) = credit {
            self.after_escalation(killer_id, escalation);
        }

        outcome
    }

    fn damage_police(&mut self, index: usize, shooter: PlayerId, amount: f64, now: u64) {
        let Some(unit) = self.police.get_mut(index) else {
            return;
        };

        if !unit.take_damage(amount).died() {
            return;
        }
        let police_id = unit.id;

        self.outbox.push(Outbound::all(ServerMsg::PoliceKilled {
            police_id,
            killer_id: shooter,
        }));

        info!(police_id = %police_id, killer = %shooter, "Police unit killed");

        if let Some(player) = self.players.get_mut(&shooter) {
            let escalation = player.credit_police_kill(now);
            self.after_escalation(shooter, escalation);
        }
    }

    /// Raise a player's wanted level, dispatching police when it is high enough
    pub fn escalate(&mut self, player_id: PlayerId, amount: u8, now: u64) {
        let Some(player) = self.players.get_mut(&player_id) else {
            return;
        };

        let escalation = player.wanted.escalate(amount, now);
        self.after_escalation(player_id, escalation);
    }

    fn after_escalation(&mut self, player_id: PlayerId, escalation: Escalation) {
        if escalation.changed() {
            self.push_wanted_changed(player_id, escalation.level);
        }
        if escalation.dispatch_police {
            self.dispatch_police(player_id);
        }
    }

    /// Spawn up to two units around a wanted player, keeping the number of
    /// units chasing them at or below twice their wanted level
    pub fn dispatch_police(&mut self, player_id: PlayerId) -> usize {
        let Some(player) = self.players.get(&player_id).filter(|p| p.alive) else {
            return 0;
        };
        let (px, py) = (player.x, player.y);
        let cap = player.wanted.level() as usize * POLICE_PER_WANTED_LEVEL;

        let active = self
            .police
            .iter()
            .filter(|unit| unit.alive && unit.target == player_id)
            .count();
        let to_spawn = cap.saturating_sub(active).min(POLICE_SPAWN_BATCH);

        for _ in 0..to_spawn {
            let (x, y) = PoliceUnit::dispatch_point(&mut self.rng, px, py);
            let id = self.ids.next_id();
            self.police.push(PoliceUnit::new(id, player_id, x, y));
        }

        if to_spawn > 0 {
            info!(
                player_id = %player_id,
                spawned = to_spawn,
                active = active + to_spawn,
                "Police dispatched"
            );
        }
        to_spawn
    }

    fn push_wanted_changed(&mut self, player_id: PlayerId, wanted_level: u8) {
        debug!(player_id = %player_id, wanted_level, "Wanted level changed");
        self.outbox.push(Outbound::all(ServerMsg::WantedLevelChanged {
            player_id,
            wanted_level,
        }));
    }
}
