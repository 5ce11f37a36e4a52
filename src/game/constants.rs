//! World rules shared with the browser client.
//!
//! These values must stay in lockstep with `static/client.js`, which renders
//! bullets and the minimap using the same numbers.

/// World size
pub const WORLD_WIDTH: f64 = 1600.0;
pub const WORLD_HEIGHT: f64 = 1200.0;

/// Inset used for respawn and police placement
pub const SPAWN_MARGIN: f64 = 50.0;

// Player
pub const PLAYER_RADIUS: f64 = 15.0;
pub const PLAYER_MAX_HEALTH: f64 = 100.0;
pub const RESPAWN_DELAY_MS: u64 = 5_000;
pub const KILL_BOUNTY: u64 = 100;
/// Distance in front of the shooter at which a bullet appears
pub const MUZZLE_OFFSET: f64 = 20.0;

// Bullet
pub const BULLET_RADIUS: f64 = 3.0;
pub const BULLET_SPEED: f64 = 10.0;
pub const BULLET_DAMAGE: f64 = 25.0;
/// 2 seconds at 60 ticks per second
pub const BULLET_LIFETIME_TICKS: u32 = 120;

// Wanted level
pub const WANTED_MAX: u8 = 5;
pub const WANTED_DECAY_MS: u64 = 30_000;
/// Level at which escalation starts dispatching police
pub const WANTED_POLICE_THRESHOLD: u8 = 2;
pub const WANTED_ON_HIT: u8 = 1;
pub const WANTED_ON_KILL: u8 = 2;
pub const WANTED_ON_POLICE_KILL: u8 = 1;

// Police
pub const POLICE_MAX_HEALTH: f64 = 75.0;
pub const POLICE_SPEED: f64 = 4.0;
pub const POLICE_RADIUS: f64 = 15.0;
pub const POLICE_AGGRO_RADIUS: f64 = 300.0;
pub const POLICE_SHOOT_RADIUS: f64 = 150.0;
/// Police stop closing in once this near their target
pub const POLICE_STOP_DISTANCE: f64 = 80.0;
pub const POLICE_SHOOT_COOLDOWN_MS: u64 = 1_500;
pub const POLICE_DAMAGE: f64 = 20.0;
pub const POLICE_BOUNTY: u64 = 50;
/// Active units allowed per wanted level
pub const POLICE_PER_WANTED_LEVEL: usize = 2;
/// Units dispatched by a single escalation
pub const POLICE_SPAWN_BATCH: usize = 2;
pub const POLICE_SPAWN_MIN_DISTANCE: f64 = 200.0;
pub const POLICE_SPAWN_MAX_DISTANCE: f64 = 500.0;

// Chat
pub const CHAT_MAX_CHARS: usize = 200;
