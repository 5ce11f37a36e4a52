//! The fixed-rate simulation loop and its handle

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc::error::TryRecvError;
use tokio::sync::{broadcast, mpsc};
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info};

use crate::util::time::{aggregate_interval_ticks, tick_duration, unix_millis};

use super::ids::PlayerId;
use super::snapshot::AggregateThrottle;
use super::{Outbound, PlayerInput, SessionEvent, World};

/// Capacity of the inbound session channel
const INPUT_CHANNEL_CAPACITY: usize = 1024;
/// Capacity of the outbound broadcast channel
const EVENT_CHANNEL_CAPACITY: usize = 1024;

/// Handle to the running simulation
#[derive(Clone)]
pub struct ServerHandle {
    pub input_tx: mpsc::Sender<PlayerInput>,
    pub events_tx: broadcast::Sender<Outbound>,
    pub player_count: Arc<AtomicUsize>,
}

impl ServerHandle {
    pub fn player_count(&self) -> usize {
        self.player_count.load(Ordering::Relaxed)
    }

    /// Subscribe to outbound traffic. Subscribe before announcing a connection
    /// so the initial state is not missed.
    pub fn subscribe(&self) -> broadcast::Receiver<Outbound> {
        self.events_tx.subscribe()
    }

    /// Forward a session event to the loop. Returns false if the loop is gone.
    pub async fn send(&self, player_id: PlayerId, event: SessionEvent) -> bool {
        self.input_tx
            .send(PlayerInput { player_id, event })
            .await
            .is_ok()
    }
}

/// The authoritative game loop
pub struct GameServer {
    world: World,
    input_rx: mpsc::Receiver<PlayerInput>,
    events_tx: broadcast::Sender<Outbound>,
    throttle: AggregateThrottle,
    player_count: Arc<AtomicUsize>,
}

impl GameServer {
    pub fn new(world: World) -> (Self, ServerHandle) {
        let (input_tx, input_rx) = mpsc::channel(INPUT_CHANNEL_CAPACITY);
        let (events_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let player_count = Arc::new(AtomicUsize::new(world.players().len()));

        let handle = ServerHandle {
            input_tx,
            events_tx: events_tx.clone(),
            player_count: player_count.clone(),
        };

        let server = Self {
            world,
            input_rx,
            events_tx,
            throttle: AggregateThrottle::new(aggregate_interval_ticks()),
            player_count,
        };

        (server, handle)
    }

    /// Run the tick loop until every input sender is dropped
    pub async fn run(mut self) {
        info!("Simulation loop started");

        let mut tick_interval = interval(tick_duration());
        tick_interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tick_interval.tick().await;
            let now = unix_millis();

            if !self.process_inputs(now) {
                info!("All input senders dropped, stopping simulation");
                break;
            }

            self.step(now);
        }
    }

    /// Apply every queued session event. Returns false once the input channel
    /// has closed.
    fn process_inputs(&mut self, now: u64) -> bool {
        let open = loop {
            match self.input_rx.try_recv() {
                Ok(input) => self.apply_input(input, now),
                Err(TryRecvError::Empty) => break true,
                Err(TryRecvError::Disconnected) => break false,
            }
        };

        self.flush();
        open
    }

    fn apply_input(&mut self, input: PlayerInput, now: u64) {
        match input.event {
            SessionEvent::Connected => {
                self.world.add_player(input.player_id, now);
            }
            SessionEvent::Message(msg) => {
                self.world.handle_message(input.player_id, msg, now);
            }
            SessionEvent::Disconnected => {
                self.world.remove_player(input.player_id);
            }
        }
        self.player_count
            .store(self.world.players().len(), Ordering::Relaxed);
    }

    /// One simulation tick plus the throttled aggregate
    fn step(&mut self, now: u64) {
        let snapshot = self.world.tick(now);
        self.flush();

        if self.throttle.should_send() {
            self.publish(Outbound::all(snapshot.to_aggregate()));
        }
    }

    fn flush(&mut self) {
        for outbound in self.world.drain_outbox() {
            self.publish(outbound);
        }
    }

    fn publish(&self, outbound: Outbound) {
        // No subscribers just means nobody is connected
        if self.events_tx.send(outbound).is_err() {
            debug!("No connected sessions for outbound message");
        }
    }
}
