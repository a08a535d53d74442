//! Fight service: registry of running fights and their configuration.
//!
//! [`FightService`] builds a fight from a [`FightSetup`], spawns the worker
//! that owns it and hands out [`FightHandle`]s. The registry only keeps weak
//! handles: a fight whose handles are all dropped is cancelled. A fight
//! leaves the registry as soon as its worker stops.

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::{Mutex, RwLock, broadcast, mpsc};
use tokio::task::JoinSet;
use tracing::{debug, info};

use fight_core::{Battlefield, CellId, Fight, FightConfig, FightId, FightType, FighterSpec};

use crate::api::handle::WeakFightHandle;
use crate::api::{FightHandle, Result, RuntimeError};
use crate::events::{Event, EventBus, Topic};
use crate::oracle::ContentOracles;
use crate::workers::FightWorker;

/// Runtime configuration shared by the service and its workers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    pub fight: FightConfig,
    /// Capacity of each event bus topic.
    pub event_buffer_size: usize,
    /// Capacity of the command queue of each fight.
    pub command_buffer_size: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            fight: FightConfig::default(),
            event_buffer_size: 256,
            command_buffer_size: 32,
        }
    }
}

impl RuntimeConfig {
    pub const TURN_DURATION_KEY: &'static str = "FIGHT_TURN_DURATION_MS";
    pub const PLACEMENT_DURATION_KEY: &'static str = "FIGHT_PLACEMENT_DURATION_MS";
    pub const EVENT_BUFFER_KEY: &'static str = "FIGHT_EVENT_BUFFER";
    pub const COMMAND_BUFFER_KEY: &'static str = "FIGHT_COMMAND_BUFFER";

    /// Defaults over `fight`, overridden by the process environment.
    pub fn from_env(fight: FightConfig) -> Result<Self> {
        Self::from_lookup(fight, |key| std::env::var(key).ok())
    }

    /// Same as [`Self::from_env`] with an explicit variable lookup.
    pub fn from_lookup(
        fight: FightConfig,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let mut config = Self {
            fight,
            ..Self::default()
        };
        if let Some(value) = parse(&lookup, Self::TURN_DURATION_KEY)? {
            config.fight.turn_duration_ms = value;
        }
        if let Some(value) = parse(&lookup, Self::PLACEMENT_DURATION_KEY)? {
            config.fight.placement_duration_ms = value;
        }
        if let Some(value) = parse(&lookup, Self::EVENT_BUFFER_KEY)? {
            config.event_buffer_size = value;
        }
        if let Some(value) = parse(&lookup, Self::COMMAND_BUFFER_KEY)? {
            config.command_buffer_size = value;
        }
        Ok(config)
    }
}

fn parse<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<Option<T>> {
    let Some(value) = lookup(key) else {
        return Ok(None);
    };
    value
        .trim()
        .parse()
        .map(Some)
        .map_err(|_| RuntimeError::Config { key, value })
}

/// One team of a fight to create.
#[derive(Debug, Clone, Default)]
pub struct TeamSetup {
    /// Starting cells offered to the team during placement.
    pub places: Vec<CellId>,
    pub fighters: Vec<FighterSpec>,
}

/// Everything needed to create a fight.
#[derive(Debug, Clone)]
pub struct FightSetup {
    pub kind: FightType,
    pub grid: Battlefield,
    pub teams: Vec<TeamSetup>,
}

/// Registry of running fights.
pub struct FightService {
    config: RuntimeConfig,
    oracles: ContentOracles,
    event_bus: EventBus,
    fights: Arc<RwLock<HashMap<FightId, WeakFightHandle>>>,
    workers: Mutex<JoinSet<()>>,
    next_id: AtomicU64,
}

impl FightService {
    pub fn new(config: RuntimeConfig, oracles: ContentOracles) -> Self {
        let event_bus = EventBus::with_capacity(config.event_buffer_size);
        Self {
            config,
            oracles,
            event_bus,
            fights: Arc::new(RwLock::new(HashMap::new())),
            workers: Mutex::new(JoinSet::new()),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn oracles(&self) -> &ContentOracles {
        &self.oracles
    }

    /// Builds the fight, opens its placement phase and spawns its worker.
    pub async fn create_fight(&self, setup: FightSetup) -> Result<FightHandle> {
        let id = FightId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let mut fight = Fight::new(id, setup.kind, self.config.fight.clone(), setup.grid);
        for team in setup.teams {
            let team_id = fight.add_team(team.places)?;
            for spec in team.fighters {
                fight.add_fighter(team_id, spec)?;
            }
        }
        fight.start_placement()?;

        let (command_tx, command_rx) = mpsc::channel(self.config.command_buffer_size);
        let handle = FightHandle::new(id, command_tx, self.event_bus.clone());
        let worker = FightWorker::new(fight, self.oracles.clone(), command_rx, self.event_bus.clone());

        self.fights.write().await.insert(id, handle.downgrade());
        let fights = Arc::clone(&self.fights);
        let mut workers = self.workers.lock().await;
        while workers.try_join_next().is_some() {}
        workers.spawn(async move {
            worker.run().await;
            fights.write().await.remove(&id);
            debug!(target: "fight::worker", fight = %id, "fight unregistered");
        });

        info!(target: "fight::worker", fight = %id, kind = %setup.kind, "fight created");
        Ok(handle)
    }

    /// New handle on a running fight. Fails once nobody holds a handle on it
    /// anymore, even if its worker has not unregistered yet.
    pub async fn handle(&self, id: FightId) -> Result<FightHandle> {
        self.fights
            .read()
            .await
            .get(&id)
            .and_then(WeakFightHandle::upgrade)
            .ok_or(RuntimeError::FightNotFound(id))
    }

    /// Ids of the fights whose worker is still running.
    pub async fn active_fights(&self) -> Vec<FightId> {
        let mut ids: Vec<_> = self.fights.read().await.keys().copied().collect();
        ids.sort();
        ids
    }

    /// Events of every fight of this service on `topic`.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    /// Cancels every running fight and waits for the workers to stop.
    pub async fn shutdown(&self) -> Result<()> {
        let handles: Vec<FightHandle> = self
            .fights
            .read()
            .await
            .values()
            .filter_map(WeakFightHandle::upgrade)
            .collect();
        for handle in handles {
            // A worker may stop on its own in between.
            if let Err(error) = handle.cancel().await {
                debug!(target: "fight::worker", fight = %handle.id(), %error, "cancel on shutdown");
            }
        }

        let mut workers = self.workers.lock().await;
        while let Some(joined) = workers.join_next().await {
            joined.map_err(RuntimeError::WorkerJoin)?;
        }
        info!(target: "fight::worker", "fight service stopped");
        Ok(())
    }
}
