//! Client handle for interacting with a running fight.
//!
//! [`FightHandle`] is the cloneable entry point to one fight worker. Every
//! call is a command with a reply channel; the worker handles them in order.

use tokio::sync::{broadcast, mpsc, oneshot};

use fight_core::{Action, ActionOutcome, CellId, FightId, FightSnapshot, FighterId};

use crate::api::{Result, RuntimeError};
use crate::events::{Event, EventBus, Topic};
use crate::workers::Command;

#[derive(Clone)]
pub struct FightHandle {
    id: FightId,
    command_tx: mpsc::Sender<Command>,
    event_bus: EventBus,
}

/// Handle held by the service registry. Once every [`FightHandle`] is
/// dropped it no longer upgrades and the worker cancels its fight.
pub(crate) struct WeakFightHandle {
    id: FightId,
    command_tx: mpsc::WeakSender<Command>,
    event_bus: EventBus,
}

impl WeakFightHandle {
    pub(crate) fn upgrade(&self) -> Option<FightHandle> {
        self.command_tx
            .upgrade()
            .map(|command_tx| FightHandle::new(self.id, command_tx, self.event_bus.clone()))
    }
}

impl FightHandle {
    pub(crate) fn new(id: FightId, command_tx: mpsc::Sender<Command>, event_bus: EventBus) -> Self {
        Self {
            id,
            command_tx,
            event_bus,
        }
    }

    pub fn id(&self) -> FightId {
        self.id
    }

    /// Registry entry that does not keep the worker alive.
    pub(crate) fn downgrade(&self) -> WeakFightHandle {
        WeakFightHandle {
            id: self.id,
            command_tx: self.command_tx.downgrade(),
            event_bus: self.event_bus.clone(),
        }
    }

    /// Returns true while the worker still accepts commands.
    pub fn is_open(&self) -> bool {
        !self.command_tx.is_closed()
    }

    async fn request<T>(&self, build: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.command_tx
            .send(build(reply_tx))
            .await
            .map_err(|_| RuntimeError::FightClosed(self.id))?;
        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    pub async fn change_place(&self, fighter: FighterId, cell: CellId) -> Result<()> {
        self.request(|reply| Command::ChangePlace {
            fighter,
            cell,
            reply,
        })
        .await?
        .map_err(Into::into)
    }

    /// Marks a fighter ready. The fight starts once everybody is.
    pub async fn set_ready(&self, fighter: FighterId, ready: bool) -> Result<bool> {
        self.request(|reply| Command::SetReady {
            fighter,
            ready,
            reply,
        })
        .await?
        .map_err(Into::into)
    }

    /// Starts the fight; `force` skips the readiness check.
    pub async fn start(&self, force: bool) -> Result<()> {
        self.request(|reply| Command::Start { force, reply })
            .await?
            .map_err(Into::into)
    }

    /// Submits an action for the fighter currently playing.
    pub async fn perform(&self, action: Action) -> Result<ActionOutcome> {
        self.request(|reply| Command::Perform { action, reply })
            .await?
            .map_err(Into::into)
    }

    pub async fn leave(&self, fighter: FighterId) -> Result<()> {
        self.request(|reply| Command::Leave { fighter, reply })
            .await?
            .map_err(Into::into)
    }

    /// Cancels the fight. Returns false when it was already over.
    pub async fn cancel(&self) -> Result<bool> {
        self.request(|reply| Command::Cancel { reply }).await
    }

    pub async fn snapshot(&self) -> Result<FightSnapshot> {
        self.request(|reply| Command::Snapshot { reply }).await
    }

    /// Resolves once the pending action of the current turn is terminated.
    ///
    /// Resolves immediately when no action is pending.
    pub async fn wait_action_terminated(&self) -> Result<()> {
        self.request(|reply| Command::WhenActionTerminated { reply })
            .await
    }

    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }
}
