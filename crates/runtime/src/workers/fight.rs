//! Fight worker that owns one [`Fight`] and serializes everything touching it.
//!
//! Commands from [`crate::FightHandle`] and timer expirations are handled one
//! at a time. After each of them the worker publishes the buffered fight
//! events and re-arms its timers:
//! - the display delay of the pending action, keyed by [`ActionId`]
//! - the turn timeout, keyed by [`TurnId`]
//! - the placement timeout of PvM fights
//!
//! A timer that fires for an action or a turn that is no longer current is
//! ignored. AI-controlled fighters are played from the same loop, one
//! decision at a time.

use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use fight_core::simulation::ai::decide;
use fight_core::{
    Action, ActionId, ActionOutcome, CellId, Fight, FightConfig, FightError, FightSnapshot,
    FightState, FightType, FighterId, TurnId,
};

use crate::events::{Event, EventBus};
use crate::oracle::ContentOracles;

type Reply<T> = oneshot::Sender<Result<T, FightError>>;

/// Commands that can be sent to a fight worker
pub(crate) enum Command {
    ChangePlace {
        fighter: FighterId,
        cell: CellId,
        reply: Reply<()>,
    },
    /// Replies whether every fighter is now ready.
    SetReady {
        fighter: FighterId,
        ready: bool,
        reply: Reply<bool>,
    },
    Start {
        force: bool,
        reply: Reply<()>,
    },
    Perform {
        action: Action,
        reply: Reply<ActionOutcome>,
    },
    Leave {
        fighter: FighterId,
        reply: Reply<()>,
    },
    Cancel {
        reply: oneshot::Sender<bool>,
    },
    Snapshot {
        reply: oneshot::Sender<FightSnapshot>,
    },
    /// Replies once the pending action is terminated, or right away.
    WhenActionTerminated {
        reply: oneshot::Sender<()>,
    },
}

/// Self-addressed messages produced by timers and the AI loop.
#[derive(Debug, Clone, Copy)]
enum Timer {
    ActionDelay(ActionId),
    TurnTimeout(TurnId),
    PlacementTimeout,
    AiStep(TurnId),
}

struct Armed<K> {
    key: K,
    handle: JoinHandle<()>,
}

#[derive(Default)]
struct Timers {
    action: Option<Armed<ActionId>>,
    turn: Option<Armed<TurnId>>,
    placement: Option<JoinHandle<()>>,
}

impl Timers {
    fn abort_all(&mut self) {
        if let Some(armed) = self.action.take() {
            armed.handle.abort();
        }
        if let Some(armed) = self.turn.take() {
            armed.handle.abort();
        }
        if let Some(handle) = self.placement.take() {
            handle.abort();
        }
    }
}

/// AI bookkeeping for the current turn.
#[derive(Default)]
struct AiTurn {
    turn: Option<TurnId>,
    actions: usize,
    queued: bool,
}

/// Background task that owns one fight.
pub(crate) struct FightWorker {
    fight: Fight,
    oracles: ContentOracles,
    command_rx: mpsc::Receiver<Command>,
    timer_tx: mpsc::UnboundedSender<Timer>,
    timer_rx: mpsc::UnboundedReceiver<Timer>,
    event_bus: EventBus,
    timers: Timers,
    ai: AiTurn,
}

impl FightWorker {
    pub(crate) fn new(
        fight: Fight,
        oracles: ContentOracles,
        command_rx: mpsc::Receiver<Command>,
        event_bus: EventBus,
    ) -> Self {
        let (timer_tx, timer_rx) = mpsc::unbounded_channel();
        Self {
            fight,
            oracles,
            command_rx,
            timer_tx,
            timer_rx,
            event_bus,
            timers: Timers::default(),
            ai: AiTurn::default(),
        }
    }

    /// Main worker loop. Returns once the fight is over or every handle is gone.
    pub(crate) async fn run(mut self) {
        let id = self.fight.id();
        info!(target: "fight::worker", fight = %id, kind = %self.fight.kind(), "fight worker started");
        self.begin();

        while !self.fight.state().is_terminal() {
            tokio::select! {
                command = self.command_rx.recv() => match command {
                    Some(command) => self.handle_command(command),
                    None => {
                        debug!(target: "fight::worker", fight = %id, "all handles dropped");
                        self.fight.cancel();
                    }
                },
                Some(timer) = self.timer_rx.recv() => self.handle_timer(timer),
            }
            self.sync();
        }

        self.timers.abort_all();
        info!(target: "fight::worker", fight = %id, state = %self.fight.state(), "fight worker stopped");
    }

    fn begin(&mut self) {
        if self.fight.state() == FightState::Placement {
            if self.fight.kind() == FightType::PvM {
                let delay = self.fight.config().placement_duration();
                self.timers.placement = Some(self.arm(delay, Timer::PlacementTimeout));
            }
            if self.fight.all_ready() {
                let started = self.fight.start_fight(false);
                self.check(started).ok();
            }
        }
        self.sync();
    }

    // ===== commands =====

    fn handle_command(&mut self, command: Command) {
        match command {
            Command::ChangePlace {
                fighter,
                cell,
                reply,
            } => {
                let result = self.fight.change_place(fighter, cell);
                Self::respond(reply, result);
            }
            Command::SetReady {
                fighter,
                ready,
                reply,
            } => {
                let result = self.fight.set_ready(fighter, ready);
                if let Ok(true) = result {
                    let started = self.fight.start_fight(false);
                    self.check(started).ok();
                }
                Self::respond(reply, result);
            }
            Command::Start { force, reply } => {
                let result = self.fight.start_fight(force);
                let result = self.check(result);
                Self::respond(reply, result);
            }
            Command::Perform { action, reply } => {
                let env = self.oracles.as_fight_env();
                let result = self.fight.perform(&env, action);
                let result = self.check(result);
                Self::respond(reply, result);
            }
            Command::Leave { fighter, reply } => {
                let env = self.oracles.as_fight_env();
                let result = self.fight.leave(&env, fighter);
                let result = self.check(result);
                Self::respond(reply, result);
            }
            Command::Cancel { reply } => {
                let cancelled = self.fight.cancel();
                if reply.send(cancelled).is_err() {
                    debug!(target: "fight::worker", "Cancel reply channel closed (caller dropped)");
                }
            }
            Command::Snapshot { reply } => {
                if reply.send(self.fight.snapshot()).is_err() {
                    debug!(target: "fight::worker", "Snapshot reply channel closed (caller dropped)");
                }
            }
            Command::WhenActionTerminated { reply } => {
                self.fight.on_action_terminated(Box::new(move || {
                    let _ = reply.send(());
                }));
            }
        }
    }

    fn respond<T>(reply: Reply<T>, result: Result<T, FightError>) {
        if reply.send(result).is_err() {
            debug!(target: "fight::worker", "reply channel closed (caller dropped)");
        }
    }

    /// Cancels the fight on fatal errors; the error is passed through.
    fn check<T>(&mut self, result: Result<T, FightError>) -> Result<T, FightError> {
        if let Err(error) = &result
            && error.is_fatal()
        {
            error!(target: "fight::worker", fight = %self.fight.id(), %error, "fatal fight error, cancelling");
            self.fight.cancel();
        }
        result
    }

    // ===== timers =====

    fn handle_timer(&mut self, timer: Timer) {
        match timer {
            Timer::ActionDelay(id) => {
                if self.fight.pending_action().map(|(pending, _)| pending) != Some(id) {
                    debug!(target: "fight::worker", %id, "stale action delay ignored");
                    return;
                }
                let env = self.oracles.as_fight_env();
                let result = self.fight.terminate_action(&env);
                self.check(result).ok();
            }
            Timer::TurnTimeout(turn) => {
                let env = self.oracles.as_fight_env();
                match self.fight.end_turn(&env, turn) {
                    Ok(true) => {
                        info!(target: "fight::worker", fight = %self.fight.id(), %turn, "turn timed out");
                    }
                    Ok(false) => debug!(target: "fight::worker", %turn, "stale turn timeout ignored"),
                    Err(error) => {
                        self.check::<bool>(Err(error)).ok();
                    }
                }
            }
            Timer::PlacementTimeout => {
                self.timers.placement = None;
                if self.fight.state() == FightState::Placement {
                    info!(target: "fight::worker", fight = %self.fight.id(), "placement timed out");
                    let started = self.fight.start_fight(true);
                    self.check(started).ok();
                }
            }
            Timer::AiStep(turn) => self.play_ai(turn),
        }
    }

    fn arm(&self, delay: Duration, timer: Timer) -> JoinHandle<()> {
        let timer_tx = self.timer_tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // The worker is gone once the fight is over.
            let _ = timer_tx.send(timer);
        })
    }

    // ===== AI =====

    fn play_ai(&mut self, turn: TurnId) {
        self.ai.queued = false;
        let Some(current) = self.fight.current_turn() else {
            return;
        };
        if current.id() != turn || current.is_busy() {
            return;
        }
        let fighter = current.fighter();

        let result = {
            let env = self.oracles.as_fight_env();
            let decision = if self.ai.actions < FightConfig::MAX_AI_ACTIONS_PER_TURN {
                decide(self.fight.battle(), &env, fighter)
            } else {
                None
            };
            match decision {
                Some(action) => {
                    self.ai.actions += 1;
                    debug!(target: "fight::ai", %fighter, ?action, "ai action");
                    self.fight.perform(&env, action).map(|_| ())
                }
                None => {
                    debug!(target: "fight::ai", %fighter, "ai passes");
                    self.fight.pass_turn(&env, fighter)
                }
            }
        };

        if let Err(error) = self.check(result) {
            if error.is_fatal() {
                return;
            }
            // A rejected decision would be chosen again: give the turn up.
            warn!(target: "fight::ai", %fighter, %error, "ai action rejected, passing");
            let env = self.oracles.as_fight_env();
            let passed = self.fight.end_turn(&env, turn).map(|_| ());
            self.check(passed).ok();
        }
    }

    fn schedule_ai(&mut self) {
        let Some(turn) = self.fight.current_turn() else {
            return;
        };
        let (id, fighter, busy) = (turn.id(), turn.fighter(), turn.is_busy());
        let ai_controlled = self
            .fight
            .battle()
            .fighter(fighter)
            .is_some_and(|entry| entry.kind().is_ai_controlled());
        if busy || !ai_controlled {
            return;
        }
        if self.ai.turn != Some(id) {
            self.ai = AiTurn {
                turn: Some(id),
                ..AiTurn::default()
            };
        }
        if !self.ai.queued && self.timer_tx.send(Timer::AiStep(id)).is_ok() {
            self.ai.queued = true;
        }
    }

    // ===== synchronization =====

    /// Publishes buffered events and re-arms the timers for the new state.
    fn sync(&mut self) {
        let fight = self.fight.id();
        for event in self.fight.drain_events() {
            self.event_bus.publish(Event { fight, event });
        }
        if self.fight.state().is_terminal() {
            self.timers.abort_all();
            return;
        }
        if self.fight.state() != FightState::Placement
            && let Some(handle) = self.timers.placement.take()
        {
            handle.abort();
        }

        let turn = self.fight.current_turn().map(|turn| turn.id());
        if self.timers.turn.as_ref().map(|armed| armed.key) != turn {
            if let Some(armed) = self.timers.turn.take() {
                armed.handle.abort();
            }
            if let Some(turn) = turn {
                let handle = self.arm(self.fight.config().turn_duration(), Timer::TurnTimeout(turn));
                self.timers.turn = Some(Armed { key: turn, handle });
            }
        }

        let pending = self.fight.pending_action();
        if self.timers.action.as_ref().map(|armed| armed.key) != pending.map(|(id, _)| id) {
            if let Some(armed) = self.timers.action.take() {
                armed.handle.abort();
            }
            if let Some((id, duration)) = pending {
                let handle = self.arm(duration, Timer::ActionDelay(id));
                self.timers.action = Some(Armed { key: id, handle });
            }
        }

        self.schedule_ai();
    }
}
