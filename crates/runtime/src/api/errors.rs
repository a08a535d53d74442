//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from worker coordination, fight rules and configuration so
//! clients can bubble them up with consistent context.
use thiserror::Error;
use tokio::sync::oneshot;

use fight_core::{CombatError, ErrorSeverity, FightError, FightId};

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("{0} is closed")]
    FightClosed(FightId),

    #[error("{0} is not registered")]
    FightNotFound(FightId),

    #[error("fight worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("fight worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error(transparent)]
    Fight(#[from] FightError),

    #[error("invalid value {value:?} for {key}")]
    Config { key: &'static str, value: String },
}

impl CombatError for RuntimeError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Fight(error) => error.severity(),
            Self::FightClosed(_) | Self::FightNotFound(_) | Self::Config { .. } => {
                ErrorSeverity::Validation
            }
            Self::ReplyChannelClosed(_) | Self::WorkerJoin(_) => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Fight(error) => error.error_code(),
            Self::FightClosed(_) => "RUNTIME_FIGHT_CLOSED",
            Self::FightNotFound(_) => "RUNTIME_FIGHT_NOT_FOUND",
            Self::ReplyChannelClosed(_) => "RUNTIME_REPLY_CHANNEL_CLOSED",
            Self::WorkerJoin(_) => "RUNTIME_WORKER_JOIN",
            Self::Config { .. } => "RUNTIME_CONFIG",
        }
    }
}
