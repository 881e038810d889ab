use chance_core::LotteryMode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, LotteryError>;

#[derive(Error, Debug)]
pub enum LotteryError {
    #[error("Chance core error: {0}")]
    Core(#[from] chance_core::ChanceError),

    #[error("Lottery not found: {0}")]
    NotFound(String),

    #[error("Participant #{} has no name", .index + 1)]
    EmptyParticipantName { index: usize },

    #[error("Task #{} has no description", .index + 1)]
    EmptyTaskDescription { index: usize },

    #[error("Not enough participants: need {need}, have {have}")]
    NotEnoughParticipants { need: usize, have: usize },

    #[error("Task count mismatch: {participants} participants, {tasks} tasks")]
    TaskCountMismatch { participants: usize, tasks: usize },

    #[error("Cannot pair a single participant with someone else")]
    DerangementInfeasible,

    #[error("Wrong lottery mode: expected {expected}, got {actual}")]
    WrongMode {
        expected: LotteryMode,
        actual: LotteryMode,
    },

    #[error("Invalid lottery state: {0}")]
    InvalidState(String),

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Internal error: {0}")]
    Internal(String),
}
