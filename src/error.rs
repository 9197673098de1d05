use thiserror::Error;

use crate::game::RoundPhase;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("cannot draw from an empty deck")]
    EmptyDeck,
    #[error("invalid choice {0:?}")]
    InvalidChoice(String),
    #[error("cannot {action} during {phase:?}")]
    OutOfTurn {
        action: &'static str,
        phase: RoundPhase,
    },
}
