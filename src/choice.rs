use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GameError;

/// What the player may do on their turn.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Choice {
    Hit,
    Stay,
}

impl Choice {
    pub fn from_code(code: &str) -> Result<Choice, GameError> {
        match code.trim().to_ascii_lowercase().as_str() {
            "1" | "h" | "hit" => Ok(Choice::Hit),
            "2" | "s" | "stay" | "stand" => Ok(Choice::Stay),
            _ => Err(GameError::InvalidChoice(code.trim().to_string())),
        }
    }

    pub fn as_code(&self) -> &'static str {
        match self {
            Choice::Hit => "1",
            Choice::Stay => "2",
        }
    }
}

impl FromStr for Choice {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Choice::from_code(s)
    }
}

/// Answer to "play another round?".
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Replay {
    Again,
    Exit,
}

impl Replay {
    pub fn from_code(code: &str) -> Result<Replay, GameError> {
        match code.trim().to_ascii_lowercase().as_str() {
            "1" | "y" | "yes" => Ok(Replay::Again),
            "2" | "n" | "no" | "exit" | "q" | "quit" => Ok(Replay::Exit),
            _ => Err(GameError::InvalidChoice(code.trim().to_string())),
        }
    }
}

impl FromStr for Replay {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Replay::from_code(s)
    }
}
