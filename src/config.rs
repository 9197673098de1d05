use std::{fs, io, path::Path};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{choice::Choice, game::GameEngine};

pub const DEFAULT_PLAYER_NAME: &str = "Player";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] io::Error),
    #[error("invalid config: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableConfig {
    /// Falls back to [`DEFAULT_PLAYER_NAME`] when unset.
    #[serde(default)]
    pub player_name: Option<String>,
    /// Fixes every shuffle of the session when set.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl TableConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    pub fn player_name(&self) -> &str {
        self.player_name.as_deref().unwrap_or(DEFAULT_PLAYER_NAME)
    }

    pub fn build_engine(&self) -> GameEngine {
        let name = self.player_name().to_string();
        match self.seed {
            Some(seed) => GameEngine::with_seed(name, seed),
            None => GameEngine::new(name),
        }
    }
}

/// A whole round described up front: the table plus the player's moves.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptedRoundInput {
    #[serde(flatten)]
    pub table: TableConfig,
    #[serde(default)]
    pub choices: Vec<Choice>,
}
