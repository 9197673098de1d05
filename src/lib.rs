use wasm_bindgen::prelude::*;

pub mod choice;
pub mod config;
pub mod deck;
pub mod error;
pub mod game;
pub mod hand;
pub mod participant;

pub use choice::{Choice, Replay};
pub use config::{ConfigError, DEFAULT_PLAYER_NAME, ScriptedRoundInput, TableConfig};
pub use deck::{Card, Deck, Rank, Suit, DECK_SIZE};
pub use error::GameError;
pub use game::{
    DealerPlay, Draw, GameEngine, Outcome, PlayerSeat, RoundEvent, RoundPhase, RoundSnapshot,
    ScriptedSeat, Side, DEALER_STAND_MIN,
};
pub use hand::{hand_value, Hand, BLACKJACK};
pub use participant::{CardView, Dealer, Participant, Player, DEALER_NAME};

fn game_error(err: GameError) -> JsValue {
    JsValue::from_str(&format!("Game error: {err}"))
}

fn to_js<T: serde::Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value)
        .map_err(|err| JsValue::from_str(&format!("Serialization failed: {err}")))
}

/// One table driven step by step from JavaScript.
#[wasm_bindgen]
pub struct BlackjackTable {
    engine: GameEngine,
}

#[wasm_bindgen]
impl BlackjackTable {
    #[wasm_bindgen(constructor)]
    pub fn new(params: &JsValue) -> Result<BlackjackTable, JsValue> {
        console_error_panic_hook::set_once();
        let config: TableConfig = if params.is_undefined() || params.is_null() {
            TableConfig::default()
        } else {
            serde_wasm_bindgen::from_value(params.clone())
                .map_err(|err| JsValue::from_str(&format!("Invalid input: {err}")))?
        };
        Ok(BlackjackTable {
            engine: config.build_engine(),
        })
    }

    #[wasm_bindgen(js_name = setPlayerName)]
    pub fn set_player_name(&mut self, name: String) -> Result<JsValue, JsValue> {
        self.engine.set_player_name(name);
        self.snapshot()
    }

    pub fn deal(&mut self) -> Result<JsValue, JsValue> {
        self.engine.deal_initial_cards().map_err(game_error)?;
        self.snapshot()
    }

    pub fn hit(&mut self) -> Result<JsValue, JsValue> {
        self.engine.player_hit().map_err(game_error)?;
        self.snapshot()
    }

    pub fn stay(&mut self) -> Result<JsValue, JsValue> {
        self.engine.player_stay().map_err(game_error)?;
        self.snapshot()
    }

    #[wasm_bindgen(js_name = dealerPlay)]
    pub fn dealer_play(&mut self) -> Result<JsValue, JsValue> {
        self.engine.dealer_auto_play().map_err(game_error)?;
        self.snapshot()
    }

    pub fn resolve(&mut self) -> Result<JsValue, JsValue> {
        self.engine.resolve_round().map_err(game_error)?;
        self.snapshot()
    }

    pub fn reset(&mut self) -> Result<JsValue, JsValue> {
        self.engine.reset_round();
        self.snapshot()
    }

    pub fn snapshot(&self) -> Result<JsValue, JsValue> {
        to_js(&self.engine.snapshot())
    }
}

#[wasm_bindgen]
pub fn play_single_round(params: &JsValue) -> Result<JsValue, JsValue> {
    console_error_panic_hook::set_once();
    let input: ScriptedRoundInput = serde_wasm_bindgen::from_value(params.clone())
        .map_err(|err| JsValue::from_str(&format!("Invalid input: {err}")))?;

    let mut engine = input.table.build_engine();
    let mut seat = ScriptedSeat::new(input.choices);
    engine.play_round(&mut seat).map_err(game_error)?;

    to_js(&engine.snapshot())
}
