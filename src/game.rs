use rand::{rngs::SmallRng, Rng, SeedableRng};
use serde::Serialize;
use tracing::{debug, info};

use crate::{
    choice::Choice,
    deck::{Card, Deck},
    error::GameError,
    hand::BLACKJACK,
    participant::{CardView, Dealer, Participant, Player},
};

/// The dealer draws while below this total.
pub const DEALER_STAND_MIN: u16 = 17;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Side {
    Player,
    Dealer,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Outcome {
    PlayerBlackjack,
    DealerBlackjack,
    PlayerBust,
    DealerBust,
    PlayerWins,
    DealerWins,
    Tie,
}

impl Outcome {
    pub fn winner(self) -> Option<Side> {
        match self {
            Outcome::PlayerBlackjack | Outcome::DealerBust | Outcome::PlayerWins => {
                Some(Side::Player)
            }
            Outcome::DealerBlackjack | Outcome::PlayerBust | Outcome::DealerWins => {
                Some(Side::Dealer)
            }
            Outcome::Tie => None,
        }
    }

    fn blackjack_for(side: Side) -> Outcome {
        match side {
            Side::Player => Outcome::PlayerBlackjack,
            Side::Dealer => Outcome::DealerBlackjack,
        }
    }

    fn bust_for(side: Side) -> Outcome {
        match side {
            Side::Player => Outcome::PlayerBust,
            Side::Dealer => Outcome::DealerBust,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RoundPhase {
    Dealing,
    PlayerTurn,
    DealerTurn,
    Resolved,
}

/// A single card drawn by the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Draw {
    pub card: Card,
    pub total: u16,
    pub outcome: Option<Outcome>,
}

/// Everything the dealer did on its turn.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DealerPlay {
    pub drawn: Vec<Card>,
    pub total: u16,
    pub outcome: Option<Outcome>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RoundEvent {
    Dealt,
    PlayerHit(Draw),
    PlayerStayed { total: u16 },
    DealerPlayed(DealerPlay),
    Resolved(Outcome),
}

/// The seat the human occupies: supplies choices and watches the round.
pub trait PlayerSeat {
    fn choose(&mut self, engine: &GameEngine) -> Choice;

    fn observe(&mut self, _engine: &GameEngine, _event: &RoundEvent) {}
}

/// Replays a fixed list of choices, staying once it runs out.
#[derive(Clone, Debug, Default)]
pub struct ScriptedSeat {
    choices: std::vec::IntoIter<Choice>,
    events: Vec<RoundEvent>,
}

impl ScriptedSeat {
    pub fn new(choices: Vec<Choice>) -> Self {
        ScriptedSeat {
            choices: choices.into_iter(),
            events: Vec::new(),
        }
    }

    pub fn events(&self) -> &[RoundEvent] {
        &self.events
    }
}

impl PlayerSeat for ScriptedSeat {
    fn choose(&mut self, _engine: &GameEngine) -> Choice {
        self.choices.next().unwrap_or(Choice::Stay)
    }

    fn observe(&mut self, _engine: &GameEngine, event: &RoundEvent) {
        self.events.push(event.clone());
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundSnapshot {
    pub player_name: String,
    pub player_cards: Vec<Card>,
    pub player_total: u16,
    pub dealer_cards: Vec<CardView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dealer_total: Option<u16>,
    pub phase: RoundPhase,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<Outcome>,
    pub cards_remaining: usize,
}

#[derive(Debug)]
pub struct GameEngine {
    deck: Deck,
    player: Player,
    dealer: Dealer,
    phase: RoundPhase,
    outcome: Option<Outcome>,
    dealer_stood: bool,
    rng: SmallRng,
}

impl GameEngine {
    pub fn new(player_name: impl Into<String>) -> Self {
        let mut rng = SmallRng::from_entropy();
        let deck = Deck::with_seed(rng.gen());
        Self::build(player_name, deck, rng)
    }

    pub fn with_seed(player_name: impl Into<String>, seed: u64) -> Self {
        let mut rng = SmallRng::seed_from_u64(seed);
        let deck = Deck::with_seed(rng.gen());
        Self::build(player_name, deck, rng)
    }

    /// Starts the first round on `deck`; later rounds get shuffled decks.
    pub fn with_deck(player_name: impl Into<String>, deck: Deck) -> Self {
        Self::build(player_name, deck, SmallRng::from_entropy())
    }

    fn build(player_name: impl Into<String>, deck: Deck, rng: SmallRng) -> Self {
        GameEngine {
            deck,
            player: Player::new(player_name),
            dealer: Dealer::new(),
            phase: RoundPhase::Dealing,
            outcome: None,
            dealer_stood: false,
            rng,
        }
    }

    pub fn set_player_name(&mut self, name: impl Into<String>) {
        self.player.set_name(name);
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn dealer(&self) -> &Dealer {
        &self.dealer
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn deck_size(&self) -> usize {
        self.deck.size()
    }

    /// The dealer's cards as the player may currently see them.
    pub fn dealer_view(&self) -> Vec<CardView> {
        match self.phase {
            RoundPhase::Dealing | RoundPhase::PlayerTurn => self.dealer.flop_display(),
            RoundPhase::DealerTurn | RoundPhase::Resolved => self.dealer.full_display(),
        }
    }

    fn expect_phase(&self, expected: RoundPhase, action: &'static str) -> Result<(), GameError> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(GameError::OutOfTurn {
                action,
                phase: self.phase,
            })
        }
    }

    fn participant_mut(&mut self, side: Side) -> &mut dyn Participant {
        match side {
            Side::Player => &mut self.player,
            Side::Dealer => &mut self.dealer,
        }
    }

    fn participant(&self, side: Side) -> &dyn Participant {
        match side {
            Side::Player => &self.player,
            Side::Dealer => &self.dealer,
        }
    }

    fn deal_to(&mut self, side: Side) -> Result<Card, GameError> {
        let card = self.deck.draw_top()?;
        let remaining = self.deck.size();
        let participant = self.participant_mut(side);
        participant.add_card(card);
        debug!(
            to = participant.name(),
            card = %card,
            total = participant.total(),
            remaining,
            "dealt card"
        );
        Ok(card)
    }

    fn finish(&mut self, outcome: Outcome) -> Outcome {
        self.phase = RoundPhase::Resolved;
        self.outcome = Some(outcome);
        info!(
            player = self.player.name(),
            player_total = self.player.total(),
            dealer_total = self.dealer.total(),
            ?outcome,
            "round resolved"
        );
        outcome
    }

    /// Resolves the round if `side` sits on exactly 21 or has busted.
    fn check_blackjack_or_bust(&mut self, side: Side) -> Option<Outcome> {
        let participant = self.participant(side);
        let outcome = if participant.total() == BLACKJACK {
            Outcome::blackjack_for(side)
        } else if participant.is_busted() {
            Outcome::bust_for(side)
        } else {
            return None;
        };
        Some(self.finish(outcome))
    }

    /// Deals player, dealer, player, dealer, then checks the player's hand.
    pub fn deal_initial_cards(&mut self) -> Result<Option<Outcome>, GameError> {
        self.expect_phase(RoundPhase::Dealing, "deal")?;
        if self.deck.size() < 4 {
            return Err(GameError::EmptyDeck);
        }
        for _ in 0..2 {
            self.deal_to(Side::Player)?;
            self.deal_to(Side::Dealer)?;
        }
        self.phase = RoundPhase::PlayerTurn;
        Ok(self.check_blackjack_or_bust(Side::Player))
    }

    pub fn player_hit(&mut self) -> Result<Draw, GameError> {
        self.expect_phase(RoundPhase::PlayerTurn, "hit")?;
        let card = self.deal_to(Side::Player)?;
        let outcome = self.check_blackjack_or_bust(Side::Player);
        Ok(Draw {
            card,
            total: self.player.total(),
            outcome,
        })
    }

    pub fn player_stay(&mut self) -> Result<u16, GameError> {
        self.expect_phase(RoundPhase::PlayerTurn, "stay")?;
        let total = self.player.total();
        debug!(player = self.player.name(), total, "player stays");
        self.phase = RoundPhase::DealerTurn;
        Ok(total)
    }

    /// Plays the dealer's fixed strategy: draw below 17, stand otherwise.
    pub fn dealer_auto_play(&mut self) -> Result<DealerPlay, GameError> {
        self.expect_phase(RoundPhase::DealerTurn, "play the dealer")?;
        let mut play = DealerPlay::default();
        if !self.dealer_stood {
            play.outcome = self.check_blackjack_or_bust(Side::Dealer);
            while play.outcome.is_none() && self.dealer.total() < DEALER_STAND_MIN {
                play.drawn.push(self.deal_to(Side::Dealer)?);
                play.outcome = self.check_blackjack_or_bust(Side::Dealer);
            }
            if play.outcome.is_none() {
                self.dealer_stood = true;
                debug!(total = self.dealer.total(), "dealer stands");
            }
        }
        play.total = self.dealer.total();
        Ok(play)
    }

    /// Compares totals once both turns finished; later calls repeat the result.
    pub fn resolve_round(&mut self) -> Result<Outcome, GameError> {
        if let Some(outcome) = self.outcome {
            return Ok(outcome);
        }
        if self.phase != RoundPhase::DealerTurn || !self.dealer_stood {
            return Err(GameError::OutOfTurn {
                action: "resolve",
                phase: self.phase,
            });
        }
        let player = self.player.total();
        let dealer = self.dealer.total();
        let outcome = match player.cmp(&dealer) {
            std::cmp::Ordering::Greater => Outcome::PlayerWins,
            std::cmp::Ordering::Less => Outcome::DealerWins,
            std::cmp::Ordering::Equal => Outcome::Tie,
        };
        Ok(self.finish(outcome))
    }

    /// Fresh shuffled deck and empty hands; the player keeps their name.
    pub fn reset_round(&mut self) {
        self.deck = Deck::with_seed(self.rng.gen());
        self.player.hand_mut().clear();
        self.dealer.hand_mut().clear();
        self.phase = RoundPhase::Dealing;
        self.outcome = None;
        self.dealer_stood = false;
        debug!(cards = self.deck.size(), "new round");
    }

    /// Runs one whole round, asking `seat` for every player decision.
    pub fn play_round<S>(&mut self, seat: &mut S) -> Result<Outcome, GameError>
    where
        S: PlayerSeat + ?Sized,
    {
        let dealt = self.deal_initial_cards()?;
        seat.observe(self, &RoundEvent::Dealt);
        if let Some(outcome) = dealt {
            return Ok(self.announce(seat, outcome));
        }

        loop {
            match seat.choose(self) {
                Choice::Hit => {
                    let draw = self.player_hit()?;
                    seat.observe(self, &RoundEvent::PlayerHit(draw));
                    if let Some(outcome) = draw.outcome {
                        return Ok(self.announce(seat, outcome));
                    }
                }
                Choice::Stay => {
                    let total = self.player_stay()?;
                    seat.observe(self, &RoundEvent::PlayerStayed { total });
                    break;
                }
            }
        }

        let play = self.dealer_auto_play()?;
        let early = play.outcome;
        seat.observe(self, &RoundEvent::DealerPlayed(play));
        let outcome = match early {
            Some(outcome) => outcome,
            None => self.resolve_round()?,
        };
        Ok(self.announce(seat, outcome))
    }

    fn announce<S>(&self, seat: &mut S, outcome: Outcome) -> Outcome
    where
        S: PlayerSeat + ?Sized,
    {
        seat.observe(self, &RoundEvent::Resolved(outcome));
        outcome
    }

    pub fn snapshot(&self) -> RoundSnapshot {
        let dealer_total = match self.phase {
            RoundPhase::DealerTurn | RoundPhase::Resolved => Some(self.dealer.total()),
            RoundPhase::Dealing | RoundPhase::PlayerTurn => None,
        };
        RoundSnapshot {
            player_name: self.player.name().to_string(),
            player_cards: self.player.hand().cards_for_display().to_vec(),
            player_total: self.player.total(),
            dealer_cards: self.dealer_view(),
            dealer_total,
            phase: self.phase,
            outcome: self.outcome,
            cards_remaining: self.deck.size(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::{Rank, Suit};

    fn card(rank: Rank) -> Card {
        Card::new(Suit::Spades, rank)
    }

    fn engine(draw_order: &[Rank]) -> GameEngine {
        GameEngine::with_deck("Ada", Deck::stacked(draw_order.iter().map(|&r| card(r))))
    }

    #[test]
    fn hit_before_deal_is_out_of_turn() {
        let mut game = engine(&[Rank::Two; 6]);
        assert_eq!(
            game.player_hit(),
            Err(GameError::OutOfTurn {
                action: "hit",
                phase: RoundPhase::Dealing
            })
        );
        assert_eq!(game.deck_size(), 6);
    }

    #[test]
    fn deal_twice_is_out_of_turn() {
        let mut game = engine(&[Rank::Two, Rank::Three, Rank::Four, Rank::Five]);
        assert_eq!(game.deal_initial_cards(), Ok(None));
        assert!(matches!(
            game.deal_initial_cards(),
            Err(GameError::OutOfTurn { .. })
        ));
    }

    #[test]
    fn deal_alternates_player_and_dealer() {
        let mut game = engine(&[Rank::Two, Rank::Three, Rank::Four, Rank::Five]);
        game.deal_initial_cards().unwrap();
        assert_eq!(
            game.player().hand().cards_for_display(),
            &[card(Rank::Two), card(Rank::Four)]
        );
        assert_eq!(
            game.dealer().hand().cards_for_display(),
            &[card(Rank::Three), card(Rank::Five)]
        );
        assert_eq!(game.phase(), RoundPhase::PlayerTurn);
    }

    #[test]
    fn resolve_requires_dealer_to_finish() {
        let mut game = engine(&[Rank::Ten, Rank::Ten, Rank::Eight, Rank::Seven]);
        game.deal_initial_cards().unwrap();
        assert!(game.resolve_round().is_err());
        game.player_stay().unwrap();
        assert!(game.resolve_round().is_err());
        game.dealer_auto_play().unwrap();
        assert_eq!(game.resolve_round(), Ok(Outcome::PlayerWins));
        assert_eq!(game.resolve_round(), Ok(Outcome::PlayerWins));
    }

    #[test]
    fn dealer_view_reveals_after_stay() {
        let mut game = engine(&[Rank::Ten, Rank::Nine, Rank::Eight, Rank::Seven]);
        game.deal_initial_cards().unwrap();
        assert_eq!(game.dealer_view()[1], CardView::Hidden);
        game.player_stay().unwrap();
        assert_eq!(game.dealer_view()[1], CardView::Visible(card(Rank::Seven)));
    }

    #[test]
    fn outcome_winner() {
        assert_eq!(Outcome::DealerBust.winner(), Some(Side::Player));
        assert_eq!(Outcome::PlayerBust.winner(), Some(Side::Dealer));
        assert_eq!(Outcome::Tie.winner(), None);
    }
}
