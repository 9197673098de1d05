use serde::Serialize;

use crate::{deck::Card, hand::Hand};

pub const DEALER_NAME: &str = "Dealer";

/// Scoring shared by everyone holding a hand at the table.
pub trait Participant {
    fn name(&self) -> &str;
    fn hand(&self) -> &Hand;
    fn hand_mut(&mut self) -> &mut Hand;

    fn total(&self) -> u16 {
        self.hand().total()
    }

    fn is_busted(&self) -> bool {
        self.hand().is_busted()
    }

    fn add_card(&mut self, card: Card) {
        self.hand_mut().add_card(card);
    }
}

/// A card as the table sees it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "card", rename_all = "camelCase")]
pub enum CardView {
    Visible(Card),
    Hidden,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Player {
    name: String,
    hand: Hand,
}

impl Player {
    pub fn new(name: impl Into<String>) -> Self {
        Player {
            name: name.into(),
            hand: Hand::new(),
        }
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }
}

impl Participant for Player {
    fn name(&self) -> &str {
        &self.name
    }

    fn hand(&self) -> &Hand {
        &self.hand
    }

    fn hand_mut(&mut self) -> &mut Hand {
        &mut self.hand
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Dealer {
    hand: Hand,
}

impl Dealer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only the first dealt card is shown until the dealer's turn.
    pub fn flop_display(&self) -> Vec<CardView> {
        self.hand
            .cards_for_display()
            .iter()
            .enumerate()
            .map(|(index, &card)| {
                if index == 0 {
                    CardView::Visible(card)
                } else {
                    CardView::Hidden
                }
            })
            .collect()
    }

    pub fn full_display(&self) -> Vec<CardView> {
        self.hand
            .cards_for_display()
            .iter()
            .map(|&card| CardView::Visible(card))
            .collect()
    }
}

impl Participant for Dealer {
    fn name(&self) -> &str {
        DEALER_NAME
    }

    fn hand(&self) -> &Hand {
        &self.hand
    }

    fn hand_mut(&mut self) -> &mut Hand {
        &mut self.hand
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::{Rank, Suit};

    const NINE: Card = Card::new(Suit::Clubs, Rank::Nine);
    const SEVEN: Card = Card::new(Suit::Diamonds, Rank::Seven);

    #[test]
    fn player_scoring_goes_through_hand() {
        let mut player = Player::new("Ada");
        player.add_card(NINE);
        player.add_card(SEVEN);
        assert_eq!(player.total(), 16);
        assert!(!player.is_busted());
        assert_eq!(player.hand().cards_for_display(), &[NINE, SEVEN]);
    }

    #[test]
    fn player_name_is_mutable() {
        let mut player = Player::new("Player");
        player.set_name("");
        assert_eq!(player.name(), "");
    }

    #[test]
    fn dealer_is_always_named_dealer() {
        assert_eq!(Dealer::new().name(), "Dealer");
    }

    #[test]
    fn flop_hides_everything_after_first_card() {
        let mut dealer = Dealer::new();
        dealer.add_card(NINE);
        dealer.add_card(SEVEN);
        assert_eq!(
            dealer.flop_display(),
            vec![CardView::Visible(NINE), CardView::Hidden]
        );
        assert_eq!(
            dealer.full_display(),
            vec![CardView::Visible(NINE), CardView::Visible(SEVEN)]
        );
    }

    #[test]
    fn flop_of_empty_hand_is_empty() {
        assert!(Dealer::new().flop_display().is_empty());
    }

    #[test]
    fn card_view_serializes_tagged() {
        let hidden = serde_json::to_value(CardView::Hidden).unwrap();
        assert_eq!(hidden, serde_json::json!({ "kind": "hidden" }));
        let shown = serde_json::to_value(CardView::Visible(NINE)).unwrap();
        assert_eq!(
            shown,
            serde_json::json!({ "kind": "visible", "card": { "suit": "Clubs", "rank": "Nine" } })
        );
    }
}
