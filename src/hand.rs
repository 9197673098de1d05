use serde::Serialize;

use crate::deck::Card;

pub const BLACKJACK: u16 = 21;

const ACE_DEMOTION: u16 = 10;

pub fn hand_value(cards: &[Card]) -> u16 {
    let aces = cards.iter().filter(|card| card.is_ace()).count();
    let mut total: u16 = cards.iter().map(Card::value).sum();

    // Demote one ace at a time, only as far as needed.
    for _ in 0..aces {
        if total <= BLACKJACK {
            break;
        }
        total -= ACE_DEMOTION;
    }

    total
}

/// Cards held by one participant, in the order they were dealt.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Hand {
    cards: Vec<Card>,
}

impl Hand {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total(&self) -> u16 {
        hand_value(&self.cards)
    }

    pub fn is_busted(&self) -> bool {
        self.total() > BLACKJACK
    }

    pub fn is_blackjack(&self) -> bool {
        self.total() == BLACKJACK
    }

    pub fn add_card(&mut self, card: Card) {
        self.cards.push(card);
    }

    pub fn cards_for_display(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn clear(&mut self) {
        self.cards.clear();
    }
}

impl FromIterator<Card> for Hand {
    fn from_iter<I: IntoIterator<Item = Card>>(iter: I) -> Self {
        Hand {
            cards: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::{Rank, Suit};

    fn hand(ranks: &[Rank]) -> Hand {
        ranks
            .iter()
            .zip(Suit::ALL.iter().cycle())
            .map(|(&rank, &suit)| Card::new(suit, rank))
            .collect()
    }

    #[test]
    fn empty_hand_is_zero() {
        assert_eq!(Hand::new().total(), 0);
        assert!(!Hand::new().is_busted());
    }

    #[test]
    fn face_cards_count_ten() {
        assert_eq!(hand(&[Rank::King, Rank::Queen]).total(), 20);
        assert_eq!(hand(&[Rank::Jack, Rank::Ten]).total(), 20);
    }

    #[test]
    fn ace_king_is_blackjack() {
        let cards = hand(&[Rank::Ace, Rank::King]);
        assert_eq!(cards.total(), 21);
        assert!(cards.is_blackjack());
    }

    #[test]
    fn two_aces_is_twelve() {
        assert_eq!(hand(&[Rank::Ace, Rank::Ace]).total(), 12);
    }

    #[test]
    fn four_aces_and_nine_demote_every_ace() {
        let cards = hand(&[Rank::Ace, Rank::Ace, Rank::Ace, Rank::Ace, Rank::Nine]);
        assert_eq!(cards.total(), 13);
        assert!(!cards.is_busted());
    }

    #[test]
    fn soft_ace_stays_eleven() {
        assert_eq!(hand(&[Rank::Ace, Rank::Six]).total(), 17);
    }

    #[test]
    fn ace_demoted_when_needed() {
        assert_eq!(hand(&[Rank::Ace, Rank::Six, Rank::Nine]).total(), 16);
        assert_eq!(hand(&[Rank::Ace, Rank::Ace, Rank::Nine]).total(), 21);
    }

    #[test]
    fn bust_without_aces() {
        let cards = hand(&[Rank::Ten, Rank::Nine, Rank::Five]);
        assert_eq!(cards.total(), 24);
        assert!(cards.is_busted());
    }

    #[test]
    fn bust_even_after_demoting_aces() {
        let cards = hand(&[Rank::Ace, Rank::King, Rank::Queen, Rank::Five]);
        assert_eq!(cards.total(), 26);
        assert!(cards.is_busted());
    }

    #[test]
    fn total_follows_added_cards() {
        let mut cards = hand(&[Rank::Ace, Rank::Five]);
        assert_eq!(cards.total(), 16);
        cards.add_card(Card::new(Suit::Clubs, Rank::Eight));
        assert_eq!(cards.total(), 14);
        assert_eq!(cards.len(), 3);
        assert_eq!(cards.cards_for_display()[2], Card::new(Suit::Clubs, Rank::Eight));
    }

    #[test]
    fn clear_empties_hand() {
        let mut cards = hand(&[Rank::Two, Rank::Three]);
        cards.clear();
        assert!(cards.is_empty());
        assert_eq!(cards.total(), 0);
    }
}
