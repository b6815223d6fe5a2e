//! Proptest strategies for domain tests.

use proptest::prelude::*;

use super::cards_types::{full_deck, Card, Suit};
use super::state::{Seat, TrickPlay};

pub fn suit() -> impl Strategy<Value = Suit> {
    prop::sample::select(Suit::ALL.to_vec())
}

/// A complete four-play trick of distinct cards, seats 0..=3 in rotation from
/// a random leader.
pub fn complete_trick() -> impl Strategy<Value = Vec<TrickPlay>> {
    (prop::sample::subsequence(full_deck(), 4), 0u8..4).prop_map(|(cards, leader)| {
        cards
            .into_iter()
            .enumerate()
            .map(|(i, card)| TrickPlay {
                position: ((leader as usize + i) % 4) as Seat,
                card,
            })
            .collect()
    })
}

/// Four disjoint five-card hands drawn from a shuffled deck, plus the four
/// leftover cards.
pub fn dealt_hands() -> impl Strategy<Value = ([Vec<Card>; 4], Vec<Card>)> {
    prop::sample::subsequence(full_deck(), 24).prop_shuffle().prop_map(|deck| {
        let hands = [
            deck[0..5].to_vec(),
            deck[5..10].to_vec(),
            deck[10..15].to_vec(),
            deck[15..20].to_vec(),
        ];
        (hands, deck[20..24].to_vec())
    })
}
